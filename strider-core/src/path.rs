//! Polyline paths sampled by distance, used by path-following roles.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StriderError};
use crate::types::look_rotation;

/// What happens when the distance cursor runs past either end of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EndOfPath {
    /// Wrap around to the start.
    #[default]
    Loop,
    /// Walk back along the path (ping-pong).
    Reverse,
    /// Clamp at the end.
    Stop,
}

/// A piecewise-linear path with cached cumulative lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSpline {
    points: Vec<Vec3>,
    /// `cumulative[i]` is the distance from the start to vertex `i`. Closed
    /// paths carry one extra entry for the closing segment.
    cumulative: Vec<f32>,
    closed: bool,
}

impl PathSpline {
    /// Build a path through `points`. A closed path has an implicit segment
    /// from the last point back to the first.
    ///
    /// # Errors
    /// Returns `StriderError::Config` for fewer than two points or a path of
    /// zero length.
    pub fn new(points: Vec<Vec3>, closed: bool) -> Result<Self> {
        if points.len() < 2 {
            return Err(StriderError::Config(format!(
                "path needs at least 2 points, got {}",
                points.len()
            )));
        }
        let mut cumulative = Vec::with_capacity(points.len() + 1);
        let mut total = 0.0;
        cumulative.push(0.0);
        for pair in points.windows(2) {
            total += pair[0].distance(pair[1]);
            cumulative.push(total);
        }
        if closed {
            total += points[points.len() - 1].distance(points[0]);
            cumulative.push(total);
        }
        if total <= f32::EPSILON {
            return Err(StriderError::Config("path has zero length".into()));
        }
        Ok(Self {
            points,
            cumulative,
            closed,
        })
    }

    /// Total length.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Whether the path closes back on itself.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn segment_count(&self) -> usize {
        self.cumulative.len() - 1
    }

    fn segment(&self, i: usize) -> (Vec3, Vec3) {
        let a = self.points[i];
        let b = self.points[(i + 1) % self.points.len()];
        (a, b)
    }

    /// Distance along the path of the point closest to `position`.
    #[must_use]
    pub fn closest_distance(&self, position: Vec3) -> f32 {
        let mut best = (f32::INFINITY, 0.0);
        for i in 0..self.segment_count() {
            let (a, b) = self.segment(i);
            let ab = b - a;
            let len_sq = ab.length_squared();
            let t = if len_sq <= f32::EPSILON {
                0.0
            } else {
                ((position - a).dot(ab) / len_sq).clamp(0.0, 1.0)
            };
            let d = position.distance_squared(a + ab * t);
            if d < best.0 {
                let seg_len = self.cumulative[i + 1] - self.cumulative[i];
                best = (d, self.cumulative[i] + seg_len * t);
            }
        }
        best.1
    }

    /// Map a raw cursor onto `[0, length]` according to `end`, plus whether
    /// the cursor currently runs backwards (only for [`EndOfPath::Reverse`]).
    fn resolve(&self, distance: f32, end: EndOfPath) -> (f32, bool) {
        let len = self.length();
        match end {
            EndOfPath::Loop => (distance.rem_euclid(len), false),
            EndOfPath::Stop => (distance.clamp(0.0, len), false),
            EndOfPath::Reverse => {
                let m = distance.rem_euclid(2.0 * len);
                if m > len { (2.0 * len - m, true) } else { (m, false) }
            }
        }
    }

    fn locate(&self, d: f32) -> (usize, f32) {
        let last = self.segment_count() - 1;
        let i = match self
            .cumulative
            .binary_search_by(|c| c.partial_cmp(&d).unwrap_or(std::cmp::Ordering::Less))
        {
            Ok(i) => i.min(last),
            Err(i) => i.saturating_sub(1).min(last),
        };
        let seg_len = self.cumulative[i + 1] - self.cumulative[i];
        let t = if seg_len <= f32::EPSILON {
            0.0
        } else {
            ((d - self.cumulative[i]) / seg_len).clamp(0.0, 1.0)
        };
        (i, t)
    }

    /// World position at `distance` along the path.
    #[must_use]
    pub fn point_at(&self, distance: f32, end: EndOfPath) -> Vec3 {
        let (d, _) = self.resolve(distance, end);
        let (i, t) = self.locate(d);
        let (a, b) = self.segment(i);
        a.lerp(b, t)
    }

    /// Facing at `distance` along the path, in the direction of travel.
    #[must_use]
    pub fn rotation_at(&self, distance: f32, end: EndOfPath) -> Quat {
        let (d, backwards) = self.resolve(distance, end);
        let (i, _) = self.locate(d);
        let (a, b) = self.segment(i);
        let dir = if backwards { a - b } else { b - a };
        look_rotation(dir).unwrap_or(Quat::IDENTITY)
    }
}

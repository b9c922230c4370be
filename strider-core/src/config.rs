//! Configuration for Strider scenes and characters.
//!
//! Maps directly to a `strider.toml` file. Every field has a default so a
//! config only needs to spell out what it changes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StriderError};
use crate::path::{EndOfPath, PathSpline};
use crate::types::{Role, StateId};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StriderConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Rest behavior tuning shared by every character.
    #[serde(default)]
    pub resting: RestingTuning,
    /// Host world settings.
    #[serde(default)]
    pub world: WorldConfig,
    /// Rest areas in the scene.
    #[serde(default)]
    pub rest_areas: Vec<RestAreaConfig>,
    /// Spawn groups, one per character template.
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

impl StriderConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `StriderError::Config` if the TOML is invalid or fails
    /// [`validate`](Self::validate).
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| StriderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns `StriderError::Config` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        self.resting.validate()?;
        self.world.validate()?;
        for (i, area) in self.rest_areas.iter().enumerate() {
            if area.radius <= 0.0 {
                return Err(StriderError::Config(format!(
                    "rest_areas[{i}]: radius must be positive"
                )));
            }
        }
        for group in &self.groups {
            group.validate()?;
        }
        Ok(())
    }

    /// Group for `role`, if configured.
    #[must_use]
    pub fn group(&self, role: Role) -> Option<&GroupConfig> {
        self.groups.iter().find(|g| g.role == role)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log filter directive: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Seed for every per-character RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            seed: default_seed(),
        }
    }
}

/// Per-character movement parameters, copied in at spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Lower bound for the randomized agent speed.
    #[serde(default = "default_min_speed")]
    pub min_speed: f32,
    /// Upper bound for the randomized agent speed.
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    /// Radius of the wander sample sphere.
    #[serde(default = "default_wander_radius")]
    pub wander_radius: f32,
    /// Forward offset of the wander sample sphere. Zero samples around the
    /// character itself.
    #[serde(default)]
    pub wander_offset: f32,
    /// Arrival distance used while wandering. Zero defers to the agent.
    #[serde(default)]
    pub wander_stopping_distance: f32,
    /// Seconds spent seated in a rest area.
    #[serde(default = "default_resting_time")]
    pub resting_time: f32,
    /// Fixed waypoint direction (`true` = ascending). Randomized when unset.
    #[serde(default)]
    pub patrol_direction: Option<bool>,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
            wander_radius: default_wander_radius(),
            wander_offset: 0.0,
            wander_stopping_distance: 0.0,
            resting_time: default_resting_time(),
            patrol_direction: None,
        }
    }
}

impl MovementConfig {
    /// Check ranges.
    ///
    /// # Errors
    /// Returns `StriderError::Config` for inverted or negative ranges.
    pub fn validate(&self) -> Result<()> {
        if self.min_speed < 0.0 || self.min_speed > self.max_speed {
            return Err(StriderError::Config(format!(
                "speed range [{}, {}] is invalid",
                self.min_speed, self.max_speed
            )));
        }
        if self.wander_radius < 0.0 || self.wander_offset < 0.0 || self.wander_stopping_distance < 0.0 {
            return Err(StriderError::Config("wander parameters must be non-negative".into()));
        }
        if self.resting_time < 0.0 {
            return Err(StriderError::Config("resting_time must be non-negative".into()));
        }
        Ok(())
    }
}

/// Tuning of the sit-down approach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestingTuning {
    /// Angle (degrees) under which the character counts as facing the exit
    /// anchor and sits down.
    #[serde(default = "default_face_tolerance")]
    pub face_tolerance_deg: f32,
    /// Slerp factor per second while turning toward the exit anchor.
    #[serde(default = "default_turn_rate")]
    pub turn_rate: f32,
}

impl Default for RestingTuning {
    fn default() -> Self {
        Self {
            face_tolerance_deg: default_face_tolerance(),
            turn_rate: default_turn_rate(),
        }
    }
}

impl RestingTuning {
    fn validate(&self) -> Result<()> {
        if !(0.0..180.0).contains(&self.face_tolerance_deg) || self.turn_rate <= 0.0 {
            return Err(StriderError::Config("resting tuning out of range".into()));
        }
        Ok(())
    }
}

/// Host world settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Minimum corner of the walkable area.
    #[serde(default = "default_bounds_min")]
    pub bounds_min: Vec3,
    /// Maximum corner of the walkable area.
    #[serde(default = "default_bounds_max")]
    pub bounds_max: Vec3,
    /// Agent arrival distance.
    #[serde(default = "default_stopping_distance")]
    pub stopping_distance: f32,
    /// Length of the sit-down clip in seconds.
    #[serde(default = "default_clip_seconds")]
    pub sit_clip_seconds: f32,
    /// Length of the stand-up clip in seconds.
    #[serde(default = "default_clip_seconds")]
    pub stand_clip_seconds: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bounds_min: default_bounds_min(),
            bounds_max: default_bounds_max(),
            stopping_distance: default_stopping_distance(),
            sit_clip_seconds: default_clip_seconds(),
            stand_clip_seconds: default_clip_seconds(),
        }
    }
}

impl WorldConfig {
    fn validate(&self) -> Result<()> {
        if self.bounds_min.cmpgt(self.bounds_max).any() {
            return Err(StriderError::Config("world bounds are inverted".into()));
        }
        if self.stopping_distance < 0.0 || self.sit_clip_seconds < 0.0 || self.stand_clip_seconds < 0.0 {
            return Err(StriderError::Config("world timings must be non-negative".into()));
        }
        Ok(())
    }
}

/// One rest area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestAreaConfig {
    /// Enter anchor (also the trigger centre).
    pub enter: Vec3,
    /// Exit anchor.
    pub exit: Vec3,
    /// Trigger radius.
    #[serde(default = "default_rest_radius")]
    pub radius: f32,
}

/// A continuous path for path-following roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Path vertices.
    pub points: Vec<Vec3>,
    /// Whether the last vertex connects back to the first.
    #[serde(default)]
    pub closed: bool,
    /// What to do past the ends.
    #[serde(default)]
    pub end: EndOfPath,
}

/// Spawn template for one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Role of every character in the group.
    pub role: Role,
    /// State the character is created in.
    #[serde(default)]
    pub initial_state: StateId,
    /// Characters spawned at scene start.
    #[serde(default)]
    pub instances: u32,
    /// Hard cap on live characters of this group.
    #[serde(default = "default_max_instances")]
    pub max_instances: u32,
    /// Movement parameters.
    #[serde(default)]
    pub movement: MovementConfig,
    /// Patrol waypoints; also the spawn points.
    #[serde(default)]
    pub waypoints: Vec<Vec3>,
    /// Path for path-following roles.
    #[serde(default)]
    pub path: Option<PathConfig>,
    /// Role whose first character this group follows.
    #[serde(default)]
    pub follow: Option<Role>,
}

impl GroupConfig {
    /// Check the group.
    ///
    /// # Errors
    /// Returns `StriderError::Config` for invalid movement or path data.
    pub fn validate(&self) -> Result<()> {
        self.movement
            .validate()
            .map_err(|e| StriderError::Config(format!("group {}: {e}", self.role)))?;
        if self.role == Role::Runner && self.waypoints.is_empty() {
            return Err(StriderError::Config("group Runner: waypoints must not be empty".into()));
        }
        if let Some(path) = &self.path {
            PathSpline::new(path.points.clone(), path.closed)
                .map_err(|e| StriderError::Config(format!("group {}: {e}", self.role)))?;
        }
        Ok(())
    }

    /// Instances to spawn at start, clamped to the cap.
    #[must_use]
    pub fn initial_instances(&self) -> u32 {
        self.instances.min(self.max_instances)
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "info".to_string() }
fn default_seed() -> u64 { 0x5eed }
fn default_min_speed() -> f32 { 2.0 }
fn default_max_speed() -> f32 { 4.0 }
fn default_wander_radius() -> f32 { 10.0 }
fn default_resting_time() -> f32 { 5.0 }
fn default_face_tolerance() -> f32 { 5.0 }
fn default_turn_rate() -> f32 { 2.0 }
fn default_bounds_min() -> Vec3 { Vec3::new(-50.0, 0.0, -50.0) }
fn default_bounds_max() -> Vec3 { Vec3::new(50.0, 0.0, 50.0) }
fn default_stopping_distance() -> f32 { 0.5 }
fn default_clip_seconds() -> f32 { 1.0 }
fn default_rest_radius() -> f32 { 1.5 }
fn default_max_instances() -> u32 { 16 }

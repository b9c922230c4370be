//! The scene: owns every character and the services they share, and steps
//! the world one frame at a time.
//!
//! A frame runs in a fixed order: agents move, transforms are published,
//! overlaps and finished clips are queued on the characters they concern,
//! and then every character ticks. Queued stimuli therefore always land
//! before the state update of the same frame.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use strider_core::config::{GroupConfig, StriderConfig};
use strider_core::metrics::CounterSnapshot;
use strider_core::path::{EndOfPath, PathSpline};
use strider_core::rest_area::{RestArea, RestAreas};
use strider_core::types::{CharacterId, Role, Stimulus, Transform, look_rotation};
use strider_core::{Character, Result, Services, StriderError};
use tracing::{debug, info, warn};

use crate::clips::ClipHandle;
use crate::kinematic::{AgentHandle, NavBounds};
use crate::triggers::OverlapTracker;

struct Entry {
    character: Character,
    agent: AgentHandle,
    clips: ClipHandle,
}

/// A running world.
pub struct Scene {
    config: StriderConfig,
    bounds: NavBounds,
    services: Services,
    entries: Vec<Entry>,
    paths: HashMap<Role, Arc<PathSpline>>,
    overlaps: OverlapTracker,
    rng: SmallRng,
    next_id: u32,
    frames: u64,
}

impl Scene {
    /// Build an empty scene with the configured rest areas and paths.
    ///
    /// # Errors
    /// Returns `StriderError::Config` if the configuration is invalid.
    pub fn from_config(config: StriderConfig) -> Result<Self> {
        config.validate()?;

        let mut rest_areas = RestAreas::new();
        for area in &config.rest_areas {
            rest_areas.add(RestArea::new(area.enter, area.exit, area.radius));
        }

        let mut paths = HashMap::new();
        for group in &config.groups {
            if let Some(path) = &group.path {
                let spline = PathSpline::new(path.points.clone(), path.closed)?;
                paths.insert(group.role, Arc::new(spline));
            }
        }

        let services = Services {
            rest_areas,
            resting: config.resting,
            ..Services::default()
        };
        info!(
            rest_areas = services.rest_areas.len(),
            groups = config.groups.len(),
            seed = config.general.seed,
            "Scene created"
        );

        Ok(Self {
            bounds: NavBounds::from_config(&config.world),
            rng: SmallRng::seed_from_u64(config.general.seed),
            config,
            services,
            entries: Vec::new(),
            paths,
            overlaps: OverlapTracker::new(),
            next_id: 0,
            frames: 0,
        })
    }

    /// Spawn every group's initial instances. Returns how many were spawned.
    ///
    /// # Errors
    /// Propagates character construction errors.
    pub fn spawn(&mut self) -> Result<usize> {
        let mut spawned = 0;
        let plan: Vec<(Role, u32)> = self
            .config
            .groups
            .iter()
            .map(|g| (g.role, g.initial_instances()))
            .collect();
        for (role, count) in plan {
            for _ in 0..count {
                if self.add_character(role)?.is_some() {
                    spawned += 1;
                }
            }
        }
        info!(spawned, "Initial population spawned");
        Ok(spawned)
    }

    /// Add one character of `role`. Returns `None` when the group is full.
    ///
    /// # Errors
    /// Returns `StriderError::Config` if no group is configured for `role`.
    pub fn add_character(&mut self, role: Role) -> Result<Option<CharacterId>> {
        let group = self
            .config
            .group(role)
            .cloned()
            .ok_or_else(|| StriderError::Config(format!("no group configured for {role}")))?;

        let alive = self.entries.iter().filter(|e| e.character.role() == role).count();
        if alive >= group.max_instances as usize {
            warn!(role = %role, max = group.max_instances, "Group is full, not spawning");
            return Ok(None);
        }

        let id = CharacterId(self.next_id);
        self.next_id += 1;
        let (position, waypoint) = self.spawn_point(&group);
        let agent = AgentHandle::new(self.bounds, position, self.config.world.stopping_distance);
        let clips = ClipHandle::new(self.config.world.sit_clip_seconds, self.config.world.stand_clip_seconds);

        let mut builder = Character::builder(id, role)
            .initial_state(group.initial_state)
            .transform(Transform::at(agent.position()))
            .movement(group.movement.clone())
            .seed(self.config.general.seed)
            .nav(agent.agent())
            .animator(clips.animator());
        if let Some(index) = waypoint {
            builder = builder.waypoints_from(group.waypoints.clone(), index);
        }
        if let (Some(path), Some(cfg)) = (self.paths.get(&role), &group.path) {
            builder = builder.path(Arc::clone(path), cfg.end);
        }
        if let Some(lead_role) = group.follow {
            match self.entries.iter().find(|e| e.character.role() == lead_role) {
                Some(lead) => builder = builder.follow(lead.character.id()),
                None => warn!(character = %id, lead = %lead_role, "No character to follow yet"),
            }
        }

        let character = builder.build()?;
        self.services.transforms.insert(id, character.body().transform);
        debug!(character = %id, role = %role, x = position.x, z = position.z, "Character spawned");
        self.entries.push(Entry {
            character,
            agent,
            clips,
        });
        Ok(Some(id))
    }

    /// Remove a character, releasing anything it held.
    pub fn despawn(&mut self, id: CharacterId) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.character.id() == id) else {
            return false;
        };
        let mut entry = self.entries.remove(index);
        entry.character.retire(&mut self.services.env(0.0));
        self.services.transforms.remove(id);
        self.overlaps.forget(id);
        info!(character = %id, "Character despawned");
        true
    }

    /// Move a character instantly.
    pub fn teleport(&mut self, id: CharacterId, position: Vec3) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.character.id() == id) else {
            return false;
        };
        entry.agent.teleport(position);
        let placed = entry.agent.position();
        entry.character.body_mut().transform.position = placed;
        self.services.transforms.insert(id, entry.character.body().transform);
        true
    }

    /// Advance the world by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.frames += 1;

        for entry in &mut self.entries {
            let position = entry.agent.step(dt);
            let body = entry.character.body_mut();
            body.transform.position = position;
            if let Some(facing) = look_rotation(entry.agent.velocity()) {
                body.transform.rotation = facing;
            }
            self.services.transforms.insert(body.id, body.transform);
        }

        let positions: Vec<(CharacterId, Vec3)> = self
            .entries
            .iter()
            .map(|e| (e.character.id(), e.character.body().transform.position))
            .collect();
        let mut collisions: HashMap<CharacterId, Vec<Stimulus>> = HashMap::new();
        for (who, stimulus) in self.overlaps.bodies(&positions) {
            collisions.entry(who).or_default().push(stimulus);
        }

        for entry in &mut self.entries {
            let id = entry.character.id();
            let position = entry.character.body().transform.position;
            for stimulus in self.overlaps.rest_areas(id, position, &self.services.rest_areas) {
                entry.character.enqueue(stimulus);
            }
            for stimulus in collisions.remove(&id).unwrap_or_default() {
                entry.character.enqueue(stimulus);
            }
            if let Some(event) = entry.clips.advance(dt) {
                entry.character.enqueue(Stimulus::Animation(event));
            }
        }

        let mut env = self.services.env(dt);
        for entry in &mut self.entries {
            entry.character.tick(&mut env);
        }
        drop(env);

        // States may have moved characters directly (paths, following).
        for entry in &self.entries {
            let body = entry.character.body();
            self.services.transforms.insert(body.id, body.transform);
        }
    }

    /// Frames stepped so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of live characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the scene has no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All live characters.
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.entries.iter().map(|e| &e.character)
    }

    /// Look a character up.
    #[must_use]
    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters().find(|c| c.id() == id)
    }

    /// Clip animator of a character.
    #[must_use]
    pub fn clips(&self, id: CharacterId) -> Option<&ClipHandle> {
        self.entries.iter().find(|e| e.character.id() == id).map(|e| &e.clips)
    }

    /// Shared services (rest areas, events, counters).
    #[must_use]
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Counter snapshot.
    #[must_use]
    pub fn counters(&self) -> CounterSnapshot {
        self.services.counters.snapshot()
    }

    /// Where a new member of `group` appears, and the waypoint index it
    /// appears on. Waypoint groups spawn on a random waypoint of their list.
    fn spawn_point(&mut self, group: &GroupConfig) -> (Vec3, Option<usize>) {
        if !group.waypoints.is_empty() {
            let index = self.rng.gen_range(0..group.waypoints.len());
            return (group.waypoints[index], Some(index));
        }
        if let Some(path) = self.paths.get(&group.role) {
            return (path.point_at(0.0, EndOfPath::Stop), None);
        }
        let position = Vec3::new(
            self.rng.gen_range(self.bounds.min.x..=self.bounds.max.x),
            self.bounds.min.y,
            self.rng.gen_range(self.bounds.min.z..=self.bounds.max.z),
        );
        (position, None)
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("characters", &self.entries.len())
            .field("frames", &self.frames)
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

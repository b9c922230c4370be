//! Integration tests: full dispatch flows against scripted adapters.
//!
//! Covers role gating, idempotent transitions, lifecycle and stimulus
//! intake, the patrol and path loops, wandering, following and the complete
//! resting handshake.

mod support;

use std::f32::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use glam::{Quat, Vec3};
use strider_core::anim::params;
use strider_core::{
    AnimationEvent, Character, CharacterBuilder, CharacterId, Contact, ContactKind, CustomEventKind, Delivery,
    EndOfPath, Lifecycle, MovementConfig, PathSpline, RestArea, RestAreaId, RestPhase, Role, RoleCommand, Services,
    StateId, Stimulus, Transform, tags,
};
use support::{AnimHandle, NavHandle};

const DT: f32 = 0.5;

fn character(id: u32, role: Role, nav: &NavHandle, anim: &AnimHandle) -> CharacterBuilder {
    Character::builder(CharacterId(id), role)
        .nav(nav.agent())
        .animator(anim.animator())
        .seed(42)
}

fn bench(services: &mut Services) -> RestAreaId {
    services
        .rest_areas
        .add(RestArea::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 3.0), 1.5))
}

fn tick(c: &mut Character, services: &mut Services) {
    c.tick(&mut services.env(DT));
}

fn enter(c: &mut Character, services: &mut Services, area: RestAreaId) {
    c.on_trigger(ContactKind::Enter, Contact::rest_area(area), &mut services.env(DT));
}

fn leave(c: &mut Character, services: &mut Services, area: RestAreaId) {
    c.on_trigger(ContactKind::Exit, Contact::rest_area(area), &mut services.env(DT));
}

// ---------------------------------------------------------------------------
// Role gating
// ---------------------------------------------------------------------------

#[test]
fn unsupported_capabilities_change_nothing() {
    let unsupported: [(Role, &[RoleCommand]); 6] = [
        (Role::Elder, &[RoleCommand::Patrol, RoleCommand::Follow]),
        (
            Role::Runner,
            &[RoleCommand::Wander, RoleCommand::Rest, RoleCommand::StopResting, RoleCommand::Follow],
        ),
        (
            Role::PathRunner,
            &[RoleCommand::Wander, RoleCommand::Rest, RoleCommand::StopResting, RoleCommand::Follow],
        ),
        (
            Role::ZenDummy,
            &[RoleCommand::Wander, RoleCommand::Patrol, RoleCommand::Rest, RoleCommand::StopResting, RoleCommand::Follow],
        ),
        (
            Role::ZenMaster,
            &[RoleCommand::Wander, RoleCommand::Patrol, RoleCommand::Rest, RoleCommand::StopResting, RoleCommand::Follow],
        ),
        (
            Role::ZenPerson,
            &[RoleCommand::Wander, RoleCommand::Patrol, RoleCommand::Rest, RoleCommand::StopResting],
        ),
    ];

    for (role, commands) in unsupported {
        let mut services = Services::default();
        services.transforms.insert(CharacterId(99), Transform::at(Vec3::X));
        let nav = NavHandle::new();
        let anim = AnimHandle::new();
        let path = Arc::new(PathSpline::new(vec![Vec3::ZERO, Vec3::X * 4.0], false).expect("path"));
        let mut builder = character(1, role, &nav, &anim)
            .waypoints(vec![Vec3::ZERO, Vec3::X])
            .follow(CharacterId(99));
        if role == Role::PathRunner {
            builder = builder.path(path, EndOfPath::Loop);
        }
        let mut c = builder.build().expect("valid");
        tick(&mut c, &mut services);

        let state = c.state();
        let transitions = services.counters.snapshot().transitions;
        for &command in commands {
            let nav_before = nav.footprint();
            let anim_before = anim.calls();
            let transform_before = c.body().transform;
            c.invoke(command, &mut services.env(DT));
            assert_eq!(c.state(), state, "{role} changed state on {command:?}");
            assert_eq!(nav.footprint(), nav_before, "{role} touched navigation on {command:?}");
            assert_eq!(anim.calls(), anim_before, "{role} touched the animator on {command:?}");
            assert_eq!(c.body().transform, transform_before, "{role} moved on {command:?}");
            assert!(c.body().rest.is_none(), "{role} bound a rest area on {command:?}");
        }
        assert_eq!(services.counters.snapshot().transitions, transitions, "{role}");
        assert_eq!(services.events.raised(), 0, "{role}");
    }
}

#[test]
fn supported_idle_switches_state() {
    let mut services = Services::default();
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(1, Role::Runner, &nav, &anim)
        .waypoints(vec![Vec3::ZERO, Vec3::X])
        .build()
        .expect("valid");
    tick(&mut c, &mut services);
    assert_eq!(c.state(), StateId::Patrolling);

    c.invoke(RoleCommand::Idle, &mut services.env(DT));
    assert_eq!(c.state(), StateId::Idle);
}

// ---------------------------------------------------------------------------
// Transitions & lifecycle
// ---------------------------------------------------------------------------

#[test]
fn requesting_the_active_state_does_not_restart_it() {
    let mut services = Services::default();
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(1, Role::Runner, &nav, &anim)
        .waypoints(vec![Vec3::ZERO, Vec3::X, Vec3::Z])
        .build()
        .expect("valid");
    tick(&mut c, &mut services);
    assert_eq!(nav.destinations().len(), 1);

    c.invoke(RoleCommand::Patrol, &mut services.env(DT));
    c.invoke(RoleCommand::Patrol, &mut services.env(DT));

    assert_eq!(nav.destinations().len(), 1);
    let counters = services.counters.snapshot();
    assert_eq!(counters.transitions, 1);
    assert_eq!(counters.redundant_requests, 2);
}

#[test]
fn start_waits_for_permit_and_runs_once() {
    let mut services = Services::default();
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(1, Role::Elder, &nav, &anim).held().build().expect("valid");

    tick(&mut c, &mut services);
    tick(&mut c, &mut services);
    assert_eq!(c.lifecycle(), Lifecycle::Spawned);
    assert_eq!(anim.rebinds(), 0);

    c.permit_start();
    for _ in 0..3 {
        tick(&mut c, &mut services);
    }
    assert_eq!(c.lifecycle(), Lifecycle::Active);
    assert_eq!(c.state(), StateId::Wandering);
    assert_eq!(anim.rebinds(), 1);
    assert_eq!(services.counters.snapshot().starts, 1);
    assert_eq!(services.counters.snapshot().ticks, 5);
}

#[test]
fn stimuli_before_start_are_dropped() {
    let mut services = Services::default();
    let area = bench(&mut services);
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(1, Role::Elder, &nav, &anim).held().build().expect("valid");

    enter(&mut c, &mut services, area);
    c.enqueue(Stimulus::Trigger(ContactKind::Enter, Contact::rest_area(area)));
    tick(&mut c, &mut services);

    assert!(!services.rest_areas.get(area).expect("area").is_occupied());
    assert_eq!(services.counters.snapshot().stimuli_before_start, 2);
    assert_eq!(c.pending(), 0);
}

#[test]
fn own_contacts_are_filtered() {
    let mut services = Services::default();
    let area = bench(&mut services);
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(7, Role::Elder, &nav, &anim).build().expect("valid");
    tick(&mut c, &mut services);

    let own = Contact {
        tag: tags::REST_AREA.to_string(),
        owner: Some(CharacterId(7)),
        rest_area: Some(area),
    };
    c.on_trigger(ContactKind::Enter, own, &mut services.env(DT));
    c.on_collision(ContactKind::Stay, Contact::character(CharacterId(7)), &mut services.env(DT));

    assert_eq!(c.state(), StateId::Wandering);
    assert!(!services.rest_areas.get(area).expect("area").is_occupied());
    assert_eq!(services.counters.snapshot().stimuli_self_filtered, 2);
}

#[test]
fn queued_stimuli_apply_before_the_update() {
    let mut services = Services::default();
    let area = bench(&mut services);
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(1, Role::Elder, &nav, &anim).build().expect("valid");
    tick(&mut c, &mut services);

    c.enqueue(Stimulus::Trigger(ContactKind::Enter, Contact::rest_area(area)));
    assert_eq!(c.pending(), 1);
    tick(&mut c, &mut services);

    assert_eq!(c.pending(), 0);
    assert_eq!(c.state(), StateId::Resting);
    assert_eq!(nav.last_destination(), Some(Vec3::new(0.0, 0.0, 1.0)));
}

#[test]
fn missing_adapters_are_skipped() {
    let mut services = Services::default();
    let area = bench(&mut services);
    let mut c = Character::builder(CharacterId(1), Role::Elder).build().expect("valid");

    for _ in 0..3 {
        tick(&mut c, &mut services);
    }
    enter(&mut c, &mut services, area);
    tick(&mut c, &mut services);

    assert_eq!(c.state(), StateId::Resting);
    assert_eq!(c.rest_phase(), Some(RestPhase::Entering));
}

// ---------------------------------------------------------------------------
// Resting
// ---------------------------------------------------------------------------

#[test]
fn elder_rests_and_walks_out() {
    let mut services = Services::default();
    let area = bench(&mut services);
    let found = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&found);
    services.events.subscribe(CustomEventKind::SomethingFound, move |e| {
        assert_eq!(e.raiser, CharacterId(1));
        assert!((e.value - 2.0).abs() < f32::EPSILON);
        seen.fetch_add(1, Ordering::Relaxed);
        Delivery::Keep
    });

    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let movement = MovementConfig {
        resting_time: 2.0,
        ..MovementConfig::default()
    };
    let mut c = character(1, Role::Elder, &nav, &anim)
        .movement(movement)
        .build()
        .expect("valid");
    tick(&mut c, &mut services);
    assert_eq!(c.state(), StateId::Wandering);

    enter(&mut c, &mut services, area);
    assert_eq!(c.state(), StateId::Resting);
    assert_eq!(found.load(Ordering::Relaxed), 1);
    assert_eq!(services.rest_areas.get(area).and_then(RestArea::occupant), Some(CharacterId(1)));
    assert_eq!(nav.last_destination(), Some(Vec3::new(0.0, 0.0, 1.0)));

    // Still walking: nothing happens.
    tick(&mut c, &mut services);
    assert!(anim.bools(params::SITTING).is_empty());

    // Arrived, already facing the exit anchor: sit once.
    nav.arrive();
    c.body_mut().transform.position = Vec3::new(0.0, 0.0, 1.0);
    tick(&mut c, &mut services);
    tick(&mut c, &mut services);
    assert!(nav.state().stopped);
    assert_eq!(anim.bools(params::SITTING), vec![true]);

    // Out of phase: ignored.
    c.on_animation(AnimationEvent::StandingUpFinished, &mut services.env(DT));
    assert_eq!(c.rest_phase(), Some(RestPhase::Entering));

    c.on_animation(AnimationEvent::SittingFinished, &mut services.env(DT));
    assert_eq!(c.rest_phase(), Some(RestPhase::Seated));

    // Seated for the full resting time.
    for _ in 0..3 {
        tick(&mut c, &mut services);
    }
    assert_eq!(anim.bools(params::SITTING), vec![true]);
    tick(&mut c, &mut services);
    assert_eq!(anim.bools(params::SITTING), vec![true, false]);
    tick(&mut c, &mut services);
    assert_eq!(anim.bools(params::SITTING), vec![true, false]);

    c.on_animation(AnimationEvent::SittingFinished, &mut services.env(DT));
    assert_eq!(c.rest_phase(), Some(RestPhase::Seated));

    c.on_animation(AnimationEvent::StandingUpFinished, &mut services.env(DT));
    assert_eq!(c.rest_phase(), Some(RestPhase::Exiting));
    assert_eq!(nav.last_destination(), Some(Vec3::new(0.0, 0.0, 3.0)));
    assert!(!nav.state().stopped);

    tick(&mut c, &mut services);
    assert_eq!(c.state(), StateId::Resting);

    nav.arrive();
    tick(&mut c, &mut services);
    assert_eq!(c.state(), StateId::Wandering);
    assert!(c.body().rest.is_none());
    assert!(!services.rest_areas.get(area).expect("area").is_occupied());
}

#[test]
fn elder_turns_toward_exit_before_sitting() {
    let mut services = Services::default();
    let area = bench(&mut services);
    let nav = NavHandle::instant();
    let anim = AnimHandle::new();
    let mut c = character(1, Role::Elder, &nav, &anim)
        .transform(Transform {
            position: Vec3::new(0.0, 0.0, 1.0),
            rotation: Quat::from_rotation_y(PI),
        })
        .build()
        .expect("valid");
    tick(&mut c, &mut services);
    enter(&mut c, &mut services, area);

    tick(&mut c, &mut services);
    assert!(anim.bools(params::SITTING).is_empty());

    for _ in 0..20 {
        tick(&mut c, &mut services);
    }
    assert_eq!(anim.bools(params::SITTING), vec![true]);
    assert!((c.body().transform.forward() - Vec3::Z).length() < 0.1);
}

#[test]
fn occupied_area_declines_second_elder() {
    let mut services = Services::default();
    let area = bench(&mut services);
    let (nav_a, nav_b) = (NavHandle::new(), NavHandle::new());
    let anim = AnimHandle::new();
    let mut a = character(1, Role::Elder, &nav_a, &anim).build().expect("valid");
    let mut b = character(2, Role::Elder, &nav_b, &anim).build().expect("valid");
    tick(&mut a, &mut services);
    tick(&mut b, &mut services);

    enter(&mut a, &mut services, area);
    enter(&mut b, &mut services, area);

    assert_eq!(a.state(), StateId::Resting);
    assert_eq!(b.state(), StateId::Wandering);
    assert!(b.body().rest.is_none());
    let counters = services.counters.snapshot();
    assert_eq!(counters.claims_granted, 1);
    assert_eq!(counters.claims_declined, 1);

    leave(&mut a, &mut services, area);
    assert_eq!(a.state(), StateId::Wandering);
    assert!(!services.rest_areas.get(area).expect("area").is_occupied());

    enter(&mut b, &mut services, area);
    assert_eq!(b.state(), StateId::Resting);
}

#[test]
fn exit_of_another_area_keeps_the_claim() {
    let mut services = Services::default();
    let held = bench(&mut services);
    let other = services
        .rest_areas
        .add(RestArea::new(Vec3::new(9.0, 0.0, 0.0), Vec3::new(9.0, 0.0, 2.0), 1.0));
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(1, Role::Elder, &nav, &anim).build().expect("valid");
    tick(&mut c, &mut services);
    enter(&mut c, &mut services, held);

    enter(&mut c, &mut services, other);
    leave(&mut c, &mut services, other);

    assert_eq!(c.state(), StateId::Resting);
    assert_eq!(c.body().rest.map(|b| b.area), Some(held));
    assert!(!services.rest_areas.get(other).expect("area").is_occupied());
}

#[test]
fn resting_without_a_claim_stays_put() {
    let mut services = Services::default();
    let nav = NavHandle::instant();
    let anim = AnimHandle::new();
    let mut c = character(1, Role::ZenMaster, &nav, &anim)
        .initial_state(StateId::Resting)
        .build()
        .expect("valid");
    for _ in 0..3 {
        tick(&mut c, &mut services);
    }
    assert_eq!(c.state(), StateId::Resting);
    assert_eq!(c.rest_phase(), Some(RestPhase::Entering));
    assert!(anim.bools(params::SITTING).is_empty());
}

#[test]
fn retire_releases_claims() {
    let mut services = Services::default();
    let area = bench(&mut services);
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(1, Role::Elder, &nav, &anim).build().expect("valid");
    tick(&mut c, &mut services);
    enter(&mut c, &mut services, area);
    assert!(services.rest_areas.get(area).expect("area").is_occupied());

    c.retire(&mut services.env(DT));
    assert!(!services.rest_areas.get(area).expect("area").is_occupied());
}

// ---------------------------------------------------------------------------
// Patrolling
// ---------------------------------------------------------------------------

fn abc() -> Vec<Vec3> {
    vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 5.0)]
}

#[test]
fn runner_cycles_waypoints_forward() {
    let mut services = Services::default();
    let nav = NavHandle::instant();
    let anim = AnimHandle::new();
    let movement = MovementConfig {
        min_speed: 2.0,
        max_speed: 3.0,
        patrol_direction: Some(true),
        ..MovementConfig::default()
    };
    let mut c = character(1, Role::Runner, &nav, &anim)
        .movement(movement)
        .waypoints(abc())
        .build()
        .expect("valid");
    for _ in 0..4 {
        tick(&mut c, &mut services);
    }

    let [a, b, c_] = [abc()[0], abc()[1], abc()[2]];
    assert_eq!(nav.destinations(), vec![b, c_, a, b]);

    let state = nav.state();
    assert!((2.0..=3.0).contains(&state.speed));
    assert!((state.acceleration - state.speed * 2.0).abs() < 1e-5);
}

#[test]
fn runner_cycles_waypoints_backward() {
    let mut services = Services::default();
    let nav = NavHandle::instant();
    let anim = AnimHandle::new();
    let movement = MovementConfig {
        patrol_direction: Some(false),
        ..MovementConfig::default()
    };
    let mut c = character(1, Role::Runner, &nav, &anim)
        .movement(movement)
        .waypoints(abc())
        .build()
        .expect("valid");
    for _ in 0..3 {
        tick(&mut c, &mut services);
    }
    assert_eq!(nav.destinations(), vec![abc()[2], abc()[1], abc()[0]]);
}

#[test]
fn runner_waits_until_arrival() {
    let mut services = Services::default();
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(1, Role::Runner, &nav, &anim)
        .waypoints(abc())
        .build()
        .expect("valid");
    nav.state().velocity = Vec3::new(3.0, 0.0, 4.0);
    for _ in 0..3 {
        tick(&mut c, &mut services);
    }
    assert_eq!(nav.destinations().len(), 1);
    assert_eq!(anim.last_float(params::SPEED), Some(5.0));

    nav.state().pending = true;
    nav.state().remaining = 0.0;
    tick(&mut c, &mut services);
    assert_eq!(nav.destinations().len(), 1);

    nav.arrive();
    tick(&mut c, &mut services);
    assert_eq!(nav.destinations().len(), 2);
}

#[test]
fn path_runner_rides_the_path_and_survives_its_removal() {
    let mut services = Services::default();
    let nav = NavHandle::instant();
    let anim = AnimHandle::new();
    let path = Arc::new(PathSpline::new(vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)], false).expect("path"));
    let movement = MovementConfig {
        min_speed: 2.0,
        max_speed: 2.0,
        ..MovementConfig::default()
    };
    let mut c = character(1, Role::PathRunner, &nav, &anim)
        .movement(movement)
        .path(path, EndOfPath::Loop)
        .build()
        .expect("valid");

    tick(&mut c, &mut services);
    assert_eq!(c.state(), StateId::PathPatrolling);
    assert_eq!(nav.last_destination(), Some(Vec3::ZERO));

    tick(&mut c, &mut services);
    tick(&mut c, &mut services);
    let position = c.body().transform.position;
    assert!((position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-4);
    assert!((c.body().transform.forward() - Vec3::X).length() < 1e-4);
    assert!(nav.state().stopped);
    assert_eq!(anim.last_float(params::SPEED), Some(2.0));

    c.body_mut().detach_path();
    let warps = nav.state().warps.len();
    tick(&mut c, &mut services);
    tick(&mut c, &mut services);
    assert_eq!(c.state(), StateId::PathPatrolling);
    assert_eq!(c.body().transform.position, position);
    assert_eq!(nav.state().warps.len(), warps);
    assert!(nav.state().stopped);
}

// ---------------------------------------------------------------------------
// Wandering
// ---------------------------------------------------------------------------

#[test]
fn wander_samples_within_radius() {
    let mut services = Services::default();
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(1, Role::Elder, &nav, &anim).build().expect("valid");
    tick(&mut c, &mut services);

    let destination = nav.last_destination().expect("picked");
    assert!(destination.length() <= MovementConfig::default().wander_radius + 1e-4);

    // Travel distance above the stopping distance: keep walking.
    tick(&mut c, &mut services);
    assert_eq!(nav.destinations().len(), 1);

    nav.arrive();
    tick(&mut c, &mut services);
    assert_eq!(nav.destinations().len(), 2);
}

#[test]
fn wander_offset_falls_back_to_mirrored_sample() {
    let mut services = Services::default();
    let nav = NavHandle::new();
    nav.state().reject_samples = 1;
    let anim = AnimHandle::new();
    let origin = Vec3::new(3.0, 0.0, -2.0);
    let movement = MovementConfig {
        wander_offset: 4.0,
        ..MovementConfig::default()
    };
    let mut c = character(1, Role::Elder, &nav, &anim)
        .movement(movement)
        .transform(Transform::at(origin))
        .build()
        .expect("valid");
    tick(&mut c, &mut services);

    let samples = nav.state().samples.clone();
    assert_eq!(samples.len(), 2);
    assert!((samples[1] - (origin * 2.0 - samples[0])).length() < 1e-4);
    assert_eq!(nav.last_destination(), Some(samples[1]));
}

#[test]
fn wander_retries_after_double_miss() {
    let mut services = Services::default();
    let nav = NavHandle::new();
    nav.state().reject_samples = 2;
    let anim = AnimHandle::new();
    let movement = MovementConfig {
        wander_offset: 1.0,
        ..MovementConfig::default()
    };
    let mut c = character(1, Role::Elder, &nav, &anim)
        .movement(movement)
        .build()
        .expect("valid");
    tick(&mut c, &mut services);
    assert!(nav.destinations().is_empty());

    tick(&mut c, &mut services);
    assert_eq!(nav.destinations().len(), 1);
}

#[test]
fn wander_stopping_distance_overrides_agent() {
    let mut services = Services::default();
    let nav = NavHandle::new();
    nav.state().travel = 2.0;
    let anim = AnimHandle::new();
    let movement = MovementConfig {
        wander_stopping_distance: 3.0,
        ..MovementConfig::default()
    };
    let mut c = character(1, Role::Elder, &nav, &anim)
        .movement(movement)
        .build()
        .expect("valid");
    tick(&mut c, &mut services);
    tick(&mut c, &mut services);
    assert_eq!(nav.destinations().len(), 2);
}

// ---------------------------------------------------------------------------
// Scripted roles
// ---------------------------------------------------------------------------

#[test]
fn zen_person_mirrors_its_target() {
    let mut services = Services::default();
    let lead = CharacterId(1);
    services.transforms.insert(lead, Transform::at(Vec3::new(5.0, 0.0, 5.0)));
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(2, Role::ZenPerson, &nav, &anim)
        .transform(Transform::at(Vec3::new(6.0, 0.0, 5.0)))
        .follow(lead)
        .build()
        .expect("valid");
    tick(&mut c, &mut services);
    assert_eq!(c.state(), StateId::Following);

    let turned = Quat::from_rotation_y(PI / 2.0);
    services.transforms.insert(
        lead,
        Transform {
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: turned,
        },
    );
    tick(&mut c, &mut services);
    let t = c.body().transform;
    assert!((t.position - Vec3::new(11.0, 0.0, 0.0)).length() < 1e-5);
    assert!(t.rotation.abs_diff_eq(turned.inverse() * Quat::from_rotation_y(PI), 1e-5));

    services.transforms.remove(lead);
    tick(&mut c, &mut services);
    assert_eq!(c.state(), StateId::Idle);
}

#[test]
fn zen_person_without_target_goes_idle() {
    let mut services = Services::default();
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(2, Role::ZenPerson, &nav, &anim).build().expect("valid");
    tick(&mut c, &mut services);
    assert_eq!(c.state(), StateId::Idle);
    assert_eq!(anim.rebinds(), 1);
}

#[test]
fn zen_master_enters_its_configured_state() {
    let mut services = Services::default();
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(1, Role::ZenMaster, &nav, &anim)
        .initial_state(StateId::Wandering)
        .build()
        .expect("valid");
    assert_eq!(c.state(), StateId::Wandering);
    assert!(nav.destinations().is_empty());

    tick(&mut c, &mut services);
    assert_eq!(nav.destinations().len(), 1);
    assert_eq!(services.counters.snapshot().transitions, 1);
}

#[test]
fn zen_dummy_stands_still_without_animating() {
    let mut services = Services::default();
    let nav = NavHandle::new();
    let anim = AnimHandle::new();
    let mut c = character(1, Role::ZenDummy, &nav, &anim)
        .initial_state(StateId::Wandering)
        .build()
        .expect("valid");
    for _ in 0..3 {
        tick(&mut c, &mut services);
    }
    assert_eq!(c.state(), StateId::Idle);
    assert!(anim.calls().is_empty());
    assert!(nav.destinations().is_empty());
}

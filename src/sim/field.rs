//! The bubble field
//!
//! Owns every bubble, spawns them, moves them, bounces them off the screen
//! edges, pushes overlapping pairs apart and pops them on click.
//!
//! The host drives it with two entry points:
//! - `update(dt)` once per rendered frame (pop-in animations, delayed tasks)
//! - `fixed_update(dt)` once per fixed physics step (movement, collisions)

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::{Camera, ViewBounds};
use super::collision::{bounce_into, separation_impulse};
use super::schedule::Scheduler;
use super::state::{Bubble, BubbleId, BubbleState, GameEvent};
use crate::settings::FieldConfig;

/// Delayed field actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTask {
    /// Spawn a replacement bubble
    Spawn,
    /// Drop a popped bubble once its pop animation is over
    Despawn(BubbleId),
}

/// All bubbles and the rules that move them
#[derive(Debug, Clone)]
pub struct BubbleField {
    config: FieldConfig,
    camera: Camera,
    bounds: ViewBounds,
    /// Live bubbles (spawning + active), in spawn order
    bubbles: Vec<Bubble>,
    /// Popped bubbles still playing their pop animation
    popping: Vec<Bubble>,
    tasks: Scheduler<FieldTask>,
    events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl BubbleField {
    /// Create an empty field. Call `populate` to fill it.
    pub fn new(config: FieldConfig, camera: Camera, seed: u64) -> Self {
        Self {
            config,
            bounds: camera.bounds(),
            camera,
            bubbles: Vec::new(),
            popping: Vec::new(),
            tasks: Scheduler::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Move/resize the view; bounds follow immediately
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.bounds = camera.bounds();
    }

    pub fn bounds(&self) -> ViewBounds {
        self.bounds
    }

    /// Live bubbles in spawn order
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// Popped bubbles still on screen
    pub fn popping(&self) -> &[Bubble] {
        &self.popping
    }

    pub fn get(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BubbleId) -> Option<&mut Bubble> {
        self.bubbles.iter_mut().find(|b| b.id == id)
    }

    pub fn live_count(&self) -> usize {
        self.bubbles.len()
    }

    /// Live bubbles plus popped ones still playing their pop animation.
    ///
    /// A popped bubble leaves this count only when it despawns.
    pub fn on_screen_count(&self) -> usize {
        self.bubbles.len() + self.popping.len()
    }

    pub fn active_count(&self) -> usize {
        self.bubbles.iter().filter(|b| b.is_active()).count()
    }

    /// Replacement spawns waiting in the task queue
    pub fn pending_spawns(&self) -> usize {
        self.tasks.count(|t| *t == FieldTask::Spawn)
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn bubbles until the field is full
    pub fn populate(&mut self) {
        while self.spawn().is_some() {}
        log::debug!("Field populated with {} bubbles", self.bubbles.len());
    }

    /// Create a bubble at a random visible point, heading in a random direction.
    ///
    /// Returns `None` when the field is already at `max_bubbles`.
    pub fn spawn(&mut self) -> Option<BubbleId> {
        if self.bubbles.len() >= self.config.max_bubbles {
            log::debug!("Spawn skipped, field full ({})", self.config.max_bubbles);
            return None;
        }

        let id = BubbleId(self.next_id);
        self.next_id += 1;

        let pos = self.bounds.random_point(&mut self.rng);
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        let vel = Vec2::from_angle(angle) * self.config.bubble_speed;

        let mut bubble = Bubble::new(id, pos, vel, self.config.bubble_radius);
        bubble.kind = if self.config.kind_count > 0 {
            self.rng.random_range(0..self.config.kind_count)
        } else {
            0
        };
        bubble.face = if self.config.face_count > 0 {
            Some(self.rng.random_range(0..self.config.face_count))
        } else {
            None
        };

        log::debug!("Spawned bubble {} at ({:.2}, {:.2})", id.0, pos.x, pos.y);
        self.bubbles.push(bubble);
        self.events.push(GameEvent::BubbleSpawned { id, pos });
        Some(id)
    }

    /// Per-frame pass: pop-in timers and delayed tasks
    pub fn update(&mut self, dt: f32) {
        let duration = self.config.pop_in_duration;
        for bubble in &mut self.bubbles {
            if bubble.advance_spawn(dt, duration) {
                self.events.push(GameEvent::BubbleReady {
                    id: bubble.id,
                    pos: bubble.pos,
                });
            }
        }

        for task in self.tasks.advance(dt) {
            match task {
                FieldTask::Spawn => {
                    self.spawn();
                }
                FieldTask::Despawn(id) => {
                    self.popping.retain(|b| b.id != id);
                }
            }
        }
    }

    /// Fixed physics step: move, bounce, then resolve overlaps
    pub fn fixed_update(&mut self, dt: f32) {
        self.step(dt);
        self.resolve_collisions();
    }

    /// Integrate active bubbles and bounce them off the view edges
    pub fn step(&mut self, dt: f32) {
        let bounds = self.bounds;
        for bubble in self.bubbles.iter_mut().filter(|b| b.is_active()) {
            bubble.pos += bubble.vel * dt;
            bubble.update_flip();
            bounce_into(&mut bubble.pos, &mut bubble.vel, &bounds);
        }
    }

    /// Push apart every overlapping, approaching pair of active bubbles
    pub fn resolve_collisions(&mut self) {
        let count = self.bubbles.len();
        for i in 0..count {
            if !self.bubbles[i].is_active() {
                continue;
            }
            for j in (i + 1)..count {
                if !self.bubbles[j].is_active() {
                    continue;
                }
                let (head, tail) = self.bubbles.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];

                if let Some(impulse) =
                    separation_impulse(a.pos, a.vel, a.radius, b.pos, b.vel, b.radius)
                {
                    a.vel += impulse;
                    b.vel -= impulse;
                }
            }
        }
    }

    /// Active bubbles whose center is within the pop radius of `point`
    pub fn hit_test(&self, point: Vec2) -> Vec<BubbleId> {
        let radius = self.config.pop_radius;
        self.bubbles
            .iter()
            .filter(|b| b.is_active() && b.pos.distance(point) < radius)
            .map(|b| b.id)
            .collect()
    }

    /// Pop everything under `point`. Returns whether anything popped;
    /// a miss is reported as `GameEvent::ClickMissed`.
    pub fn click(&mut self, point: Vec2) -> bool {
        let hits = self.hit_test(point);
        if hits.is_empty() {
            self.events.push(GameEvent::ClickMissed { point });
            return false;
        }

        // Newest first, ids collected up front so removal can't skip anything
        for id in hits.into_iter().rev() {
            self.pop(id);
        }
        true
    }

    /// Remove a live bubble, start its pop animation and schedule a replacement.
    ///
    /// Returns false if `id` isn't live.
    pub fn pop(&mut self, id: BubbleId) -> bool {
        let Some(index) = self.bubbles.iter().position(|b| b.id == id) else {
            return false;
        };

        let mut bubble = self.bubbles.remove(index);
        bubble.state = BubbleState::Popping;
        let pos = bubble.pos;
        self.popping.push(bubble);

        self.tasks.schedule(self.config.pop_linger, FieldTask::Despawn(id));
        if self.config.respawn_on_pop {
            self.tasks.schedule(self.config.respawn_delay, FieldTask::Spawn);
        }

        log::debug!("Popped bubble {} at ({:.2}, {:.2})", id.0, pos.x, pos.y);
        self.events.push(GameEvent::BubblePopped { id, pos });
        true
    }

    /// Raise the bubble speed and bring every live bubble up to it
    pub fn boost_speed(&mut self, delta: f32) {
        self.config.bubble_speed = (self.config.bubble_speed + delta).max(0.0);
        let speed = self.config.bubble_speed;
        for bubble in &mut self.bubbles {
            // A stopped bubble has no direction to keep
            if bubble.vel != Vec2::ZERO {
                bubble.vel = bubble.vel.normalize_or_zero() * speed;
            }
        }
        log::info!("Bubble speed raised to {speed:.2}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config(max_bubbles: usize) -> FieldConfig {
        FieldConfig {
            max_bubbles,
            ..FieldConfig::default()
        }
    }

    fn field(max_bubbles: usize) -> BubbleField {
        BubbleField::new(config(max_bubbles), Camera::default(), 12345)
    }

    /// Put an active bubble at a known spot
    fn place(field: &mut BubbleField, pos: Vec2, vel: Vec2) -> BubbleId {
        let id = field.spawn().expect("room for bubble");
        let bubble = field.get_mut(id).unwrap();
        bubble.pos = pos;
        bubble.vel = vel;
        bubble.state = BubbleState::Active;
        id
    }

    #[test]
    fn test_spawn_inside_bounds_at_speed() {
        let mut field = field(10);
        field.populate();
        assert_eq!(field.live_count(), 10);

        let bounds = field.bounds();
        for bubble in field.bubbles() {
            assert!(bounds.contains(bubble.pos));
            assert!((bubble.vel.length() - field.config().bubble_speed).abs() < 1e-4);
            assert!(bubble.is_spawning());
            assert!(bubble.kind < field.config().kind_count);
        }
    }

    #[test]
    fn test_spawn_respects_max() {
        let mut field = field(2);
        assert!(field.spawn().is_some());
        assert!(field.spawn().is_some());
        assert!(field.spawn().is_none());
        assert_eq!(field.live_count(), 2);
    }

    #[test]
    fn test_no_faces_configured() {
        let mut config = config(1);
        config.face_count = 0;
        config.kind_count = 0;
        let mut field = BubbleField::new(config, Camera::default(), 1);
        let id = field.spawn().unwrap();
        let bubble = field.get(id).unwrap();
        assert_eq!(bubble.face, None);
        assert_eq!(bubble.kind, 0);
    }

    #[test]
    fn test_same_seed_same_field() {
        let mut a = BubbleField::new(config(5), Camera::default(), 99);
        let mut b = BubbleField::new(config(5), Camera::default(), 99);
        a.populate();
        b.populate();
        for (x, y) in a.bubbles().iter().zip(b.bubbles()) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.vel, y.vel);
        }
    }

    #[test]
    fn test_pop_in_then_moves() {
        let mut field = field(1);
        let id = field.spawn().unwrap();
        let start = field.get(id).unwrap().pos;
        field.drain_events();

        // Still spawning: physics leaves it alone
        field.fixed_update(0.02);
        assert_eq!(field.get(id).unwrap().pos, start);
        assert!(field.hit_test(start).is_empty());

        field.update(field.config().pop_in_duration);
        assert!(field.get(id).unwrap().is_active());
        assert!(matches!(
            field.drain_events().as_slice(),
            [GameEvent::BubbleReady { .. }]
        ));

        field.fixed_update(0.02);
        assert_ne!(field.get(id).unwrap().pos, start);
    }

    #[test]
    fn test_step_bounces_off_right_edge() {
        let mut field = field(1);
        let max_x = field.bounds().max.x;
        let id = place(&mut field, Vec2::new(max_x - 0.05, 0.0), Vec2::new(5.0, 1.0));

        field.step(0.02);
        let bubble = field.get(id).unwrap();
        assert_eq!(bubble.pos.x, max_x);
        assert_eq!(bubble.vel, Vec2::new(-5.0, 1.0));
        // Flip is decided from the velocity before the bounce
        assert!(!bubble.flip_x);

        field.step(0.02);
        assert!(field.get(id).unwrap().flip_x);
    }

    #[test]
    fn test_zero_velocity_never_bounces() {
        let mut field = field(1);
        let id = place(&mut field, Vec2::new(1.0, 1.0), Vec2::ZERO);
        for _ in 0..100 {
            field.step(0.02);
        }
        let bubble = field.get(id).unwrap();
        assert_eq!(bubble.pos, Vec2::new(1.0, 1.0));
        assert_eq!(bubble.vel, Vec2::ZERO);
    }

    #[test]
    fn test_camera_move_updates_bounds() {
        let mut field = field(1);
        let id = place(&mut field, Vec2::ZERO, Vec2::new(0.0, 1.0));
        field.set_camera(Camera::new(Vec2::new(100.0, 0.0), 5.0, 1.0));

        field.step(0.02);
        let bubble = field.get(id).unwrap();
        assert_eq!(bubble.pos.x, 95.0);
        assert!(field.bounds().contains(bubble.pos));
    }

    #[test]
    fn test_mirrored_camera_keeps_bubbles_inside() {
        let mut field = BubbleField::new(config(10), Camera::for_screen(-1280.0, 720.0, 5.0), 7);
        field.populate();
        field.update(1.0);
        for _ in 0..200 {
            field.fixed_update(0.02);
        }
        assert_eq!(field.active_count(), 10);
        assert!(field.bubbles().iter().all(|b| field.bounds().contains(b.pos)));
    }

    #[test]
    fn test_collision_stops_approach() {
        let mut field = field(2);
        let a = place(&mut field, Vec2::new(0.4, 0.0), Vec2::new(-2.0, 0.0));
        let b = place(&mut field, Vec2::new(-0.4, 0.0), Vec2::new(2.0, 0.0));

        field.resolve_collisions();
        let va = field.get(a).unwrap().vel;
        let vb = field.get(b).unwrap().vel;
        assert!((va - vb).dot(Vec2::X).abs() < 1e-5);
    }

    #[test]
    fn test_spawning_bubbles_do_not_collide() {
        let mut field = field(2);
        let a = place(&mut field, Vec2::ZERO, Vec2::new(-1.0, 0.0));
        let b = field.spawn().unwrap();
        {
            let bubble = field.get_mut(b).unwrap();
            bubble.pos = Vec2::new(-0.2, 0.0);
            bubble.vel = Vec2::new(1.0, 0.0);
        }

        field.resolve_collisions();
        assert_eq!(field.get(a).unwrap().vel, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_hit_test_radius() {
        let mut field = field(2);
        let id = place(&mut field, Vec2::new(1.0, 1.0), Vec2::X);
        let r = field.config().pop_radius;

        assert_eq!(field.hit_test(Vec2::new(1.0, 1.0)), vec![id]);
        assert_eq!(field.hit_test(Vec2::new(1.0 + r * 0.9, 1.0)), vec![id]);
        assert!(field.hit_test(Vec2::new(1.0 + r * 1.1, 1.0)).is_empty());
    }

    #[test]
    fn test_center_hit_with_zero_pop_radius_setting() {
        let settings = crate::Settings::from_json(r#"{ "field": { "pop_radius": 0.0 } }"#).unwrap();
        let mut field = BubbleField::new(settings.field, Camera::default(), 3);
        let id = place(&mut field, Vec2::new(-2.0, 1.5), Vec2::X);
        assert_eq!(field.hit_test(Vec2::new(-2.0, 1.5)), vec![id]);
    }

    #[test]
    fn test_click_pops_all_overlapping() {
        let mut field = field(3);
        let a = place(&mut field, Vec2::new(0.1, 0.0), Vec2::X);
        let b = place(&mut field, Vec2::new(-0.1, 0.0), Vec2::X);
        let far = place(&mut field, Vec2::new(3.0, 3.0), Vec2::X);
        field.drain_events();

        assert!(field.click(Vec2::ZERO));
        assert!(field.get(a).is_none());
        assert!(field.get(b).is_none());
        assert!(field.get(far).is_some());
        assert_eq!(field.popping().len(), 2);

        let popped = field
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::BubblePopped { .. }))
            .count();
        assert_eq!(popped, 2);
    }

    #[test]
    fn test_click_miss_reports_event() {
        let mut field = field(1);
        place(&mut field, Vec2::new(3.0, 3.0), Vec2::X);
        field.drain_events();

        assert!(!field.click(Vec2::new(-3.0, -3.0)));
        assert_eq!(
            field.drain_events(),
            vec![GameEvent::ClickMissed {
                point: Vec2::new(-3.0, -3.0)
            }]
        );
    }

    #[test]
    fn test_pop_schedules_exactly_one_respawn() {
        let mut field = field(3);
        let ids: Vec<_> = (0..3)
            .map(|i| place(&mut field, Vec2::new(i as f32 * 2.0, 0.0), Vec2::X))
            .collect();

        assert!(field.pop(ids[1]));
        assert_eq!(field.live_count(), 2);
        assert_eq!(field.pending_spawns(), 1);

        field.update(0.0);
        assert_eq!(field.live_count(), 3);
        assert_eq!(field.pending_spawns(), 0);
    }

    #[test]
    fn test_pop_unknown_is_noop() {
        let mut field = field(1);
        assert!(!field.pop(BubbleId(404)));
        assert_eq!(field.pending_spawns(), 0);
    }

    #[test]
    fn test_popped_bubble_lingers_then_despawns() {
        let mut field = field(1);
        let id = place(&mut field, Vec2::ZERO, Vec2::X);
        field.pop(id);
        assert_eq!(field.popping()[0].state, BubbleState::Popping);

        field.update(field.config().pop_linger * 0.5);
        assert_eq!(field.popping().len(), 1);
        field.update(field.config().pop_linger);
        assert!(field.popping().is_empty());
    }

    #[test]
    fn test_on_screen_count_drops_at_despawn() {
        let mut field = field(2);
        let id = place(&mut field, Vec2::ZERO, Vec2::X);
        place(&mut field, Vec2::new(3.0, 0.0), Vec2::X);
        assert!(field.pop(id));
        field.update(0.0);
        // Replacement spawned, popped bubble still lingering
        assert_eq!(field.live_count(), 2);
        assert_eq!(field.on_screen_count(), 3);

        field.update(field.config().pop_linger + 0.01);
        assert_eq!(field.on_screen_count(), 2);
    }

    #[test]
    fn test_no_respawn_when_disabled() {
        let mut config = config(1);
        config.respawn_on_pop = false;
        let mut field = BubbleField::new(config, Camera::default(), 1);
        let id = place(&mut field, Vec2::ZERO, Vec2::X);
        field.pop(id);
        field.update(1.0);
        assert_eq!(field.live_count(), 0);
    }

    #[test]
    fn test_live_count_holds_over_many_pops() {
        let mut field = field(10);
        field.populate();
        for _ in 0..200 {
            field.update(0.02);
            field.fixed_update(0.02);
            let target = field.bubbles().iter().find(|b| b.is_active()).map(|b| b.pos);
            if let Some(pos) = target {
                field.click(pos);
            }
            assert!(field.live_count() <= 10);
            assert_eq!(field.live_count() + field.pending_spawns(), 10);
        }
    }

    #[test]
    fn test_boost_speed_rescales() {
        let mut field = field(2);
        let moving = place(&mut field, Vec2::ZERO, Vec2::new(3.0, 4.0));
        let still = place(&mut field, Vec2::ONE, Vec2::ZERO);
        let speed = field.config().bubble_speed;

        field.boost_speed(1.0);
        assert!((field.get(moving).unwrap().vel.length() - (speed + 1.0)).abs() < 1e-4);
        assert_eq!(field.get(still).unwrap().vel, Vec2::ZERO);
    }

    fn arb_bubble() -> impl Strategy<Value = (f32, f32, f32, f32)> {
        (0.0f32..1.0, 0.0f32..1.0, -20.0f32..20.0, -20.0f32..20.0)
    }

    proptest! {
        #[test]
        fn prop_positions_stay_in_bounds(
            bubbles in prop::collection::vec(arb_bubble(), 1..12),
            dts in prop::collection::vec(0.001f32..0.1, 1..150),
        ) {
            let mut field = field(bubbles.len());
            let bounds = field.bounds();
            for (u, v, vx, vy) in &bubbles {
                let pos = bounds.min + bounds.size() * Vec2::new(*u, *v);
                place(&mut field, pos, Vec2::new(*vx, *vy));
            }

            for dt in &dts {
                field.fixed_update(*dt);
                for bubble in field.bubbles() {
                    prop_assert!(bounds.contains(bubble.pos), "escaped: {:?}", bubble.pos);
                }
            }
        }

        #[test]
        fn prop_bounce_inverts_one_axis_per_crossing(
            u in 0.0f32..1.0,
            v in 0.0f32..1.0,
            vx in -20.0f32..20.0,
            vy in -20.0f32..20.0,
            dt in 0.001f32..0.1,
        ) {
            let mut field = field(1);
            let bounds = field.bounds();
            let pos = bounds.min + bounds.size() * Vec2::new(u, v);
            let id = place(&mut field, pos, Vec2::new(vx, vy));

            let projected = pos + Vec2::new(vx, vy) * dt;
            let (exit_x, exit_y) = bounds.exits(projected);

            field.step(dt);
            let vel = field.get(id).unwrap().vel;
            prop_assert_eq!(vel.x, if exit_x { -vx } else { vx });
            prop_assert_eq!(vel.y, if exit_y { -vy } else { vy });
        }

        #[test]
        fn prop_collision_never_increases_approach(
            angle in 0.0f32..std::f32::consts::TAU,
            gap in 0.05f32..0.95,
            va in (-10.0f32..10.0, -10.0f32..10.0),
            vb in (-10.0f32..10.0, -10.0f32..10.0),
        ) {
            let mut field = field(2);
            let offset = Vec2::from_angle(angle) * gap;
            let a = place(&mut field, offset, Vec2::new(va.0, va.1));
            let b = place(&mut field, Vec2::ZERO, Vec2::new(vb.0, vb.1));

            let normal = offset.normalize();
            let before = (Vec2::new(va.0, va.1) - Vec2::new(vb.0, vb.1)).dot(normal);

            field.resolve_collisions();
            let after = (field.get(a).unwrap().vel - field.get(b).unwrap().vel).dot(normal);

            prop_assert!(after >= before - 1e-3);
            if before < 0.0 {
                // Approach is cancelled
                prop_assert!(after.abs() < 1e-3);
            }
        }

        #[test]
        fn prop_hit_test_center_and_outside(
            u in 0.0f32..1.0,
            v in 0.0f32..1.0,
            angle in 0.0f32..std::f32::consts::TAU,
            extra in 0.01f32..5.0,
        ) {
            let mut field = field(1);
            let bounds = field.bounds();
            let pos = bounds.min + bounds.size() * Vec2::new(u, v);
            let id = place(&mut field, pos, Vec2::X);

            prop_assert_eq!(field.hit_test(pos), vec![id]);

            let far = pos + Vec2::from_angle(angle) * (field.config().pop_radius + extra);
            prop_assert!(field.hit_test(far).is_empty());
        }
    }
}

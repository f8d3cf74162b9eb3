//! Game import interface — services the host engine provides to the game module.
//!
//! Everything the weapon can't compute on its own goes through here: world
//! traces, sounds, impact visuals, the rope effect and console variables.
//! The host passes an implementation into every entry point; nothing in the
//! game keeps a reference to it between calls.

use std::cell::Cell;

use grapple_common::q_shared::{Trace, Vec3};

/// Handle to a host-side visual effect (the rope). Owned by whoever created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectHandle(pub u32);

/// Functions provided by the engine to the game module.
pub trait GameImport {
    // Printing
    fn dprintf(&self, msg: &str);

    // Sound
    fn sound(&self, ent_idx: i32, channel: i32, name: &str, volume: f32, attenuation: f32);

    // Models
    fn setmodel(&self, _ent_idx: i32, _name: &str) {}

    // Collision
    /// Sweep a box from `start` to `end`. `passent` and anything it owns,
    /// such as the weapon it holds, never block the sweep.
    fn trace(&self, start: &Vec3, mins: &Vec3, maxs: &Vec3, end: &Vec3, passent: i32, contentmask: i32) -> Trace;

    /// Every surface the box touches between `start` and `end`, nearest first.
    /// Hosts that can only report the first hit fall back to a single trace.
    fn trace_all(&self, start: &Vec3, mins: &Vec3, maxs: &Vec3, end: &Vec3, passent: i32, contentmask: i32) -> Vec<Trace> {
        let tr = self.trace(start, mins, maxs, end, passent, contentmask);
        if tr.hit() { vec![tr] } else { Vec::new() }
    }

    /// Impact visuals for the surface a trace stopped on.
    fn impact(&self, _trace: &Trace) {}

    // Effects
    fn effect_create(&self, name: &str) -> EffectHandle;
    fn effect_destroy(&self, handle: EffectHandle, immediate: bool);
    fn effect_set_position(&self, handle: EffectHandle, point: i32, origin: &Vec3);
    fn effect_attach(&self, handle: EffectHandle, point: i32, ent_idx: i32, attachment: &str);

    // Cvars
    /// Get or register a cvar, returning its current value.
    fn cvar(&self, var_name: &str, value: &str, flags: i32) -> f32;

    // Debug overlays
    fn debug_line(&self, _start: &Vec3, _end: &Vec3, _duration: f32) {}
    fn debug_sphere(&self, _center: &Vec3, _radius: f32, _duration: f32) {}
    fn debug_axis(&self, _origin: &Vec3, _angles: &Vec3, _length: f32, _duration: f32) {}
}

/// Open-air host: nothing to hit, sounds and effects go nowhere, printing
/// and cvars route to the grapple_common singletons. Game prints only show
/// with `developer` set.
#[derive(Default)]
pub struct StubGameImport {
    next_effect: Cell<u32>,
}

impl GameImport for StubGameImport {
    fn dprintf(&self, msg: &str) {
        grapple_common::common::com_dprintf(msg);
    }

    fn sound(&self, _ent_idx: i32, _channel: i32, _name: &str, _volume: f32, _attenuation: f32) {}

    fn trace(&self, _start: &Vec3, _mins: &Vec3, _maxs: &Vec3, end: &Vec3, _passent: i32, _contentmask: i32) -> Trace {
        Trace::no_hit(end)
    }

    fn effect_create(&self, _name: &str) -> EffectHandle {
        let id = self.next_effect.get() + 1;
        self.next_effect.set(id);
        EffectHandle(id)
    }
    fn effect_destroy(&self, _handle: EffectHandle, _immediate: bool) {}
    fn effect_set_position(&self, _handle: EffectHandle, _point: i32, _origin: &Vec3) {}
    fn effect_attach(&self, _handle: EffectHandle, _point: i32, _ent_idx: i32, _attachment: &str) {}

    fn cvar(&self, var_name: &str, value: &str, flags: i32) -> f32 {
        grapple_common::cvar::cvar_get(var_name, value, flags)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! A recording host made of infinite planes, shared by the game tests.

    use super::*;
    use grapple_common::cvar::CvarContext;
    use grapple_common::q_shared::{dot_product, CPlane, CSurface, CONTENTS_SOLID, WORLD_ENTITY};

    const NO_ENTITY: i32 = -1;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Sweeps stop this far short of a surface.
    pub const DIST_EPSILON: f32 = 0.03125;

    /// Solid on the side of the plane opposite its normal.
    #[derive(Clone, Copy)]
    pub struct Wall {
        pub normal: Vec3,
        pub dist: f32,
        /// Entity reported by traces that stop here, -1 for no body.
        pub ent: i32,
        pub owner: i32,
    }

    #[derive(Default)]
    pub struct PlaneWorld {
        pub walls: Vec<Wall>,
        pub cvars: RefCell<CvarContext>,
        pub sounds: RefCell<Vec<String>>,
        pub impacts: Cell<u32>,
        pub prints: RefCell<Vec<String>>,
        pub traces: Cell<u32>,
        pub live_effects: RefCell<HashMap<u32, Vec<(i32, Vec3)>>>,
        pub attachments: RefCell<Vec<(u32, i32, i32, String)>>,
        pub created: Cell<u32>,
        pub destroyed: Cell<u32>,
        pub debug_draws: Cell<u32>,
    }

    impl PlaneWorld {
        pub fn open() -> Self {
            Self::default()
        }

        pub fn with_wall(mut self, normal: Vec3, dist: f32) -> Self {
            self.walls.push(Wall { normal, dist, ent: WORLD_ENTITY, owner: NO_ENTITY });
            self
        }

        /// A surface that blocks traces but has no physical body behind it.
        pub fn with_bodiless_wall(mut self, normal: Vec3, dist: f32) -> Self {
            self.walls.push(Wall { normal, dist, ent: NO_ENTITY, owner: NO_ENTITY });
            self
        }

        /// A solid entity `ent` belonging to `owner`.
        pub fn with_owned_wall(mut self, normal: Vec3, dist: f32, ent: i32, owner: i32) -> Self {
            self.walls.push(Wall { normal, dist, ent, owner });
            self
        }

        pub fn set_cvar(&self, name: &str, value: &str) {
            self.cvars.borrow_mut().set(name, value);
        }

        pub fn sound_count(&self, name: &str) -> usize {
            self.sounds.borrow().iter().filter(|s| s.as_str() == name).count()
        }

        pub fn live_effect_count(&self) -> usize {
            self.live_effects.borrow().len()
        }

        fn sweep(&self, start: &Vec3, mins: &Vec3, maxs: &Vec3, end: &Vec3, passent: i32) -> Vec<Trace> {
            let mut hits: Vec<Trace> = self
                .walls
                .iter()
                .filter(|w| w.ent != passent && w.owner != passent)
                .filter_map(|w| {
                    // box corner that reaches furthest into the solid side
                    let offset: f32 = (0..3)
                        .map(|i| if w.normal[i] > 0.0 { mins[i] * w.normal[i] } else { maxs[i] * w.normal[i] })
                        .sum();
                    let ds = dot_product(start, &w.normal) + offset - w.dist;
                    let de = dot_product(end, &w.normal) + offset - w.dist;
                    if ds < 0.0 {
                        return Some(Trace {
                            startsolid: true,
                            fraction: 0.0,
                            endpos: *start,
                            plane: CPlane::from_normal(w.normal, w.dist),
                            surface: Some(CSurface::default()),
                            contents: CONTENTS_SOLID,
                            ent_index: w.ent,
                            ..Default::default()
                        });
                    }
                    if de >= 0.0 {
                        return None;
                    }
                    let fraction = ((ds - DIST_EPSILON) / (ds - de)).max(0.0);
                    let endpos = [
                        start[0] + fraction * (end[0] - start[0]),
                        start[1] + fraction * (end[1] - start[1]),
                        start[2] + fraction * (end[2] - start[2]),
                    ];
                    Some(Trace {
                        fraction,
                        endpos,
                        plane: CPlane::from_normal(w.normal, w.dist),
                        surface: Some(CSurface { name: "concrete".into(), ..Default::default() }),
                        contents: CONTENTS_SOLID,
                        ent_index: w.ent,
                        ..Default::default()
                    })
                })
                .collect();
            hits.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
            hits
        }
    }

    impl GameImport for PlaneWorld {
        fn dprintf(&self, msg: &str) {
            self.prints.borrow_mut().push(msg.to_string());
        }

        fn sound(&self, _ent_idx: i32, _channel: i32, name: &str, _volume: f32, _attenuation: f32) {
            self.sounds.borrow_mut().push(name.to_string());
        }

        fn trace(&self, start: &Vec3, mins: &Vec3, maxs: &Vec3, end: &Vec3, passent: i32, _contentmask: i32) -> Trace {
            self.traces.set(self.traces.get() + 1);
            self.sweep(start, mins, maxs, end, passent)
                .into_iter()
                .next()
                .unwrap_or_else(|| Trace::no_hit(end))
        }

        fn trace_all(&self, start: &Vec3, mins: &Vec3, maxs: &Vec3, end: &Vec3, passent: i32, _contentmask: i32) -> Vec<Trace> {
            self.traces.set(self.traces.get() + 1);
            self.sweep(start, mins, maxs, end, passent)
        }

        fn impact(&self, _trace: &Trace) {
            self.impacts.set(self.impacts.get() + 1);
        }

        fn effect_create(&self, _name: &str) -> EffectHandle {
            let id = self.created.get() + 1;
            self.created.set(id);
            self.live_effects.borrow_mut().insert(id, Vec::new());
            EffectHandle(id)
        }

        fn effect_destroy(&self, handle: EffectHandle, _immediate: bool) {
            if self.live_effects.borrow_mut().remove(&handle.0).is_some() {
                self.destroyed.set(self.destroyed.get() + 1);
            }
        }

        fn effect_set_position(&self, handle: EffectHandle, point: i32, origin: &Vec3) {
            if let Some(points) = self.live_effects.borrow_mut().get_mut(&handle.0) {
                points.push((point, *origin));
            }
        }

        fn effect_attach(&self, handle: EffectHandle, point: i32, ent_idx: i32, attachment: &str) {
            self.attachments
                .borrow_mut()
                .push((handle.0, point, ent_idx, attachment.to_string()));
        }

        fn cvar(&self, var_name: &str, value: &str, flags: i32) -> f32 {
            let mut cvars = self.cvars.borrow_mut();
            cvars
                .get(var_name, value, flags)
                .map_or(0.0, |idx| cvars.cvar_vars[idx].value)
        }

        fn debug_line(&self, _start: &Vec3, _end: &Vec3, _duration: f32) {
            self.debug_draws.set(self.debug_draws.get() + 1);
        }
        fn debug_sphere(&self, _center: &Vec3, _radius: f32, _duration: f32) {
            self.debug_draws.set(self.debug_draws.get() + 1);
        }
    }

    #[test]
    fn test_plane_world_box_sweep_hits_floor() {
        let world = PlaneWorld::open().with_wall([0.0, 0.0, 1.0], 0.0);
        let tr = world.trace(&[0.0, 0.0, 100.0], &[-16.0, -16.0, -24.0], &[16.0, 16.0, 32.0], &[0.0, 0.0, 0.0], 1, 0);
        assert!(tr.hit());
        assert!((tr.endpos[2] - (24.0 + DIST_EPSILON)).abs() < 1e-3);
        assert_eq!(tr.plane.normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_plane_world_trace_all_sorted() {
        let world = PlaneWorld::open()
            .with_wall([-1.0, 0.0, 0.0], -100.0)
            .with_wall([-1.0, 0.0, 0.0], -50.0);
        let hits = world.trace_all(&[0.0; 3], &[0.0; 3], &[0.0; 3], &[200.0, 0.0, 0.0], 1, 0);
        assert_eq!(hits.len(), 2);
        assert!((hits[0].endpos[0] - (50.0 - DIST_EPSILON)).abs() < 1e-3);
        assert!((hits[1].endpos[0] - (100.0 - DIST_EPSILON)).abs() < 1e-3);
    }

    #[test]
    fn test_plane_world_skips_passent_and_its_belongings() {
        let world = PlaneWorld::open()
            .with_owned_wall([-1.0, 0.0, 0.0], -50.0, 2, 1)
            .with_owned_wall([-1.0, 0.0, 0.0], -60.0, 1, NO_ENTITY)
            .with_wall([-1.0, 0.0, 0.0], -100.0);
        let tr = world.trace(&[0.0; 3], &[0.0; 3], &[0.0; 3], &[200.0, 0.0, 0.0], 1, 0);
        assert_eq!(tr.ent_index, WORLD_ENTITY);
        assert!((tr.endpos[0] - (100.0 - DIST_EPSILON)).abs() < 1e-3);

        // anyone else is stopped by the held weapon
        let tr = world.trace(&[0.0; 3], &[0.0; 3], &[0.0; 3], &[200.0, 0.0, 0.0], 3, 0);
        assert_eq!(tr.ent_index, 2);
    }
}

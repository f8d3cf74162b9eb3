// g_phys.rs — player movement between grapple ticks

/*
Copyright (C) 1997-2001 Id Software, Inc.

This program is free software; you can redistribute it and/or
modify it under the terms of the GNU General Public License
as published by the Free Software Foundation; either version 2
of the License, or (at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.

See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program; if not, write to the Free Software
Foundation, Inc., 59 Temple Place - Suite 330, Boston, MA  02111-1307, USA.
*/

/*
The player is a falling box: gravity while airborne, one sweep along the
velocity that stops on the first solid surface and drops the part of the
velocity pointing into it, then a short trace downward to decide whether
it is standing on something. The grapple rewrites velocity before this
runs, so the box only ever moves where the rope allowed.
*/

use crate::g_local::*;
use crate::game_import::GameImport;

const STOP_EPSILON: f32 = 0.1;
/// Steepest surface that still counts as floor.
pub const MIN_FLOOR_NORMAL_Z: f32 = 0.7;
/// How far below the box to look for ground.
const GROUND_CHECK_DIST: f32 = 0.25;

/// `velocity` with its component into the surface removed. Motion away from
/// the surface is left alone.
pub fn clip_velocity(velocity: &Vec3, normal: &Vec3) -> Vec3 {
    let into = dot_product(velocity, normal);
    if into >= 0.0 {
        return *velocity;
    }

    let mut out = vector_ma(velocity, -into, normal);
    for v in out.iter_mut() {
        if v.abs() < STOP_EPSILON {
            *v = 0.0;
        }
    }
    out
}

pub fn add_gravity(ent: &mut Edict, gravity: f32, frametime: f32) {
    ent.velocity[2] -= gravity * frametime;
}

/// Sweep the box along its velocity for `time` seconds and stop at the first
/// blocking surface. Returns the trace of the sweep.
pub fn move_box(ent: &mut Edict, gi: &dyn GameImport, time: f32, mask: i32) -> Trace {
    let end = vector_ma(&ent.s.origin, time, &ent.velocity);
    let trace = gi.trace(&ent.s.origin, &ent.mins, &ent.maxs, &end, ent.s.number, mask);

    if trace.allsolid || trace.startsolid {
        // stuck inside something
        ent.velocity = VEC3_ORIGIN;
        return trace;
    }

    ent.s.origin = trace.endpos;
    if !trace.hit() {
        return trace;
    }

    ent.velocity = clip_velocity(&ent.velocity, &trace.plane.normal);
    if trace.plane.normal[2] >= MIN_FLOOR_NORMAL_Z && trace.has_body() {
        ent.groundentity = Some(trace.ent_index);
    }
    trace
}

/// Look just below the box for something to stand on.
pub fn categorize_position(ent: &mut Edict, gi: &dyn GameImport) {
    // rising, either jumping or pulled up by the rope
    if ent.velocity[2] > 0.0 {
        ent.groundentity = None;
        return;
    }

    let point = [ent.s.origin[0], ent.s.origin[1], ent.s.origin[2] - GROUND_CHECK_DIST];
    let trace = gi.trace(&ent.s.origin, &ent.mins, &ent.maxs, &point, ent.s.number, MASK_PLAYERSOLID);

    if !trace.hit() || trace.plane.normal[2] < MIN_FLOOR_NORMAL_Z || !trace.has_body() {
        ent.groundentity = None;
        return;
    }

    ent.groundentity = Some(trace.ent_index);
    if !trace.startsolid {
        ent.s.origin = trace.endpos;
    }
    if ent.velocity[2] < 0.0 {
        ent.velocity[2] = 0.0;
    }
}

/// One tick of player movement.
pub fn physics_player(ent: &mut Edict, gi: &dyn GameImport, frametime: f32, gravity: f32) {
    if frametime <= 0.0 {
        return;
    }

    if ent.groundentity.is_none() {
        add_gravity(ent, gravity, frametime);
    }

    move_box(ent, gi, frametime, MASK_PLAYERSOLID);
    categorize_position(ent, gi);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_import::testing::{PlaneWorld, DIST_EPSILON};

    fn floor_world() -> PlaneWorld {
        PlaneWorld::open().with_wall([0.0, 0.0, 1.0], 0.0)
    }

    #[test]
    fn test_clip_velocity_floor() {
        assert_eq!(clip_velocity(&[100.0, 0.0, -200.0], &[0.0, 0.0, 1.0]), [100.0, 0.0, 0.0]);
    }

    #[test]
    fn test_clip_velocity_wall() {
        assert_eq!(clip_velocity(&[100.0, 50.0, 0.0], &[-1.0, 0.0, 0.0]), [0.0, 50.0, 0.0]);
    }

    #[test]
    fn test_clip_velocity_leaves_separating_motion() {
        assert_eq!(clip_velocity(&[10.0, 0.0, 300.0], &[0.0, 0.0, 1.0]), [10.0, 0.0, 300.0]);
    }

    #[test]
    fn test_clip_velocity_snaps_tiny_components() {
        assert_eq!(clip_velocity(&[0.05, -0.05, -10.0], &[0.0, 0.0, 1.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_free_fall_in_open_air() {
        let gi = PlaneWorld::open();
        let mut ent = Edict::player(1, [0.0, 0.0, 100.0]);
        physics_player(&mut ent, &gi, 0.1, 800.0);
        assert!((ent.velocity[2] + 80.0).abs() < 1e-3);
        assert!((ent.s.origin[2] - 92.0).abs() < 1e-3);
        assert!(ent.groundentity.is_none());
    }

    #[test]
    fn test_landing_on_floor() {
        let gi = floor_world();
        let mut ent = Edict::player(1, [0.0, 0.0, 30.0]);
        ent.velocity = [50.0, 0.0, -300.0];
        physics_player(&mut ent, &gi, 0.1, 800.0);

        assert_eq!(ent.groundentity, Some(WORLD_ENTITY));
        assert!((ent.s.origin[2] - (24.0 + DIST_EPSILON)).abs() < 1e-3);
        assert_eq!(ent.velocity[2], 0.0);
        // slides on along the floor
        assert!(ent.velocity[0] > 0.0);
    }

    #[test]
    fn test_standing_skips_gravity() {
        let gi = floor_world();
        let mut ent = Edict::player(1, [0.0, 0.0, 24.0 + DIST_EPSILON]);
        ent.groundentity = Some(WORLD_ENTITY);
        physics_player(&mut ent, &gi, 0.1, 800.0);
        assert_eq!(ent.velocity, [0.0; 3]);
        assert_eq!(ent.groundentity, Some(WORLD_ENTITY));
    }

    #[test]
    fn test_upward_velocity_leaves_ground() {
        let gi = floor_world();
        let mut ent = Edict::player(1, [0.0, 0.0, 24.0 + DIST_EPSILON]);
        ent.groundentity = Some(WORLD_ENTITY);
        ent.velocity = [0.0, 0.0, 200.0];
        physics_player(&mut ent, &gi, 0.1, 800.0);
        assert!(ent.groundentity.is_none());
        assert!(ent.s.origin[2] > 24.0 + 19.0);
    }

    #[test]
    fn test_wall_stops_and_slides() {
        // wall at x = 100 facing -x
        let gi = PlaneWorld::open().with_wall([-1.0, 0.0, 0.0], -100.0);
        let mut ent = Edict::player(1, [50.0, 0.0, 0.0]);
        ent.groundentity = Some(WORLD_ENTITY);
        ent.velocity = [1000.0, 300.0, 0.0];
        let trace = move_box(&mut ent, &gi, 0.1, MASK_PLAYERSOLID);

        // stops where it touched, the rest of the tick is not spent sliding
        assert!(trace.hit());
        assert!((ent.s.origin[0] - (84.0 - DIST_EPSILON)).abs() < 1e-3);
        assert!((ent.s.origin[1] - 30.0 * trace.fraction).abs() < 1e-3);
        assert_eq!(ent.velocity, [0.0, 300.0, 0.0]);
        // a wall is not ground, the old ground is kept
        assert_eq!(ent.groundentity, Some(WORLD_ENTITY));
    }

    #[test]
    fn test_stuck_box_stops_dead() {
        let gi = floor_world();
        let mut ent = Edict::player(1, [0.0, 0.0, 10.0]);
        ent.velocity = [100.0, 0.0, -50.0];
        move_box(&mut ent, &gi, 0.1, MASK_PLAYERSOLID);
        assert_eq!(ent.velocity, VEC3_ORIGIN);
        assert_eq!(ent.s.origin, [0.0, 0.0, 10.0]);
    }

    #[test]
    fn test_steep_slope_is_not_ground() {
        let gi = PlaneWorld::open().with_wall([0.8, 0.0, 0.6], 0.0);
        let mut ent = Edict::player(1, [0.0, 0.0, 50.0]);
        ent.velocity = [0.0, 0.0, -100.0];
        physics_player(&mut ent, &gi, 0.1, 800.0);
        // slid off the slope instead of standing on it
        assert!(ent.groundentity.is_none());
        assert!(ent.velocity[0] > 0.0);
    }

    #[test]
    fn test_zero_frametime_does_nothing() {
        let gi = PlaneWorld::open();
        let mut ent = Edict::player(1, [0.0, 0.0, 100.0]);
        ent.velocity = [1.0, 2.0, 3.0];
        physics_player(&mut ent, &gi, 0.0, 800.0);
        assert_eq!(ent.velocity, [1.0, 2.0, 3.0]);
        assert_eq!(ent.s.origin, [0.0, 0.0, 100.0]);
    }
}

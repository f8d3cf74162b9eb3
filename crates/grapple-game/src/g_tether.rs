// g_tether.rs — tether constraint and wall-avoidance steering
//
// Pure vector math for one grapple tick. The weapon gathers the inputs
// (position, velocity, anchor, rope length, obstruction hits) from the host and
// writes the returned velocity back onto the actor.

use grapple_common::q_shared::{
    cross_product, vector_add, vector_length, vector_ma, vector_normalize, vector_scale,
    vector_subtract, Trace, Vec3, VEC3_UP,
};

/// The rope never gets shorter than this.
pub const MIN_ROPE_LENGTH: f32 = 120.0;
/// Half-extent of the box swept when looking for an anchor.
pub const TRACE_SIZE: f32 = 6.0;
/// How far ahead, as a fraction of velocity, to look for obstructions.
pub const OBSTRUCTION_LOOKAHEAD: f32 = 0.3;
/// How strongly obstructions steer the actor, scaled by its speed.
pub const WALL_AVOIDANCE_BIAS_WEIGHT: f32 = 0.15;

/// Rope length for a fresh anchor: the current distance, but never below the floor.
pub fn initial_rope_length(origin: &Vec3, anchor: &Vec3) -> f32 {
    clamp_rope_length(vector_length(&vector_subtract(anchor, origin)))
}

pub fn clamp_rope_length(length: f32) -> f32 {
    length.max(MIN_ROPE_LENGTH)
}

/// Reel in by `rate`. A negative rate reels in nothing.
pub fn retract_rope(length: f32, rate: f32) -> f32 {
    clamp_rope_length(length - rate.max(0.0))
}

/// Pull `goal` back onto the sphere of radius `rope_length` around `anchor`
/// if it strayed outside. Points inside the sphere are returned unchanged.
pub fn constrain_to_tether(goal: &Vec3, anchor: &Vec3, rope_length: f32) -> Vec3 {
    let mut dir = vector_subtract(goal, anchor);
    let dist = vector_normalize(&mut dir);
    if dist > rope_length {
        vector_ma(anchor, rope_length, &dir)
    } else {
        *goal
    }
}

/// Sum of hit normals, each weighted by how vertical its surface is.
///
/// `|n × up|` is 0 for floors and ceilings and 1 for walls, so the actor is
/// steered away from walls without being pushed off the ground.
pub fn avoidance_bias<'a, I>(hits: I) -> Vec3
where
    I: IntoIterator<Item = &'a Trace>,
{
    hits.into_iter()
        .filter(|tr| tr.hit())
        .fold([0.0; 3], |bias, tr| {
            let normal = &tr.plane.normal;
            let weight = vector_length(&cross_product(normal, &VEC3_UP));
            vector_ma(&bias, weight, normal)
        })
}

/// The avoidance part of the corrected velocity.
///
/// Uncapped when `max` is not positive, which lets speed build up when the
/// actor is pressed against a wall close to the anchor axis.
pub fn avoidance_velocity(speed: f32, bias: &Vec3, max: f32) -> Vec3 {
    let mut steer = vector_scale(bias, WALL_AVOIDANCE_BIAS_WEIGHT * speed);
    if max > 0.0 {
        let len = vector_length(&steer);
        if len > max {
            steer = vector_scale(&steer, max / len);
        }
    }
    steer
}

/// Inputs for one tether tick.
#[derive(Debug, Clone, Copy)]
pub struct TetherInput {
    pub origin: Vec3,
    pub velocity: Vec3,
    pub anchor: Vec3,
    pub rope_length: f32,
    pub frametime: f32,
}

/// Velocity that carries the actor to its constrained position over one
/// tick, plus steering away from obstructions.
///
/// Returns the input velocity untouched when `frametime` is not positive.
pub fn tether_velocity(input: &TetherInput, bias: &Vec3, avoid_max: f32) -> Vec3 {
    let dt = input.frametime;
    if dt <= 0.0 {
        return input.velocity;
    }

    let goal = vector_ma(&input.origin, dt, &input.velocity);
    let goal = constrain_to_tether(&goal, &input.anchor, input.rope_length);

    let travel = vector_scale(&vector_subtract(&goal, &input.origin), 1.0 / dt);
    let steer = avoidance_velocity(vector_length(&input.velocity), bias, avoid_max);
    vector_add(&travel, &steer)
}

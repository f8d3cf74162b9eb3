#![allow(clippy::float_cmp, clippy::needless_range_loop)]

pub mod q_shared;
pub mod cvar;
pub mod common;

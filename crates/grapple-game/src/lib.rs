#![allow(clippy::float_cmp, clippy::needless_range_loop, clippy::too_many_arguments)]
// Game module: the grappler weapon and the player it swings

pub mod game_import;
pub mod g_local;
pub mod g_tether;
pub mod g_phys;
pub mod p_weapon;
pub mod p_grapple;
pub mod g_main;

// p_grapple.rs — the Grappler: a hook that anchors to world geometry and
// swings its owner on a rope

use crate::g_local::*;
use crate::g_tether::{
    avoidance_bias, initial_rope_length, retract_rope, tether_velocity, TetherInput,
    MIN_ROPE_LENGTH, OBSTRUCTION_LOOKAHEAD, TRACE_SIZE,
};
use crate::game_import::{EffectHandle, GameImport};
use crate::p_weapon::Carriable;

// ============================================================
// Configuration
// ============================================================

const GRAPPLER_MAX_DIST: &str = "grappler_max_dist";
const GRAPPLER_RETRACT_RATE: &str = "grappler_retract_rate";
const GRAPPLER_AVOID_MAX: &str = "grappler_avoid_max";
const GRAPPLER_DEBUG: &str = "grappler_debug";

/// Rope-pull sound only plays while there is rope left to reel in.
const ROPE_PULL_EPSILON: f32 = 0.1;
/// Magnitude of the random view kick on a successful hook.
const HOOK_KICK: f32 = 2.0;
const DEBUG_DURATION: f32 = 45.0;

const ROPE_EFFECT: &str = "particles/grapple_rope.vpcf";
const MUZZLE_ATTACHMENT: &str = "muzzle";
const SOUND_HOOK: &str = "grappling_hook";
const SOUND_ROPE_PULL: &str = "rope_pull";

/// Tunables read from cvars every tick so console changes apply immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrapplerConfig {
    /// furthest point the hook can anchor to
    pub max_distance: f32,
    /// rope reeled in per tick while retracting
    pub retract_rate: f32,
    /// cap on the wall-avoidance velocity, 0 = uncapped
    pub avoid_max: f32,
    pub debug: bool,
}

impl Default for GrapplerConfig {
    fn default() -> Self {
        Self {
            max_distance: 1100.0,
            retract_rate: 9.0,
            avoid_max: 0.0,
            debug: false,
        }
    }
}

impl GrapplerConfig {
    /// Read (registering on first use) the grappler cvars.
    pub fn from_cvars(gi: &dyn GameImport) -> Self {
        Self {
            max_distance: gi.cvar(GRAPPLER_MAX_DIST, "1100", CVAR_SERVERINFO),
            retract_rate: gi.cvar(GRAPPLER_RETRACT_RATE, "9", CVAR_SERVERINFO),
            avoid_max: gi.cvar(GRAPPLER_AVOID_MAX, "0", CVAR_SERVERINFO),
            debug: gi.cvar(GRAPPLER_DEBUG, "0", CVAR_ZERO) != 0.0,
        }
    }
}

fn crandom_f32() -> f32 {
    rand::random::<f32>() * 2.0 - 1.0
}

// ============================================================
// Grappler
// ============================================================

#[derive(Debug, Clone)]
pub struct Grappler {
    pub ent_index: i32,
    /// only meaningful while `grappling`
    pub anchor_point: Vec3,
    pub rope_length: f32,
    pub grappling: bool,
    pub rope_effect: Option<EffectHandle>,
}

impl Default for Grappler {
    fn default() -> Self {
        Self {
            ent_index: -1,
            anchor_point: [0.0; 3],
            rope_length: MIN_ROPE_LENGTH,
            grappling: false,
            rope_effect: None,
        }
    }
}

impl Grappler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the rope is tied, while the hook is set.
    pub fn anchor(&self) -> Option<Vec3> {
        self.grappling.then_some(self.anchor_point)
    }

    /// Fire the hook along the owner's view. Returns false, changing nothing,
    /// when it hits nothing or hits something without a body.
    pub fn start_grappling(&mut self, gi: &dyn GameImport, owner: &mut Edict, cfg: &GrapplerConfig) -> bool {
        let eye = owner.eye_position();
        let end = vector_ma(&eye, cfg.max_distance, &owner.eye_forward());
        let size = [TRACE_SIZE; 3];
        let mins = vector_scale(&size, -1.0);

        let tr = gi.trace(&eye, &mins, &size, &end, owner.s.number, MASK_SOLID);
        if !tr.hit() || !tr.has_body() {
            return false;
        }

        self.anchor_point = tr.endpos;
        self.rope_length = initial_rope_length(&owner.s.origin, &self.anchor_point);
        self.grappling = true;
        owner.groundentity = None; // pull the owner off the ground if necessary

        owner.client.anim_priority = ANIM_ATTACK;
        owner.client.kick_angles = [crandom_f32() * HOOK_KICK, crandom_f32() * HOOK_KICK, 0.0];

        gi.sound(self.ent_index, CHAN_WEAPON, SOUND_HOOK, 1.0, ATTN_NORM);
        gi.impact(&tr);
        gi.dprintf(&format!(
            "grapple: anchored at {:?}, rope {:.1}\n",
            self.anchor_point, self.rope_length
        ));

        true
    }

    /// Let go. Safe to call when not grappling.
    pub fn stop_grappling(&mut self, gi: &dyn GameImport) {
        self.grappling = false;

        if let Some(handle) = self.rope_effect.take() {
            gi.effect_destroy(handle, true);
        }
    }

    fn retract(&mut self, gi: &dyn GameImport, owner: &mut Edict, cfg: &GrapplerConfig) {
        self.rope_length = retract_rope(self.rope_length, cfg.retract_rate);

        // don't stick the owner to the ground when they're trying to pull themselves up
        if owner.client.pressed(BUTTON_ATTACK2) {
            owner.groundentity = None;
        }

        if self.rope_length - MIN_ROPE_LENGTH > ROPE_PULL_EPSILON {
            gi.sound(self.ent_index, CHAN_AUTO, SOUND_ROPE_PULL, 1.0, ATTN_NORM);
        }
    }

    /// Every world surface in the owner's path over the lookahead window.
    fn scan_obstructions(&self, gi: &dyn GameImport, owner: &Edict) -> Vec<Trace> {
        let end = vector_ma(&owner.s.origin, OBSTRUCTION_LOOKAHEAD, &owner.velocity);
        gi.trace_all(&owner.s.origin, &owner.mins, &owner.maxs, &end, owner.s.number, MASK_SOLID)
    }

    /// Rewrite the owner's velocity so next tick keeps them on the rope.
    fn apply_tether(&self, gi: &dyn GameImport, level: &LevelLocals, owner: &mut Edict, cfg: &GrapplerConfig) {
        let obstructions = self.scan_obstructions(gi, owner);
        let bias = avoidance_bias(&obstructions);

        let input = TetherInput {
            origin: owner.s.origin,
            velocity: owner.velocity,
            anchor: self.anchor_point,
            rope_length: self.rope_length,
            frametime: level.frametime,
        };
        owner.velocity = tether_velocity(&input, &bias, cfg.avoid_max);
    }
}

impl Carriable for Grappler {
    fn classname(&self) -> &'static str {
        "weapon_grappler"
    }

    fn view_model(&self) -> &'static str {
        "weapons/rust_pistol/v_rust_pistol.vmdl"
    }

    fn world_model(&self) -> &'static str {
        "weapons/rust_pistol/rust_pistol.vmdl"
    }

    fn ent_index(&self) -> i32 {
        self.ent_index
    }

    fn set_ent_index(&mut self, number: i32) {
        self.ent_index = number;
    }

    fn active_start(&mut self, gi: &dyn GameImport, _owner: &mut Edict) {
        self.stop_grappling(gi);
    }

    fn active_end(&mut self, gi: &dyn GameImport, _owner: &mut Edict, _dropped: bool) {
        self.stop_grappling(gi);
    }

    fn simulate(&mut self, gi: &dyn GameImport, level: &LevelLocals, owner: &mut Edict) {
        let cfg = GrapplerConfig::from_cvars(gi);

        if cfg.debug && !vector_is_nearly_zero(&owner.velocity, 0.01) {
            gi.debug_axis(&owner.s.origin, &owner.s.angles, 6.0, DEBUG_DURATION);
        }

        if owner.client.pressed(BUTTON_ATTACK) && !self.grappling {
            if !self.start_grappling(gi, owner, &cfg) {
                return;
            }
            if cfg.debug {
                gi.debug_sphere(&self.anchor_point, 6.0, DEBUG_DURATION);
            }
        }

        if owner.client.released(BUTTON_ATTACK) {
            self.stop_grappling(gi);
        }

        if !self.grappling {
            return;
        }

        if cfg.debug {
            gi.debug_line(&owner.s.origin, &self.anchor_point, DEBUG_DURATION);
        }

        if owner.client.down(BUTTON_ATTACK2) {
            self.retract(gi, owner, &cfg);
        }

        self.apply_tether(gi, level, owner, &cfg);
    }

    fn frame(&mut self, gi: &dyn GameImport, _owner: &Edict) {
        if !self.grappling {
            return;
        }

        let handle = *self
            .rope_effect
            .get_or_insert_with(|| gi.effect_create(ROPE_EFFECT));
        gi.effect_attach(handle, 0, self.ent_index, MUZZLE_ATTACHMENT);
        gi.effect_set_position(handle, 1, &self.anchor_point);
    }
}

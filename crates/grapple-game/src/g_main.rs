// g_main.rs — game entry points and the fixed-timestep frame driver

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

use grapple_common::common::{DISTNAME, DISTVER};

use crate::g_local::*;
use crate::g_phys::physics_player;
use crate::game_import::GameImport;
use crate::p_grapple::{Grappler, GrapplerConfig};
use crate::p_weapon::{frame_weapon, give_weapon, think_weapon, use_weapon};

/// Tick length in milliseconds, matching `FRAMETIME`.
pub const FRAMETIME_MSEC: i32 = 100;
/// Ticks run by one `Driver::advance` before the backlog is dropped.
pub const MAX_TICKS_PER_ADVANCE: u32 = 5;

// ============================================================
// InitGame
// ============================================================

/// Register cvars, spawn the player at `origin`, and hand them the grappler.
pub fn init_game(gi: &dyn GameImport, origin: Vec3) -> GameContext {
    gi.dprintf("==== InitGame ====\n");
    gi.dprintf(&format!("{} v{:.2}\n", DISTNAME, DISTVER));

    gi.cvar("developer", "0", CVAR_ZERO);
    gi.cvar("sv_gravity", "800", CVAR_SERVERINFO);
    GrapplerConfig::from_cvars(gi);

    let mut ctx = GameContext::new(origin);
    let grappler = give_weapon(&mut ctx, gi, Box::new(Grappler::new()));
    use_weapon(&mut ctx, gi, grappler);

    ctx
}

// ============================================================
// RunFrame
// ============================================================

impl GameContext {
    /// Advances the world by one tick.
    pub fn run_frame(&mut self, gi: &dyn GameImport, cmd: &UserCmd) {
        self.level.framenum += 1;
        self.level.time = self.level.framenum as f32 * FRAMETIME;
        self.level.frametime = FRAMETIME;

        let client = &mut self.player.client;
        client.v_angle = cmd.angles;
        client.latch_buttons(cmd.buttons);
        self.player.s.angles = [0.0, cmd.angles[YAW], 0.0];

        think_weapon(self, gi);

        let gravity = gi.cvar("sv_gravity", "800", CVAR_SERVERINFO);
        physics_player(&mut self.player, gi, self.level.frametime, gravity);
    }

    /// Per render frame work; only the held weapon's visuals.
    pub fn render_frame(&mut self, gi: &dyn GameImport) {
        frame_weapon(self, gi);
    }
}

// ============================================================
// Driver
// ============================================================

/// Turns variable real time into whole simulation ticks.
#[derive(Debug, Clone)]
pub struct Driver {
    /// Real time not yet simulated, milliseconds.
    pub time_residual: i32,
    pub max_ticks: u32,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver {
    pub fn new() -> Self {
        Self {
            time_residual: 0,
            max_ticks: MAX_TICKS_PER_ADVANCE,
        }
    }

    /// Reset timing accumulator (e.g., on respawn).
    pub fn reset(&mut self) {
        self.time_residual = 0;
    }

    /// Run every tick that fits in `msec` of real time plus the leftover from
    /// earlier calls, then one render frame. Returns the ticks run.
    pub fn advance(&mut self, ctx: &mut GameContext, gi: &dyn GameImport, msec: i32, cmd: &UserCmd) -> u32 {
        self.time_residual = self.time_residual.saturating_add(msec.max(0));

        let mut ticks = 0;
        while self.time_residual >= FRAMETIME_MSEC && ticks < self.max_ticks {
            ctx.run_frame(gi, cmd);
            self.time_residual -= FRAMETIME_MSEC;
            ticks += 1;
        }

        if self.time_residual >= FRAMETIME_MSEC {
            gi.dprintf(&format!(
                "Driver: dropping {} msec of backlog\n",
                self.time_residual - self.time_residual % FRAMETIME_MSEC
            ));
            self.time_residual %= FRAMETIME_MSEC;
        }

        ctx.render_frame(gi);
        ticks
    }
}

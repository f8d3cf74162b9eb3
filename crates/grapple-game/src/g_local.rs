// g_local.rs — local definitions for the game module

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

pub use grapple_common::q_shared::*;

use crate::p_weapon::Carriable;

/// Length of one simulation tick, seconds.
pub const FRAMETIME: f32 = 0.1;

// animation priority
pub const ANIM_BASIC: i32 = 0;
pub const ANIM_JUMP: i32 = 2;
pub const ANIM_PAIN: i32 = 3;
pub const ANIM_ATTACK: i32 = 4;
pub const ANIM_DEATH: i32 = 5;

// player bounding box
pub const PLAYER_MINS: Vec3 = [-16.0, -16.0, -24.0];
pub const PLAYER_MAXS: Vec3 = [16.0, 16.0, 32.0];
pub const PLAYER_VIEWHEIGHT: i32 = 22;

/// Level state.
#[derive(Debug, Clone, Default)]
pub struct LevelLocals {
    pub framenum: i32,
    pub time: f32,
    /// delta time of the tick being simulated
    pub frametime: f32,
}

/// Networked part of an entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityState {
    pub number: i32,
    pub origin: Vec3,
    pub angles: Vec3,
    pub frame: i32,
}

/// Client data that survives weapon changes.
#[derive(Debug, Clone, Default)]
pub struct ClientPersistant {
    pub netname: String,
    pub weapon: Option<usize>,     // inventory index
    pub lastweapon: Option<usize>, // inventory index
}

/// Input and view state of the player controlling an entity.
#[derive(Debug, Clone, Default)]
pub struct GClient {
    pub pers: ClientPersistant,

    pub buttons: Buttons,
    pub oldbuttons: Buttons,
    pub latched_buttons: Buttons,
    pub newweapon: Option<usize>, // inventory index

    pub v_angle: Vec3,
    pub kick_angles: Vec3,
    pub anim_priority: i32,
}

impl GClient {
    /// Shift in this tick's buttons.
    pub fn latch_buttons(&mut self, buttons: Buttons) {
        self.oldbuttons = self.buttons;
        self.buttons = buttons;
        self.latched_buttons |= self.buttons & !self.oldbuttons;
    }

    /// Went down this tick.
    pub fn pressed(&self, button: Buttons) -> bool {
        self.buttons.contains(button) && !self.oldbuttons.contains(button)
    }

    /// Came up this tick.
    pub fn released(&self, button: Buttons) -> bool {
        !self.buttons.contains(button) && self.oldbuttons.contains(button)
    }

    /// Held this tick.
    pub fn down(&self, button: Buttons) -> bool {
        self.buttons.contains(button)
    }
}

/// A game entity. Only the player carries a client.
#[derive(Debug, Clone)]
pub struct Edict {
    pub s: EntityState,
    pub inuse: bool,
    pub classname: String,

    pub velocity: Vec3,
    pub mins: Vec3,
    pub maxs: Vec3,
    pub viewheight: i32,
    pub health: i32,
    /// entity standing on, None when airborne
    pub groundentity: Option<i32>,

    pub client: GClient,
}

impl Default for Edict {
    fn default() -> Self {
        Self {
            s: EntityState::default(),
            inuse: false,
            classname: String::new(),
            velocity: [0.0; 3],
            mins: PLAYER_MINS,
            maxs: PLAYER_MAXS,
            viewheight: PLAYER_VIEWHEIGHT,
            health: 100,
            groundentity: None,
            client: GClient::default(),
        }
    }
}

impl Edict {
    pub fn player(number: i32, origin: Vec3) -> Self {
        Self {
            s: EntityState { number, origin, ..Default::default() },
            inuse: true,
            classname: "player".to_string(),
            ..Default::default()
        }
    }

    pub fn eye_position(&self) -> Vec3 {
        let o = self.s.origin;
        [o[0], o[1], o[2] + self.viewheight as f32]
    }

    pub fn eye_forward(&self) -> Vec3 {
        angle_forward(&self.client.v_angle)
    }
}

/// Everything the game owns: level clock, the player, and the weapons it carries.
pub struct GameContext {
    pub level: LevelLocals,
    pub player: Edict,
    pub inventory: Vec<Box<dyn Carriable>>,
    /// next free entity number for spawned weapons
    pub num_edicts: i32,
}

impl GameContext {
    pub fn new(player_origin: Vec3) -> Self {
        Self {
            level: LevelLocals { frametime: FRAMETIME, ..Default::default() },
            player: Edict::player(1, player_origin),
            inventory: Vec::new(),
            num_edicts: 2,
        }
    }

    /// The weapon in the player's hands, if any.
    pub fn active_weapon(&self) -> Option<&dyn Carriable> {
        self.player
            .client
            .pers
            .weapon
            .and_then(|idx| self.inventory.get(idx))
            .map(|w| &**w)
    }
}

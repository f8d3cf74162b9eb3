// p_weapon.rs — carrying, switching and thinking for player weapons

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

use crate::g_local::*;
use crate::game_import::GameImport;

/// Something the player can hold. The driver calls these hooks; a weapon
/// never calls them on itself.
pub trait Carriable {
    fn classname(&self) -> &'static str;
    fn view_model(&self) -> &'static str;
    fn world_model(&self) -> &'static str;

    /// Entity number the host knows this weapon by.
    fn ent_index(&self) -> i32;
    fn set_ent_index(&mut self, number: i32);

    /// Placed into the world (or into an inventory).
    fn spawn(&mut self, gi: &dyn GameImport) {
        gi.setmodel(self.ent_index(), self.world_model());
    }

    /// Became the weapon in the owner's hands.
    fn active_start(&mut self, gi: &dyn GameImport, owner: &mut Edict);

    /// Holstered or dropped.
    fn active_end(&mut self, gi: &dyn GameImport, owner: &mut Edict, dropped: bool);

    /// One simulation tick while held.
    fn simulate(&mut self, gi: &dyn GameImport, level: &LevelLocals, owner: &mut Edict);

    /// One render frame while held.
    fn frame(&mut self, _gi: &dyn GameImport, _owner: &Edict) {}
}

// ============================================================
// Inventory
// ============================================================

/// Spawn a weapon into the player's inventory. Returns its inventory index.
pub fn give_weapon(ctx: &mut GameContext, gi: &dyn GameImport, mut weapon: Box<dyn Carriable>) -> usize {
    weapon.set_ent_index(ctx.num_edicts);
    ctx.num_edicts += 1;
    weapon.spawn(gi);
    gi.dprintf(&format!("{} given to {}\n", weapon.classname(), ctx.player.classname));
    ctx.inventory.push(weapon);
    ctx.inventory.len() - 1
}

/// Queue a switch to the weapon at `item_idx`; it is raised on the next think.
pub fn use_weapon(ctx: &mut GameContext, gi: &dyn GameImport, item_idx: usize) {
    if item_idx >= ctx.inventory.len() {
        gi.dprintf(&format!("use_weapon: no inventory item {}\n", item_idx));
        return;
    }

    let client = &mut ctx.player.client;
    // see if we're already using it
    if client.pers.weapon == Some(item_idx) {
        return;
    }
    client.newweapon = Some(item_idx);
}

/// The old weapon has been put away, so make the new one current.
pub fn change_weapon(ctx: &mut GameContext, gi: &dyn GameImport) {
    let client = &mut ctx.player.client;
    let old = client.pers.weapon;
    let new = client.newweapon.take();
    client.pers.lastweapon = old;
    client.pers.weapon = new;

    if let Some(w) = old.and_then(|idx| ctx.inventory.get_mut(idx)) {
        w.active_end(gi, &mut ctx.player, false);
    }

    let Some(w) = new.and_then(|idx| ctx.inventory.get_mut(idx)) else {
        // dead, or empty handed
        return;
    };
    ctx.player.client.anim_priority = ANIM_PAIN;
    w.active_start(gi, &mut ctx.player);
}

/// Throw a weapon out of the inventory. A held weapon is ended with
/// `dropped = true` first. Inventory indices above it shift down by one.
pub fn drop_weapon(ctx: &mut GameContext, gi: &dyn GameImport, item_idx: usize) -> Option<Box<dyn Carriable>> {
    if item_idx >= ctx.inventory.len() {
        return None;
    }

    if ctx.player.client.pers.weapon == Some(item_idx) {
        ctx.inventory[item_idx].active_end(gi, &mut ctx.player, true);
        ctx.player.client.pers.weapon = None;
    }

    let weapon = ctx.inventory.remove(item_idx);

    let fix = |slot: &mut Option<usize>| {
        *slot = match *slot {
            Some(i) if i == item_idx => None,
            Some(i) if i > item_idx => Some(i - 1),
            other => other,
        };
    };
    let pers = &mut ctx.player.client.pers;
    fix(&mut pers.weapon);
    fix(&mut pers.lastweapon);
    fix(&mut ctx.player.client.newweapon);

    Some(weapon)
}

// ============================================================
// Think
// ============================================================

/// Called once per simulation tick for the player.
pub fn think_weapon(ctx: &mut GameContext, gi: &dyn GameImport) {
    // if just died, put the weapon away
    if ctx.player.health < 1 && ctx.player.client.pers.weapon.is_some() {
        ctx.player.client.newweapon = None;
        change_weapon(ctx, gi);
        return;
    }

    if ctx.player.client.newweapon.is_some() {
        change_weapon(ctx, gi);
    }

    // call active weapon think routine
    if let Some(w) = ctx.player.client.pers.weapon.and_then(|idx| ctx.inventory.get_mut(idx)) {
        w.simulate(gi, &ctx.level, &mut ctx.player);
    }
}

/// Called once per render frame.
pub fn frame_weapon(ctx: &mut GameContext, gi: &dyn GameImport) {
    if let Some(w) = ctx.player.client.pers.weapon.and_then(|idx| ctx.inventory.get_mut(idx)) {
        w.frame(gi, &ctx.player);
    }
}

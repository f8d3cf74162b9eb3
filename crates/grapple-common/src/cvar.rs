// cvar.rs — console variables: tunables the host and the console can change

use crate::common::com_printf;
use crate::q_shared::CVAR_SERVERINFO;

use parking_lot::{const_mutex, Mutex};
use std::collections::HashMap;

/// A console variable.
#[derive(Debug, Clone)]
pub struct Cvar {
    pub name: String,
    pub string: String,
    pub flags: i32,
    pub value: f32,
}

fn parse_value(s: &str) -> f32 {
    s.trim().parse::<f32>().unwrap_or(0.0)
}

/// Name-indexed registry of cvars.
#[derive(Default)]
pub struct CvarContext {
    pub cvar_vars: Vec<Cvar>,
    /// name -> index in cvar_vars
    cvar_index: HashMap<String, usize>,
}

impl CvarContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Info strings are backslash-delimited, so these characters can't
    /// appear in replicated names or values.
    pub fn info_validate(s: &str) -> bool {
        !s.contains('\\') && !s.contains('"') && !s.contains(';')
    }

    pub fn find_var(&self, name: &str) -> Option<&Cvar> {
        self.cvar_index.get(name).map(|&idx| &self.cvar_vars[idx])
    }

    /// Float value of a cvar. Returns 0 if not found.
    pub fn variable_value(&self, name: &str) -> f32 {
        self.find_var(name).map_or(0.0, |var| var.value)
    }

    /// Get or create a cvar. If it already exists, the value is not changed
    /// but flags are OR'd in.
    pub fn get(&mut self, name: &str, value: &str, flags: i32) -> Option<usize> {
        let replicated = flags & CVAR_SERVERINFO != 0;
        if replicated && !Self::info_validate(name) {
            com_printf("invalid info cvar name\n");
            return None;
        }

        if let Some(&idx) = self.cvar_index.get(name) {
            self.cvar_vars[idx].flags |= flags;
            return Some(idx);
        }

        if replicated && !Self::info_validate(value) {
            com_printf("invalid info cvar value\n");
            return None;
        }

        let idx = self.cvar_vars.len();
        self.cvar_vars.push(Cvar {
            name: name.to_string(),
            string: value.to_string(),
            flags,
            value: parse_value(value),
        });
        self.cvar_index.insert(name.to_string(), idx);

        Some(idx)
    }

    /// Set a cvar, creating it with no flags if it doesn't exist yet.
    pub fn set(&mut self, name: &str, value: &str) -> Option<usize> {
        let Some(&idx) = self.cvar_index.get(name) else {
            return self.get(name, value, 0);
        };

        let var = &mut self.cvar_vars[idx];
        if var.flags & CVAR_SERVERINFO != 0 && !Self::info_validate(value) {
            com_printf("invalid info cvar value\n");
            return Some(idx);
        }

        var.string = value.to_string();
        var.value = parse_value(value);
        Some(idx)
    }
}

// ============================================================
// Global singleton and free-function wrappers
// ============================================================

static CVAR_CTX: Mutex<Option<CvarContext>> = const_mutex(None);

/// Get or create; returns the value. Creates the registry on first use.
pub fn cvar_get(name: &str, value: &str, flags: i32) -> f32 {
    let mut g = CVAR_CTX.lock();
    let ctx = g.get_or_insert_with(CvarContext::new);
    ctx.get(name, value, flags).map_or(0.0, |idx| ctx.cvar_vars[idx].value)
}

pub fn cvar_set(name: &str, value: &str) {
    CVAR_CTX.lock().get_or_insert_with(CvarContext::new).set(name, value);
}

pub fn cvar_variable_value(name: &str) -> f32 {
    CVAR_CTX.lock().as_ref().map_or(0.0, |c| c.variable_value(name))
}

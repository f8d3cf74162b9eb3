// common.rs — console printing shared by the game and host

use parking_lot::{const_mutex, Mutex};

/// Distribution name and version, printed at game init.
pub const DISTNAME: &str = "Grapple";
pub const DISTVER: f32 = 1.0;

// ============================================================
// Redirect buffer for com_printf
// ============================================================

static RD_BUFFER: Mutex<Option<String>> = const_mutex(None);

/// Begin capturing printed output into a buffer instead of stdout.
pub fn com_begin_redirect() {
    *RD_BUFFER.lock() = Some(String::new());
}

/// Stop capturing and return what was printed since `com_begin_redirect`.
pub fn com_end_redirect() -> Option<String> {
    RD_BUFFER.lock().take()
}

// ============================================================
// com_printf / com_dprintf
// ============================================================

/// General-purpose print function. Prints to stdout, or appends to the
/// redirect buffer if one is active.
pub fn com_printf(msg: &str) {
    {
        let mut buf = RD_BUFFER.lock();
        if let Some(ref mut s) = *buf {
            s.push_str(msg);
            return;
        }
    }
    print!("{}", msg);
}

/// Developer-only print, gated on the "developer" cvar.
pub fn com_dprintf(msg: &str) {
    if crate::cvar::cvar_variable_value("developer") == 0.0 {
        return;
    }
    com_printf(msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cvar::cvar_set;

    // Redirect and the developer cvar are process globals, so everything
    // touching them lives in this one test.
    #[test]
    fn test_dprintf_follows_developer() {
        com_begin_redirect();
        com_printf("grapple ");
        com_printf("ready\n");

        cvar_set("developer", "0");
        com_dprintf("hidden rope state\n");
        cvar_set("developer", "1");
        com_dprintf("shown rope state\n");
        cvar_set("developer", "0");

        let out = com_end_redirect().unwrap_or_default();
        assert!(out.contains("grapple ready\n"));
        assert!(out.contains("shown rope state\n"));
        assert!(!out.contains("hidden rope state"));
        assert!(com_end_redirect().is_none());
    }
}

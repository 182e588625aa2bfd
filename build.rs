// glshare/build.rs
//
//! The `glshare` build script.

use cfg_aliases::cfg_aliases;

fn main() {
    // Setup aliases for #[cfg] checks
    cfg_aliases! {
        // The native WGL backend is only built on Windows.
        wgl: { target_os = "windows" },
    }
}

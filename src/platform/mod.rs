// glshare/src/platform/mod.rs
//
//! Platform-specific backends.

pub mod generic;

#[cfg(wgl)]
pub mod windows;
#[cfg(wgl)]
pub use windows::wgl as default;

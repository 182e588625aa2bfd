// glshare/src/platform/windows/mod.rs
//
//! Windows backends.

pub mod wgl;

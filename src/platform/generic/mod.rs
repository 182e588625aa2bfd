// glshare/src/platform/generic/mod.rs
//
//! Backends that work on any platform.

#[cfg(any(test, feature = "sm-test"))]
pub mod fake;

// glshare/src/lib.rs
//
//! Shared, versioned OpenGL contexts on Windows.
//!
//! WGL only hands out `wglChoosePixelFormatARB` and `wglCreateContextAttribsARB` once some legacy
//! context has been made current on the calling thread. `SharedContext::init` runs that dance on
//! a disposable window, then uses the two functions to give a target window a full pixel format
//! and a core-profile context that can share textures, buffers and programs with a context made
//! on another thread. An external renderer then drives the context through the native handles
//! returned by `SharedContext::native_context`.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;

#[cfg(wgl)]
#[macro_use]
extern crate lazy_static;

pub mod api;
pub use crate::api::{CurrentBinding, ProcAddress, WGLExtensionFunctions, WglApi};

pub mod bootstrap;

mod context;
pub use crate::context::{CurrentContextGuard, Lifecycle, NativeContext, ShareHandle, SharedContext};

pub mod error;
pub use crate::error::{BootstrapError, Error, ErrorKind, SettingsError, WindowingApiError};

mod info;
pub use crate::info::{ContextAttributes, ContextInfo, GLProfile, GLVersion};

mod pixel_format;
pub use crate::pixel_format::{PixelFormatAttributes, PixelFormatDescriptor, PixelFormatFlags};
pub use crate::pixel_format::{PixelFormatIndex, PixelType};

mod settings;
pub use crate::settings::ContextSettings;

mod window;
pub use crate::window::{WindowDescriptor, WindowExStyle, WindowFlags, WindowStyle};

pub mod platform;
#[cfg(wgl)]
pub use crate::platform::default::Wgl;

#[cfg(test)]
mod tests;

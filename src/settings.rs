// glshare/src/settings.rs
//
//! Options for `SharedContext::init`.

use crate::api::WglApi;
use crate::context::{ShareHandle, SharedContext};
use crate::error::SettingsError;
use crate::info::{ContextAttributes, GLVersion};
use crate::pixel_format::PixelFormatAttributes;
use crate::window::{WindowDescriptor, WindowExStyle, WindowFlags, WindowStyle};

use euclid::default::{Point2D, Size2D};
use std::ffi::CString;

const VALID_SAMPLE_COUNTS: [u8; 5] = [0, 2, 4, 8, 16];

/// Describes the window and the context `SharedContext::init` creates.
///
/// A dedicated window needs a title, a position and a size. Headless settings ignore all three.
pub struct ContextSettings<A> where A: WglApi {
    /// Identifies the context in log messages. Required.
    pub name: String,
    /// The window title. Required when `create_window` is set.
    pub title: Option<String>,
    /// The top-left corner of the window. Required when `create_window` is set.
    pub position: Option<Point2D<i32>>,
    /// The window size. Required when `create_window` is set.
    pub size: Option<Size2D<i32>>,
    pub flags: WindowFlags,
    /// When unset, only a hidden surface is created to hold the context.
    pub create_window: bool,
    /// Multisample count of the pixel format; zero disables multisampling.
    pub samples: u8,
    pub attributes: ContextAttributes,
    /// The context whose objects the new context shares.
    pub shares_with: Option<ShareHandle<A>>,
}

impl<A> Clone for ContextSettings<A> where A: WglApi {
    fn clone(&self) -> Self {
        ContextSettings {
            name: self.name.clone(),
            title: self.title.clone(),
            position: self.position,
            size: self.size,
            flags: self.flags,
            create_window: self.create_window,
            samples: self.samples,
            attributes: self.attributes,
            shares_with: self.shares_with.clone(),
        }
    }
}

impl<A> ContextSettings<A> where A: WglApi {
    /// Settings for a dedicated, undecorated window. Set a title, a position and a size before
    /// calling `init`.
    pub fn new(name: &str) -> ContextSettings<A> {
        ContextSettings {
            name: name.to_owned(),
            title: None,
            position: None,
            size: None,
            flags: WindowFlags::empty(),
            create_window: true,
            samples: 0,
            attributes: ContextAttributes::default(),
            shares_with: None,
        }
    }

    /// Settings for a context without a dedicated window.
    pub fn headless(name: &str) -> ContextSettings<A> {
        ContextSettings { create_window: false, ..ContextSettings::new(name) }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_owned());
        self
    }

    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.position = Some(Point2D::new(x, y));
        self
    }

    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.size = Some(Size2D::new(width, height));
        self
    }

    pub fn decorated(self, decorated: bool) -> Self {
        self.with_flag(WindowFlags::DECORATED, decorated)
    }

    pub fn resizable(self, resizable: bool) -> Self {
        self.with_flag(WindowFlags::RESIZABLE, resizable)
    }

    pub fn floating(self, floating: bool) -> Self {
        self.with_flag(WindowFlags::FLOATING, floating)
    }

    pub fn samples(mut self, samples: u8) -> Self {
        self.samples = samples;
        self
    }

    pub fn version(mut self, major: u8, minor: u8) -> Self {
        self.attributes.version = GLVersion::new(major, minor);
        self
    }

    pub fn shares_with(self, context: &SharedContext<A>) -> Self {
        self.shares_with_handle(context.share_handle())
    }

    /// Shares with the context `handle` was taken from, which may live on another thread.
    pub fn shares_with_handle(mut self, handle: ShareHandle<A>) -> Self {
        self.shares_with = Some(handle);
        self
    }

    fn with_flag(mut self, flag: WindowFlags, value: bool) -> Self {
        self.flags.set(flag, value);
        self
    }

    /// Checks that every field `init` needs is set and consistent.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.name.is_empty() {
            return Err(SettingsError::MissingName);
        }
        if self.name.contains('\0') || self.title.as_ref().map_or(false, |t| t.contains('\0')) {
            return Err(SettingsError::InteriorNul);
        }
        if !VALID_SAMPLE_COUNTS.contains(&self.samples) {
            return Err(SettingsError::InvalidSampleCount(self.samples));
        }
        if self.create_window {
            if self.title.is_none() {
                return Err(SettingsError::MissingTitle);
            }
            if self.position.is_none() {
                return Err(SettingsError::MissingPosition);
            }
            match self.size {
                None => return Err(SettingsError::MissingSize),
                Some(size) if size.width <= 0 || size.height <= 0 => {
                    return Err(SettingsError::InvalidSize {
                        width: size.width,
                        height: size.height,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// The window to create, or `None` in headless mode.
    pub fn window_descriptor(&self) -> Result<Option<WindowDescriptor>, SettingsError> {
        if !self.create_window {
            return Ok(None);
        }
        let title = self.title.as_deref().ok_or(SettingsError::MissingTitle)?;
        let title = CString::new(title).map_err(|_| SettingsError::InteriorNul)?;
        let position = self.position.ok_or(SettingsError::MissingPosition)?;
        let size = self.size.ok_or(SettingsError::MissingSize)?;
        Ok(Some(WindowDescriptor {
            title,
            position,
            size,
            style: WindowStyle::from_flags(self.flags),
            ex_style: WindowExStyle::from_flags(self.flags),
        }))
    }

    #[inline]
    pub fn pixel_format_attributes(&self) -> PixelFormatAttributes {
        PixelFormatAttributes::with_samples(self.samples)
    }
}

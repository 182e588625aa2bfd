// glshare/src/window.rs
//
//! Window options and the Win32 styles they translate to.

use euclid::default::{Point2D, Size2D};
use std::ffi::CString;

bitflags! {
    /// How the dedicated window looks and behaves.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct WindowFlags: u8 {
        /// Draw the title bar, system menu and minimize button.
        const DECORATED = 0x01;
        /// Let the user resize and maximize the window.
        const RESIZABLE = 0x02;
        /// Keep the window above all non-topmost windows.
        const FLOATING  = 0x04;
    }
}

bitflags! {
    /// `WS_*` window styles. The bits match the Win32 values.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct WindowStyle: u32 {
        const POPUP         = 0x8000_0000;
        const CLIP_SIBLINGS = 0x0400_0000;
        const CLIP_CHILDREN = 0x0200_0000;
        const SYSTEM_MENU   = 0x0008_0000;
        const THICK_FRAME   = 0x0004_0000;
        const MINIMIZE_BOX  = 0x0002_0000;
        const MAXIMIZE_BOX  = 0x0001_0000;
    }
}

bitflags! {
    /// `WS_EX_*` extended window styles. The bits match the Win32 values.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct WindowExStyle: u32 {
        const TOPMOST    = 0x0000_0008;
        const APP_WINDOW = 0x0004_0000;
    }
}

impl WindowStyle {
    pub fn from_flags(flags: WindowFlags) -> WindowStyle {
        let mut style = WindowStyle::CLIP_SIBLINGS | WindowStyle::CLIP_CHILDREN;
        if flags.contains(WindowFlags::DECORATED) {
            style |= WindowStyle::SYSTEM_MENU | WindowStyle::MINIMIZE_BOX;
        } else {
            style |= WindowStyle::POPUP;
        }
        if flags.contains(WindowFlags::RESIZABLE) {
            style |= WindowStyle::MAXIMIZE_BOX | WindowStyle::THICK_FRAME;
        }
        style
    }
}

impl WindowExStyle {
    pub fn from_flags(flags: WindowFlags) -> WindowExStyle {
        let mut style = WindowExStyle::APP_WINDOW;
        if flags.contains(WindowFlags::FLOATING) {
            style |= WindowExStyle::TOPMOST;
        }
        style
    }
}

/// Everything a backend needs to create the dedicated window.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowDescriptor {
    pub title: CString,
    /// The top-left corner, in screen coordinates.
    pub position: Point2D<i32>,
    pub size: Size2D<i32>,
    pub style: WindowStyle,
    pub ex_style: WindowExStyle,
}

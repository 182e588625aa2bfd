// glshare/src/pixel_format.rs
//
//! Pixel format descriptions and the `WGL_ARB_pixel_format` attribute list.

use std::os::raw::c_int;

const WGL_DRAW_TO_WINDOW_ARB: c_int = 0x2001;
const WGL_ACCELERATION_ARB: c_int = 0x2003;
const WGL_SUPPORT_OPENGL_ARB: c_int = 0x2010;
const WGL_DOUBLE_BUFFER_ARB: c_int = 0x2011;
const WGL_PIXEL_TYPE_ARB: c_int = 0x2013;
const WGL_COLOR_BITS_ARB: c_int = 0x2014;
const WGL_ALPHA_BITS_ARB: c_int = 0x201b;
const WGL_DEPTH_BITS_ARB: c_int = 0x2022;
const WGL_STENCIL_BITS_ARB: c_int = 0x2023;
const WGL_FULL_ACCELERATION_ARB: c_int = 0x2027;
const WGL_TYPE_RGBA_ARB: c_int = 0x202b;
const WGL_SAMPLE_BUFFERS_ARB: c_int = 0x2041;
const WGL_SAMPLES_ARB: c_int = 0x2042;

const TRUE: c_int = 1;
const FALSE: c_int = 0;

bitflags! {
    /// The `PFD_*` flags we care about. The bits match `PIXELFORMATDESCRIPTOR::dwFlags`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct PixelFormatFlags: u32 {
        const DOUBLE_BUFFER  = 0x0000_0001;
        const DRAW_TO_WINDOW = 0x0000_0004;
        const SUPPORT_OPENGL = 0x0000_0020;
    }
}

/// `PFD_TYPE_RGBA` or `PFD_TYPE_COLORINDEX`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelType {
    #[default]
    Rgba,
    ColorIndex,
}

/// The 1-based index of a pixel format on a device context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelFormatIndex(pub i32);

/// The color/depth/stencil layout of a drawable surface.
///
/// Chosen once per surface at initialization and never changed afterward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelFormatDescriptor {
    pub flags: PixelFormatFlags,
    pub pixel_type: PixelType,
    pub color_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
}

impl PixelFormatDescriptor {
    /// The minimal format used by the bootstrap window: double-buffered RGBA with a 24-bit depth
    /// buffer.
    pub fn legacy() -> PixelFormatDescriptor {
        PixelFormatDescriptor {
            flags: PixelFormatFlags::DRAW_TO_WINDOW |
                PixelFormatFlags::SUPPORT_OPENGL |
                PixelFormatFlags::DOUBLE_BUFFER,
            pixel_type: PixelType::Rgba,
            color_bits: 32,
            alpha_bits: 8,
            depth_bits: 24,
            stencil_bits: 0,
        }
    }

    /// Two contexts can only share objects if their surfaces use the same layout class.
    pub fn is_compatible_with(&self, other: &PixelFormatDescriptor) -> bool {
        self.pixel_type == other.pixel_type &&
            self.color_bits == other.color_bits &&
            self.alpha_bits == other.alpha_bits &&
            self.depth_bits == other.depth_bits &&
            self.stencil_bits == other.stencil_bits
    }
}

/// The request handed to `wglChoosePixelFormatARB`.
///
/// Besides these sizes, the request always asks for a hardware-accelerated, double-buffered RGBA
/// format that can draw to a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelFormatAttributes {
    pub color_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
    /// Zero disables multisampling.
    pub samples: u8,
}

impl Default for PixelFormatAttributes {
    fn default() -> PixelFormatAttributes {
        PixelFormatAttributes {
            color_bits: 32,
            alpha_bits: 8,
            depth_bits: 24,
            stencil_bits: 8,
            samples: 0,
        }
    }
}

impl PixelFormatAttributes {
    #[inline]
    pub fn with_samples(samples: u8) -> PixelFormatAttributes {
        PixelFormatAttributes { samples, ..PixelFormatAttributes::default() }
    }

    /// The zero-terminated integer attribute list.
    pub fn to_attrib_list(&self) -> Vec<c_int> {
        let sample_buffers = if self.samples > 0 { TRUE } else { FALSE };
        vec![
            WGL_DRAW_TO_WINDOW_ARB, TRUE,
            WGL_SUPPORT_OPENGL_ARB, TRUE,
            WGL_DOUBLE_BUFFER_ARB,  TRUE,
            WGL_PIXEL_TYPE_ARB,     WGL_TYPE_RGBA_ARB,
            WGL_ACCELERATION_ARB,   WGL_FULL_ACCELERATION_ARB,
            WGL_COLOR_BITS_ARB,     self.color_bits as c_int,
            WGL_ALPHA_BITS_ARB,     self.alpha_bits as c_int,
            WGL_DEPTH_BITS_ARB,     self.depth_bits as c_int,
            WGL_STENCIL_BITS_ARB,   self.stencil_bits as c_int,
            WGL_SAMPLE_BUFFERS_ARB, sample_buffers,
            WGL_SAMPLES_ARB,        self.samples as c_int,
            0,
        ]
    }

    /// Reads an attribute list back. Attributes outside this struct are skipped.
    pub fn from_attrib_list(list: &[c_int]) -> PixelFormatAttributes {
        let mut attributes = PixelFormatAttributes {
            color_bits: 0,
            alpha_bits: 0,
            depth_bits: 0,
            stencil_bits: 0,
            samples: 0,
        };
        for pair in list.chunks_exact(2).take_while(|pair| pair[0] != 0) {
            let value = pair[1] as u8;
            match pair[0] {
                WGL_COLOR_BITS_ARB => attributes.color_bits = value,
                WGL_ALPHA_BITS_ARB => attributes.alpha_bits = value,
                WGL_DEPTH_BITS_ARB => attributes.depth_bits = value,
                WGL_STENCIL_BITS_ARB => attributes.stencil_bits = value,
                WGL_SAMPLES_ARB => attributes.samples = value,
                _ => {}
            }
        }
        attributes
    }
}

// glshare/src/info.rs
//
//! OpenGL information.

use std::os::raw::c_int;

const WGL_CONTEXT_MAJOR_VERSION_ARB: c_int = 0x2091;
const WGL_CONTEXT_MINOR_VERSION_ARB: c_int = 0x2092;
const WGL_CONTEXT_PROFILE_MASK_ARB: c_int = 0x9126;

const WGL_CONTEXT_CORE_PROFILE_BIT_ARB: c_int = 0x0000_0001;
const WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB: c_int = 0x0000_0002;

/// Describes the OpenGL version that is requested when a context is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GLVersion {
    pub major: u8,
    pub minor: u8,
}

impl GLVersion {
    #[inline]
    pub fn new(major: u8, minor: u8) -> GLVersion {
        GLVersion { major, minor }
    }
}

impl Default for GLVersion {
    #[inline]
    fn default() -> GLVersion {
        GLVersion::new(4, 1)
    }
}

/// The OpenGL profile requested from `wglCreateContextAttribsARB`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GLProfile {
    #[default]
    Core,
    Compatibility,
}

/// The attributes of the versioned context passed to `wglCreateContextAttribsARB`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContextAttributes {
    pub version: GLVersion,
    pub profile: GLProfile,
}

impl ContextAttributes {
    /// The zero-terminated attribute list.
    pub fn to_attrib_list(&self) -> Vec<c_int> {
        let profile_bit = match self.profile {
            GLProfile::Core => WGL_CONTEXT_CORE_PROFILE_BIT_ARB,
            GLProfile::Compatibility => WGL_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB,
        };
        vec![
            WGL_CONTEXT_MAJOR_VERSION_ARB, self.version.major as c_int,
            WGL_CONTEXT_MINOR_VERSION_ARB, self.version.minor as c_int,
            WGL_CONTEXT_PROFILE_MASK_ARB,  profile_bit,
            0,
        ]
    }

    /// Reads an attribute list back. Unknown attributes are skipped.
    pub fn from_attrib_list(list: &[c_int]) -> ContextAttributes {
        let mut attributes = ContextAttributes {
            version: GLVersion::new(1, 0),
            profile: GLProfile::Core,
        };
        for pair in list.chunks_exact(2).take_while(|pair| pair[0] != 0) {
            match pair[0] {
                WGL_CONTEXT_MAJOR_VERSION_ARB => attributes.version.major = pair[1] as u8,
                WGL_CONTEXT_MINOR_VERSION_ARB => attributes.version.minor = pair[1] as u8,
                WGL_CONTEXT_PROFILE_MASK_ARB if pair[1] & WGL_CONTEXT_CORE_PROFILE_BIT_ARB == 0 => {
                    attributes.profile = GLProfile::Compatibility;
                }
                _ => {}
            }
        }
        attributes
    }
}

/// Driver strings of a live context, as reported by `glGetString`.
#[derive(Clone, Debug, PartialEq)]
pub struct ContextInfo {
    pub name: String,
    pub version: String,
    pub vendor: String,
    pub renderer: String,
}

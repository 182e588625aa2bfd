// glshare/src/error.rs
//
//! Various errors that methods can produce.

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

// WGL_ARB_create_context and WGL_ARB_pixel_format error codes, plus the Win32 codes the WGL
// entry points report most often.
const ERROR_INVALID_HANDLE: u32 = 6;
const ERROR_INVALID_PIXEL_FORMAT: u32 = 2000;
const ERROR_INVALID_WINDOW_HANDLE: u32 = 1400;
const ERROR_INVALID_PIXEL_TYPE_ARB: u32 = 0x2043;
const ERROR_INCOMPATIBLE_DEVICE_CONTEXTS_ARB: u32 = 0x2054;
const ERROR_INVALID_VERSION_ARB: u32 = 0x2095;
const ERROR_INVALID_PROFILE_ARB: u32 = 0x2096;

/// Various errors that methods can produce.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The supplied `ContextSettings` are incomplete or inconsistent.
    InvalidSettings(SettingsError),
    /// `init` was called on a context that is already initialized.
    AlreadyInitialized,
    /// The operation needs an initialized context.
    NotInitialized,
    /// The legacy bootstrap context couldn't provide the WGL extension functions.
    Bootstrap(BootstrapError),
    /// The system couldn't create the target window or get its device context.
    SurfaceCreationFailed(WindowingApiError),
    /// Choosing an OpenGL pixel format failed.
    PixelFormatSelectionFailed(WindowingApiError),
    /// The system couldn't find a pixel format matching the requested attributes.
    NoPixelFormatFound,
    /// The system couldn't describe the chosen pixel format.
    PixelFormatDescriptionFailed(WindowingApiError),
    /// The system couldn't apply the chosen pixel format to the device context.
    PixelFormatApplicationFailed(WindowingApiError),
    /// The system couldn't create an OpenGL context.
    ContextCreationFailed(WindowingApiError),
    /// The system couldn't make the OpenGL context current or not current.
    MakeCurrentFailed(WindowingApiError),
    /// The system couldn't present the back buffer.
    PresentFailed(WindowingApiError),
    /// The context has no window attachment.
    NoWidgetAttached,
    /// Looking up an OpenGL function address failed.
    GLFunctionNotFound,
}

/// The broad class of an `Error`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    State,
    Bootstrap,
    Surface,
    PixelFormat,
    ContextCreation,
    MakeCurrent,
    Swap,
    NotReady,
    FunctionLoading,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match *self {
            Error::InvalidSettings(_) => ErrorKind::Config,
            Error::AlreadyInitialized | Error::NotInitialized => ErrorKind::State,
            Error::Bootstrap(_) => ErrorKind::Bootstrap,
            Error::SurfaceCreationFailed(_) => ErrorKind::Surface,
            Error::PixelFormatSelectionFailed(_)
            | Error::NoPixelFormatFound
            | Error::PixelFormatDescriptionFailed(_)
            | Error::PixelFormatApplicationFailed(_) => ErrorKind::PixelFormat,
            Error::ContextCreationFailed(_) => ErrorKind::ContextCreation,
            Error::MakeCurrentFailed(_) => ErrorKind::MakeCurrent,
            Error::PresentFailed(_) => ErrorKind::Swap,
            Error::NoWidgetAttached => ErrorKind::NotReady,
            Error::GLFunctionNotFound => ErrorKind::FunctionLoading,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Error::InvalidSettings(ref err) => write!(f, "invalid context settings: {}", err),
            Error::AlreadyInitialized => f.write_str("the context is already initialized"),
            Error::NotInitialized => f.write_str("the context is not initialized"),
            Error::Bootstrap(ref err) => write!(f, "bootstrap failed: {}", err),
            Error::SurfaceCreationFailed(ref err) => {
                write!(f, "couldn't create the target surface: {}", err)
            }
            Error::PixelFormatSelectionFailed(ref err) => {
                write!(f, "wglChoosePixelFormatARB failed: {}", err)
            }
            Error::NoPixelFormatFound => f.write_str("no pixel format matches the request"),
            Error::PixelFormatDescriptionFailed(ref err) => {
                write!(f, "DescribePixelFormat failed: {}", err)
            }
            Error::PixelFormatApplicationFailed(ref err) => {
                write!(f, "SetPixelFormat failed: {}", err)
            }
            Error::ContextCreationFailed(ref err) => {
                write!(f, "wglCreateContextAttribsARB failed: {}", err)
            }
            Error::MakeCurrentFailed(ref err) => write!(f, "wglMakeCurrent failed: {}", err),
            Error::PresentFailed(ref err) => write!(f, "SwapBuffers failed: {}", err),
            Error::NoWidgetAttached => f.write_str("the context has no window"),
            Error::GLFunctionNotFound => f.write_str("an OpenGL function couldn't be loaded"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self {
            Error::InvalidSettings(ref err) => Some(err),
            Error::Bootstrap(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<SettingsError> for Error {
    #[inline]
    fn from(err: SettingsError) -> Error {
        Error::InvalidSettings(err)
    }
}

impl From<BootstrapError> for Error {
    #[inline]
    fn from(err: BootstrapError) -> Error {
        Error::Bootstrap(err)
    }
}

/// Reasons a `ContextSettings` fails validation.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingsError {
    /// Every context needs a non-empty name.
    MissingName,
    /// `create_window` is set but no window title was given.
    MissingTitle,
    /// `create_window` is set but no window position was given.
    MissingPosition,
    /// `create_window` is set but no window size was given.
    MissingSize,
    /// The window size has a non-positive dimension.
    InvalidSize { width: i32, height: i32 },
    /// The name or the title contains a NUL byte.
    InteriorNul,
    /// Multisampling supports 0, 2, 4, 8 or 16 samples.
    InvalidSampleCount(u8),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            SettingsError::MissingName => f.write_str("the name is not set"),
            SettingsError::MissingTitle => {
                f.write_str("`create_window` is set, but the window title is not")
            }
            SettingsError::MissingPosition => {
                f.write_str("`create_window` is set, but the window position is not")
            }
            SettingsError::MissingSize => {
                f.write_str("`create_window` is set, but the window size is not")
            }
            SettingsError::InvalidSize { width, height } => {
                write!(f, "invalid window size {}x{}", width, height)
            }
            SettingsError::InteriorNul => f.write_str("the name or title contains a NUL byte"),
            SettingsError::InvalidSampleCount(samples) => {
                write!(f, "unsupported sample count {}", samples)
            }
        }
    }
}

impl StdError for SettingsError {}

/// The step of the legacy bootstrap that failed.
#[derive(Clone, Debug, PartialEq)]
pub enum BootstrapError {
    /// The disposable window couldn't be created.
    WindowCreationFailed(WindowingApiError),
    /// The disposable window has no device context.
    DeviceContextUnavailable(WindowingApiError),
    /// `ChoosePixelFormat` found nothing for the legacy descriptor.
    PixelFormatSelectionFailed(WindowingApiError),
    /// `SetPixelFormat` rejected the legacy format.
    PixelFormatApplicationFailed(WindowingApiError),
    /// `wglCreateContext` failed.
    ContextCreationFailed(WindowingApiError),
    /// `wglMakeCurrent` failed for the legacy context.
    MakeCurrentFailed(WindowingApiError),
    /// `wglGetProcAddress` returned null for the named function.
    ExtensionUnavailable(&'static str),
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            BootstrapError::WindowCreationFailed(ref err) => {
                write!(f, "couldn't create the bootstrap window: {}", err)
            }
            BootstrapError::DeviceContextUnavailable(ref err) => {
                write!(f, "couldn't get the bootstrap device context: {}", err)
            }
            BootstrapError::PixelFormatSelectionFailed(ref err) => {
                write!(f, "ChoosePixelFormat failed: {}", err)
            }
            BootstrapError::PixelFormatApplicationFailed(ref err) => {
                write!(f, "SetPixelFormat failed: {}", err)
            }
            BootstrapError::ContextCreationFailed(ref err) => {
                write!(f, "wglCreateContext failed: {}", err)
            }
            BootstrapError::MakeCurrentFailed(ref err) => {
                write!(f, "wglMakeCurrent failed: {}", err)
            }
            BootstrapError::ExtensionUnavailable(name) => {
                write!(f, "`{}` is not available", name)
            }
        }
    }
}

impl StdError for BootstrapError {}

/// Abstraction of the errors that WGL and the Win32 windowing functions report.
#[derive(Clone, Debug, PartialEq)]
pub enum WindowingApiError {
    /// Miscellaneous error; the system gave no error code.
    Failed,
    /// WGL: The requested OpenGL version is not supported.
    BadVersion,
    /// WGL: The requested OpenGL profile is not supported.
    BadProfile,
    /// WGL: The share context was created for an incompatible device context.
    BadMatch,
    /// WGL: Invalid or unsupported pixel format.
    BadPixelFormat,
    /// Invalid context handle.
    BadContext,
    /// Invalid drawable; e.g. a missing device context.
    BadDrawable,
    /// Invalid window handle.
    BadWindow,
    /// Any other system error.
    Os { code: u32, message: String },
}

impl WindowingApiError {
    /// Classifies a `GetLastError()` code. Zero means the system didn't report a reason.
    pub fn from_code(code: u32, message: String) -> WindowingApiError {
        // Some drivers report the WGL codes as HRESULTs (`0xc007xxxx`).
        let code = if code & 0xffff_0000 == 0xc007_0000 { code & 0xffff } else { code };
        match code {
            0 => WindowingApiError::Failed,
            ERROR_INVALID_VERSION_ARB => WindowingApiError::BadVersion,
            ERROR_INVALID_PROFILE_ARB => WindowingApiError::BadProfile,
            ERROR_INCOMPATIBLE_DEVICE_CONTEXTS_ARB => WindowingApiError::BadMatch,
            ERROR_INVALID_PIXEL_FORMAT | ERROR_INVALID_PIXEL_TYPE_ARB => {
                WindowingApiError::BadPixelFormat
            }
            ERROR_INVALID_HANDLE => WindowingApiError::BadContext,
            ERROR_INVALID_WINDOW_HANDLE => WindowingApiError::BadWindow,
            _ => WindowingApiError::Os { code, message },
        }
    }
}

impl Display for WindowingApiError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            WindowingApiError::Failed => f.write_str("unknown failure"),
            WindowingApiError::BadVersion => f.write_str("unsupported OpenGL version"),
            WindowingApiError::BadProfile => f.write_str("unsupported OpenGL profile"),
            WindowingApiError::BadMatch => f.write_str("incompatible share context"),
            WindowingApiError::BadPixelFormat => f.write_str("invalid pixel format"),
            WindowingApiError::BadContext => f.write_str("invalid rendering context"),
            WindowingApiError::BadDrawable => f.write_str("invalid device context"),
            WindowingApiError::BadWindow => f.write_str("invalid window handle"),
            WindowingApiError::Os { code, ref message } => {
                write!(f, "{} (os error {:#x})", message, code)
            }
        }
    }
}

// glshare/src/api.rs
//
//! The native calls the context protocol is built from.
//!
//! Every platform call `glshare` makes goes through `WglApi`. The real implementation lives in
//! `platform::windows::wgl`; tests run the same protocol against `platform::generic::fake`.

use crate::error::WindowingApiError;
use crate::pixel_format::{PixelFormatDescriptor, PixelFormatIndex};
use crate::window::WindowDescriptor;

use std::fmt::Debug;
use std::os::raw::{c_int, c_void};
use std::ptr::NonNull;

/// The name of the `WGL_ARB_pixel_format` chooser.
pub const CHOOSE_PIXEL_FORMAT_ARB: &str = "wglChoosePixelFormatARB";
/// The name of the `WGL_ARB_create_context` creator.
pub const CREATE_CONTEXT_ATTRIBS_ARB: &str = "wglCreateContextAttribsARB";

/// A non-null address returned by `wglGetProcAddress`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcAddress(NonNull<c_void>);

impl ProcAddress {
    /// Wraps a raw address. Returns `None` for null.
    #[inline]
    pub fn new(address: *const c_void) -> Option<ProcAddress> {
        NonNull::new(address as *mut c_void).map(ProcAddress)
    }

    #[inline]
    pub fn as_ptr(&self) -> *const c_void {
        self.0.as_ptr()
    }
}

/// The two extension entry points that are only reachable once some legacy context is current.
#[allow(non_snake_case)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WGLExtensionFunctions {
    pub ChoosePixelFormatARB: Option<ProcAddress>,
    pub CreateContextAttribsARB: Option<ProcAddress>,
}

/// The calling thread's current `(dc, glrc)` pair.
pub struct CurrentBinding<A: WglApi + ?Sized> {
    pub dc: Option<A::DeviceContext>,
    pub glrc: Option<A::RenderingContext>,
}

impl<A: WglApi + ?Sized> Clone for CurrentBinding<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: WglApi + ?Sized> Copy for CurrentBinding<A> {}

impl<A: WglApi + ?Sized> Debug for CurrentBinding<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("CurrentBinding").field("dc", &self.dc).field("glrc", &self.glrc).finish()
    }
}

impl<A: WglApi + ?Sized> PartialEq for CurrentBinding<A> {
    fn eq(&self, other: &Self) -> bool {
        self.dc == other.dc && self.glrc == other.glrc
    }
}

impl<A: WglApi + ?Sized> CurrentBinding<A> {
    /// No context current.
    #[inline]
    pub fn none() -> CurrentBinding<A> {
        CurrentBinding { dc: None, glrc: None }
    }
}

/// The windowing, GDI and WGL calls needed to bootstrap and share contexts.
///
/// Handles are plain copyable values; ownership is tracked by the callers.
pub trait WglApi {
    type Window: Copy + Debug + PartialEq;
    type DeviceContext: Copy + Debug + PartialEq;
    type RenderingContext: Copy + Debug + PartialEq;

    /// Registers the window class used for dedicated windows, once per process.
    fn register_window_class(&self) -> Result<(), WindowingApiError>;

    /// Creates a visible-on-demand window with the given geometry and styles.
    fn create_window(&self, descriptor: &WindowDescriptor)
                     -> Result<Self::Window, WindowingApiError>;

    /// Creates a minimal invisible window, used by the bootstrap and in headless mode.
    fn create_hidden_window(&self) -> Result<Self::Window, WindowingApiError>;

    fn destroy_window(&self, window: Self::Window) -> Result<(), WindowingApiError>;

    fn show_window(&self, window: Self::Window);

    /// Dispatches every pending message without blocking. Returns `true` if a quit request was
    /// seen.
    fn process_messages(&self, window: Self::Window) -> bool;

    fn get_dc(&self, window: Self::Window) -> Result<Self::DeviceContext, WindowingApiError>;

    fn release_dc(&self, window: Self::Window, dc: Self::DeviceContext)
                  -> Result<(), WindowingApiError>;

    /// `ChoosePixelFormat`.
    fn choose_pixel_format(&self, dc: Self::DeviceContext, descriptor: &PixelFormatDescriptor)
                           -> Result<PixelFormatIndex, WindowingApiError>;

    /// `DescribePixelFormat`.
    fn describe_pixel_format(&self, dc: Self::DeviceContext, index: PixelFormatIndex)
                             -> Result<PixelFormatDescriptor, WindowingApiError>;

    /// `SetPixelFormat`. A surface accepts a pixel format only once.
    fn set_pixel_format(&self,
                        dc: Self::DeviceContext,
                        index: PixelFormatIndex,
                        descriptor: &PixelFormatDescriptor)
                        -> Result<(), WindowingApiError>;

    /// `wglCreateContext`.
    fn create_legacy_context(&self, dc: Self::DeviceContext)
                             -> Result<Self::RenderingContext, WindowingApiError>;

    /// `wglDeleteContext`.
    fn delete_context(&self, glrc: Self::RenderingContext) -> Result<(), WindowingApiError>;

    /// `wglMakeCurrent`. Passing `CurrentBinding::none()` releases the current context.
    fn make_current(&self, binding: CurrentBinding<Self>) -> Result<(), WindowingApiError>;

    /// `wglGetCurrentDC` and `wglGetCurrentContext`.
    fn current(&self) -> CurrentBinding<Self>;

    /// `SwapBuffers`.
    fn swap_buffers(&self, dc: Self::DeviceContext) -> Result<(), WindowingApiError>;

    /// Looks up a WGL extension or OpenGL entry point. Needs a current context.
    fn get_proc_address(&self, name: &str) -> Option<ProcAddress>;

    /// Calls `wglChoosePixelFormatARB`, asking for at most one format.
    ///
    /// Returns `Ok(None)` if the call succeeded but nothing matched.
    ///
    /// # Safety
    ///
    /// `function` must be the address this API returned for `wglChoosePixelFormatARB`, and
    /// `attribs` must be zero-terminated.
    unsafe fn choose_pixel_format_arb(&self,
                                      function: ProcAddress,
                                      dc: Self::DeviceContext,
                                      attribs: &[c_int])
                                      -> Result<Option<PixelFormatIndex>, WindowingApiError>;

    /// Calls `wglCreateContextAttribsARB`.
    ///
    /// # Safety
    ///
    /// `function` must be the address this API returned for `wglCreateContextAttribsARB`, and
    /// `attribs` must be zero-terminated.
    unsafe fn create_context_attribs_arb(&self,
                                         function: ProcAddress,
                                         dc: Self::DeviceContext,
                                         share: Option<Self::RenderingContext>,
                                         attribs: &[c_int])
                                         -> Result<Self::RenderingContext, WindowingApiError>;
}

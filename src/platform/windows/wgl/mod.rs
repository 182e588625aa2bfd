// glshare/src/platform/windows/wgl/mod.rs
//
//! The native Windows backend: user32 windows, GDI pixel formats and WGL contexts.

use crate::api::{CurrentBinding, ProcAddress, WglApi};
use crate::context::SharedContext;
use crate::error::WindowingApiError;
use crate::pixel_format::{PixelFormatDescriptor, PixelFormatFlags, PixelFormatIndex, PixelType};
use crate::window::WindowDescriptor;

use std::ffi::CString;
use std::io;
use std::mem;
use std::os::raw::{c_int, c_void};
use std::ptr;
use winapi::shared::minwindef::{BOOL, FLOAT, HMODULE, UINT};
use winapi::shared::windef::{HDC, HGLRC, HWND};
use winapi::um::libloaderapi::{GetProcAddress, LoadLibraryA};
use winapi::um::wingdi::{wglCreateContext, wglDeleteContext, wglGetCurrentContext};
use winapi::um::wingdi::{wglGetCurrentDC, wglGetProcAddress, wglMakeCurrent};
use winapi::um::wingdi::{ChoosePixelFormat, DescribePixelFormat, SetPixelFormat, SwapBuffers};
use winapi::um::wingdi::{PFD_MAIN_PLANE, PFD_TYPE_COLORINDEX, PFD_TYPE_RGBA};
use winapi::um::wingdi::PIXELFORMATDESCRIPTOR;
use winapi::um::winuser::{GetDC, ReleaseDC};

mod window;
pub use self::window::WindowClassRegistry;

type ChoosePixelFormatARBFn = unsafe extern "system" fn(HDC,
                                                        *const c_int,
                                                        *const FLOAT,
                                                        UINT,
                                                        *mut c_int,
                                                        *mut UINT)
                                                        -> BOOL;
type CreateContextAttribsARBFn = unsafe extern "system" fn(HDC, HGLRC, *const c_int) -> HGLRC;

struct OpenGL32(HMODULE);

unsafe impl Send for OpenGL32 {}
unsafe impl Sync for OpenGL32 {}

lazy_static! {
    // `wglGetProcAddress` doesn't return the OpenGL 1.1 entry points.
    static ref OPENGL32: Option<OpenGL32> = unsafe {
        let module = LoadLibraryA(b"opengl32.dll\0".as_ptr() as *const _);
        if module.is_null() {
            warn!("opengl32.dll not found");
            None
        } else {
            Some(OpenGL32(module))
        }
    };
}

/// The native WGL implementation of `WglApi`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Wgl;

impl SharedContext<Wgl> {
    /// Returns an uninitialized context backed by the native WGL implementation.
    #[inline]
    pub fn new() -> SharedContext<Wgl> {
        SharedContext::with_api(Wgl)
    }
}

impl Wgl {
    /// Unregisters the window class dedicated windows use. Call it once every `SharedContext`
    /// with a window has shut down.
    pub fn unregister_window_class() -> Result<(), WindowingApiError> {
        WindowClassRegistry::unregister()
    }
}

pub(crate) fn last_error() -> WindowingApiError {
    let err = io::Error::last_os_error();
    let code = err.raw_os_error().unwrap_or(0) as u32;
    WindowingApiError::from_code(code, err.to_string())
}

fn to_native_descriptor(descriptor: &PixelFormatDescriptor) -> PIXELFORMATDESCRIPTOR {
    unsafe {
        let mut native: PIXELFORMATDESCRIPTOR = mem::zeroed();
        native.nSize = mem::size_of::<PIXELFORMATDESCRIPTOR>() as u16;
        native.nVersion = 1;
        native.dwFlags = descriptor.flags.bits();
        native.iPixelType = match descriptor.pixel_type {
            PixelType::Rgba => PFD_TYPE_RGBA,
            PixelType::ColorIndex => PFD_TYPE_COLORINDEX,
        };
        native.cColorBits = descriptor.color_bits;
        native.cAlphaBits = descriptor.alpha_bits;
        native.cDepthBits = descriptor.depth_bits;
        native.cStencilBits = descriptor.stencil_bits;
        native.iLayerType = PFD_MAIN_PLANE;
        native
    }
}

fn from_native_descriptor(native: &PIXELFORMATDESCRIPTOR) -> PixelFormatDescriptor {
    PixelFormatDescriptor {
        flags: PixelFormatFlags::from_bits_truncate(native.dwFlags),
        pixel_type: if native.iPixelType == PFD_TYPE_COLORINDEX {
            PixelType::ColorIndex
        } else {
            PixelType::Rgba
        },
        color_bits: native.cColorBits,
        alpha_bits: native.cAlphaBits,
        depth_bits: native.cDepthBits,
        stencil_bits: native.cStencilBits,
    }
}

impl WglApi for Wgl {
    type Window = HWND;
    type DeviceContext = HDC;
    type RenderingContext = HGLRC;

    fn register_window_class(&self) -> Result<(), WindowingApiError> {
        WindowClassRegistry::register()
    }

    fn create_window(&self, descriptor: &WindowDescriptor) -> Result<HWND, WindowingApiError> {
        window::create_window(descriptor)
    }

    fn create_hidden_window(&self) -> Result<HWND, WindowingApiError> {
        window::create_hidden_window()
    }

    fn destroy_window(&self, hwnd: HWND) -> Result<(), WindowingApiError> {
        window::destroy_window(hwnd)
    }

    fn show_window(&self, hwnd: HWND) {
        window::show_window(hwnd)
    }

    fn process_messages(&self, hwnd: HWND) -> bool {
        window::process_messages(hwnd)
    }

    fn get_dc(&self, hwnd: HWND) -> Result<HDC, WindowingApiError> {
        unsafe {
            let dc = GetDC(hwnd);
            if dc.is_null() {
                return Err(last_error());
            }
            Ok(dc)
        }
    }

    fn release_dc(&self, hwnd: HWND, dc: HDC) -> Result<(), WindowingApiError> {
        unsafe {
            if ReleaseDC(hwnd, dc) == 0 {
                return Err(last_error());
            }
        }
        Ok(())
    }

    fn choose_pixel_format(&self, dc: HDC, descriptor: &PixelFormatDescriptor)
                           -> Result<PixelFormatIndex, WindowingApiError> {
        let native = to_native_descriptor(descriptor);
        unsafe {
            match ChoosePixelFormat(dc, &native) {
                0 => Err(last_error()),
                index => Ok(PixelFormatIndex(index)),
            }
        }
    }

    fn describe_pixel_format(&self, dc: HDC, index: PixelFormatIndex)
                             -> Result<PixelFormatDescriptor, WindowingApiError> {
        unsafe {
            let mut native: PIXELFORMATDESCRIPTOR = mem::zeroed();
            if DescribePixelFormat(dc,
                                   index.0,
                                   mem::size_of::<PIXELFORMATDESCRIPTOR>() as UINT,
                                   &mut native) == 0 {
                return Err(last_error());
            }
            Ok(from_native_descriptor(&native))
        }
    }

    fn set_pixel_format(&self,
                        dc: HDC,
                        index: PixelFormatIndex,
                        descriptor: &PixelFormatDescriptor)
                        -> Result<(), WindowingApiError> {
        let native = to_native_descriptor(descriptor);
        unsafe {
            if SetPixelFormat(dc, index.0, &native) == 0 {
                return Err(last_error());
            }
        }
        Ok(())
    }

    fn create_legacy_context(&self, dc: HDC) -> Result<HGLRC, WindowingApiError> {
        unsafe {
            let glrc = wglCreateContext(dc);
            if glrc.is_null() {
                return Err(last_error());
            }
            Ok(glrc)
        }
    }

    fn delete_context(&self, glrc: HGLRC) -> Result<(), WindowingApiError> {
        unsafe {
            if wglDeleteContext(glrc) == 0 {
                return Err(last_error());
            }
        }
        Ok(())
    }

    fn make_current(&self, binding: CurrentBinding<Self>) -> Result<(), WindowingApiError> {
        unsafe {
            let dc = binding.dc.unwrap_or(ptr::null_mut());
            let glrc = binding.glrc.unwrap_or(ptr::null_mut());
            if wglMakeCurrent(dc, glrc) == 0 {
                return Err(last_error());
            }
        }
        Ok(())
    }

    fn current(&self) -> CurrentBinding<Self> {
        unsafe {
            let dc = wglGetCurrentDC();
            let glrc = wglGetCurrentContext();
            CurrentBinding {
                dc: if dc.is_null() { None } else { Some(dc) },
                glrc: if glrc.is_null() { None } else { Some(glrc) },
            }
        }
    }

    fn swap_buffers(&self, dc: HDC) -> Result<(), WindowingApiError> {
        unsafe {
            if SwapBuffers(dc) == 0 {
                return Err(last_error());
            }
        }
        Ok(())
    }

    fn get_proc_address(&self, name: &str) -> Option<ProcAddress> {
        let name = CString::new(name).ok()?;
        unsafe {
            // Some drivers return small integers instead of null on failure.
            let address = wglGetProcAddress(name.as_ptr()) as *const c_void;
            match address as isize {
                -1 | 0 | 1 | 2 | 3 => {}
                _ => return ProcAddress::new(address),
            }
            let module = (*OPENGL32).as_ref()?;
            ProcAddress::new(GetProcAddress(module.0, name.as_ptr()) as *const c_void)
        }
    }

    unsafe fn choose_pixel_format_arb(&self,
                                      function: ProcAddress,
                                      dc: HDC,
                                      attribs: &[c_int])
                                      -> Result<Option<PixelFormatIndex>, WindowingApiError> {
        let choose_pixel_format: ChoosePixelFormatARBFn = mem::transmute(function.as_ptr());
        let (mut index, mut count) = (0, 0);
        if choose_pixel_format(dc, attribs.as_ptr(), ptr::null(), 1, &mut index, &mut count) ==
                0 {
            return Err(last_error());
        }
        if count == 0 {
            return Ok(None);
        }
        Ok(Some(PixelFormatIndex(index)))
    }

    unsafe fn create_context_attribs_arb(&self,
                                         function: ProcAddress,
                                         dc: HDC,
                                         share: Option<HGLRC>,
                                         attribs: &[c_int])
                                         -> Result<HGLRC, WindowingApiError> {
        let create_context_attribs: CreateContextAttribsARBFn = mem::transmute(function.as_ptr());
        let glrc = create_context_attribs(dc,
                                          share.unwrap_or(ptr::null_mut()),
                                          attribs.as_ptr());
        if glrc.is_null() {
            return Err(last_error());
        }
        Ok(glrc)
    }
}

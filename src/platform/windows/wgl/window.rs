// glshare/src/platform/windows/wgl/window.rs
//
//! Window class registration, window creation and the message pump.

use super::last_error;
use crate::error::WindowingApiError;
use crate::window::WindowDescriptor;

use std::mem;
use std::os::raw::c_int;
use std::ptr;
use std::sync::Mutex;
use winapi::shared::minwindef::{ATOM, HINSTANCE, LPARAM, LRESULT, UINT, WPARAM};
use winapi::shared::windef::HWND;
use winapi::um::libloaderapi::GetModuleHandleA;
use winapi::um::winuser::{CreateWindowExA, DefWindowProcA, DestroyWindow, DispatchMessageA};
use winapi::um::winuser::{LoadCursorW, PeekMessageA, PostQuitMessage, RegisterClassExA};
use winapi::um::winuser::{ShowWindow, TranslateMessage, UnregisterClassA};
use winapi::um::winuser::{CS_HREDRAW, CS_OWNDC, CS_VREDRAW, IDC_ARROW, MSG};
use winapi::um::winuser::{PM_REMOVE, SW_SHOW, VK_ESCAPE, WM_CLOSE, WM_KEYDOWN, WM_QUIT};
use winapi::um::winuser::WNDCLASSEXA;

static WINDOW_CLASS_NAME: &[u8] = b"glshare\0";
static HIDDEN_WINDOW_CLASS_NAME: &[u8] = b"STATIC\0";
static HIDDEN_WINDOW_TITLE: &[u8] = b"dummy\0";

const HIDDEN_WINDOW_SIZE: c_int = 1;

lazy_static! {
    static ref WINDOW_CLASS: Mutex<WindowClassRegistry> = Mutex::new(WindowClassRegistry {
        atom: None,
    });
}

/// The process-wide registration of the class dedicated windows are created with.
pub struct WindowClassRegistry {
    atom: Option<ATOM>,
}

impl WindowClassRegistry {
    /// Registers the window class unless it already is.
    pub fn register() -> Result<(), WindowingApiError> {
        let mut registry = WINDOW_CLASS.lock().map_err(|_| WindowingApiError::Failed)?;
        if registry.atom.is_some() {
            return Ok(());
        }
        unsafe {
            let mut class: WNDCLASSEXA = mem::zeroed();
            class.cbSize = mem::size_of::<WNDCLASSEXA>() as UINT;
            class.style = CS_HREDRAW | CS_VREDRAW | CS_OWNDC;
            class.lpfnWndProc = Some(wndproc);
            class.hInstance = module_handle();
            class.hCursor = LoadCursorW(ptr::null_mut(), IDC_ARROW);
            class.lpszClassName = WINDOW_CLASS_NAME.as_ptr() as *const _;
            let atom = RegisterClassExA(&class);
            if atom == 0 {
                return Err(last_error());
            }
            debug!("registered window class {}", atom);
            registry.atom = Some(atom);
        }
        Ok(())
    }

    /// Unregisters the window class. Every window of the class must have been destroyed.
    pub fn unregister() -> Result<(), WindowingApiError> {
        let mut registry = WINDOW_CLASS.lock().map_err(|_| WindowingApiError::Failed)?;
        if registry.atom.take().is_none() {
            return Ok(());
        }
        unsafe {
            if UnregisterClassA(WINDOW_CLASS_NAME.as_ptr() as *const _, module_handle()) == 0 {
                return Err(last_error());
            }
        }
        Ok(())
    }
}

fn module_handle() -> HINSTANCE {
    unsafe { GetModuleHandleA(ptr::null()) }
}

unsafe extern "system" fn wndproc(hwnd: HWND, msg: UINT, wparam: WPARAM, lparam: LPARAM)
                                  -> LRESULT {
    match msg {
        WM_CLOSE => {
            PostQuitMessage(0);
            0
        }
        WM_KEYDOWN if wparam == VK_ESCAPE as WPARAM => {
            PostQuitMessage(0);
            0
        }
        _ => DefWindowProcA(hwnd, msg, wparam, lparam),
    }
}

pub fn create_window(descriptor: &WindowDescriptor) -> Result<HWND, WindowingApiError> {
    unsafe {
        let hwnd = CreateWindowExA(descriptor.ex_style.bits(),
                                   WINDOW_CLASS_NAME.as_ptr() as *const _,
                                   descriptor.title.as_ptr(),
                                   descriptor.style.bits(),
                                   descriptor.position.x,
                                   descriptor.position.y,
                                   descriptor.size.width,
                                   descriptor.size.height,
                                   ptr::null_mut(),
                                   ptr::null_mut(),
                                   module_handle(),
                                   ptr::null_mut());
        if hwnd.is_null() {
            return Err(last_error());
        }
        Ok(hwnd)
    }
}

pub fn create_hidden_window() -> Result<HWND, WindowingApiError> {
    unsafe {
        let hwnd = CreateWindowExA(0,
                                   HIDDEN_WINDOW_CLASS_NAME.as_ptr() as *const _,
                                   HIDDEN_WINDOW_TITLE.as_ptr() as *const _,
                                   0,
                                   0,
                                   0,
                                   HIDDEN_WINDOW_SIZE,
                                   HIDDEN_WINDOW_SIZE,
                                   ptr::null_mut(),
                                   ptr::null_mut(),
                                   module_handle(),
                                   ptr::null_mut());
        if hwnd.is_null() {
            return Err(last_error());
        }
        Ok(hwnd)
    }
}

pub fn destroy_window(hwnd: HWND) -> Result<(), WindowingApiError> {
    unsafe {
        if DestroyWindow(hwnd) == 0 {
            return Err(last_error());
        }
    }
    Ok(())
}

pub fn show_window(hwnd: HWND) {
    unsafe {
        ShowWindow(hwnd, SW_SHOW);
    }
}

// Drains the thread's queue, not just `hwnd`'s, so `WM_QUIT` is seen.
pub fn process_messages(_: HWND) -> bool {
    let mut quit = false;
    unsafe {
        let mut msg: MSG = mem::zeroed();
        while PeekMessageA(&mut msg, ptr::null_mut(), 0, 0, PM_REMOVE) != 0 {
            if msg.message == WM_QUIT {
                quit = true;
                continue;
            }
            TranslateMessage(&msg);
            DispatchMessageA(&msg);
        }
    }
    quit
}

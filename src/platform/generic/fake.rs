// glshare/src/platform/generic/fake.rs
//
//! An in-memory stand-in for WGL.
//!
//! `FakeWgl` enforces the rules the context protocol relies on: a surface accepts one pixel
//! format, extension lookups need a current context, a context only becomes current on a device
//! context with its pixel format, a failed `wglMakeCurrent` leaves nothing current, and a share
//! partner must use a compatible pixel format. Clones share one driver, which plays the role of a
//! single thread's view of the system.

use crate::api::{CurrentBinding, ProcAddress, WglApi};
use crate::api::{CHOOSE_PIXEL_FORMAT_ARB, CREATE_CONTEXT_ATTRIBS_ARB};
use crate::error::WindowingApiError;
use crate::info::{ContextAttributes, GLVersion};
use crate::pixel_format::{PixelFormatAttributes, PixelFormatDescriptor, PixelFormatFlags};
use crate::pixel_format::{PixelFormatIndex, PixelType};
use crate::window::WindowDescriptor;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::os::raw::{c_int, c_void};
use std::rc::Rc;

const ERROR_CANNOT_FIND_WND_CLASS: u32 = 1407;

const CHOOSE_PIXEL_FORMAT_ARB_ADDRESS: usize = 0x1000;
const CREATE_CONTEXT_ATTRIBS_ARB_ADDRESS: usize = 0x2000;

const MAX_GL_VERSION: GLVersion = GLVersion { major: 4, minor: 6 };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FakeWindow(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FakeDc(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FakeGlrc(u32);

/// The calls `FakeWgl` can be told to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FakeCall {
    RegisterWindowClass,
    CreateWindow,
    CreateHiddenWindow,
    DestroyWindow,
    GetDc,
    ReleaseDc,
    ChoosePixelFormat,
    DescribePixelFormat,
    SetPixelFormat,
    CreateLegacyContext,
    DeleteContext,
    MakeCurrent,
    SwapBuffers,
    ChoosePixelFormatArb,
    CreateContextAttribsArb,
}

/// One entry of the fake driver's pixel format table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FakePixelFormat {
    pub descriptor: PixelFormatDescriptor,
    pub accelerated: bool,
    pub samples: u8,
}

impl FakePixelFormat {
    fn new(alpha_bits: u8, depth_bits: u8, stencil_bits: u8, samples: u8, accelerated: bool)
           -> FakePixelFormat {
        FakePixelFormat {
            descriptor: PixelFormatDescriptor {
                flags: PixelFormatFlags::DRAW_TO_WINDOW |
                    PixelFormatFlags::SUPPORT_OPENGL |
                    PixelFormatFlags::DOUBLE_BUFFER,
                pixel_type: PixelType::Rgba,
                color_bits: 32,
                alpha_bits,
                depth_bits,
                stencil_bits,
            },
            accelerated,
            samples,
        }
    }

    fn satisfies(&self, request: &PixelFormatAttributes) -> bool {
        let descriptor = &self.descriptor;
        let samples_match = if request.samples == 0 {
            self.samples == 0
        } else {
            self.samples >= request.samples
        };
        self.accelerated &&
            samples_match &&
            descriptor.color_bits >= request.color_bits &&
            descriptor.alpha_bits >= request.alpha_bits &&
            descriptor.depth_bits >= request.depth_bits &&
            descriptor.stencil_bits >= request.stencil_bits
    }

    fn satisfies_legacy(&self, request: &PixelFormatDescriptor) -> bool {
        let descriptor = &self.descriptor;
        descriptor.flags.contains(request.flags) &&
            descriptor.pixel_type == request.pixel_type &&
            descriptor.color_bits >= request.color_bits &&
            descriptor.depth_bits >= request.depth_bits
    }
}

/// The default table: a few accelerated formats and one software multisampled format.
pub fn default_pixel_formats() -> Vec<FakePixelFormat> {
    vec![
        FakePixelFormat::new(8, 24, 0, 0, true),
        FakePixelFormat::new(8, 24, 8, 0, true),
        FakePixelFormat::new(8, 24, 8, 4, true),
        FakePixelFormat::new(0, 16, 0, 0, true),
        FakePixelFormat::new(8, 24, 8, 8, false),
    ]
}

#[derive(Clone, Default)]
pub struct FakeWgl {
    driver: Rc<RefCell<FakeDriver>>,
}

struct FakeDriver {
    next_id: u32,
    formats: Vec<FakePixelFormat>,
    window_class_registered: bool,
    window_class_registrations: usize,
    windows: HashMap<FakeWindow, WindowRecord>,
    dcs: HashMap<FakeDc, FakeWindow>,
    contexts: HashMap<FakeGlrc, ContextRecord>,
    current: (Option<FakeDc>, Option<FakeGlrc>),
    failures: HashMap<FakeCall, WindowingApiError>,
    missing_procs: HashSet<String>,
    calls: HashMap<FakeCall, usize>,
    quit_requested: bool,
}

struct WindowRecord {
    descriptor: Option<WindowDescriptor>,
    visible: bool,
    dc: Option<FakeDc>,
    pixel_format: Option<PixelFormatIndex>,
}

struct ContextRecord {
    pixel_format: PixelFormatIndex,
    share: Option<FakeGlrc>,
    attributes: Option<ContextAttributes>,
}

impl Default for FakeDriver {
    fn default() -> FakeDriver {
        FakeDriver {
            next_id: 1,
            formats: default_pixel_formats(),
            window_class_registered: false,
            window_class_registrations: 0,
            windows: HashMap::new(),
            dcs: HashMap::new(),
            contexts: HashMap::new(),
            current: (None, None),
            failures: HashMap::new(),
            missing_procs: HashSet::new(),
            calls: HashMap::new(),
            quit_requested: false,
        }
    }
}

impl FakeDriver {
    fn enter(&mut self, call: FakeCall) -> Result<(), WindowingApiError> {
        *self.calls.entry(call).or_insert(0) += 1;
        match self.failures.remove(&call) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn add_window(&mut self, descriptor: Option<WindowDescriptor>) -> FakeWindow {
        let window = FakeWindow(self.next_id());
        self.windows.insert(window, WindowRecord {
            descriptor,
            visible: false,
            dc: None,
            pixel_format: None,
        });
        window
    }

    fn format(&self, index: PixelFormatIndex) -> Result<&FakePixelFormat, WindowingApiError> {
        if index.0 < 1 {
            return Err(WindowingApiError::BadPixelFormat);
        }
        self.formats.get(index.0 as usize - 1).ok_or(WindowingApiError::BadPixelFormat)
    }

    fn dc_window(&self, dc: FakeDc) -> Result<&WindowRecord, WindowingApiError> {
        self.dcs
            .get(&dc)
            .and_then(|window| self.windows.get(window))
            .ok_or(WindowingApiError::BadDrawable)
    }

    fn dc_pixel_format(&self, dc: FakeDc) -> Result<PixelFormatIndex, WindowingApiError> {
        self.dc_window(dc)?.pixel_format.ok_or(WindowingApiError::BadPixelFormat)
    }

    fn add_context(&mut self,
                   dc: FakeDc,
                   share: Option<FakeGlrc>,
                   attributes: Option<ContextAttributes>)
                   -> Result<FakeGlrc, WindowingApiError> {
        let pixel_format = self.dc_pixel_format(dc)?;
        let glrc = FakeGlrc(self.next_id());
        self.contexts.insert(glrc, ContextRecord { pixel_format, share, attributes });
        Ok(glrc)
    }

    fn bind(&mut self, dc: FakeDc, glrc: FakeGlrc) -> Result<(), WindowingApiError> {
        let context_format = self.contexts
                                 .get(&glrc)
                                 .ok_or(WindowingApiError::BadContext)?
                                 .pixel_format;
        if self.dc_pixel_format(dc)? != context_format {
            return Err(WindowingApiError::BadPixelFormat);
        }
        self.current = (Some(dc), Some(glrc));
        Ok(())
    }
}

impl FakeWgl {
    #[inline]
    pub fn new() -> FakeWgl {
        FakeWgl::default()
    }

    /// A fake whose driver offers exactly `formats`.
    pub fn with_pixel_formats(formats: Vec<FakePixelFormat>) -> FakeWgl {
        let fake = FakeWgl::new();
        fake.driver.borrow_mut().formats = formats;
        fake
    }

    /// Makes the next call of the given kind fail with `err`.
    pub fn fail_next(&self, call: FakeCall, err: WindowingApiError) {
        self.driver.borrow_mut().failures.insert(call, err);
    }

    /// Makes `wglGetProcAddress` return null for `name`.
    pub fn remove_proc(&self, name: &str) {
        self.driver.borrow_mut().missing_procs.insert(name.to_owned());
    }

    /// Queues a quit request, as closing the window would.
    pub fn post_quit(&self) {
        self.driver.borrow_mut().quit_requested = true;
    }

    /// How many times a call was made, including failed attempts.
    pub fn call_count(&self, call: FakeCall) -> usize {
        self.driver.borrow().calls.get(&call).cloned().unwrap_or(0)
    }

    /// How many times the window class was actually registered.
    pub fn window_class_registrations(&self) -> usize {
        self.driver.borrow().window_class_registrations
    }

    pub fn live_windows(&self) -> usize {
        self.driver.borrow().windows.len()
    }

    pub fn live_dcs(&self) -> usize {
        self.driver.borrow().dcs.len()
    }

    pub fn live_contexts(&self) -> usize {
        self.driver.borrow().contexts.len()
    }

    pub fn is_visible(&self, window: FakeWindow) -> bool {
        self.driver.borrow().windows.get(&window).map_or(false, |record| record.visible)
    }

    /// The descriptor a dedicated window was created with; `None` for hidden windows.
    pub fn window_descriptor(&self, window: FakeWindow) -> Option<WindowDescriptor> {
        self.driver.borrow().windows.get(&window).and_then(|record| record.descriptor.clone())
    }

    /// The context a context was created to share with.
    pub fn share_of(&self, glrc: FakeGlrc) -> Option<FakeGlrc> {
        self.driver.borrow().contexts.get(&glrc).and_then(|record| record.share)
    }

    /// The attributes a context was created with; `None` for legacy contexts.
    pub fn context_attributes(&self, glrc: FakeGlrc) -> Option<ContextAttributes> {
        self.driver.borrow().contexts.get(&glrc).and_then(|record| record.attributes)
    }
}

impl WglApi for FakeWgl {
    type Window = FakeWindow;
    type DeviceContext = FakeDc;
    type RenderingContext = FakeGlrc;

    fn register_window_class(&self) -> Result<(), WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::RegisterWindowClass)?;
        if !driver.window_class_registered {
            driver.window_class_registered = true;
            driver.window_class_registrations += 1;
        }
        Ok(())
    }

    fn create_window(&self, descriptor: &WindowDescriptor)
                     -> Result<FakeWindow, WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::CreateWindow)?;
        if !driver.window_class_registered {
            return Err(WindowingApiError::from_code(ERROR_CANNOT_FIND_WND_CLASS,
                                                    "Cannot find window class.".to_owned()));
        }
        Ok(driver.add_window(Some(descriptor.clone())))
    }

    fn create_hidden_window(&self) -> Result<FakeWindow, WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::CreateHiddenWindow)?;
        Ok(driver.add_window(None))
    }

    fn destroy_window(&self, window: FakeWindow) -> Result<(), WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::DestroyWindow)?;
        let record = driver.windows.remove(&window).ok_or(WindowingApiError::BadWindow)?;
        if let Some(dc) = record.dc {
            driver.dcs.remove(&dc);
        }
        Ok(())
    }

    fn show_window(&self, window: FakeWindow) {
        if let Some(record) = self.driver.borrow_mut().windows.get_mut(&window) {
            record.visible = true;
        }
    }

    fn process_messages(&self, _: FakeWindow) -> bool {
        std::mem::replace(&mut self.driver.borrow_mut().quit_requested, false)
    }

    fn get_dc(&self, window: FakeWindow) -> Result<FakeDc, WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::GetDc)?;
        if let Some(dc) = driver.windows.get(&window).ok_or(WindowingApiError::BadWindow)?.dc {
            return Ok(dc);
        }
        let dc = FakeDc(driver.next_id());
        driver.dcs.insert(dc, window);
        if let Some(record) = driver.windows.get_mut(&window) {
            record.dc = Some(dc);
        }
        Ok(dc)
    }

    fn release_dc(&self, window: FakeWindow, dc: FakeDc) -> Result<(), WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::ReleaseDc)?;
        if driver.dcs.get(&dc) != Some(&window) {
            return Err(WindowingApiError::BadDrawable);
        }
        driver.dcs.remove(&dc);
        if let Some(record) = driver.windows.get_mut(&window) {
            record.dc = None;
        }
        Ok(())
    }

    fn choose_pixel_format(&self, dc: FakeDc, descriptor: &PixelFormatDescriptor)
                           -> Result<PixelFormatIndex, WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::ChoosePixelFormat)?;
        driver.dc_window(dc)?;
        driver.formats
              .iter()
              .position(|format| format.satisfies_legacy(descriptor))
              .map(|position| PixelFormatIndex(position as i32 + 1))
              .ok_or(WindowingApiError::BadPixelFormat)
    }

    fn describe_pixel_format(&self, dc: FakeDc, index: PixelFormatIndex)
                             -> Result<PixelFormatDescriptor, WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::DescribePixelFormat)?;
        driver.dc_window(dc)?;
        Ok(driver.format(index)?.descriptor)
    }

    fn set_pixel_format(&self, dc: FakeDc, index: PixelFormatIndex, _: &PixelFormatDescriptor)
                        -> Result<(), WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::SetPixelFormat)?;
        driver.format(index)?;
        let window = *driver.dcs.get(&dc).ok_or(WindowingApiError::BadDrawable)?;
        let record = driver.windows.get_mut(&window).ok_or(WindowingApiError::BadWindow)?;
        if record.pixel_format.is_some() {
            return Err(WindowingApiError::BadPixelFormat);
        }
        record.pixel_format = Some(index);
        Ok(())
    }

    fn create_legacy_context(&self, dc: FakeDc) -> Result<FakeGlrc, WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::CreateLegacyContext)?;
        driver.add_context(dc, None, None)
    }

    fn delete_context(&self, glrc: FakeGlrc) -> Result<(), WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::DeleteContext)?;
        driver.contexts.remove(&glrc).ok_or(WindowingApiError::BadContext)?;
        if driver.current.1 == Some(glrc) {
            driver.current = (None, None);
        }
        Ok(())
    }

    fn make_current(&self, binding: CurrentBinding<Self>) -> Result<(), WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        let result = driver.enter(FakeCall::MakeCurrent).and_then(|()| {
            match (binding.dc, binding.glrc) {
                (_, None) => {
                    driver.current = (None, None);
                    Ok(())
                }
                (None, Some(_)) => Err(WindowingApiError::BadDrawable),
                (Some(dc), Some(glrc)) => driver.bind(dc, glrc),
            }
        });
        if result.is_err() {
            driver.current = (None, None);
        }
        result
    }

    fn current(&self) -> CurrentBinding<Self> {
        let (dc, glrc) = self.driver.borrow().current;
        CurrentBinding { dc, glrc }
    }

    fn swap_buffers(&self, dc: FakeDc) -> Result<(), WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::SwapBuffers)?;
        driver.dc_pixel_format(dc).map_err(|_| WindowingApiError::BadDrawable)?;
        Ok(())
    }

    fn get_proc_address(&self, name: &str) -> Option<ProcAddress> {
        let driver = self.driver.borrow();
        if driver.current.1.is_none() || driver.missing_procs.contains(name) {
            return None;
        }
        let address = match name {
            CHOOSE_PIXEL_FORMAT_ARB => CHOOSE_PIXEL_FORMAT_ARB_ADDRESS,
            CREATE_CONTEXT_ATTRIBS_ARB => CREATE_CONTEXT_ATTRIBS_ARB_ADDRESS,
            _ => return None,
        };
        ProcAddress::new(address as *const c_void)
    }

    unsafe fn choose_pixel_format_arb(&self,
                                      function: ProcAddress,
                                      dc: FakeDc,
                                      attribs: &[c_int])
                                      -> Result<Option<PixelFormatIndex>, WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::ChoosePixelFormatArb)?;
        if function.as_ptr() as usize != CHOOSE_PIXEL_FORMAT_ARB_ADDRESS {
            return Err(WindowingApiError::Failed);
        }
        driver.dc_window(dc)?;
        let request = PixelFormatAttributes::from_attrib_list(attribs);
        Ok(driver.formats
                 .iter()
                 .position(|format| format.satisfies(&request))
                 .map(|position| PixelFormatIndex(position as i32 + 1)))
    }

    unsafe fn create_context_attribs_arb(&self,
                                         function: ProcAddress,
                                         dc: FakeDc,
                                         share: Option<FakeGlrc>,
                                         attribs: &[c_int])
                                         -> Result<FakeGlrc, WindowingApiError> {
        let mut driver = self.driver.borrow_mut();
        driver.enter(FakeCall::CreateContextAttribsArb)?;
        if function.as_ptr() as usize != CREATE_CONTEXT_ATTRIBS_ARB_ADDRESS {
            return Err(WindowingApiError::Failed);
        }
        let attributes = ContextAttributes::from_attrib_list(attribs);
        if attributes.version.major > MAX_GL_VERSION.major ||
                (attributes.version.major == MAX_GL_VERSION.major &&
                 attributes.version.minor > MAX_GL_VERSION.minor) {
            return Err(WindowingApiError::BadVersion);
        }
        let own_format = driver.dc_pixel_format(dc)?;
        if let Some(share) = share {
            let share_format = driver.contexts
                                     .get(&share)
                                     .ok_or(WindowingApiError::BadContext)?
                                     .pixel_format;
            let own = driver.format(own_format)?.descriptor;
            let theirs = driver.format(share_format)?.descriptor;
            if !own.is_compatible_with(&theirs) {
                return Err(WindowingApiError::BadMatch);
            }
        }
        driver.add_context(dc, share, Some(attributes))
    }
}

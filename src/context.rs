// glshare/src/context.rs
//
//! A versioned, optionally shared OpenGL context bound to a window.

use crate::api::{CurrentBinding, WGLExtensionFunctions, WglApi};
use crate::bootstrap;
use crate::error::{Error, WindowingApiError};
use crate::info::ContextInfo;
use crate::pixel_format::{PixelFormatAttributes, PixelFormatDescriptor, PixelFormatIndex};
use crate::settings::ContextSettings;

use glow::HasContext;
use std::fmt::{self, Debug, Formatter};
use std::ptr;

/// Where a `SharedContext` is in its life.
///
/// Whether a ready context is current is thread state; see `SharedContext::is_current`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initializing,
    Ready,
}

/// The native handles an external renderer needs to drive this context.
pub struct NativeContext<A> where A: WglApi {
    pub window: A::Window,
    pub dc: A::DeviceContext,
    pub glrc: A::RenderingContext,
}

impl<A> Clone for NativeContext<A> where A: WglApi {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for NativeContext<A> where A: WglApi {}

impl<A> Debug for NativeContext<A> where A: WglApi {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("NativeContext")
         .field("window", &self.window)
         .field("dc", &self.dc)
         .field("glrc", &self.glrc)
         .finish()
    }
}

// Window, device and rendering context handles are process-wide values. Sending them only moves
// the numbers; using them on another thread is still subject to WGL's threading rules.
unsafe impl<A> Send for NativeContext<A> where A: WglApi {}

/// Lets a context created on another thread share objects with a `SharedContext`.
///
/// Obtained from `SharedContext::share_handle` and passed to `ContextSettings::shares_with_handle`.
/// The handle doesn't keep the context alive: it must stay initialized until every `init` using
/// the handle has returned. A handle taken from an uninitialized context makes `init` fail with
/// `ContextCreationFailed(BadContext)`.
pub struct ShareHandle<A> where A: WglApi {
    name: String,
    glrc: Option<A::RenderingContext>,
    pixel_format: Option<PixelFormatDescriptor>,
}

unsafe impl<A> Send for ShareHandle<A> where A: WglApi {}

impl<A> Clone for ShareHandle<A> where A: WglApi {
    fn clone(&self) -> Self {
        ShareHandle {
            name: self.name.clone(),
            glrc: self.glrc,
            pixel_format: self.pixel_format,
        }
    }
}

impl<A> Debug for ShareHandle<A> where A: WglApi {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("ShareHandle")
         .field("name", &self.name)
         .field("glrc", &self.glrc)
         .field("pixel_format", &self.pixel_format)
         .finish()
    }
}

impl<A> ShareHandle<A> where A: WglApi {
    /// The name of the context the handle was taken from.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rendering context to share with, if the context was initialized.
    #[inline]
    pub fn rendering_context(&self) -> Option<A::RenderingContext> {
        self.glrc
    }

    // The handle a new context passes to `wglCreateContextAttribsARB`.
    fn resolve(&self, sharer: &str, descriptor: &PixelFormatDescriptor)
               -> Result<A::RenderingContext, Error> {
        let glrc = match self.glrc {
            Some(glrc) => glrc,
            None => {
                warn!("{}: the context to share with is not initialized", sharer);
                // Creating an unshared context here would silently break the caller's sharing.
                return Err(Error::ContextCreationFailed(WindowingApiError::BadContext));
            }
        };
        if let Some(ref own_descriptor) = self.pixel_format {
            if !own_descriptor.is_compatible_with(descriptor) {
                warn!("{}: pixel format {:?} doesn't match `{}`'s {:?}; sharing may fail",
                      sharer,
                      descriptor,
                      self.name,
                      own_descriptor);
            }
        }
        Ok(glrc)
    }
}

/// Owns a window (or hidden surface), its device context and a rendering context created with
/// `wglCreateContextAttribsARB`, optionally sharing objects with another `SharedContext`.
///
/// A context is created by `init` and destroyed by `shutdown`, which also runs on drop.
pub struct SharedContext<A> where A: WglApi {
    api: A,
    pub(crate) state: ContextState<A>,
}

// Everything `shutdown` resets.
pub(crate) struct ContextState<A> where A: WglApi {
    pub(crate) lifecycle: Lifecycle,
    pub(crate) name: String,
    pub(crate) has_widget: bool,
    pub(crate) window: Option<A::Window>,
    pub(crate) dc: Option<A::DeviceContext>,
    pub(crate) glrc: Option<A::RenderingContext>,
    pub(crate) extension_functions: WGLExtensionFunctions,
    pub(crate) pixel_format: Option<(PixelFormatIndex, PixelFormatDescriptor)>,
}

impl<A> Default for ContextState<A> where A: WglApi {
    fn default() -> Self {
        ContextState {
            lifecycle: Lifecycle::Uninitialized,
            name: String::new(),
            has_widget: false,
            window: None,
            dc: None,
            glrc: None,
            extension_functions: WGLExtensionFunctions::default(),
            pixel_format: None,
        }
    }
}

impl<A> PartialEq for ContextState<A> where A: WglApi {
    fn eq(&self, other: &Self) -> bool {
        self.lifecycle == other.lifecycle &&
            self.name == other.name &&
            self.has_widget == other.has_widget &&
            self.window == other.window &&
            self.dc == other.dc &&
            self.glrc == other.glrc &&
            self.extension_functions == other.extension_functions &&
            self.pixel_format == other.pixel_format
    }
}

impl<A> Debug for ContextState<A> where A: WglApi {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("ContextState")
         .field("lifecycle", &self.lifecycle)
         .field("name", &self.name)
         .field("has_widget", &self.has_widget)
         .field("window", &self.window)
         .field("dc", &self.dc)
         .field("glrc", &self.glrc)
         .field("extension_functions", &self.extension_functions)
         .field("pixel_format", &self.pixel_format)
         .finish()
    }
}

impl<A> Default for SharedContext<A> where A: WglApi + Default {
    #[inline]
    fn default() -> Self {
        SharedContext::with_api(A::default())
    }
}

impl<A> Drop for SharedContext<A> where A: WglApi {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<A> SharedContext<A> where A: WglApi {
    /// Returns an uninitialized context that makes its native calls through `api`.
    #[inline]
    pub fn with_api(api: A) -> SharedContext<A> {
        SharedContext { api, state: ContextState::default() }
    }

    #[inline]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Creates the window, pixel format and rendering context described by `settings`.
    ///
    /// On failure everything this call allocated is released again and the context stays
    /// uninitialized. Calling `init` on an initialized context fails with `AlreadyInitialized`
    /// and leaves the existing context alone.
    pub fn init(&mut self, settings: &ContextSettings<A>) -> Result<(), Error> {
        settings.validate()?;
        if self.state.lifecycle != Lifecycle::Uninitialized {
            return Err(Error::AlreadyInitialized);
        }

        self.state.lifecycle = Lifecycle::Initializing;
        match self.create(settings) {
            Ok(state) => {
                debug!("{}: ready ({:?})", state.name, state.glrc);
                self.state = state;
                Ok(())
            }
            Err(err) => {
                error!("{}: init failed: {}", settings.name, err);
                self.state = ContextState::default();
                Err(err)
            }
        }
    }

    fn create(&self, settings: &ContextSettings<A>) -> Result<ContextState<A>, Error> {
        let api = &self.api;

        // The bootstrap context is gone again by the time this returns.
        let extension_functions = bootstrap::load_extension_functions(api)?;

        let mut pending = PendingObjects::new(api);
        let window_descriptor = settings.window_descriptor()?;
        let window = match window_descriptor {
            Some(ref descriptor) => {
                api.register_window_class().map_err(Error::SurfaceCreationFailed)?;
                api.create_window(descriptor).map_err(Error::SurfaceCreationFailed)?
            }
            None => api.create_hidden_window().map_err(Error::SurfaceCreationFailed)?,
        };
        pending.window = Some(window);

        let dc = api.get_dc(window).map_err(Error::SurfaceCreationFailed)?;
        pending.dc = Some(dc);

        let pixel_format = choose_pixel_format(api,
                                               &extension_functions,
                                               dc,
                                               &settings.pixel_format_attributes())?;
        let descriptor = api.describe_pixel_format(dc, pixel_format)
                            .map_err(Error::PixelFormatDescriptionFailed)?;
        api.set_pixel_format(dc, pixel_format, &descriptor)
           .map_err(Error::PixelFormatApplicationFailed)?;
        debug!("{}: pixel format {:?} {:?}", settings.name, pixel_format, descriptor);

        let share = match settings.shares_with {
            None => None,
            Some(ref handle) => Some(handle.resolve(&settings.name, &descriptor)?),
        };

        let create_context_attribs = extension_functions.CreateContextAttribsARB
                                                        .ok_or(Error::ContextCreationFailed(
                                                            WindowingApiError::Failed))?;
        let attribs = settings.attributes.to_attrib_list();
        let glrc = unsafe {
            api.create_context_attribs_arb(create_context_attribs, dc, share, &attribs)
               .map_err(Error::ContextCreationFailed)?
        };
        pending.glrc = Some(glrc);

        let (window, dc, glrc) = pending.commit();
        Ok(ContextState {
            lifecycle: Lifecycle::Ready,
            name: settings.name.clone(),
            has_widget: window_descriptor.is_some(),
            window: Some(window),
            dc: Some(dc),
            glrc: Some(glrc),
            extension_functions,
            pixel_format: Some((pixel_format, descriptor)),
        })
    }

    /// A token other contexts, on this thread or another, can share this context's objects
    /// through. Taken before `init`, it makes sharing fail.
    pub fn share_handle(&self) -> ShareHandle<A> {
        ShareHandle {
            name: self.state.name.clone(),
            glrc: self.state.glrc,
            pixel_format: self.state.pixel_format.map(|(_, descriptor)| descriptor),
        }
    }

    /// Releases the rendering context, the device context and the window, in that order, and
    /// resets every field to its uninitialized state.
    ///
    /// Never fails; problems are logged. Safe to call any number of times.
    pub fn shutdown(&mut self) {
        if self.state.lifecycle == Lifecycle::Uninitialized {
            return;
        }
        let state = std::mem::take(&mut self.state);
        destroy_objects(&self.api, state.window, state.dc, state.glrc);
        debug!("{}: shut down", state.name);
    }

    /// Makes the window visible.
    pub fn show(&self) -> Result<(), Error> {
        match self.state.window {
            Some(window) if self.state.has_widget => {
                self.api.show_window(window);
                Ok(())
            }
            _ => Err(Error::NoWidgetAttached),
        }
    }

    /// Dispatches pending window messages without blocking.
    ///
    /// Returns `true` if the window was asked to close.
    pub fn process_messages(&self) -> Result<bool, Error> {
        match self.state.window {
            Some(window) => Ok(self.api.process_messages(window)),
            None => Err(Error::NoWidgetAttached),
        }
    }

    /// Makes this context current on the calling thread.
    ///
    /// The returned guard makes the previously-current context current again when it is dropped
    /// or released. If this fails, the previously-current context stays current.
    pub fn make_current(&self) -> Result<CurrentContextGuard<'_, A>, Error> {
        let binding = self.binding()?;
        let previous = self.api.current();
        if let Err(err) = self.api.make_current(binding) {
            if let Err(restore_err) = self.api.make_current(previous) {
                warn!("{}: couldn't restore the previous context: {}",
                      self.state.name,
                      restore_err);
            }
            return Err(Error::MakeCurrentFailed(err));
        }
        Ok(CurrentContextGuard { context: self, previous, released: false })
    }

    fn binding(&self) -> Result<CurrentBinding<A>, Error> {
        let glrc = self.state.glrc.ok_or(Error::MakeCurrentFailed(WindowingApiError::BadContext))?;
        let dc = self.state.dc.ok_or(Error::MakeCurrentFailed(WindowingApiError::BadDrawable))?;
        Ok(CurrentBinding { dc: Some(dc), glrc: Some(glrc) })
    }

    /// Presents the back buffer.
    pub fn swap_buffers(&self) -> Result<(), Error> {
        let dc = self.state.dc.ok_or(Error::PresentFailed(WindowingApiError::BadDrawable))?;
        self.api.swap_buffers(dc).map_err(Error::PresentFailed)
    }

    /// Asks the driver for the best format matching `attributes` on this context's device
    /// context. The answer is the same for the same request.
    pub fn choose_pixel_format(&self, attributes: &PixelFormatAttributes)
                               -> Result<PixelFormatIndex, Error> {
        let dc = self.state.dc.ok_or(Error::NotInitialized)?;
        choose_pixel_format(&self.api, &self.state.extension_functions, dc, attributes)
    }

    /// Queries the driver strings of this context. The context is current only for the duration
    /// of the call.
    pub fn info(&self) -> Result<ContextInfo, Error> {
        if self.state.glrc.is_none() {
            return Err(Error::NotInitialized);
        }
        let _guard = self.make_current()?;

        // `glow` calls `glGetString` while loading, so make sure it is there.
        if self.api.get_proc_address("glGetString").is_none() {
            return Err(Error::GLFunctionNotFound);
        }
        let info = unsafe {
            let gl = glow::Context::from_loader_function(|symbol| {
                self.api.get_proc_address(symbol).map_or(ptr::null(), |address| address.as_ptr())
            });
            ContextInfo {
                name: self.state.name.clone(),
                version: gl.get_parameter_string(glow::VERSION),
                vendor: gl.get_parameter_string(glow::VENDOR),
                renderer: gl.get_parameter_string(glow::RENDERER),
            }
        };
        info!("{}: GL_VERSION: {}", info.name, info.version);
        info!("{}: GL_VENDOR: {}", info.name, info.vendor);
        info!("{}: GL_RENDERER: {}", info.name, info.renderer);
        Ok(info)
    }

    /// The window, device context and rendering context, once initialized.
    pub fn native_context(&self) -> Option<NativeContext<A>> {
        match (self.state.window, self.state.dc, self.state.glrc) {
            (Some(window), Some(dc), Some(glrc)) => Some(NativeContext { window, dc, glrc }),
            _ => None,
        }
    }

    /// The pixel format chosen for the surface.
    #[inline]
    pub fn pixel_format(&self) -> Option<(PixelFormatIndex, PixelFormatDescriptor)> {
        self.state.pixel_format
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.state.name
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.state.lifecycle
    }

    /// Whether this context is current on the calling thread.
    pub fn is_current(&self) -> bool {
        self.state.glrc.is_some() && self.api.current().glrc == self.state.glrc
    }

    /// Whether every field is in its never-initialized state.
    #[inline]
    pub fn is_uninitialized(&self) -> bool {
        self.state == ContextState::default()
    }
}

/// Proof that a `SharedContext` is current on this thread.
///
/// Dropping the guard, or calling `release`, makes the previously-current context current again.
/// Nested guards must be released in the reverse order they were created in: each one restores
/// the binding it saw, so releasing an outer guard before an inner one leaves the inner guard to
/// restore a binding that is no longer the caller's.
#[must_use]
pub struct CurrentContextGuard<'a, A> where A: WglApi {
    context: &'a SharedContext<A>,
    previous: CurrentBinding<A>,
    released: bool,
}

impl<'a, A> CurrentContextGuard<'a, A> where A: WglApi {
    #[inline]
    pub fn context(&self) -> &'a SharedContext<A> {
        self.context
    }

    /// Restores the previous context, reporting failure.
    pub fn release(mut self) -> Result<(), Error> {
        self.released = true;
        self.context.api.make_current(self.previous).map_err(Error::MakeCurrentFailed)
    }
}

impl<'a, A> Drop for CurrentContextGuard<'a, A> where A: WglApi {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.context.api.make_current(self.previous) {
            warn!("{}: couldn't restore the previous context: {}", self.context.name(), err);
        }
    }
}

fn choose_pixel_format<A>(api: &A,
                          extension_functions: &WGLExtensionFunctions,
                          dc: A::DeviceContext,
                          attributes: &PixelFormatAttributes)
                          -> Result<PixelFormatIndex, Error>
                          where A: WglApi {
    let choose_pixel_format_arb = extension_functions.ChoosePixelFormatARB
                                                     .ok_or(Error::PixelFormatSelectionFailed(
                                                         WindowingApiError::Failed))?;
    let attribs = attributes.to_attrib_list();
    unsafe {
        api.choose_pixel_format_arb(choose_pixel_format_arb, dc, &attribs)
           .map_err(Error::PixelFormatSelectionFailed)?
           .ok_or(Error::NoPixelFormatFound)
    }
}

// Objects created by an `init` call that hasn't finished yet.
struct PendingObjects<'a, A> where A: WglApi {
    api: &'a A,
    window: Option<A::Window>,
    dc: Option<A::DeviceContext>,
    glrc: Option<A::RenderingContext>,
}

impl<'a, A> PendingObjects<'a, A> where A: WglApi {
    fn new(api: &'a A) -> PendingObjects<'a, A> {
        PendingObjects { api, window: None, dc: None, glrc: None }
    }

    fn commit(mut self) -> (A::Window, A::DeviceContext, A::RenderingContext) {
        match (self.window.take(), self.dc.take(), self.glrc.take()) {
            (Some(window), Some(dc), Some(glrc)) => (window, dc, glrc),
            _ => unreachable!("committed an incomplete context"),
        }
    }
}

impl<'a, A> Drop for PendingObjects<'a, A> where A: WglApi {
    fn drop(&mut self) {
        destroy_objects(self.api, self.window.take(), self.dc.take(), self.glrc.take());
    }
}

fn destroy_objects<A>(api: &A,
                      window: Option<A::Window>,
                      dc: Option<A::DeviceContext>,
                      glrc: Option<A::RenderingContext>)
                      where A: WglApi {
    if let Some(glrc) = glrc {
        if api.current().glrc == Some(glrc) {
            if let Err(err) = api.make_current(CurrentBinding::none()) {
                warn!("couldn't release the current context: {}", err);
            }
        }
        if let Err(err) = api.delete_context(glrc) {
            warn!("couldn't delete the rendering context: {}", err);
        }
    }
    if let (Some(window), Some(dc)) = (window, dc) {
        if let Err(err) = api.release_dc(window, dc) {
            warn!("couldn't release the device context: {}", err);
        }
    }
    if let Some(window) = window {
        if let Err(err) = api.destroy_window(window) {
            warn!("couldn't destroy the window: {}", err);
        }
    }
}

// glshare/src/bootstrap.rs
//
//! The disposable legacy context that unlocks the WGL extension functions.
//!
//! `wglGetProcAddress` only resolves `wglChoosePixelFormatARB` and `wglCreateContextAttribsARB`
//! while some context is current on the calling thread, and a surface accepts a pixel format only
//! once. So a throwaway window gets a legacy format and context, the two functions are looked up,
//! and everything is destroyed again before the real context is built.

use crate::api::{CurrentBinding, ProcAddress, WGLExtensionFunctions, WglApi};
use crate::api::{CHOOSE_PIXEL_FORMAT_ARB, CREATE_CONTEXT_ATTRIBS_ARB};
use crate::error::BootstrapError;
use crate::pixel_format::PixelFormatDescriptor;

/// Creates a legacy context on the calling thread, resolves the extension functions, and tears
/// the context down again.
///
/// The thread's previously-current context is current again when this returns, whether or not
/// it succeeded.
pub fn load_extension_functions<A>(api: &A) -> Result<WGLExtensionFunctions, BootstrapError>
                                   where A: WglApi {
    let mut context = BootstrapContext::new(api);
    context.create()?;
    context.resolve()
}

struct BootstrapContext<'a, A> where A: WglApi {
    api: &'a A,
    previous: CurrentBinding<A>,
    window: Option<A::Window>,
    dc: Option<A::DeviceContext>,
    glrc: Option<A::RenderingContext>,
}

impl<'a, A> BootstrapContext<'a, A> where A: WglApi {
    fn new(api: &'a A) -> BootstrapContext<'a, A> {
        BootstrapContext {
            api,
            previous: api.current(),
            window: None,
            dc: None,
            glrc: None,
        }
    }

    fn create(&mut self) -> Result<(), BootstrapError> {
        let window = self.api
                         .create_hidden_window()
                         .map_err(BootstrapError::WindowCreationFailed)?;
        self.window = Some(window);

        let dc = self.api.get_dc(window).map_err(BootstrapError::DeviceContextUnavailable)?;
        self.dc = Some(dc);

        let descriptor = PixelFormatDescriptor::legacy();
        let pixel_format = self.api
                               .choose_pixel_format(dc, &descriptor)
                               .map_err(BootstrapError::PixelFormatSelectionFailed)?;
        self.api
            .set_pixel_format(dc, pixel_format, &descriptor)
            .map_err(BootstrapError::PixelFormatApplicationFailed)?;
        debug!("bootstrap: legacy pixel format {:?} on {:?}", pixel_format, dc);

        let glrc = self.api
                       .create_legacy_context(dc)
                       .map_err(BootstrapError::ContextCreationFailed)?;
        self.glrc = Some(glrc);

        self.api
            .make_current(CurrentBinding { dc: Some(dc), glrc: Some(glrc) })
            .map_err(BootstrapError::MakeCurrentFailed)
    }

    fn resolve(&self) -> Result<WGLExtensionFunctions, BootstrapError> {
        let functions = WGLExtensionFunctions {
            ChoosePixelFormatARB: Some(self.lookup(CHOOSE_PIXEL_FORMAT_ARB)?),
            CreateContextAttribsARB: Some(self.lookup(CREATE_CONTEXT_ATTRIBS_ARB)?),
        };
        debug!("bootstrap: resolved {:?}", functions);
        Ok(functions)
    }

    fn lookup(&self, name: &'static str) -> Result<ProcAddress, BootstrapError> {
        self.api.get_proc_address(name).ok_or(BootstrapError::ExtensionUnavailable(name))
    }
}

impl<'a, A> Drop for BootstrapContext<'a, A> where A: WglApi {
    fn drop(&mut self) {
        // A failed `wglMakeCurrent` may still have released the old context, so restore anyway.
        if self.glrc.is_some() {
            if let Err(err) = self.api.make_current(self.previous) {
                warn!("bootstrap: couldn't restore the previous context: {}", err);
            }
        }
        if let Some(glrc) = self.glrc.take() {
            if let Err(err) = self.api.delete_context(glrc) {
                warn!("bootstrap: couldn't delete the legacy context: {}", err);
            }
        }
        if let (Some(window), Some(dc)) = (self.window, self.dc.take()) {
            if let Err(err) = self.api.release_dc(window, dc) {
                warn!("bootstrap: couldn't release the device context: {}", err);
            }
        }
        if let Some(window) = self.window.take() {
            if let Err(err) = self.api.destroy_window(window) {
                warn!("bootstrap: couldn't destroy the window: {}", err);
            }
        }
        debug!("bootstrap: torn down");
    }
}

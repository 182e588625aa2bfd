// glshare/src/tests.rs
//
//! Unit tests.

use crate::api::{CurrentBinding, WglApi, CHOOSE_PIXEL_FORMAT_ARB, CREATE_CONTEXT_ATTRIBS_ARB};
use crate::bootstrap;
use crate::platform::generic::fake::{FakeCall, FakePixelFormat, FakeWgl};
use crate::platform::generic::fake::default_pixel_formats;
use crate::{BootstrapError, ContextAttributes, ContextSettings, Error, ErrorKind, GLProfile};
use crate::{GLVersion, Lifecycle, PixelFormatAttributes, PixelFormatIndex, SettingsError};
use crate::{NativeContext, ShareHandle, SharedContext, WindowExStyle, WindowFlags, WindowStyle};
use crate::WindowingApiError;

use euclid::default::{Point2D, Size2D};
use std::ffi::CString;
use std::thread;

fn windowed(name: &str) -> ContextSettings<FakeWgl> {
    ContextSettings::new(name).title(name).position(0, 0).size(800, 600)
}

fn headless(name: &str) -> ContextSettings<FakeWgl> {
    ContextSettings::headless(name)
}

fn injected() -> WindowingApiError {
    WindowingApiError::Os { code: 0x1234, message: "injected".to_owned() }
}

fn assert_nothing_alive(fake: &FakeWgl) {
    assert_eq!(fake.live_windows(), 0);
    assert_eq!(fake.live_dcs(), 0);
    assert_eq!(fake.live_contexts(), 0);
}

#[test]
fn test_init_and_shutdown() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    assert!(context.is_uninitialized());
    assert_eq!(context.lifecycle(), Lifecycle::Uninitialized);

    context.init(&windowed("main").decorated(true)).unwrap();
    assert_eq!(context.lifecycle(), Lifecycle::Ready);
    assert_eq!(context.name(), "main");
    assert!(!context.is_uninitialized());

    // Only the target window, its device context and the versioned context survive `init`.
    assert_eq!(fake.live_windows(), 1);
    assert_eq!(fake.live_dcs(), 1);
    assert_eq!(fake.live_contexts(), 1);

    context.shutdown();
    assert!(context.is_uninitialized());
    assert!(context.native_context().is_none());
    assert_nothing_alive(&fake);
}

#[test]
fn test_drop_shuts_down() {
    let fake = FakeWgl::new();
    {
        let mut context = SharedContext::with_api(fake.clone());
        context.init(&windowed("main")).unwrap();
    }
    assert_nothing_alive(&fake);
}

#[test]
fn test_repeated_shutdown() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    context.shutdown();
    assert!(context.is_uninitialized());

    context.init(&headless("main")).unwrap();
    context.shutdown();
    context.shutdown();
    assert!(context.is_uninitialized());
    assert_nothing_alive(&fake);
}

#[test]
fn test_shutdown_after_failed_init() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    fake.fail_next(FakeCall::CreateContextAttribsArb, injected());
    assert_eq!(context.init(&windowed("main")),
               Err(Error::ContextCreationFailed(injected())));
    assert!(context.is_uninitialized());

    context.shutdown();
    assert!(context.is_uninitialized());
    context.shutdown();
    assert!(context.is_uninitialized());
    assert_eq!(fake.call_count(FakeCall::DeleteContext), 1);
    assert_nothing_alive(&fake);
}

#[test]
fn test_shutdown_releases_current_context() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    context.init(&windowed("main")).unwrap();
    let native = context.native_context().unwrap();
    fake.make_current(CurrentBinding { dc: Some(native.dc), glrc: Some(native.glrc) }).unwrap();
    assert!(context.is_current());

    context.shutdown();
    assert_eq!(fake.current(), CurrentBinding::none());
    assert_nothing_alive(&fake);
}

#[test]
fn test_double_init() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    context.init(&windowed("first")).unwrap();
    let native = context.native_context().unwrap();

    match context.init(&windowed("second")) {
        Err(err @ Error::AlreadyInitialized) => assert_eq!(err.kind(), ErrorKind::State),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(context.name(), "first");
    let again = context.native_context().unwrap();
    assert_eq!((again.window, again.dc, again.glrc), (native.window, native.dc, native.glrc));
    assert_eq!(fake.live_contexts(), 1);
}

#[test]
fn test_invalid_settings() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    match context.init(&windowed("")) {
        Err(err @ Error::InvalidSettings(SettingsError::MissingName)) => {
            assert_eq!(err.kind(), ErrorKind::Config)
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(context.is_uninitialized());
    // Validation happens before anything native is touched.
    assert_eq!(fake.call_count(FakeCall::CreateHiddenWindow), 0);
}

#[test]
fn test_settings_validation() {
    assert_eq!(ContextSettings::<FakeWgl>::new("main").validate(),
               Err(SettingsError::MissingTitle));
    assert_eq!(ContextSettings::<FakeWgl>::new("main").title("main").size(800, 600).validate(),
               Err(SettingsError::MissingPosition));
    assert_eq!(ContextSettings::<FakeWgl>::new("main").title("main").position(0, 0).validate(),
               Err(SettingsError::MissingSize));
    let untitled = ContextSettings::<FakeWgl>::new("main").position(0, 0).size(800, 600);
    assert_eq!(untitled.validate(), Err(SettingsError::MissingTitle));
    assert_eq!(untitled.window_descriptor(), Err(SettingsError::MissingTitle));
    assert_eq!(windowed("main").size(0, 600).validate(),
               Err(SettingsError::InvalidSize { width: 0, height: 600 }));
    assert_eq!(windowed("main").samples(3).validate(), Err(SettingsError::InvalidSampleCount(3)));
    assert_eq!(windowed("ma\0in").validate(), Err(SettingsError::InteriorNul));
    assert_eq!(windowed("main").title("a\0b").validate(), Err(SettingsError::InteriorNul));
    assert_eq!(headless("main").validate(), Ok(()));
    // Title and position only matter for a dedicated window.
    assert_eq!(headless("main").size(0, 0).validate(), Ok(()));
    for &samples in &[0, 2, 4, 8, 16] {
        assert_eq!(windowed("main").samples(samples).validate(), Ok(()));
    }
}

#[test]
fn test_window_descriptor() {
    let descriptor = windowed("main").decorated(true).window_descriptor().unwrap().unwrap();
    assert_eq!(descriptor.title, CString::new("main").unwrap());
    assert_eq!(descriptor.position, Point2D::new(0, 0));
    assert_eq!(descriptor.size, Size2D::new(800, 600));
    assert_eq!(descriptor.style,
               WindowStyle::CLIP_SIBLINGS |
               WindowStyle::CLIP_CHILDREN |
               WindowStyle::SYSTEM_MENU |
               WindowStyle::MINIMIZE_BOX);
    assert_eq!(descriptor.ex_style, WindowExStyle::APP_WINDOW);

    let descriptor = windowed("main").title("Main window")
                                     .position(10, 20)
                                     .window_descriptor()
                                     .unwrap()
                                     .unwrap();
    assert_eq!(descriptor.title, CString::new("Main window").unwrap());
    assert_eq!(descriptor.position, Point2D::new(10, 20));

    assert_eq!(headless("main").window_descriptor(), Ok(None));
}

#[test]
fn test_window_styles() {
    let style = WindowStyle::from_flags(WindowFlags::empty());
    assert!(style.contains(WindowStyle::POPUP |
                           WindowStyle::CLIP_SIBLINGS |
                           WindowStyle::CLIP_CHILDREN));
    assert!(!style.intersects(WindowStyle::SYSTEM_MENU | WindowStyle::THICK_FRAME));

    let style = WindowStyle::from_flags(WindowFlags::DECORATED | WindowFlags::RESIZABLE);
    assert!(!style.contains(WindowStyle::POPUP));
    assert!(style.contains(WindowStyle::SYSTEM_MENU |
                           WindowStyle::MINIMIZE_BOX |
                           WindowStyle::MAXIMIZE_BOX |
                           WindowStyle::THICK_FRAME));

    let style = WindowStyle::from_flags(WindowFlags::RESIZABLE);
    assert!(style.contains(WindowStyle::POPUP | WindowStyle::THICK_FRAME));

    assert_eq!(WindowExStyle::from_flags(WindowFlags::FLOATING),
               WindowExStyle::APP_WINDOW | WindowExStyle::TOPMOST);
    assert_eq!(WindowExStyle::from_flags(WindowFlags::DECORATED), WindowExStyle::APP_WINDOW);
}

#[test]
fn test_windowed_context() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    let settings = windowed("main").decorated(true);
    context.init(&settings).unwrap();

    let native = context.native_context().unwrap();
    assert_eq!(fake.window_descriptor(native.window), settings.window_descriptor().unwrap());
    assert_eq!(fake.context_attributes(native.glrc),
               Some(ContextAttributes {
                   version: GLVersion::new(4, 1),
                   profile: GLProfile::Core,
               }));

    assert!(!fake.is_visible(native.window));
    context.show().unwrap();
    assert!(fake.is_visible(native.window));

    let guard = context.make_current().unwrap();
    assert!(context.is_current());
    context.swap_buffers().unwrap();
    drop(guard);
    assert!(!context.is_current());
}

#[test]
fn test_headless_context() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    context.init(&headless("offscreen")).unwrap();

    let native = context.native_context().unwrap();
    assert_eq!(fake.window_descriptor(native.window), None);
    assert_eq!(fake.call_count(FakeCall::RegisterWindowClass), 0);

    match context.show() {
        Err(err @ Error::NoWidgetAttached) => assert_eq!(err.kind(), ErrorKind::NotReady),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(context.process_messages(), Ok(false));

    let _guard = context.make_current().unwrap();
    assert_eq!(fake.current(), CurrentBinding { dc: Some(native.dc), glrc: Some(native.glrc) });
}

#[test]
fn test_window_class_registered_once() {
    let fake = FakeWgl::new();
    let mut first = SharedContext::with_api(fake.clone());
    let mut second = SharedContext::with_api(fake.clone());
    first.init(&windowed("first")).unwrap();
    second.init(&windowed("second")).unwrap();
    first.shutdown();
    first.init(&windowed("first")).unwrap();
    assert_eq!(fake.window_class_registrations(), 1);
}

#[test]
fn test_process_messages() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    assert_eq!(context.process_messages(), Err(Error::NoWidgetAttached));

    context.init(&windowed("main")).unwrap();
    assert_eq!(context.process_messages(), Ok(false));
    fake.post_quit();
    assert_eq!(context.process_messages(), Ok(true));
    assert_eq!(context.process_messages(), Ok(false));
}

#[test]
fn test_operations_on_uninitialized_context() {
    let context = SharedContext::with_api(FakeWgl::new());
    match context.make_current() {
        Err(Error::MakeCurrentFailed(WindowingApiError::BadContext)) => {}
        Err(err) => panic!("unexpected error: {:?}", err),
        Ok(_) => panic!("made an uninitialized context current"),
    }
    assert_eq!(context.swap_buffers(),
               Err(Error::PresentFailed(WindowingApiError::BadDrawable)));
    assert_eq!(context.show(), Err(Error::NoWidgetAttached));
    assert_eq!(context.info(), Err(Error::NotInitialized));
    assert_eq!(context.choose_pixel_format(&PixelFormatAttributes::default()),
               Err(Error::NotInitialized));
    assert!(!context.is_current());
    assert!(context.pixel_format().is_none());
}

#[test]
fn test_pixel_format_choice_is_deterministic() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    context.init(&windowed("main")).unwrap();

    let (index, descriptor) = context.pixel_format().unwrap();
    assert_eq!(index, PixelFormatIndex(2));
    assert_eq!((descriptor.color_bits, descriptor.alpha_bits), (32, 8));
    assert_eq!((descriptor.depth_bits, descriptor.stencil_bits), (24, 8));

    let attributes = PixelFormatAttributes::default();
    let first = context.choose_pixel_format(&attributes).unwrap();
    let second = context.choose_pixel_format(&attributes).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, index);

    let multisampled = context.choose_pixel_format(&PixelFormatAttributes::with_samples(4));
    assert_eq!(multisampled, Ok(PixelFormatIndex(3)));
}

#[test]
fn test_no_matching_pixel_format() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    // The only 8x format is not hardware accelerated.
    match context.init(&windowed("main").samples(8)) {
        Err(err @ Error::NoPixelFormatFound) => assert_eq!(err.kind(), ErrorKind::PixelFormat),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(context.is_uninitialized());
    assert_nothing_alive(&fake);
}

#[test]
fn test_unsupported_version() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    let result = context.init(&windowed("main").version(5, 0));
    assert_eq!(result, Err(Error::ContextCreationFailed(WindowingApiError::BadVersion)));
    assert!(context.is_uninitialized());
    assert_nothing_alive(&fake);
}

#[test]
fn test_shared_context() {
    let fake = FakeWgl::new();
    let mut a = SharedContext::with_api(fake.clone());
    a.init(&windowed("a")).unwrap();
    let a_native = a.native_context().unwrap();

    let a_guard = a.make_current().unwrap();
    let mut b = SharedContext::with_api(fake.clone());
    b.init(&windowed("b").shares_with(&a)).unwrap();
    let b_native = b.native_context().unwrap();
    assert_eq!(fake.share_of(b_native.glrc), Some(a_native.glrc));

    // `init` leaves the thread's current context alone.
    assert!(a.is_current());

    let b_guard = b.make_current().unwrap();
    assert!(b.is_current());
    assert!(!a.is_current());
    b.swap_buffers().unwrap();
    b_guard.release().unwrap();
    assert!(a.is_current());

    drop(a_guard);
    assert_eq!(fake.current(), CurrentBinding::none());
}

#[test]
fn test_share_with_uninitialized_context() {
    let fake = FakeWgl::new();
    let a = SharedContext::with_api(fake.clone());
    let mut b = SharedContext::with_api(fake.clone());
    match b.init(&windowed("b").shares_with(&a)) {
        Err(err @ Error::ContextCreationFailed(WindowingApiError::BadContext)) => {
            assert_eq!(err.kind(), ErrorKind::ContextCreation)
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(b.is_uninitialized());
    assert_nothing_alive(&fake);
}

#[test]
fn test_share_handle() {
    let fake = FakeWgl::new();
    let mut a = SharedContext::with_api(fake.clone());
    a.init(&windowed("a")).unwrap();
    let a_native = a.native_context().unwrap();

    // The handle crosses threads; the fake driver itself doesn't.
    let handle = a.share_handle();
    let handle = thread::spawn(move || handle).join().unwrap();
    assert_eq!(handle.name(), "a");
    assert_eq!(handle.rendering_context(), Some(a_native.glrc));

    let mut b = SharedContext::with_api(fake.clone());
    b.init(&headless("b").shares_with_handle(handle)).unwrap();
    assert_eq!(fake.share_of(b.native_context().unwrap().glrc), Some(a_native.glrc));
}

#[test]
fn test_share_handle_from_uninitialized_context() {
    let fake = FakeWgl::new();
    let mut a = SharedContext::with_api(fake.clone());
    let early = a.share_handle();
    assert_eq!(early.rendering_context(), None);
    a.init(&windowed("a")).unwrap();

    let mut b = SharedContext::with_api(fake.clone());
    match b.init(&headless("b").shares_with_handle(early)) {
        Err(err @ Error::ContextCreationFailed(WindowingApiError::BadContext)) => {
            assert_eq!(err.kind(), ErrorKind::ContextCreation)
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(b.is_uninitialized());
    assert_eq!(fake.live_contexts(), 1);
}

#[test]
fn test_native_handles_are_send() {
    fn assert_send<T: Send>() {}
    assert_send::<ShareHandle<FakeWgl>>();
    assert_send::<NativeContext<FakeWgl>>();
}

#[test]
fn test_share_with_incompatible_pixel_format() {
    let mut formats = default_pixel_formats();
    formats.truncate(2);
    let mut deep = formats[1];
    deep.descriptor.depth_bits = 32;
    deep.samples = 4;
    formats.push(deep);

    let fake = FakeWgl::with_pixel_formats(formats);
    let mut a = SharedContext::with_api(fake.clone());
    a.init(&windowed("a")).unwrap();
    let mut b = SharedContext::with_api(fake.clone());
    let result = b.init(&windowed("b").samples(4).shares_with(&a));
    assert_eq!(result, Err(Error::ContextCreationFailed(WindowingApiError::BadMatch)));
    assert!(b.is_uninitialized());
    assert_eq!(fake.live_contexts(), 1);
}

#[test]
fn test_make_current_failure_keeps_previous_context() {
    let fake = FakeWgl::new();
    let mut a = SharedContext::with_api(fake.clone());
    let mut b = SharedContext::with_api(fake.clone());
    a.init(&windowed("a")).unwrap();
    b.init(&headless("b")).unwrap();

    let _a_guard = a.make_current().unwrap();
    fake.fail_next(FakeCall::MakeCurrent, WindowingApiError::BadPixelFormat);
    match b.make_current() {
        Err(err @ Error::MakeCurrentFailed(WindowingApiError::BadPixelFormat)) => {
            assert_eq!(err.kind(), ErrorKind::MakeCurrent)
        }
        Err(err) => panic!("unexpected error: {:?}", err),
        Ok(_) => panic!("injected failure was ignored"),
    }
    assert!(a.is_current());
}

#[test]
fn test_nested_guards_restore_in_reverse_order() {
    let fake = FakeWgl::new();
    let mut a = SharedContext::with_api(fake.clone());
    let mut b = SharedContext::with_api(fake.clone());
    a.init(&windowed("a")).unwrap();
    b.init(&headless("b")).unwrap();

    let a_guard = a.make_current().unwrap();
    let b_guard = b.make_current().unwrap();
    assert!(b.is_current());
    b_guard.release().unwrap();
    assert!(a.is_current());
    a_guard.release().unwrap();
    assert_eq!(fake.current(), CurrentBinding::none());

    // Out of order, the inner guard puts back a binding the outer one already undid.
    let a_guard = a.make_current().unwrap();
    let b_guard = b.make_current().unwrap();
    a_guard.release().unwrap();
    assert_eq!(fake.current(), CurrentBinding::none());
    b_guard.release().unwrap();
    assert!(a.is_current());
}

#[test]
fn test_swap_failure() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    context.init(&windowed("main")).unwrap();
    fake.fail_next(FakeCall::SwapBuffers, injected());
    match context.swap_buffers() {
        Err(err @ Error::PresentFailed(_)) => assert_eq!(err.kind(), ErrorKind::Swap),
        other => panic!("unexpected result: {:?}", other),
    }
    context.swap_buffers().unwrap();
}

#[test]
fn test_info_without_gl_entry_points() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    context.init(&headless("main")).unwrap();
    match context.info() {
        Err(err @ Error::GLFunctionNotFound) => assert_eq!(err.kind(), ErrorKind::FunctionLoading),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!context.is_current());
}

#[test]
fn test_load_extension_functions() {
    let fake = FakeWgl::new();
    let functions = bootstrap::load_extension_functions(&fake).unwrap();
    assert!(functions.ChoosePixelFormatARB.is_some());
    assert!(functions.CreateContextAttribsARB.is_some());
    assert_nothing_alive(&fake);
    assert_eq!(fake.current(), CurrentBinding::none());
    // Outside the bootstrap nothing is current, so nothing resolves.
    assert!(fake.get_proc_address(CHOOSE_PIXEL_FORMAT_ARB).is_none());
}

#[test]
fn test_missing_extension() {
    let fake = FakeWgl::new();
    fake.remove_proc(CREATE_CONTEXT_ATTRIBS_ARB);
    let mut context = SharedContext::with_api(fake.clone());
    let err = context.init(&windowed("main")).unwrap_err();
    let missing = BootstrapError::ExtensionUnavailable(CREATE_CONTEXT_ATTRIBS_ARB);
    assert_eq!(err, Error::Bootstrap(missing));
    assert_eq!(err.kind(), ErrorKind::Bootstrap);
    assert!(context.is_uninitialized());
    assert_nothing_alive(&fake);
}

// Fails every bootstrap step in turn while another context is current, and checks that the
// bootstrap cleans up after itself and restores that context.
#[test]
fn test_bootstrap_failure_at_each_step() {
    let steps: [(FakeCall, fn(WindowingApiError) -> BootstrapError); 6] = [
        (FakeCall::CreateHiddenWindow, BootstrapError::WindowCreationFailed),
        (FakeCall::GetDc, BootstrapError::DeviceContextUnavailable),
        (FakeCall::ChoosePixelFormat, BootstrapError::PixelFormatSelectionFailed),
        (FakeCall::SetPixelFormat, BootstrapError::PixelFormatApplicationFailed),
        (FakeCall::CreateLegacyContext, BootstrapError::ContextCreationFailed),
        (FakeCall::MakeCurrent, BootstrapError::MakeCurrentFailed),
    ];

    let fake = FakeWgl::new();
    let mut current = SharedContext::with_api(fake.clone());
    current.init(&windowed("current")).unwrap();
    let _guard = current.make_current().unwrap();

    for &(call, expected) in &steps {
        let mut context = SharedContext::with_api(fake.clone());
        fake.fail_next(call, injected());
        let result = context.init(&headless("main"));
        assert_eq!(result, Err(Error::Bootstrap(expected(injected()))), "{:?}", call);
        assert!(context.is_uninitialized());
        assert!(current.is_current(), "{:?}", call);
        assert_eq!(fake.live_windows(), 1, "{:?}", call);
        assert_eq!(fake.live_dcs(), 1, "{:?}", call);
        assert_eq!(fake.live_contexts(), 1, "{:?}", call);
    }
}

#[test]
fn test_init_failure_releases_partial_objects() {
    let steps = [
        FakeCall::RegisterWindowClass,
        FakeCall::CreateWindow,
        FakeCall::ChoosePixelFormatArb,
        FakeCall::DescribePixelFormat,
        FakeCall::CreateContextAttribsArb,
    ];

    let fake = FakeWgl::new();
    for &call in &steps {
        let mut context = SharedContext::with_api(fake.clone());
        fake.fail_next(call, injected());
        let err = context.init(&windowed("main")).unwrap_err();
        let kind = match call {
            FakeCall::RegisterWindowClass | FakeCall::CreateWindow => ErrorKind::Surface,
            FakeCall::CreateContextAttribsArb => ErrorKind::ContextCreation,
            _ => ErrorKind::PixelFormat,
        };
        assert_eq!(err.kind(), kind, "{:?}", call);
        assert!(context.is_uninitialized());
        assert_nothing_alive(&fake);

        // A failed `init` leaves the context ready for another attempt.
        context.init(&windowed("main")).unwrap();
        context.shutdown();
    }
}

#[test]
fn test_teardown_failure_does_not_mask_success() {
    let fake = FakeWgl::new();
    let mut context = SharedContext::with_api(fake.clone());
    // The first context deleted is the bootstrap's legacy context.
    fake.fail_next(FakeCall::DeleteContext, injected());
    context.init(&windowed("main")).unwrap();
    assert_eq!(context.lifecycle(), Lifecycle::Ready);
}

#[test]
fn test_attribute_lists() {
    assert_eq!(ContextAttributes::default().to_attrib_list(),
               vec![0x2091, 4, 0x2092, 1, 0x9126, 1, 0]);
    let compatibility = ContextAttributes {
        version: GLVersion::new(3, 3),
        profile: GLProfile::Compatibility,
    };
    assert_eq!(ContextAttributes::from_attrib_list(&compatibility.to_attrib_list()),
               compatibility);

    let list = PixelFormatAttributes::with_samples(4).to_attrib_list();
    assert_eq!(list.last(), Some(&0));
    let value_of = |key| list.chunks(2).find(|pair| pair[0] == key).map(|pair| pair[1]);
    assert_eq!(value_of(0x2041), Some(1));
    assert_eq!(value_of(0x2042), Some(4));
    assert_eq!(value_of(0x2003), Some(0x2027));
    assert_eq!(value_of(0x2023), Some(8));

    let list = PixelFormatAttributes::default().to_attrib_list();
    let value_of = |key| list.chunks(2).find(|pair| pair[0] == key).map(|pair| pair[1]);
    assert_eq!(value_of(0x2041), Some(0));
}

#[test]
fn test_windowing_api_error_codes() {
    let message = || "message".to_owned();
    assert_eq!(WindowingApiError::from_code(0, message()), WindowingApiError::Failed);
    assert_eq!(WindowingApiError::from_code(0x2095, message()), WindowingApiError::BadVersion);
    assert_eq!(WindowingApiError::from_code(0xc007_2095, message()),
               WindowingApiError::BadVersion);
    assert_eq!(WindowingApiError::from_code(0x2096, message()), WindowingApiError::BadProfile);
    assert_eq!(WindowingApiError::from_code(0x2054, message()), WindowingApiError::BadMatch);
    assert_eq!(WindowingApiError::from_code(2000, message()),
               WindowingApiError::BadPixelFormat);
    assert_eq!(WindowingApiError::from_code(6, message()), WindowingApiError::BadContext);
    assert_eq!(WindowingApiError::from_code(1400, message()), WindowingApiError::BadWindow);
    assert_eq!(WindowingApiError::from_code(5, message()),
               WindowingApiError::Os { code: 5, message: message() });
}

#[test]
fn test_error_display() {
    let errors = [
        Error::InvalidSettings(SettingsError::MissingName),
        Error::InvalidSettings(SettingsError::MissingTitle),
        Error::InvalidSettings(SettingsError::MissingPosition),
        Error::Bootstrap(BootstrapError::ExtensionUnavailable(CHOOSE_PIXEL_FORMAT_ARB)),
        Error::ContextCreationFailed(WindowingApiError::Os {
            code: 0x57,
            message: "The parameter is incorrect.".to_owned(),
        }),
        Error::NoWidgetAttached,
    ];
    for err in &errors {
        assert!(!err.to_string().is_empty());
    }
    let source = std::error::Error::source(&errors[0]).map(|source| source.to_string());
    assert_eq!(source, Some(SettingsError::MissingName.to_string()));
}

#[test]
fn test_custom_pixel_format_table() {
    let formats = vec![default_pixel_formats()[0], FakePixelFormat {
        accelerated: false,
        ..default_pixel_formats()[1]
    }];
    let fake = FakeWgl::with_pixel_formats(formats);
    let mut context = SharedContext::with_api(fake.clone());
    assert_eq!(context.init(&windowed("main")), Err(Error::NoPixelFormatFound));
    assert_nothing_alive(&fake);
}

#[cfg(windows)]
mod native {
    use crate::{ContextSettings, SharedContext, Wgl};
    use serial_test::serial;
    use std::thread;

    fn window(name: &str) -> ContextSettings<Wgl> {
        ContextSettings::new(name).title(name).position(0, 0).size(320, 240)
    }

    #[test]
    #[ignore]
    #[serial]
    fn test_native_shared_contexts() {
        let mut a = SharedContext::new();
        a.init(&window("a")).unwrap();
        let mut b = SharedContext::new();
        b.init(&ContextSettings::headless("b").shares_with(&a)).unwrap();

        let info = b.info().unwrap();
        assert!(!info.version.is_empty());

        let guard = b.make_current().unwrap();
        b.swap_buffers().unwrap();
        guard.release().unwrap();
        assert!(!b.is_current());
    }

    #[test]
    #[ignore]
    #[serial]
    fn test_native_share_across_threads() {
        let mut a = SharedContext::new();
        a.init(&window("a")).unwrap();
        let a_glrc = a.native_context().unwrap().glrc;

        let handle = a.share_handle();
        let loader = thread::spawn(move || {
            let mut b = SharedContext::new();
            b.init(&ContextSettings::headless("b").shares_with_handle(handle))?;
            let version = b.info()?.version;
            let native = b.native_context();
            b.shutdown();
            Ok::<_, crate::Error>((version, native))
        });
        let (version, native) = loader.join().unwrap().unwrap();
        assert!(!version.is_empty());
        assert!(native.map_or(false, |native| native.glrc != a_glrc));
        assert!(a.native_context().is_some());
    }

    #[test]
    #[ignore]
    #[serial]
    fn test_native_window_lifecycle() {
        let mut context = SharedContext::new();
        context.init(&window("main").decorated(true)).unwrap();
        context.show().unwrap();
        context.process_messages().unwrap();
        context.shutdown();
        assert!(context.is_uninitialized());
        Wgl::unregister_window_class().unwrap();
    }
}

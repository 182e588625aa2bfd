// glshare/demos/shared.rs
//
//! Opens a window with a 4.1 core context, creates a second, headless context on a loader thread
//! that shares its objects, and presents frames until the window is closed or Escape is pressed.

use clap::{App, Arg};

static APP_NAME: &'static str = "glshare shared context demo";

#[cfg(windows)]
fn main() {
    use glshare::{ContextSettings, SharedContext, Wgl};
    use std::thread;

    let matches = App::new(APP_NAME)
        .arg(Arg::with_name("width").long("width").takes_value(true).default_value("800"))
        .arg(Arg::with_name("height").long("height").takes_value(true).default_value("600"))
        .arg(
            Arg::with_name("samples")
                .long("samples")
                .takes_value(true)
                .default_value("0")
                .help("Multisample count: 0, 2, 4, 8 or 16"),
        )
        .arg(
            Arg::with_name("frames")
                .long("frames")
                .takes_value(true)
                .help("Exit after presenting this many frames"),
        )
        .arg(Arg::with_name("resizable").long("resizable").help("Make the window resizable"))
        .get_matches();

    let width = matches.value_of("width").and_then(|value| value.parse().ok()).unwrap_or(800);
    let height = matches.value_of("height").and_then(|value| value.parse().ok()).unwrap_or(600);
    let samples = matches.value_of("samples").and_then(|value| value.parse().ok()).unwrap_or(0);
    let frames: Option<u64> = matches.value_of("frames").and_then(|value| value.parse().ok());

    let mut main_context = SharedContext::new();
    let settings = ContextSettings::<Wgl>::new("main")
        .title(APP_NAME)
        .position(100, 100)
        .size(width, height)
        .samples(samples)
        .decorated(true)
        .resizable(matches.is_present("resizable"));
    main_context.init(&settings).unwrap();

    print_info(&main_context);

    // `main_context` outlives the loader thread: it is joined before shutdown.
    let share_handle = main_context.share_handle();
    let loader = thread::spawn(move || {
        let mut loader_context = SharedContext::new();
        loader_context.init(&ContextSettings::headless("loader").shares_with_handle(share_handle))
                      .unwrap();
        print_info(&loader_context);
        loader_context.shutdown();
    });

    main_context.show().unwrap();
    let guard = main_context.make_current().unwrap();
    let mut presented = 0;
    while !main_context.process_messages().unwrap() {
        main_context.swap_buffers().unwrap();
        presented += 1;
        if frames.map_or(false, |frames| presented >= frames) {
            break;
        }
    }
    guard.release().unwrap();

    loader.join().unwrap();
    main_context.shutdown();
    Wgl::unregister_window_class().unwrap();
}

#[cfg(windows)]
fn print_info(context: &glshare::SharedContext<glshare::Wgl>) {
    match context.info() {
        Ok(info) => {
            println!("{}: {} ({}, {})", info.name, info.version, info.vendor, info.renderer)
        }
        Err(err) => println!("{}: {}", context.name(), err),
    }
}

#[cfg(not(windows))]
fn main() {
    let _ = App::new(APP_NAME).get_matches();
    println!("{} needs WGL, which is only available on Windows.", APP_NAME);
}

#![windows_subsystem = "windows"]

use common::{error::InitError, util::init_logging};

const EXIT_FAILURE: i32 = -1;

fn main() {
    init_logging();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(EXIT_FAILURE);
    }
}

#[cfg(windows)]
fn run() -> Result<(), InitError> {
    use common::{
        config::{RendererConfig, WindowConfig},
        d3d11::{report_live_objects, Renderer},
        os::App,
    };

    let (mut app, window) = App::init(&WindowConfig::default())?;

    let mut renderer = Renderer::new(&window, RendererConfig::default())?;

    // Run main loop.
    while app.run() {
        renderer.render_frame();
    }

    renderer.release();

    report_live_objects();

    Ok(())
}

#[cfg(not(windows))]
fn run() -> Result<(), InitError> {
    Err(InitError::UnsupportedPlatform)
}

//! Headless NovaDE window server.
//!
//! Loads the core configuration, sets up logging, and drives the server
//! against an in-memory framebuffer through a short scripted session: a
//! client maps two overlapping windows, repaints what it is told to, and
//! moves a window around. Useful for watching the damage and exposure flow
//! in the logs (`RUST_LOG=novade_window_server=trace`).

use std::process::ExitCode;

use novade_core::config::ConfigLoader;
use novade_core::logging::{init_logging, init_minimal_logging};
use novade_core::types::{Color, RectInt};
use novade_window_server::{ClientId, Event, EventMask, Server, ServerError, SoftwareSurface, WindowAttributes, WindowId};
use tracing::{error, info};

fn main() -> ExitCode {
    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(e) => {
            init_minimal_logging();
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logging(&config.logging, false) {
        init_minimal_logging();
        error!("Failed to initialize logging, falling back to stderr: {}", e);
    }

    let surface = match SoftwareSurface::new(config.display.width, config.display.height) {
        Ok(surface) => surface,
        Err(e) => {
            error!("Failed to create framebuffer: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match Server::new(&config.display, surface).and_then(run_session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Session aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_session(mut server: Server<SoftwareSurface>) -> Result<(), ServerError> {
    let (width, height) = server.screen_size();
    info!(width, height, "Starting scripted session");

    let client = server.client_connected();
    let root = server.root_window();
    server.select_input(client, root, EventMask::EXPOSE)?;

    let editor = map_window(&mut server, client, "editor", (40, 40, 300, 200))?;
    let palette = map_window(&mut server, client, "palette", (200, 120, 160, 160))?;
    let dark = WindowAttributes::new().with_background(Some(Color::from_rgb8(40, 40, 40)));
    server.change_attributes(palette, &dark)?;
    server.define_cursor(editor, Some("xterm"))?;

    frame(&mut server, client)?;

    server.configure_request(editor, 80, 60, 300, 200)?;
    frame(&mut server, client)?;

    server.raise_window(editor)?;
    frame(&mut server, client)?;

    server.destroy_window(palette)?;
    frame(&mut server, client)?;

    let remaining = server.damaged_region().area();
    info!(remaining, "Session finished");
    Ok(())
}

fn map_window(
    server: &mut Server<SoftwareSurface>,
    client: ClientId,
    name: &str,
    (x, y, width, height): (i32, i32, u32, u32),
) -> Result<WindowId, ServerError> {
    let window = server.create_window();
    server.select_input(client, window, EventMask::EXPOSE | EventMask::CONFIGURE_NOTIFY)?;
    server.change_property(window, "WM_NAME", name)?;
    server.configure_request(window, x, y, width, height)?;
    info!(%window, name, "Mapped window");
    Ok(window)
}

/// Runs one redraw pass and plays the client: paints a frame border in every
/// exposed window and acknowledges the damage.
fn frame(server: &mut Server<SoftwareSurface>, client: ClientId) -> Result<(), ServerError> {
    let exposures = server.flush()?;
    info!(exposed = exposures.len(), "Redraw pass complete");

    for event in server.drain_events(client)? {
        match event {
            Event::Expose { window, region } => {
                let geometry = server.window(window)?.geometry();
                server.draw_with_context(window, |ctx| {
                    let border = Color::from_rgb8(20, 20, 20);
                    let (w, h) = (geometry.width(), geometry.height());
                    ctx.fill_rectangle(border, RectInt::from_coords(0, 0, w, 2))?;
                    ctx.fill_rectangle(border, RectInt::from_coords(0, h as i32 - 2, w, 2))?;
                    Ok(())
                })?;
                server.clear_damage(window)?;
                info!(%window, rects = region.rect_count(), "Repainted exposure");
            }
            Event::ConfigureNotify { window, x, y, width, height } => {
                info!(%window, x, y, width, height, "Window configured");
            }
            other => info!(?other, "Ignoring event"),
        }
    }
    Ok(())
}

//! # NovaDE Window Server (`novade-window-server`)
//!
//! The core of a software window server: a tree of nested rectangular
//! windows, region algebra, damage tracking and incremental redraw.
//!
//! - [`region`]: canonical banded regions with union, intersection and subtraction.
//! - [`window`] and [`tree`]: window records in an id-addressed arena, with
//!   stacking order and visible-footprint queries.
//! - [`compositor`]: global damage and the redraw pass that hands damage to
//!   the topmost window covering it.
//! - [`configure`]: move and resize with damage carry-over and pixel preservation.
//! - [`render`]: the [`RenderBackend`] contract and an in-memory [`SoftwareSurface`].
//! - [`events`]: per-client subscriptions and event queues.
//! - [`server`] and [`api`]: the request handler tying it all together.
//!
//! ```rust
//! use novade_core::config::DisplayConfig;
//! use novade_window_server::{EventMask, Server, SoftwareSurface};
//!
//! let display = DisplayConfig::default();
//! let surface = SoftwareSurface::new(display.width, display.height).unwrap();
//! let mut server = Server::new(&display, surface).unwrap();
//!
//! let client = server.client_connected();
//! let window = server.create_window();
//! server.select_input(client, window, EventMask::EXPOSE).unwrap();
//! server.configure_request(window, 10, 10, 100, 80).unwrap();
//!
//! let exposures = server.flush().unwrap();
//! assert!(exposures.iter().any(|e| e.window == window));
//! assert_eq!(server.drain_events(client).unwrap().len(), 1);
//! ```

pub mod api;
pub mod compositor;
pub mod configure;
pub mod error;
pub mod events;
pub mod region;
pub mod render;
pub mod server;
pub mod tree;
pub mod window;

pub use api::WindowServerApi;
pub use compositor::{Compositor, Exposure};
pub use configure::{configure_window, ConfigureOutcome};
pub use error::{RenderError, ServerError};
pub use events::{ClientId, Event, EventMask, EventRouter, PointerEvent, PointerEventKind, RawPointerEvent};
pub use region::Region;
pub use render::{DrawContext, RenderBackend, SoftwareSurface};
pub use server::Server;
pub use tree::WindowTree;
pub use window::{Window, WindowAttributes, WindowId};

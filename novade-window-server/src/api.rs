//! Client-facing request surface.
//!
//! [`WindowServerApi`] is what a protocol front end talks to. It exposes the
//! requests a client may issue and hides server-side machinery such as
//! redraw passes and input hit-testing.

use crate::error::ServerError;
use crate::events::{ClientId, Event, EventMask};
use crate::render::RenderBackend;
use crate::server::Server;
use crate::window::{WindowAttributes, WindowId};

pub trait WindowServerApi {
    /// Screen dimensions as `(width, height)`.
    fn screen_size(&self) -> (u32, u32);

    fn client_connected(&mut self) -> ClientId;

    fn select_input(&mut self, client: ClientId, window: WindowId, events: EventMask) -> Result<(), ServerError>;

    fn create_window(&mut self) -> WindowId;

    fn destroy_window(&mut self, window: WindowId) -> Result<(), ServerError>;

    fn reparent_window(&mut self, window: WindowId, new_parent: WindowId) -> Result<(), ServerError>;

    fn raise_window(&mut self, window: WindowId) -> Result<(), ServerError>;

    fn lower_window(&mut self, window: WindowId) -> Result<(), ServerError>;

    /// `x` and `y` are relative to the window's parent.
    fn configure_request(&mut self, window: WindowId, x: i32, y: i32, width: u32, height: u32) -> Result<(), ServerError>;

    fn change_attributes(&mut self, window: WindowId, attributes: WindowAttributes) -> Result<(), ServerError>;

    fn change_property(&mut self, window: WindowId, name: &str, value: &str) -> Result<(), ServerError>;

    fn define_cursor(&mut self, window: WindowId, cursor: Option<&str>) -> Result<(), ServerError>;

    fn invalidate_window(&mut self, window: WindowId) -> Result<(), ServerError>;

    /// Tells the server the client has repainted all pending damage of `window`.
    fn clear_damage(&mut self, window: WindowId) -> Result<(), ServerError>;

    fn drain_events(&mut self, client: ClientId) -> Result<Vec<Event>, ServerError>;
}

impl<B: RenderBackend> WindowServerApi for Server<B> {
    fn screen_size(&self) -> (u32, u32) {
        Server::screen_size(self)
    }

    fn client_connected(&mut self) -> ClientId {
        Server::client_connected(self)
    }

    fn select_input(&mut self, client: ClientId, window: WindowId, events: EventMask) -> Result<(), ServerError> {
        Server::select_input(self, client, window, events)
    }

    fn create_window(&mut self) -> WindowId {
        Server::create_window(self)
    }

    fn destroy_window(&mut self, window: WindowId) -> Result<(), ServerError> {
        Server::destroy_window(self, window)
    }

    fn reparent_window(&mut self, window: WindowId, new_parent: WindowId) -> Result<(), ServerError> {
        Server::reparent_window(self, window, new_parent)
    }

    fn raise_window(&mut self, window: WindowId) -> Result<(), ServerError> {
        Server::raise_window(self, window)
    }

    fn lower_window(&mut self, window: WindowId) -> Result<(), ServerError> {
        Server::lower_window(self, window)
    }

    fn configure_request(&mut self, window: WindowId, x: i32, y: i32, width: u32, height: u32) -> Result<(), ServerError> {
        Server::configure_request(self, window, x, y, width, height).map(|_| ())
    }

    fn change_attributes(&mut self, window: WindowId, attributes: WindowAttributes) -> Result<(), ServerError> {
        Server::change_attributes(self, window, &attributes)
    }

    fn change_property(&mut self, window: WindowId, name: &str, value: &str) -> Result<(), ServerError> {
        Server::change_property(self, window, name, value)
    }

    fn define_cursor(&mut self, window: WindowId, cursor: Option<&str>) -> Result<(), ServerError> {
        Server::define_cursor(self, window, cursor)
    }

    fn invalidate_window(&mut self, window: WindowId) -> Result<(), ServerError> {
        Server::invalidate_window(self, window)
    }

    fn clear_damage(&mut self, window: WindowId) -> Result<(), ServerError> {
        Server::clear_damage(self, window)
    }

    fn drain_events(&mut self, client: ClientId) -> Result<Vec<Event>, ServerError> {
        Server::drain_events(self, client)
    }
}

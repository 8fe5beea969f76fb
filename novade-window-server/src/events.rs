//! Client-facing events and their routing.
//!
//! Each connected client owns a subscription table (window → [`EventMask`])
//! and a FIFO of delivered events. Subscriptions only ever grow.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use bitflags::bitflags;
use novade_core::types::Point;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::ServerError;
use crate::region::Region;
use crate::window::WindowId;

bitflags! {
    /// Event kinds a client can select on a window.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventMask: u32 {
        const EXPOSE = 1 << 0;
        const CONFIGURE_NOTIFY = 1 << 1;
        const PROPERTY_CHANGED = 1 << 2;
        const ENTER = 1 << 3;
        const LEAVE = 1 << 4;
        const BUTTON_PRESS = 1 << 5;
        const BUTTON_RELEASE = 1 << 6;
        const MOTION = 1 << 7;
    }
}

/// Identifies a connected client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new_v4() -> Self {
        ClientId(Uuid::new_v4())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Enter,
    Leave,
    ButtonPress,
    ButtonRelease,
    Motion,
}

impl PointerEventKind {
    pub fn mask(self) -> EventMask {
        match self {
            PointerEventKind::Enter => EventMask::ENTER,
            PointerEventKind::Leave => EventMask::LEAVE,
            PointerEventKind::ButtonPress => EventMask::BUTTON_PRESS,
            PointerEventKind::ButtonRelease => EventMask::BUTTON_RELEASE,
            PointerEventKind::Motion => EventMask::MOTION,
        }
    }

    fn carries_button(self) -> bool {
        matches!(self, PointerEventKind::ButtonPress | PointerEventKind::ButtonRelease)
    }
}

/// A pointer event as delivered by an input backend, already hit-tested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointerEvent {
    pub kind: PointerEventKind,
    pub target: WindowId,
    /// Device position in root coordinates.
    pub position: Point<f64>,
    pub button: Option<u32>,
}

/// A pointer event expressed in root and window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub root_window: WindowId,
    pub window: WindowId,
    pub root_x: f64,
    pub root_y: f64,
    pub win_x: f64,
    pub win_y: f64,
    /// Set for button press and release only.
    pub button: Option<u32>,
}

impl PointerEvent {
    pub(crate) fn from_raw(raw: &RawPointerEvent, root_window: WindowId, window_origin: Point<f64>) -> Self {
        Self {
            kind: raw.kind,
            root_window,
            window: raw.target,
            root_x: raw.position.x,
            root_y: raw.position.y,
            win_x: raw.position.x - window_origin.x,
            win_y: raw.position.y - window_origin.y,
            button: if raw.kind.carries_button() { raw.button } else { None },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Part of the window needs repainting. `region` is in window coordinates.
    Expose { window: WindowId, region: Region },
    /// The window's geometry changed; position is in parent coordinates.
    ConfigureNotify { window: WindowId, x: i32, y: i32, width: u32, height: u32 },
    PropertyChanged { window: WindowId, name: String, value: String },
    Pointer(PointerEvent),
}

impl Event {
    pub fn window(&self) -> WindowId {
        match self {
            Event::Expose { window, .. }
            | Event::ConfigureNotify { window, .. }
            | Event::PropertyChanged { window, .. } => *window,
            Event::Pointer(pointer) => pointer.window,
        }
    }

    pub fn mask(&self) -> EventMask {
        match self {
            Event::Expose { .. } => EventMask::EXPOSE,
            Event::ConfigureNotify { .. } => EventMask::CONFIGURE_NOTIFY,
            Event::PropertyChanged { .. } => EventMask::PROPERTY_CHANGED,
            Event::Pointer(pointer) => pointer.kind.mask(),
        }
    }
}

#[derive(Debug, Default)]
struct ClientState {
    subscriptions: HashMap<WindowId, EventMask>,
    queue: VecDeque<Event>,
}

impl ClientState {
    fn is_interested(&self, event: &Event) -> bool {
        self.subscriptions
            .get(&event.window())
            .map_or(false, |mask| mask.contains(event.mask()))
    }
}

#[derive(Debug, Default)]
pub struct EventRouter {
    clients: HashMap<ClientId, ClientState>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self) -> ClientId {
        let client = ClientId::new_v4();
        self.clients.insert(client, ClientState::default());
        debug!(%client, "client connected");
        client
    }

    /// Adds `events` to what `client` receives for `window`.
    pub fn select_input(&mut self, client: ClientId, window: WindowId, events: EventMask) -> Result<(), ServerError> {
        let state = self.clients.get_mut(&client).ok_or(ServerError::ClientNotFound(client))?;
        *state.subscriptions.entry(window).or_default() |= events;
        trace!(%client, %window, ?events, "input selected");
        Ok(())
    }

    /// Queues `event` for every client subscribed to its kind on its window.
    pub fn send_event(&mut self, event: &Event) -> usize {
        let mut delivered = 0;
        for state in self.clients.values_mut().filter(|state| state.is_interested(event)) {
            state.queue.push_back(event.clone());
            delivered += 1;
        }
        delivered
    }

    /// Takes every event queued for `client`, oldest first.
    pub fn drain_events(&mut self, client: ClientId) -> Result<Vec<Event>, ServerError> {
        let state = self.clients.get_mut(&client).ok_or(ServerError::ClientNotFound(client))?;
        Ok(state.queue.drain(..).collect())
    }
}

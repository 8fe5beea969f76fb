//! Error types for the window server.
//!
//! [`ServerError`] is returned by every public server operation. Rendering
//! backends report failures through [`RenderError`], which the server wraps.

use crate::events::ClientId;
use crate::window::WindowId;
use novade_core::CoreError;
use thiserror::Error;

/// Failures reported by a [`RenderBackend`](crate::render::RenderBackend).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// `restore` was called without a matching `save`.
    #[error("Clip stack underflow: restore called without a matching save")]
    ClipStackUnderflow,

    /// A surface cannot be allocated with the requested dimensions.
    #[error("Invalid surface size {width}x{height}")]
    InvalidSurfaceSize { width: u32, height: u32 },

    /// Any other failure inside the backend (device lost, copy failed, ...).
    #[error("Rendering backend failure: {0}")]
    Backend(String),
}

/// Errors returned by window server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The handle does not name a live window (never allocated or already destroyed).
    #[error("Window {0} not found")]
    WindowNotFound(WindowId),

    /// Reparenting would make a window its own ancestor.
    #[error("Reparenting window {window} under {new_parent} would create a cycle")]
    CycleDetected { window: WindowId, new_parent: WindowId },

    /// The root window does not support this operation.
    #[error("Operation '{operation}' is not permitted on the root window")]
    RootWindow { operation: &'static str },

    /// The client handle is not connected to this server.
    #[error("Client {0} is not connected")]
    ClientNotFound(ClientId),

    /// The rendering backend failed; pending damage is kept.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Infrastructure failure (configuration, logging, I/O).
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

//! Window records.
//!
//! A [`Window`] holds one window's geometry, its shape and pending damage,
//! its attributes and its tree links. Links are [`WindowId`] handles resolved
//! through the [`WindowTree`](crate::tree::WindowTree) arena, never references.

use std::collections::HashMap;
use std::fmt;

use novade_core::types::{Color, RectInt};

use crate::region::Region;

/// Handle naming a window for the lifetime of the server.
///
/// Handles are allocated in increasing order starting at 1 and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attribute changes requested by a client. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowAttributes {
    /// Whether the window takes part in pointer hit testing.
    pub has_input: Option<bool>,
    /// New background. `Some(None)` restores the server's default window background.
    pub background_color: Option<Option<Color>>,
}

impl WindowAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, has_input: bool) -> Self {
        self.has_input = Some(has_input);
        self
    }

    pub fn with_background(mut self, color: Option<Color>) -> Self {
        self.background_color = Some(color);
        self
    }
}

/// A single window.
#[derive(Debug, Clone)]
pub struct Window {
    pub(crate) id: WindowId,
    /// Position in parent coordinates.
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Occupied area, in parent coordinates.
    pub(crate) shape_region: Region,
    /// Pending damage, in window coordinates.
    pub(crate) damaged_region: Region,
    pub(crate) background_color: Color,
    pub(crate) properties: HashMap<String, String>,
    pub(crate) has_input: bool,
    pub(crate) cursor: Option<String>,
    pub(crate) parent: Option<WindowId>,
    /// Children, topmost first.
    pub(crate) children: Vec<WindowId>,
}

impl Window {
    /// Creates an unparented window with `(0, 0, 0, 0)` geometry.
    pub(crate) fn new(id: WindowId, background_color: Color) -> Self {
        Self {
            id,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            shape_region: Region::new(),
            damaged_region: Region::new(),
            background_color,
            properties: HashMap::new(),
            has_input: true,
            cursor: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Position and size in parent coordinates.
    pub fn geometry(&self) -> RectInt {
        RectInt::from_coords(self.x, self.y, self.width, self.height)
    }

    pub fn shape_region(&self) -> &Region {
        &self.shape_region
    }

    pub fn damaged_region(&self) -> &Region {
        &self.damaged_region
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn has_input(&self) -> bool {
        self.has_input
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn parent(&self) -> Option<WindowId> {
        self.parent
    }

    pub fn children(&self) -> &[WindowId] {
        &self.children
    }

    /// Applies new geometry and resets the shape to the full window rectangle.
    pub(crate) fn reconfigure(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self.shape_region.init_rect(x, y, width, height);
    }

    /// Applies the set fields of `attributes`. Returns whether anything changed.
    pub(crate) fn change_attributes(&mut self, attributes: &WindowAttributes, default_background: Color) -> bool {
        let mut changed = false;
        if let Some(has_input) = attributes.has_input {
            changed |= self.has_input != has_input;
            self.has_input = has_input;
        }
        if let Some(color) = attributes.background_color {
            let color = color.unwrap_or(default_background);
            changed |= self.background_color != color;
            self.background_color = color;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(WindowId: Copy, Eq, std::hash::Hash, Ord, Send, Sync);
    assert_impl_all!(Window: Clone, Send, Sync);

    fn grey() -> Color {
        Color::from_rgb8(0xdd, 0xdd, 0xdd)
    }

    #[test]
    fn new_window_is_unconfigured() {
        let window = Window::new(WindowId(4), grey());
        assert_eq!(window.geometry(), RectInt::default());
        assert!(window.shape_region().is_empty());
        assert!(window.damaged_region().is_empty());
        assert!(window.has_input());
        assert_eq!(window.parent(), None);
    }

    #[test]
    fn reconfigure_resets_shape() {
        let mut window = Window::new(WindowId(2), grey());
        window.reconfigure(10, 20, 30, 40);
        assert_eq!(window.geometry(), RectInt::from_coords(10, 20, 30, 40));
        assert_eq!(window.shape_region(), &Region::from_rect(RectInt::from_coords(10, 20, 30, 40)));
        window.reconfigure(0, 0, 0, 5);
        assert!(window.shape_region().is_empty());
    }

    #[test]
    fn background_none_restores_default() {
        let mut window = Window::new(WindowId(2), grey());
        let red = Color::from_rgb8(255, 0, 0);
        assert!(window.change_attributes(&WindowAttributes::new().with_background(Some(red)), grey()));
        assert_eq!(window.background_color(), red);
        assert!(window.change_attributes(&WindowAttributes::new().with_background(None), grey()));
        assert_eq!(window.background_color(), grey());
        assert!(!window.change_attributes(&WindowAttributes::new(), grey()));
        assert!(window.change_attributes(&WindowAttributes::new().with_input(false), grey()));
        assert!(!window.has_input());
    }
}

//! The window server: owns the window tree, the compositor, the event router
//! and the rendering backend, and turns client requests into tree mutations,
//! damage and events.
//!
//! Every request validates its handles and invariants before touching the
//! tree, so a rejected request leaves the server unchanged. Damage produced by
//! requests is only painted when the embedding loop calls [`Server::flush`],
//! which runs at most one redraw pass per call.

use novade_core::config::DisplayConfig;
use novade_core::types::{Point, PointInt, RectInt};
use novade_core::CoreError;
use tracing::{debug, error, info, warn};

use crate::compositor::{Compositor, Exposure};
use crate::configure::{configure_window, ConfigureOutcome};
use crate::error::{RenderError, ServerError};
use crate::events::{ClientId, Event, EventMask, EventRouter, PointerEvent, RawPointerEvent};
use crate::region::Region;
use crate::render::{DrawContext, RenderBackend};
use crate::tree::WindowTree;
use crate::window::{Window, WindowAttributes, WindowId};

pub struct Server<B: RenderBackend> {
    display: DisplayConfig,
    tree: WindowTree,
    compositor: Compositor,
    router: EventRouter,
    backend: B,
    root: WindowId,
}

impl<B: RenderBackend> Server<B> {
    /// Creates a server drawing to `backend` and sets up the root window
    /// spanning the screen described by `display`.
    pub fn new(display: &DisplayConfig, backend: B) -> Result<Self, ServerError> {
        let mut tree = WindowTree::new();
        let root = tree.allocate(display.root_background);
        let mut server = Self {
            display: display.clone(),
            tree,
            compositor: Compositor::new(),
            router: EventRouter::new(),
            backend,
            root,
        };
        let (width, height) = (display.width, display.height);
        server.configure_request(root, 0, 0, width, height)?;
        info!(width, height, %root, "window server initialized");
        Ok(server)
    }

    pub fn root_window(&self) -> WindowId {
        self.root
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (self.display.width, self.display.height)
    }

    pub fn window(&self, id: WindowId) -> Result<&Window, ServerError> {
        self.tree.get(id)
    }

    /// Visible footprint of `id` in root coordinates.
    pub fn effective_region(&self, id: WindowId) -> Result<Region, ServerError> {
        self.tree.effective_region(id)
    }

    /// Global damage in root coordinates.
    pub fn damaged_region(&self) -> &Region {
        self.compositor.damaged_region()
    }

    pub fn redraw_pending(&self) -> bool {
        self.compositor.redraw_pending()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // --- Clients ---

    pub fn client_connected(&mut self) -> ClientId {
        self.router.connect()
    }

    /// Adds `events` to the kinds `client` receives for `window`.
    pub fn select_input(&mut self, client: ClientId, window: WindowId, events: EventMask) -> Result<(), ServerError> {
        self.require_window(window)?;
        self.router.select_input(client, window, events)
    }

    /// Takes the events queued for `client`, oldest first.
    pub fn drain_events(&mut self, client: ClientId) -> Result<Vec<Event>, ServerError> {
        self.router.drain_events(client)
    }

    // --- Window lifecycle and stacking ---

    /// Creates an unconfigured window as the topmost child of the root.
    pub fn create_window(&mut self) -> WindowId {
        let id = self.tree.allocate(self.display.window_background);
        // The root always exists, so attaching cannot fail.
        if let Err(e) = self.tree.attach_top(id, self.root) {
            error!(window = %id, "failed to attach new window to root: {}", e);
        }
        debug!(window = %id, "window created");
        id
    }

    /// Destroys `id` and all its descendants, damaging the area they vacate.
    pub fn destroy_window(&mut self, id: WindowId) -> Result<(), ServerError> {
        self.require_non_root(id, "destroy")?;
        let doomed = self.tree.subtree(id)?;
        let vacated = self.subtree_footprint(id)?;

        self.tree.detach(id)?;
        for window in &doomed {
            self.tree.release(*window);
        }
        self.compositor.damage_region(&vacated);
        debug!(window = %id, destroyed = doomed.len(), "window destroyed");
        Ok(())
    }

    /// Moves `id` under `new_parent`, on top of its new siblings.
    pub fn reparent_window(&mut self, id: WindowId, new_parent: WindowId) -> Result<(), ServerError> {
        self.require_non_root(id, "reparent")?;
        self.require_window(new_parent)?;
        if self.tree.is_ancestor_or_self(id, new_parent)? {
            warn!(window = %id, %new_parent, "rejecting reparent that would create a cycle");
            return Err(ServerError::CycleDetected { window: id, new_parent });
        }

        let vacated = self.subtree_footprint(id)?;
        self.tree.detach(id)?;
        self.tree.attach_top(id, new_parent)?;
        self.compositor.damage_region(&vacated);
        let placed = self.subtree_footprint(id)?;
        self.compositor.damage_region(&placed);
        debug!(window = %id, %new_parent, "window reparented");
        Ok(())
    }

    /// Moves `id` to the top of its siblings, damaging the area it newly shows.
    pub fn raise_window(&mut self, id: WindowId) -> Result<(), ServerError> {
        self.require_non_root(id, "raise")?;
        if let Some((0, _)) = self.tree.stacking_position(id)? {
            debug!(window = %id, "raise: already topmost");
            return Ok(());
        }
        let before = self.subtree_footprint(id)?;
        self.tree.restack_top(id)?;
        let after = self.subtree_footprint(id)?;
        self.compositor.damage_region(&after.subtract(&before));
        debug!(window = %id, "window raised");
        Ok(())
    }

    /// Moves `id` to the bottom of its siblings, damaging the area it stops covering.
    pub fn lower_window(&mut self, id: WindowId) -> Result<(), ServerError> {
        self.require_non_root(id, "lower")?;
        if let Some((index, count)) = self.tree.stacking_position(id)? {
            if index + 1 == count {
                debug!(window = %id, "lower: already bottommost");
                return Ok(());
            }
        }
        let before = self.subtree_footprint(id)?;
        self.tree.restack_bottom(id)?;
        let after = self.subtree_footprint(id)?;
        self.compositor.damage_region(&before.subtract(&after));
        debug!(window = %id, "window lowered");
        Ok(())
    }

    // --- Geometry and attributes ---

    /// Moves and/or resizes `id`; `x`/`y` are in parent coordinates.
    ///
    /// Geometry whose edges, in parent or root coordinates, would fall outside
    /// the `i32` range is rejected before anything changes. Sends
    /// `ConfigureNotify` once the geometry is applied, even if the backend then
    /// fails to preserve the old pixels.
    pub fn configure_request(
        &mut self,
        id: WindowId,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<ConfigureOutcome, ServerError> {
        self.require_window(id)?;
        let geometry = RectInt::from_coords(x, y, width, height);
        self.validate_geometry(id, geometry)?;
        let outcome = configure_window(&mut self.tree, &mut self.compositor, &mut self.backend, id, geometry);
        self.router.send_event(&Event::ConfigureNotify { window: id, x, y, width, height });
        debug!(window = %id, x, y, width, height, "window configured");
        outcome
    }

    pub fn change_attributes(&mut self, id: WindowId, attributes: &WindowAttributes) -> Result<(), ServerError> {
        let default_background = self.display.window_background;
        let changed = self.window_mut(id)?.change_attributes(attributes, default_background);
        debug!(window = %id, changed, "attributes changed");
        Ok(())
    }

    /// Stores a property and notifies subscribers.
    pub fn change_property(&mut self, id: WindowId, name: &str, value: &str) -> Result<(), ServerError> {
        self.window_mut(id)?.properties.insert(name.to_string(), value.to_string());
        self.router.send_event(&Event::PropertyChanged {
            window: id,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    pub fn define_cursor(&mut self, id: WindowId, cursor: Option<&str>) -> Result<(), ServerError> {
        self.window_mut(id)?.cursor = cursor.map(str::to_string);
        Ok(())
    }

    // --- Damage and drawing ---

    /// Damages the visible footprint of `id`.
    pub fn invalidate_window(&mut self, id: WindowId) -> Result<(), ServerError> {
        let region = self.tree.effective_region(id)?;
        self.compositor.damage_region(&region);
        Ok(())
    }

    /// Damages the whole screen.
    pub fn queue_full_redraw(&mut self) {
        let screen = Region::from_rect(self.display.screen_rect());
        self.compositor.damage_region(&screen);
    }

    /// Acknowledges that the owner of `id` has repainted its damage.
    ///
    /// Removes the window's pending damage from the global damage. Never
    /// schedules a redraw.
    pub fn clear_damage(&mut self, id: WindowId) -> Result<(), ServerError> {
        let origin = self.tree.absolute_offset(id, true)?;
        let window = self.tree.get_mut(id)?;
        let painted = window.damaged_region.translated(origin.x, origin.y);
        window.damaged_region.clear();
        self.compositor.subtract_damage(&painted);
        Ok(())
    }

    /// Runs `draw` with a context translated to `id`'s origin and clipped to its
    /// pending damage. The backend's clip state is restored afterwards.
    pub fn draw_with_context<R, F>(&mut self, id: WindowId, draw: F) -> Result<R, ServerError>
    where
        F: FnOnce(&mut DrawContext<'_, B>) -> Result<R, RenderError>,
    {
        let origin = self.tree.absolute_offset(id, true)?;
        let damage = self.tree.get(id)?.damaged_region.clone();

        self.backend.save();
        self.backend.clip_to_region(&damage.translated(origin.x, origin.y));
        let drawn = {
            let mut ctx = DrawContext::new(&mut self.backend, id, origin, damage);
            draw(&mut ctx)
        };
        let restored = self.backend.restore();
        let value = drawn?;
        restored?;
        Ok(value)
    }

    /// Requests a redraw pass over the damage already pending, without adding
    /// any. Lets a caller retry after a failed [`flush`](Self::flush).
    pub fn queue_redraw(&mut self) {
        self.compositor.queue_redraw();
    }

    /// Runs the pending redraw pass, if any, and sends `Expose` events.
    ///
    /// Returns the exposures of the pass (empty when nothing was queued). A
    /// failed pass keeps all damage and is not queued again.
    pub fn flush(&mut self) -> Result<Vec<Exposure>, ServerError> {
        if !self.compositor.take_redraw_request() {
            return Ok(Vec::new());
        }
        let exposures = match self.compositor.redraw(&mut self.tree, self.root, &mut self.backend) {
            Ok(exposures) => exposures,
            Err(e) => {
                error!("redraw pass failed: {}", e);
                return Err(e);
            }
        };
        for exposure in &exposures {
            self.router.send_event(&Event::Expose {
                window: exposure.window,
                region: exposure.region.clone(),
            });
        }
        Ok(exposures)
    }

    // --- Input ---

    /// Converts a hit-tested pointer event into root and window coordinates
    /// and delivers it to subscribers of the target window.
    pub fn handle_input(&mut self, raw: RawPointerEvent) -> Result<(), ServerError> {
        self.require_window(raw.target)?;
        let origin = self.tree.absolute_offset(raw.target, true)?;
        let event = PointerEvent::from_raw(&raw, self.root, Point::from_int(origin));
        self.router.send_event(&Event::Pointer(event));
        Ok(())
    }

    /// Returns the deepest, topmost input window whose shape contains `point`
    /// (root coordinates).
    pub fn window_at(&self, point: PointInt) -> Result<Option<WindowId>, ServerError> {
        self.hit_test(self.root, point)
    }

    fn hit_test(&self, id: WindowId, point: PointInt) -> Result<Option<WindowId>, ServerError> {
        let window = self.tree.get(id)?;
        for &child in &window.children {
            if let Some(hit) = self.hit_test(child, point)? {
                return Ok(Some(hit));
            }
        }
        if window.has_input && self.tree.transformed_shape_region(id)?.contains_point(point) {
            return Ok(Some(id));
        }
        Ok(None)
    }

    // --- Helpers ---

    fn require_window(&self, id: WindowId) -> Result<(), ServerError> {
        if self.tree.contains(id) {
            Ok(())
        } else {
            warn!(window = %id, "request references unknown window");
            Err(ServerError::WindowNotFound(id))
        }
    }

    fn require_non_root(&self, id: WindowId, operation: &'static str) -> Result<(), ServerError> {
        self.require_window(id)?;
        if id == self.root {
            warn!(operation, "operation not permitted on the root window");
            return Err(ServerError::RootWindow { operation });
        }
        Ok(())
    }

    /// Checks that `geometry` (parent coordinates) keeps every edge of `id`
    /// representable in both parent and root coordinates.
    fn validate_geometry(&self, id: WindowId, geometry: RectInt) -> Result<(), ServerError> {
        let parent_origin = self.tree.absolute_offset(id, false)?;
        let fits = |parent: i32, position: i32, extent: u32| {
            let extent = i32::try_from(extent).ok()?;
            position.checked_add(extent)?;
            parent.checked_add(position)?.checked_add(extent)
        };
        let x_fits = fits(parent_origin.x, geometry.x(), geometry.width()).is_some();
        let y_fits = fits(parent_origin.y, geometry.y(), geometry.height()).is_some();
        if x_fits && y_fits {
            return Ok(());
        }
        warn!(window = %id, ?geometry, "rejecting geometry outside the coordinate range");
        Err(ServerError::Core(CoreError::InvalidInput(format!(
            "geometry {}x{}+{}+{} of window {} exceeds the coordinate range",
            geometry.width(),
            geometry.height(),
            geometry.x(),
            geometry.y(),
            id
        ))))
    }

    fn window_mut(&mut self, id: WindowId) -> Result<&mut Window, ServerError> {
        self.require_window(id)?;
        self.tree.get_mut(id)
    }

    /// Union of the effective regions of `id` and its descendants.
    fn subtree_footprint(&self, id: WindowId) -> Result<Region, ServerError> {
        let mut footprint = Region::new();
        for window in self.tree.subtree(id)? {
            footprint.union_with(&self.tree.effective_region(window)?);
        }
        Ok(footprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SoftwareSurface;
    use novade_core::types::Color;
    use pretty_assertions::assert_eq;

    fn server() -> Server<SoftwareSurface> {
        let display = DisplayConfig { width: 200, height: 150, ..DisplayConfig::default() };
        let surface = SoftwareSurface::new(200, 150).unwrap();
        Server::new(&display, surface).unwrap()
    }

    fn rect_region(x: i32, y: i32, w: u32, h: u32) -> Region {
        Region::from_rect(RectInt::from_coords(x, y, w, h))
    }

    #[test]
    fn new_server_paints_root_on_first_flush() {
        let mut server = server();
        let root = server.root_window();
        assert_eq!(root, WindowId(1));
        assert_eq!(server.window(root).unwrap().geometry(), RectInt::from_coords(0, 0, 200, 150));
        assert!(server.redraw_pending());

        let exposures = server.flush().unwrap();
        assert_eq!(exposures, vec![Exposure { window: root, region: rect_region(0, 0, 200, 150) }]);
        assert_eq!(server.backend().pixel(199, 149), Some([51, 110, 165, 255]));
        assert!(!server.redraw_pending());
        assert!(server.flush().unwrap().is_empty());
    }

    #[test]
    fn root_window_operations_are_rejected() {
        let mut server = server();
        let root = server.root_window();
        let child = server.create_window();
        for result in [
            server.destroy_window(root),
            server.raise_window(root),
            server.lower_window(root),
            server.reparent_window(root, child),
        ] {
            assert!(matches!(result, Err(ServerError::RootWindow { .. })));
        }
    }

    #[test]
    fn reparent_into_descendant_is_rejected_without_mutation() {
        let mut server = server();
        let parent = server.create_window();
        let child = server.create_window();
        server.reparent_window(child, parent).unwrap();

        let err = server.reparent_window(parent, child).unwrap_err();
        assert!(matches!(err, ServerError::CycleDetected { window, new_parent } if window == parent && new_parent == child));
        assert!(matches!(server.reparent_window(parent, parent), Err(ServerError::CycleDetected { .. })));
        assert_eq!(server.window(child).unwrap().parent(), Some(parent));
        assert_eq!(server.window(parent).unwrap().parent(), Some(server.root_window()));
    }

    #[test]
    fn destroyed_handles_stay_invalid() {
        let mut server = server();
        let parent = server.create_window();
        let child = server.create_window();
        server.reparent_window(child, parent).unwrap();
        server.destroy_window(parent).unwrap();

        for id in [parent, child] {
            assert!(matches!(server.window(id), Err(ServerError::WindowNotFound(missing)) if missing == id));
        }
        assert!(matches!(server.invalidate_window(child), Err(ServerError::WindowNotFound(_))));
        assert_eq!(server.create_window(), WindowId(4));
    }

    #[test]
    fn out_of_range_geometry_is_rejected_without_mutation() {
        let mut server = server();
        let client = server.client_connected();
        let parent = server.create_window();
        server.configure_request(parent, 100, 0, 50, 50).unwrap();
        let window = server.create_window();
        server.reparent_window(window, parent).unwrap();
        server.configure_request(window, 5, 5, 10, 10).unwrap();
        server.select_input(client, window, EventMask::CONFIGURE_NOTIFY).unwrap();
        server.flush().unwrap();
        server.clear_damage(server.root_window()).unwrap();
        server.clear_damage(parent).unwrap();
        server.clear_damage(window).unwrap();

        for (x, y, width, height) in [
            (i32::MAX - 5, 0, 10, 10),
            (10, 10, 3_000_000_000, 10),
            (0, i32::MIN, 10, u32::MAX),
            // Fits in parent coordinates but not once the parent's offset is added.
            (i32::MAX - 50, 0, 10, 10),
        ] {
            let err = server.configure_request(window, x, y, width, height).unwrap_err();
            assert!(matches!(err, ServerError::Core(CoreError::InvalidInput(_))), "{:?}", err);
        }

        assert_eq!(server.window(window).unwrap().geometry(), RectInt::from_coords(5, 5, 10, 10));
        assert_eq!(server.window(window).unwrap().shape_region(), &rect_region(5, 5, 10, 10));
        assert!(server.damaged_region().is_empty());
        assert!(!server.redraw_pending());
        assert!(server.drain_events(client).unwrap().is_empty());
    }

    #[test]
    fn clear_damage_subtracts_in_root_coordinates() {
        let mut server = server();
        let window = server.create_window();
        server.configure_request(window, 20, 30, 40, 40).unwrap();
        server.flush().unwrap();
        server.clear_damage(server.root_window()).unwrap();
        assert_eq!(server.damaged_region(), &rect_region(20, 30, 40, 40));

        server.clear_damage(window).unwrap();
        assert!(server.damaged_region().is_empty());
        assert!(server.window(window).unwrap().damaged_region().is_empty());
        assert!(!server.redraw_pending());
    }

    #[test]
    fn draw_with_context_is_clipped_to_damage() {
        let mut server = server();
        let window = server.create_window();
        server.configure_request(window, 10, 10, 20, 20).unwrap();
        server.flush().unwrap();
        server.clear_damage(window).unwrap();
        server.invalidate_window(window).unwrap();
        server.flush().unwrap();
        // Only the top half stays damaged after a partial acknowledgment.
        {
            let w = server.tree.get_mut(window).unwrap();
            w.damaged_region = rect_region(0, 0, 20, 10);
        }

        let black = Color::from_rgb8(0, 0, 0);
        let damage_area = server
            .draw_with_context(window, |ctx| {
                ctx.fill_rectangle(black, RectInt::from_coords(0, 0, 20, 20))?;
                Ok(ctx.damage().area())
            })
            .unwrap();
        assert_eq!(damage_area, 200);
        assert_eq!(server.backend().pixel(10, 10), Some([0, 0, 0, 255]));
        assert_eq!(server.backend().pixel(10, 25), Some([0xdd, 0xdd, 0xdd, 255]));
        assert_eq!(server.backend().saved_states(), 0);
    }

    #[test]
    fn attributes_properties_and_cursor() {
        let mut server = server();
        let client = server.client_connected();
        let window = server.create_window();
        server.select_input(client, window, EventMask::PROPERTY_CHANGED).unwrap();

        server.change_property(window, "WM_NAME", "terminal").unwrap();
        server.define_cursor(window, Some("crosshair")).unwrap();
        server
            .change_attributes(window, &WindowAttributes::new().with_background(Some(Color::from_rgb8(1, 2, 3))))
            .unwrap();

        let w = server.window(window).unwrap();
        assert_eq!(w.property("WM_NAME"), Some("terminal"));
        assert_eq!(w.cursor(), Some("crosshair"));
        assert_eq!(w.background_color(), Color::from_rgb8(1, 2, 3));
        assert_eq!(
            server.drain_events(client).unwrap(),
            vec![Event::PropertyChanged { window, name: "WM_NAME".to_string(), value: "terminal".to_string() }]
        );

        server
            .change_attributes(window, &WindowAttributes::new().with_background(None))
            .unwrap();
        assert_eq!(server.window(window).unwrap().background_color(), DisplayConfig::default().window_background);
    }

    #[test]
    fn select_input_requires_live_window_and_client() {
        let mut server = server();
        let client = server.client_connected();
        assert!(matches!(
            server.select_input(client, WindowId(99), EventMask::EXPOSE),
            Err(ServerError::WindowNotFound(_))
        ));
        let root = server.root_window();
        assert!(matches!(
            server.select_input(ClientId::new_v4(), root, EventMask::EXPOSE),
            Err(ServerError::ClientNotFound(_))
        ));
    }

    #[test]
    fn window_at_finds_deepest_topmost_input_window() {
        let mut server = server();
        let lower = server.create_window();
        server.configure_request(lower, 0, 0, 100, 100).unwrap();
        let upper = server.create_window();
        server.configure_request(upper, 50, 50, 100, 100).unwrap();
        let inner = server.create_window();
        server.reparent_window(inner, upper).unwrap();
        server.configure_request(inner, 0, 0, 10, 10).unwrap();

        assert_eq!(server.window_at(PointInt::new(55, 55)).unwrap(), Some(inner));
        assert_eq!(server.window_at(PointInt::new(70, 70)).unwrap(), Some(upper));
        assert_eq!(server.window_at(PointInt::new(10, 10)).unwrap(), Some(lower));
        assert_eq!(server.window_at(PointInt::new(190, 10)).unwrap(), Some(server.root_window()));

        server.change_attributes(upper, &WindowAttributes::new().with_input(false)).unwrap();
        assert_eq!(server.window_at(PointInt::new(70, 70)).unwrap(), Some(lower));
    }
}

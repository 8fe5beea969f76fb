//! Damage tracking and the incremental redraw pass.
//!
//! The [`Compositor`] owns the global damage region (root coordinates). Growing
//! it requests a redraw; shrinking it (a client acknowledging its paint) never
//! does. Requests coalesce: however many arrive before the next
//! [`take_redraw_request`](Compositor::take_redraw_request), one pass runs.
//!
//! A pass walks the window tree depth-first, visiting children topmost first,
//! so every damaged pixel is claimed by the highest window covering it. Each
//! claim is added to that window's local damage, its background is painted
//! through the backend, and an [`Exposure`] is reported.

use novade_core::types::{Color, RectInt};
use tracing::{debug, trace, warn};

use crate::error::{RenderError, ServerError};
use crate::region::Region;
use crate::render::RenderBackend;
use crate::tree::WindowTree;
use crate::window::WindowId;

/// Damage claimed by one window during a redraw pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposure {
    pub window: WindowId,
    /// The claimed area in window coordinates.
    pub region: Region,
}

#[derive(Debug, Default)]
pub struct Compositor {
    damaged: Region,
    redraw_queued: bool,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Global damage, in root coordinates.
    pub fn damaged_region(&self) -> &Region {
        &self.damaged
    }

    /// Adds `region` to the global damage and requests a redraw if it is non-empty.
    pub fn damage_region(&mut self, region: &Region) {
        if region.is_empty() {
            return;
        }
        self.damaged.union_with(region);
        self.queue_redraw();
    }

    /// Removes `region` from the global damage. Does not request a redraw.
    pub fn subtract_damage(&mut self, region: &Region) {
        self.damaged.subtract_with(region);
    }

    pub fn queue_redraw(&mut self) {
        if !self.redraw_queued {
            trace!("redraw queued");
        }
        self.redraw_queued = true;
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw_queued
    }

    /// Consumes the pending request. Returns whether a pass should run.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_queued)
    }

    /// Runs one redraw pass over the tree rooted at `root`.
    ///
    /// Global damage is left untouched; it shrinks only when clients clear
    /// their window damage. On a backend failure the pass stops and the error
    /// is returned with all damage still pending.
    pub fn redraw<B: RenderBackend + ?Sized>(
        &self,
        tree: &mut WindowTree,
        root: WindowId,
        backend: &mut B,
    ) -> Result<Vec<Exposure>, ServerError> {
        let mut working = self.damaged.clone();
        let mut exposures = Vec::new();
        debug!(rects = working.rect_count(), "starting redraw pass");
        claim(tree, root, &mut working, &mut exposures)?;

        for exposure in &exposures {
            if let Err(e) = paint_background(tree, exposure.window, backend) {
                warn!(window = %exposure.window, "background paint failed: {}", e);
                return Err(e);
            }
        }
        debug!(exposed = exposures.len(), unclaimed = working.rect_count(), "redraw pass finished");
        Ok(exposures)
    }
}

/// Claims damage for `id` and its subtree. `working` is in `id`'s parent coordinates.
fn claim(
    tree: &mut WindowTree,
    id: WindowId,
    working: &mut Region,
    exposures: &mut Vec<Exposure>,
) -> Result<(), ServerError> {
    let (x, y, children) = {
        let window = tree.get(id)?;
        (window.x, window.y, window.children.clone())
    };

    working.translate(-x, -y);
    for child in children {
        if working.is_empty() {
            break;
        }
        claim(tree, child, working, exposures)?;
    }
    working.translate(x, y);

    let window = tree.get_mut(id)?;
    let mut claimed = working.intersect(&window.shape_region);
    if claimed.is_empty() {
        return Ok(());
    }
    working.subtract_with(&claimed);
    claimed.translate(-x, -y);
    trace!(window = %id, rects = claimed.rect_count(), "window claimed damage");
    window.damaged_region.union_with(&claimed);
    exposures.push(Exposure { window: id, region: claimed });
    Ok(())
}

/// Fills the window's background, clipped to all of its pending damage.
pub(crate) fn paint_background<B: RenderBackend + ?Sized>(
    tree: &WindowTree,
    id: WindowId,
    backend: &mut B,
) -> Result<(), ServerError> {
    let origin = tree.absolute_offset(id, true)?;
    let window = tree.get(id)?;
    let bounds = RectInt::from_coords(origin.x, origin.y, window.width, window.height);
    let clip = window.damaged_region.translated(origin.x, origin.y);
    fill_clipped(backend, &clip, window.background_color, bounds)?;
    Ok(())
}

fn fill_clipped<B: RenderBackend + ?Sized>(
    backend: &mut B,
    clip: &Region,
    color: Color,
    rect: RectInt,
) -> Result<(), RenderError> {
    backend.save();
    backend.clip_to_region(clip);
    let filled = backend.fill_rectangle(color, rect);
    let restored = backend.restore();
    filled.and(restored)
}

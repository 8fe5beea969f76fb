//! Window reconfiguration (move / resize) with pixel preservation.
//!
//! Moving a window must neither lose damage that was pending on it nor
//! repaint pixels that merely move. [`configure_window`] therefore:
//!
//! 1. carries damage pending over the old visible footprint to the new position,
//! 2. damages the area uncovered by the move,
//! 3. damages the area of the new footprint that shows no relocated pixels,
//! 4. copies the old on-screen pixels to the new position, clipped to the new footprint.
//!
//! Footprints are effective regions, so obscured parts of a window cause no
//! copy or repaint work.

use novade_core::types::{PointInt, RectInt};
use tracing::{trace, warn};

use crate::compositor::Compositor;
use crate::error::{RenderError, ServerError};
use crate::region::Region;
use crate::render::RenderBackend;
use crate::tree::WindowTree;
use crate::window::WindowId;

/// Damage produced by one configure, in root coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigureOutcome {
    /// Previously pending damage moved along with the window.
    pub carried: Region,
    /// Area under the old position that is no longer covered.
    pub vacated: Region,
    /// Area of the new position with no relocated pixels to show.
    pub newly_exposed: Region,
}

/// Applies new geometry to `id` and records the resulting damage.
///
/// The geometry change is always applied once `id` is known to exist. If the
/// backend fails the pixel copy, the whole new footprint is damaged so nothing
/// stale stays on screen, and the error is returned.
pub fn configure_window<B: RenderBackend + ?Sized>(
    tree: &mut WindowTree,
    compositor: &mut Compositor,
    backend: &mut B,
    id: WindowId,
    geometry: RectInt,
) -> Result<ConfigureOutcome, ServerError> {
    let mut old_region = tree.effective_region(id)?;
    let old_origin = tree.absolute_offset(id, true)?;
    let old_size = tree.get(id)?.geometry().size;

    tree.get_mut(id)?
        .reconfigure(geometry.x(), geometry.y(), geometry.width(), geometry.height());

    let new_region = tree.effective_region(id)?;
    let new_origin = tree.absolute_offset(id, true)?;
    let (dx, dy) = (new_origin.x - old_origin.x, new_origin.y - old_origin.y);

    // Must run first: the later steps grow the global damage.
    let carried = compositor.damaged_region().intersect(&old_region).translated(dx, dy);
    compositor.damage_region(&carried);

    let vacated = old_region.subtract(&new_region);
    compositor.damage_region(&vacated);

    old_region.translate(dx, dy);
    let newly_exposed = new_region.subtract(&old_region);
    compositor.damage_region(&newly_exposed);

    trace!(
        window = %id,
        dx, dy,
        carried = carried.rect_count(),
        vacated = vacated.rect_count(),
        newly_exposed = newly_exposed.rect_count(),
        "configure damage computed"
    );

    let copy = copy_old_pixels(backend, RectInt::new(old_origin, old_size), new_origin, &new_region);
    compositor.queue_redraw();
    if let Err(e) = copy {
        warn!(window = %id, "pixel copy failed, damaging new footprint: {}", e);
        compositor.damage_region(&new_region);
        return Err(e.into());
    }

    Ok(ConfigureOutcome { carried, vacated, newly_exposed })
}

fn copy_old_pixels<B: RenderBackend + ?Sized>(
    backend: &mut B,
    src: RectInt,
    dst: PointInt,
    clip: &Region,
) -> Result<(), RenderError> {
    if src.is_empty() || clip.is_empty() {
        return Ok(());
    }
    backend.save();
    backend.clip_to_region(clip);
    let copied = backend.copy_pixels(src, dst, clip);
    let restored = backend.restore();
    copied.and(restored)
}

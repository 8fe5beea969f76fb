//! Rendering backend contract and an in-memory software implementation.
//!
//! The server never draws pixels itself. It clips, fills and copies through a
//! [`RenderBackend`], always in root (screen) coordinates. Clients draw inside
//! an exposure through a [`DrawContext`], which works in window coordinates.

use novade_core::types::{Color, PointInt, RectInt};
use tracing::{trace, warn};

use crate::error::RenderError;
use crate::region::Region;
use crate::window::WindowId;

/// Drawing surface used by the server.
///
/// Implementations keep a clip stack: `clip_to_region` narrows the current
/// clip, `save`/`restore` push and pop it. Fills and copies only touch pixels
/// inside the current clip.
pub trait RenderBackend {
    /// Pushes the current clip state.
    fn save(&mut self);

    /// Pops the clip state pushed by the matching [`save`](Self::save).
    fn restore(&mut self) -> Result<(), RenderError>;

    /// Intersects the current clip with `region`.
    fn clip_to_region(&mut self, region: &Region);

    /// Fills `rect` with `color`, clipped to the current clip.
    fn fill_rectangle(&mut self, color: Color, rect: RectInt) -> Result<(), RenderError>;

    /// Copies the pixels of `src` so that its origin lands on `dst`, touching only
    /// destination pixels inside `clip`. Source and destination may overlap.
    fn copy_pixels(&mut self, src: RectInt, dst: PointInt, clip: &Region) -> Result<(), RenderError>;
}

/// Drawing handle given to a client for one window.
///
/// Coordinates are window-local; the backend has already been clipped to the
/// window's pending damage.
pub struct DrawContext<'a, B: RenderBackend + ?Sized> {
    backend: &'a mut B,
    window: WindowId,
    origin: PointInt,
    damage: Region,
}

impl<'a, B: RenderBackend + ?Sized> DrawContext<'a, B> {
    pub(crate) fn new(backend: &'a mut B, window: WindowId, origin: PointInt, damage: Region) -> Self {
        Self { backend, window, origin, damage }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    /// The window's origin in root coordinates.
    pub fn origin(&self) -> PointInt {
        self.origin
    }

    /// The damage being repainted, in window coordinates.
    pub fn damage(&self) -> &Region {
        &self.damage
    }

    /// Fills a window-local rectangle.
    pub fn fill_rectangle(&mut self, color: Color, rect: RectInt) -> Result<(), RenderError> {
        self.backend.fill_rectangle(color, rect.translate(self.origin.x, self.origin.y))
    }

    /// Further narrows drawing to a window-local region.
    pub fn clip_to_region(&mut self, region: &Region) {
        self.backend.clip_to_region(&region.translated(self.origin.x, self.origin.y));
    }
}

/// An RGBA framebuffer held in memory.
#[derive(Debug, Clone)]
pub struct SoftwareSurface {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
    clip: Option<Region>,
    clip_stack: Vec<Option<Region>>,
}

impl SoftwareSurface {
    /// Creates a transparent black surface.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let len = (width as usize).checked_mul(height as usize);
        match len {
            Some(len) if len > 0 && width <= i32::MAX as u32 && height <= i32::MAX as u32 => Ok(Self {
                width,
                height,
                pixels: vec![[0; 4]; len],
                clip: None,
                clip_stack: Vec::new(),
            }),
            _ => Err(RenderError::InvalidSurfaceSize { width, height }),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> RectInt {
        RectInt::from_coords(0, 0, self.width, self.height)
    }

    /// Reads one pixel; `None` outside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        self.offset_of(x, y).map(|offset| self.pixels[offset])
    }

    /// Copies the pixels of `rect` (clamped to the surface) in row-major order.
    pub fn read_rect(&self, rect: RectInt) -> Vec<[u8; 4]> {
        let mut out = Vec::new();
        if let Some(area) = rect.intersection(&self.bounds()) {
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    if let Some(offset) = self.offset_of(x, y) {
                        out.push(self.pixels[offset]);
                    }
                }
            }
        }
        out
    }

    /// Depth of the clip stack.
    pub fn saved_states(&self) -> usize {
        self.clip_stack.len()
    }

    fn offset_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// The part of `area` that drawing may touch: inside the surface and the clip.
    fn drawable(&self, area: &Region) -> Region {
        let clipped = area.intersect(&Region::from_rect(self.bounds()));
        match &self.clip {
            Some(clip) => clipped.intersect(clip),
            None => clipped,
        }
    }
}

impl RenderBackend for SoftwareSurface {
    fn save(&mut self) {
        self.clip_stack.push(self.clip.clone());
    }

    fn restore(&mut self) -> Result<(), RenderError> {
        match self.clip_stack.pop() {
            Some(clip) => {
                self.clip = clip;
                Ok(())
            }
            None => {
                warn!("SoftwareSurface: restore without matching save");
                Err(RenderError::ClipStackUnderflow)
            }
        }
    }

    fn clip_to_region(&mut self, region: &Region) {
        self.clip = Some(match &self.clip {
            Some(clip) => clip.intersect(region),
            None => region.clone(),
        });
    }

    fn fill_rectangle(&mut self, color: Color, rect: RectInt) -> Result<(), RenderError> {
        let (r, g, b, a) = color.to_rgba8();
        let target = self.drawable(&Region::from_rect(rect));
        for area in target.iter_rectangles() {
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    if let Some(offset) = self.offset_of(x, y) {
                        self.pixels[offset] = [r, g, b, a];
                    }
                }
            }
        }
        Ok(())
    }

    fn copy_pixels(&mut self, src: RectInt, dst: PointInt, clip: &Region) -> Result<(), RenderError> {
        let (dx, dy) = (dst.x - src.x(), dst.y - src.y());
        let source = match src.intersection(&self.bounds()) {
            Some(source) => Region::from_rect(source),
            None => return Ok(()),
        };
        let target = self.drawable(&source.translated(dx, dy).intersect(clip));
        if target.is_empty() {
            return Ok(());
        }
        trace!(?src, ?dst, rects = target.rect_count(), "SoftwareSurface: copying pixels");

        // Read from a snapshot so overlapping copies see the original pixels.
        let snapshot = self.pixels.clone();
        for area in target.iter_rectangles() {
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    if let (Some(to), Some(from)) = (self.offset_of(x, y), self.offset_of(x - dx, y - dy)) {
                        self.pixels[to] = snapshot[from];
                    }
                }
            }
        }
        Ok(())
    }
}

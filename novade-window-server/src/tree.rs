//! The window arena and the coordinate/stacking queries built on it.
//!
//! Windows live in a slot vector indexed by handle. Destroyed slots stay
//! `None` forever, so a stale handle always resolves to
//! [`ServerError::WindowNotFound`].

use novade_core::types::{Color, PointInt};
use tracing::trace;

use crate::error::ServerError;
use crate::region::Region;
use crate::window::{Window, WindowId};

#[derive(Debug, Default)]
pub struct WindowTree {
    slots: Vec<Option<Window>>,
}

impl WindowTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh, unparented window and returns its handle.
    pub fn allocate(&mut self, background_color: Color) -> WindowId {
        let id = WindowId(self.slots.len() as u32 + 1);
        self.slots.push(Some(Window::new(id, background_color)));
        id
    }

    fn index(id: WindowId) -> Option<usize> {
        (id.0 as usize).checked_sub(1)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.get(id).is_ok()
    }

    pub fn get(&self, id: WindowId) -> Result<&Window, ServerError> {
        Self::index(id)
            .and_then(|index| self.slots.get(index))
            .and_then(Option::as_ref)
            .ok_or(ServerError::WindowNotFound(id))
    }

    pub fn get_mut(&mut self, id: WindowId) -> Result<&mut Window, ServerError> {
        Self::index(id)
            .and_then(|index| self.slots.get_mut(index))
            .and_then(Option::as_mut)
            .ok_or(ServerError::WindowNotFound(id))
    }

    /// Frees the slot of `id`. The handle is invalid afterwards.
    pub(crate) fn release(&mut self, id: WindowId) -> Option<Window> {
        Self::index(id).and_then(|index| self.slots.get_mut(index)).and_then(Option::take)
    }

    /// Number of live windows.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of the positions of `id`'s ancestors, plus its own when `include_self` is set.
    ///
    /// With `include_self` this maps window coordinates to root coordinates;
    /// without it, parent coordinates to root coordinates.
    pub fn absolute_offset(&self, id: WindowId, include_self: bool) -> Result<PointInt, ServerError> {
        let window = self.get(id)?;
        let mut offset = PointInt::default();
        let mut current = if include_self { Some(window) } else { window.parent.map(|p| self.get(p)).transpose()? };
        while let Some(window) = current {
            offset = offset.offset(window.x, window.y);
            current = window.parent.map(|p| self.get(p)).transpose()?;
        }
        Ok(offset)
    }

    /// The shape region of `id` expressed in root coordinates.
    pub fn transformed_shape_region(&self, id: WindowId) -> Result<Region, ServerError> {
        let offset = self.absolute_offset(id, false)?;
        Ok(self.get(id)?.shape_region.translated(offset.x, offset.y))
    }

    /// Every window stacked above `id`: at each level up to the root, the
    /// siblings preceding the current node in its parent's child list.
    pub fn windows_above(&self, id: WindowId) -> Result<Vec<WindowId>, ServerError> {
        let mut above = Vec::new();
        let mut current = self.get(id)?;
        while let Some(parent_id) = current.parent {
            let parent = self.get(parent_id)?;
            let position = parent.children.iter().position(|&child| child == current.id).unwrap_or(0);
            above.extend_from_slice(&parent.children[..position]);
            current = parent;
        }
        Ok(above)
    }

    /// The visible footprint of `id` in root coordinates: its transformed shape
    /// minus the transformed shapes of everything stacked above it.
    pub fn effective_region(&self, id: WindowId) -> Result<Region, ServerError> {
        let mut region = self.transformed_shape_region(id)?;
        for above in self.windows_above(id)? {
            if region.is_empty() {
                break;
            }
            region.subtract_with(&self.transformed_shape_region(above)?);
        }
        trace!(window = %id, rects = region.rect_count(), "computed effective region");
        Ok(region)
    }

    /// Returns `true` if `ancestor` is `id` itself or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: WindowId, id: WindowId) -> Result<bool, ServerError> {
        let mut current = Some(self.get(id)?);
        while let Some(window) = current {
            if window.id == ancestor {
                return Ok(true);
            }
            current = window.parent.map(|p| self.get(p)).transpose()?;
        }
        Ok(false)
    }

    /// `id` followed by all its descendants, parents before children.
    pub fn subtree(&self, id: WindowId) -> Result<Vec<WindowId>, ServerError> {
        let mut ordered = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let window = self.get(next)?;
            ordered.push(next);
            pending.extend(window.children.iter().rev());
        }
        Ok(ordered)
    }

    /// Inserts `id` as the topmost child of `parent`.
    pub(crate) fn attach_top(&mut self, id: WindowId, parent: WindowId) -> Result<(), ServerError> {
        self.get(id)?;
        self.get_mut(parent)?.children.insert(0, id);
        self.get_mut(id)?.parent = Some(parent);
        Ok(())
    }

    /// Unlinks `id` from its parent, if any.
    pub(crate) fn detach(&mut self, id: WindowId) -> Result<(), ServerError> {
        if let Some(parent) = self.get_mut(id)?.parent.take() {
            self.get_mut(parent)?.children.retain(|&child| child != id);
        }
        Ok(())
    }

    /// Index of `id` among its siblings and the sibling count. `None` for the root.
    pub fn stacking_position(&self, id: WindowId) -> Result<Option<(usize, usize)>, ServerError> {
        let window = self.get(id)?;
        match window.parent {
            Some(parent) => {
                let siblings = &self.get(parent)?.children;
                Ok(siblings.iter().position(|&child| child == id).map(|index| (index, siblings.len())))
            }
            None => Ok(None),
        }
    }

    /// Moves `id` to index 0 (topmost) among its siblings.
    pub(crate) fn restack_top(&mut self, id: WindowId) -> Result<(), ServerError> {
        if let Some(parent) = self.get(id)?.parent {
            let siblings = &mut self.get_mut(parent)?.children;
            siblings.retain(|&child| child != id);
            siblings.insert(0, id);
        }
        Ok(())
    }

    /// Moves `id` to the last index (bottommost) among its siblings.
    pub(crate) fn restack_bottom(&mut self, id: WindowId) -> Result<(), ServerError> {
        if let Some(parent) = self.get(id)?.parent {
            let siblings = &mut self.get_mut(parent)?.children;
            siblings.retain(|&child| child != id);
            siblings.push(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use novade_core::types::RectInt;
    use pretty_assertions::assert_eq;

    fn tree_with_root() -> (WindowTree, WindowId) {
        let mut tree = WindowTree::new();
        let root = tree.allocate(Color::default());
        tree.get_mut(root).unwrap().reconfigure(0, 0, 800, 600);
        (tree, root)
    }

    fn add(tree: &mut WindowTree, parent: WindowId, x: i32, y: i32, w: u32, h: u32) -> WindowId {
        let id = tree.allocate(Color::default());
        tree.attach_top(id, parent).unwrap();
        tree.get_mut(id).unwrap().reconfigure(x, y, w, h);
        id
    }

    #[test]
    fn handles_are_monotonic_and_never_reused() {
        let (mut tree, root) = tree_with_root();
        let a = add(&mut tree, root, 0, 0, 1, 1);
        assert_eq!((root, a), (WindowId(1), WindowId(2)));
        tree.detach(a).unwrap();
        assert!(tree.release(a).is_some());
        assert!(matches!(tree.get(a), Err(ServerError::WindowNotFound(id)) if id == a));
        assert_eq!(tree.allocate(Color::default()), WindowId(3));
        assert!(tree.get(WindowId(0)).is_err());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn offsets_and_transformed_shape() {
        let (mut tree, root) = tree_with_root();
        let parent = add(&mut tree, root, 100, 50, 200, 200);
        let child = add(&mut tree, parent, 10, 20, 30, 30);

        assert_eq!(tree.absolute_offset(child, true).unwrap(), PointInt::new(110, 70));
        assert_eq!(tree.absolute_offset(child, false).unwrap(), PointInt::new(100, 50));
        assert_eq!(
            tree.transformed_shape_region(child).unwrap(),
            Region::from_rect(RectInt::from_coords(110, 70, 30, 30))
        );
    }

    #[test]
    fn effective_region_subtracts_windows_above() {
        let (mut tree, root) = tree_with_root();
        let a = add(&mut tree, root, 10, 10, 100, 100);
        let b = add(&mut tree, root, 50, 50, 100, 100);

        assert_eq!(tree.windows_above(a).unwrap(), vec![b]);
        let expected = Region::from_rect(RectInt::from_coords(10, 10, 100, 100))
            .subtract(&Region::from_rect(RectInt::from_coords(50, 50, 100, 100)));
        assert_eq!(tree.effective_region(a).unwrap(), expected);
        assert_eq!(tree.effective_region(b).unwrap(), Region::from_rect(RectInt::from_coords(50, 50, 100, 100)));
    }

    #[test]
    fn windows_above_includes_ancestor_siblings() {
        let (mut tree, root) = tree_with_root();
        let low = add(&mut tree, root, 0, 0, 100, 100);
        let high = add(&mut tree, root, 0, 0, 10, 10);
        let inner = add(&mut tree, low, 0, 0, 50, 50);
        let inner_top = add(&mut tree, low, 0, 0, 5, 5);
        assert_eq!(tree.windows_above(inner).unwrap(), vec![inner_top, high]);
    }

    #[test]
    fn restacking_and_subtree() {
        let (mut tree, root) = tree_with_root();
        let a = add(&mut tree, root, 0, 0, 1, 1);
        let b = add(&mut tree, root, 0, 0, 1, 1);
        let c = add(&mut tree, a, 0, 0, 1, 1);
        assert_eq!(tree.get(root).unwrap().children(), &[b, a]);

        tree.restack_top(a).unwrap();
        assert_eq!(tree.stacking_position(a).unwrap(), Some((0, 2)));
        tree.restack_bottom(a).unwrap();
        assert_eq!(tree.get(root).unwrap().children(), &[b, a]);

        assert_eq!(tree.subtree(root).unwrap(), vec![root, b, a, c]);
        assert!(tree.is_ancestor_or_self(a, c).unwrap());
        assert!(!tree.is_ancestor_or_self(b, c).unwrap());
        assert_eq!(tree.stacking_position(root).unwrap(), None);
    }
}

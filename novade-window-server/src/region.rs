//! Region algebra: arbitrary areas made of axis-aligned rectangles.
//!
//! A [`Region`] is stored as horizontal bands sorted top to bottom. Each band
//! holds sorted, disjoint x-spans, and vertically adjacent bands with identical
//! spans are merged. This keeps the representation canonical: two regions
//! covering the same area compare equal, and emptiness is a length check.
//!
//! Boolean operations sweep both operands band by band, so their cost is
//! roughly linear in the number of rectangles involved.

use novade_core::types::{PointInt, RectInt};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Band {
    top: i32,
    bottom: i32,
    /// Half-open `[left, right)` spans; sorted, non-empty, never touching.
    spans: Vec<(i32, i32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Union,
    Intersect,
    Subtract,
}

impl Op {
    fn keep(self, in_a: bool, in_b: bool) -> bool {
        match self {
            Op::Union => in_a || in_b,
            Op::Intersect => in_a && in_b,
            Op::Subtract => in_a && !in_b,
        }
    }
}

/// A set of non-overlapping rectangles representing an arbitrary 2D area.
///
/// Regions are plain values: cloning yields an independent copy and every
/// operation either returns a new region or mutates `self` only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Region {
    bands: Vec<Band>,
}

impl Region {
    /// Creates an empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a region covering `rect`. Empty rectangles yield an empty region,
    /// as do rectangles whose edges collapse at the `i32` limits.
    pub fn from_rect(rect: RectInt) -> Self {
        let (left, top, right, bottom) = (rect.left(), rect.top(), rect.right(), rect.bottom());
        if left >= right || top >= bottom {
            return Self::default();
        }
        Region { bands: vec![Band { top, bottom, spans: vec![(left, right)] }] }
    }

    /// Creates the union of all `rects`.
    pub fn from_rects<I>(rects: I) -> Self
    where
        I: IntoIterator<Item = RectInt>,
    {
        rects.into_iter().fold(Region::new(), |mut acc, rect| {
            acc.union_with(&Region::from_rect(rect));
            acc
        })
    }

    /// Replaces the contents with the single rectangle `(x, y, width, height)`.
    pub fn init_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        *self = Region::from_rect(RectInt::from_coords(x, y, width, height));
    }

    /// Removes every rectangle.
    pub fn clear(&mut self) {
        self.bands.clear();
    }

    /// Makes `self` an independent copy of `other`.
    pub fn copy_from(&mut self, other: &Region) {
        self.bands.clone_from(&other.bands);
    }

    /// Returns the area covered by `self` or `other`.
    pub fn union(&self, other: &Region) -> Region {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        combine(self, other, Op::Union)
    }

    /// Returns the area covered by both `self` and `other`.
    pub fn intersect(&self, other: &Region) -> Region {
        if self.is_empty() || other.is_empty() {
            return Region::new();
        }
        combine(self, other, Op::Intersect)
    }

    /// Returns the area covered by `self` but not by `other`.
    pub fn subtract(&self, other: &Region) -> Region {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        combine(self, other, Op::Subtract)
    }

    /// In-place [`union`](Self::union).
    pub fn union_with(&mut self, other: &Region) {
        *self = self.union(other);
    }

    /// In-place [`intersect`](Self::intersect).
    pub fn intersect_with(&mut self, other: &Region) {
        *self = self.intersect(other);
    }

    /// In-place [`subtract`](Self::subtract).
    pub fn subtract_with(&mut self, other: &Region) {
        *self = self.subtract(other);
    }

    /// Shifts every rectangle by `(dx, dy)`.
    ///
    /// Coordinates saturate at the `i32` limits; rectangles pushed entirely
    /// past a limit collapse and are dropped.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        for band in &mut self.bands {
            band.top = band.top.saturating_add(dy);
            band.bottom = band.bottom.saturating_add(dy);
            for span in &mut band.spans {
                span.0 = span.0.saturating_add(dx);
                span.1 = span.1.saturating_add(dx);
            }
            band.spans.retain(|&(left, right)| left < right);
        }
        self.bands.retain(|band| band.top < band.bottom && !band.spans.is_empty());
    }

    /// Returns a copy shifted by `(dx, dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> Region {
        let mut region = self.clone();
        region.translate(dx, dy);
        region
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Iterates over the disjoint rectangles of the region, top to bottom and
    /// left to right. The iterator borrows the region and can be recreated at will.
    pub fn iter_rectangles(&self) -> impl Iterator<Item = RectInt> + '_ {
        self.bands.iter().flat_map(|band| {
            band.spans
                .iter()
                .map(move |&(left, right)| RectInt::from_edges(left, band.top, right, band.bottom))
        })
    }

    /// Number of rectangles yielded by [`iter_rectangles`](Self::iter_rectangles).
    pub fn rect_count(&self) -> usize {
        self.bands.iter().map(|band| band.spans.len()).sum()
    }

    /// Smallest rectangle containing the whole region (empty for an empty region).
    pub fn extents(&self) -> RectInt {
        let (first, last) = match (self.bands.first(), self.bands.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return RectInt::default(),
        };
        let left = self.bands.iter().filter_map(|b| b.spans.first()).map(|s| s.0).min();
        let right = self.bands.iter().filter_map(|b| b.spans.last()).map(|s| s.1).max();
        match (left, right) {
            (Some(left), Some(right)) => RectInt::from_edges(left, first.top, right, last.bottom),
            _ => RectInt::default(),
        }
    }

    pub fn contains_point(&self, point: PointInt) -> bool {
        self.bands
            .iter()
            .find(|band| point.y >= band.top && point.y < band.bottom)
            .map_or(false, |band| band.spans.iter().any(|&(l, r)| point.x >= l && point.x < r))
    }

    /// Total covered area in pixels.
    pub fn area(&self) -> u64 {
        self.iter_rectangles().map(|r| r.size.area()).sum()
    }
}

impl From<RectInt> for Region {
    fn from(rect: RectInt) -> Self {
        Region::from_rect(rect)
    }
}

/// Sweeps the y-edges of both operands and combines the spans of each strip.
fn combine(a: &Region, b: &Region, op: Op) -> Region {
    let mut edges: Vec<i32> = a
        .bands
        .iter()
        .chain(b.bands.iter())
        .flat_map(|band| [band.top, band.bottom])
        .collect();
    edges.sort_unstable();
    edges.dedup();

    let mut bands: Vec<Band> = Vec::new();
    let (mut ia, mut ib) = (0, 0);
    for strip in edges.windows(2) {
        let (top, bottom) = (strip[0], strip[1]);
        while ia < a.bands.len() && a.bands[ia].bottom <= top {
            ia += 1;
        }
        while ib < b.bands.len() && b.bands[ib].bottom <= top {
            ib += 1;
        }
        let spans_a = a.bands.get(ia).filter(|band| band.top <= top).map_or(&[][..], |band| &band.spans[..]);
        let spans_b = b.bands.get(ib).filter(|band| band.top <= top).map_or(&[][..], |band| &band.spans[..]);

        let spans = combine_spans(spans_a, spans_b, op);
        if spans.is_empty() {
            continue;
        }
        match bands.last_mut() {
            Some(prev) if prev.bottom == top && prev.spans == spans => prev.bottom = bottom,
            _ => bands.push(Band { top, bottom, spans }),
        }
    }
    Region { bands }
}

/// One-dimensional version of [`combine`] over sorted span lists.
fn combine_spans(a: &[(i32, i32)], b: &[(i32, i32)], op: Op) -> Vec<(i32, i32)> {
    let mut edges: Vec<i32> = a.iter().chain(b.iter()).flat_map(|&(l, r)| [l, r]).collect();
    edges.sort_unstable();
    edges.dedup();

    let mut spans: Vec<(i32, i32)> = Vec::new();
    let (mut ia, mut ib) = (0, 0);
    for interval in edges.windows(2) {
        let (left, right) = (interval[0], interval[1]);
        while ia < a.len() && a[ia].1 <= left {
            ia += 1;
        }
        while ib < b.len() && b[ib].1 <= left {
            ib += 1;
        }
        let in_a = ia < a.len() && a[ia].0 <= left;
        let in_b = ib < b.len() && b[ib].0 <= left;
        if !op.keep(in_a, in_b) {
            continue;
        }
        match spans.last_mut() {
            Some(prev) if prev.1 == left => prev.1 = right,
            _ => spans.push((left, right)),
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Region: std::fmt::Debug, Clone, PartialEq, Eq, Default, Send, Sync);

    fn rect(x: i32, y: i32, w: u32, h: u32) -> RectInt {
        RectInt::from_coords(x, y, w, h)
    }

    fn region(rects: &[RectInt]) -> Region {
        Region::from_rects(rects.iter().copied())
    }

    #[test]
    fn empty_rect_yields_empty_region() {
        assert!(Region::from_rect(rect(5, 5, 0, 10)).is_empty());
        let mut r = Region::from_rect(rect(0, 0, 4, 4));
        r.init_rect(1, 1, 3, 0);
        assert!(r.is_empty());
        assert_eq!(r.rect_count(), 0);
    }

    #[test]
    fn rects_collapsing_at_the_limits_are_empty() {
        assert!(Region::from_rect(rect(i32::MAX, 0, 10, 10)).is_empty());
        let clamped = Region::from_rect(rect(10, 10, 3_000_000_000, 10));
        assert_eq!(clamped.extents(), RectInt::from_edges(10, 10, i32::MAX, 20));
        assert!(clamped.iter_rectangles().all(|r| !r.is_empty()));

        let mut pushed = Region::from_rect(rect(i32::MAX - 20, 0, 10, 10));
        pushed.translate(50, 0);
        assert!(pushed.is_empty());
        assert_eq!(pushed.area(), 0);
    }

    #[test]
    fn union_of_touching_rects_coalesces() {
        let r = region(&[rect(0, 0, 10, 10), rect(10, 0, 10, 10), rect(0, 10, 20, 5)]);
        assert_eq!(r, Region::from_rect(rect(0, 0, 20, 15)));
        assert_eq!(r.rect_count(), 1);
    }

    #[test]
    fn subtract_produces_l_shape() {
        let a = Region::from_rect(rect(10, 10, 100, 100));
        let b = Region::from_rect(rect(50, 50, 100, 100));
        let l_shape = a.subtract(&b);

        let rects: Vec<RectInt> = l_shape.iter_rectangles().collect();
        assert_eq!(rects, vec![rect(10, 10, 100, 40), rect(10, 50, 40, 60)]);
        assert_eq!(l_shape.area(), 100 * 100 - 60 * 60);
        assert_eq!(l_shape.extents(), rect(10, 10, 100, 100));
        assert!(l_shape.contains_point(PointInt::new(20, 100)));
        assert!(!l_shape.contains_point(PointInt::new(60, 60)));
    }

    #[test]
    fn subtract_hole_keeps_frame() {
        let frame = Region::from_rect(rect(0, 0, 30, 30)).subtract(&Region::from_rect(rect(10, 10, 10, 10)));
        assert_eq!(frame.rect_count(), 4);
        assert_eq!(frame.area(), 900 - 100);
        assert_eq!(frame.union(&Region::from_rect(rect(10, 10, 10, 10))), Region::from_rect(rect(0, 0, 30, 30)));
    }

    #[test]
    fn intersect_of_overlapping_rects() {
        let a = Region::from_rect(rect(0, 0, 10, 10));
        let b = Region::from_rect(rect(5, 5, 10, 10));
        assert_eq!(a.intersect(&b), Region::from_rect(rect(5, 5, 5, 5)));
    }

    #[rstest]
    #[case(region(&[rect(0, 0, 10, 10)]), region(&[rect(5, 5, 10, 10)]))]
    #[case(region(&[rect(0, 0, 10, 10), rect(20, 0, 5, 30)]), region(&[rect(-5, 8, 40, 4)]))]
    #[case(region(&[rect(0, 0, 30, 30)]).subtract(&region(&[rect(10, 10, 10, 10)])), region(&[rect(12, 0, 3, 40)]))]
    #[case(Region::new(), region(&[rect(1, 2, 3, 4)]))]
    fn algebra_laws(#[case] a: Region, #[case] b: Region) {
        assert_eq!(a.union(&b), b.union(&a));
        assert_eq!(a.intersect(&b), b.intersect(&a));
        assert!(a.subtract(&a).is_empty());
        assert_eq!(a.translated(7, -3).translated(-7, 3), a);
        // a = (a - b) + (a & b), and the two parts are disjoint.
        let diff = a.subtract(&b);
        let common = a.intersect(&b);
        assert!(diff.intersect(&common).is_empty());
        assert_eq!(diff.union(&common), a);
        assert_eq!(a.union(&b).area(), a.area() + b.area() - common.area());
    }

    #[test]
    fn intersect_of_disjoint_rects_is_empty() {
        let a = Region::from_rect(rect(0, 0, 10, 10));
        let b = Region::from_rect(rect(10, 0, 10, 10));
        assert!(a.intersect(&b).is_empty());
        let c = Region::from_rect(rect(0, 20, 10, 10));
        assert!(a.intersect(&c).is_empty());
    }

    #[test]
    fn canonical_form_is_order_independent() {
        let forward = region(&[rect(0, 0, 10, 10), rect(5, 5, 10, 10), rect(30, 0, 5, 5)]);
        let backward = region(&[rect(30, 0, 5, 5), rect(5, 5, 10, 10), rect(0, 0, 10, 10)]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn in_place_ops_match_pure_ops() {
        let a = region(&[rect(0, 0, 20, 20)]);
        let b = region(&[rect(10, 10, 20, 20)]);
        let mut c = a.clone();
        c.subtract_with(&b);
        assert_eq!(c, a.subtract(&b));
        c.union_with(&b);
        assert_eq!(c, a.union(&b));
        c.intersect_with(&a);
        assert_eq!(c, a);
    }

    #[test]
    fn copy_from_is_independent() {
        let original = Region::from_rect(rect(0, 0, 4, 4));
        let mut copy = Region::new();
        copy.copy_from(&original);
        copy.translate(10, 10);
        assert_eq!(original, Region::from_rect(rect(0, 0, 4, 4)));
        assert_eq!(copy.extents(), rect(10, 10, 4, 4));
        copy.clear();
        assert!(copy.is_empty());
        assert_eq!(copy.extents(), RectInt::default());
    }
}

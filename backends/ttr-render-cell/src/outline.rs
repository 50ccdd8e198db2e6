//! Outline accumulation: points in an arena, lines and curves as indices
//!
//! An [`Outline`] lives for exactly one glyph. The font's decomposition pushes
//! move/line/quad/close commands into it through [`OutlineSink`], the
//! tessellator adds the lines that replace its curves, and the rasterizer
//! reads the result before everything is dropped.
//!
//! Indices are `u16`, so every sequence is capped at [`MAX_ELEMENTS`]. The
//! cap is checked explicitly on every append instead of being left to the
//! index width.

use ttr_core::error::{RenderError, Result as TtrResult};
use ttr_core::fixed::scale_down;
use ttr_core::traits::OutlineSink;

/// Hard ceiling for points, lines and curves in one outline
pub const MAX_ELEMENTS: usize = u16::MAX as usize;

/// Capacity every sequence starts with
pub const INITIAL_CAPACITY: usize = 64;

/// A position in glyph-local pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point {
            x: 0.5 * (self.x + other.x),
            y: 0.5 * (self.y + other.y),
        }
    }
}

/// A directed segment between two points of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Line {
    pub begin: u16,
    pub end: u16,
}

/// One quadratic Bézier segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Curve {
    pub begin: u16,
    pub control: u16,
    pub end: u16,
}

/// A grow-only sequence that doubles up to [`MAX_ELEMENTS`]
#[derive(Debug, Clone)]
struct Bounded<T> {
    items: Vec<T>,
    what: &'static str,
}

impl<T> Bounded<T> {
    fn new(what: &'static str) -> Result<Self, RenderError> {
        let mut items = Vec::new();
        items
            .try_reserve_exact(INITIAL_CAPACITY)
            .map_err(|_| RenderError::AllocationFailure {
                what,
                requested: INITIAL_CAPACITY,
            })?;
        Ok(Self { items, what })
    }

    /// Append and return the new element's index
    fn push(&mut self, item: T) -> Result<u16, RenderError> {
        let len = self.items.len();
        if len >= MAX_ELEMENTS {
            return Err(RenderError::AllocationFailure {
                what: self.what,
                requested: len + 1,
            });
        }
        if len == self.items.capacity() {
            let target = (len.max(1) * 2).min(MAX_ELEMENTS);
            self.items
                .try_reserve_exact(target - len)
                .map_err(|_| RenderError::AllocationFailure {
                    what: self.what,
                    requested: target,
                })?;
        }
        self.items.push(item);
        // len < MAX_ELEMENTS == u16::MAX
        Ok(len as u16)
    }

    fn capacity(&self) -> usize {
        self.items.capacity()
    }
}

/// Points, lines and curves of one glyph
#[derive(Debug, Clone)]
pub struct Outline {
    points: Bounded<Point>,
    lines: Bounded<Line>,
    curves: Bounded<Curve>,
    contour_start: Option<u16>,
    current: Option<u16>,
    dropped_cubics: usize,
}

impl Outline {
    /// Empty outline with [`INITIAL_CAPACITY`] reserved in each sequence
    pub fn new() -> Result<Self, RenderError> {
        Ok(Self {
            points: Bounded::new("points")?,
            lines: Bounded::new("lines")?,
            curves: Bounded::new("curves")?,
            contour_start: None,
            current: None,
            dropped_cubics: 0,
        })
    }

    pub fn add_point(&mut self, point: Point) -> Result<u16, RenderError> {
        self.points.push(point)
    }

    /// Both indices must already name points in this outline
    pub fn add_line(&mut self, begin: u16, end: u16) -> Result<(), RenderError> {
        debug_assert!((begin as usize) < self.points.items.len());
        debug_assert!((end as usize) < self.points.items.len());
        self.lines.push(Line { begin, end }).map(|_| ())
    }

    /// All three indices must already name points in this outline
    pub fn add_curve(&mut self, begin: u16, control: u16, end: u16) -> Result<(), RenderError> {
        debug_assert!((begin as usize) < self.points.items.len());
        debug_assert!((control as usize) < self.points.items.len());
        debug_assert!((end as usize) < self.points.items.len());
        self.curves
            .push(Curve {
                begin,
                control,
                end,
            })
            .map(|_| ())
    }

    #[inline]
    pub fn point(&self, index: u16) -> Point {
        self.points.items[index as usize]
    }

    pub fn points(&self) -> &[Point] {
        &self.points.items
    }

    pub(crate) fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points.items
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines.items
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves.items
    }

    /// Current capacities of the point, line and curve sequences
    pub fn capacities(&self) -> (usize, usize, usize) {
        (
            self.points.capacity(),
            self.lines.capacity(),
            self.curves.capacity(),
        )
    }

    /// Cubic segments that arrived through [`OutlineSink::cubic_to`] and were dropped
    pub fn dropped_cubics(&self) -> usize {
        self.dropped_cubics
    }

    pub fn is_empty(&self) -> bool {
        self.lines.items.is_empty() && self.curves.items.is_empty()
    }

    fn begin_contour(&mut self, at: Point) -> Result<u16, RenderError> {
        let index = self.add_point(at)?;
        self.contour_start = Some(index);
        self.current = Some(index);
        Ok(index)
    }
}

impl OutlineSink for Outline {
    fn move_to(&mut self, x: f32, y: f32) -> TtrResult<()> {
        self.begin_contour(Point::new(scale_down(x), scale_down(y)))?;
        Ok(())
    }

    fn line_to(&mut self, x: f32, y: f32) -> TtrResult<()> {
        let to = Point::new(scale_down(x), scale_down(y));
        let Some(from) = self.current else {
            self.begin_contour(to)?;
            return Ok(());
        };
        let end = self.add_point(to)?;
        self.add_line(from, end)?;
        self.current = Some(end);
        Ok(())
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> TtrResult<()> {
        let to = Point::new(scale_down(x), scale_down(y));
        let Some(from) = self.current else {
            self.begin_contour(to)?;
            return Ok(());
        };
        let control = self.add_point(Point::new(scale_down(cx), scale_down(cy)))?;
        let end = self.add_point(to)?;
        self.add_curve(from, control, end)?;
        self.current = Some(end);
        Ok(())
    }

    fn cubic_to(
        &mut self,
        _cx0: f32,
        _cy0: f32,
        _cx1: f32,
        _cy1: f32,
        _x: f32,
        _y: f32,
    ) -> TtrResult<()> {
        // Cubics are not rasterized. The contour keeps its current point, so
        // the next segment or the closing line bridges the gap.
        if self.dropped_cubics == 0 {
            log::debug!("Dropping cubic segment; only quadratic outlines are rasterized");
        }
        self.dropped_cubics += 1;
        Ok(())
    }

    fn close(&mut self) -> TtrResult<()> {
        if let (Some(start), Some(current)) = (self.contour_start, self.current) {
            if start != current && self.point(start) != self.point(current) {
                self.add_line(current, start)?;
            }
        }
        self.contour_start = None;
        self.current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_outline_reserves_initial_capacity() {
        let outline = Outline::new().unwrap();
        let (p, l, c) = outline.capacities();
        assert!(p >= INITIAL_CAPACITY);
        assert!(l >= INITIAL_CAPACITY);
        assert!(c >= INITIAL_CAPACITY);
        assert!(outline.points().is_empty());
        assert!(outline.is_empty());
    }

    #[test]
    fn test_indices_follow_insertion_order() {
        let mut outline = Outline::new().unwrap();
        assert_eq!(outline.add_point(Point::new(0.0, 0.0)).unwrap(), 0);
        assert_eq!(outline.add_point(Point::new(1.0, 0.0)).unwrap(), 1);
        assert_eq!(outline.add_point(Point::new(1.0, 1.0)).unwrap(), 2);
        outline.add_line(0, 1).unwrap();
        outline.add_curve(0, 1, 2).unwrap();
        assert_eq!(outline.lines(), &[Line { begin: 0, end: 1 }]);
        assert_eq!(
            outline.curves(),
            &[Curve {
                begin: 0,
                control: 1,
                end: 2
            }]
        );
    }

    #[test]
    fn test_capacity_doubles_and_never_shrinks() {
        let mut outline = Outline::new().unwrap();
        for i in 0..=INITIAL_CAPACITY {
            outline.add_point(Point::new(i as f32, 0.0)).unwrap();
        }
        let (p, _, _) = outline.capacities();
        assert!(p >= INITIAL_CAPACITY * 2);
    }

    #[test]
    fn test_midpoint() {
        let m = Point::new(0.0, 2.0).midpoint(Point::new(4.0, -2.0));
        assert_eq!(m, Point::new(2.0, 0.0));
    }

    #[test]
    fn test_sink_scales_down_and_builds_segments() {
        let mut outline = Outline::new().unwrap();
        outline.move_to(0.0, 0.0).unwrap();
        outline.line_to(640.0, 0.0).unwrap();
        outline.quad_to(640.0, 640.0, 0.0, 640.0).unwrap();
        outline.close().unwrap();

        assert_eq!(
            outline.points(),
            &[
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ]
        );
        assert_eq!(
            outline.lines(),
            &[Line { begin: 0, end: 1 }, Line { begin: 3, end: 0 }]
        );
        assert_eq!(outline.curves().len(), 1);
    }

    #[test]
    fn test_close_skips_line_when_contour_already_closed() {
        let mut outline = Outline::new().unwrap();
        outline.move_to(0.0, 0.0).unwrap();
        outline.line_to(64.0, 0.0).unwrap();
        outline.line_to(64.0, 64.0).unwrap();
        outline.line_to(0.0, 0.0).unwrap();
        outline.close().unwrap();
        assert_eq!(outline.lines().len(), 3);
    }

    #[test]
    fn test_cubic_is_dropped() {
        let mut outline = Outline::new().unwrap();
        outline.move_to(0.0, 0.0).unwrap();
        outline
            .cubic_to(10.0, 10.0, 20.0, 10.0, 30.0, 0.0)
            .unwrap();
        outline
            .cubic_to(10.0, 10.0, 20.0, 10.0, 30.0, 0.0)
            .unwrap();
        assert_eq!(outline.dropped_cubics(), 2);
        assert_eq!(outline.points().len(), 1);
        assert!(outline.is_empty());
    }

    #[test]
    fn test_line_without_move_starts_contour() {
        let mut outline = Outline::new().unwrap();
        outline.line_to(64.0, 64.0).unwrap();
        outline.line_to(128.0, 64.0).unwrap();
        assert_eq!(outline.points().len(), 2);
        assert_eq!(outline.lines(), &[Line { begin: 0, end: 1 }]);
    }
}

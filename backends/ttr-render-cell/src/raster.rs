//! Signed-area scan conversion into a cell grid
//!
//! Every line crossing a row deposits two numbers into the cells it visits:
//! `cover`, the vertical distance it travels inside the cell, and `area`, that
//! same distance weighted by how much of the cell lies to the right of the
//! crossing. Horizontal lines carry nothing. [`crate::coverage::integrate`]
//! later sweeps the grid and turns the running sum into pixel coverage.

use ttr_core::error::RenderError;

use crate::curves::tessellate_curves;
use crate::outline::{Outline, Point};

/// Accumulator for one pixel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cell {
    pub area: f32,
    pub cover: f32,
}

/// Dense `width × height` grid of cells, row-major
#[derive(Debug, Clone)]
pub struct Raster {
    cells: Vec<Cell>,
    width: u32,
    height: u32,
}

impl Raster {
    /// Allocate a zeroed grid, failing instead of aborting when memory is short
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let len = (width as usize).checked_mul(height as usize).ok_or(
            RenderError::AllocationFailure {
                what: "cell grid",
                requested: usize::MAX,
            },
        )?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| RenderError::AllocationFailure {
                what: "cell grid",
                requested: len,
            })?;
        cells.resize(len, Cell::default());

        Ok(Self {
            cells,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, x: u32, y: u32) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize)
    }

    /// Cells outside the grid yield `None` so float round-off never writes out of bounds
    #[inline]
    fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        self.cells
            .get_mut(y as usize * self.width as usize + x as usize)
    }

    #[inline]
    fn deposit(&mut self, x: i32, y: i32, x_average: f32, y_difference: f32) {
        match self.cell_mut(x, y) {
            Some(cell) => {
                cell.cover += y_difference;
                cell.area += (1.0 - x_average) * y_difference;
            },
            None => log::trace!("Dropping deposit outside grid at ({}, {})", x, y),
        }
    }

    /// Sum of `cover` across one row; zero for closed outlines
    pub fn row_cover_sum(&self, row: u32) -> f32 {
        if row >= self.height {
            return 0.0;
        }
        let start = row as usize * self.width as usize;
        self.cells[start..start + self.width as usize]
            .iter()
            .map(|c| c.cover)
            .sum()
    }
}

/// Affine map `(x, y) → (a·x + c·y + e, b·x + d·y + f)` stored as `[a, b, c, d, e, f]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(pub [f32; 6]);

impl Transform {
    pub const IDENTITY: Transform = Transform([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        let [a, b, c, d, e, f] = self.0;
        Point {
            x: p.x * a + p.y * c + e,
            y: p.x * b + p.y * d + f,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Largest float strictly below a positive bound
#[inline]
fn below(bound: f32) -> f32 {
    if bound > 0.0 {
        f32::from_bits(bound.to_bits() - 1)
    } else {
        0.0
    }
}

/// Transform, clip, tessellate and draw `outline` into `raster`
///
/// The outline's points are modified in place. Returns the peak tessellation
/// stack height.
pub fn rasterize_outline(
    outline: &mut Outline,
    transform: &Transform,
    raster: &mut Raster,
) -> Result<usize, RenderError> {
    let max_x = below(raster.width as f32);
    let max_y = below(raster.height as f32);
    for p in outline.points_mut() {
        let t = transform.apply(*p);
        *p = Point {
            x: t.x.clamp(0.0, max_x),
            y: t.y.clamp(0.0, max_y),
        };
    }

    let peak = tessellate_curves(outline)?;

    for line in outline.lines() {
        draw_line(raster, outline.point(line.begin), outline.point(line.end));
    }

    log::trace!(
        "Rasterized {} lines into {}x{} cells",
        outline.lines().len(),
        raster.width,
        raster.height
    );
    Ok(peak)
}

#[inline]
fn sign(v: f32) -> i32 {
    (v > 0.0) as i32 - (v < 0.0) as i32
}

/// Walk the cells crossed by `origin → goal`, depositing area and cover
///
/// At each step the walk moves to whichever grid line (vertical or
/// horizontal) the segment reaches first, measured as a fraction of its
/// length.
pub fn draw_line(raster: &mut Raster, origin: Point, goal: Point) {
    let delta_x = goal.x - origin.x;
    let delta_y = goal.y - origin.y;
    let dir_x = sign(delta_x);
    let dir_y = sign(delta_y);

    if dir_y == 0 {
        return;
    }

    let incr_x = if dir_x != 0 { (1.0 / delta_x).abs() } else { 1.0 };
    let incr_y = (1.0 / delta_y).abs();

    let mut steps: i32 = 0;
    let mut pixel_x;
    let mut next_x;
    match dir_x {
        0 => {
            pixel_x = origin.x.floor() as i32;
            // Never reached: the column is fixed
            next_x = 100.0;
        },
        1 => {
            pixel_x = origin.x.floor() as i32;
            next_x = incr_x - (origin.x - pixel_x as f32) * incr_x;
            steps += goal.x.ceil() as i32 - origin.x.floor() as i32 - 1;
        },
        _ => {
            pixel_x = origin.x.ceil() as i32 - 1;
            next_x = (origin.x - pixel_x as f32) * incr_x;
            steps += origin.x.ceil() as i32 - goal.x.floor() as i32 - 1;
        },
    }

    let mut pixel_y;
    let mut next_y;
    if dir_y > 0 {
        pixel_y = origin.y.floor() as i32;
        next_y = incr_y - (origin.y - pixel_y as f32) * incr_y;
        steps += goal.y.ceil() as i32 - origin.y.floor() as i32 - 1;
    } else {
        pixel_y = origin.y.ceil() as i32 - 1;
        next_y = (origin.y - pixel_y as f32) * incr_y;
        steps += origin.y.ceil() as i32 - goal.y.floor() as i32 - 1;
    }

    let half_delta_x = 0.5 * delta_x;
    let mut prev_distance = 0.0f32;
    let mut next_distance = next_x.min(next_y);

    for _ in 0..steps {
        let x_average = origin.x + (prev_distance + next_distance) * half_delta_x - pixel_x as f32;
        let y_difference = (next_distance - prev_distance) * delta_y;
        raster.deposit(pixel_x, pixel_y, x_average, y_difference);

        prev_distance = next_distance;
        if next_x < next_y {
            pixel_x += dir_x;
            next_x += incr_x;
        } else {
            pixel_y += dir_y;
            next_y += incr_y;
        }
        next_distance = next_x.min(next_y);
    }

    let x_average = origin.x + (prev_distance + 1.0) * half_delta_x - pixel_x as f32;
    let y_difference = (1.0 - prev_distance) * delta_y;
    raster.deposit(pixel_x, pixel_y, x_average, y_difference);
}

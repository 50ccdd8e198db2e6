//! Quadratic curves flattened into lines
//!
//! Each curve is split at t = 0.5 (de Casteljau) until the triangle spanned by
//! its begin, control and end points is thin enough. Subdivision runs on an
//! explicit stack of [`STACK_CAPACITY`] entries; when the stack is full the
//! current piece is accepted as flat, so the walk always terminates.

use ttr_core::error::RenderError;

use crate::outline::{Curve, Outline};

/// Twice the triangle area, in pixels², below which a curve counts as flat
pub const FLATNESS_TOLERANCE: f32 = 2.0;

/// Maximum number of pending second halves
pub const STACK_CAPACITY: usize = 10;

/// Replace every curve of `outline` with lines
///
/// Curves are walked in insertion order; points and lines are appended to
/// the outline. Returns the deepest stack height reached by any curve.
pub fn tessellate_curves(outline: &mut Outline) -> Result<usize, RenderError> {
    let mut peak = 0;
    for index in 0..outline.curves().len() {
        let curve = outline.curves()[index];
        peak = peak.max(tessellate_curve(outline, curve)?);
    }
    Ok(peak)
}

/// Twice the signed area of the begin/control/end triangle
fn twice_area(outline: &Outline, curve: Curve) -> f32 {
    let begin = outline.point(curve.begin);
    let control = outline.point(curve.control);
    let end = outline.point(curve.end);
    let gx = control.x - begin.x;
    let gy = control.y - begin.y;
    let hx = end.x - begin.x;
    let hy = end.y - begin.y;
    gx * hy - hx * gy
}

#[inline]
fn is_flat(outline: &Outline, curve: Curve) -> bool {
    twice_area(outline, curve).abs() <= FLATNESS_TOLERANCE
}

/// Flatten one curve, returning the peak stack height
pub fn tessellate_curve(outline: &mut Outline, curve: Curve) -> Result<usize, RenderError> {
    let mut stack = [Curve::default(); STACK_CAPACITY];
    let mut top = 0;
    let mut peak = 0;
    let mut current = curve;

    loop {
        if top >= STACK_CAPACITY || is_flat(outline, current) {
            outline.add_line(current.begin, current.end)?;
            if top == 0 {
                break;
            }
            top -= 1;
            current = stack[top];
            continue;
        }

        let begin = outline.point(current.begin);
        let control = outline.point(current.control);
        let end = outline.point(current.end);
        let left = begin.midpoint(control);
        let right = control.midpoint(end);
        let pivot_point = left.midpoint(right);

        let ctrl0 = outline.add_point(left)?;
        let ctrl1 = outline.add_point(right)?;
        let pivot = outline.add_point(pivot_point)?;

        stack[top] = Curve {
            begin: pivot,
            control: ctrl1,
            end: current.end,
        };
        top += 1;
        peak = peak.max(top);

        current = Curve {
            begin: current.begin,
            control: ctrl0,
            end: pivot,
        };
    }

    Ok(peak)
}

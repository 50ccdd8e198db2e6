//! From accumulated cells to 8-bit coverage

use ttr_core::traits::PixelSink;

use crate::raster::Raster;

/// Map a winding sum to an intensity: `min(|v|, 1) · 255`, rounded
#[inline]
pub fn coverage_to_u8(value: f32) -> u8 {
    (value.abs().min(1.0) * 255.0 + 0.5) as u8
}

/// Sweep `raster` in row-major order and hand every pixel to `sink`
///
/// The running sum is carried across row boundaries; closed outlines bring
/// it back to zero at the end of every row.
pub fn integrate<S: PixelSink + ?Sized>(raster: &Raster, sink: &mut S) {
    let width = raster.width();
    if width == 0 {
        return;
    }
    let mut accum = 0.0f32;
    for (i, cell) in raster.cells().iter().enumerate() {
        let value = coverage_to_u8(accum + cell.area);
        accum += cell.cover;
        let i = i as u32;
        sink.draw_pixel(i % width, i / width, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Point;
    use crate::raster::draw_line;

    #[test]
    fn test_coverage_mapping() {
        assert_eq!(coverage_to_u8(0.0), 0);
        assert_eq!(coverage_to_u8(1.0), 255);
        assert_eq!(coverage_to_u8(-1.0), 255);
        assert_eq!(coverage_to_u8(3.5), 255);
        assert_eq!(coverage_to_u8(0.5), 128);
        assert_eq!(coverage_to_u8(-0.25), 64);
    }

    #[test]
    fn test_every_pixel_is_emitted_in_row_major_order() {
        let raster = Raster::new(3, 2).unwrap();
        let mut seen = Vec::new();
        integrate(&raster, &mut |x: u32, y: u32, c: u8| seen.push((x, y, c)));
        assert_eq!(
            seen,
            vec![
                (0, 0, 0),
                (1, 0, 0),
                (2, 0, 0),
                (0, 1, 0),
                (1, 1, 0),
                (2, 1, 0)
            ]
        );
    }

    #[test]
    fn test_half_pixel_column() {
        // A rectangle from x = 0.5 to x = 2 over one row
        let mut raster = Raster::new(3, 1).unwrap();
        draw_line(&mut raster, Point::new(0.5, 0.0), Point::new(0.5, 0.99));
        draw_line(&mut raster, Point::new(2.0, 0.99), Point::new(2.0, 0.0));

        let mut row = Vec::new();
        integrate(&raster, &mut |_x: u32, _y: u32, c: u8| row.push(c));
        assert!((row[0] as i32 - 126).abs() <= 1);
        assert!(row[1] >= 251);
        assert_eq!(row[2], 0);
    }
}

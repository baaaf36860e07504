//! Star rendering into an indexed pixel buffer.

use crate::palette::Palette;
use crate::star::Star;

/// A writable rectangle of palette-indexed pixels.
pub trait PixelTarget {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Writes one pixel. Callers guarantee `x < width` and `y < height`.
    fn put_pixel(&mut self, x: u32, y: u32, color: u8);
}

/// Draws one star: a centre pixel in `color`, then a ring of four pixels per
/// luminance step at `color + step`, giving a glow `luminance_count` pixels
/// in radius.
///
/// `x` and `y` are projected coordinates; the glow is offset by
/// `luminance_count - 1` so it never leaves a buffer the projection was
/// sized for.
pub fn draw_star<T: PixelTarget + ?Sized>(
    target: &mut T,
    x: i32,
    y: i32,
    color: u8,
    luminance_count: u32,
) {
    let radius = luminance_count.max(1) as i32 - 1;
    let cx = x + radius;
    let cy = y + radius;
    debug_assert!(
        cx - radius >= 0
            && cy - radius >= 0
            && ((cx + radius) as u32) < target.width()
            && ((cy + radius) as u32) < target.height(),
        "star at ({x}, {y}) does not fit a {}x{} target",
        target.width(),
        target.height()
    );

    target.put_pixel(cx as u32, cy as u32, color);
    for step in 1..=radius {
        let shade = color.wrapping_add(step as u8);
        target.put_pixel(cx as u32, (cy - step) as u32, shade);
        target.put_pixel(cx as u32, (cy + step) as u32, shade);
        target.put_pixel((cx - step) as u32, cy as u32, shade);
        target.put_pixel((cx + step) as u32, cy as u32, shade);
    }
}

/// Draws every visible star.
pub fn draw_stars<T: PixelTarget + ?Sized>(
    target: &mut T,
    stars: &[Star],
    luminance_count: u32,
) {
    for star in stars.iter().filter(|s| s.visible) {
        draw_star(
            target,
            star.screen.x,
            star.screen.y,
            star.color_index,
            luminance_count,
        );
    }
}

/// Row-major buffer of palette indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl IndexedBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn clear(&mut self, color: u8) {
        self.pixels.fill(color);
    }

    /// Palette index at (`x`, `y`), or `None` outside the buffer.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Resolves every pixel through `palette` into tightly packed RGBA8.
    pub fn to_rgba8(&self, palette: &Palette) -> Vec<u8> {
        let lookup = palette.to_rgba8();
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for &index in &self.pixels {
            bytes.extend_from_slice(&lookup[index as usize]);
        }
        bytes
    }
}

impl PixelTarget for IndexedBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn put_pixel(&mut self, x: u32, y: u32, color: u8) {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} buffer",
            self.width,
            self.height
        );
        let index = (y * self.width + x) as usize;
        self.pixels[index] = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{PaletteSpec, Rgb};
    use glam::{IVec2, Vec2};

    fn star_at(x: i32, y: i32, color: u8, visible: bool) -> Star {
        Star {
            base: Vec2::ZERO,
            depth: 10,
            bucket: 0,
            screen: IVec2::new(x, y),
            color_index: color,
            visible,
        }
    }

    #[test]
    fn test_draw_star_glow_shape() {
        let mut buffer = IndexedBuffer::new(16, 16);
        draw_star(&mut buffer, 5, 5, 10, 3);

        // Centre sits at (x + 2, y + 2).
        assert_eq!(buffer.get(7, 7), Some(10));
        for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
            assert_eq!(buffer.get((7 + dx) as u32, (7 + dy) as u32), Some(11));
        }
        for (dx, dy) in [(0, -2), (0, 2), (-2, 0), (2, 0)] {
            assert_eq!(buffer.get((7 + dx) as u32, (7 + dy) as u32), Some(12));
        }
        // Diagonals stay untouched.
        assert_eq!(buffer.get(8, 8), Some(0));
        let lit = buffer.pixels().iter().filter(|&&p| p != 0).count();
        assert_eq!(lit, 9);
    }

    #[test]
    fn test_draw_star_single_luminance_is_one_pixel() {
        let mut buffer = IndexedBuffer::new(4, 4);
        draw_star(&mut buffer, 1, 2, 7, 1);
        assert_eq!(buffer.get(1, 2), Some(7));
        assert_eq!(buffer.pixels().iter().filter(|&&p| p != 0).count(), 1);
    }

    #[test]
    fn test_draw_star_at_limits_stays_in_buffer() {
        // 320 - (2 * 3 - 1) = 315 is the largest projected x.
        let mut buffer = IndexedBuffer::new(320, 200);
        draw_star(&mut buffer, 315, 195, 1, 3);
        draw_star(&mut buffer, 0, 0, 1, 3);
        assert_eq!(buffer.get(319, 197), Some(3));
        assert_eq!(buffer.get(2, 0), Some(3));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside 4x4 buffer")]
    fn test_put_pixel_past_row_end_panics() {
        let mut buffer = IndexedBuffer::new(4, 4);
        buffer.put_pixel(4, 0, 1);
    }

    #[test]
    fn test_draw_stars_skips_invisible() {
        let mut buffer = IndexedBuffer::new(32, 32);
        let stars = [star_at(3, 3, 4, true), star_at(20, 20, 4, false)];
        draw_stars(&mut buffer, &stars, 3);
        assert_eq!(buffer.get(5, 5), Some(4));
        assert_eq!(buffer.get(22, 22), Some(0));
    }

    #[test]
    fn test_clear_and_get_bounds() {
        let mut buffer = IndexedBuffer::new(8, 4);
        buffer.clear(9);
        assert!(buffer.pixels().iter().all(|&p| p == 9));
        assert_eq!(buffer.get(8, 0), None);
        assert_eq!(buffer.get(0, 4), None);
    }

    #[test]
    fn test_to_rgba8_resolves_through_palette() {
        let palette = PaletteSpec::default().build().unwrap();
        let mut buffer = IndexedBuffer::new(2, 1);
        buffer.put_pixel(1, 0, 1);
        let rgba = buffer.to_rgba8(&palette);
        assert_eq!(rgba.len(), 8);
        assert_eq!(&rgba[0..4], &Rgb::BLACK.to_rgba8());
        assert_eq!(&rgba[4..8], &palette.get(1).to_rgba8());
    }
}

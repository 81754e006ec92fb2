//! Half-block image painting
//!
//! Each cell shows two vertical pixels: the top pixel as the foreground of
//! `▀` and the bottom pixel as its background.

use image::{DynamicImage, GenericImageView};
use ratatui::{buffer::Buffer, layout::Rect, style::Color};

use crate::layout::PlacedRect;

const UPPER_HALF: &str = "▀";

/// How an image fills its box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Whole image visible, letterboxed
    Contain,
    /// Box filled, edges cropped
    Cover,
}

/// Maps box pixels to source pixels
#[derive(Debug, Clone, Copy)]
struct Projection {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    src_w: u32,
    src_h: u32,
}

impl Projection {
    fn new(src: (u32, u32), dst: (u32, u32), fit: Fit) -> Option<Self> {
        let (src_w, src_h) = src;
        let (dst_w, dst_h) = dst;
        if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
            return None;
        }

        let scale_w = dst_w as f64 / src_w as f64;
        let scale_h = dst_h as f64 / src_h as f64;
        let scale = match fit {
            Fit::Contain => scale_w.min(scale_h),
            Fit::Cover => scale_w.max(scale_h),
        };

        Some(Self {
            scale,
            offset_x: (dst_w as f64 - src_w as f64 * scale) / 2.0,
            offset_y: (dst_h as f64 - src_h as f64 * scale) / 2.0,
            src_w,
            src_h,
        })
    }

    /// Source pixel for box pixel `(x, y)`, `None` in the letterbox
    fn source(&self, x: u32, y: u32) -> Option<(u32, u32)> {
        let sx = (x as f64 + 0.5 - self.offset_x) / self.scale;
        let sy = (y as f64 + 0.5 - self.offset_y) / self.scale;
        if sx < 0.0 || sy < 0.0 {
            return None;
        }
        let (sx, sy) = (sx as u32, sy as u32);
        (sx < self.src_w && sy < self.src_h).then_some((sx, sy))
    }
}

fn pixel_color(image: &DynamicImage, at: Option<(u32, u32)>, dim: bool) -> Option<Color> {
    let (x, y) = at?;
    let [r, g, b, _] = image.get_pixel(x, y).0;
    Some(if dim {
        Color::Rgb(r / 2, g / 2, b / 2)
    } else {
        Color::Rgb(r, g, b)
    })
}

/// Paint `image` into `target`, touching only cells inside `clip`.
/// Letterbox cells keep `background`.
pub fn paint(
    buf: &mut Buffer,
    target: PlacedRect,
    clip: Rect,
    image: &DynamicImage,
    fit: Fit,
    dim: bool,
    background: Color,
) {
    let Some(visible) = target.clip(clip) else {
        return;
    };
    let box_px = (target.width as u32, target.height as u32 * 2);
    let Some(projection) = Projection::new(image.dimensions(), box_px, fit) else {
        return;
    };

    for row in visible.y..visible.bottom() {
        let cy = (row - target.y) as u32;
        for column in visible.x..visible.right() {
            let cx = (column as i32 - target.x) as u32;
            let top = pixel_color(image, projection.source(cx, cy * 2), dim);
            let bottom = pixel_color(image, projection.source(cx, cy * 2 + 1), dim);
            if top.is_none() && bottom.is_none() {
                continue;
            }

            if let Some(cell) = buf.cell_mut((column, row)) {
                cell.set_symbol(UPPER_HALF)
                    .set_fg(top.unwrap_or(background))
                    .set_bg(bottom.unwrap_or(background));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn two_tone() -> DynamicImage {
        // Top half red, bottom half blue
        let image = RgbImage::from_fn(4, 4, |_, y| {
            if y < 2 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        DynamicImage::ImageRgb8(image)
    }

    #[test]
    fn test_contain_letterboxes() {
        // 8x4 cells = 8x8 pixels for a square image: no letterbox
        let p = Projection::new((4, 4), (8, 8), Fit::Contain).unwrap();
        assert_eq!(p.source(0, 0), Some((0, 0)));
        assert_eq!(p.source(7, 7), Some((3, 3)));

        // Wide box: bars on the sides
        let p = Projection::new((4, 4), (16, 8), Fit::Contain).unwrap();
        assert_eq!(p.source(0, 0), None);
        assert_eq!(p.source(4, 0), Some((0, 0)));
        assert_eq!(p.source(15, 0), None);
    }

    #[test]
    fn test_cover_crops() {
        let p = Projection::new((4, 4), (16, 8), Fit::Cover).unwrap();
        assert!(p.source(0, 0).is_some());
        assert!(p.source(15, 7).is_some());
        assert!(Projection::new((0, 4), (16, 8), Fit::Cover).is_none());
    }

    #[test]
    fn test_paint_halves_and_clip() {
        let area = Rect::new(0, 0, 6, 2);
        let mut buf = Buffer::empty(area);
        let target = PlacedRect { x: -2, y: 0, width: 4, height: 2 };
        paint(&mut buf, target, area, &two_tone(), Fit::Cover, false, Color::Black);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), UPPER_HALF);
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(0, 1)].bg, Color::Rgb(0, 0, 255));
        // Columns past the target are untouched
        assert_eq!(buf[(2, 0)].symbol(), " ");
    }

    #[test]
    fn test_dim() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        let target = PlacedRect { x: 0, y: 0, width: 4, height: 2 };
        paint(&mut buf, target, area, &two_tone(), Fit::Cover, true, Color::Black);
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(127, 0, 0));
    }
}

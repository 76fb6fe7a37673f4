use crate::{
    Frame,
    font::{GLYPH_HEIGHT, GLYPH_WIDTH, glyph},
};

// upper bound on text scale, keeps glyph arithmetic within i32
const MAX_SCALE: u32 = 1 << 10;

/// Draw a line using Bresenham's algorithm, clipped to the frame.
///
/// A `thickness` above 1 stamps a filled disc at every step.
pub fn draw_line(frame: &mut Frame, from: (i32, i32), to: (i32, i32), thickness: u32, color: [u8; 3]) {
    let width = frame.width() as i64;
    let height = frame.height() as i64;
    if width == 0 || height == 0 {
        return;
    }
    let radius = (thickness / 2) as i64;

    // clip against the frame grown by the pen radius
    let bounds = Bounds {
        min_x: -radius,
        min_y: -radius,
        max_x: width - 1 + radius,
        max_y: height - 1 + radius,
    };
    let Some(((mut x0, mut y0), (x1, y1))) =
        bounds.clip((from.0 as i64, from.1 as i64), (to.0 as i64, to.1 as i64))
    else {
        return;
    };

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        if radius == 0 {
            frame.set_pixel(x0 as i32, y0 as i32, color);
        } else {
            draw_filled_circle(frame, (x0 as i32, y0 as i32), radius as i32, color);
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draw a filled circle, clipped to the frame.
pub fn draw_filled_circle(frame: &mut Frame, center: (i32, i32), radius: i32, color: [u8; 3]) {
    let (cx, cy) = (center.0 as i64, center.1 as i64);
    let radius = radius.max(0) as i64;
    let r2 = radius * radius;
    // only rows and columns that land inside the frame
    let y_range = (cy - radius).max(0)..=(cy + radius).min(frame.height() as i64 - 1);
    for y in y_range {
        let dy = y - cy;
        for x in (cx - radius).max(0)..=(cx + radius).min(frame.width() as i64 - 1) {
            let dx = x - cx;
            if dx * dx + dy * dy <= r2 {
                frame.set_pixel(x as i32, y as i32, color);
            }
        }
    }
}

/// Pixel height of text rendered at `scale`.
pub fn text_height(scale: u32) -> i32 {
    (GLYPH_HEIGHT as u32 * scale.clamp(1, MAX_SCALE)) as i32
}

/// Pixel width of `text` rendered at `scale`.
pub fn text_width(text: &str, scale: u32) -> i32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0;
    }
    let scale = scale.clamp(1, MAX_SCALE) as i64;
    let width = ((GLYPH_WIDTH as i64 + 1) * n as i64 - 1) * scale;
    width.min(i32::MAX as i64) as i32
}

/// Render `text` with the built-in 5x7 font.
///
/// `origin` is the bottom-left corner of the first glyph. Each font bit
/// becomes a `scale`×`scale` block. Pixels outside the frame are dropped.
pub fn draw_text(frame: &mut Frame, text: &str, origin: (i32, i32), scale: u32, color: [u8; 3]) {
    let scale = scale.clamp(1, MAX_SCALE) as i32;
    let top = origin.1.saturating_sub(text_height(scale as u32) - 1);
    let advance = (GLYPH_WIDTH as i32 + 1) * scale;

    for (i, c) in text.chars().enumerate() {
        let left = origin.0.saturating_add((i as i32).saturating_mul(advance));
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                let x = left.saturating_add(col as i32 * scale);
                let y = top.saturating_add(row as i32 * scale);
                for by in 0..scale {
                    for bx in 0..scale {
                        frame.set_pixel(x.saturating_add(bx), y.saturating_add(by), color);
                    }
                }
            }
        }
    }
}

// Cohen-Sutherland outcodes
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

struct Bounds {
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
}

impl Bounds {
    fn outcode(&self, x: i64, y: i64) -> u8 {
        let mut code = INSIDE;
        if x < self.min_x {
            code |= LEFT;
        } else if x > self.max_x {
            code |= RIGHT;
        }
        if y < self.min_y {
            code |= TOP;
        } else if y > self.max_y {
            code |= BOTTOM;
        }
        code
    }

    fn clip(&self, mut p0: (i64, i64), mut p1: (i64, i64)) -> Option<((i64, i64), (i64, i64))> {
        loop {
            let code0 = self.outcode(p0.0, p0.1);
            let code1 = self.outcode(p1.0, p1.1);
            if code0 | code1 == 0 {
                return Some((p0, p1));
            }
            if code0 & code1 != 0 {
                return None;
            }
            let code = if code0 != 0 { code0 } else { code1 };
            let (x0, y0) = p0;
            let (x1, y1) = p1;
            // products of two i32 spans can exceed i64
            let along = |a0: i64, da: i64, num: i64, den: i64| {
                (a0 as i128 + da as i128 * num as i128 / den as i128) as i64
            };
            let dx = x1 - x0;
            let dy = y1 - y0;
            let point = if code & TOP != 0 {
                (along(x0, dx, self.min_y - y0, dy), self.min_y)
            } else if code & BOTTOM != 0 {
                (along(x0, dx, self.max_y - y0, dy), self.max_y)
            } else if code & LEFT != 0 {
                (self.min_x, along(y0, dy, self.min_x - x0, dx))
            } else {
                (self.max_x, along(y0, dy, self.max_x - x0, dx))
            };
            if code == code0 {
                p0 = point;
            } else {
                p1 = point;
            }
        }
    }
}

//! フレームへの検出枠の描画

use crate::source::Point;
use image::{Rgb, RgbImage};

pub const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const OUTLINE_THICKNESS: u32 = 2;

/// 頂点を順に結んだ閉じた多角形を描く
pub fn draw_closed_polygon(image: &mut RgbImage, points: &[Point], color: Rgb<u8>, thickness: u32) {
    if points.len() < 2 {
        return;
    }
    for (i, &start) in points.iter().enumerate() {
        let end = points[(i + 1) % points.len()];
        draw_line(image, start, end, color, thickness);
    }
}

/// Bresenham法で太さ付きの線分を描く（画像外は切り捨て）
pub fn draw_line(image: &mut RgbImage, start: Point, end: Point, color: Rgb<u8>, thickness: u32) {
    let (mut x, mut y) = (start.x, start.y);
    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let sx = if start.x < end.x { 1 } else { -1 };
    let sy = if start.y < end.y { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        stamp(image, x, y, color, thickness);
        if x == end.x && y == end.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn stamp(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, thickness: u32) {
    let thickness = thickness.max(1) as i32;
    let half = thickness / 2;
    for oy in 0..thickness {
        for ox in 0..thickness {
            let (px, py) = (x + ox - half, y + oy - half);
            if px >= 0 && py >= 0 && (px as u32) < image.width() && (py as u32) < image.height() {
                image.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

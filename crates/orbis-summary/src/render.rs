//! Draw a [`Summary`] onto an 800×600 canvas and encode it as PNG.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use orbis_core::summary::Summary;

use crate::{
  Result,
  font::{self, ADVANCE, GLYPH_HEIGHT},
  format::format_gdp,
};

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

const BACKGROUND: Rgb<u8> = Rgb([0xf5, 0xf5, 0xf5]);
const BORDER: Rgb<u8> = Rgb([0x33, 0x33, 0x33]);
const TITLE: Rgb<u8> = Rgb([0x2c, 0x3e, 0x50]);
const ACCENT: Rgb<u8> = Rgb([0x34, 0x98, 0xdb]);
const MUTED: Rgb<u8> = Rgb([0x7f, 0x8c, 0x8d]);
const WHITE: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);

/// Bar colours by rank, first place first.
const BAR_COLORS: [Rgb<u8>; 5] = [
  Rgb([0xe7, 0x4c, 0x3c]),
  Rgb([0xe6, 0x7e, 0x22]),
  Rgb([0xf3, 0x9c, 0x12]),
  Rgb([0x34, 0x98, 0xdb]),
  Rgb([0x2e, 0xcc, 0x71]),
];
const BAR_FALLBACK: Rgb<u8> = Rgb([0x95, 0xa5, 0xa6]);

const MARGIN: u32 = 40;
const BAR_WIDTH: u32 = 700;
const BAR_HEIGHT: u32 = 35;
const BAR_PITCH: u32 = 50;

/// Render `summary` to PNG bytes.
pub fn render(summary: &Summary) -> Result<Vec<u8>> {
  let mut canvas = Canvas::new();

  canvas.stroke_rect(10, 10, WIDTH - 20, HEIGHT - 20, 3, BORDER);
  canvas.text_centered("Countries Summary", 36, 5, TITLE);
  canvas.text(
    &format!("Total Countries: {}", summary.total_countries),
    MARGIN,
    100,
    3,
    ACCENT,
  );
  canvas.text("Top 5 Countries by Estimated GDP", MARGIN, 160, 3, TITLE);

  let mut y = 205;
  for (rank, entry) in summary.top_by_gdp.iter().enumerate() {
    let color = BAR_COLORS.get(rank).copied().unwrap_or(BAR_FALLBACK);
    canvas.fill_rect(MARGIN, y, BAR_WIDTH, BAR_HEIGHT, color);

    let text_y = y + (BAR_HEIGHT - GLYPH_HEIGHT * 2) / 2;
    let amount = format_gdp(entry.estimated_gdp);
    let amount_x = (MARGIN + BAR_WIDTH - 20).saturating_sub(font::text_width(&amount, 2));
    let name_room = amount_x.saturating_sub(MARGIN + 60);

    canvas.text(&format!("{}.", rank + 1), MARGIN + 10, text_y, 2, WHITE);
    canvas.text(&truncate(&entry.name, name_room), MARGIN + 50, text_y, 2, WHITE);
    canvas.text(&amount, amount_x, text_y, 2, WHITE);

    y += BAR_PITCH;
  }

  let footer = format!(
    "Last Refreshed: {}",
    summary.last_refreshed_at.format("%Y-%m-%d %H:%M:%S UTC")
  );
  canvas.text_centered(&footer, HEIGHT - 55, 2, MUTED);

  canvas.encode_png()
}

/// Shorten `name` so it fits in `max_px` at scale 2.
fn truncate(name: &str, max_px: u32) -> String {
  let max_chars = ((max_px / 2 + 1) / ADVANCE) as usize;
  if name.chars().count() <= max_chars {
    return name.to_owned();
  }
  let mut out: String = name.chars().take(max_chars.saturating_sub(2)).collect();
  out.push_str("..");
  out
}

// ─── Canvas ──────────────────────────────────────────────────────────────────

struct Canvas {
  img: RgbImage,
}

impl Canvas {
  fn new() -> Self { Self { img: RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND) } }

  /// Fill a rectangle, clipped to the canvas.
  fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    for py in y..(y + h).min(HEIGHT) {
      for px in x..(x + w).min(WIDTH) {
        self.img.put_pixel(px, py, color);
      }
    }
  }

  fn stroke_rect(&mut self, x: u32, y: u32, w: u32, h: u32, thickness: u32, color: Rgb<u8>) {
    self.fill_rect(x, y, w, thickness, color);
    self.fill_rect(x, y + h - thickness, w, thickness, color);
    self.fill_rect(x, y, thickness, h, color);
    self.fill_rect(x + w - thickness, y, thickness, h, color);
  }

  /// Draw `text` with its top-left corner at (`x`, `y`).
  fn text(&mut self, text: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let mut cursor = x;
    for c in text.chars() {
      let rows = font::glyph(c);
      for (row, bits) in rows.iter().enumerate() {
        for col in 0..font::GLYPH_WIDTH {
          if bits & (0x10 >> col) != 0 {
            self.fill_rect(
              cursor + col * scale,
              y + row as u32 * scale,
              scale,
              scale,
              color,
            );
          }
        }
      }
      cursor += ADVANCE * scale;
    }
  }

  fn text_centered(&mut self, text: &str, y: u32, scale: u32, color: Rgb<u8>) {
    let x = WIDTH.saturating_sub(font::text_width(text, scale)) / 2;
    self.text(text, x, y, scale, color);
  }

  fn encode_png(self) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    self.img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use orbis_core::summary::GdpRank;

  use super::*;

  fn summary(n: usize) -> Summary {
    Summary {
      total_countries:   n as u64,
      top_by_gdp:        (0..n)
        .map(|i| GdpRank {
          name:          format!("Country {i}"),
          estimated_gdp: 1e12 / (i as f64 + 1.0),
        })
        .collect(),
      last_refreshed_at: Utc::now(),
    }
  }

  #[test]
  fn renders_decodable_png() {
    let bytes = render(&summary(5)).unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (WIDTH, HEIGHT));
  }

  #[test]
  fn first_bar_uses_rank_colour() {
    let bytes = render(&summary(1)).unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
    // Just inside the bar's left edge, left of the rank label.
    assert_eq!(*img.get_pixel(MARGIN + 2, 207), BAR_COLORS[0]);
  }

  #[test]
  fn empty_ranking_still_renders() {
    assert!(render(&summary(0)).is_ok());
  }

  #[test]
  fn long_names_are_truncated() {
    let long = "The Exceedingly Long Official Name Of Some Federated Republic";
    let short = truncate(long, 400);
    assert!(short.ends_with(".."));
    assert!(font::text_width(&short, 2) <= 400);
  }
}

//! Character-cell drawing surface for terminal output.

use std::io::Write;

use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use sw3d_core::math::Vector2;
use sw3d_core::surface::{rasterize_line, rasterize_polygon, DrawSurface};
use sw3d_core::Color;

/// Character luminosity ramp for shading (darkest to lightest).
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    color: Color::BLACK,
};

/// A `DrawSurface` that rasterizes into characters, one cell per pixel.
///
/// Glyphs are picked from the luminosity ramp by the pen's perceptual
/// brightness, so solid-mode shading reads as density and wireframe pens
/// stay crisp.
pub struct CharSurface {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl CharSurface {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell(&self, x: u32, y: u32) -> Cell {
        self.cells[(y * self.width + x) as usize]
    }

    fn put(&mut self, x: i64, y: i64, cell: Cell) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            self.cells[(y as u32 * self.width + x as u32) as usize] = cell;
        }
    }

    fn glyph_for(color: Color) -> char {
        let step = color.luminance() as usize * (LUMINOSITY_RAMP.len() - 1) / 255;
        LUMINOSITY_RAMP[step]
    }

    /// Queue the frame to a terminal writer; the caller flushes.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let cell = self.cell(x, y);
                writer.queue(SetForegroundColor(TermColor::Rgb {
                    r: cell.color.r,
                    g: cell.color.g,
                    b: cell.color.b,
                }))?;
                writer.queue(Print(cell.glyph))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl DrawSurface for CharSurface {
    type Image = Self;

    fn create(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; (width * height) as usize],
        }
    }

    fn clear(&mut self, color: Color) {
        let blank = Cell { glyph: ' ', color };
        self.cells.fill(blank);
    }

    fn draw_line(&mut self, color: Color, from: Vector2, to: Vector2) {
        let cell = Cell {
            glyph: Self::glyph_for(color),
            color,
        };
        rasterize_line(from, to, |x, y| self.put(x, y, cell));
    }

    fn fill_polygon(&mut self, color: Color, points: &[Vector2]) {
        let cell = Cell {
            glyph: Self::glyph_for(color),
            color,
        };
        let (width, height) = (self.width, self.height);
        rasterize_polygon(points, width, height, |y, x0, x1| {
            for x in x0..=x1 {
                self.put(x, y, cell);
            }
        });
    }

    fn image(&self) -> &Self {
        self
    }
}

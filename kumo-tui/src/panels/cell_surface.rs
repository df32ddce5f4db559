//! Terminal-cell host for the cloud renderer.
//!
//! `CellMapper` maps slots and prices to fractional cell coordinates;
//! `CellSurface` rasterizes each filled path by even-odd scanline at cell
//! centers and paints the cell background.

use ratatui::{buffer::Buffer, layout::Rect};

use kumo_core::cloud::{CoordinateMapper, DrawingSurface, Pixel, Rgba};

use crate::theme::Theme;

/// Slot/price to cell mapping over a plot rectangle.
///
/// x grows one `zoom` per slot from `plot.x`; y is 0 at `upper` and
/// `plot.height` at `lower`.
#[derive(Debug, Clone, Copy)]
pub struct CellMapper {
    pub plot: Rect,
    pub from: usize,
    pub zoom: u16,
    pub lower: f64,
    pub upper: f64,
}

impl CellMapper {
    /// Integer column of a slot center, if it falls inside the plot.
    pub fn column(&self, index: usize) -> Option<u16> {
        let x = self.index_to_x(index).floor();
        let right = (self.plot.x + self.plot.width) as f64;
        (x >= self.plot.x as f64 && x < right).then_some(x as u16)
    }

    /// Integer row of a price, clamped into the plot.
    pub fn row(&self, price: f64) -> u16 {
        let y = self.price_to_y(price).floor();
        let max = (self.plot.y + self.plot.height.saturating_sub(1)) as f64;
        y.clamp(self.plot.y as f64, max) as u16
    }
}

impl CoordinateMapper for CellMapper {
    fn index_to_x(&self, index: usize) -> f64 {
        let zoom = self.zoom.max(1) as f64;
        self.plot.x as f64 + (index as f64 - self.from as f64) * zoom + zoom / 2.0
    }

    fn price_to_y(&self, price: f64) -> f64 {
        let span = self.upper - self.lower;
        if span.abs() < 1e-12 {
            return self.plot.y as f64 + self.plot.height as f64 / 2.0;
        }
        self.plot.y as f64 + (self.upper - price) / span * self.plot.height as f64
    }
}

/// Drawing surface that fills ratatui buffer cells.
pub struct CellSurface<'a> {
    buf: &'a mut Buffer,
    clip: Rect,
    theme: &'a Theme,
    path: Vec<Pixel>,
    cells_filled: usize,
}

impl<'a> CellSurface<'a> {
    pub fn new(buf: &'a mut Buffer, clip: Rect, theme: &'a Theme) -> Self {
        Self {
            buf,
            clip,
            theme,
            path: Vec::new(),
            cells_filled: 0,
        }
    }

    pub fn cells_filled(&self) -> usize {
        self.cells_filled
    }

    /// Column spans `[x0, x1]` where the polygon covers row center `yc`.
    fn crossings(&self, yc: f64) -> Vec<f64> {
        let n = self.path.len();
        let mut xs = Vec::new();
        for i in 0..n {
            let p = self.path[i];
            let q = self.path[(i + 1) % n];
            if (p.y <= yc && yc < q.y) || (q.y <= yc && yc < p.y) {
                xs.push(p.x + (yc - p.y) * (q.x - p.x) / (q.y - p.y));
            }
        }
        xs.sort_by(|a, b| a.total_cmp(b));
        xs
    }
}

impl DrawingSurface for CellSurface<'_> {
    fn move_to(&mut self, point: Pixel) {
        self.path.clear();
        self.path.push(point);
    }

    fn line_to(&mut self, point: Pixel) {
        self.path.push(point);
    }

    fn close_path(&mut self) {}

    fn fill(&mut self, color: Rgba) {
        if self.path.len() < 3 {
            self.path.clear();
            return;
        }
        let bg = self.theme.blend(color);
        for row in self.clip.y..self.clip.y + self.clip.height {
            let xs = self.crossings(row as f64 + 0.5);
            for pair in xs.chunks_exact(2) {
                for col in self.clip.x..self.clip.x + self.clip.width {
                    let xc = col as f64 + 0.5;
                    if xc < pair[0] || xc > pair[1] {
                        continue;
                    }
                    if let Some(cell) = self.buf.cell_mut((col, row)) {
                        cell.set_bg(bg);
                        self.cells_filled += 1;
                    }
                }
            }
        }
        self.path.clear();
    }
}

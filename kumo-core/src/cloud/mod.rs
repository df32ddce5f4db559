//! Cloud renderer - fills the region between Senkou Span A and Span B.
//!
//! The visible range is scanned left to right. Indices where both spans are
//! present feed a `CloudSegmenter`; each maximal same-sign run becomes one
//! closed polygon. A data gap adds no point and does not close the current
//! run; only a sign change does. At a sign change the new run starts from the
//! last pixel pair of the old one, so adjacent fills share a boundary.
//! A run closed by a sign change is drawn even when it has a single point;
//! the run still open at the end of the range needs two.
//!
//! Drawing goes through two host capabilities: `CoordinateMapper` (index and
//! price to pixels) and `DrawingSurface` (path construction and fill). The
//! renderer never draws the five raw lines and always reports that the host
//! should still draw them.

pub mod mapper;
pub mod recorder;
pub mod segmenter;

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::domain::IndicatorPoint;

pub use mapper::LinearMapper;
pub use recorder::{PathCommand, PathRecorder, RecordedPolygon};
pub use segmenter::{CloudSegment, CloudSegmenter};

/// A point in host pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pixel {
    pub x: f64,
    pub y: f64,
}

impl Pixel {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Fill color with straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Composite this color over an opaque background.
    pub fn over(&self, background: (u8, u8, u8)) -> (u8, u8, u8) {
        let alpha = self.a.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| -> u8 {
            (fg as f32 * alpha + bg as f32 * (1.0 - alpha)).round() as u8
        };
        (
            mix(self.r, background.0),
            mix(self.g, background.1),
            mix(self.b, background.2),
        )
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// The two cloud fills. No gradient, no neutral color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudStyle {
    pub bullish: Rgba,
    pub bearish: Rgba,
}

impl Default for CloudStyle {
    fn default() -> Self {
        Self {
            bullish: Rgba::new(38, 166, 154, 0.25),
            bearish: Rgba::new(239, 83, 80, 0.25),
        }
    }
}

impl CloudStyle {
    pub fn color(&self, bullish: bool) -> Rgba {
        if bullish {
            self.bullish
        } else {
            self.bearish
        }
    }
}

/// Converts chart positions to pixels. Supplied by the host.
pub trait CoordinateMapper {
    /// Horizontal pixel for an output index (may lie past the last bar).
    fn index_to_x(&self, index: usize) -> f64;

    /// Vertical pixel for a price.
    fn price_to_y(&self, price: f64) -> f64;
}

/// Path construction and fill. Supplied by the host.
///
/// `move_to` starts a new path; `fill` fills the current closed path.
pub trait DrawingSurface {
    fn move_to(&mut self, point: Pixel);
    fn line_to(&mut self, point: Pixel);
    fn close_path(&mut self);
    fn fill(&mut self, color: Rgba);
}

/// What the renderer tells the host after drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Always true: the host still draws tenkan/kijun/chikou/span lines.
    pub draw_default_lines: bool,
    /// Number of polygons filled.
    pub segments_drawn: usize,
}

/// How a segment left the segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flush {
    SignChange,
    EndOfScan,
}

impl Flush {
    fn draws(self, segment: &CloudSegment) -> bool {
        match self {
            Flush::SignChange => true,
            Flush::EndOfScan => segment.is_renderable(),
        }
    }
}

/// Scan `range` and hand every segment that should be drawn to `sink`.
fn scan<M, F>(points: &[IndicatorPoint], range: Range<usize>, mapper: &M, mut sink: F)
where
    M: CoordinateMapper + ?Sized,
    F: FnMut(CloudSegment),
{
    let mut emit = |segment: CloudSegment, flush: Flush| {
        if flush.draws(&segment) {
            sink(segment);
        }
    };
    let mut segmenter = CloudSegmenter::new();
    for index in range {
        // Out-of-array indices are absent, same as a gap.
        let Some((a, b)) = points.get(index).and_then(IndicatorPoint::spans) else {
            continue;
        };
        let x = mapper.index_to_x(index);
        let edge_a = Pixel::new(x, mapper.price_to_y(a));
        let edge_b = Pixel::new(x, mapper.price_to_y(b));
        if let Some(closed) = segmenter.push(a >= b, edge_a, edge_b) {
            emit(closed, Flush::SignChange);
        }
    }
    if let Some(last) = segmenter.finish() {
        emit(last, Flush::EndOfScan);
    }
}

/// Segment the cloud over `range` without drawing.
///
/// Returns exactly the segments `render_cloud` would fill, in order. Only
/// the first one can have a single point per edge, and only when a sign
/// change closed it.
pub fn segment_cloud<M>(
    points: &[IndicatorPoint],
    range: Range<usize>,
    mapper: &M,
) -> Vec<CloudSegment>
where
    M: CoordinateMapper + ?Sized,
{
    let mut segments = Vec::new();
    scan(points, range, mapper, |segment| segments.push(segment));
    segments
}

/// Fill the cloud over the half-open index `range` onto `surface`.
pub fn render_cloud<M, S>(
    points: &[IndicatorPoint],
    range: Range<usize>,
    mapper: &M,
    surface: &mut S,
    style: &CloudStyle,
) -> RenderOutcome
where
    M: CoordinateMapper + ?Sized,
    S: DrawingSurface + ?Sized,
{
    let visible = range.clone();
    let mut segments_drawn = 0;
    scan(points, range, mapper, |segment| {
        segment.draw(&mut *surface, style);
        segments_drawn += 1;
    });
    tracing::debug!(
        from = visible.start,
        to = visible.end,
        segments = segments_drawn,
        "rendered cloud"
    );
    RenderOutcome {
        draw_default_lines: true,
        segments_drawn,
    }
}

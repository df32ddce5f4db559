//! Same-sign segmentation of the cloud edges.
//!
//! State machine:
//! - `Idle` + present pair            -> `Open` with one point
//! - `Open` + pair of the same sign   -> extend both edges
//! - `Open` + pair of the other sign  -> flush; reopen seeded with the flushed
//!   segment's last pair, then append the new pair
//! - end of scan                      -> flush whatever is open
//!
//! A segment flushed by a sign change is always drawn, even with a single
//! point per edge. The end-of-scan flush is drawn only when renderable.
//!
//! Gaps never reach the segmenter, so they never close a segment.

use super::{CloudStyle, DrawingSurface, Pixel};

/// One maximal same-sign run of the cloud, in pixel space.
///
/// `span_a` and `span_b` are parallel: entry `k` of each comes from the same
/// output index.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudSegment {
    pub bullish: bool,
    pub span_a: Vec<Pixel>,
    pub span_b: Vec<Pixel>,
}

impl CloudSegment {
    fn open(bullish: bool, a: Pixel, b: Pixel) -> Self {
        Self {
            bullish,
            span_a: vec![a],
            span_b: vec![b],
        }
    }

    /// Start the next run from this run's closing pair.
    fn seeded_successor(&self, bullish: bool) -> Self {
        Self {
            bullish,
            span_a: self.span_a.last().copied().into_iter().collect(),
            span_b: self.span_b.last().copied().into_iter().collect(),
        }
    }

    fn extend(&mut self, a: Pixel, b: Pixel) {
        self.span_a.push(a);
        self.span_b.push(b);
    }

    /// A filled area needs at least two points on each edge.
    pub fn is_renderable(&self) -> bool {
        self.span_a.len() >= 2 && self.span_b.len() >= 2
    }

    /// Closed outline: Span A forward, then Span B backward.
    pub fn outline(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.span_a
            .iter()
            .chain(self.span_b.iter().rev())
            .copied()
    }

    /// Draw and fill this segment whatever its length. A one-point run
    /// becomes a zero-area path between its two edge pixels.
    pub fn draw<S>(&self, surface: &mut S, style: &CloudStyle)
    where
        S: DrawingSurface + ?Sized,
    {
        let mut outline = self.outline();
        let Some(first) = outline.next() else {
            return;
        };
        surface.move_to(first);
        for point in outline {
            surface.line_to(point);
        }
        surface.close_path();
        surface.fill(style.color(self.bullish));
    }
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Open(CloudSegment),
}

/// Accumulates present span pairs into same-sign segments.
#[derive(Debug, Default)]
pub struct CloudSegmenter {
    state: State,
}

impl CloudSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one present pair. Returns the segment closed by a sign change.
    pub fn push(&mut self, bullish: bool, a: Pixel, b: Pixel) -> Option<CloudSegment> {
        let (next, flushed) = match std::mem::take(&mut self.state) {
            State::Idle => (State::Open(CloudSegment::open(bullish, a, b)), None),
            State::Open(mut segment) if segment.bullish == bullish => {
                segment.extend(a, b);
                (State::Open(segment), None)
            }
            State::Open(segment) => {
                let mut successor = segment.seeded_successor(bullish);
                successor.extend(a, b);
                (State::Open(successor), Some(segment))
            }
        };
        self.state = next;
        flushed
    }

    /// End of scan: hand back the open segment, if any.
    pub fn finish(self) -> Option<CloudSegment> {
        match self.state {
            State::Idle => None,
            State::Open(segment) => Some(segment),
        }
    }
}

//! Threshold edge detection on raw ADC samples.

/// Direction of a threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// The signal went from at-or-below the threshold to above it.
    Rising,
    /// The signal went from above the threshold to at-or-below it.
    Falling,
}

/// Reports crossings of a fixed threshold.
///
/// The first sample only establishes the level; edges are reported from
/// the second sample on.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    threshold: u16,
    high: Option<bool>,
}

impl EdgeDetector {
    /// Default threshold for a 12-bit ADC.
    pub const DEFAULT_THRESHOLD: u16 = 3500;

    /// Creates a detector for `threshold`.
    #[must_use]
    pub const fn new(threshold: u16) -> Self {
        Self {
            threshold,
            high: None,
        }
    }

    /// Feeds one sample, returning the edge it completes, if any.
    pub fn feed(&mut self, sample: u16) -> Option<Edge> {
        let high = sample > self.threshold;
        match (self.high.replace(high), high) {
            (Some(false), true) => Some(Edge::Rising),
            (Some(true), false) => Some(Edge::Falling),
            _ => None,
        }
    }

    /// Forgets the current level.
    pub fn reset(&mut self) {
        self.high = None;
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

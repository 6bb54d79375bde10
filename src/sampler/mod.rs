//! Sampling producer: the streaming source behind `start_stream`.
//!
//! A [`SamplingProducer`] reads 12-bit samples from a [`SignalSource`] in
//! fixed-size blocks, broadcasts each block as a little-endian `u16` binary
//! frame, and publishes the running count of rising threshold crossings
//! into the `edge_count` variable.

pub mod edge;
pub mod producer;
pub mod source;

use std::time::Duration;

pub use edge::{Edge, EdgeDetector};
pub use producer::{EDGE_COUNT_VARIABLE, SamplingProducer};
pub use source::{SignalSource, SyntheticSource};

/// Timing and detection settings of the sampling producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Delay between two blocks.
    pub interval: Duration,
    /// Samples per block.
    pub block_size: usize,
    /// Edge detection threshold.
    pub threshold: u16,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(50),
            block_size: 64,
            threshold: EdgeDetector::DEFAULT_THRESHOLD,
        }
    }
}

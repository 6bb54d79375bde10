//! Tokio-driven producer bound to the stream controller.

use bytes::{BufMut, BytesMut};
use tokio::task::JoinHandle;

use super::SamplerConfig;
use super::edge::{Edge, EdgeDetector};
use super::source::SignalSource;
use crate::domain::{Producer, VarValue};
use crate::service::CoreHandle;

/// Variable receiving the rising-edge count.
pub const EDGE_COUNT_VARIABLE: &str = "edge_count";

/// Streams sample blocks to all clients while the stream is active.
///
/// Each start spawns a fresh sampling task from a clone of the source and
/// resets the edge count to zero; stop aborts the task. The producer holds
/// a [`CoreHandle`], so a core with a bound producer runs until the
/// process exits.
#[derive(Debug)]
pub struct SamplingProducer<S> {
    core: CoreHandle,
    source: S,
    config: SamplerConfig,
    task: Option<JoinHandle<()>>,
}

impl<S> SamplingProducer<S>
where
    S: SignalSource + Clone + 'static,
{
    /// Creates an idle producer.
    #[must_use]
    pub fn new(core: CoreHandle, source: S, config: SamplerConfig) -> Self {
        Self {
            core,
            source,
            config,
            task: None,
        }
    }

    /// Returns `true` while a sampling task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<S> Producer for SamplingProducer<S>
where
    S: SignalSource + Clone + 'static,
{
    fn start(&mut self) {
        self.abort();
        let task = tokio::spawn(sample_loop(
            self.source.clone(),
            self.core.clone(),
            self.config,
        ));
        self.task = Some(task);
        tracing::info!(
            interval = ?self.config.interval,
            block_size = self.config.block_size,
            "sampling started"
        );
    }

    fn stop(&mut self) {
        self.abort();
        tracing::info!("sampling stopped");
    }
}

impl<S> Drop for SamplingProducer<S> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn sample_loop<S: SignalSource>(mut source: S, core: CoreHandle, config: SamplerConfig) {
    let mut ticker = tokio::time::interval(config.interval);
    let mut detector = EdgeDetector::new(config.threshold);
    let mut block = BytesMut::with_capacity(config.block_size * 2);
    let mut edges: i64 = 0;

    if core.publish(EDGE_COUNT_VARIABLE, VarValue::Int(0)).await.is_err() {
        return;
    }

    loop {
        ticker.tick().await;

        let mut rising = 0;
        for _ in 0..config.block_size {
            let sample = source.read();
            if detector.feed(sample) == Some(Edge::Rising) {
                rising += 1;
            }
            block.put_u16_le(sample);
        }

        if core.broadcast_raw(block.split().freeze()).await.is_err() {
            break;
        }
        if rising > 0 {
            edges += rising;
            if core.publish(EDGE_COUNT_VARIABLE, VarValue::Int(edges)).await.is_err() {
                break;
            }
        }
        block.reserve(config.block_size * 2);
    }
    tracing::debug!("sampling task exited, core gone");
}

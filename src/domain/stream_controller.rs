//! Streaming mode state machine.
//!
//! ```text
//!            request_start (start hook bound)
//!   Idle ─────────────────────────────────────▶ Streaming
//!    ▲                                              │
//!    └──────────────────────────────────────────────┘
//!      request_stop (stop hook bound)
//!      notify_last_client_disconnected (stop hook bound)
//! ```
//!
//! The hooks run synchronously on the caller's task, so a slow hook stalls
//! protocol processing for as long as it runs.

use std::fmt;

/// Data producer toggled by the stream controller.
///
/// Implementors that only support one direction override
/// [`Producer::can_start`] or [`Producer::can_stop`].
pub trait Producer: Send {
    /// Begins producing data.
    fn start(&mut self);

    /// Stops producing data.
    fn stop(&mut self);

    /// Whether [`Producer::start`] is available.
    fn can_start(&self) -> bool {
        true
    }

    /// Whether [`Producer::stop`] is available.
    fn can_stop(&self) -> bool {
        true
    }
}

/// Boxed stream hook.
pub type StreamHook = Box<dyn FnMut() + Send>;

/// [`Producer`] built from a pair of optional closures.
struct HookProducer {
    on_start: Option<StreamHook>,
    on_stop: Option<StreamHook>,
}

impl Producer for HookProducer {
    fn start(&mut self) {
        if let Some(hook) = self.on_start.as_mut() {
            hook();
        }
    }

    fn stop(&mut self) {
        if let Some(hook) = self.on_stop.as_mut() {
            hook();
        }
    }

    fn can_start(&self) -> bool {
        self.on_start.is_some()
    }

    fn can_stop(&self) -> bool {
        self.on_stop.is_some()
    }
}

/// Current streaming state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    /// No data is being produced.
    #[default]
    Idle,
    /// The producer is running.
    Streaming,
}

/// Result of [`StreamController::request_start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The producer was started.
    Started,
    /// The stream was already running; nothing happened.
    AlreadyActive,
    /// No start hook is bound.
    Unsupported,
}

/// Result of [`StreamController::request_stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The producer was stopped.
    Stopped,
    /// The stream was already idle; nothing happened.
    AlreadyInactive,
    /// No stop hook is bound.
    Unsupported,
}

/// Two-state machine gating the bound [`Producer`].
#[derive(Default)]
pub struct StreamController {
    state: StreamState,
    producer: Option<Box<dyn Producer>>,
}

impl fmt::Debug for StreamController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamController")
            .field("state", &self.state)
            .field("can_start", &self.can_start())
            .field("can_stop", &self.can_stop())
            .finish()
    }
}

impl StreamController {
    /// Creates an idle controller with nothing bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a pair of optional hooks, replacing any previous binding.
    ///
    /// Call once during setup, before traffic begins.
    pub fn register_callbacks(&mut self, on_start: Option<StreamHook>, on_stop: Option<StreamHook>) {
        self.producer = Some(Box::new(HookProducer { on_start, on_stop }));
        tracing::info!("stream control callbacks registered");
    }

    /// Binds `producer`, replacing any previous binding.
    pub fn register_producer<P: Producer + 'static>(&mut self, producer: P) {
        self.producer = Some(Box::new(producer));
        tracing::info!("stream producer registered");
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// Returns `true` while streaming.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.state == StreamState::Streaming
    }

    fn can_start(&self) -> bool {
        self.producer.as_ref().is_some_and(|p| p.can_start())
    }

    fn can_stop(&self) -> bool {
        self.producer.as_ref().is_some_and(|p| p.can_stop())
    }

    /// Starts the producer unless it is already running.
    pub fn request_start(&mut self) -> StartOutcome {
        let Some(producer) = self.producer.as_mut().filter(|p| p.can_start()) else {
            return StartOutcome::Unsupported;
        };
        if self.state == StreamState::Streaming {
            return StartOutcome::AlreadyActive;
        }
        producer.start();
        self.state = StreamState::Streaming;
        tracing::info!("stream started");
        StartOutcome::Started
    }

    /// Stops the producer unless it is already idle.
    pub fn request_stop(&mut self) -> StopOutcome {
        let Some(producer) = self.producer.as_mut().filter(|p| p.can_stop()) else {
            return StopOutcome::Unsupported;
        };
        if self.state == StreamState::Idle {
            return StopOutcome::AlreadyInactive;
        }
        producer.stop();
        self.state = StreamState::Idle;
        tracing::info!("stream stopped");
        StopOutcome::Stopped
    }

    /// Auto-stop hook for when the last client disconnects.
    ///
    /// Stops the producer if streaming and a stop hook is bound. Returns
    /// `true` if a transition happened.
    pub fn notify_last_client_disconnected(&mut self) -> bool {
        if self.state != StreamState::Streaming || !self.can_stop() {
            return false;
        }
        tracing::info!("last client disconnected, auto-stopping stream");
        self.request_stop() == StopOutcome::Stopped
    }
}

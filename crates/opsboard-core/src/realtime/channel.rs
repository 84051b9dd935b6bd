//! Channel subscriptions and the reconnect watchdog.
//!
//! The pub/sub service itself is an external managed transport; this core
//! only talks to it through [`ChannelTransport`]. A worker thread owns the
//! transport, forwards every broadcast frame to the main task over a
//! channel, and re-joins any topic the transport reports as not joined on a
//! fixed polling interval; reconnection is time-driven, not event-driven,
//! and joining an already-joined topic is never attempted.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use futures::FutureExt;
use serde_json::Value;

use super::event::ChannelKind;
use super::stats::SharedRealtimeStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Joining,
    Joined,
    Errored,
}

/// A broadcast frame as received from the transport, still untyped.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub topic: String,
    pub frame: Value,
}

/// Seam to the managed pub/sub service.
///
/// `next_message` futures must be cancel-safe: the worker polls them with
/// `now_or_never` and drops pending ones without losing messages.
pub trait ChannelTransport {
    fn join(&mut self, topic: &str) -> impl std::future::Future<Output = anyhow::Result<()>>;
    fn leave(&mut self, topic: &str) -> impl std::future::Future<Output = anyhow::Result<()>>;
    fn state(&self, topic: &str) -> ChannelState;
    fn next_message(&mut self) -> impl std::future::Future<Output = Option<InboundMessage>>;
}

pub enum RealtimeCommand {
    Subscribe { kind: ChannelKind, topic: String },
    UnsubscribeAll,
    Shutdown,
}

/// Main-task end of the realtime worker.
pub struct RealtimeHandle {
    command_tx: Sender<RealtimeCommand>,
    frame_rx: Receiver<(ChannelKind, Value)>,
}

impl RealtimeHandle {
    pub fn subscribe(&self, kind: ChannelKind, topic: impl Into<String>) {
        let _ = self.command_tx.send(RealtimeCommand::Subscribe {
            kind,
            topic: topic.into(),
        });
    }

    pub fn unsubscribe_all(&self) {
        let _ = self.command_tx.send(RealtimeCommand::UnsubscribeAll);
    }

    pub fn shutdown(&self) {
        let _ = self.command_tx.send(RealtimeCommand::Shutdown);
    }

    /// All frames received since the last call, in delivery order.
    pub fn drain_frames(&self) -> Vec<(ChannelKind, Value)> {
        self.frame_rx.try_iter().collect()
    }
}

pub struct RealtimeWorker<T: ChannelTransport> {
    transport: T,
    watchdog_interval: Duration,
    topics: HashMap<String, ChannelKind>,
    command_rx: Receiver<RealtimeCommand>,
    frame_tx: Sender<(ChannelKind, Value)>,
    stats: SharedRealtimeStats,
}

impl<T: ChannelTransport + Send + 'static> RealtimeWorker<T> {
    /// Start the worker on its own thread with its own runtime.
    pub fn spawn(
        transport: T,
        watchdog_interval: Duration,
        stats: SharedRealtimeStats,
    ) -> (RealtimeHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel();
        let (frame_tx, frame_rx) = mpsc::channel();
        let worker = Self {
            transport,
            watchdog_interval,
            topics: HashMap::new(),
            command_rx,
            frame_tx,
            stats,
        };
        let join = std::thread::spawn(move || worker.run());
        (
            RealtimeHandle {
                command_tx,
                frame_rx,
            },
            join,
        )
    }

    pub fn run(mut self) {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!("realtime worker runtime failed to start: {}", e);
                return;
            }
        };
        rt.block_on(self.run_inner());
    }

    async fn run_inner(&mut self) {
        let poll_interval = Duration::from_millis(50);
        let mut last_watchdog = Instant::now();

        loop {
            loop {
                match self.command_rx.try_recv() {
                    Ok(RealtimeCommand::Subscribe { kind, topic }) => {
                        self.topics.insert(topic.clone(), kind);
                        if let Err(e) = self.transport.join(&topic).await {
                            // The watchdog retries on its next pass.
                            tracing::warn!("join {} failed: {}", topic, e);
                        }
                    }
                    Ok(RealtimeCommand::UnsubscribeAll) => {
                        for topic in self.topics.keys().cloned().collect::<Vec<_>>() {
                            if let Err(e) = self.transport.leave(&topic).await {
                                tracing::debug!("leave {} failed: {}", topic, e);
                            }
                        }
                        self.topics.clear();
                    }
                    Ok(RealtimeCommand::Shutdown) | Err(TryRecvError::Disconnected) => return,
                    Err(TryRecvError::Empty) => break,
                }
            }

            while let Some(Some(msg)) = self.transport.next_message().now_or_never() {
                self.forward(msg);
            }

            if last_watchdog.elapsed() >= self.watchdog_interval {
                self.ensure_joined().await;
                last_watchdog = Instant::now();
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Re-join every subscribed topic the transport reports as not joined.
    /// Topics already joined are left untouched.
    async fn ensure_joined(&mut self) {
        let topics: Vec<String> = self.topics.keys().cloned().collect();
        for topic in topics {
            if self.transport.state(&topic) == ChannelState::Joined {
                continue;
            }
            match self.transport.join(&topic).await {
                Ok(()) => {
                    self.stats.record_reconnect();
                    tracing::info!("rejoined channel {}", topic);
                }
                Err(e) => tracing::warn!("rejoin {} failed: {}", topic, e),
            }
        }
    }

    fn forward(&self, msg: InboundMessage) {
        match self.topics.get(&msg.topic) {
            Some(kind) => {
                if self.frame_tx.send((*kind, msg.frame)).is_err() {
                    tracing::debug!("frame receiver dropped");
                }
            }
            None => tracing::debug!("message for unsubscribed topic {}", msg.topic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct FakeTransport {
        states: Arc<Mutex<HashMap<String, ChannelState>>>,
        join_counts: Arc<Mutex<HashMap<String, u32>>>,
        inbox: Arc<Mutex<VecDeque<InboundMessage>>>,
    }

    impl FakeTransport {
        fn set_state(&self, topic: &str, state: ChannelState) {
            self.states.lock().insert(topic.to_string(), state);
        }

        fn joins(&self, topic: &str) -> u32 {
            self.join_counts.lock().get(topic).copied().unwrap_or(0)
        }

        fn push(&self, topic: &str, frame: Value) {
            self.inbox.lock().push_back(InboundMessage {
                topic: topic.to_string(),
                frame,
            });
        }
    }

    impl ChannelTransport for FakeTransport {
        async fn join(&mut self, topic: &str) -> anyhow::Result<()> {
            *self.join_counts.lock().entry(topic.to_string()).or_insert(0) += 1;
            self.states
                .lock()
                .insert(topic.to_string(), ChannelState::Joined);
            Ok(())
        }

        async fn leave(&mut self, topic: &str) -> anyhow::Result<()> {
            self.states
                .lock()
                .insert(topic.to_string(), ChannelState::Disconnected);
            Ok(())
        }

        fn state(&self, topic: &str) -> ChannelState {
            self.states
                .lock()
                .get(topic)
                .copied()
                .unwrap_or(ChannelState::Disconnected)
        }

        async fn next_message(&mut self) -> Option<InboundMessage> {
            match self.inbox.lock().pop_front() {
                Some(msg) => Some(msg),
                None => futures::future::pending().await,
            }
        }
    }

    fn bare_worker(transport: FakeTransport) -> (RealtimeWorker<FakeTransport>, Receiver<(ChannelKind, Value)>) {
        let (_command_tx, command_rx) = mpsc::channel();
        let (frame_tx, frame_rx) = mpsc::channel();
        (
            RealtimeWorker {
                transport,
                watchdog_interval: Duration::from_millis(10),
                topics: HashMap::new(),
                command_rx,
                frame_tx,
                stats: SharedRealtimeStats::new(),
            },
            frame_rx,
        )
    }

    #[tokio::test]
    async fn watchdog_rejoins_only_unjoined_topics() {
        let transport = FakeTransport::default();
        let (mut worker, _rx) = bare_worker(transport.clone());
        worker.topics.insert("org:1".to_string(), ChannelKind::Organization);

        // Not joined yet: the first pass joins.
        worker.ensure_joined().await;
        assert_eq!(transport.joins("org:1"), 1);

        // Already joined: a second pass is a no-op.
        worker.ensure_joined().await;
        assert_eq!(transport.joins("org:1"), 1);

        // Transport dropped the channel: the next pass rejoins.
        transport.set_state("org:1", ChannelState::Errored);
        worker.ensure_joined().await;
        assert_eq!(transport.joins("org:1"), 2);
        assert_eq!(worker.stats.snapshot().reconnects, 2);
    }

    #[tokio::test]
    async fn frames_are_forwarded_with_their_channel_kind() {
        let transport = FakeTransport::default();
        transport.push("org:1", json!({"event": "X", "data": {}}));
        let (mut worker, frame_rx) = bare_worker(transport.clone());
        worker.topics.insert("org:1".to_string(), ChannelKind::Organization);

        let msg = worker.transport.next_message().await.unwrap();
        worker.forward(msg);

        let (kind, frame) = frame_rx.try_recv().unwrap();
        assert_eq!(kind, ChannelKind::Organization);
        assert_eq!(frame["event"], "X");
    }

    #[tokio::test]
    async fn frames_for_unsubscribed_topics_are_dropped() {
        let transport = FakeTransport::default();
        transport.push("org:other", json!({"event": "X", "data": {}}));
        let (mut worker, frame_rx) = bare_worker(transport.clone());
        worker.topics.insert("org:1".to_string(), ChannelKind::Organization);

        let msg = worker.transport.next_message().await.unwrap();
        worker.forward(msg);
        assert!(frame_rx.try_recv().is_err());
    }

    #[test]
    fn spawned_worker_delivers_frames_end_to_end() {
        let transport = FakeTransport::default();
        let stats = SharedRealtimeStats::new();
        let (handle, join) =
            RealtimeWorker::spawn(transport.clone(), Duration::from_millis(10), stats);

        handle.subscribe(ChannelKind::User, "user:7");

        // Publish only once the worker has joined, as the service would.
        let deadline = Instant::now() + Duration::from_secs(2);
        while transport.state("user:7") != ChannelState::Joined && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        transport.push("user:7", json!({"event": "PROFILE_UPDATED", "data": {}}));

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut frames = Vec::new();
        while frames.is_empty() && Instant::now() < deadline {
            frames = handle.drain_frames();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].0, ChannelKind::User);

        handle.shutdown();
        join.join().unwrap();
    }
}

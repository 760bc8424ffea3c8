//! crates/logging/src/queue/mod.rs
//! Bounded hand-off between producers and a single consumer thread.
//!
//! In async mode producers render their record and push the text onto a
//! bounded channel; one consumer thread pops messages in FIFO order and fans
//! them out through the shared [`Dispatcher`]. A producer never waits on a
//! backend, only (under [`OverflowPolicy::Block`]) on queue space.
//!
//! # Thread Protocol
//!
//! ```text
//! Producers                         Consumer ("diaglog-async")
//! ─────────                         ──────────────────────────
//! push(Record)  ───────────────▶    fanout(level, text)
//! push(Raw)     ───────────────▶    fanout_raw(bytes)
//! flush()       waits until every message accepted before the call
//!               has been dispatched or evicted
//! shutdown()    flush, wake blocked producers, close the channel,
//!               consumer drains what is left and exits, join
//! ```

mod policy;
mod progress;

pub use policy::OverflowPolicy;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, select};

use crate::dispatch::Dispatcher;
use crate::error::{LogError, LogResult};
use crate::level::Level;

use progress::Progress;

/// Queue capacity used when none is configured.
pub const DEFAULT_QUEUE_SIZE: usize = 32;

/// Name given to the consumer thread.
pub const CONSUMER_THREAD_NAME: &str = "diaglog-async";

/// Outcome of a single push.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// The message is queued and will be dispatched.
    Accepted,
    /// The message was discarded by the overflow policy or by shutdown.
    Dropped,
}

/// Counters describing queue activity since start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueStats {
    /// Messages that entered the queue.
    pub accepted: u64,
    /// Messages discarded, either on arrival or by eviction.
    pub dropped: u64,
    /// Messages the consumer handed to the dispatcher.
    pub dispatched: u64,
}

enum Payload {
    Record { level: Level, text: String },
    Raw(Vec<u8>),
}

struct Queued {
    seq: u64,
    payload: Payload,
}

/// State shared with the consumer thread.
#[derive(Default)]
struct Shared {
    progress: Progress,
    dispatched: AtomicU64,
}

/// The async delivery queue.
pub struct AsyncQueue {
    capacity: usize,
    policy: AtomicU8,
    /// Serializes pushes so sequence numbers follow channel order.
    producer: Mutex<Option<Sender<Queued>>>,
    /// Receiver clone used for eviction and occupancy.
    evictor: Receiver<Queued>,
    /// Dropped on shutdown to wake producers blocked on a full queue.
    shutdown_tx: Mutex<Option<Sender<()>>>,
    shutdown_rx: Receiver<()>,
    accepted: AtomicU64,
    dropped: AtomicU64,
    shared: Arc<Shared>,
    consumer: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for AsyncQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncQueue")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy())
            .field("pending", &self.pending())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl AsyncQueue {
    /// Creates the channel and starts the consumer thread.
    pub fn start(
        capacity: usize,
        policy: OverflowPolicy,
        dispatcher: Arc<Dispatcher>,
    ) -> LogResult<Self> {
        if capacity == 0 {
            return Err(LogError::InvalidParam("async queue size must be non-zero"));
        }

        let (tx, rx) = bounded::<Queued>(capacity);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let shared = Arc::new(Shared::default());

        let consumer = {
            let rx = rx.clone();
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name(CONSUMER_THREAD_NAME.to_owned())
                .spawn(move || consume(&rx, &dispatcher, &shared))
                .map_err(LogError::Spawn)?
        };
        internal_debug!("async queue started: capacity {}, policy {}", capacity, policy);

        Ok(Self {
            capacity,
            policy: AtomicU8::new(policy as u8),
            producer: Mutex::new(Some(tx)),
            evictor: rx,
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            shutdown_rx,
            accepted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            shared,
            consumer: Mutex::new(Some(consumer)),
        })
    }

    /// Maximum number of queued messages.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current overflow policy.
    #[must_use]
    pub fn policy(&self) -> OverflowPolicy {
        OverflowPolicy::from_u8(self.policy.load(Ordering::Acquire))
    }

    /// Replaces the overflow policy; applies to subsequent pushes.
    pub fn set_policy(&self, policy: OverflowPolicy) {
        self.policy.store(policy as u8, Ordering::Release);
    }

    /// Number of messages waiting for the consumer.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.evictor.len()
    }

    /// Activity counters.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            accepted: self.accepted.load(Ordering::Acquire),
            dropped: self.dropped.load(Ordering::Acquire),
            dispatched: self.shared.dispatched.load(Ordering::Acquire),
        }
    }

    /// Queues a rendered record.
    pub fn push(&self, level: Level, text: String) -> PushOutcome {
        self.enqueue(Payload::Record { level, text })
    }

    /// Queues a raw write.
    pub fn push_raw(&self, bytes: Vec<u8>) -> PushOutcome {
        self.enqueue(Payload::Raw(bytes))
    }

    /// Blocks until every message accepted before this call has been
    /// dispatched or evicted.
    pub fn flush(&self) {
        let target = self.accepted.load(Ordering::Acquire);
        self.shared.progress.wait_for(target);
    }

    /// Drains the queue and stops the consumer thread.
    ///
    /// Calling it again is a no-op.
    pub fn shutdown(&self) {
        let Some(handle) = lock(&self.consumer).take() else {
            return;
        };

        self.flush();
        drop(lock(&self.shutdown_tx).take());
        drop(lock(&self.producer).take());

        if handle.join().is_err() {
            internal_warn!("async consumer thread panicked");
        }
        internal_debug!("async queue stopped: {:?}", self.stats());
    }

    fn enqueue(&self, payload: Payload) -> PushOutcome {
        let producer = lock(&self.producer);
        let Some(tx) = producer.as_ref() else {
            return self.reject();
        };

        let seq = self.accepted.load(Ordering::Acquire) + 1;
        let mut item = Queued { seq, payload };

        let sent = match self.policy() {
            OverflowPolicy::Drop | OverflowPolicy::DropNewest => tx.try_send(item).is_ok(),
            OverflowPolicy::DropOldest => loop {
                match tx.try_send(item) {
                    Ok(()) => break true,
                    Err(TrySendError::Full(returned)) => {
                        item = returned;
                        // the consumer may win the race for the head; retry either way
                        if let Ok(evicted) = self.evictor.try_recv() {
                            self.dropped.fetch_add(1, Ordering::AcqRel);
                            self.shared.progress.finish(evicted.seq);
                        }
                    }
                    Err(TrySendError::Disconnected(_)) => break false,
                }
            },
            OverflowPolicy::Block => select! {
                send(tx, item) -> result => result.is_ok(),
                recv(self.shutdown_rx) -> _ => false,
            },
        };

        if sent {
            self.accepted.store(seq, Ordering::Release);
            PushOutcome::Accepted
        } else {
            drop(producer);
            self.reject()
        }
    }

    fn reject(&self) -> PushOutcome {
        self.dropped.fetch_add(1, Ordering::AcqRel);
        PushOutcome::Dropped
    }
}

impl Drop for AsyncQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poison| poison.into_inner())
}

fn consume(rx: &Receiver<Queued>, dispatcher: &Dispatcher, shared: &Shared) {
    for item in rx {
        let delivered = catch_unwind(AssertUnwindSafe(|| match &item.payload {
            Payload::Record { level, text } => dispatcher.fanout(*level, text),
            Payload::Raw(bytes) => dispatcher.fanout_raw(bytes),
        }));
        if delivered.is_err() {
            internal_warn!("backend panicked while dispatching message {}", item.seq);
        }
        shared.dispatched.fetch_add(1, Ordering::AcqRel);
        shared.progress.finish(item.seq);
    }
}

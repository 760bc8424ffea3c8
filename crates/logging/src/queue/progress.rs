//! crates/logging/src/queue/progress.rs
//! Completion tracking that lets `flush` wait for a known prefix of the queue.

use std::collections::BTreeSet;
use std::sync::{Condvar, Mutex};

/// Every accepted message carries a sequence number starting at 1. A message
/// is finished once it has been dispatched by the consumer or evicted by a
/// producer. `completed` is the highest `n` such that messages `1..=n` are all
/// finished; finishes that arrive ahead of a gap wait in `ahead`.
#[derive(Debug, Default)]
pub(super) struct Progress {
    state: Mutex<State>,
    advanced: Condvar,
}

#[derive(Debug, Default)]
struct State {
    completed: u64,
    ahead: BTreeSet<u64>,
}

impl Progress {
    pub(super) fn finish(&self, seq: u64) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        if seq != state.completed + 1 {
            state.ahead.insert(seq);
            return;
        }

        state.completed = seq;
        loop {
            let next = state.completed + 1;
            if !state.ahead.remove(&next) {
                break;
            }
            state.completed = next;
        }
        drop(state);
        self.advanced.notify_all();
    }

    /// Blocks until every message up to and including `target` is finished.
    pub(super) fn wait_for(&self, target: u64) {
        let guard = self
            .state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        let _guard = self
            .advanced
            .wait_while(guard, |state| state.completed < target)
            .unwrap_or_else(|poison| poison.into_inner());
    }

    #[cfg(test)]
    pub(super) fn completed(&self) -> u64 {
        self.state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn in_order_finishes_advance() {
        let progress = Progress::default();
        progress.finish(1);
        progress.finish(2);
        assert_eq!(progress.completed(), 2);
    }

    #[test]
    fn gaps_hold_back_completion() {
        let progress = Progress::default();
        progress.finish(2);
        progress.finish(3);
        assert_eq!(progress.completed(), 0);
        progress.finish(1);
        assert_eq!(progress.completed(), 3);
    }

    #[test]
    fn wait_for_returns_once_target_reached() {
        let progress = Arc::new(Progress::default());
        let worker = {
            let progress = Arc::clone(&progress);
            thread::spawn(move || {
                for seq in 1..=5 {
                    thread::sleep(Duration::from_millis(2));
                    progress.finish(seq);
                }
            })
        };
        progress.wait_for(5);
        assert_eq!(progress.completed(), 5);
        worker.join().unwrap();
    }

    #[test]
    fn wait_for_zero_never_blocks() {
        Progress::default().wait_for(0);
    }
}

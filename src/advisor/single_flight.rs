//! Coalescing of concurrent work for the same key.
//!
//! The first caller for a key becomes the leader and runs the work; callers
//! arriving while it runs wait for the leader's outcome over a oneshot
//! channel. Nothing is remembered once the leader finishes.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;
use tracing::debug;

type Waiters<T> = HashMap<String, Vec<oneshot::Sender<T>>>;

/// How a caller obtained its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Ran the work itself
    Leader,
    /// Received another caller's outcome
    Follower,
}

pub struct SingleFlight<T> {
    calls: Mutex<Waiters<T>>,
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Waiters<T>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of keys with work in progress.
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    // == Run ==
    /// Runs `work` unless a call for `key` is already in progress, in which
    /// case the in-progress outcome is returned instead.
    ///
    /// If the leader is dropped before finishing, one of its followers
    /// takes over and runs its own `work`.
    pub async fn run<F, Fut>(&self, key: &str, work: F) -> (T, Role)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        loop {
            let receiver = {
                let mut calls = self.lock();
                match calls.get_mut(key) {
                    Some(waiters) => {
                        let (sender, receiver) = oneshot::channel();
                        waiters.push(sender);
                        receiver
                    }
                    None => {
                        calls.insert(key.to_string(), Vec::new());
                        break;
                    }
                }
            };

            debug!(key, "Joining in-flight call");
            match receiver.await {
                Ok(value) => return (value, Role::Follower),
                // Leader was cancelled; race to become the next one
                Err(_) => continue,
            }
        }

        let flight = Flight {
            owner: self,
            key,
            finished: false,
        };
        let value = work().await;
        for waiter in flight.finish() {
            let _ = waiter.send(value.clone());
        }
        (value, Role::Leader)
    }
}

/// Removes the leader's slot on completion or cancellation.
struct Flight<'a, T: Clone> {
    owner: &'a SingleFlight<T>,
    key: &'a str,
    finished: bool,
}

impl<T: Clone> Flight<'_, T> {
    fn finish(mut self) -> Vec<oneshot::Sender<T>> {
        self.finished = true;
        self.owner.lock().remove(self.key).unwrap_or_default()
    }
}

impl<T: Clone> Drop for Flight<'_, T> {
    fn drop(&mut self) {
        if !self.finished {
            // Dropping the senders wakes the followers with an error
            self.owner.lock().remove(self.key);
        }
    }
}

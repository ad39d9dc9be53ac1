//! Debouncing for commands.
//!
//! A [`Debouncer`] collapses a burst of calls into one message: every
//! [`Debouncer::call`] cancels the timer of the previous call, so only the
//! last call in a burst produces a [`Debounced`] message, `delay` after it was
//! made.
//!
//! Like the spinner and timer components, each debouncer carries a unique id
//! and a tag that is bumped on every call. A message is accepted only when
//! both match, so a timer that slipped through before cancellation cannot
//! act on newer state.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use combobox::debounce::{Debounced, Debouncer};
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(300));
//!
//! // In update():
//! let cmd = debouncer.call(query.clone());
//!
//! // Later, when the message arrives:
//! if let Some(msg) = msg.downcast_ref::<Debounced<String>>() {
//!     if debouncer.accept(msg) {
//!         // fire the search for msg.value
//!     }
//! }
//! ```

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tea_core::{Cmd, Message};
use tokio_util::sync::CancellationToken;
use tracing::trace;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Message produced when a debounce window elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debounced<T> {
    id: u64,
    tag: u64,
    /// The argument of the call that won.
    pub value: T,
}

impl<T> Debounced<T> {
    /// Id of the debouncer that produced this message.
    pub const fn id(&self) -> u64 {
        self.id
    }
}

/// Collapses repeated calls within a time window to the last call.
#[derive(Debug)]
pub struct Debouncer<T> {
    id: u64,
    tag: u64,
    delay: Duration,
    pending: Option<CancellationToken>,
    _value: PhantomData<fn(T)>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Creates a debouncer with the given window.
    pub fn new(delay: Duration) -> Self {
        Self {
            id: next_id(),
            tag: 0,
            delay,
            pending: None,
            _value: PhantomData,
        }
    }

    /// Returns the unique id of this debouncer.
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the debounce window.
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Changes the debounce window for future calls.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedules `value`, superseding any pending call.
    ///
    /// The returned command sleeps for the window and then yields a
    /// [`Debounced`] message. If another call or [`Self::cancel`] happens
    /// first, the command finishes without a message.
    pub fn call(&mut self, value: T) -> Cmd {
        self.cancel();
        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let id = self.id;
        let tag = self.tag;
        let delay = self.delay;
        trace!(debouncer = id, tag, delay_ms = delay.as_millis() as u64, "debounce scheduled");

        Cmd::new_optional(move || async move {
            tokio::select! {
                biased;
                () = token.cancelled() => None,
                () = tokio::time::sleep(delay) => {
                    trace!(debouncer = id, tag, "debounce fired");
                    Some(Message::new(Debounced { id, tag, value }))
                }
            }
        })
    }

    /// Returns true when `msg` comes from the latest call of this debouncer.
    ///
    /// Accepting a message clears the pending state.
    pub fn accept(&mut self, msg: &Debounced<T>) -> bool {
        if msg.id != self.id || msg.tag != self.tag {
            return false;
        }
        self.pending = None;
        true
    }

    /// Drops any pending call without delivering it.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
        self.tag = self.tag.wrapping_add(1);
    }

    /// Returns true while a call is waiting for its window to elapse.
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

//! Program simulator for testing models without a terminal.
//!
//! The simulator keeps a message queue and a set of in-flight commands.
//! Commands resolve in completion order, just as they would under the real
//! program, which makes it suitable for exercising debounce timers and
//! overlapping requests with tokio's paused clock.

use std::collections::VecDeque;

use futures::StreamExt;
use futures::stream::FuturesUnordered;

use crate::command::{Cmd, CmdFuture};
use crate::message::{BatchMsg, Message, QuitMsg};
use crate::program::Model;

/// Statistics tracked during simulation.
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    /// Number of times `init()` was called.
    pub init_calls: usize,
    /// Number of times `update()` was called.
    pub update_calls: usize,
    /// Number of times `view()` was called.
    pub view_calls: usize,
    /// Commands returned from init/update.
    pub commands_returned: usize,
    /// Commands that finished without producing a message.
    pub commands_silent: usize,
    /// Whether a quit was requested.
    pub quit_requested: bool,
}

/// Drives a [`Model`] the way [`crate::Program`] would, minus the terminal.
///
/// # Example
///
/// ```rust
/// use tea_core::{Cmd, Message, Model, simulator::ProgramSimulator};
///
/// struct Counter(i32);
///
/// impl Model for Counter {
///     fn init(&self) -> Option<Cmd> { None }
///     fn update(&mut self, msg: Message) -> Option<Cmd> {
///         if let Some(n) = msg.downcast::<i32>() {
///             self.0 += n;
///         }
///         None
///     }
///     fn view(&self) -> String { self.0.to_string() }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let mut sim = ProgramSimulator::new(Counter(0));
/// sim.send(Message::new(5));
/// sim.send(Message::new(3));
/// sim.settle().await;
/// assert_eq!(sim.model().0, 8);
/// # });
/// ```
pub struct ProgramSimulator<M: Model> {
    model: M,
    queue: VecDeque<Message>,
    in_flight: FuturesUnordered<CmdFuture>,
    views: Vec<String>,
    stats: SimulationStats,
    initialized: bool,
}

impl<M: Model> ProgramSimulator<M> {
    /// Creates a simulator around `model`.
    pub fn new(model: M) -> Self {
        Self {
            model,
            queue: VecDeque::new(),
            in_flight: FuturesUnordered::new(),
            views: Vec::new(),
            stats: SimulationStats::default(),
            initialized: false,
        }
    }

    /// Calls `init()` once and schedules its command.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.stats.init_calls += 1;
        if let Some(cmd) = self.model.init() {
            self.stats.commands_returned += 1;
            self.spawn(cmd);
        }
        self.render();
    }

    /// Queues a message for processing.
    pub fn send(&mut self, msg: Message) {
        self.queue.push_back(msg);
    }

    /// Schedules a command as if a model had returned it.
    pub fn spawn(&mut self, cmd: Cmd) {
        self.in_flight.push(cmd.into_future());
    }

    /// Processes one queued message. Returns false when the queue was empty.
    pub fn step(&mut self) -> bool {
        if !self.initialized {
            self.init();
        }
        let Some(msg) = self.queue.pop_front() else {
            return false;
        };

        if msg.is::<QuitMsg>() {
            self.stats.quit_requested = true;
            return true;
        }
        if msg.is::<BatchMsg>() {
            if let Some(BatchMsg(cmds)) = msg.downcast::<BatchMsg>() {
                for cmd in cmds {
                    self.spawn(cmd);
                }
            }
            return true;
        }

        self.stats.update_calls += 1;
        if let Some(cmd) = self.model.update(msg) {
            self.stats.commands_returned += 1;
            self.spawn(cmd);
        }
        self.render();
        true
    }

    /// Processes every queued message without waiting on commands.
    pub fn drain(&mut self) -> usize {
        let mut processed = 0;
        while self.step() {
            processed += 1;
        }
        processed
    }

    /// Waits for the next in-flight command to finish and queues its message.
    ///
    /// Returns false when nothing was in flight.
    pub async fn next_command(&mut self) -> bool {
        match self.in_flight.next().await {
            Some(Some(msg)) => {
                self.queue.push_back(msg);
                true
            }
            Some(None) => {
                self.stats.commands_silent += 1;
                true
            }
            None => false,
        }
    }

    /// Processes messages and commands until both are exhausted or a quit
    /// is requested.
    pub async fn settle(&mut self) {
        loop {
            self.drain();
            if self.stats.quit_requested || !self.next_command().await {
                break;
            }
        }
        self.drain();
    }

    /// Number of commands still running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Number of messages waiting in the queue.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The model under test.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model, for driving host-side calls.
    ///
    /// Any command returned by such a call should be handed to [`Self::spawn`].
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Consumes the simulator and returns the model.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Every view rendered so far.
    pub fn views(&self) -> &[String] {
        &self.views
    }

    /// The latest rendered view.
    pub fn last_view(&self) -> Option<&str> {
        self.views.last().map(String::as_str)
    }

    /// Simulation statistics.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    fn render(&mut self) {
        self.stats.view_calls += 1;
        self.views.push(self.model.view());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Echo {
        seen: Vec<u32>,
    }

    impl Model for Echo {
        fn init(&self) -> Option<Cmd> {
            Some(Cmd::message(0u32))
        }

        fn update(&mut self, msg: Message) -> Option<Cmd> {
            let n = msg.downcast::<u32>()?;
            self.seen.push(n);
            if n == 0 {
                // Two delayed replies that finish out of order.
                return crate::batch(vec![
                    Some(crate::tick(Duration::from_millis(50), |_| Message::new(2u32))),
                    Some(crate::tick(Duration::from_millis(10), |_| Message::new(1u32))),
                ]);
            }
            None
        }

        fn view(&self) -> String {
            format!("{:?}", self.seen)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_resolve_in_completion_order() {
        let mut sim = ProgramSimulator::new(Echo { seen: Vec::new() });
        sim.init();
        sim.settle().await;

        assert_eq!(sim.model().seen, vec![0, 1, 2]);
        assert_eq!(sim.in_flight(), 0);
        assert_eq!(sim.last_view(), Some("[0, 1, 2]"));
    }

    #[tokio::test]
    async fn test_quit_stops_settle() {
        let mut sim = ProgramSimulator::new(Echo { seen: Vec::new() });
        sim.send(Message::new(QuitMsg));
        sim.settle().await;
        assert!(sim.stats().quit_requested);
    }

    #[test]
    fn test_step_on_empty_queue() {
        let mut sim = ProgramSimulator::new(Echo { seen: Vec::new() });
        sim.init();
        assert!(!sim.step());
        assert_eq!(sim.stats().init_calls, 1);
    }
}

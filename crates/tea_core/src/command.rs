//! Commands for side effects.
//!
//! A command is a lazy future that may produce a message. Update functions
//! stay pure by returning commands instead of doing IO themselves; the
//! program (or the test simulator) runs them and feeds the resulting message
//! back into `update`.
//!
//! Every command is asynchronous and runs on the tokio runtime, so timers
//! (`tokio::time::sleep`) and network requests never block the event loop.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use crate::message::{BatchMsg, Message, QuitMsg};

/// Boxed future returned when a command runs.
pub type CmdFuture = Pin<Box<dyn Future<Output = Option<Message>> + Send>>;

/// A command that produces at most one message when executed.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tea_core::{Cmd, Message};
///
/// struct Ready;
///
/// fn wait_then_ready() -> Cmd {
///     Cmd::new(|| async {
///         tokio::time::sleep(Duration::from_millis(10)).await;
///         Message::new(Ready)
///     })
/// }
/// ```
pub struct Cmd(Box<dyn FnOnce() -> CmdFuture + Send + 'static>);

impl Cmd {
    /// Creates a command from an async closure that always yields a message.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Message> + Send + 'static,
    {
        Self(Box::new(move || Box::pin(async move { Some(f().await) })))
    }

    /// Creates a command that may finish without producing a message.
    pub fn new_optional<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Option<Message>> + Send + 'static,
    {
        Self(Box::new(move || Box::pin(f())))
    }

    /// Creates a command that immediately yields `msg`.
    pub fn message<M: Any + Send + 'static>(msg: M) -> Self {
        Self::new(move || async move { Message::new(msg) })
    }

    /// No command.
    pub fn none() -> Option<Self> {
        None
    }

    /// Runs the command to completion.
    pub async fn execute(self) -> Option<Message> {
        self.into_future().await
    }

    /// Starts the command, returning its future without awaiting it.
    pub fn into_future(self) -> CmdFuture {
        (self.0)()
    }
}

impl fmt::Debug for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cmd").finish_non_exhaustive()
    }
}

/// Combines commands so they run concurrently.
///
/// `None` entries are dropped; a single remaining command is returned as-is.
pub fn batch(cmds: Vec<Option<Cmd>>) -> Option<Cmd> {
    let mut valid: Vec<Cmd> = cmds.into_iter().flatten().collect();

    match valid.len() {
        0 => None,
        1 => valid.pop(),
        _ => Some(Cmd::new(move || async move { Message::new(BatchMsg(valid)) })),
    }
}

/// Command that asks the program to quit.
pub fn quit() -> Cmd {
    Cmd::message(QuitMsg)
}

/// Command that produces a message after `duration`.
pub fn tick<F>(duration: Duration, f: F) -> Cmd
where
    F: FnOnce(Instant) -> Message + Send + 'static,
{
    Cmd::new(move || async move {
        tokio::time::sleep(duration).await;
        f(Instant::now())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cmd_new() {
        let cmd = Cmd::new(|| async { Message::new(42i32) });
        let msg = cmd.execute().await.unwrap();
        assert_eq!(msg.downcast::<i32>(), Some(42));
    }

    #[tokio::test]
    async fn test_cmd_new_optional_none() {
        let cmd = Cmd::new_optional(|| async { None });
        assert!(cmd.execute().await.is_none());
    }

    #[tokio::test]
    async fn test_cmd_message() {
        let msg = Cmd::message("hello").execute().await.unwrap();
        assert_eq!(msg.downcast::<&str>(), Some("hello"));
    }

    #[test]
    fn test_batch_empty() {
        assert!(batch(vec![None, None]).is_none());
    }

    #[tokio::test]
    async fn test_batch_single_is_unwrapped() {
        let cmd = batch(vec![None, Some(Cmd::message(7u8))]).unwrap();
        let msg = cmd.execute().await.unwrap();
        assert_eq!(msg.downcast::<u8>(), Some(7));
    }

    #[tokio::test]
    async fn test_batch_many() {
        let cmd = batch(vec![Some(Cmd::message(1u8)), Some(Cmd::message(2u8))]).unwrap();
        let msg = cmd.execute().await.unwrap();
        let inner = msg.downcast::<BatchMsg>().unwrap();
        assert_eq!(inner.0.len(), 2);
    }

    #[tokio::test]
    async fn test_quit() {
        let msg = quit().execute().await.unwrap();
        assert!(msg.is::<QuitMsg>());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_waits_for_duration() {
        struct Tick;

        let start = tokio::time::Instant::now();
        let msg = tick(Duration::from_millis(250), |_| Message::new(Tick))
            .execute()
            .await
            .unwrap();
        assert!(msg.is::<Tick>());
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}

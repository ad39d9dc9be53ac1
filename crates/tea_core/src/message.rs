//! Message types for the Elm Architecture.
//!
//! Messages are the only way to update a model. Key presses, timer expiries,
//! finished network requests and component notifications all arrive as
//! messages.

use std::any::Any;
use std::fmt;

use crate::command::Cmd;

/// A type-erased message container.
///
/// Any `Send + 'static` value can travel as a message. Components recognize
/// their own messages with [`Message::downcast_ref`] and ignore the rest.
///
/// # Example
///
/// ```rust
/// use tea_core::Message;
///
/// struct Fetched(usize);
///
/// let msg = Message::new(Fetched(3));
/// assert!(msg.is::<Fetched>());
/// assert_eq!(msg.downcast::<Fetched>().map(|m| m.0), Some(3));
/// ```
pub struct Message(Box<dyn Any + Send>);

impl Message {
    /// Wraps a value as a message.
    pub fn new<M: Any + Send + 'static>(msg: M) -> Self {
        Self(Box::new(msg))
    }

    /// Takes the message apart as `M`, or returns `None` for other types.
    pub fn downcast<M: Any + Send + 'static>(self) -> Option<M> {
        self.0.downcast::<M>().ok().map(|b| *b)
    }

    /// Borrows the message as `M`, or returns `None` for other types.
    pub fn downcast_ref<M: Any + Send + 'static>(&self) -> Option<&M> {
        self.0.downcast_ref::<M>()
    }

    /// Checks whether the message holds an `M`.
    pub fn is<M: Any + Send + 'static>(&self) -> bool {
        self.0.is::<M>()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message").finish_non_exhaustive()
    }
}

/// Asks the program to exit after the current update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuitMsg;

/// Sent when the user presses Ctrl+C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptMsg;

/// Current terminal size, sent at startup and on every resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSizeMsg {
    /// Terminal width in columns.
    pub width: u16,
    /// Terminal height in rows.
    pub height: u16,
}

/// The terminal gained focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusMsg;

/// The terminal lost focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurMsg;

/// Commands to run concurrently; produced by [`crate::batch`].
pub(crate) struct BatchMsg(pub Vec<Cmd>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_downcast() {
        struct Loaded(&'static str);

        let msg = Message::new(Loaded("done"));
        assert!(msg.is::<Loaded>());
        assert_eq!(msg.downcast_ref::<Loaded>().map(|m| m.0), Some("done"));
        assert_eq!(msg.downcast::<Loaded>().map(|m| m.0), Some("done"));
    }

    #[test]
    fn test_message_downcast_wrong_type() {
        struct A;
        struct B;

        let msg = Message::new(A);
        assert!(!msg.is::<B>());
        assert!(msg.downcast::<B>().is_none());
    }

    #[test]
    fn test_window_size_msg() {
        let msg = Message::new(WindowSizeMsg {
            width: 120,
            height: 40,
        });
        let size = msg.downcast::<WindowSizeMsg>().unwrap();
        assert_eq!((size.width, size.height), (120, 40));
    }
}

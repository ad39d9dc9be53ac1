#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # tea_core
//!
//! A small async runtime for terminal applications built on The Elm
//! Architecture:
//!
//! - **Model**: application state plus `init` / `update` / `view`
//! - **Message**: type-erased events (keys, timers, finished requests)
//! - **Cmd**: lazy async side effects that produce messages
//! - **Program**: the terminal event loop
//! - **ProgramSimulator**: the same loop without a terminal, for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use tea_core::{Cmd, KeyMsg, Message, Model, Program, quit};
//!
//! struct Hello;
//!
//! impl Model for Hello {
//!     fn init(&self) -> Option<Cmd> { None }
//!     fn update(&mut self, msg: Message) -> Option<Cmd> {
//!         msg.downcast_ref::<KeyMsg>().map(|_| quit())
//!     }
//!     fn view(&self) -> String { "press any key".into() }
//! }
//!
//! #[tokio::main]
//! async fn main() -> tea_core::Result<()> {
//!     Program::new(Hello).run().await?;
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod key;
pub mod message;
pub mod program;
pub mod simulator;

pub use command::{Cmd, CmdFuture, batch, quit, tick};
pub use key::{KeyMsg, KeyType, from_crossterm_key};
pub use message::{BlurMsg, FocusMsg, InterruptMsg, Message, QuitMsg, WindowSizeMsg};
pub use program::{Error, Model, Program, ProgramOptions, Result};

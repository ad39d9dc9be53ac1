//! Program lifecycle and event loop.
//!
//! [`Program`] owns the terminal while a model runs: it switches to raw mode,
//! forwards key and resize events as messages, executes commands on the
//! tokio runtime and redraws whenever the view changes.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyEventKind},
    execute, queue,
    style::Print,
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace};

use crate::command::Cmd;
use crate::key::{KeyType, from_crossterm_key};
use crate::message::{BatchMsg, BlurMsg, FocusMsg, InterruptMsg, Message, QuitMsg, WindowSizeMsg};

/// Errors that can occur while running a program.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O error during terminal operations.
    #[error("terminal io error: {0}")]
    Io(#[from] io::Error),

    /// Raw mode could not be switched on or off.
    #[error("failed to {action} raw mode: {source}")]
    RawMode {
        /// Either "enable" or "disable".
        action: &'static str,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

/// A specialized `Result` for program operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The Elm Architecture contract.
///
/// `init` returns the startup command, `update` folds a message into the
/// model and may return a follow-up command, `view` renders the model.
pub trait Model: Send + 'static {
    /// Returns an optional command to run at startup.
    fn init(&self) -> Option<Cmd>;

    /// Processes a message and returns an optional command.
    fn update(&mut self, msg: Message) -> Option<Cmd>;

    /// Renders the model. Must be free of side effects.
    fn view(&self) -> String;
}

/// Program options.
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Use the alternate screen buffer.
    pub alt_screen: bool,
    /// Maximum redraws per second.
    pub fps: u32,
    /// How long to wait for running commands on shutdown.
    pub shutdown_timeout: Duration,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            alt_screen: false,
            fps: 60,
            shutdown_timeout: Duration::from_secs(2),
        }
    }
}

/// Runs a [`Model`] against the real terminal.
///
/// # Example
///
/// ```rust,ignore
/// use tea_core::Program;
///
/// #[tokio::main]
/// async fn main() -> tea_core::Result<()> {
///     let model = Program::new(MyModel::default()).with_alt_screen().run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    options: ProgramOptions,
}

impl<M: Model> Program<M> {
    /// Creates a program for `model` with default options.
    pub fn new(model: M) -> Self {
        Self {
            model,
            options: ProgramOptions::default(),
        }
    }

    /// Renders into the alternate screen buffer.
    #[must_use]
    pub fn with_alt_screen(mut self) -> Self {
        self.options.alt_screen = true;
        self
    }

    /// Caps the redraw rate. Clamped to 1..=120.
    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.options.fps = fps.clamp(1, 120);
        self
    }

    /// Runs until the model quits, returning the final model.
    pub async fn run(self) -> Result<M> {
        let mut stdout = io::stdout();
        enable_raw_mode().map_err(|source| Error::RawMode {
            action: "enable",
            source,
        })?;
        if self.options.alt_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        execute!(stdout, Hide)?;

        let alt_screen = self.options.alt_screen;
        let result = self.event_loop(&mut stdout).await;

        // Restore the terminal even when the loop failed.
        let _ = execute!(stdout, Show);
        if alt_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        disable_raw_mode().map_err(|source| Error::RawMode {
            action: "disable",
            source,
        })?;

        result
    }

    async fn event_loop<W: Write>(mut self, out: &mut W) -> Result<M> {
        let (tx, mut rx) = mpsc::channel::<Message>(256);
        let cancel_token = CancellationToken::new();
        let task_tracker = TaskTracker::new();

        let (event_tx, mut event_rx) = mpsc::channel::<Event>(100);
        let event_cancel = cancel_token.clone();
        thread::spawn(move || {
            while !event_cancel.is_cancelled() {
                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => match event::read() {
                        Ok(evt) => {
                            if event_tx.blocking_send(evt).is_err() {
                                break;
                            }
                        }
                        Err(_) => break,
                    },
                    Ok(false) => {}
                    Err(_) => break,
                }
            }
        });

        let (width, height) = terminal::size()?;
        let _ = tx.send(Message::new(WindowSizeMsg { width, height })).await;

        if let Some(cmd) = self.model.init() {
            spawn_command(cmd, tx.clone(), &task_tracker, cancel_token.clone());
        }

        let mut last_view = String::new();
        render(out, &self.model.view(), &mut last_view)?;

        let frame = Duration::from_secs_f64(1.0 / f64::from(self.options.fps));
        let mut frame_interval = tokio::time::interval(frame);
        let mut dirty = false;

        loop {
            tokio::select! {
                Some(event) = event_rx.recv() => {
                    if let Some(msg) = message_from_event(event) {
                        let _ = tx.send(msg).await;
                    }
                }
                Some(msg) = rx.recv() => {
                    if msg.is::<QuitMsg>() || msg.is::<InterruptMsg>() {
                        debug!("program quitting");
                        break;
                    }
                    if msg.is::<BatchMsg>() {
                        if let Some(BatchMsg(cmds)) = msg.downcast::<BatchMsg>() {
                            trace!(commands = cmds.len(), "running batch");
                            for cmd in cmds {
                                spawn_command(cmd, tx.clone(), &task_tracker, cancel_token.clone());
                            }
                        }
                        continue;
                    }
                    if let Some(cmd) = self.model.update(msg) {
                        spawn_command(cmd, tx.clone(), &task_tracker, cancel_token.clone());
                    }
                    dirty = true;
                }
                _ = frame_interval.tick() => {
                    if dirty {
                        render(out, &self.model.view(), &mut last_view)?;
                        dirty = false;
                    }
                }
            }
        }

        cancel_token.cancel();
        task_tracker.close();
        let _ = tokio::time::timeout(self.options.shutdown_timeout, task_tracker.wait()).await;

        Ok(self.model)
    }
}

fn message_from_event(event: Event) -> Option<Message> {
    match event {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            let key = from_crossterm_key(key_event.code, key_event.modifiers)?;
            if key.key_type == KeyType::Ctrl('c') {
                Some(Message::new(InterruptMsg))
            } else {
                Some(Message::new(key))
            }
        }
        Event::Resize(width, height) => Some(Message::new(WindowSizeMsg { width, height })),
        Event::FocusGained => Some(Message::new(FocusMsg)),
        Event::FocusLost => Some(Message::new(BlurMsg)),
        _ => None,
    }
}

fn spawn_command(
    cmd: Cmd,
    tx: mpsc::Sender<Message>,
    tracker: &TaskTracker,
    cancel_token: CancellationToken,
) {
    tracker.spawn(async move {
        tokio::select! {
            result = cmd.execute() => {
                if let Some(msg) = result {
                    let _ = tx.send(msg).await;
                }
            }
            () = cancel_token.cancelled() => {}
        }
    });
}

fn render<W: Write>(out: &mut W, view: &str, last_view: &mut String) -> Result<()> {
    if view == last_view {
        return Ok(());
    }
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for (i, line) in view.lines().enumerate() {
        if i > 0 {
            queue!(out, Print("\r\n"))?;
        }
        queue!(out, Print(line))?;
    }
    out.flush()?;
    last_view.clear();
    last_view.push_str(view);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_program_options_default() {
        let opts = ProgramOptions::default();
        assert!(!opts.alt_screen);
        assert_eq!(opts.fps, 60);
    }

    #[test]
    fn test_ctrl_c_becomes_interrupt() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let msg = message_from_event(event).unwrap();
        assert!(msg.is::<InterruptMsg>());
    }

    #[test]
    fn test_resize_becomes_window_size() {
        let msg = message_from_event(Event::Resize(80, 24)).unwrap();
        assert_eq!(
            msg.downcast::<WindowSizeMsg>(),
            Some(WindowSizeMsg {
                width: 80,
                height: 24
            })
        );
    }

    #[test]
    fn test_render_skips_unchanged_view() {
        let mut out = Vec::new();
        let mut last = String::new();
        render(&mut out, "a\nb", &mut last).unwrap();
        let first_len = out.len();
        assert!(first_len > 0);
        render(&mut out, "a\nb", &mut last).unwrap();
        assert_eq!(out.len(), first_len);
    }
}

//! Event poller: merges resize notifications, key reads, and a polling timeout
//! into one ordered stream.
//!
//! Signal handlers only flip atomics owned by [`SignalFlags`]; the poller drains
//! them synchronously at the top of every cycle, so neither the renderer nor
//! the state machine ever observes signal state directly.

use std::fs::File;
use std::io::{self, Read};
use std::os::fd::AsFd;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM, SIGWINCH};
use thiserror::Error;

use super::{Event, KeyDecoder};

/// Signals that end the menu. Raw mode suppresses the keyboard-generated
/// ones, but they can still arrive via `kill`.
const TERMINATION_SIGNALS: [i32; 4] = [SIGTERM, SIGHUP, SIGINT, SIGQUIT];

const READ_CHUNK: usize = 64;

/// Errors surfaced by [`EventPoller::next_event`].
#[derive(Debug, Error)]
pub enum InputError {
    #[error("terminated by signal {0}")]
    Terminated(i32),

    #[error("terminal input closed")]
    Closed,

    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A terminal-like source of input bytes and dimensions.
pub trait ByteSource {
    /// Wait at most `timeout` for input. `Ok(None)` means nothing arrived
    /// (timeout or interrupted wait), `Ok(Some(n))` means `n > 0` bytes were read.
    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<Option<usize>, InputError>;

    /// Current terminal size as (columns, rows).
    fn size(&self) -> io::Result<(u16, u16)>;
}

/// Reads directly from the controlling terminal, unbuffered.
pub struct TtySource {
    tty: File,
}

impl TtySource {
    /// Open `/dev/tty` for reading.
    pub fn open() -> io::Result<Self> {
        let tty = File::open("/dev/tty")?;
        Ok(Self { tty })
    }
}

impl ByteSource for TtySource {
    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<Option<usize>, InputError> {
        let millis = u16::try_from(timeout.as_millis()).unwrap_or(u16::MAX);
        let ready = {
            let mut fds = [PollFd::new(self.tty.as_fd(), PollFlags::POLLIN)];
            match poll(&mut fds, PollTimeout::from(millis)) {
                Ok(n) => n > 0,
                // A signal (usually SIGWINCH) cut the wait short
                Err(Errno::EINTR) => false,
                Err(e) => return Err(io::Error::from(e).into()),
            }
        };
        if !ready {
            return Ok(None);
        }

        match self.tty.read(buf) {
            Ok(0) => Err(InputError::Closed),
            Ok(n) => Ok(Some(n)),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }
}

/// Pending-signal state shared with the process signal handlers.
#[derive(Debug, Clone, Default)]
pub struct SignalFlags {
    resized: Arc<AtomicBool>,
    terminated: Arc<AtomicUsize>,
}

impl SignalFlags {
    /// Install handlers for `SIGWINCH` and the termination signals.
    pub fn register() -> io::Result<Self> {
        let flags = Self::default();
        signal_hook::flag::register(SIGWINCH, Arc::clone(&flags.resized))?;
        for signal in TERMINATION_SIGNALS {
            // Signal numbers are small positive integers
            signal_hook::flag::register_usize(
                signal,
                Arc::clone(&flags.terminated),
                signal as usize,
            )?;
        }
        Ok(flags)
    }

    /// Record a resize as if `SIGWINCH` had been delivered.
    pub fn notify_resize(&self) {
        self.resized.store(true, Ordering::SeqCst);
    }

    /// Record a termination request as if `signal` had been delivered.
    pub fn notify_terminate(&self, signal: i32) {
        self.terminated.store(signal as usize, Ordering::SeqCst);
    }

    fn take_resize(&self) -> bool {
        self.resized.swap(false, Ordering::SeqCst)
    }

    fn termination(&self) -> Option<i32> {
        match self.terminated.load(Ordering::SeqCst) {
            0 => None,
            signal => Some(signal as i32),
        }
    }
}

/// Blocking event source for the menu loop.
pub struct EventPoller<S> {
    source: S,
    signals: SignalFlags,
    decoder: KeyDecoder,
    escape_delay: Duration,
    escape_deadline: Option<Instant>,
}

impl<S: ByteSource> EventPoller<S> {
    pub fn new(source: S, signals: SignalFlags, escape_delay: Duration) -> Self {
        Self {
            source,
            signals,
            decoder: KeyDecoder::new(),
            escape_delay,
            escape_deadline: None,
        }
    }

    /// Block until the next event.
    ///
    /// `timeout` is the polling granularity: how long a single read waits
    /// before pending signals are re-checked. A pending resize is always
    /// returned ahead of buffered keys.
    pub fn next_event(&mut self, timeout: Duration) -> Result<Event, InputError> {
        let mut buf = [0u8; READ_CHUNK];
        loop {
            if let Some(signal) = self.signals.termination() {
                return Err(InputError::Terminated(signal));
            }

            if self.signals.take_resize() {
                let (cols, rows) = self.source.size()?;
                return Ok(Event::Resize(cols, rows));
            }

            let expired = self
                .escape_deadline
                .is_some_and(|deadline| Instant::now() >= deadline);
            if let Some(key) = self.decoder.next_key(expired) {
                self.escape_deadline = None;
                return Ok(Event::Key(key));
            }

            let wait = if self.decoder.has_pending() {
                let deadline = *self
                    .escape_deadline
                    .get_or_insert_with(|| Instant::now() + self.escape_delay);
                deadline.saturating_duration_since(Instant::now())
            } else {
                timeout
            };

            if let Some(n) = self.source.read_timeout(&mut buf, wait)? {
                self.decoder.feed(&buf[..n]);
            }
        }
    }
}

/// In-memory source replaying a fixed script of reads.
#[cfg(test)]
pub(crate) struct ScriptedSource {
    /// `None` entries simulate a read that timed out.
    pub reads: std::collections::VecDeque<Option<Vec<u8>>>,
    pub size: (u16, u16),
}

#[cfg(test)]
impl ScriptedSource {
    pub fn new(reads: Vec<Option<&str>>) -> Self {
        Self {
            reads: reads
                .into_iter()
                .map(|r| r.map(|s| s.as_bytes().to_vec()))
                .collect(),
            size: (80, 24),
        }
    }
}

#[cfg(test)]
impl ByteSource for ScriptedSource {
    fn read_timeout(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<Option<usize>, InputError> {
        match self.reads.pop_front() {
            Some(Some(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(Some(n))
            }
            Some(None) => Ok(None),
            None => Err(InputError::Closed),
        }
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        Ok(self.size)
    }
}

//! Live progress display for a running search
//!
//! The search loop is the only writer of [`ProgressState`]. The reporter task
//! polls it on a fixed tick and redraws a few terminal lines; it may lag one
//! tick behind, which only affects what is on screen.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Default redraw interval
pub const TICK: Duration = Duration::from_millis(100);

const SPINNER_FRAMES: [char; 4] = ['-', '\\', '|', '/'];
const ERASE_LINE: &str = "\x1b[1A\x1b[2K";

/// Progress shared between the search loop and the reporter
#[derive(Debug, Default)]
pub struct ProgressState {
    current: AtomicUsize,
    total: AtomicUsize,
    rate_limited: AtomicBool,
    countdown: AtomicU64,
    found: Mutex<Vec<String>>,
}

/// Point-in-time copy of [`ProgressState`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub current: usize,
    pub total: usize,
    pub rate_limited: bool,
    pub countdown: u64,
    pub found: Vec<String>,
}

impl ProgressState {
    pub fn new(total: usize) -> Self {
        let state = Self::default();
        state.total.store(total, Ordering::Relaxed);
        state
    }

    pub fn set_current(&self, current: usize) {
        self.current.store(current, Ordering::Relaxed);
    }

    pub fn set_rate_limited(&self, rate_limited: bool) {
        self.rate_limited.store(rate_limited, Ordering::Relaxed);
    }

    pub fn set_countdown(&self, seconds: u64) {
        self.countdown.store(seconds, Ordering::Relaxed);
    }

    pub fn push_found(&self, name: &str) {
        self.found
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name.to_string());
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.rate_limited.load(Ordering::Relaxed)
    }

    pub fn countdown(&self) -> u64 {
        self.countdown.load(Ordering::Relaxed)
    }

    pub fn found(&self) -> Vec<String> {
        self.found
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            current: self.current(),
            total: self.total(),
            rate_limited: self.is_rate_limited(),
            countdown: self.countdown(),
            found: self.found(),
        }
    }
}

/// Lines for one redraw: the names found so far framed by blank lines,
/// then the status line.
pub fn render_frame(snapshot: &ProgressSnapshot, frame: usize) -> Vec<String> {
    let mut lines = Vec::new();

    if !snapshot.found.is_empty() {
        lines.push(String::new());
        lines.extend(snapshot.found.iter().map(|name| format!("Found: {name}")));
        lines.push(String::new());
    }

    if snapshot.rate_limited {
        lines.push(format!(
            " CLOUDFLARE RATE LIMIT REACHED, WAITING: {} s",
            snapshot.countdown
        ));
    } else {
        lines.push(format!(
            " {}   PROCESSING: {}/{}",
            SPINNER_FRAMES[frame % SPINNER_FRAMES.len()],
            snapshot.current,
            snapshot.total
        ));
    }

    lines
}

/// Handle to the background redraw task
pub struct ProgressReporter {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ProgressReporter {
    /// Start drawing to stdout
    pub fn spawn(state: Arc<ProgressState>) -> Self {
        Self::spawn_with(state, io::stdout(), TICK)
    }

    /// Start drawing to `out`, redrawing every `tick`
    pub fn spawn_with<W>(state: Arc<ProgressState>, out: W, tick: Duration) -> Self
    where
        W: Write + Send + 'static,
    {
        let (stop, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(redraw_loop(state, out, tick, stop_rx));
        Self { stop, handle }
    }

    /// Signal the task to clear its lines and wait until it has exited
    pub async fn stop(self) {
        // The receiver only disappears if the task already exited
        let _ = self.stop.send(true);
        if let Err(e) = self.handle.await {
            log::warn!("Progress display task ended abnormally: {}", e);
        }
    }
}

async fn redraw_loop<W: Write>(
    state: Arc<ProgressState>,
    mut out: W,
    tick: Duration,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(tick);
    let mut frame = 0;
    let mut drawn = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
        }

        let snapshot = state.snapshot();
        let lines = render_frame(&snapshot, frame);
        if !snapshot.rate_limited {
            frame = (frame + 1) % SPINNER_FRAMES.len();
        }

        if let Err(e) = redraw(&mut out, drawn, &lines) {
            log::debug!("Progress redraw failed: {}", e);
        }
        drawn = lines.len();
    }

    if let Err(e) = redraw(&mut out, drawn, &[]) {
        log::debug!("Progress cleanup failed: {}", e);
    }
}

fn redraw<W: Write>(out: &mut W, previous: usize, lines: &[String]) -> io::Result<()> {
    for _ in 0..previous {
        out.write_all(ERASE_LINE.as_bytes())?;
    }
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

//! Fixed-interval polling for automation loops
//!
//! A [`Ticker`] paces repeated screenshot/match attempts: every call to
//! [`Ticker::wait`] (or [`Ticker::tick`] from async code) returns once
//! `interval` has passed since the previous tick.

use crate::error::{MatchError, Result};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    skip_first: bool,
    last_tick: Option<Instant>,
}

impl Ticker {
    /// With `skip_first` the first tick returns immediately; otherwise the
    /// first tick comes one `interval` after construction.
    pub fn new(interval: Duration, skip_first: bool) -> Self {
        Self {
            interval,
            skip_first,
            last_tick: if skip_first { None } else { Some(Instant::now()) },
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn skip_first(&self) -> bool {
        self.skip_first
    }

    /// Time left until the next tick is due.
    pub fn remaining(&self) -> Duration {
        match self.last_tick {
            None => Duration::ZERO,
            Some(last) => self.interval.saturating_sub(last.elapsed()),
        }
    }

    /// Block the current thread until the next tick.
    pub fn wait(&mut self) {
        let delay = self.remaining();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        self.last_tick = Some(Instant::now());
    }

    /// Async variant of [`Ticker::wait`].
    pub async fn tick(&mut self) {
        let delay = self.remaining();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.last_tick = Some(Instant::now());
    }
}

/// Run `probe` once per tick until it yields a value or `timeout` elapses.
///
/// The probe always runs at least once. Errors from the probe end polling.
pub fn poll_until<T, F>(ticker: &mut Ticker, timeout: Duration, mut probe: F) -> Result<Option<T>>
where
    F: FnMut() -> Result<Option<T>>,
{
    let started = Instant::now();
    let mut attempts = 0u32;
    loop {
        ticker.wait();
        attempts += 1;
        if let Some(value) = probe()? {
            log::debug!("Probe succeeded after {} attempts", attempts);
            return Ok(Some(value));
        }
        if started.elapsed() >= timeout {
            log::debug!("⏱️ Gave up after {} attempts ({:?})", attempts, timeout);
            return Ok(None);
        }
    }
}

/// Like [`poll_until`], but running out of time is a [`MatchError::Timeout`].
pub fn expect_within<T, F>(
    ticker: &mut Ticker,
    timeout: Duration,
    description: &str,
    probe: F,
) -> Result<T>
where
    F: FnMut() -> Result<Option<T>>,
{
    poll_until(ticker, timeout, probe)?.ok_or_else(|| MatchError::Timeout {
        duration: timeout,
        description: description.to_string(),
    })
}

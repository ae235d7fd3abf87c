//! Lock-free render lifecycle shared between the driver and strip tasks.
//!
//! ```text
//! Ready --try_begin--> InProgress --last finish_job--> Complete --try_consume--> Ready
//! Ready --pause--> Paused --resume--> Ready
//! ```

use std::fmt;
use std::sync::atomic::{AtomicIsize, AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};

/// Where the tracer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RenderStatus {
    Ready = 0,
    InProgress = 1,
    Complete = 2,
    Paused = 3,
}

impl RenderStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Ready,
            1 => Self::InProgress,
            2 => Self::Complete,
            _ => Self::Paused,
        }
    }
}

impl fmt::Display for RenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ready => "Ready",
            Self::InProgress => "In Progress",
            Self::Complete => "Complete",
            Self::Paused => "Paused",
        };
        f.write_str(name)
    }
}

/// Status, outstanding job count and last trace time.
#[derive(Debug)]
pub struct TraceState {
    status: AtomicU8,
    jobs_in_flight: AtomicIsize,
    /// Seconds as `f64` bits
    last_duration: AtomicU64,
}

impl Default for TraceState {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceState {
    pub fn new() -> Self {
        Self {
            status: AtomicU8::new(RenderStatus::Ready as u8),
            jobs_in_flight: AtomicIsize::new(0),
            last_duration: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    pub fn status(&self) -> RenderStatus {
        RenderStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    fn transition(
        &self,
        from: RenderStatus,
        to: RenderStatus,
        success: Ordering,
    ) -> Result<(), RenderStatus> {
        self.status
            .compare_exchange(from as u8, to as u8, success, Ordering::Acquire)
            .map(|_| ())
            .map_err(RenderStatus::from_u8)
    }

    /// Ready -> InProgress. On failure returns the status that blocked it.
    pub fn try_begin(&self) -> Result<(), RenderStatus> {
        self.transition(RenderStatus::Ready, RenderStatus::InProgress, Ordering::AcqRel)
    }

    /// Set the number of jobs that must finish before the trace completes.
    pub fn arm(&self, jobs: usize) {
        self.jobs_in_flight
            .store(jobs.min(isize::MAX as usize) as isize, Ordering::Release);
    }

    pub fn jobs_in_flight(&self) -> isize {
        self.jobs_in_flight.load(Ordering::Acquire)
    }

    /// Called by every job when it is done.
    ///
    /// The job that brings the counter to zero records the elapsed time and
    /// publishes Complete; its release store makes every pixel written by any
    /// job visible to whoever observes Complete.
    pub fn finish_job(&self, started: Instant) {
        let remaining = self.jobs_in_flight.fetch_sub(1, Ordering::AcqRel) - 1;
        if remaining > 0 {
            return;
        }

        let seconds = started.elapsed().as_secs_f64();
        self.last_duration.store(seconds.to_bits(), Ordering::Relaxed);
        if self
            .transition(RenderStatus::InProgress, RenderStatus::Complete, Ordering::Release)
            .is_err()
        {
            log::warn!("Trace finished while not in progress");
        }
    }

    /// Complete -> Ready. True when this call consumed a finished trace.
    pub fn try_consume(&self) -> bool {
        self.transition(RenderStatus::Complete, RenderStatus::Ready, Ordering::Acquire)
            .is_ok()
    }

    /// Ready -> Paused.
    pub fn pause(&self) -> bool {
        self.transition(RenderStatus::Ready, RenderStatus::Paused, Ordering::AcqRel)
            .is_ok()
    }

    /// Paused -> Ready.
    pub fn resume(&self) -> bool {
        self.transition(RenderStatus::Paused, RenderStatus::Ready, Ordering::AcqRel)
            .is_ok()
    }

    /// Wall-clock seconds of the most recently completed trace.
    pub fn last_trace_duration(&self) -> f64 {
        f64::from_bits(self.last_duration.load(Ordering::Relaxed))
    }

    /// Block until no trace is in progress.
    pub fn wait_while_in_progress(&self) {
        let mut backoff = Duration::from_millis(1);
        while self.status() == RenderStatus::InProgress {
            std::thread::sleep(backoff);
            backoff = (backoff * 2).min(Duration::from_millis(16));
        }
    }
}

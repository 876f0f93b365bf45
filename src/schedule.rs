//! Collection cycle scheduling.
//!
//! A timerfd on the boot-time clock drives the daemon: one tick after the
//! warm-up delay, then one per period, independent of how long cycle
//! processing takes. Boot-relative time keeps the schedule immune to
//! wall-clock adjustments.

use std::time::Duration;

use nix::sys::time::TimeSpec;
use nix::sys::timerfd::{ClockId, Expiration, TimerFd, TimerFlags, TimerSetTimeFlags};
use thiserror::Error;

/// Scheduling failures. Creating or arming the timer failing is fatal for
/// the daemon; there is no fallback cadence.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("unable to create boot-time timer: {0}")]
    Create(#[source] nix::Error),
    #[error("unable to arm periodic timer: {0}")]
    Arm(#[source] nix::Error),
    #[error("timer wait failed: {0}")]
    Wait(#[source] nix::Error),
}

/// Fires once after the warm-up delay and at a fixed period thereafter.
pub struct PeriodicTrigger {
    timer: TimerFd,
}

impl PeriodicTrigger {
    /// Creates and arms the underlying boot-time timer.
    pub fn new(warmup: Duration, period: Duration) -> Result<Self, TriggerError> {
        let timer = TimerFd::new(ClockId::CLOCK_BOOTTIME, TimerFlags::TFD_CLOEXEC)
            .map_err(TriggerError::Create)?;

        // A zero initial expiration would disarm the timer entirely, so
        // floor it at one nanosecond.
        let initial = if warmup.is_zero() {
            Duration::from_nanos(1)
        } else {
            warmup
        };

        timer
            .set(
                Expiration::IntervalDelayed(
                    TimeSpec::from_duration(initial),
                    TimeSpec::from_duration(period),
                ),
                TimerSetTimeFlags::empty(),
            )
            .map_err(TriggerError::Arm)?;

        Ok(Self { timer })
    }

    /// Blocks the calling thread until the next tick is due.
    ///
    /// Signal-interrupted waits are retried transparently; they are
    /// neither ticks nor errors.
    pub fn wait(&self) -> Result<(), TriggerError> {
        loop {
            match self.timer.wait() {
                Ok(()) => return Ok(()),
                Err(nix::errno::Errno::EINTR) => continue,
                Err(e) => return Err(TriggerError::Wait(e)),
            }
        }
    }
}

//! Real-time pacing of sample emission.
//!
//! Deadlines are absolute: the deadline after sample `t` is `start + (t + 1) / sample_rate`,
//! computed in integer nanoseconds from the start of the session. A late sample therefore never
//! pushes back the ones after it.

use std::{
    thread,
    time::{Duration, Instant},
};

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Remaining time below which the pacer stops sleeping and spins instead.
const SPIN_THRESHOLD: Duration = Duration::from_micros(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    OnTime,
    /// The deadline had already passed by this much when the wait began.
    Late(Duration),
}

pub trait Pacer {
    /// Marks the start of a session.
    fn start(&mut self);

    /// Blocks until sample `sample_index` has been held for its full period.
    fn wait_after(&mut self, sample_index: u64) -> Pace;
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn start(&mut self) {
        (**self).start()
    }

    fn wait_after(&mut self, sample_index: u64) -> Pace {
        (**self).wait_after(sample_index)
    }
}

/// Offset from the start of a session at which the sample after `sample_index` is due.
pub fn deadline_offset(sample_rate: u32, sample_index: u64) -> Duration {
    let nanos = (sample_index as u128 + 1) * NANOS_PER_SECOND / sample_rate as u128;
    Duration::from_nanos(nanos as u64)
}

pub struct DeadlinePacer {
    sample_rate: u32,
    session_start: Instant,
}

impl DeadlinePacer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            session_start: Instant::now(),
        }
    }
}

impl Pacer for DeadlinePacer {
    fn start(&mut self) {
        self.session_start = Instant::now();
    }

    fn wait_after(&mut self, sample_index: u64) -> Pace {
        let deadline = self.session_start + deadline_offset(self.sample_rate, sample_index);
        let now = Instant::now();
        if now > deadline {
            return Pace::Late(now - deadline);
        }
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Pace::OnTime;
            }
            let remaining = deadline - now;
            if remaining > SPIN_THRESHOLD {
                thread::sleep(remaining - SPIN_THRESHOLD);
            } else {
                std::hint::spin_loop();
            }
        }
    }
}

/// Emits as fast as the sink accepts samples, for offline rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn start(&mut self) {}

    fn wait_after(&mut self, _sample_index: u64) -> Pace {
        Pace::OnTime
    }
}

use crate::{
    pacing::{Pace, Pacer},
    render::Render,
    signal::Signal,
    sink::{SampleSink, SinkError},
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Rendering { sample_index: u64 },
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub samples: u64,
    pub late_samples: u64,
    pub max_lateness: Duration,
    pub elapsed: Duration,
}

/// Emits the samples of a render into a sink, one sample period apart.
pub struct SignalPlayer<K, P> {
    sink: K,
    pacer: P,
    state: PlaybackState,
}

impl<K: SampleSink, P: Pacer> SignalPlayer<K, P> {
    pub fn new(sink: K, pacer: P) -> Self {
        Self {
            sink,
            pacer,
            state: PlaybackState::Idle,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Plays a render to completion. A sink error abandons the session.
    pub fn play<S: Signal<u32>>(
        &mut self,
        session: u64,
        render: Render<S>,
    ) -> Result<SessionReport, SinkError> {
        let result = self.play_inner(session, render);
        self.state = match result {
            Ok(_) => PlaybackState::Done,
            Err(_) => PlaybackState::Idle,
        };
        result
    }

    fn play_inner<S: Signal<u32>>(
        &mut self,
        session: u64,
        render: Render<S>,
    ) -> Result<SessionReport, SinkError> {
        self.sink.begin_session(session)?;
        let start = Instant::now();
        self.pacer.start();
        let mut samples = 0;
        let mut late_samples = 0;
        let mut max_lateness = Duration::ZERO;
        for sample in render {
            self.state = PlaybackState::Rendering {
                sample_index: sample.index,
            };
            self.sink.emit(sample.value)?;
            samples += 1;
            if let Pace::Late(lateness) = self.pacer.wait_after(sample.index) {
                late_samples += 1;
                max_lateness = max_lateness.max(lateness);
            }
        }
        self.sink.end_session()?;
        let report = SessionReport {
            samples,
            late_samples,
            max_lateness,
            elapsed: start.elapsed(),
        };
        if late_samples > 0 {
            log::debug!(
                "{} of {} samples late (worst by {:?})",
                late_samples,
                samples,
                max_lateness
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{pacing::Unpaced, signal::Const};

    #[test]
    fn plays_every_sample_then_finishes() {
        let mut player = SignalPlayer::new(Vec::<u32>::new(), Unpaced);
        assert_eq!(player.state(), PlaybackState::Idle);
        let report = player.play(1, Render::new(|i: u64| i as u32 * 3, 4)).unwrap();
        assert_eq!(report.samples, 4);
        assert_eq!(report.late_samples, 0);
        assert_eq!(player.state(), PlaybackState::Done);
        assert_eq!(player.into_sink(), vec![0, 3, 6, 9]);
    }

    struct FailingSink {
        accepted: u64,
        limit: u64,
    }

    impl SampleSink for FailingSink {
        fn emit(&mut self, _sample: u32) -> Result<(), SinkError> {
            if self.accepted == self.limit {
                return Err(SinkError::NoSession);
            }
            self.accepted += 1;
            Ok(())
        }
    }

    #[test]
    fn sink_error_abandons_session() {
        let sink = FailingSink {
            accepted: 0,
            limit: 3,
        };
        let mut player = SignalPlayer::new(sink, Unpaced);
        assert!(player.play(1, Render::new(Const::new(0_u32), 10)).is_err());
        assert_eq!(player.sink().accepted, 3);
        assert_eq!(player.state(), PlaybackState::Idle);
    }

    struct RecordingPacer {
        started: u32,
        waited: Vec<u64>,
    }

    impl Pacer for RecordingPacer {
        fn start(&mut self) {
            self.started += 1;
        }

        fn wait_after(&mut self, sample_index: u64) -> Pace {
            self.waited.push(sample_index);
            if sample_index == 1 {
                Pace::Late(Duration::from_micros(7))
            } else {
                Pace::OnTime
            }
        }
    }

    #[test]
    fn waits_after_each_sample() {
        let mut pacer = RecordingPacer {
            started: 0,
            waited: Vec::new(),
        };
        let mut sink: Vec<u32> = Vec::new();
        let report = SignalPlayer::new(&mut sink, &mut pacer)
            .play(1, Render::new(Const::new(1_u32), 3))
            .unwrap();
        assert_eq!(pacer.started, 1);
        assert_eq!(pacer.waited, vec![0, 1, 2]);
        assert_eq!(report.late_samples, 1);
        assert_eq!(report.max_lateness, Duration::from_micros(7));
        assert_eq!(sink, vec![1, 1, 1]);
    }
}

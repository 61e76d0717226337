use nfsound::{
    config::PlaybackConfig,
    formula::{Formula, CATALOG_A, CATALOG_B},
    pacing::{DeadlinePacer, Unpaced},
    player::{LoopOutcome, Player},
    selector::{self, Voices},
    sink::{SampleSink, SinkError, WavFileSink},
    source::{AcquisitionError, IdentifierSource, LineSource, ListSource},
    Identifier, Signal,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

fn id(bytes: &[u8]) -> Identifier {
    Identifier::try_from(bytes).unwrap()
}

#[test]
fn reference_session_sample_count_and_values() {
    let config = PlaybackConfig {
        sample_rate: 11025,
        duration: Duration::from_secs(10),
        ..Default::default()
    };
    let uid = id(&[0x04, 0x3A, 0x9F, 0x12]);
    let mut player =
        Player::new(config, ListSource::default(), Vec::<u32>::new(), Unpaced).unwrap();
    let session = player.play(&uid).unwrap();
    assert_eq!(session.report.samples, 110_250);
    let a = CATALOG_A[6];
    let b = CATALOG_B[3];
    assert_eq!(session.voices.a, a);
    assert_eq!(session.voices.b, b);
    let samples = player.into_sink();
    assert_eq!(samples.len(), 110_250);
    for (t, &sample) in samples.iter().enumerate() {
        let t = t as u32;
        assert_eq!(sample, a.eval(t).wrapping_add(b.eval(t)), "t = {}", t);
    }
}

#[test]
fn sums_wrap_instead_of_saturating() {
    let voices = Voices {
        a: Formula::Form5,
        b: Formula::Form9,
    };
    let t = 4_294_958_079_u32;
    assert_eq!(Formula::Form5.eval(t), 4_294_377_408);
    assert_eq!(Formula::Form9.eval(t), 663_696);
    assert_eq!(voices.into_signal().sample(t as u64), 73_808);
}

#[test]
fn loop_plays_every_identifier_then_reports_closure() {
    let config = PlaybackConfig {
        sample_rate: 1000,
        duration: Duration::from_millis(10),
        ..Default::default()
    };
    let source = ListSource::new([id(&[1, 2, 3, 4]), id(&[1, 2, 3, 4, 5, 6, 7])]);
    let mut player = Player::new(config, source, Vec::<u32>::new(), Unpaced).unwrap();
    assert_eq!(
        player.run().unwrap(),
        LoopOutcome::SourceClosed { sessions: 2 }
    );
    assert_eq!(player.into_sink().len(), 20);
}

#[test]
fn loop_skips_malformed_lines() {
    let config = PlaybackConfig {
        sample_rate: 1000,
        duration: Duration::from_millis(5),
        ..Default::default()
    };
    let source = LineSource::new("04:3A:9F:12\nnot a uid\n11223344\n".as_bytes(), "test");
    let mut player = Player::new(config, source, Vec::<u32>::new(), Unpaced).unwrap();
    assert_eq!(
        player.run().unwrap(),
        LoopOutcome::SourceClosed { sessions: 2 }
    );
}

#[test]
fn strict_loop_skips_non_standard_lengths() {
    let config = PlaybackConfig {
        sample_rate: 1000,
        duration: Duration::from_millis(5),
        strict_identifier_length: true,
        ..Default::default()
    };
    let source = ListSource::new([id(&[1, 2, 3]), id(&[1, 2, 3, 4])]);
    let mut player = Player::new(config, source, Vec::<u32>::new(), Unpaced).unwrap();
    assert_eq!(
        player.run().unwrap(),
        LoopOutcome::SourceClosed { sessions: 1 }
    );
}

struct ScriptedSource {
    script: VecDeque<Result<Option<Identifier>, AcquisitionError>>,
}

impl IdentifierSource for ScriptedSource {
    fn next_identifier(&mut self) -> Result<Option<Identifier>, AcquisitionError> {
        self.script.pop_front().unwrap_or(Ok(None))
    }

    fn describe(&self) -> String {
        "script".to_string()
    }
}

#[test]
fn fatal_acquisition_error_stops_the_loop() {
    let config = PlaybackConfig {
        sample_rate: 1000,
        duration: Duration::from_millis(5),
        ..Default::default()
    };
    let source = ScriptedSource {
        script: VecDeque::from([
            Ok(Some(id(&[1, 2, 3, 4]))),
            Err(AcquisitionError::ReadFailed(
                std::io::ErrorKind::Interrupted.into(),
            )),
            Err(AcquisitionError::Unavailable {
                reason: "reader unplugged".to_string(),
            }),
            Ok(Some(id(&[5, 6, 7, 8]))),
        ]),
    };
    let mut player = Player::new(config, source, Vec::<u32>::new(), Unpaced).unwrap();
    let err = player.run().unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(player.sessions(), 1);
}

struct BrokenSink;

impl SampleSink for BrokenSink {
    fn emit(&mut self, _sample: u32) -> Result<(), SinkError> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe).into())
    }
}

#[test]
fn sink_failure_stops_the_loop() {
    let config = PlaybackConfig {
        sample_rate: 1000,
        duration: Duration::from_millis(5),
        ..Default::default()
    };
    let source = ListSource::new([id(&[1, 2, 3, 4])]);
    let mut player = Player::new(config, source, BrokenSink, Unpaced).unwrap();
    assert!(player.run().is_err());
    assert_eq!(player.sessions(), 0);
}

#[test]
fn paced_session_takes_its_duration() {
    let config = PlaybackConfig {
        sample_rate: 4000,
        duration: Duration::from_millis(250),
        ..Default::default()
    };
    let pacer = DeadlinePacer::new(config.sample_rate);
    let mut player = Player::new(config, ListSource::default(), Vec::<u32>::new(), pacer).unwrap();
    let start = Instant::now();
    let session = player.play(&id(&[0x04, 0x3A, 0x9F, 0x12])).unwrap();
    let elapsed = start.elapsed();
    assert_eq!(session.report.samples, 1000);
    assert!(session.report.elapsed >= Duration::from_millis(250));
    assert!(
        elapsed < Duration::from_millis(750),
        "session took {:?}",
        elapsed
    );
}

#[test]
fn wav_sessions_are_written_to_separate_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tag.wav");
    let config = PlaybackConfig {
        sample_rate: 8000,
        duration: Duration::from_millis(100),
        ..Default::default()
    };
    let uids = [id(&[0x04, 0x3A, 0x9F, 0x12]), id(&[0xDE, 0xAD, 0xBE, 0xEF])];
    let sink = WavFileSink::new(path, config.sample_rate, config.output_bits);
    let mut player = Player::new(config, ListSource::new(uids.clone()), sink, Unpaced).unwrap();
    assert_eq!(
        player.run().unwrap(),
        LoopOutcome::SourceClosed { sessions: 2 }
    );
    let sink = player.into_sink();
    assert!(sink.session_path(1).starts_with(dir.path()));
    for (session, uid) in (1..).zip(uids.iter()) {
        let mut reader = hound::WavReader::open(sink.session_path(session)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.bits_per_sample, 8);
        let voices = selector::select(uid).voices();
        let samples = reader
            .samples::<i8>()
            .map(|sample| sample.unwrap())
            .collect::<Vec<_>>();
        assert_eq!(samples.len(), 800);
        for (t, &sample) in samples.iter().enumerate() {
            let t = t as u32;
            let expected = voices.a.eval(t).wrapping_add(voices.b.eval(t)) as u8;
            assert_eq!(sample as u8 ^ 0x80, expected);
        }
    }
}

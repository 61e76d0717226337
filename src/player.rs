//! The acquisition loop: wait for a tag, play its piece, repeat.

use crate::{
    config::{ConfigError, PlaybackConfig},
    identifier::Identifier,
    pacing::Pacer,
    render::Render,
    selector::{self, Selection, Voices},
    signal_player::{SessionReport, SignalPlayer},
    sink::{SampleSink, SinkError},
    source::{AcquisitionError, IdentifierSource},
};

#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl PlayerError {
    /// Whether the loop must stop. Only acquisition errors can be waited out.
    pub fn is_fatal(&self) -> bool {
        match self {
            PlayerError::Acquisition(err) => err.is_fatal(),
            PlayerError::Sink(_) => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    /// The source closed after this many complete sessions.
    SourceClosed { sessions: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub selection: Selection,
    pub voices: Voices,
    pub report: SessionReport,
}

pub struct Player<I, K, P> {
    config: PlaybackConfig,
    source: I,
    signal_player: SignalPlayer<K, P>,
    sessions: u64,
}

impl<I: IdentifierSource, K: SampleSink, P: Pacer> Player<I, K, P> {
    pub fn new(config: PlaybackConfig, source: I, sink: K, pacer: P) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            signal_player: SignalPlayer::new(sink, pacer),
            sessions: 0,
        })
    }

    pub fn sessions(&self) -> u64 {
        self.sessions
    }

    pub fn into_sink(self) -> K {
        self.signal_player.into_sink()
    }

    /// Plays one session for an identifier.
    pub fn play(&mut self, identifier: &Identifier) -> Result<Session, PlayerError> {
        log::info!("Found a card");
        log::info!("  UID length: {} bytes", identifier.len());
        log::info!("  UID value: {}", identifier);
        if !identifier.is_standard_length() {
            if self.config.strict_identifier_length {
                return Err(AcquisitionError::NonStandardLength {
                    len: identifier.len(),
                }
                .into());
            }
            log::warn!(
                "identifier of {} bytes is not a standard tag length",
                identifier.len()
            );
        }
        let selection = selector::select(identifier);
        let voices = selection.voices();
        log::info!("Playing something using values of {}", selection);
        log::info!("  {}", voices);
        let render = Render::new(voices.into_signal(), self.config.sample_count());
        let report = self.signal_player.play(self.sessions + 1, render)?;
        self.sessions += 1;
        log::info!(
            "session {} done: {} samples in {:?}",
            self.sessions,
            report.samples,
            report.elapsed
        );
        Ok(Session {
            selection,
            voices,
            report,
        })
    }

    /// Runs until the source closes or something fatal happens. Errors that can be waited out
    /// are logged and the loop goes back to waiting.
    pub fn run(&mut self) -> Result<LoopOutcome, PlayerError> {
        log::info!("reading identifiers from {}", self.source.describe());
        loop {
            log::info!("Waiting for an ISO14443A card ...");
            let result = match self.source.next_identifier() {
                Ok(Some(identifier)) => self.play(&identifier).map(|_| ()),
                Ok(None) => {
                    log::info!("identifier source closed");
                    return Ok(LoopOutcome::SourceClosed {
                        sessions: self.sessions,
                    });
                }
                Err(err) => Err(err.into()),
            };
            match result {
                Ok(()) => (),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => log::warn!("{}", err),
            }
        }
    }
}

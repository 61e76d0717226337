use std::time::Duration;

pub const DEFAULT_SAMPLE_RATE: u32 = ReferenceRate::Hz11025.hz();
pub const DEFAULT_OUTPUT_BITS: u32 = 8;
pub const SHORT_SESSION: Duration = Duration::from_secs(10);
pub const LONG_SESSION: Duration = Duration::from_secs(30);

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// The sample rates the formulas were tuned against, with the inter-sample delay the board used
/// for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceRate {
    Hz44100,
    Hz22050,
    Hz11025,
    Hz8000,
}

impl ReferenceRate {
    pub const ALL: [ReferenceRate; 4] = [
        ReferenceRate::Hz44100,
        ReferenceRate::Hz22050,
        ReferenceRate::Hz11025,
        ReferenceRate::Hz8000,
    ];

    pub const fn hz(self) -> u32 {
        match self {
            ReferenceRate::Hz44100 => 44100,
            ReferenceRate::Hz22050 => 22050,
            ReferenceRate::Hz11025 => 11025,
            ReferenceRate::Hz8000 => 8000,
        }
    }

    /// Rounded delay between samples as a fixed number of microseconds. Informational only;
    /// pacing derives the period from the rate.
    pub const fn delay_micros(self) -> u32 {
        match self {
            ReferenceRate::Hz44100 => 22,
            ReferenceRate::Hz22050 => 45,
            ReferenceRate::Hz11025 => 90,
            ReferenceRate::Hz8000 => 125,
        }
    }

    pub fn from_hz(hz: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|rate| rate.hz() == hz)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("sample rate must be positive")]
    ZeroSampleRate,
    #[error("session of {duration:?} at {sample_rate}Hz contains no samples")]
    EmptySession { sample_rate: u32, duration: Duration },
    #[error("session of {samples} samples exceeds the 32-bit sample counter")]
    SessionTooLong { samples: u128 },
    #[error("output resolution must be between 1 and 32 bits (got {bits})")]
    OutputBits { bits: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    pub sample_rate: u32,
    pub duration: Duration,
    pub output_bits: u32,
    /// Reject identifiers whose length is not one of the standard tag lengths.
    pub strict_identifier_length: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            duration: SHORT_SESSION,
            output_bits: DEFAULT_OUTPUT_BITS,
            strict_identifier_length: false,
        }
    }
}

impl PlaybackConfig {
    /// Samples in one session: `sample_rate * duration`, truncated.
    pub fn exact_sample_count(&self) -> u128 {
        self.sample_rate as u128 * self.duration.as_nanos() / NANOS_PER_SECOND
    }

    /// Saturates at `u64::MAX`; `validate` rejects any config where that matters.
    pub fn sample_count(&self) -> u64 {
        u64::try_from(self.exact_sample_count()).unwrap_or(u64::MAX)
    }

    pub fn reference_rate(&self) -> Option<ReferenceRate> {
        ReferenceRate::from_hz(self.sample_rate)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.output_bits == 0 || self.output_bits > 32 {
            return Err(ConfigError::OutputBits {
                bits: self.output_bits,
            });
        }
        let samples = self.exact_sample_count();
        if samples == 0 {
            return Err(ConfigError::EmptySession {
                sample_rate: self.sample_rate,
                duration: self.duration,
            });
        }
        if samples > u32::MAX as u128 + 1 {
            return Err(ConfigError::SessionTooLong { samples });
        }
        Ok(())
    }
}

/// Keeps the low `bits` bits of a sample, the way a DAC register of that width would.
pub fn truncate_to_bits(sample: u32, bits: u32) -> u32 {
    if bits >= 32 {
        sample
    } else {
        sample & ((1 << bits) - 1)
    }
}

use crate::{
    config::{PlaybackConfig, DEFAULT_OUTPUT_BITS, DEFAULT_SAMPLE_RATE, SHORT_SESSION},
    identifier::Identifier,
};
use std::{path::PathBuf, time::Duration};

pub enum Input {
    Uids(Vec<Identifier>),
    Reader(PathBuf),
    Stdin,
}

pub enum Output {
    Dac,
    Raw,
    Wav(PathBuf),
}

pub struct Args {
    pub sample_rate: u32,
    pub duration_seconds: f64,
    pub output_bits: u32,
    pub strict: bool,
    pub uids: Vec<Identifier>,
    pub reader: Option<PathBuf>,
    pub wav: Option<PathBuf>,
    pub raw: bool,
}

impl Args {
    fn parser() -> impl meap::Parser<Item = Self> {
        meap::let_map! {
            let {
                sample_rate = opt_opt::<u32, _>("HZ", "rate")
                    .name('r')
                    .desc("sample rate of the formulas")
                    .with_default(DEFAULT_SAMPLE_RATE);
                duration_seconds = opt_opt::<f64, _>("SECONDS", "duration")
                    .name('d')
                    .desc("length of each session")
                    .with_default(SHORT_SESSION.as_secs_f64());
                output_bits = opt_opt::<u32, _>("BITS", "bits")
                    .name('b')
                    .desc("output resolution")
                    .with_default(DEFAULT_OUTPUT_BITS);
                strict = flag("strict")
                    .desc("reject identifiers that are not 4 or 7 bytes long");
                uids = opt_multi::<Identifier, _>("HEX", "uid")
                    .name('u')
                    .desc("play this identifier instead of waiting for tags (repeatable)");
                reader = opt_opt::<PathBuf, _>("PATH", "reader")
                    .desc("read identifiers line by line from a file or device instead of stdin");
                wav = opt_opt::<PathBuf, _>("PATH", "wav")
                    .name('w')
                    .desc("render each session to a wav file as fast as possible");
                raw = flag("raw")
                    .desc("write raw samples to stdout in real time");
            } in {
                Self {
                    sample_rate,
                    duration_seconds,
                    output_bits,
                    strict,
                    uids,
                    reader,
                    wav,
                    raw,
                }
            }
        }
    }

    pub fn config(&self) -> anyhow::Result<PlaybackConfig> {
        let duration = Duration::try_from_secs_f64(self.duration_seconds)
            .map_err(|err| anyhow::anyhow!("invalid duration {}: {}", self.duration_seconds, err))?;
        let config = PlaybackConfig {
            sample_rate: self.sample_rate,
            duration,
            output_bits: self.output_bits,
            strict_identifier_length: self.strict,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn input(&self) -> Input {
        if !self.uids.is_empty() {
            Input::Uids(self.uids.clone())
        } else if let Some(path) = self.reader.as_ref() {
            Input::Reader(path.clone())
        } else {
            Input::Stdin
        }
    }

    pub fn output(&self) -> Output {
        if let Some(path) = self.wav.as_ref() {
            Output::Wav(path.clone())
        } else if self.raw {
            Output::Raw
        } else {
            Output::Dac
        }
    }
}

pub fn parse() -> Args {
    use meap::Parser;
    Args::parser().with_help_default().parse_env_or_exit()
}

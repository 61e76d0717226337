//! Destinations for rendered samples.
//!
//! The renderer hands every sink the full 32-bit sum. Reducing it to the output resolution is
//! the sink's job, and all sinks here do it by keeping the low bits.

use crate::config::truncate_to_bits;
use cpal_dac::Dac;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("i/o error writing samples: {0}")]
    Io(#[from] io::Error),
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),
    #[error("no session in progress")]
    NoSession,
}

pub trait SampleSink {
    fn begin_session(&mut self, _session: u64) -> Result<(), SinkError> {
        Ok(())
    }

    fn emit(&mut self, sample: u32) -> Result<(), SinkError>;

    fn end_session(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<K: SampleSink + ?Sized> SampleSink for &mut K {
    fn begin_session(&mut self, session: u64) -> Result<(), SinkError> {
        (**self).begin_session(session)
    }

    fn emit(&mut self, sample: u32) -> Result<(), SinkError> {
        (**self).emit(sample)
    }

    fn end_session(&mut self) -> Result<(), SinkError> {
        (**self).end_session()
    }
}

impl<K: SampleSink + ?Sized> SampleSink for Box<K> {
    fn begin_session(&mut self, session: u64) -> Result<(), SinkError> {
        (**self).begin_session(session)
    }

    fn emit(&mut self, sample: u32) -> Result<(), SinkError> {
        (**self).emit(sample)
    }

    fn end_session(&mut self) -> Result<(), SinkError> {
        (**self).end_session()
    }
}

/// Captures untruncated samples.
impl SampleSink for Vec<u32> {
    fn emit(&mut self, sample: u32) -> Result<(), SinkError> {
        self.push(sample);
        Ok(())
    }
}

fn bytes_per_sample(bits: u32) -> usize {
    ((bits + 7) / 8) as usize
}

/// Unsigned little-endian samples, one byte per sample at 8 bits. This is the format bytebeat
/// players traditionally pipe into `aplay`.
pub struct RawSink<W: Write> {
    writer: W,
    bits: u32,
}

impl<W: Write> RawSink<W> {
    pub fn new(writer: W, bits: u32) -> Self {
        Self { writer, bits }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SampleSink for RawSink<W> {
    fn emit(&mut self, sample: u32) -> Result<(), SinkError> {
        let bytes = truncate_to_bits(sample, self.bits).to_le_bytes();
        self.writer.write_all(&bytes[..bytes_per_sample(self.bits)])?;
        Ok(())
    }

    fn end_session(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes each session to its own mono PCM wav file.
///
/// Files are named after the configured path with the session number appended to the stem,
/// so `out.wav` becomes `out-001.wav`, `out-002.wav` and so on.
pub struct WavFileSink {
    path: PathBuf,
    sample_rate: u32,
    bits: u32,
    writer: Option<hound::WavWriter<BufWriter<File>>>,
}

impl WavFileSink {
    pub fn new(path: impl Into<PathBuf>, sample_rate: u32, bits: u32) -> Self {
        Self {
            path: path.into(),
            sample_rate,
            bits,
            writer: None,
        }
    }

    pub fn session_path(&self, session: u64) -> PathBuf {
        session_path(&self.path, session)
    }

    fn spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: (bytes_per_sample(self.bits) * 8) as u16,
            sample_format: hound::SampleFormat::Int,
        }
    }
}

fn session_path(path: &Path, session: u64) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|extension| extension.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wav".to_string());
    path.with_file_name(format!("{}-{:03}.{}", stem, session, extension))
}

/// Converts an unsigned level of `bits` bits to the signed, left-aligned integer wav expects
/// for a container of `container_bits` bits.
fn wav_sample(level: u32, bits: u32, container_bits: u32) -> i32 {
    let centred = level as i64 - (1_i64 << (bits - 1));
    (centred << (container_bits - bits)) as i32
}

impl SampleSink for WavFileSink {
    fn begin_session(&mut self, session: u64) -> Result<(), SinkError> {
        self.end_session()?;
        let path = self.session_path(session);
        log::info!("writing {}", path.display());
        self.writer = Some(hound::WavWriter::create(path, self.spec())?);
        Ok(())
    }

    fn emit(&mut self, sample: u32) -> Result<(), SinkError> {
        let container_bits = bytes_per_sample(self.bits) as u32 * 8;
        let level = truncate_to_bits(sample, self.bits);
        let writer = self.writer.as_mut().ok_or(SinkError::NoSession)?;
        writer.write_sample(wav_sample(level, self.bits, container_bits))?;
        Ok(())
    }

    fn end_session(&mut self) -> Result<(), SinkError> {
        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
        }
        Ok(())
    }
}

/// Drives the default audio device as if it were the board's DAC.
pub struct DacSink {
    dac: Dac,
}

impl DacSink {
    pub fn new(dac: Dac) -> Self {
        Self { dac }
    }
}

impl SampleSink for DacSink {
    fn emit(&mut self, sample: u32) -> Result<(), SinkError> {
        self.dac.write(sample);
        Ok(())
    }

    fn end_session(&mut self) -> Result<(), SinkError> {
        self.dac.silence();
        Ok(())
    }
}

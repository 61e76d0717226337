use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, FromSample, OutputCallbackInfo, Sample, SampleFormat, SizedSample, Stream,
    StreamConfig,
};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

/// Converts the bits of a latched `f32` level into the device's sample type.
fn native_level<T: Sample + FromSample<f32>>(latched: u32) -> T {
    T::from_sample(f32::from_bits(latched))
}

/// The default output device and the format it asked for.
struct DacCore {
    device: Device,
    config: StreamConfig,
    sample_format: SampleFormat,
}

impl DacCore {
    fn open_default() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("no output device on host {}", host.id().name()))?;
        let supported = device.default_output_config()?;
        log::info!(
            "dac output: {} on {}, {} at {}Hz x {} channels",
            device.name().unwrap_or_else(|_| "(no name)".to_string()),
            host.id().name(),
            supported.sample_format(),
            supported.sample_rate().0,
            supported.channels(),
        );
        Ok(Self {
            device,
            sample_format: supported.sample_format(),
            config: supported.into(),
        })
    }

    /// Builds a stream in the device's native format that repeats the latched level.
    fn latch_stream<T>(&self, latch: Arc<AtomicU32>) -> anyhow::Result<Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let stream = self.device.build_output_stream(
            &self.config,
            move |data: &mut [T], _: &OutputCallbackInfo| {
                data.fill(native_level(latch.load(Ordering::Relaxed)));
            },
            |err| log::error!("stream error: {}", err),
            None,
        )?;
        Ok(stream)
    }

    fn stream(&self, latch: Arc<AtomicU32>) -> anyhow::Result<Stream> {
        match self.sample_format {
            SampleFormat::F32 => self.latch_stream::<f32>(latch),
            SampleFormat::F64 => self.latch_stream::<f64>(latch),
            SampleFormat::I16 => self.latch_stream::<i16>(latch),
            SampleFormat::I32 => self.latch_stream::<i32>(latch),
            SampleFormat::U8 => self.latch_stream::<u8>(latch),
            SampleFormat::U16 => self.latch_stream::<u16>(latch),
            other => anyhow::bail!("unsupported sample format: {}", other),
        }
    }
}

/// Maps an unsigned level of the given resolution onto the [-1, 1] range of the device.
pub fn level_to_f32(level: u32, resolution_bits: u32) -> f32 {
    let max = max_level(resolution_bits);
    ((level.min(max) as f64 / max as f64) * 2.0 - 1.0) as f32
}

fn max_level(resolution_bits: u32) -> u32 {
    if resolution_bits >= 32 {
        u32::MAX
    } else {
        (1 << resolution_bits) - 1
    }
}

/// A latching digital-to-analog converter on top of the default cpal output device.
///
/// Writes set the level the device holds until the next write, the same way a hardware DAC
/// register behaves. The device reads the latch at its own rate, so the rate at which levels
/// change is entirely up to the caller.
pub struct Dac {
    core: DacCore,
    #[allow(unused)]
    stream: Stream,
    latch: Arc<AtomicU32>,
    resolution_bits: u32,
}

impl Dac {
    pub fn new(resolution_bits: u32) -> anyhow::Result<Self> {
        if resolution_bits == 0 || resolution_bits > 32 {
            anyhow::bail!("unsupported dac resolution: {} bits", resolution_bits);
        }
        let core = DacCore::open_default()?;
        let latch = Arc::new(AtomicU32::new(0_f32.to_bits()));
        let stream = core.stream(Arc::clone(&latch))?;
        stream.play()?;
        Ok(Self {
            core,
            stream,
            latch,
            resolution_bits,
        })
    }

    pub fn device_sample_rate(&self) -> u32 {
        self.core.config.sample_rate.0
    }

    pub fn resolution_bits(&self) -> u32 {
        self.resolution_bits
    }

    /// Centres the output, which is silent on a speaker even though no level maps onto it.
    pub fn silence(&self) {
        self.latch.store(0_f32.to_bits(), Ordering::Relaxed);
    }

    /// Latches a new level. Bits above the resolution of the converter are discarded.
    pub fn write(&self, value: u32) {
        let level = value & max_level(self.resolution_bits);
        self.latch
            .store(level_to_f32(level, self.resolution_bits).to_bits(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn level_range() {
        assert_eq!(level_to_f32(0, 8), -1.0);
        assert_eq!(level_to_f32(255, 8), 1.0);
        assert!(level_to_f32(128, 8).abs() < 0.01);
        assert_eq!(level_to_f32(u32::MAX, 32), 1.0);
    }

    #[test]
    fn latched_level_in_native_formats() {
        let top = level_to_f32(255, 8).to_bits();
        let bottom = level_to_f32(0, 8).to_bits();
        assert_eq!(native_level::<f32>(top), 1.0);
        assert_eq!(native_level::<i16>(bottom), i16::MIN);
        assert_eq!(native_level::<u8>(bottom), 0);
        assert_eq!(native_level::<u16>(0_f32.to_bits()), 1 << 15);
    }

    #[test]
    fn levels_above_resolution_saturate() {
        assert_eq!(level_to_f32(1000, 8), 1.0);
    }
}

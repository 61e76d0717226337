use nfsound::{
    args::{self, Input, Output},
    config::PlaybackConfig,
    pacing::{DeadlinePacer, Pacer, Unpaced},
    sink::{DacSink, RawSink, SampleSink, WavFileSink},
    source::{IdentifierSource, LineSource, ListSource},
    LoopOutcome, Player,
};
use std::io;

fn run<K: SampleSink, P: Pacer>(
    config: PlaybackConfig,
    source: Box<dyn IdentifierSource>,
    sink: K,
    pacer: P,
) -> anyhow::Result<()> {
    let mut player = Player::new(config, source, sink, pacer)?;
    match player.run()? {
        LoopOutcome::SourceClosed { sessions } => {
            log::info!("played {} sessions", sessions);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = args::parse();
    env_logger::init();
    let config = args.config()?;
    match config.reference_rate() {
        Some(rate) => log::info!(
            "sample rate: {}Hz ({}us between samples)",
            rate.hz(),
            rate.delay_micros()
        ),
        None => log::info!("sample rate: {}Hz", config.sample_rate),
    }
    log::info!(
        "session length: {:?} ({} samples)",
        config.duration,
        config.sample_count()
    );
    let source: Box<dyn IdentifierSource> = match args.input() {
        Input::Uids(uids) => Box::new(ListSource::new(uids)),
        Input::Reader(path) => Box::new(LineSource::open(&path)?),
        Input::Stdin => Box::new(LineSource::stdin()),
    };
    match args.output() {
        Output::Dac => {
            let dac = cpal_dac::Dac::new(config.output_bits)?;
            log::info!(
                "dac: {} bits, device running at {}Hz",
                dac.resolution_bits(),
                dac.device_sample_rate()
            );
            let pacer = DeadlinePacer::new(config.sample_rate);
            run(config, source, DacSink::new(dac), pacer)
        }
        Output::Raw => {
            let sink = RawSink::new(io::stdout().lock(), config.output_bits);
            let pacer = DeadlinePacer::new(config.sample_rate);
            run(config, source, sink, pacer)
        }
        Output::Wav(path) => {
            let sink = WavFileSink::new(path, config.sample_rate, config.output_bits);
            run(config, source, sink, Unpaced)
        }
    }
}

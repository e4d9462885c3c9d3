mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

use cli::Cli;
use lumisync::audio::analysis::SpectralAnalyzer;
use lumisync::audio::decode::decode_audio;
use lumisync::audio::source::{BlockSource, FileSource, ToneSource};
use lumisync::color::band::{BandColorMapper, BandMode};
use lumisync::color::descriptor::{DescriptorColorMapper, DescriptorMode};
use lumisync::config::{self, Config};
use lumisync::descriptors::playlist::Playlist;
use lumisync::device::raw::{default_device_path, RawDevice};
use lumisync::device::simulated::SimulatedDevice;
use lumisync::device::sink::RateLimitedSink;
use lumisync::device::DeviceSink;
use lumisync::sync::{self, LoopOptions};

const DEFAULT_TONE_HZ: f32 = 110.0;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();

    if cli.list_modes {
        println!("Band color modes (audio input):");
        for mode in BandMode::ALL {
            let w = mode.weights();
            println!("  {:<14} bass x{:.1}  mids x{:.1}  highs x{:.1}", mode.name(), w.bass, w.mids, w.highs);
        }
        println!("Descriptor color modes:");
        for mode in DescriptorMode::ALL {
            println!("  {:<14} {}", mode.name(), mode.profile().description);
        }
        return Ok(());
    }

    if let Some(ref path) = cli.write_config {
        config::write_default_config(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut cfg = match config::discover_config_path(cli.config.clone()) {
        Some(path) => match config::load_config(&path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}, using defaults", path.display());
                Config::default()
            }
        },
        None => Config::default(),
    };
    apply_overrides(&mut cfg, &cli);

    let options = LoopOptions {
        duration: run_duration(cli.duration),
        show_progress: true,
        verbose: cli.verbose,
    };

    let device = open_device(&cfg)?;
    let min_interval = cfg.device.min_interval();
    log::info!(
        "Light: {} (max {:.0} updates/s)",
        device.name(),
        if min_interval.is_zero() { f32::INFINITY } else { 1.0 / min_interval.as_secs_f32() }
    );
    let mut sink = RateLimitedSink::new(device, min_interval);

    if let Some(ref location) = cfg.descriptors.source {
        let playlist = Playlist::load(location, cfg.descriptors.hold())?;
        let mapper = DescriptorColorMapper::new(&cfg.descriptors.color_mode);
        sync::run_descriptors(&playlist, &mapper, &mut sink, cfg.descriptors.poll_interval(), &options)?;
        return Ok(());
    }

    let mapper = BandColorMapper::new(cfg.colors.sensitivity, cfg.colors.brightness, &cfg.colors.mode);
    log::info!(
        "Band mode '{}', sensitivity {:.2}, brightness {:.2}",
        mapper.mode(),
        mapper.sensitivity(),
        mapper.brightness()
    );

    let block_size = cfg.audio.block_size.max(2);
    let mut source: Box<dyn BlockSource> = match cfg.audio.input {
        Some(ref input) => {
            if !input.exists() {
                anyhow::bail!("Input file not found: {}", input.display());
            }
            let decoded = decode_audio(input)?;
            Box::new(FileSource::new(decoded, block_size, cfg.audio.loop_playback))
        }
        None => {
            let hz = cfg.audio.tone_hz.unwrap_or(DEFAULT_TONE_HZ);
            log::info!("No input file, analyzing a {:.1} Hz test tone", hz);
            Box::new(ToneSource::new(hz, cfg.audio.tone_amplitude, cfg.audio.sample_rate, block_size))
        }
    };

    let mut analyzer = SpectralAnalyzer::new(
        source.sample_rate(),
        block_size,
        cfg.analysis.band_layout(),
        cfg.analysis.smoothing_window,
    );
    log_bands(&analyzer);

    sync::run_audio(&mut source, &mut analyzer, &mapper, &mut sink, &options)?;
    Ok(())
}

/// `--duration` in seconds; non-positive values mean no limit.
fn run_duration(secs: Option<f32>) -> Option<Duration> {
    secs.map(config::seconds).filter(|d| !d.is_zero())
}

/// Command-line values win over the config file.
fn apply_overrides(cfg: &mut Config, cli: &Cli) {
    if let Some(ref input) = cli.input {
        cfg.audio.input = Some(input.clone());
    }
    if let Some(hz) = cli.tone {
        cfg.audio.tone_hz = Some(hz);
        cfg.audio.input = None;
    }
    if cli.loop_playback {
        cfg.audio.loop_playback = true;
    }
    if let Some(ref source) = cli.descriptors {
        cfg.descriptors.source = Some(source.clone());
    }
    if let Some(ref mode) = cli.color_mode {
        cfg.descriptors.color_mode = mode.clone();
    }
    if let Some(sensitivity) = cli.sensitivity {
        cfg.colors.sensitivity = sensitivity;
    }
    if let Some(brightness) = cli.brightness {
        cfg.colors.brightness = brightness;
    }
    if let Some(ref mode) = cli.mode {
        cfg.colors.mode = mode.clone();
    }
    if let Some(ref path) = cli.device {
        cfg.device.path = Some(path.clone());
        cfg.device.simulate = false;
    }
    if cli.simulate {
        cfg.device.simulate = true;
    }
}

fn open_device(cfg: &Config) -> Result<Box<dyn DeviceSink>> {
    if cfg.device.simulate {
        return Ok(Box::new(SimulatedDevice::new()));
    }
    let path = cfg.device.path.as_ref().with_context(|| {
        format!(
            "No device path configured; set [device] path (e.g. {}) or use --simulate",
            default_device_path().display()
        )
    })?;
    let device = RawDevice::open(path, cfg.device.report_id)
        .with_context(|| format!("Failed to open light device {}", path.display()))?;
    Ok(Box::new(device))
}

fn log_bands(analyzer: &SpectralAnalyzer) {
    log::info!(
        "Analyzing {}-sample blocks at {}Hz ({:.1} Hz per bin)",
        analyzer.block_size(),
        analyzer.sample_rate(),
        analyzer.bin_frequency(1)
    );
    let bands = analyzer.bands();
    for (name, range) in [("bass", &bands.bass), ("mids", &bands.mids), ("highs", &bands.highs)] {
        let (low, high) = analyzer.band_frequencies(range);
        log::info!("  {:<5} bins {:>4}-{:<4} {:>7.0}-{:.0} Hz", name, range.start, range.end, low, high);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "lumisync",
            "--tone",
            "220",
            "--sensitivity",
            "3.0",
            "--device",
            "/dev/hidraw2",
        ])
        .unwrap();
        let mut cfg = Config::default();
        cfg.audio.input = Some("from-config.wav".into());
        apply_overrides(&mut cfg, &cli);

        assert_eq!(cfg.audio.tone_hz, Some(220.0));
        assert!(cfg.audio.input.is_none());
        assert_eq!(cfg.colors.sensitivity, 3.0);
        assert!(!cfg.device.simulate);
        assert_eq!(cfg.colors.mode, "balanced");
    }

    #[test]
    fn simulate_flag_wins_over_device() {
        let cli = Cli::try_parse_from(["lumisync", "--device", "/dev/hidraw2", "--simulate"]).unwrap();
        let mut cfg = Config::default();
        apply_overrides(&mut cfg, &cli);
        assert!(cfg.device.simulate);
        assert_eq!(open_device(&cfg).unwrap().name(), "simulated");
    }

    #[test]
    fn run_duration_saturates_and_ignores_non_positive() {
        assert_eq!(run_duration(Some(2.5)), Some(Duration::from_millis(2500)));
        assert_eq!(run_duration(Some(1e30)), Some(Duration::MAX));
        assert_eq!(run_duration(Some(0.0)), None);
        assert_eq!(run_duration(Some(-3.0)), None);
        assert_eq!(run_duration(None), None);
    }

    #[test]
    fn real_device_requires_a_path() {
        let mut cfg = Config::default();
        cfg.device.simulate = false;
        assert!(open_device(&cfg).is_err());
    }
}

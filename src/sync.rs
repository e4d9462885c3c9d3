use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

use crate::audio::analysis::SpectralAnalyzer;
use crate::audio::source::{BlockPoll, BlockSource};
use crate::color::band::BandColorMapper;
use crate::color::descriptor::DescriptorColorMapper;
use crate::color::Rgb;
use crate::descriptors::playlist::{Playlist, Track};
use crate::device::sink::RateLimitedSink;
use crate::device::{DeviceError, DeviceSink};
use crate::display;

const IDLE_SLEEP: Duration = Duration::from_millis(10);

#[derive(Clone, Debug, Default)]
pub struct LoopOptions {
    /// Stop after this long; run until the source ends otherwise.
    pub duration: Option<Duration>,
    pub show_progress: bool,
    pub verbose: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: u64,
    pub accepted: u64,
    pub dropped: u64,
    pub device_errors: u64,
}

impl LoopStats {
    fn record(&mut self, outcome: Result<bool, DeviceError>, device: &str) {
        match outcome {
            Ok(true) => self.accepted += 1,
            Ok(false) => self.dropped += 1,
            Err(err) => {
                self.device_errors += 1;
                if self.device_errors == 1 || self.device_errors % 100 == 0 {
                    log::warn!("Failed to update {} ({} errors so far): {}", device, self.device_errors, err);
                }
            }
        }
    }
}

fn progress_bar<S: BlockSource + ?Sized>(source: &S, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    match source.progress() {
        Some((_, total)) => {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::with_template("[{elapsed_precise}] {bar:30.cyan/blue} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        }
    }
}

/// Pull blocks from `source` until it finishes, pushing one color per block.
pub fn run_audio<S, D>(
    source: &mut S,
    analyzer: &mut SpectralAnalyzer,
    mapper: &BandColorMapper,
    sink: &mut RateLimitedSink<D>,
    options: &LoopOptions,
) -> Result<LoopStats>
where
    S: BlockSource,
    D: DeviceSink,
{
    let started = Instant::now();
    // A duration past the end of the clock means no deadline.
    let deadline = options.duration.and_then(|d| started.checked_add(d));
    let pb = progress_bar(&*source, options.show_progress);
    let mut fps = display::FpsCounter::starting_at(started);
    let mut stats = LoopStats::default();

    loop {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            log::info!("Run duration reached");
            break;
        }

        let block = match source.poll_block() {
            BlockPoll::Block(block) => block,
            BlockPoll::Pending => {
                std::thread::sleep(IDLE_SLEEP);
                continue;
            }
            BlockPoll::Finished => {
                log::info!("Audio source finished");
                break;
            }
        };

        let bands = analyzer.analyze(&block);
        let rgb = mapper.map_triple(bands);
        let outcome = sink.submit(rgb);
        stats.record(outcome, sink.device().name());
        stats.frames += 1;

        let status = display::band_status(fps.tick(), &bands, rgb);
        if options.verbose {
            pb.println(&status);
        }
        pb.set_message(status);
        if let Some((position, _)) = source.progress() {
            pb.set_position(position);
        }
    }

    pb.finish_and_clear();
    log::info!(
        "Processed {} blocks: {} colors sent, {} rate-limited, {} device errors",
        stats.frames, stats.accepted, stats.dropped, stats.device_errors
    );
    Ok(stats)
}

/// Tracks playlist position and re-colors the light on track changes.
pub struct DescriptorSync<'a> {
    playlist: &'a Playlist,
    mapper: &'a DescriptorColorMapper,
    current: Option<String>,
    pending: Option<Rgb>,
}

impl<'a> DescriptorSync<'a> {
    pub fn new(playlist: &'a Playlist, mapper: &'a DescriptorColorMapper) -> Self {
        Self {
            playlist,
            mapper,
            current: None,
            pending: None,
        }
    }

    /// Advance to `elapsed` and submit the track color if one is due.
    ///
    /// A color the rate limiter drops is retried on the next step.
    pub fn step<D: DeviceSink>(
        &mut self,
        elapsed: Duration,
        sink: &mut RateLimitedSink<D>,
        stats: &mut LoopStats,
    ) -> Option<Rgb> {
        let track = self.playlist.current(elapsed);
        if self.current.as_deref() != Some(track.id.as_str()) {
            self.current = Some(track.id.clone());
            let rgb = self.mapper.map(&track.features);
            announce(track, rgb);
            self.pending = Some(rgb);
        }

        let rgb = self.pending?;
        let outcome = sink.submit(rgb);
        let accepted = matches!(outcome, Ok(true));
        stats.record(outcome, sink.device().name());
        stats.frames += 1;
        if accepted {
            self.pending = None;
            Some(rgb)
        } else {
            None
        }
    }
}

fn announce(track: &Track, rgb: Rgb) {
    let d = &track.features;
    log::info!(
        "Now playing: {} - {} | RGB {} {}",
        if track.artist.is_empty() { "unknown artist" } else { track.artist.as_str() },
        if track.name.is_empty() { track.id.as_str() } else { track.name.as_str() },
        rgb,
        display::color_swatch(rgb, 10)
    );
    log::info!(
        "  energy {:.2} {} | valence {:.2} {} | dance {:.2} | acoustic {:.2} | instrumental {:.2}{}",
        d.energy(),
        display::level_bar(d.energy(), 15),
        d.valence(),
        display::level_bar(d.valence(), 15),
        d.danceability(),
        d.acousticness(),
        d.instrumentalness(),
        d.tempo.map(|bpm| format!(" | {:.1} BPM", bpm)).unwrap_or_default()
    );
}

/// Poll the playlist every `poll_interval` until the optional duration ends.
pub fn run_descriptors<D: DeviceSink>(
    playlist: &Playlist,
    mapper: &DescriptorColorMapper,
    sink: &mut RateLimitedSink<D>,
    poll_interval: Duration,
    options: &LoopOptions,
) -> Result<LoopStats> {
    let started = Instant::now();
    let mut sync = DescriptorSync::new(playlist, mapper);
    let mut stats = LoopStats::default();
    // Never poll faster than the light may be updated.
    let poll_interval = poll_interval.max(sink.min_interval()).max(IDLE_SLEEP);

    log::info!("Descriptor mode '{}': {}", mapper.mode(), mapper.description());
    log::info!("Polling every {:.1}s", poll_interval.as_secs_f32());

    loop {
        let elapsed = started.elapsed();
        if options.duration.is_some_and(|d| elapsed >= d) {
            log::info!("Run duration reached");
            break;
        }
        sync.step(elapsed, sink, &mut stats);
        std::thread::sleep(poll_interval);
    }

    log::info!(
        "Sent {} colors ({} rate-limited, {} device errors)",
        stats.accepted, stats.dropped, stats.device_errors
    );
    Ok(stats)
}

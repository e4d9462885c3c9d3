use std::f32::consts::PI;
use std::time::{Duration, Instant};

use super::decode::DecodedAudio;

/// Result of asking a source for its next block.
#[derive(Debug, PartialEq)]
pub enum BlockPoll {
    Block(Vec<f32>),
    /// No new data yet; the caller should sleep briefly and poll again.
    Pending,
    Finished,
}

/// A producer of fixed-length mono sample blocks.
pub trait BlockSource {
    fn sample_rate(&self) -> u32;
    fn block_size(&self) -> usize;
    fn poll_block(&mut self) -> BlockPoll;

    /// Playback position and total length in samples, when known.
    fn progress(&self) -> Option<(u64, u64)> {
        None
    }
}

impl<S: BlockSource + ?Sized> BlockSource for Box<S> {
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn poll_block(&mut self) -> BlockPoll {
        (**self).poll_block()
    }

    fn progress(&self) -> Option<(u64, u64)> {
        (**self).progress()
    }
}

/// Releases blocks no faster than real time.
#[derive(Debug)]
struct Pacer {
    started: Option<Instant>,
    sample_rate: u32,
}

impl Pacer {
    fn new(sample_rate: u32) -> Self {
        Self {
            started: None,
            sample_rate,
        }
    }

    /// Whether the block starting at sample `position` is due at `now`.
    fn is_due(&mut self, position: u64, now: Instant) -> bool {
        let started = *self.started.get_or_insert(now);
        let due = Duration::from_secs_f64(position as f64 / self.sample_rate.max(1) as f64);
        now.saturating_duration_since(started) >= due
    }

    fn restart(&mut self) {
        self.started = None;
    }
}

/// Serves a decoded file block by block at playback speed.
pub struct FileSource {
    samples: Vec<f32>,
    sample_rate: u32,
    block_size: usize,
    position: usize,
    looping: bool,
    pacer: Pacer,
}

impl FileSource {
    pub fn new(audio: DecodedAudio, block_size: usize, looping: bool) -> Self {
        Self {
            samples: audio.samples,
            sample_rate: audio.sample_rate,
            block_size: block_size.max(1),
            position: 0,
            looping,
            pacer: Pacer::new(audio.sample_rate),
        }
    }

    fn poll_at(&mut self, now: Instant) -> BlockPoll {
        if self.position >= self.samples.len() {
            if !self.looping || self.samples.is_empty() {
                return BlockPoll::Finished;
            }
            log::debug!("Looping playback");
            self.position = 0;
            self.pacer.restart();
        }

        if !self.pacer.is_due(self.position as u64, now) {
            return BlockPoll::Pending;
        }

        let end = (self.position + self.block_size).min(self.samples.len());
        let mut block = self.samples[self.position..end].to_vec();
        block.resize(self.block_size, 0.0);
        self.position = end;
        BlockPoll::Block(block)
    }
}

impl BlockSource for FileSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn poll_block(&mut self) -> BlockPoll {
        self.poll_at(Instant::now())
    }

    fn progress(&self) -> Option<(u64, u64)> {
        Some((self.position as u64, self.samples.len() as u64))
    }
}

/// An endless sine tone, handy for exercising a light without any input.
pub struct ToneSource {
    frequency: f32,
    amplitude: f32,
    sample_rate: u32,
    block_size: usize,
    position: u64,
    phase: f32,
    pacer: Pacer,
}

impl ToneSource {
    pub fn new(frequency: f32, amplitude: f32, sample_rate: u32, block_size: usize) -> Self {
        Self {
            frequency,
            amplitude: amplitude.clamp(0.0, 1.0),
            sample_rate,
            block_size: block_size.max(1),
            position: 0,
            phase: 0.0,
            pacer: Pacer::new(sample_rate),
        }
    }

    fn poll_at(&mut self, now: Instant) -> BlockPoll {
        if !self.pacer.is_due(self.position, now) {
            return BlockPoll::Pending;
        }
        let step = 2.0 * PI * self.frequency / self.sample_rate.max(1) as f32;
        let mut block = Vec::with_capacity(self.block_size);
        for _ in 0..self.block_size {
            block.push(self.amplitude * self.phase.sin());
            self.phase = (self.phase + step) % (2.0 * PI);
        }
        self.position += self.block_size as u64;
        BlockPoll::Block(block)
    }
}

impl BlockSource for ToneSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn poll_block(&mut self) -> BlockPoll {
        self.poll_at(Instant::now())
    }
}

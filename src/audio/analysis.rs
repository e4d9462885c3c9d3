use rustfft::{num_complex::Complex, FftPlanner};

use super::features::{BandLayout, BandRange, BandTriple};
use super::history::SmoothingHistory;

pub const DEFAULT_BLOCK_SIZE: usize = 2048;
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Turns blocks of mono samples into smoothed bass/mids/highs amplitudes.
///
/// Each call runs one FFT over the whole block, normalizes the positive
/// half of the spectrum to its peak, averages the bins of each band and
/// feeds the result through a per-band rolling mean.
pub struct SpectralAnalyzer {
    sample_rate: u32,
    block_size: usize,
    bands: BandLayout,
    bass_history: SmoothingHistory,
    mids_history: SmoothingHistory,
    highs_history: SmoothingHistory,
    planner: FftPlanner<f32>,
    buffer: Vec<Complex<f32>>,
}

impl SpectralAnalyzer {
    pub fn new(sample_rate: u32, block_size: usize, bands: BandLayout, smoothing_window: usize) -> Self {
        Self {
            sample_rate,
            block_size,
            bands,
            bass_history: SmoothingHistory::new(smoothing_window),
            mids_history: SmoothingHistory::new(smoothing_window),
            highs_history: SmoothingHistory::new(smoothing_window),
            planner: FftPlanner::new(),
            buffer: Vec::with_capacity(block_size),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn bands(&self) -> &BandLayout {
        &self.bands
    }

    /// Analyze one block. An empty block yields zeros and leaves the
    /// smoothing history untouched.
    pub fn analyze(&mut self, block: &[f32]) -> BandTriple {
        if block.is_empty() {
            return BandTriple::ZERO;
        }

        let spectrum = self.spectrum(block);

        let bass = band_mean(&spectrum, &self.bands.bass);
        let mids = band_mean(&spectrum, &self.bands.mids);
        let highs = band_mean(&spectrum, &self.bands.highs);

        log::trace!("raw bands: bass={:.4} mids={:.4} highs={:.4}", bass, mids, highs);

        BandTriple {
            bass: self.bass_history.smooth(bass),
            mids: self.mids_history.smooth(mids),
            highs: self.highs_history.smooth(highs),
        }
    }

    /// Peak-normalized magnitudes of the positive-frequency half of the
    /// block's FFT (`block.len() / 2` bins).
    pub fn spectrum(&mut self, block: &[f32]) -> Vec<f32> {
        if block.is_empty() {
            return Vec::new();
        }

        let fft = self.planner.plan_fft_forward(block.len());
        self.buffer.clear();
        self.buffer.extend(block.iter().map(|&s| Complex::new(s, 0.0)));
        fft.process(&mut self.buffer);

        let half = block.len() / 2;
        let mut magnitudes: Vec<f32> = self.buffer[..half].iter().map(|c| c.norm()).collect();

        let peak = magnitudes.iter().copied().fold(0.0f32, f32::max);
        if peak > 0.0 {
            for m in magnitudes.iter_mut() {
                *m /= peak;
            }
        }

        magnitudes
    }

    /// Center frequency of `bin` in Hz.
    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin_frequency(bin, self.sample_rate, self.block_size)
    }

    /// Frequencies of the first `block_size / 2` bins.
    pub fn frequency_bins(&self) -> Vec<f32> {
        (0..self.block_size / 2).map(|bin| self.bin_frequency(bin)).collect()
    }

    /// Frequency span `(low_hz, high_hz)` covered by a band range.
    pub fn band_frequencies(&self, range: &BandRange) -> (f32, f32) {
        let end = range.end.min(self.block_size / 2);
        (self.bin_frequency(range.start), self.bin_frequency(end))
    }

    /// Forget all smoothing history.
    pub fn reset(&mut self) {
        self.bass_history.clear();
        self.mids_history.clear();
        self.highs_history.clear();
    }
}

pub fn bin_frequency(bin: usize, sample_rate: u32, block_size: usize) -> f32 {
    if block_size == 0 {
        return 0.0;
    }
    bin as f32 * sample_rate as f32 / block_size as f32
}

fn band_mean(spectrum: &[f32], range: &BandRange) -> f32 {
    match range.clamp_to(spectrum.len()) {
        Some(bins) => {
            let count = bins.len();
            spectrum[bins].iter().sum::<f32>() / count as f32
        }
        None => 0.0,
    }
}

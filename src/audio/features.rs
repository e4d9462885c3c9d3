/// Half-open FFT bin interval `[start, end)` aggregated into one band value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandRange {
    pub start: usize,
    pub end: usize,
}

impl BandRange {
    /// A reversed pair collapses to the empty range at `start`.
    pub fn new(start: usize, end: usize) -> Self {
        if start > end {
            log::warn!(
                "Band range [{}, {}) is reversed, treating it as empty",
                start, end
            );
            return Self { start, end: start };
        }
        Self { start, end }
    }

    /// The range clipped to a spectrum of `len` bins, `None` when nothing is left.
    pub fn clamp_to(&self, len: usize) -> Option<std::ops::Range<usize>> {
        let end = self.end.min(len);
        if self.start >= end {
            None
        } else {
            Some(self.start..end)
        }
    }
}

impl From<[usize; 2]> for BandRange {
    fn from([start, end]: [usize; 2]) -> Self {
        Self::new(start, end)
    }
}

/// The three bin ranges an analyzer splits the spectrum into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandLayout {
    pub bass: BandRange,   // default bins 0-50
    pub mids: BandRange,   // default bins 50-150
    pub highs: BandRange,  // default bins 150-300
}

impl Default for BandLayout {
    fn default() -> Self {
        Self {
            bass: BandRange::new(0, 50),
            mids: BandRange::new(50, 150),
            highs: BandRange::new(150, 300),
        }
    }
}

/// Smoothed per-frame band amplitudes, nominally 0.0-1.0 but not clamped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandTriple {
    pub bass: f32,
    pub mids: f32,
    pub highs: f32,
}

impl BandTriple {
    pub const ZERO: Self = Self {
        bass: 0.0,
        mids: 0.0,
        highs: 0.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_range_is_empty() {
        let range = BandRange::new(10, 4);
        assert_eq!(range, BandRange { start: 10, end: 10 });
        assert!(range.clamp_to(1024).is_none());
    }

    #[test]
    fn end_clamped_to_spectrum_length() {
        let range = BandRange::new(100, 5000);
        assert_eq!(range.clamp_to(1024), Some(100..1024));
        assert!(BandRange::new(2000, 3000).clamp_to(1024).is_none());
    }
}

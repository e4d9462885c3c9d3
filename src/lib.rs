//! Signal-to-color pipeline for audio-reactive lights.
//!
//! Audio blocks go through [`audio::analysis::SpectralAnalyzer`] and
//! [`color::band::BandColorMapper`]; track descriptors go through
//! [`color::descriptor::DescriptorColorMapper`]. Both end in a
//! [`device::sink::RateLimitedSink`].

pub mod audio;
pub mod color;
pub mod config;
pub mod descriptors;
pub mod device;
pub mod display;
pub mod sync;

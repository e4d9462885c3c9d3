use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::DescriptorSet;
use crate::config::seconds;

const MIN_HOLD: Duration = Duration::from_millis(100);

/// One entry of a descriptor playlist.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Track {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub features: DescriptorSet,
    /// How long the track plays; the playlist default applies when absent.
    #[serde(default)]
    pub duration_secs: Option<f32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlaylistFile {
    Tracks(Vec<Track>),
    Wrapped { tracks: Vec<Track> },
}

/// A looping sequence of tracks with precomputed descriptors.
#[derive(Clone, Debug)]
pub struct Playlist {
    tracks: Vec<Track>,
    default_hold: Duration,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>, default_hold: Duration) -> Result<Self> {
        if tracks.is_empty() {
            anyhow::bail!("Playlist contains no tracks");
        }
        Ok(Self {
            tracks,
            default_hold: default_hold.max(MIN_HOLD),
        })
    }

    /// Load from a JSON file, or from an `http(s)://` URL.
    pub fn load(location: &str, default_hold: Duration) -> Result<Self> {
        let json = if location.starts_with("http://") || location.starts_with("https://") {
            fetch(location)?
        } else {
            std::fs::read_to_string(Path::new(location))
                .with_context(|| format!("Failed to read playlist: {}", location))?
        };
        let playlist = Self::from_json(&json, default_hold)
            .with_context(|| format!("Invalid playlist: {}", location))?;
        log::info!("Loaded {} tracks from {}", playlist.len(), location);
        Ok(playlist)
    }

    pub fn from_json(json: &str, default_hold: Duration) -> Result<Self> {
        let tracks = match serde_json::from_str::<PlaylistFile>(json)? {
            PlaylistFile::Tracks(tracks) => tracks,
            PlaylistFile::Wrapped { tracks } => tracks,
        };
        Self::new(tracks, default_hold)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    fn hold(&self, track: &Track) -> Duration {
        match track.duration_secs.map(seconds) {
            Some(hold) if !hold.is_zero() => hold.max(MIN_HOLD),
            _ => self.default_hold,
        }
    }

    /// The track playing `elapsed` after the start, cycling endlessly.
    pub fn current(&self, elapsed: Duration) -> &Track {
        let cycle = self
            .tracks
            .iter()
            .fold(Duration::ZERO, |total, t| total.saturating_add(self.hold(t)));
        let offset_nanos = elapsed.as_nanos() % cycle.as_nanos();
        let mut offset = Duration::from_nanos(u64::try_from(offset_nanos).unwrap_or(u64::MAX));
        for track in &self.tracks {
            let hold = self.hold(track);
            if offset < hold {
                return track;
            }
            offset -= hold;
        }
        &self.tracks[self.tracks.len() - 1]
    }
}

fn fetch(url: &str) -> Result<String> {
    log::info!("Fetching playlist from {}", url);
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("Failed to request {}", url))?
        .error_for_status()
        .with_context(|| format!("Playlist request failed: {}", url))?;
    response.text().context("Failed to read playlist response")
}

pub mod playlist;

use serde::{Deserialize, Serialize};

/// Value assumed for a descriptor the source did not provide.
pub const NEUTRAL: f32 = 0.5;

/// Precomputed 0.0-1.0 music characteristics for one track.
///
/// Any field may be missing; accessors substitute [`NEUTRAL`]. Unknown keys
/// in serialized input are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valence: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub danceability: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acousticness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrumentalness: Option<f32>,
    /// Beats per minute. Carried for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f32>,
}

impl DescriptorSet {
    pub fn new(energy: f32, valence: f32, danceability: f32, acousticness: f32, instrumentalness: f32) -> Self {
        Self {
            energy: Some(energy),
            valence: Some(valence),
            danceability: Some(danceability),
            acousticness: Some(acousticness),
            instrumentalness: Some(instrumentalness),
            tempo: None,
        }
    }

    pub fn energy(&self) -> f32 {
        self.energy.unwrap_or(NEUTRAL)
    }

    pub fn valence(&self) -> f32 {
        self.valence.unwrap_or(NEUTRAL)
    }

    pub fn danceability(&self) -> f32 {
        self.danceability.unwrap_or(NEUTRAL)
    }

    pub fn acousticness(&self) -> f32 {
        self.acousticness.unwrap_or(NEUTRAL)
    }

    pub fn instrumentalness(&self) -> f32 {
        self.instrumentalness.unwrap_or(NEUTRAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_are_neutral() {
        let set: DescriptorSet = serde_json::from_str(r#"{"energy": 0.9}"#).unwrap();
        assert_eq!(set.energy(), 0.9);
        assert_eq!(set.valence(), NEUTRAL);
        assert_eq!(set.instrumentalness(), NEUTRAL);
        assert!(set.tempo.is_none());
    }

    #[test]
    fn extra_keys_are_ignored() {
        let set: DescriptorSet = serde_json::from_str(
            r#"{"energy": 0.2, "valence": 0.3, "loudness": -5.1, "key": 7, "tempo": 128.0}"#,
        )
        .unwrap();
        assert_eq!(set.valence(), 0.3);
        assert_eq!(set.tempo, Some(128.0));
    }
}

use std::fmt;
use std::str::FromStr;

use super::hsv::hsv_to_rgb;
use super::Rgb;
use crate::descriptors::DescriptorSet;

/// Which descriptors drive which HSV component in a given mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeProfile {
    pub name: &'static str,
    pub description: &'static str,
    /// Valence picks the hue; otherwise energy does.
    pub hue_from_valence: bool,
    pub brightness_from_energy: bool,
    pub saturation_from_danceability: bool,
    pub acoustic_hue_shift: bool,
    pub instrumental_desaturation: bool,
    /// Saturation used when danceability does not set it.
    pub fixed_saturation: f32,
}

const MOOD: ModeProfile = ModeProfile {
    name: "mood",
    description: "Maps valence (mood) to hue, energy to brightness",
    hue_from_valence: true,
    brightness_from_energy: true,
    saturation_from_danceability: true,
    acoustic_hue_shift: true,
    instrumental_desaturation: true,
    fixed_saturation: 0.7,
};

const ENERGY: ModeProfile = ModeProfile {
    name: "energy",
    description: "Emphasizes energy levels - low energy = cool blues, high energy = hot reds",
    hue_from_valence: false,
    brightness_from_energy: true,
    saturation_from_danceability: false,
    acoustic_hue_shift: false,
    instrumental_desaturation: false,
    fixed_saturation: 0.8,
};

const GENRE_FEEL: ModeProfile = ModeProfile {
    name: "genre_feel",
    description: "Emphasizes acousticness and instrumentalness for nuanced palette",
    hue_from_valence: true,
    brightness_from_energy: true,
    saturation_from_danceability: true,
    acoustic_hue_shift: true,
    instrumental_desaturation: true,
    fixed_saturation: 0.7,
};

// Hue anchors: 0.65 is blue-purple, 0.10 warm orange, 0.0 red.
const COOL_HUE: f32 = 0.65;
const VALENCE_HUE_SPAN: f32 = 0.55;
const ENERGY_HUE_SPAN: f32 = 0.65;
const SHIFT_THRESHOLD: f32 = 0.7;
const ACOUSTIC_SHIFT_SCALE: f32 = 0.1;
const INSTRUMENTAL_DESAT_SCALE: f32 = 0.3;
const MIN_SATURATION: f32 = 0.3;
const FIXED_VALUE: f32 = 0.8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DescriptorMode {
    #[default]
    Mood,
    Energy,
    GenreFeel,
}

impl DescriptorMode {
    pub const ALL: [DescriptorMode; 3] = [DescriptorMode::Mood, DescriptorMode::Energy, DescriptorMode::GenreFeel];

    pub fn profile(self) -> &'static ModeProfile {
        match self {
            DescriptorMode::Mood => &MOOD,
            DescriptorMode::Energy => &ENERGY,
            DescriptorMode::GenreFeel => &GENRE_FEEL,
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.name() == name)
    }
}

impl FromStr for DescriptorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown descriptor color mode '{}'", s))
    }
}

impl fmt::Display for DescriptorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Synthesizes a color from track descriptors through HSV.
#[derive(Clone, Debug, Default)]
pub struct DescriptorColorMapper {
    mode: DescriptorMode,
}

impl DescriptorColorMapper {
    /// Unknown mode names fall back to `mood`.
    pub fn new(mode: &str) -> Self {
        let mode = DescriptorMode::from_name(mode).unwrap_or_else(|| {
            log::warn!("Unknown descriptor color mode '{}', using '{}'", mode, DescriptorMode::default());
            DescriptorMode::default()
        });
        Self { mode }
    }

    pub fn mode(&self) -> DescriptorMode {
        self.mode
    }

    pub fn description(&self) -> &'static str {
        self.mode.profile().description
    }

    /// Switch modes by name. Returns `false` and keeps the current mode
    /// when the name is unknown.
    pub fn set_mode(&mut self, name: &str) -> bool {
        match DescriptorMode::from_name(name) {
            Some(mode) => {
                self.mode = mode;
                true
            }
            None => {
                log::debug!("Ignoring unknown descriptor color mode '{}'", name);
                false
            }
        }
    }

    pub fn map(&self, descriptors: &DescriptorSet) -> Rgb {
        let profile = self.mode.profile();
        let hue = hue(profile, descriptors);
        let saturation = saturation(profile, descriptors);
        let value = value(profile, descriptors);

        log::trace!("{}: h={:.3} s={:.3} v={:.3}", profile.name, hue, saturation, value);

        hsv_to_rgb(hue, saturation, value)
    }
}

fn hue(profile: &ModeProfile, d: &DescriptorSet) -> f32 {
    let mut hue = if profile.hue_from_valence {
        COOL_HUE - d.valence() * VALENCE_HUE_SPAN
    } else {
        COOL_HUE - d.energy() * ENERGY_HUE_SPAN
    };
    if hue < 0.0 {
        hue += 1.0;
    }

    let acousticness = d.acousticness();
    if profile.acoustic_hue_shift && acousticness > SHIFT_THRESHOLD {
        hue = (hue + (acousticness - SHIFT_THRESHOLD) * ACOUSTIC_SHIFT_SCALE).rem_euclid(1.0);
    }
    hue
}

fn saturation(profile: &ModeProfile, d: &DescriptorSet) -> f32 {
    let mut saturation = if profile.saturation_from_danceability {
        0.4 + d.danceability() * 0.6
    } else {
        profile.fixed_saturation
    };

    let instrumentalness = d.instrumentalness();
    if profile.instrumental_desaturation && instrumentalness > SHIFT_THRESHOLD {
        let reduction = (instrumentalness - SHIFT_THRESHOLD) * INSTRUMENTAL_DESAT_SCALE;
        saturation = (saturation - reduction).max(MIN_SATURATION);
    }
    saturation
}

fn value(profile: &ModeProfile, d: &DescriptorSet) -> f32 {
    if profile.brightness_from_energy {
        0.3 + d.energy() * 0.7
    } else {
        FIXED_VALUE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hsv::to_channel;

    fn happy() -> DescriptorSet {
        DescriptorSet::new(0.9, 0.9, 0.8, 0.1, 0.1)
    }

    fn sad() -> DescriptorSet {
        DescriptorSet::new(0.2, 0.2, 0.3, 0.1, 0.1)
    }

    #[test]
    fn happy_track_is_brighter_in_mood_mode() {
        let mapper = DescriptorColorMapper::new("mood");
        assert!(mapper.map(&happy()).mean() > mapper.map(&sad()).mean());
    }

    #[test]
    fn high_energy_is_brighter_in_energy_mode() {
        let mapper = DescriptorColorMapper::new("energy");
        let high = DescriptorSet::new(0.9, 0.5, 0.5, 0.1, 0.1);
        let low = DescriptorSet::new(0.1, 0.5, 0.5, 0.1, 0.1);
        assert!(mapper.map(&high).mean() > mapper.map(&low).mean());
    }

    #[test]
    fn energy_mode_runs_blue_to_red() {
        let mapper = DescriptorColorMapper::new("energy");
        let calm = mapper.map(&DescriptorSet::new(0.0, 0.5, 0.5, 0.5, 0.5));
        assert!(calm.b > calm.r && calm.b > calm.g, "{}", calm);
        let intense = mapper.map(&DescriptorSet::new(1.0, 0.5, 0.5, 0.5, 0.5));
        assert!(intense.r >= 254, "{}", intense);
        assert!(intense.g < 60 && intense.b < 60, "{}", intense);
    }

    #[test]
    fn valence_hue_span() {
        let d = DescriptorSet::new(0.5, 0.0, 0.5, 0.1, 0.1);
        assert!((hue(&MOOD, &d) - 0.65).abs() < 1e-6);
        let d = DescriptorSet::new(0.5, 1.0, 0.5, 0.1, 0.1);
        assert!((hue(&MOOD, &d) - 0.10).abs() < 1e-6);
    }

    #[test]
    fn acoustic_shift_only_above_threshold() {
        let plain = DescriptorSet::new(0.5, 0.5, 0.5, 0.7, 0.1);
        let acoustic = DescriptorSet::new(0.5, 0.5, 0.5, 1.0, 0.1);
        let shift = hue(&GENRE_FEEL, &acoustic) - hue(&GENRE_FEEL, &plain);
        assert!((shift - 0.03).abs() < 1e-5);
        assert_eq!(hue(&ENERGY, &acoustic), hue(&ENERGY, &plain));
    }

    #[test]
    fn instrumental_desaturation_floors() {
        let d = DescriptorSet::new(0.5, 0.5, 1.0, 0.1, 1.0);
        assert!((saturation(&MOOD, &d) - 0.91).abs() < 1e-5);
        let d = DescriptorSet::new(0.5, 0.5, 0.0, 0.1, 2.0);
        assert!((saturation(&MOOD, &d) - MIN_SATURATION).abs() < 1e-6);
        assert_eq!(saturation(&ENERGY, &d), 0.8);
    }

    #[test]
    fn value_follows_energy() {
        let d = DescriptorSet::new(1.0, 0.5, 0.5, 0.5, 0.5);
        assert!((value(&MOOD, &d) - 1.0).abs() < 1e-6);
        let d = DescriptorSet::new(0.0, 0.5, 0.5, 0.5, 0.5);
        assert!((value(&ENERGY, &d) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn missing_descriptors_use_neutral_values() {
        let mapper = DescriptorColorMapper::new("mood");
        let neutral = DescriptorSet::new(0.5, 0.5, 0.5, 0.5, 0.5);
        assert_eq!(mapper.map(&DescriptorSet::default()), mapper.map(&neutral));
    }

    #[test]
    fn matches_reference_colors() {
        let mood = DescriptorColorMapper::new("mood");
        assert_eq!(mood.map(&happy()), Rgb::new(237, 222, 28));
        assert_eq!(mood.map(&sad()), Rgb::new(47, 96, 112));

        let energy = DescriptorColorMapper::new("energy");
        assert_eq!(energy.map(&happy()), Rgb::new(237, 121, 47));
        assert_eq!(energy.map(&DescriptorSet::new(0.0, 0.5, 0.5, 0.5, 0.5)), Rgb::new(15, 21, 76));
    }

    #[test]
    fn extremes_follow_value_and_saturation() {
        let cases = [
            DescriptorSet::new(0.0, 0.0, 0.0, 0.0, 0.0),
            DescriptorSet::new(1.0, 1.0, 1.0, 1.0, 1.0),
            DescriptorSet::new(1.5, -0.5, 2.0, 3.0, -1.0),
            DescriptorSet::new(-0.4, 1.2, 0.3, 0.9, 0.1),
            DescriptorSet::new(0.9, 0.1, 0.7, 0.2, 0.8),
        ];
        let close = |actual: u8, expected: u8| (actual as i16 - expected as i16).abs() <= 1;
        for mode in DescriptorMode::ALL {
            let mapper = DescriptorColorMapper::new(mode.name());
            let profile = mode.profile();
            for d in &cases {
                let rgb = mapper.map(d);
                let v = value(profile, d);
                let s = saturation(profile, d);
                let max = rgb.r.max(rgb.g).max(rgb.b);
                let min = rgb.r.min(rgb.g).min(rgb.b);
                assert!(close(max, to_channel(v)), "{} {:?} -> {}", mode, d, rgb);
                assert!(close(min, to_channel(v * (1.0 - s))), "{} {:?} -> {}", mode, d, rgb);
            }
        }
        let full = DescriptorColorMapper::new("energy").map(&DescriptorSet::new(1.0, 0.5, 0.5, 0.5, 0.5));
        assert!(full.r.max(full.g).max(full.b) >= 254, "{}", full);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let mut mapper = DescriptorColorMapper::new("genre_feel");
        let before = mapper.map(&happy());
        assert!(!mapper.set_mode("bogus"));
        assert_eq!(mapper.mode(), DescriptorMode::GenreFeel);
        assert_eq!(mapper.map(&happy()), before);
        assert_eq!(DescriptorColorMapper::new("bogus").mode(), DescriptorMode::Mood);
    }

    #[test]
    fn every_mode_has_a_description() {
        for mode in DescriptorMode::ALL {
            let mut mapper = DescriptorColorMapper::default();
            assert!(mapper.set_mode(mode.name()));
            assert!(!mapper.description().is_empty());
        }
    }
}

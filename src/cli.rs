use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lumisync", about = "Drive an RGB light from live audio or track descriptors")]
pub struct Cli {
    /// Audio file to analyze (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Config file (default: ./lumisync.toml or ~/.config/lumisync/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Analyze a synthetic sine tone at this frequency instead of a file
    #[arg(long, value_name = "HZ")]
    pub tone: Option<f32>,

    /// Descriptor playlist (JSON path or URL); switches to descriptor mode
    #[arg(short, long, value_name = "PATH|URL")]
    pub descriptors: Option<String>,

    /// Run without touching any device
    #[arg(long)]
    pub simulate: bool,

    /// Device node that receives color reports (disables simulation)
    #[arg(long, value_name = "PATH")]
    pub device: Option<PathBuf>,

    /// Band sensitivity multiplier (0.1-5.0)
    #[arg(short, long)]
    pub sensitivity: Option<f32>,

    /// Overall brightness (0.0-1.0)
    #[arg(short, long)]
    pub brightness: Option<f32>,

    /// Band color mode (balanced, bass_heavy, treble_focus)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Descriptor color mode (mood, energy, genre_feel)
    #[arg(long)]
    pub color_mode: Option<String>,

    /// Loop the input file
    #[arg(long = "loop")]
    pub loop_playback: bool,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECS")]
    pub duration: Option<f32>,

    /// Print every status line instead of redrawing one
    #[arg(short, long)]
    pub verbose: bool,

    /// List color modes and exit
    #[arg(long)]
    pub list_modes: bool,

    /// Write the default configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub write_config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_audio_invocation() {
        let cli = Cli::try_parse_from(["lumisync", "song.flac", "-s", "2.0", "--mode", "bass_heavy", "--loop"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("song.flac")));
        assert_eq!(cli.sensitivity, Some(2.0));
        assert_eq!(cli.mode.as_deref(), Some("bass_heavy"));
        assert!(cli.loop_playback);
        assert!(cli.descriptors.is_none());
    }

    #[test]
    fn parses_descriptor_invocation() {
        let cli = Cli::try_parse_from([
            "lumisync",
            "--descriptors",
            "https://example.com/playlist.json",
            "--color-mode",
            "energy",
            "--device",
            "/dev/hidraw1",
        ])
        .unwrap();
        assert_eq!(cli.descriptors.as_deref(), Some("https://example.com/playlist.json"));
        assert_eq!(cli.color_mode.as_deref(), Some("energy"));
        assert_eq!(cli.device, Some(PathBuf::from("/dev/hidraw1")));
    }
}

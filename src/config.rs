//! Game configuration
//!
//! One game, two presets: `enhanced` plays sounds, music and the terminal
//! bell; `minimal` is silent. Either can be overridden from a JSON file.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{FPS, SURFACE_HEIGHT, SURFACE_WIDTH};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "FLAPPY_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frames per second
    pub fps: u32,
    /// Logical surface size in pixels
    pub width: u32,
    pub height: u32,
    /// Flap, hit, score and game-over cues
    pub sound: bool,
    /// Background loop while running
    pub music: bool,
    /// Terminal bell on crash
    pub vibration: bool,
    /// Output volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self::enhanced()
    }
}

impl Config {
    pub fn enhanced() -> Self {
        Self {
            fps: FPS,
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
            sound: true,
            music: true,
            vibration: true,
            volume: 0.8,
        }
    }

    pub fn minimal() -> Self {
        Self {
            sound: false,
            music: false,
            vibration: false,
            ..Self::enhanced()
        }
    }

    /// Any audio output wanted at all
    pub fn wants_audio(&self) -> bool {
        self.sound || self.music
    }

    /// Clamp values into workable ranges
    pub fn sanitized(mut self) -> Self {
        self.fps = self.fps.clamp(1, 240);
        // The course needs room for the highest gap plus the bird
        self.width = self.width.clamp(100, 4000);
        self.height = self.height.clamp(480, 4000);
        self.volume = self.volume.clamp(0.0, 1.0);
        self
    }

    pub fn from_json(json: &str) -> io::Result<Self> {
        serde_json::from_str::<Config>(json)
            .map(Config::sanitized)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve from command-line arguments (without the program name) and
    /// the value of [`CONFIG_ENV`].
    ///
    /// `--config <path>` beats the environment; `--minimal` starts from the
    /// silent preset when no file is given.
    pub fn from_args<I>(args: I, env_path: Option<String>) -> io::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut path: Option<PathBuf> = env_path.filter(|p| !p.is_empty()).map(PathBuf::from);
        let mut minimal = false;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let p = args.next().ok_or_else(|| {
                        io::Error::new(io::ErrorKind::InvalidInput, "--config needs a path")
                    })?;
                    path = Some(PathBuf::from(p));
                }
                "--minimal" => minimal = true,
                other => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("unknown argument: {other}"),
                    ));
                }
            }
        }

        match path {
            Some(p) => Self::load(&p),
            None if minimal => Ok(Self::minimal()),
            None => Ok(Self::enhanced()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_presets_differ_only_in_side_effects() {
        let full = Config::enhanced();
        let quiet = Config::minimal();
        assert!(full.wants_audio() && full.vibration);
        assert!(!quiet.wants_audio() && !quiet.vibration);
        assert_eq!((full.fps, full.width, full.height), (quiet.fps, quiet.width, quiet.height));
        assert_eq!(Config::default(), full);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "sound": false }"#).unwrap();
        assert!(!config.sound);
        assert!(config.music);
        assert_eq!(config.fps, 40);
    }

    #[test]
    fn test_json_values_are_clamped() {
        let config = Config::from_json(r#"{ "fps": 0, "height": 10, "volume": 3.0 }"#).unwrap();
        assert_eq!(config.fps, 1);
        assert_eq!(config.height, 480);
        assert_eq!(config.volume, 1.0);
    }

    #[test]
    fn test_bad_json_is_invalid_data() {
        let err = Config::from_json("{ not json").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_args_select_preset() {
        assert_eq!(Config::from_args(args(&[]), None).unwrap(), Config::enhanced());
        assert_eq!(
            Config::from_args(args(&["--minimal"]), None).unwrap(),
            Config::minimal()
        );
    }

    #[test]
    fn test_args_errors() {
        let err = Config::from_args(args(&["--config"]), None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        let err = Config::from_args(args(&["--loud"]), None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = Config::from_args(
            args(&["--config", "/nonexistent/flappy.json"]),
            None,
        )
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("flappy-sprite-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "music": false, "fps": 30 }"#).unwrap();
        let config = Config::from_args(Vec::new(), Some(path.display().to_string())).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(!config.music);
        assert_eq!(config.fps, 30);
    }
}

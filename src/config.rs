use crate::media::DEFAULT_VOLUME;
use crate::models::SegmenterKind;
use anyhow::Result;
use config::{Config, File};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Theme {
    pub bg: String,      // background
    pub main: String,    // active line, brand
    pub text: String,    // prompt and letter text
    pub sub: String,     // inactive lines, hints
    #[serde(alias = "subalt", alias = "subAlt")]
    pub sub_alt: String, // borders, grid, gauge track
    pub accent: String,  // second curve, icing
    pub error: String,   // blocked audio
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: "#10131c".to_string(),
            main: "#78dcff".to_string(),
            text: "#e6e9f2".to_string(),
            sub: "#5d6475".to_string(),
            sub_alt: "#2a2f3d".to_string(),
            accent: "#ffb4dc".to_string(),
            error: "#ca4754".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlaybackConfig {
    pub volume: f32,
    pub autoplay: bool,
    pub segmenter: SegmenterKind,
    #[serde(default)]
    pub music: Option<PathBuf>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            autoplay: true,
            segmenter: SegmenterKind::Unicode,
            music: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub theme: Theme,
    pub playback: PlaybackConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let mut builder = Self::defaults()?;

        if let Some(proj_dirs) = ProjectDirs::from("", "", "wishletter") {
            let config_path = proj_dirs.config_dir().join("config.toml");

            if config_path.exists() {
                builder = builder.add_source(File::from(config_path));
            }
        }

        let cfg = builder.build()?;

        // keys come back lowercased, so "subAlt" arrives as "subalt"
        let app_config: AppConfig = cfg.try_deserialize()?;

        Ok(app_config)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let theme = Theme::default();
        let playback = PlaybackConfig::default();

        Ok(Config::builder()
            .set_default("theme.bg", theme.bg)?
            .set_default("theme.main", theme.main)?
            .set_default("theme.text", theme.text)?
            .set_default("theme.sub", theme.sub)?
            .set_default("theme.subAlt", theme.sub_alt)?
            .set_default("theme.accent", theme.accent)?
            .set_default("theme.error", theme.error)?
            .set_default("playback.volume", playback.volume as f64)?
            .set_default("playback.autoplay", playback.autoplay)?
            .set_default("playback.segmenter", "unicode")?)
    }
}

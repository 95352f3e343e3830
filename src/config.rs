use anyhow::Result;
use config::{Config, File};
use directories::ProjectDirs;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Theme {
    pub bg: String,     // background
    pub main: String,   // brand color, matched prefix, glow border
    pub accent: String, // required prefix, hints
    pub text: String,   // typed buffer
    pub sub: String,    // footer, inactive elements
    pub error: String,  // unmatched letters, warnings, fallback border
    pub info: String,   // substring-matched letters (bomb fallback)
    pub panic: String,  // panic border
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: "#191928".to_string(),
            main: "#00ff88".to_string(),
            accent: "#ffaa00".to_string(),
            text: "#ffd580".to_string(),
            sub: "#888888".to_string(),
            error: "#ff5555".to_string(),
            info: "#3399ff".to_string(),
            panic: "#ff2828".to_string(),
        }
    }
}

/// Cadence of the synthetic typing scheduler. Delays are sampled from
/// Normal(mean, jitter_sd) and clamped to [min_delay, max_delay].
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct Timing {
    pub type_mean_ms: u64,
    pub panic_mean_ms: u64,
    pub jitter_sd_ms: u64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub key_hold_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            type_mean_ms: 100,
            panic_mean_ms: 50,
            jitter_sd_ms: 50,
            min_delay_ms: 40,
            max_delay_ms: 300,
            key_hold_ms: 8,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub theme: Theme,
    pub timing: Timing,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            timing: Timing::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let theme = Theme::default();
        let timing = Timing::default();

        let mut builder = Config::builder()
            .set_default("theme.bg", theme.bg)?
            .set_default("theme.main", theme.main)?
            .set_default("theme.accent", theme.accent)?
            .set_default("theme.text", theme.text)?
            .set_default("theme.sub", theme.sub)?
            .set_default("theme.error", theme.error)?
            .set_default("theme.info", theme.info)?
            .set_default("theme.panic", theme.panic)?
            .set_default("timing.type_mean_ms", timing.type_mean_ms)?
            .set_default("timing.panic_mean_ms", timing.panic_mean_ms)?
            .set_default("timing.jitter_sd_ms", timing.jitter_sd_ms)?
            .set_default("timing.min_delay_ms", timing.min_delay_ms)?
            .set_default("timing.max_delay_ms", timing.max_delay_ms)?
            .set_default("timing.key_hold_ms", timing.key_hold_ms)?;

        if let Some(proj_dirs) = ProjectDirs::from("", "", "ketting") {
            let config_path = proj_dirs.config_dir().join("config.toml");
            if config_path.exists() {
                builder = builder.add_source(File::from(config_path));
            }
        }

        let cfg = builder.build()?;
        let app_config: AppConfig = cfg.try_deserialize()?;
        Ok(app_config)
    }
}

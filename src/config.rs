use std::path::PathBuf;

/// Runtime configuration for the terminal front end.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Fixed RNG seed for reproducible sessions; random when `None`.
    pub seed: Option<u64>,
    /// Target frames per second.
    pub fps: u64,
    /// Where to write logs.  Logging stays off when `None` so the terminal
    /// UI is never overwritten.
    pub log_path: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            fps: 30,
            log_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source.  Bad values fall back to the
    /// default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(seed) = lookup("GALAGA_SEED") {
            match seed.trim().parse::<u64>() {
                Ok(parsed) => config.seed = Some(parsed),
                Err(_) => tracing::warn!("Invalid GALAGA_SEED '{}', using random seed", seed),
            }
        }

        if let Some(fps) = lookup("GALAGA_FPS") {
            match fps.trim().parse::<u64>() {
                Ok(parsed) if (10..=120).contains(&parsed) => config.fps = parsed,
                Ok(_) => tracing::warn!("GALAGA_FPS must be 10-120, using default"),
                Err(_) => tracing::warn!("Invalid GALAGA_FPS '{}', using default", fps),
            }
        }

        if let Some(path) = lookup("GALAGA_LOG").filter(|p| !p.trim().is_empty()) {
            config.log_path = Some(PathBuf::from(path));
        }

        if let Some(level) = lookup("GALAGA_LOG_LEVEL").filter(|l| !l.trim().is_empty()) {
            config.log_level = level;
        }

        config
    }

    /// Milliseconds per frame at the configured rate.
    pub fn frame_ms(&self) -> u64 {
        1000 / self.fps
    }
}

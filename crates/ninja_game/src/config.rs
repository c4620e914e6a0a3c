use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_PATH: &str = "assets/config/game.json";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowSettings,
    pub max_fps: f32,
    pub physics: PhysicsSettings,
    pub level_path: String,
    pub textures: TextureSettings,
    pub gameplay: GameplaySettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: [f32; 2],
    pub time_step: f32,
    pub solver_iterations: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TextureSettings {
    pub platform: String,
    pub player: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameplaySettings {
    pub box_count: usize,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            max_fps: 144.0,
            physics: PhysicsSettings::default(),
            level_path: "Levels/level.txt".to_string(),
            textures: TextureSettings::default(),
            gameplay: GameplaySettings::default(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Ninja Platformer".to_string(),
            width: 1920,
            height: 1080,
        }
    }
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: [0.0, -34.0],
            time_step: 1.0 / 144.0,
            solver_iterations: 6,
        }
    }
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            platform: "Assets/bricks_top.png".to_string(),
            player: "Assets/blue_ninja.png".to_string(),
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            box_count: 15,
            seed: None,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Load `path`, falling back to defaults when it is missing or invalid.
pub fn load_or_default(path: &Path) -> GameConfig {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return GameConfig::default();
    }
    match load_config_from_path(path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(err) => {
            log::error!("{err}. Using defaults.");
            GameConfig::default()
        }
    }
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.window.width == 0 || config.window.height == 0 {
        return Err(format!(
            "Config validation failed: window size {}x{} must be non-zero",
            config.window.width, config.window.height
        ));
    }
    if !(config.max_fps > 0.0) {
        return Err(format!(
            "Config validation failed: max_fps must be positive, got {}",
            config.max_fps
        ));
    }
    if !(config.physics.time_step > 0.0) {
        return Err(format!(
            "Config validation failed: physics.time_step must be positive, got {}",
            config.physics.time_step
        ));
    }
    if config.physics.solver_iterations == 0 {
        return Err("Config validation failed: physics.solver_iterations must be at least 1".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "ninja_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn partial_json_fills_defaults() {
        let path = temp_file_path("partial");
        fs::write(&path, r#"{ "max_fps": 60, "gameplay": { "seed": 7 } }"#)
            .expect("failed to write temp config");
        let config = load_config_from_path(&path).expect("partial config should load");
        assert_eq!(config.max_fps, 60.0);
        assert_eq!(config.gameplay.seed, Some(7));
        assert_eq!(config.gameplay.box_count, 15);
        assert_eq!(config.window, WindowSettings::default());
        assert_eq!(config.physics.gravity, [0.0, -34.0]);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn zero_window_size_is_rejected() {
        let path = temp_file_path("zero_window");
        fs::write(&path, r#"{ "window": { "width": 0 } }"#).expect("failed to write temp config");
        let err = load_config_from_path(&path).expect_err("zero width should fail");
        assert!(err.contains("window size"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn non_positive_time_step_is_rejected() {
        let path = temp_file_path("time_step");
        fs::write(&path, r#"{ "physics": { "time_step": 0.0 } }"#).expect("failed to write temp config");
        let err = load_config_from_path(&path).expect_err("zero time step should fail");
        assert!(err.contains("time_step"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        let path = temp_file_path("malformed");
        fs::write(&path, "{ not json").expect("failed to write temp config");
        assert!(load_config_from_path(&path).is_err());
        assert_eq!(load_or_default(&path), GameConfig::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let path = temp_file_path("missing");
        assert_eq!(load_or_default(&path), GameConfig::default());
    }
}

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use parcours_core::PlannerConfig;
use tracing::info;

/// Parses planner settings from TOML; missing keys keep their defaults
pub fn parse_planner_config(text: &str) -> Result<PlannerConfig> {
    let config: PlannerConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Reads planner settings from a TOML file, or the defaults when no file is
/// given
pub fn load_planner_config(path: Option<&Path>) -> Result<PlannerConfig> {
    let Some(path) = path else {
        return Ok(PlannerConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings {}", path.display()))?;
    let config = parse_planner_config(&text)
        .with_context(|| format!("Invalid settings {}", path.display()))?;
    info!("Loaded planner settings from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "grid_resolution = 10.0\nmin_artworks = 5").unwrap();

        let config = load_planner_config(Some(file.path())).unwrap();
        assert_eq!(config.grid_resolution, 10.0);
        assert_eq!(config.min_artworks, 5);
        assert_eq!(config, PlannerConfig {
            grid_resolution: 10.0,
            min_artworks: 5,
            ..PlannerConfig::default()
        });
    }

    #[test]
    fn no_file_gives_defaults() {
        assert_eq!(load_planner_config(None).unwrap(), PlannerConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(parse_planner_config("walking_speed_mps = 0.0").is_err());
        assert!(parse_planner_config("grid_resolution = \"fine\"").is_err());
    }
}

//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<ContourConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {:?}", path))?;
    let config: ContourConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config file: {:?}", path))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Mode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_minimal_config() {
        let yaml = r#"
looping:
  loop_when_gate_off: false
default_mode: aarr_loop
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert!(!config.looping.loop_when_gate_off);
        assert!(config.looping.hard_sync_on_ping);
        assert_eq!(config.default_mode, Mode::AarrLoop);
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let yaml = r#"
triggers:
  pulse_width_micros: 0
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("pulse width"));
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config: ContourConfig =
            serde_yaml::from_str(include_str!("../../contour.example.yaml")).unwrap();
        assert_eq!(config, ContourConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config(Path::new("/definitely/not/here/contour.yaml"));
        assert!(result.is_err());
    }
}

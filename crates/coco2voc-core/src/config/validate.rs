//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.conversion.limit == Some(0) {
            return Err(ConfigError::ValidationError(
                "conversion.limit must be a positive integer".into(),
            ));
        }
        if self.conversion.start_id == 0 {
            return Err(ConfigError::ValidationError(
                "conversion.start_id must be > 0 (0 marks background)".into(),
            ));
        }
        if self.conversion.progress_interval == 0 {
            return Err(ConfigError::ValidationError(
                "conversion.progress_interval must be > 0".into(),
            ));
        }
        for (key, value) in [
            ("output.class_dir", &self.output.class_dir),
            ("output.instance_dir", &self.output.instance_dir),
            ("output.id_dir", &self.output.id_dir),
            ("output.manifest", &self.output.manifest),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{key} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

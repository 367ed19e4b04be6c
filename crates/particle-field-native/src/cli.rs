use clap::Parser;
use particle_field::{ConfigError, FieldConfig};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid config {}: {source}", path.display())]
    Config { path: PathBuf, source: ConfigError },
}

#[derive(Debug, Parser)]
#[command(name = "particle-field", version, about = "Preview the ambient particle field in a native window")]
pub struct Cli {
    /// JSON file with field configuration overrides
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the configured particle count
    #[arg(long)]
    pub particles: Option<usize>,

    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,

    #[arg(long, default_value_t = 720.0)]
    pub height: f32,
}

impl Cli {
    /// Defaults, then the config file, then command line overrides.
    ///
    /// # Errors
    /// See [`load_config`].
    pub fn field_config(&self) -> Result<FieldConfig, LoadError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => FieldConfig::default(),
        };
        if let Some(count) = self.particles {
            config.particle_count = count;
        }
        Ok(config)
    }
}

/// # Errors
/// Fails when the file cannot be read or does not hold a valid config.
pub fn load_config(path: &Path) -> Result<FieldConfig, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FieldConfig::from_json(&json).map_err(|source| LoadError::Config {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_without_flags() {
        let cli = Cli::try_parse_from(["particle-field"]).unwrap();
        assert_eq!(cli.field_config().unwrap(), FieldConfig::default());
        assert_eq!((cli.width, cli.height), (1280.0, 720.0));
        assert_eq!(cli.seed, None);
    }

    #[test]
    fn particle_override_applies() {
        let cli = Cli::try_parse_from(["particle-field", "--particles", "120", "--seed", "9"]).unwrap();
        assert_eq!(cli.field_config().unwrap().particle_count, 120);
        assert_eq!(cli.seed, Some(9));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let cli = Cli::try_parse_from(["particle-field", "--config", "/nonexistent/field.json"]).unwrap();
        let err = cli.field_config().unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/field.json"));
    }
}

//! The `coco2voc config` command for configuration management.

use std::path::Path;

use clap::{Args, Subcommand};
use coco2voc_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show {
        /// Print built-in defaults, ignoring any config file
        #[arg(long)]
        defaults: bool,
    },

    /// Show config file path
    Path,

    /// Write a config file with default conversion and output settings
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    let path = Config::default_path();

    match args.command {
        ConfigCommand::Show { defaults } => {
            let (config, source) = if defaults || !path.exists() {
                (Config::default(), None)
            } else {
                (Config::load_from(&path)?, Some(path.as_path()))
            };
            print!("{}", render(&config, source)?);
        }

        ConfigCommand::Path => {
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            init(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// TOML rendering headed by a comment naming where the values came from.
fn render(config: &Config, source: Option<&Path>) -> anyhow::Result<String> {
    let header = match source {
        Some(path) => format!("# Loaded from {}\n", path.display()),
        None => "# Built-in defaults\n".to_string(),
    };
    Ok(header + &config.to_toml()?)
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_names_source() {
        let config = Config::default();
        let text = render(&config, None).unwrap();
        assert!(text.starts_with("# Built-in defaults\n"));
        assert!(text.contains("[conversion]"));

        let text = render(&config, Some(Path::new("/tmp/c.toml"))).unwrap();
        assert!(text.starts_with("# Loaded from /tmp/c.toml\n"));
    }

    #[test]
    fn test_init_writes_loadable_file_and_respects_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        init(&path, false).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.output.id_dir, "id_labels");

        assert!(init(&path, false).is_err());
        assert!(init(&path, true).is_ok());
    }
}

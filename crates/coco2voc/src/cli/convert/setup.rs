//! Conversion setup: input checks and config overrides.

use std::path::PathBuf;

use coco2voc_core::config::expand_path;
use coco2voc_core::Config;

use super::ConvertArgs;

/// Everything `execute` needs, with paths expanded.
pub struct ConvertSetup {
    pub config: Config,
    pub annotations: PathBuf,
    pub target: PathBuf,
    pub report: Option<PathBuf>,
}

/// Validate input paths and fold CLI flags into the loaded config.
pub fn setup_conversion(args: &ConvertArgs, mut config: Config) -> anyhow::Result<ConvertSetup> {
    let annotations = expand_path(&args.annotations);
    if !annotations.is_file() {
        anyhow::bail!(
            "Annotation file does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            annotations
        );
    }

    let target = expand_path(&args.target);
    if target.is_file() {
        anyhow::bail!("Target {:?} is a file, expected a directory", target);
    }

    apply_overrides(&mut config, args);
    config.validate()?;

    let manifest = target.join(&config.output.manifest);
    if manifest.exists() {
        tracing::warn!(
            "Manifest {:?} already exists; converted ids will be appended to it",
            manifest
        );
    }

    Ok(ConvertSetup {
        config,
        annotations,
        target,
        report: args.report.as_deref().map(expand_path),
    })
}

/// CLI flags take precedence over config file values.
pub fn apply_overrides(config: &mut Config, args: &ConvertArgs) {
    if let Some(limit) = args.limit {
        config.conversion.limit = Some(limit);
    }
    if args.no_compress {
        config.conversion.compress = false;
    }
    if let Some(start_id) = args.start_id {
        config.conversion.start_id = start_id;
    }
    if args.skip_crowd {
        config.conversion.include_crowd = false;
    }
    if let Some(interval) = args.progress_interval {
        config.conversion.progress_interval = interval;
    }
    if let Some(colormap) = args.colormap {
        config.output.colormap = colormap.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::convert::types::ColormapArg;
    use coco2voc_core::Colormap;

    fn args(extra: &[&str]) -> ConvertArgs {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ConvertArgs,
        }

        let argv = ["coco2voc", "in.json", "out"].iter().chain(extra);
        Wrapper::try_parse_from(argv).unwrap().args
    }

    #[test]
    fn test_no_flags_keep_config_values() {
        let mut config = Config::default();
        config.conversion.limit = Some(7);
        config.conversion.compress = false;

        apply_overrides(&mut config, &args(&[]));

        assert_eq!(config.conversion.limit, Some(7));
        assert!(!config.conversion.compress);
        assert_eq!(config.conversion.start_id, 1);
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        let args = args(&[
            "-n",
            "5",
            "--no-compress",
            "--start-id",
            "40",
            "--skip-crowd",
            "--progress-interval",
            "10",
            "--colormap",
            "viridis",
        ]);
        assert_eq!(args.colormap, Some(ColormapArg::Viridis));

        apply_overrides(&mut config, &args);

        assert_eq!(config.conversion.limit, Some(5));
        assert!(!config.conversion.compress);
        assert_eq!(config.conversion.start_id, 40);
        assert!(!config.conversion.include_crowd);
        assert_eq!(config.conversion.progress_interval, 10);
        assert_eq!(config.output.colormap, Colormap::Viridis);
    }

    #[test]
    fn test_missing_annotation_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(&[]);
        args.annotations = dir.path().join("missing.json");
        args.target = dir.path().join("out");

        let err = setup_conversion(&args, Config::default()).err().unwrap();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_setup_expands_and_keeps_paths() {
        let dir = tempfile::tempdir().unwrap();
        let annotations = dir.path().join("instances.json");
        std::fs::write(&annotations, "{}").unwrap();
        let mut args = args(&["--report", "stats.json"]);
        args.annotations = annotations.clone();
        args.target = dir.path().join("out");

        let setup = setup_conversion(&args, Config::default()).unwrap();
        assert_eq!(setup.annotations, annotations);
        assert_eq!(setup.target, dir.path().join("out"));
        assert_eq!(setup.report, Some(PathBuf::from("stats.json")));
    }
}

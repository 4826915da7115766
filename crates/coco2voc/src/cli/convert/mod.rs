//! The `coco2voc convert` command.

mod setup;
mod summary;
pub mod types;

pub use types::ColormapArg;

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use coco2voc_core::{CocoIndex, Config, Converter, IdCounter};

use setup::setup_conversion;
use summary::{create_progress_bar, print_summary, write_report};
use types::parse_positive;

/// Arguments for the `convert` command.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// COCO annotation file (JSON)
    pub annotations: PathBuf,

    /// Output directory for label masks and the manifest
    pub target: PathBuf,

    /// Convert at most N annotated images
    #[arg(short = 'n', long, value_name = "N", value_parser = parse_positive)]
    pub limit: Option<usize>,

    /// Write id masks as uncompressed .npy instead of .npz
    #[arg(long)]
    pub no_compress: bool,

    /// First unique instance id (0 is background)
    #[arg(long, value_name = "ID", value_parser = clap::value_parser!(u64).range(1..))]
    pub start_id: Option<u64>,

    /// Drop crowd (iscrowd=1) annotations
    #[arg(long)]
    pub skip_crowd: bool,

    /// Colour map for instance masks
    #[arg(long, value_enum)]
    pub colormap: Option<ColormapArg>,

    /// Log progress every N converted images
    #[arg(long, value_name = "N", value_parser = parse_positive)]
    pub progress_interval: Option<usize>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Write run statistics as JSON to this file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

/// Execute the convert command.
pub fn execute(args: ConvertArgs, config: Config) -> anyhow::Result<()> {
    let setup = setup_conversion(&args, config)?;

    let index = CocoIndex::load(&setup.annotations)?;
    let converter = Converter::new(&setup.config);
    let total = converter.planned(&index);
    if total == 0 {
        tracing::warn!("No annotated images found in {:?}", setup.annotations);
    }

    let progress = create_progress_bar(total as u64, args.no_progress);
    let mut counter = IdCounter::new(setup.config.conversion.start_id);
    let start_time = Instant::now();

    let result = converter.run_with(&index, &setup.target, &mut counter, |p| {
        progress.inc(1);
        let elapsed = start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            progress.set_message(format!("{:.1} img/sec", p.converted as f64 / elapsed));
        }
    });
    progress.finish_and_clear();
    let stats = result?;

    print_summary(&stats);
    if let Some(report) = &setup.report {
        write_report(report, &stats)?;
        tracing::info!("Report written to {:?}", report);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: ConvertArgs,
    }

    fn parse(argv: &[&str]) -> Result<ConvertArgs, clap::Error> {
        let argv = ["coco2voc"].iter().chain(argv);
        Wrapper::try_parse_from(argv).map(|w| w.args)
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["instances.json", "voc"]).unwrap();
        assert_eq!(args.annotations, PathBuf::from("instances.json"));
        assert_eq!(args.target, PathBuf::from("voc"));
        assert_eq!(args.limit, None);
        assert!(!args.no_compress);
        assert_eq!(args.start_id, None);
        assert!(!args.skip_crowd);
        assert_eq!(args.colormap, None);
        assert!(args.report.is_none());
    }

    #[test]
    fn test_limit_must_be_positive_integer() {
        assert_eq!(parse(&["a.json", "out", "-n", "3"]).unwrap().limit, Some(3));
        assert!(parse(&["a.json", "out", "--limit", "0"]).is_err());
        assert!(parse(&["a.json", "out", "--limit", "ten"]).is_err());
        assert!(parse(&["a.json", "out", "--limit", "-1"]).is_err());
    }

    #[test]
    fn test_start_id_rejects_zero() {
        assert!(parse(&["a.json", "out", "--start-id", "0"]).is_err());
        assert_eq!(
            parse(&["a.json", "out", "--start-id", "9"]).unwrap().start_id,
            Some(9)
        );
    }

    #[test]
    fn test_unknown_colormap_is_rejected() {
        assert!(parse(&["a.json", "out", "--colormap", "jet"]).is_err());
    }

    #[test]
    fn test_execute_converts_and_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let annotations = dir.path().join("instances.json");
        std::fs::write(
            &annotations,
            r#"{"images": [{"id": 7, "width": 4, "height": 4}],
                "annotations": [{"id": 1, "image_id": 7, "category_id": 2,
                                 "segmentation": [[0, 0, 2, 0, 2, 2, 0, 2]]}],
                "categories": [{"id": 2, "name": "cat"}]}"#,
        )
        .unwrap();
        let target = dir.path().join("voc");
        let report = dir.path().join("report.json");

        let mut args = parse(&["x", "y", "--no-progress"]).unwrap();
        args.annotations = annotations;
        args.target = target.clone();
        args.report = Some(report.clone());
        execute(args, Config::default()).unwrap();

        assert!(target.join("class_labels").join("7.png").is_file());
        assert_eq!(
            std::fs::read_to_string(target.join("images_ids.txt")).unwrap(),
            "7\n"
        );
        let stats: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(report).unwrap()).unwrap();
        assert_eq!(stats["images_converted"], 1);
        assert_eq!(stats["next_id"], 2);
    }
}

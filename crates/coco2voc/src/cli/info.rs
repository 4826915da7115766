//! The `coco2voc info` command for inspecting annotation files.

use std::path::PathBuf;

use clap::Args;
use coco2voc_core::config::expand_path;
use coco2voc_core::{Coco2Voc, Config, DatasetSummary};

/// Arguments for the `info` command.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// COCO annotation file (JSON)
    pub annotations: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the info command.
pub fn execute(args: InfoArgs, config: Config) -> anyhow::Result<()> {
    let path = expand_path(&args.annotations);
    if !path.is_file() {
        anyhow::bail!("Annotation file does not exist: {:?}", path);
    }

    let summary = Coco2Voc::new(config).inspect(&path)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&summary));
    }
    Ok(())
}

fn render_summary(summary: &DatasetSummary) -> String {
    let without = summary.images.saturating_sub(summary.images_with_annotations);
    let mut out = format!(
        "Images:              {:>8}\n  \
         with annotations:  {:>8}\n  \
         without:           {:>8}\n\
         Annotations:         {:>8}\n  \
         crowd:             {:>8}\n",
        summary.images,
        summary.images_with_annotations,
        without,
        summary.annotations,
        summary.crowd_annotations
    );
    if summary.orphan_annotations > 0 {
        out.push_str(&format!("  orphan:            {:>8}\n", summary.orphan_annotations));
    }
    out.push_str(&format!("Categories:          {:>8}\n", summary.categories));
    for (id, name, count) in &summary.per_category {
        out.push_str(&format!("  {:>4}  {:<20} {:>8}\n", id, name, count));
    }
    out
}

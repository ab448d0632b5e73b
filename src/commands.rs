use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use log::{debug, info};

use crate::logging::init_logging;
use crate::record_processor::{ModContextProcessor, DEFAULT_BATCH_SIZE};
use crate::summarize::ModContextSummary;
use crate::writers::{JsonWriter, OutWriter};

#[derive(Args)]
pub struct ModContextHist {
    /// Input BAM/SAM/CRAM with MM and ML base modification tags.
    #[arg(short = 'i', long = "input", value_parser = existing_file)]
    in_bam: PathBuf,
    /// Output JSON file of per-context quality histograms.
    #[arg(short = 'o', long = "output")]
    out_json: PathBuf,
    /// Output strand-specific histograms instead of folding the reverse
    /// strand into the forward strand contexts.
    #[arg(long, default_value_t = false)]
    stranded: bool,
    /// Number of threads to use for decompression and accumulation.
    #[arg(short = 't', long, default_value_t = 4)]
    threads: usize,
    /// Number of records to read before handing them off for accumulation.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE, hide_short_help = true)]
    batch_size: usize,
    /// Overwrite the output file if it already exists.
    #[arg(long, default_value_t = false)]
    force: bool,
    /// Specify a file for debug logs to be written to, otherwise ignore them.
    #[arg(long)]
    log_filepath: Option<PathBuf>,
    /// Hide the progress spinner.
    #[arg(long, default_value_t = false)]
    suppress_progress: bool,
}

fn existing_file(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("file does not exist: {raw}"))
    }
}

impl ModContextHist {
    pub fn run(&self) -> anyhow::Result<()> {
        let _handle = init_logging(self.log_filepath.as_ref())?;
        if self.out_json.exists() && !self.force {
            bail!(
                "refusing to overwrite {}, use --force",
                self.out_json.display()
            );
        }
        if self.stranded {
            debug!("writing strand-specific histograms");
        }

        let processor = ModContextProcessor::new(
            self.threads,
            self.batch_size,
            self.suppress_progress,
        );
        let histograms = processor.process_path(&self.in_bam)?;
        let summary = ModContextSummary::new(&histograms, self.stranded);

        let mut writer = JsonWriter::from_path(&self.out_json, self.force)?;
        writer.write(&summary)?;
        info!(
            "done, {} calls written to {}",
            histograms.total_calls(),
            self.out_json.display()
        );
        Ok(())
    }
}

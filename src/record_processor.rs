use std::path::Path;
use std::thread;

use anyhow::{anyhow, Context};
use crossbeam_channel::bounded;
use log::{debug, info};
use rayon::prelude::*;
use rust_htslib::bam;
use rust_htslib::bam::Read;

use crate::histogram::ContextHistograms;
use crate::mod_calls::ModCallRecord;
use crate::monoid::Moniod;
use crate::util::{get_query_name_string, get_spinner};

pub const DEFAULT_BATCH_SIZE: usize = 10_000;
/// Batches allowed in flight between the reader and the accumulator.
const CHANNEL_CAPACITY: usize = 4;

/// Streams alignment records, pulling the modification calls out on the
/// reading thread and accumulating batches of them on a rayon pool. The
/// scan stops at the first record that cannot be read.
pub struct ModContextProcessor {
    threads: usize,
    batch_size: usize,
    suppress_progress: bool,
}

impl ModContextProcessor {
    pub fn new(
        threads: usize,
        batch_size: usize,
        suppress_progress: bool,
    ) -> Self {
        Self {
            threads: threads.max(1),
            batch_size: batch_size.max(1),
            suppress_progress,
        }
    }

    pub fn process_path<P: AsRef<Path>>(
        &self,
        in_bam: P,
    ) -> anyhow::Result<ContextHistograms> {
        let in_bam = in_bam.as_ref();
        let mut reader = bam::Reader::from_path(in_bam).with_context(|| {
            format!("failed to open alignments {}", in_bam.display())
        })?;
        reader
            .set_threads(self.threads)
            .context("failed to set threads on reader")?;
        self.process_records(reader.records())
    }

    pub fn process_records<I>(
        &self,
        records: I,
    ) -> anyhow::Result<ContextHistograms>
    where
        I: Iterator<Item = Result<bam::Record, rust_htslib::errors::Error>>,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()?;
        let (snd, rx) = bounded::<Vec<ModCallRecord>>(CHANNEL_CAPACITY);

        let accumulator = thread::spawn(move || {
            let mut agg = ContextHistograms::zero();
            for batch in rx {
                let part = pool.install(|| {
                    batch
                        .par_iter()
                        .fold(ContextHistograms::zero, |mut acc, record| {
                            acc.add_record(record);
                            acc
                        })
                        .reduce(ContextHistograms::zero, |a, b| a.op(b))
                });
                agg.op_mut(part);
            }
            agg
        });

        let spinner = get_spinner(self.suppress_progress);
        spinner.set_message("records processed");
        let mut num_failed = 0u64;
        let mut batch = Vec::with_capacity(self.batch_size);
        let mut read_result = Ok(());
        for result in records {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    read_result =
                        Err(anyhow!("failed reading alignment record, {e}"));
                    break;
                }
            };
            spinner.inc(1);
            match ModCallRecord::from_bam_record(&record) {
                Ok(mod_call_record) => batch.push(mod_call_record),
                Err(e) => {
                    let name = get_query_name_string(&record)
                        .unwrap_or("'UTF-8 decode failure'".to_string());
                    debug!("{name}: {e}");
                    num_failed += 1;
                }
            }
            if batch.len() >= self.batch_size {
                let full = std::mem::replace(
                    &mut batch,
                    Vec::with_capacity(self.batch_size),
                );
                if snd.send(full).is_err() {
                    read_result = Err(anyhow!("accumulator stopped early"));
                    break;
                }
            }
        }
        if read_result.is_ok()
            && !batch.is_empty()
            && snd.send(batch).is_err()
        {
            read_result = Err(anyhow!("accumulator stopped early"));
        }
        drop(snd);
        spinner.finish_and_clear();

        let mut histograms = accumulator
            .join()
            .map_err(|_| anyhow!("accumulator thread panicked"))?;
        read_result?;
        histograms.add_failed_records(num_failed);

        let counts = histograms.counts();
        info!(
            "processed {} records, {} with modification calls, {} used, {} \
             failed",
            counts.num_records,
            counts.num_records_with_calls,
            counts.num_records_used,
            counts.num_records_failed
        );
        info!(
            "used {} positions, skipped {} without a valid context and {} \
             missing a paired call",
            counts.num_positions_used,
            counts.num_invalid_context,
            counts.num_unpaired
        );
        Ok(histograms)
    }
}

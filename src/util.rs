use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rust_htslib::bam;
use std::string::FromUtf8Error;

pub(crate) fn get_query_name_string(
    record: &bam::Record,
) -> Result<String, FromUtf8Error> {
    String::from_utf8(record.qname().to_vec())
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Default)]
pub enum Strand {
    #[default]
    Positive,
    Negative,
}

impl Strand {
    pub fn from_record(record: &bam::Record) -> Self {
        if record.is_reverse() {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Strand::Positive => '+',
            Strand::Negative => '-',
        }
    }
}

pub(crate) fn get_spinner(suppress: bool) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if suppress {
        spinner.set_draw_target(ProgressDrawTarget::hidden());
    }
    let style = ProgressStyle::with_template(
        "{spinner:.blue} {msg} [{elapsed_precise}] {pos}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_spinner())
    .tick_strings(&[
        "▹▹▹▹▹",
        "▸▹▹▹▹",
        "▹▸▹▹▹",
        "▹▹▸▹▹",
        "▹▹▹▸▹",
        "▹▹▹▹▸",
        "▪▪▪▪▪",
    ]);
    spinner.set_style(style);
    spinner
}

use anyhow::Context;
use log::{debug, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::threshold::ThresholdFilter;
use log4rs::{Config, Handle};
use std::path::PathBuf;

/// Info and above go to stderr, everything goes to the log file when one is
/// given.
pub fn init_logging(log_fp: Option<&PathBuf>) -> anyhow::Result<Handle> {
    let level = LevelFilter::Info;

    let file_encoder = Box::new(PatternEncoder::new(
        "[{f}::{L}][{d(%Y-%m-%d %H:%M:%S)}][{l}] {m}{n}",
    ));
    let console_encoder = Box::new(PatternEncoder::new("{h(>)} {m}{n}"));
    let stderr = ConsoleAppender::builder()
        .encoder(console_encoder)
        .target(Target::Stderr)
        .build();

    let mut config = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(level)))
            .build("stderr", Box::new(stderr)),
    );
    let mut root_logger = Root::builder().appender("stderr");
    if let Some(fp) = log_fp {
        let logfile = FileAppender::builder()
            .encoder(file_encoder)
            .build(fp)
            .with_context(|| {
                format!("failed to open log file {}", fp.display())
            })?;
        config = config
            .appender(Appender::builder().build("logfile", Box::new(logfile)));
        root_logger = root_logger.appender("logfile");
    }
    let config = config
        .build(root_logger.build(LevelFilter::Trace))
        .context("invalid logging configuration")?;

    let handle =
        log4rs::init_config(config).context("failed to init logging")?;
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");
    debug!("command line: {command_line}");
    Ok(handle)
}

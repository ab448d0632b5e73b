pub mod commands;
pub mod errs;
pub mod histogram;
pub mod logging;
pub mod mod_base_code;
pub mod mod_calls;
pub mod monoid;
pub mod record_processor;
pub mod summarize;
pub mod writers;

mod util;

pub use util::Strand;

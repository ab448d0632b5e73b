use clap::{CommandFactory, Parser};
use nanopore_mods::commands::ModContextHist;

#[derive(Parser)]
#[command(version)]
#[command(term_width = 80)]
/// Histograms of 5mC and 5hmC call qualities by the base following the
/// modified cytosine, from MM/ML tagged alignments.
struct Cli {
    #[command(flatten)]
    command: ModContextHist,
}

fn main() -> Result<(), String> {
    // bare invocation is a request for usage, not an error
    if std::env::args_os().len() < 2 {
        return Cli::command()
            .print_help()
            .map_err(|e| format!("failed to print help, {e}"));
    }
    let cli = Cli::parse();
    unsafe {
        rust_htslib::htslib::hts_set_log_level(
            rust_htslib::htslib::htsLogLevel_HTS_LOG_OFF,
        );
    }
    if let Err(err) = cli.command.run() {
        eprintln!("> Error! {err}");
        for cause in err.chain().skip(1) {
            eprintln!(" caused by {cause}")
        }
        std::process::exit(1);
    }
    Ok(())
}

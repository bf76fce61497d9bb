use clap::Parser;
use log::{debug, warn};

mod args;
mod table;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::init();
    }

    debug!("args: {:?}", args);

    match table::run_analysis(&args) {
        Ok(outcome) => {
            debug!(
                "scores: {:?} ranks: {:?}",
                outcome.result.scores, outcome.result.ranks
            );
            println!(
                "Result file saved successfully at: {}",
                outcome.output_path.display()
            );
        }
        Err(e) => {
            warn!("Error occured {:?}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

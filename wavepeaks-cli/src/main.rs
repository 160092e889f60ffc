//! # Wavepeaks
//!
//! Command-line front end for generating, plotting and browsing waveform
//! peak data.

use log::error;

mod cli;
mod controls;
mod logging;
mod runner;
mod ui;
mod viewer;

fn main() {
    dotenv::dotenv().ok();

    let args = cli::args::build_cli().get_matches();
    let log_buffer = logging::init(args.get_flag("quiet"));

    let code = match runner::run(&args, log_buffer) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            1
        }
    };

    std::process::exit(code)
}

//! Treescope CLI Binary
//!
//! Command-line interface for replaying render-pass scenarios and
//! inspecting the encoded commit stream.

use clap::Parser;
use std::process;
use treescope::cli::{Cli, CliContext};

fn main() {
    let cli = Cli::parse();

    let context = match CliContext::new(cli.log_level.clone(), cli.log_format.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error initializing logging: {}", e);
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

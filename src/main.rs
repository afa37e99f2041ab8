//! forkshell entry point.
//!
//! With no argument, reads commands from stdin and prints a prompt before
//! each one. With a single file argument, runs the file as a batch script
//! without prompts. Anything else is a usage error.

use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use forkshell::config::Config;
use forkshell::{ShellState, logging};

fn main() -> ExitCode {
    let config = Config::load();
    logging::init(&config.logging);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut state = match args.as_slice() {
        [] => ShellState::interactive(&config),
        [path] => match File::open(path) {
            Ok(file) => ShellState::batch(BufReader::new(file), &config),
            Err(e) => {
                log::error!("cannot open batch file {path}: {e}");
                println!("Failed to open file '{path}'!");
                println!("Exiting...");
                return ExitCode::FAILURE;
            }
        },
        _ => {
            println!("Error: Invalid number of arguments!");
            println!("Exiting...");
            return ExitCode::FAILURE;
        }
    };

    log::info!("[{}] forkshell started", std::process::id());
    match forkshell::run(&mut state) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

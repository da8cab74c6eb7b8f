use clap::{ErrorKind, Parser};
use log::{debug, LevelFilter};
use std::ffi::OsString;

mod args;
mod topsis;

use crate::args::Args;

const USAGE: &str = "Usage: topsis <InputDataFile> <Weights> <Impacts> <ResultFileName>";
const EXAMPLE: &str = "Example: topsis data.csv \"1,1,1,2\" \"+,+,-,+\" result.csv";

fn init_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }
}

fn print_usage() {
    println!("{}", USAGE);
    println!("{}", EXAMPLE);
}

/// Parses the command line. Parsing errors print the usage message and return None.
fn parse_args<I, T>(raw: I) -> Option<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(raw) {
        Ok(args) => Some(args),
        Err(e) if matches!(
            e.kind(),
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
        ) =>
        {
            e.exit()
        }
        Err(e) => {
            println!("{}", e.kind());
            print_usage();
            None
        }
    }
}

fn main() {
    let args = match parse_args(std::env::args_os()) {
        Some(args) => args,
        None => return,
    };
    init_logging(args.verbose);
    debug!("args: {:?}", args);

    // Without a configuration file, the four positional arguments are required.
    // With one, they are either all given or all omitted.
    let positional_ok = match args.positional().len() {
        4 => true,
        0 => args.config.is_some(),
        _ => false,
    };
    if !positional_ok {
        print_usage();
        return;
    }

    match topsis::run(&args) {
        Ok(params) if params.output_file == "stdout" => {}
        Ok(params) => println!("Results saved to {}", params.output_file),
        Err(e) if e.is_input_error() => println!("Error: {}", e),
        Err(e) => println!("An unexpected error occurred: {}", e),
    }
}

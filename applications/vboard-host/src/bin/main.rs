//! Host console for the vboard dispatcher.
//!
//! Reads command lines from stdin and dispatches them. Help output goes to
//! the configured named pipe, so start the reader first:
//!
//! ```text
//! mkfifo /tmp/pipe_rx && cat /tmp/pipe_rx | tr '\0' '\n' &
//! vboard-host [options.json]
//! ```

use std::io::{self, BufRead, Write as _};
use std::process::ExitCode;

use vboard::cli::{Cli, CommandId, Options};

fn console(text: &str) {
    print!("{}", text);
    let _ = io::stdout().flush();
}

fn load_options() -> Result<Options, String> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(Options::default());
    };
    let json = std::fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
    Options::from_json(&json).map_err(|e| format!("{path}: {e}"))
}

fn main() -> ExitCode {
    let options = match load_options() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("vboard-host: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut cli = Cli::from_options(options);
    cli.set_output_function(console);

    cli.bind(CommandId::SetInstance, |_argc, argv: &[&str]| {
        match argv[0].parse::<u8>() {
            Ok(ecu_type) => println!(
                "instance: type={} identity={} instance={}",
                ecu_type, argv[1], argv[2]
            ),
            Err(_) => println!("instance: invalid ECU type {:?}", argv[0]),
        }
    });

    for line in io::stdin().lock().lines() {
        match line {
            Ok(line) => {
                let _ = cli.dispatch(&line);
            }
            Err(err) => {
                eprintln!("vboard-host: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

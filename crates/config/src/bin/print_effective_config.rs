//! Print the effective logger options (defaults + env overrides) as JSON.

use logport_config::{LoggerEnv, LoggerOptions, apply_env_overrides, to_pretty_json};
use std::io;
use std::io::Write;

fn main() -> std::process::ExitCode {
    match run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::ExitCode::from(1)
        },
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let env = LoggerEnv::from_std_env()?;
    let options = apply_env_overrides(LoggerOptions::default(), &env)?;
    let output = to_pretty_json(&options)?;

    let mut stdout = io::stdout();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

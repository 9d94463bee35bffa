use clap::Parser;
use jtac::driver::{init_logging, DriverError};
use jtac::{Config, Driver};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    let mut driver = Driver::new(config);

    match driver.run() {
        Ok(summary) => ExitCode::from(summary.exit_code() as u8),
        Err(err @ DriverError::Syntax { .. }) => {
            eprint!("{}", err);
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(1)
        }
    }
}

//! Command-line interface entry point for leakhound.

use std::process::ExitCode;

use leakhound::entry_point;

fn main() -> ExitCode {
    // Delegate to the shared entry point; avoid std::process::exit() so
    // destructors and output flushing run normally.
    match entry_point::run_with_args(std::env::args().skip(1).collect()) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

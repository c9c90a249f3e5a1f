//! Assetbuild - Command-line tool for building game assets into a platform cache

use std::process::ExitCode;

use assetbuild::cli;

fn main() -> ExitCode {
    cli::run()
}

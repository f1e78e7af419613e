use clap::Parser;
use std::path::PathBuf;

/// User-specified command line parameters
#[derive(Debug, Parser)]
#[clap(name = "salieri_dump", about)]
pub struct Args {
    /// Path of the scene2.bin file to decode.
    pub input: PathBuf,

    #[clap(long, short = 'v')]
    /// Enables trace output, including the light map diagnostics.
    pub verbose: bool,
}

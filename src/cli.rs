//! Command-line arguments, mirroring `banner::cli`'s small `clap`-derived
//! surface (tracing format + a bind-port override).

use clap::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TracingFormat {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "schedgen", about = "Weekly class schedule generator")]
pub struct Args {
    /// Log output format.
    #[arg(long, value_enum, default_value = "pretty")]
    pub tracing: TracingFormat,

    /// Override the configured bind port.
    #[arg(long)]
    pub port: Option<u16>,
}

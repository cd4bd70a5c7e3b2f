//! CLI entry point for tiling filters and activations into grid images

use clap::Parser;
use filtergrid::io::cli::{Cli, CommandRunner};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> filtergrid::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_filter().into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    CommandRunner::new(cli).run()
}

mod app;
mod config_path;
mod output;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hostprep",
    about = "Interactive bootstrap menu for RHEL-family hosts",
    version
)]
struct Cli {
    /// Config file (default: ~/.config/hostprep/config.yaml when present)
    #[arg(long, env = "HOSTPREP_CONFIG")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = config_path::resolve_config(cli.config.as_deref());
    if let Err(e) = app::run(config.as_deref()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

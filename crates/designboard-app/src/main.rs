//! Main application entry point.

use clap::Parser;
use designboard_app::CliArgs;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting designboard");

    let args = CliArgs::parse();
    let stdout = std::io::stdout();
    designboard_app::run(args, &mut stdout.lock())
}

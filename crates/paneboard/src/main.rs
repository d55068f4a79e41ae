mod ansi;
mod app;
mod config;
mod keymap;
mod logging;
#[cfg(test)]
mod test_utils;
mod tmux;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "paneboard")]
#[command(about = "Dashboard for jobs running in tmux sessions", long_about = None)]
struct Cli {
    /// Job document to load (created with a template if missing).
    #[arg(long, short, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    logging::init_logging();
    app::run(&cli.config)
}

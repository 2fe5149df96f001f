//! softswitch entry point

mod args;

use clap::Parser;
use tracing::info;

use args::{Cli, Commands};
use softswitch_bridge::Switch;
use softswitch_core::{available_interfaces, DataLinkPorts, Error, Result, SwitchConfig};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(Commands::Interfaces) = cli.command {
        for (name, mac) in available_interfaces() {
            println!("{:<16} {}", name, mac);
        }
        return Ok(());
    }

    let switch_id = cli
        .switch_id
        .ok_or_else(|| Error::config("missing switch id"))?;
    let interfaces = cli.interfaces;

    let config = SwitchConfig::load(&cli.config_dir, &switch_id)?;
    info!(
        "switch {} priority {} with {} configured interfaces",
        switch_id,
        config.priority,
        config.interfaces.len()
    );

    let link = DataLinkPorts::open(&interfaces)?;
    let switch = Switch::new(&config, link)?;
    switch.run().await
}

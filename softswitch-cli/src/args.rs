//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "softswitch")]
#[command(version, about = "Software Ethernet switch with VLANs and spanning tree", long_about = None)]
#[command(subcommand_negates_reqs = true)]
pub struct Cli {
    /// Switch identifier, selects configs/switch<ID>.cfg
    #[arg(value_name = "SWITCH_ID", required = true)]
    pub switch_id: Option<String>,

    /// Interfaces to attach, in port order (port 0 first)
    #[arg(value_name = "IFACE", required = true)]
    pub interfaces: Vec<String>,

    /// Directory holding the switch configuration files
    #[arg(short, long, default_value = "configs")]
    pub config_dir: PathBuf,

    /// Verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available network interfaces
    Interfaces,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_invocation() {
        let cli = Cli::parse_from(["softswitch", "0", "veth0", "veth1", "-vv"]);
        assert_eq!(cli.switch_id.as_deref(), Some("0"));
        assert_eq!(cli.interfaces, vec!["veth0", "veth1"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config_dir, PathBuf::from("configs"));
    }

    #[test]
    fn test_parse_interfaces_subcommand() {
        let cli = Cli::parse_from(["softswitch", "interfaces"]);
        assert!(matches!(cli.command, Some(Commands::Interfaces)));
    }
}

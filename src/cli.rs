//! Command-line interface definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Terminal product configurator for industrial pipeline strainers
#[derive(Debug, Parser)]
#[command(name = "strainsel", version, about, long_about = None)]
pub struct Cli {
    /// Catalog JSON file; the built-in demo catalog is used when omitted
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// File to append accepted quotation requests to
    #[arg(long, global = true)]
    pub order_log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a catalog JSON file and exit
    Validate {
        /// Path to the catalog file to check
        #[arg(long)]
        catalog: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_validate_subcommand_parses() {
        let cli = Cli::try_parse_from(["strainsel", "validate", "--catalog", "products.json"])
            .unwrap();
        assert!(matches!(cli.command, Some(Commands::Validate { .. })));
    }

    #[test]
    fn test_global_flags_parse() {
        let cli = Cli::try_parse_from([
            "strainsel",
            "--catalog",
            "products.json",
            "--order-log",
            "orders.log",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.catalog.unwrap().to_str(), Some("products.json"));
        assert_eq!(cli.order_log.unwrap().to_str(), Some("orders.log"));
    }
}

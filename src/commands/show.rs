//! Show command - displays information.

use anyhow::Result;

use crate::config::Config;
use crate::oracle::HostOracle;

/// Show target for the show command.
pub enum ShowTarget {
    /// Effective configuration and detected package backends
    Config,
}

/// Execute the show command.
pub fn cmd_show(target: ShowTarget, config: &Config) -> Result<()> {
    match target {
        ShowTarget::Config => {
            config.print();
            let available: Vec<_> = HostOracle::from_config(config)
                .available_backends()
                .iter()
                .map(|b| b.program())
                .collect();
            if available.is_empty() {
                println!("  Package backends found: none");
            } else {
                println!("  Package backends found: {}", available.join(", "));
            }
        }
    }
    Ok(())
}

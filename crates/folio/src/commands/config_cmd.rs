//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", super::config_file(global).display());
            Ok(())
        }
        ConfigCommand::Show => {
            let config = super::load(global)?;
            // Surface validation problems before printing.
            super::widgets_config(&config, global)?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

use std::path::PathBuf;

use clap::Subcommand;
use usersignal_core::CoreConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective config as JSON
    Show {
        /// TOML config path (defaults if missing)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Write a default config file
    Init {
        /// Destination path
        path: PathBuf,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show { path } => {
            let config = match path {
                Some(p) => CoreConfig::load_or_default(&p)?,
                None => CoreConfig::default(),
            };
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Init { path } => {
            let config = CoreConfig::default();
            config.save(&path)?;
            println!("config written to {}", path.display());
        }
    }
    Ok(())
}

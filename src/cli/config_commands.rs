use std::path::Path;

use crate::cli::commands::ConfigCommand;
use crate::config::Config;
use crate::error::RolodexResult;

pub fn handle(config: &Config, config_path: &Path, cmd: ConfigCommand) -> RolodexResult<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                show(config);
            }
        }
        ConfigCommand::Path => {
            println!("{}", config_path.display());
        }
        ConfigCommand::Set { key, value } => {
            let mut updated = config.clone();
            updated.set(&key, &value)?;
            updated.save(config_path)?;
            println!("Set {} in {}", key, config_path.display());
        }
        ConfigCommand::Reset { yes } => {
            if yes {
                Config::default().save(config_path)?;
                println!("Configuration reset to defaults.");
            } else {
                println!("This will reset all configuration to defaults.");
                println!("Use --yes to confirm.");
            }
        }
    }
    Ok(())
}

fn show(config: &Config) {
    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("[Storage]");
    println!("  Database path:  {}", config.database_path().display());
    println!("  Owner:          {}", config.storage.owner);
    println!();
    println!("[Display]");
    println!("  View:           {}", config.display.view);
    println!("  Sort:           {} ({})", config.display.sort.sort().name, config.display.sort);
    println!("  Hint:           {}", config.display.hint);
    println!("  DMR lookup:     {}", config.display.dmr_lookup);
    println!();
    println!("[Export]");
    println!("  Format:         {}", config.export.format);
    println!();
    println!("Settable keys: {}", Config::KEYS.join(", "));
}

use clap::Subcommand;
use serde_json::{json, Value};
use teamroom_core::{ApiResponse, Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dotted key (e.g. "poker.stale_after_secs", "share.base_url")
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a config value; the result must still validate
    Set {
        /// Dotted key
        key: String,
        /// New value (JSON for lists, e.g. '["1","2","3","?"]')
        value: String,
    },
    /// List every setting as `key = value`
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the config file location
    Path,
    /// Reset config to defaults
    Reset,
}

/// Flatten nested tables into dotted `key = value` lines.
fn flatten(prefix: &str, value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        leaf => out.push(format!("{prefix} = {leaf}")),
    }
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key, json } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| ConfigError::UnknownKey(key.clone()))?;
            if json {
                let body = json!({ "key": key, "value": value });
                println!("{}", serde_json::to_string_pretty(&ApiResponse::ok(body))?);
            } else {
                println!("{value}");
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            let before = config.get(&key);
            config.set(&key, &value)?;
            let after = config.get(&key).unwrap_or(value);
            match before {
                Some(before) if before != after => println!("{key}: {before} -> {after}"),
                _ => println!("{key}: {after} (unchanged)"),
            }
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ApiResponse::ok(&config))?);
            } else {
                let mut lines = Vec::new();
                flatten("", &serde_json::to_value(&config)?, &mut lines);
                for line in lines {
                    println!("{line}");
                }
            }
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

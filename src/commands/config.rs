use crate::cli::ConfigAction;
use crate::config::Config;
use anyhow::Context;
use serde_json::json;
use std::path::Path;

pub fn handle_config_action(
    action: ConfigAction,
    config_path: Option<&Path>,
    json_output: bool,
) -> anyhow::Result<()> {
    let path = Config::resolve_path(config_path)?;

    match action {
        ConfigAction::Init => {
            Config::default()
                .save_to(&path)
                .context("Failed to initialize config")?;
            if json_output {
                println!(
                    "{}",
                    json!({
                        "status": "success",
                        "message": "Configuration initialized successfully",
                        "path": path.display().to_string(),
                    })
                );
            } else {
                println!("Configuration initialized at: {}", path.display());
            }
        }
        ConfigAction::Show => {
            let config = Config::load_from(Some(&path)).context("Failed to load config")?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("Configuration ({})", path.display());
                println!("{}", toml_str);
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(Some(&path)).context("Failed to load config")?;
            config
                .set_value(&key, &value)
                .context("Invalid configuration")?;
            config.save_to(&path).context("Failed to save config")?;
            if json_output {
                println!(
                    "{}",
                    json!({
                        "status": "success",
                        "message": format!("Configuration updated: {key} = {value}"),
                    })
                );
            } else {
                println!("Configuration updated: {} = {}", key, value);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_then_set() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        handle_config_action(ConfigAction::Init, Some(&path), true).unwrap();
        assert_eq!(Config::load_from(Some(&path)).unwrap(), Config::default());

        handle_config_action(
            ConfigAction::Set {
                key: "pricing.overrides.gpt-4o.input".to_string(),
                value: "2".to_string(),
            },
            Some(&path),
            true,
        )
        .unwrap();
        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.pricing.overrides["gpt-4o"].input, 2.0);
    }

    #[test]
    fn test_set_invalid_value_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        handle_config_action(ConfigAction::Init, Some(&path), false).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = handle_config_action(
            ConfigAction::Set {
                key: "output.format".to_string(),
                value: "xml".to_string(),
            },
            Some(&path),
            false,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("Invalid output format"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }
}

//! Print or save the effective configuration.

use std::path::Path;

use flowbeat_common::AppConfig;

pub fn run(config: &AppConfig, save: bool, path: Option<&Path>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    println!();

    let target = path
        .map(Path::to_path_buf)
        .unwrap_or_else(flowbeat_common::config_file_path);
    if save {
        match path {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
        println!("Saved config to {}", target.display());
    } else {
        println!("Config file: {}", target.display());
    }
    Ok(())
}

//! Config command handler: show effective configuration.

use anyhow::Result;

use crate::app_config::LoadedConfig;
use crate::cli::HttpArgs;

pub fn run_config_show_command(loaded_config: &LoadedConfig) -> Result<()> {
    let config = &loaded_config.config;
    let columns = config.coverage_columns();
    let http = config.http_settings(&HttpArgs::default());

    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded_config.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!(
        "sheet_key = {}",
        config.sheet_key.as_deref().unwrap_or("<unset>")
    );
    println!("isbn_column = {}", columns.isbn);
    println!("station_column = {}", columns.station_name);
    println!("url_column = {}", columns.url);
    println!(
        "headline_column = {}",
        columns.headline.as_deref().unwrap_or("<none>")
    );
    println!(
        "book_title_column = {}",
        columns.book_title.as_deref().unwrap_or("<none>")
    );
    println!(
        "on_fetch_failure = {}",
        config.on_fetch_failure.unwrap_or_default()
    );
    println!("connect_timeout_secs = {}", http.connect_timeout_secs);
    println!("read_timeout_secs = {}", http.read_timeout_secs);

    Ok(())
}

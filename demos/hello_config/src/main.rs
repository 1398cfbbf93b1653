//! Loads the demo configuration and prints the merged values as JSON.

use std::io::Write;

use hello_config::{CONFIG_FILE_VAR, DEFAULT_CONFIG_FILE, load_with};
use layerconf::LayeredMerge;
use tracing_subscriber::EnvFilter;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_file =
        std::env::var(CONFIG_FILE_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_owned());
    let loaded = load_with(&config_file, std::env::args().skip(1))?;
    let rendered = layerconf::serde_json::to_string_pretty(&loaded.settings().to_value())?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

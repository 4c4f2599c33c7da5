//! Config command - print the effective configuration

use crate::app::App;
use anyhow::Result;

pub fn run(app: &App) -> Result<()> {
    if app.is_json() {
        return app.print_json(&app.config.schema);
    }

    if let Some(path) = &app.config.path {
        println!("# Loaded from {}", path.display());
    } else {
        println!("# Built-in defaults");
    }
    print!("{}", app.config.to_toml()?);
    Ok(())
}

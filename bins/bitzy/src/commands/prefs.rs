//! Prefs command - show or change the veg-only switch

use crate::app::App;
use anyhow::Result;
use bitzy_cli::{yes_no, Status};
use bitzy_menu::PreferenceStore;
use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
    Toggle,
}

#[derive(Args, Debug)]
pub struct PrefsArgs {
    /// Change the veg-only preference
    #[arg(long, value_enum)]
    pub veg_only: Option<Switch>,
}

pub fn run(app: &App, args: PrefsArgs) -> Result<()> {
    let prefs = PreferenceStore::new(app.store());
    let current = match args.veg_only {
        Some(Switch::On) => prefs.set_veg_only(true)?,
        Some(Switch::Off) => prefs.set_veg_only(false)?,
        Some(Switch::Toggle) => prefs.toggle_veg_only()?,
        None => prefs.load(),
    };

    if app.is_json() {
        return app.print_json(&current);
    }
    Status::field("Veg only", yes_no(current.veg_only));
    Ok(())
}

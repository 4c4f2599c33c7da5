//! Set-location command - choose the delivery location by hand

use super::locate::LocationReport;
use crate::app::App;
use anyhow::Result;
use bitzy_geo::Coordinate;
use bitzy_location::{DeliveryLocation, FixedDevice, LocationCache, LocationResolver, Offline};
use clap::Args;

#[derive(Args, Debug)]
pub struct SetLocationArgs {
    /// Use the depot location from the configuration
    #[arg(long, conflicts_with_all = ["name", "area", "lat", "lon"])]
    pub default: bool,

    /// Place name shown in the header
    #[arg(long, required_unless_present = "default")]
    pub name: Option<String>,

    /// Area or city shown under the name
    #[arg(long, required_unless_present = "default")]
    pub area: Option<String>,

    /// Latitude
    #[arg(long, required_unless_present = "default", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude
    #[arg(long, required_unless_present = "default", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

pub fn run(app: &App, args: SetLocationArgs) -> Result<()> {
    let choice = match args {
        SetLocationArgs {
            name: Some(name),
            area: Some(area),
            lat: Some(lat),
            lon: Some(lon),
            ..
        } => Some(DeliveryLocation::new(name, area, Coordinate::new(lat, lon))),
        _ => None,
    };
    apply(app, choice)?.print(app)
}

/// Commits `location` (or the configured default) as a manual choice
///
/// The choice is persisted through the location cache.
pub fn apply(app: &App, location: Option<DeliveryLocation>) -> Result<LocationReport> {
    let settings = app.resolver_settings()?;
    let cache = LocationCache::from_config(app.store(), &app.config.schema.location);
    let resolver = LocationResolver::init(settings, FixedDevice::Unsupported, Offline, Offline, cache);

    match location {
        Some(location) => resolver.set_manual_location(location)?,
        None => resolver.set_default_location()?,
    }

    Ok(LocationReport::new(&resolver.state(), resolver.service_area(), false))
}

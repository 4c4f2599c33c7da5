//! Locate command - run startup resolution and report the delivery location

use crate::app::{App, SharedStore};
use anyhow::Result;
use bitzy_cli::{format_distance, progress, yes_no, Status};
use bitzy_geo::{Coordinate, ServiceArea};
use bitzy_location::{
    DeliveryLocation, FixedDevice, IpLocator, LocationCache, LocationResolver, LocationState,
    LocationStatus, Offline, ResolverSettings, ReverseGeocoder,
};
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Device latitude (simulates a granted location prompt)
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Device longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Simulate a refused location prompt (skips the IP lookup)
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub deny: bool,

    /// Ignore a fresh cached location and resolve again
    #[arg(long)]
    pub refresh: bool,

    /// Skip reverse geocoding and IP lookup
    #[arg(long)]
    pub offline: bool,
}

pub async fn run(app: &App, args: LocateArgs) -> Result<()> {
    let settings = app.resolver_settings()?;
    let device = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => FixedDevice::Position(Coordinate::checked(lat, lon)?),
        _ if args.deny => FixedDevice::Denied,
        _ => FixedDevice::Unsupported,
    };
    let cache = LocationCache::from_config(app.store(), &app.config.schema.location);

    let timer = bitzy_telemetry::Timer::start("locate");
    let report = if args.offline {
        resolve(settings, device, Offline, Offline, cache, args.refresh).await
    } else {
        let client = app.geo_client()?;
        let spinner = progress::spinner("Finding your location...");
        let report = resolve(
            settings,
            device,
            client.ip_lookup(),
            client.nominatim(),
            cache,
            args.refresh,
        )
        .await;
        progress::finish_clear(&spinner);
        report
    };
    timer.stop();

    report.print(app)
}

async fn resolve<I, R>(
    settings: ResolverSettings,
    device: FixedDevice,
    ip: I,
    geocoder: R,
    cache: LocationCache<SharedStore>,
    refresh: bool,
) -> LocationReport
where
    I: IpLocator,
    R: ReverseGeocoder,
{
    let resolver = LocationResolver::init(settings, device, ip, geocoder, cache);
    let state = if refresh {
        resolver.request_location().await
    } else {
        resolver.start().await
    };
    let report = LocationReport::new(&state, resolver.service_area(), resolver.restored_from_cache());
    resolver.teardown();
    report
}

/// What the storefront header and gate would show
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationReport {
    pub status: LocationStatus,
    pub location: Option<DeliveryLocation>,
    pub distance_km: Option<f64>,
    pub can_deliver: bool,
    pub gated: bool,
    pub needs_advisory: bool,
    pub from_cache: bool,
    #[serde(skip)]
    radius_km: f64,
}

impl LocationReport {
    pub fn new(state: &LocationState, area: &ServiceArea, from_cache: bool) -> Self {
        Self {
            status: state.status,
            location: state.location.clone(),
            distance_km: state.distance_km(area),
            can_deliver: state.can_deliver(area),
            gated: state.is_gated(),
            needs_advisory: state.needs_advisory(area),
            from_cache,
            radius_km: area.radius_km(),
        }
    }

    pub fn print(&self, app: &App) -> Result<()> {
        if app.is_json() {
            return app.print_json(self);
        }

        Status::header("Delivery location");
        Status::field("Status", self.status);
        match &self.location {
            Some(location) => {
                Status::field("Location", format!("{}, {}", location.display_name, location.area));
                Status::field("Coordinates", location.coordinate);
            }
            None => Status::field("Location", "none"),
        }
        if let Some(km) = self.distance_km {
            Status::field("Distance", format!("{} from the depot", format_distance(km)));
        }
        Status::field("Deliverable", yes_no(self.can_deliver));
        Status::field("From cache", yes_no(self.from_cache));
        println!();

        if self.gated {
            Status::warning(
                "No delivery location yet. Share a location, or choose one with `bitzy search` or `bitzy set-location`.",
            );
        } else if self.needs_advisory {
            Status::warning(&format!(
                "We only deliver within {} km of the depot. You can still browse the menu.",
                self.radius_km
            ));
        } else if self.can_deliver {
            Status::success("We deliver here");
        }
        Ok(())
    }
}

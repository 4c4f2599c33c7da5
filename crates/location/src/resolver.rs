//! Delivery-location resolution.
//!
//! Resolution order: fresh cache record, device position (bounded wait),
//! IP lookup, then `Denied`. A manual selection overrides whatever the
//! automatic chain produced, at any time.
//!
//! Every attempt takes a generation number. Only the attempt holding the
//! current generation may publish its result; anything started earlier
//! is discarded when it finally completes.

use crate::cache::{CachedLocationRecord, LocationCache};
use crate::error::LocationError;
use crate::model::{DeliveryLocation, LocationState, LocationStatus, UNKNOWN_LOCATION};
use crate::providers::{DeviceLocator, IpLocator, ReverseGeocoder};
use bitzy_core::config::ConfigSchema;
use bitzy_core::store::KeyValueStore;
use bitzy_geo::{Coordinate, ServiceArea};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Default bounded wait for the device position.
pub const DEFAULT_DEVICE_TIMEOUT: Duration = Duration::from_secs(8);

/// Fixed inputs of the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    /// Depot and delivery radius
    pub service_area: ServiceArea,
    /// Bounded wait for the device position
    pub device_timeout: Duration,
    /// Location applied by [`LocationResolver::set_default_location`]
    pub default_location: DeliveryLocation,
}

impl ResolverSettings {
    /// Builds settings from the loaded configuration.
    pub fn from_config(schema: &ConfigSchema) -> bitzy_geo::Result<Self> {
        let center = Coordinate::checked(
            schema.service_area.center_latitude,
            schema.service_area.center_longitude,
        )?;
        let service_area = ServiceArea::new(center, schema.service_area.radius_km)?;

        Ok(Self {
            service_area,
            device_timeout: Duration::from_secs(schema.location.device_timeout_secs),
            default_location: DeliveryLocation::new(
                schema.location.default_name.clone(),
                schema.location.default_area.clone(),
                center,
            ),
        })
    }
}

/// Owns the current delivery location and publishes every change.
///
/// Lifecycle: [`init`](Self::init) restores the cache, [`start`](Self::start)
/// runs the automatic chain when nothing was restored, consumers
/// [`subscribe`](Self::subscribe), and [`teardown`](Self::teardown)
/// invalidates any attempt still in flight.
#[derive(Debug)]
pub struct LocationResolver<D, I, R, S> {
    settings: ResolverSettings,
    device: D,
    ip: I,
    geocoder: R,
    cache: LocationCache<S>,
    state: watch::Sender<LocationState>,
    generation: AtomicU64,
    restored: bool,
}

impl<D, I, R, S> LocationResolver<D, I, R, S>
where
    D: DeviceLocator,
    I: IpLocator,
    R: ReverseGeocoder,
    S: KeyValueStore,
{
    /// Creates the resolver, adopting a fresh cached record verbatim if one exists.
    pub fn init(
        settings: ResolverSettings,
        device: D,
        ip: I,
        geocoder: R,
        cache: LocationCache<S>,
    ) -> Self {
        let restored = cache
            .load()
            .filter(|record| record.status != LocationStatus::Unresolved);

        let initial = match restored.as_ref() {
            Some(record) => {
                info!(status = %record.status, "Restored cached location");
                LocationState::new(record.status, record.location.clone())
            }
            None => LocationState::default(),
        };

        let (state, _) = watch::channel(initial);
        Self {
            settings,
            device,
            ip,
            geocoder,
            cache,
            state,
            generation: AtomicU64::new(0),
            restored: restored.is_some(),
        }
    }

    /// Whether the initial state came from the cache.
    pub fn restored_from_cache(&self) -> bool {
        self.restored
    }

    /// Runs the automatic chain unless a cached record was adopted.
    pub async fn start(&self) -> LocationState {
        if self.restored {
            debug!("Cached location is fresh; skipping resolution");
            return self.state();
        }
        self.request_location().await
    }

    /// Runs the automatic chain now, superseding any attempt in flight.
    pub async fn request_location(&self) -> LocationState {
        let generation = self.begin_attempt();
        debug!(generation, "Requesting device location");

        let position = match tokio::time::timeout(
            self.settings.device_timeout,
            self.device.current_position(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(LocationError::GeolocationTimeout(self.settings.device_timeout)),
        }
        .and_then(|coordinate| {
            if coordinate.is_valid() {
                Ok(coordinate)
            } else {
                Err(LocationError::GeolocationUnavailable(format!(
                    "device reported {coordinate}"
                )))
            }
        });

        match position {
            Ok(coordinate) => {
                let name = self.place_name(coordinate).await;
                let location = DeliveryLocation::new(name.clone(), name, coordinate);
                self.commit_resolved(generation, location);
            }
            Err(e) if !e.allows_ip_fallback() => {
                info!("Location permission denied");
                self.commit(generation, LocationStatus::Denied, None);
            }
            Err(e) => {
                debug!(error = %e, "Device location failed; trying IP lookup");
                self.ip_fallback(generation).await;
            }
        }

        self.state()
    }

    async fn ip_fallback(&self, generation: u64) {
        if !self.is_current(generation) {
            debug!(generation, "Attempt superseded before IP lookup");
            return;
        }

        match self.ip.locate().await {
            Ok(Some(found)) if found.coordinate.is_valid() => {
                let location = DeliveryLocation::new(found.city.clone(), found.city, found.coordinate);
                self.commit_resolved(generation, location);
            }
            Ok(_) => {
                debug!("IP lookup returned no usable coordinate");
                self.commit(generation, LocationStatus::Denied, None);
            }
            Err(e) => {
                warn!(error = %e, "IP lookup failed");
                self.commit(generation, LocationStatus::Denied, None);
            }
        }
    }

    async fn place_name(&self, coordinate: Coordinate) -> String {
        match self.geocoder.reverse_geocode(coordinate).await {
            Ok(name) if !name.trim().is_empty() => name,
            Ok(_) => UNKNOWN_LOCATION.to_string(),
            Err(e) => {
                debug!(error = %e, %coordinate, "Reverse geocoding failed");
                UNKNOWN_LOCATION.to_string()
            }
        }
    }

    /// Applies a user-chosen location, superseding any automatic attempt.
    ///
    /// The status becomes `Manual` even outside the service area;
    /// [`can_deliver`](Self::can_deliver) still reflects the coordinate.
    pub fn set_manual_location(&self, location: DeliveryLocation) -> Result<(), LocationError> {
        if !location.coordinate.is_valid() {
            return Err(LocationError::InvalidLocation(format!(
                "{} at {}",
                location.display_name, location.coordinate
            )));
        }
        let generation = self.begin_attempt();
        self.commit(generation, LocationStatus::Manual, Some(location));
        Ok(())
    }

    /// Applies the configured default location as a manual selection.
    pub fn set_default_location(&self) -> Result<(), LocationError> {
        self.set_manual_location(self.settings.default_location.clone())
    }

    /// Current state snapshot.
    pub fn state(&self) -> LocationState {
        self.state.borrow().clone()
    }

    /// Current status.
    pub fn status(&self) -> LocationStatus {
        self.state.borrow().status
    }

    /// Current location, if any.
    pub fn current_location(&self) -> Option<DeliveryLocation> {
        self.state.borrow().location.clone()
    }

    /// True when the current location lies in the service area. Computed on every call.
    pub fn can_deliver(&self) -> bool {
        self.state.borrow().can_deliver(&self.settings.service_area)
    }

    /// Distance from the depot to the current location.
    pub fn distance_km(&self) -> Option<f64> {
        self.state.borrow().distance_km(&self.settings.service_area)
    }

    /// True while the storefront must stay behind the location prompt.
    pub fn is_gated(&self) -> bool {
        self.state.borrow().is_gated()
    }

    /// True when the "outside delivery zone" advisory should be shown.
    pub fn needs_advisory(&self) -> bool {
        self.state.borrow().needs_advisory(&self.settings.service_area)
    }

    /// The configured service area.
    pub fn service_area(&self) -> &ServiceArea {
        &self.settings.service_area
    }

    /// Receives every published state change.
    pub fn subscribe(&self) -> watch::Receiver<LocationState> {
        self.state.subscribe()
    }

    /// Invalidates any attempt in flight. Results arriving later are dropped.
    pub fn teardown(&self) {
        let generation = self.begin_attempt();
        debug!(generation, "Location resolver torn down");
    }

    fn begin_attempt(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn commit_resolved(&self, generation: u64, location: DeliveryLocation) {
        let status = if self.settings.service_area.contains(&location.coordinate) {
            LocationStatus::Granted
        } else {
            LocationStatus::OutOfArea
        };
        self.commit(generation, status, Some(location));
    }

    /// Publishes and persists a result if `generation` is still current.
    fn commit(&self, generation: u64, status: LocationStatus, location: Option<DeliveryLocation>) -> bool {
        if !self.is_current(generation) {
            debug!(generation, %status, "Discarding superseded location result");
            return false;
        }

        info!(
            %status,
            name = location.as_ref().map_or("-", |l| l.display_name.as_str()),
            "Location resolved"
        );
        self.cache
            .save(&CachedLocationRecord::now(status, location.clone()));
        self.state.send_replace(LocationState::new(status, location));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::now_millis;
    use crate::providers::{FixedDevice, IpLocation, Offline};
    use crate::Result;
    use bitzy_core::store::MemoryStore;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};

    const AKURDI: Coordinate = Coordinate::new(18.6400, 73.8040);
    const BANER: Coordinate = Coordinate::new(18.5590, 73.7868);
    const MUMBAI: Coordinate = Coordinate::new(19.0760, 72.8777);

    fn settings() -> ResolverSettings {
        ResolverSettings::from_config(&ConfigSchema::default()).unwrap()
    }

    /// Device whose calls follow a script of (delay, outcome) steps.
    #[derive(Default)]
    struct ScriptedDevice {
        steps: Mutex<VecDeque<(Duration, Result<Coordinate>)>>,
        calls: AtomicUsize,
    }

    impl ScriptedDevice {
        fn new(steps: Vec<(Duration, Result<Coordinate>)>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl DeviceLocator for ScriptedDevice {
        async fn current_position(&self) -> Result<Coordinate> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self.steps.lock().unwrap().pop_front();
            let (delay, outcome) = step.unwrap_or((
                Duration::ZERO,
                Err(LocationError::GeolocationUnavailable("script exhausted".into())),
            ));
            tokio::time::sleep(delay).await;
            outcome
        }
    }

    /// IP locator with a fixed answer, a delay and a call counter.
    struct StubIp {
        answer: Result<Option<IpLocation>>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl StubIp {
        fn city(name: &str, coordinate: Coordinate) -> Self {
            Self {
                answer: Ok(Some(IpLocation {
                    coordinate,
                    city: name.to_string(),
                })),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                answer: Err(LocationError::GeocodingFailure("network".into())),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    impl IpLocator for StubIp {
        async fn locate(&self) -> Result<Option<IpLocation>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.answer.clone()
        }
    }

    struct NamedPlace(&'static str);

    impl ReverseGeocoder for NamedPlace {
        async fn reverse_geocode(&self, _coordinate: Coordinate) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    type Resolver<D, I, R> = LocationResolver<D, I, R, Arc<MemoryStore>>;

    fn resolver<D, I, R>(device: D, ip: I, geocoder: R, store: &Arc<MemoryStore>) -> Resolver<D, I, R>
    where
        D: DeviceLocator,
        I: IpLocator,
        R: ReverseGeocoder,
    {
        LocationResolver::init(settings(), device, ip, geocoder, LocationCache::new(Arc::clone(store)))
    }

    fn stored(store: &Arc<MemoryStore>) -> Option<CachedLocationRecord> {
        LocationCache::new(Arc::clone(store)).load()
    }

    #[tokio::test]
    async fn test_device_success_inside_area_is_granted() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(FixedDevice::Position(BANER), Offline, NamedPlace("Baner"), &store);

        let state = r.start().await;

        assert_eq!(state.status, LocationStatus::Granted);
        assert_eq!(state.location.as_ref().unwrap().display_name, "Baner");
        assert!(r.can_deliver());
        assert!(!r.is_gated());
        assert_eq!(stored(&store).unwrap().status, LocationStatus::Granted);
    }

    #[tokio::test]
    async fn test_device_success_outside_area_is_out_of_area() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(FixedDevice::Position(MUMBAI), Offline, NamedPlace("Colaba"), &store);

        r.start().await;

        assert_eq!(r.status(), LocationStatus::OutOfArea);
        assert!(!r.can_deliver());
        assert!(r.needs_advisory());
        assert!(r.distance_km().unwrap() > 100.0);
    }

    #[tokio::test]
    async fn test_failed_reverse_geocoding_uses_placeholder() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(FixedDevice::Position(AKURDI), Offline, Offline, &store);

        r.start().await;

        let location = r.current_location().unwrap();
        assert_eq!(location.display_name, UNKNOWN_LOCATION);
        assert_eq!(r.status(), LocationStatus::Granted);
    }

    #[tokio::test]
    async fn test_denial_skips_ip_lookup() {
        let store = Arc::new(MemoryStore::new());
        let ip = StubIp::city("Pune", BANER);
        let r = resolver(FixedDevice::Denied, ip, Offline, &store);

        let state = r.start().await;

        assert_eq!(state, LocationState::new(LocationStatus::Denied, None));
        assert_eq!(r.ip.calls.load(Ordering::SeqCst), 0);
        assert!(r.is_gated());
        assert_eq!(stored(&store).unwrap().status, LocationStatus::Denied);
    }

    #[tokio::test]
    async fn test_unsupported_device_falls_back_to_ip() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(FixedDevice::Unsupported, StubIp::city("Pune", BANER), Offline, &store);

        r.start().await;

        assert_eq!(r.status(), LocationStatus::Granted);
        assert_eq!(r.current_location().unwrap().area, "Pune");
    }

    #[tokio::test(start_paused = true)]
    async fn test_device_timeout_falls_back_to_ip() {
        let store = Arc::new(MemoryStore::new());
        let device = ScriptedDevice::new(vec![(Duration::from_secs(20), Ok(MUMBAI))]);
        let r = resolver(device, StubIp::city("Pune", BANER), Offline, &store);

        let started = tokio::time::Instant::now();
        r.start().await;

        let waited = started.elapsed();
        assert!(waited >= DEFAULT_DEVICE_TIMEOUT && waited < Duration::from_secs(20), "{waited:?}");
        assert_eq!(r.status(), LocationStatus::Granted);
        assert_eq!(r.current_location().unwrap().coordinate, BANER);
    }

    #[tokio::test]
    async fn test_ip_failure_is_denied() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(FixedDevice::Unsupported, StubIp::failing(), Offline, &store);

        r.start().await;

        assert_eq!(r.state(), LocationState::new(LocationStatus::Denied, None));
        assert!(r.is_gated());
    }

    #[tokio::test]
    async fn test_ip_without_coordinates_is_denied() {
        let store = Arc::new(MemoryStore::new());
        let ip = StubIp {
            answer: Ok(None),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        };
        let r = resolver(FixedDevice::Unsupported, ip, Offline, &store);

        r.start().await;
        assert_eq!(r.status(), LocationStatus::Denied);
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_resolution() {
        let store = Arc::new(MemoryStore::new());
        LocationCache::new(Arc::clone(&store)).save(&CachedLocationRecord {
            status: LocationStatus::Manual,
            location: Some(DeliveryLocation::new("Baner", "Pune", BANER)),
            resolved_at_epoch_millis: now_millis() - 5 * 60_000,
        });
        let device = ScriptedDevice::new(vec![]);
        let r = resolver(device, Offline, Offline, &store);

        assert!(r.restored_from_cache());
        let state = r.start().await;

        assert_eq!(state.status, LocationStatus::Manual);
        assert_eq!(r.device.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stale_cache_triggers_resolution() {
        let store = Arc::new(MemoryStore::new());
        LocationCache::new(Arc::clone(&store)).save(&CachedLocationRecord {
            status: LocationStatus::Granted,
            location: Some(DeliveryLocation::new("Baner", "Pune", BANER)),
            resolved_at_epoch_millis: now_millis() - 31 * 60_000,
        });
        let r = resolver(FixedDevice::Position(AKURDI), Offline, NamedPlace("Akurdi"), &store);

        assert!(!r.restored_from_cache());
        assert!(r.is_gated());
        r.start().await;

        assert_eq!(r.current_location().unwrap().display_name, "Akurdi");
    }

    #[tokio::test]
    async fn test_manual_outside_area_keeps_manual_status() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(FixedDevice::Denied, Offline, Offline, &store);
        r.start().await;

        r.set_manual_location(DeliveryLocation::new("Mumbai", "Mumbai", MUMBAI))
            .unwrap();

        assert_eq!(r.status(), LocationStatus::Manual);
        assert!(!r.can_deliver());
        assert!(!r.is_gated());
        assert!(r.needs_advisory());
        assert_eq!(stored(&store).unwrap().status, LocationStatus::Manual);
    }

    #[tokio::test]
    async fn test_manual_rejects_invalid_coordinate() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(FixedDevice::Denied, Offline, Offline, &store);

        let err = r
            .set_manual_location(DeliveryLocation::new("Nowhere", "-", Coordinate::new(95.0, 0.0)))
            .unwrap_err();

        assert!(matches!(err, LocationError::InvalidLocation(_)));
        assert_eq!(r.status(), LocationStatus::Unresolved);
    }

    #[tokio::test]
    async fn test_default_location_is_akurdi() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(FixedDevice::Denied, Offline, Offline, &store);

        r.set_default_location().unwrap();

        let location = r.current_location().unwrap();
        assert_eq!(location.display_name, "Akurdi");
        assert_eq!(location.coordinate, AKURDI);
        assert!(r.can_deliver());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_selection_wins_over_late_ip_result() {
        let store = Arc::new(MemoryStore::new());
        let ip = StubIp::city("Mumbai", MUMBAI).delayed(Duration::from_secs(3));
        let r = resolver(FixedDevice::Unsupported, ip, Offline, &store);

        tokio::join!(r.start(), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            r.set_manual_location(DeliveryLocation::new("Baner", "Pune", BANER))
                .unwrap();
        });

        assert_eq!(r.status(), LocationStatus::Manual);
        assert_eq!(r.current_location().unwrap().coordinate, BANER);
        assert_eq!(stored(&store).unwrap().status, LocationStatus::Manual);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_result_of_superseded_request_is_discarded() {
        let store = Arc::new(MemoryStore::new());
        let device = ScriptedDevice::new(vec![
            (Duration::from_secs(5), Ok(MUMBAI)),
            (Duration::ZERO, Ok(BANER)),
        ]);
        let r = resolver(device, Offline, NamedPlace("Somewhere"), &store);

        tokio::join!(r.request_location(), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            r.request_location().await;
        });

        assert_eq!(r.status(), LocationStatus::Granted);
        assert_eq!(r.current_location().unwrap().coordinate, BANER);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_drops_in_flight_result() {
        let store = Arc::new(MemoryStore::new());
        let ip = StubIp::city("Pune", BANER).delayed(Duration::from_secs(2));
        let r = resolver(FixedDevice::Unsupported, ip, Offline, &store);

        tokio::join!(r.start(), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            r.teardown();
        });

        assert_eq!(r.status(), LocationStatus::Unresolved);
        assert!(stored(&store).is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_full_state_replacements() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(FixedDevice::Position(BANER), Offline, NamedPlace("Baner"), &store);
        let mut rx = r.subscribe();

        r.start().await;

        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.status, LocationStatus::Granted);
        assert_eq!(seen.location.unwrap().display_name, "Baner");
    }
}

//! IP geolocation (ipapi-style JSON)

use crate::client::GeoClient;
use crate::error::ApiResult;
use bitzy_geo::Coordinate;
use bitzy_location::{IpLocation, IpLocator, LocationError, UNKNOWN_LOCATION};
use serde::Deserialize;

/// IP geolocation API interface
#[derive(Clone, Debug)]
pub struct IpLookupApi {
    client: GeoClient,
}

impl IpLookupApi {
    /// Create a new IP lookup interface
    pub(crate) fn new(client: GeoClient) -> Self {
        Self { client }
    }

    /// Approximate location of this machine's public address
    pub async fn locate(&self) -> ApiResult<Option<IpLocation>> {
        let url = self.client.config().ip_geolocation_url.clone();
        let response: IpResponse = self.client.get_json(&url, &[] as &[(&str, &str)]).await?;
        Ok(response.into_location())
    }
}

impl IpLocator for IpLookupApi {
    async fn locate(&self) -> Result<Option<IpLocation>, LocationError> {
        Ok(IpLookupApi::locate(self).await?)
    }
}

/// IP geolocation response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpResponse {
    /// Latitude
    pub latitude: Option<f64>,
    /// Longitude
    pub longitude: Option<f64>,
    /// City
    pub city: Option<String>,
    /// Region or state
    pub region: Option<String>,
}

impl IpResponse {
    /// `None` unless both coordinates are present and in range.
    ///
    /// The name is the city, else the region, else `"Unknown location"`.
    #[must_use]
    pub fn into_location(self) -> Option<IpLocation> {
        let coordinate = Coordinate::checked(self.latitude?, self.longitude?).ok()?;
        let city = [self.city, self.region]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
        Some(IpLocation { coordinate, city })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<IpLocation> {
        serde_json::from_str::<IpResponse>(json).unwrap().into_location()
    }

    #[test]
    fn test_full_response() {
        let location = parse(r#"{"ip": "1.2.3.4", "city": "Pune", "region": "Maharashtra",
                                 "latitude": 18.5196, "longitude": 73.8553}"#)
        .unwrap();
        assert_eq!(location.city, "Pune");
        assert_eq!(location.coordinate, Coordinate::new(18.5196, 73.8553));
    }

    #[test]
    fn test_region_then_placeholder() {
        let location = parse(r#"{"region": "Maharashtra", "latitude": 18.5, "longitude": 73.8}"#).unwrap();
        assert_eq!(location.city, "Maharashtra");

        let location = parse(r#"{"latitude": 18.5, "longitude": 73.8}"#).unwrap();
        assert_eq!(location.city, UNKNOWN_LOCATION);
    }

    #[test]
    fn test_missing_coordinates_is_none() {
        assert!(parse(r#"{"error": true, "reason": "RateLimited"}"#).is_none());
        assert!(parse(r#"{"city": "Pune", "latitude": 18.5}"#).is_none());
        assert!(parse(r#"{"latitude": 123.0, "longitude": 73.8}"#).is_none());
    }
}

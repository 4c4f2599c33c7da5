//! Nominatim reverse geocoding and place search

use crate::client::GeoClient;
use crate::error::ApiResult;
use bitzy_geo::Coordinate;
use bitzy_location::{
    AddressParts, LocationError, PlaceCandidate, PlaceSearch, ReverseGeocoder, UNKNOWN_LOCATION,
};
use serde::Deserialize;
use tracing::debug;

/// Nominatim API interface
#[derive(Clone, Debug)]
pub struct NominatimApi {
    client: GeoClient,
}

impl NominatimApi {
    /// Create a new Nominatim API interface
    pub(crate) fn new(client: GeoClient) -> Self {
        Self { client }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.client.config().nominatim_url.trim_end_matches('/'))
    }

    /// Reverse geocode a coordinate to its raw response
    pub async fn reverse(&self, coordinate: Coordinate) -> ApiResult<ReverseResponse> {
        let query = [
            ("format", "json".to_string()),
            ("lat", coordinate.latitude.to_string()),
            ("lon", coordinate.longitude.to_string()),
            ("zoom", "18".to_string()),
            ("addressdetails", "1".to_string()),
        ];
        self.client.get_json(&self.endpoint("reverse"), &query).await
    }

    /// Short place name for a coordinate
    pub async fn place_name(&self, coordinate: Coordinate) -> ApiResult<String> {
        Ok(self.reverse(coordinate).await?.place_name())
    }

    /// Search places inside the configured viewbox
    ///
    /// Queries shorter than the configured minimum return no results without a request.
    pub async fn search(&self, query: &str) -> ApiResult<Vec<PlaceCandidate>> {
        let config = self.client.config();
        let query = query.trim();
        if query.chars().count() < config.min_query_chars {
            return Ok(Vec::new());
        }

        let params = [
            ("format", "json".to_string()),
            ("q", query.to_string()),
            ("viewbox", config.viewbox.clone()),
            ("bounded", "1".to_string()),
            ("addressdetails", "1".to_string()),
            ("limit", config.limit.to_string()),
        ];
        let hits: Vec<SearchHit> = self.client.get_json(&self.endpoint("search"), &params).await?;

        let total = hits.len();
        let candidates: Vec<PlaceCandidate> = hits.into_iter().filter_map(SearchHit::into_candidate).collect();
        if candidates.len() < total {
            debug!(dropped = total - candidates.len(), "Skipped search hits without coordinates");
        }
        Ok(candidates)
    }
}

impl ReverseGeocoder for NominatimApi {
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<String, LocationError> {
        Ok(self.place_name(coordinate).await?)
    }
}

impl PlaceSearch for NominatimApi {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, LocationError> {
        Ok(NominatimApi::search(self, query).await?)
    }
}

/// Address block of a Nominatim response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    /// Suburb
    pub suburb: Option<String>,
    /// Neighbourhood
    pub neighbourhood: Option<String>,
    /// City district
    pub city_district: Option<String>,
    /// City
    pub city: Option<String>,
    /// Town
    pub town: Option<String>,
    /// Village
    pub village: Option<String>,
    /// State
    pub state: Option<String>,
    /// Country
    pub country: Option<String>,
}

impl From<NominatimAddress> for AddressParts {
    fn from(a: NominatimAddress) -> Self {
        AddressParts {
            suburb: a.suburb,
            neighbourhood: a.neighbourhood,
            city: a.city,
            town: a.town,
            village: a.village,
            state: a.state,
            country: a.country,
        }
    }
}

/// Reverse geocoding response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseResponse {
    /// Full display name
    pub display_name: Option<String>,
    /// Address parts
    #[serde(default)]
    pub address: NominatimAddress,
}

fn first_non_empty<'a>(candidates: impl IntoIterator<Item = Option<&'a String>>) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|s| !s.trim().is_empty())
}

impl ReverseResponse {
    /// Most specific name: suburb, neighbourhood, city district, city, town,
    /// village, then the display name; `"Unknown location"` when all are absent.
    #[must_use]
    pub fn place_name(&self) -> String {
        let a = &self.address;
        first_non_empty([
            a.suburb.as_ref(),
            a.neighbourhood.as_ref(),
            a.city_district.as_ref(),
            a.city.as_ref(),
            a.town.as_ref(),
            a.village.as_ref(),
            self.display_name.as_ref(),
        ])
        .unwrap_or(UNKNOWN_LOCATION)
        .to_string()
    }
}

/// One forward search hit; coordinates arrive as strings
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    /// Latitude
    pub lat: String,
    /// Longitude
    pub lon: String,
    /// Full display name
    #[serde(default)]
    pub display_name: String,
    /// Feature name
    pub name: Option<String>,
    /// Address parts
    #[serde(default)]
    pub address: NominatimAddress,
}

impl SearchHit {
    /// Converts to a candidate; `None` when the coordinates do not parse or are out of range.
    #[must_use]
    pub fn into_candidate(self) -> Option<PlaceCandidate> {
        let latitude = self.lat.trim().parse::<f64>().ok()?;
        let longitude = self.lon.trim().parse::<f64>().ok()?;
        let coordinate = Coordinate::checked(latitude, longitude).ok()?;

        let name = first_non_empty([
            self.address.suburb.as_ref(),
            self.address.neighbourhood.as_ref(),
            self.address.city.as_ref(),
            self.name.as_ref(),
        ])
        .unwrap_or("Unknown")
        .to_string();

        Some(PlaceCandidate {
            name,
            display_name: self.display_name,
            coordinate,
            address: self.address.into(),
        })
    }
}

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};

use crate::common::geo::GeoPoint;

/// Nominatim API response for geocoding
#[derive(Debug, Deserialize)]
struct NominatimResponse {
    lat: String,
    lon: String,
    display_name: String,
}

/// Geocoded location
#[derive(Debug, Clone)]
pub struct GeocodedLocation {
    pub point: GeoPoint,
    pub display_name: String,
}

/// Geocode a city/state to lat/lng coordinates using Nominatim (OpenStreetMap)
///
/// Used to backfill an NGO's registered coordinate when the registration
/// form carries only city/state. Best-effort: callers treat failure as
/// "no coordinate".
#[instrument]
pub async fn geocode_city(city: &str, state: &str) -> Result<GeocodedLocation> {
    let query = format!("{}, {}, India", city.trim(), state.trim());
    let url = format!(
        "https://nominatim.openstreetmap.org/search?q={}&format=json&limit=1",
        urlencoding::encode(&query)
    );

    debug!("Geocoding location: {}", query);

    let client = reqwest::Client::new();
    let response: Vec<NominatimResponse> = client
        .get(&url)
        .header("User-Agent", "JeevRaksha/1.0 (Animal Rescue Platform)")
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| {
            error!(error = %e, city = %city, state = %state, "Geocoding API request failed");
            anyhow!("Geocoding API request failed: {}", e)
        })?
        .json()
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to parse geocoding response");
            anyhow!("Failed to parse geocoding response: {}", e)
        })?;

    let result = response.first().ok_or_else(|| {
        warn!(city = %city, state = %state, "Location not found by geocoding API");
        anyhow!("Location not found: {}", query)
    })?;

    let latitude: f64 = result
        .lat
        .parse()
        .map_err(|e| anyhow!("Invalid latitude in response: {}", e))?;
    let longitude: f64 = result
        .lon
        .parse()
        .map_err(|e| anyhow!("Invalid longitude in response: {}", e))?;

    debug!("Geocoded {} → ({}, {})", query, latitude, longitude);

    Ok(GeocodedLocation {
        point: GeoPoint::new(latitude, longitude),
        display_name: result.display_name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_geocode_city() {
        // Integration test - requires internet
        // Skip in CI by checking for env var
        if std::env::var("SKIP_GEOCODING_TESTS").is_ok() {
            return;
        }

        let result = geocode_city("New Delhi", "Delhi").await;
        assert!(result.is_ok());

        let location = result.unwrap();
        assert!(location.point.latitude > 28.0 && location.point.latitude < 29.0);
        assert!(location.point.longitude > 76.5 && location.point.longitude < 77.8);
    }

    #[tokio::test]
    async fn test_geocode_invalid_city() {
        if std::env::var("SKIP_GEOCODING_TESTS").is_ok() {
            return;
        }

        let result = geocode_city("NonexistentCity123", "XX").await;
        assert!(result.is_err());
    }
}

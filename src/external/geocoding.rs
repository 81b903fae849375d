use serde::{Deserialize, Serialize};
use std::env;

use crate::{
    entities::Coordinates,
    error::{invalid_address_error, upstream_error, Error},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    status: String,
    results: Vec<SearchResult>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct SearchResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Geometry {
    location: Coordinates,
}

/// Resolves a free text address to coordinates with the Google geocoding
/// API. An address the service cannot resolve is a client error, not an
/// upstream one.
#[tracing::instrument]
pub async fn resolve_address(address: &str) -> Result<Coordinates, Error> {
    let api_base = env::var("GOOGLE_MAPS_API_BASE")?;
    let url = format!("https://{}/maps/api/geocode/json", api_base);
    let key = env::var("GOOGLE_MAPS_API_KEY")?;

    let res = reqwest::Client::new()
        .get(url)
        .query(&[("key", key)])
        .query(&[("address", address.to_string())])
        .send()
        .await?;

    let status_code = res.status().as_u16();

    if status_code >= 400 && status_code < 500 {
        return Err(invalid_address_error());
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    let data: Response = res.json().await?;

    coordinates_from_response(data)
}

fn coordinates_from_response(data: Response) -> Result<Coordinates, Error> {
    if data.status == "ZERO_RESULTS" {
        return Err(invalid_address_error());
    }

    if data.status != "OK" {
        return Err(upstream_error());
    }

    let result = data
        .results
        .into_iter()
        .next()
        .ok_or_else(|| upstream_error())?;

    tracing::debug!(formatted = %result.formatted_address, "resolved address");

    Ok(result.geometry.location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_coordinates_from_the_first_result_test() {
        let data: Response = serde_json::from_str(
            r#"{
                "status": "OK",
                "results": [
                    {
                        "formatted_address": "Sultan Ahmet, Ayasofya Meydanı No:1, 34122 Fatih/İstanbul, Türkiye",
                        "geometry": { "location": { "lat": 41.008583, "lng": 28.9779863 } }
                    },
                    {
                        "formatted_address": "Fatih/İstanbul, Türkiye",
                        "geometry": { "location": { "lat": 41.0, "lng": 28.9 } }
                    }
                ]
            }"#,
        )
        .unwrap();

        let coordinates = coordinates_from_response(data).unwrap();

        assert_eq!(coordinates.lat, 41.008583);
        assert_eq!(coordinates.lng, 28.9779863);
    }

    #[test]
    fn zero_results_is_an_invalid_address_test() {
        let data: Response =
            serde_json::from_str(r#"{ "status": "ZERO_RESULTS", "results": [] }"#).unwrap();

        let err = coordinates_from_response(data).unwrap_err();

        assert_eq!(err.code, 422);
    }

    #[test]
    fn unexpected_status_is_an_upstream_failure_test() {
        let data: Response =
            serde_json::from_str(r#"{ "status": "REQUEST_DENIED", "results": [] }"#).unwrap();

        let err = coordinates_from_response(data).unwrap_err();

        assert_eq!(err.code, 502);
    }

    #[test]
    fn ok_with_no_results_is_an_upstream_failure_test() {
        let data: Response = serde_json::from_str(r#"{ "status": "OK", "results": [] }"#).unwrap();

        let err = coordinates_from_response(data).unwrap_err();

        assert_eq!(err.code, 502);
    }
}

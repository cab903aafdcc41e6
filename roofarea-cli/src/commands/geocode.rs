use anyhow::{ensure, Context, Result};
use roofarea::RoofAreaResolver;
use serde::Serialize;

#[derive(Serialize)]
struct GeocodeResponse<'a> {
    address: &'a str,
    lat: f64,
    lng: f64,
}

pub async fn run(resolver: &RoofAreaResolver, address: String, json: bool) -> Result<()> {
    ensure!(!address.trim().is_empty(), "Address must not be empty");

    let location = resolver
        .geocode(&address)
        .await
        .with_context(|| format!("Failed to geocode '{}'", address))?;

    tracing::debug!(lat = location.lat, lng = location.lng, "Geocoded");

    if json {
        let response = GeocodeResponse {
            address: &address,
            lat: location.lat,
            lng: location.lng,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("{},{}", location.lat, location.lng);
    }

    Ok(())
}

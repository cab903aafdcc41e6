use anyhow::{Context, Result};
use roofarea::{geojson::report_to_feature, RoofAreaResolver};

pub async fn run(
    resolver: &RoofAreaResolver,
    address: String,
    json: bool,
    geojson: bool,
) -> Result<()> {
    let report = resolver
        .resolve(&address)
        .await
        .with_context(|| format!("Failed to resolve roof area for '{}'", address))?;

    if geojson {
        let feature =
            report_to_feature(&report).context("Roof outline cannot be expressed as GeoJSON")?;
        println!("{}", serde_json::to_string_pretty(&feature)?);
    } else if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", report.address);
        println!("  Location:  {:.6}, {:.6}", report.lat, report.lng);
        println!("  Roof area: {} m² ({} ft²)", report.area_m2, report.area_ft2);
    }

    Ok(())
}

//! County boundaries endpoint.
//!
//! Fetches a `GeoJSON` `FeatureCollection` whose features carry
//! county-level statistics in their properties. Only polygonal
//! geometries are kept; anything else is skipped with a warning.

use std::collections::BTreeMap;

use geo::MultiPolygon;
use geojson::GeoJson;
use prison_viz_geography_models::GeoFeature;
use prison_viz_records_models::lenient::{value_to_f64, value_to_label};

use crate::{SourceError, get_text};

/// Fetches and parses all county features from `url`.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails, the server answers with
/// a non-success status, or the payload is not a `FeatureCollection`.
pub async fn fetch_counties(
    client: &reqwest::Client,
    url: &str,
    name_property: &str,
) -> Result<Vec<GeoFeature>, SourceError> {
    log::info!("Fetching county boundaries from {url}");
    let body = get_text(client, url).await?;
    let features = parse_counties(&body, name_property)?;
    log::info!("Fetched {} county features", features.len());
    Ok(features)
}

/// Parses a county `FeatureCollection`.
///
/// Every property except `name_property` whose value is a number or a
/// numeric string becomes a statistic. Features without a name are
/// labelled by their position in the collection.
///
/// # Errors
///
/// Returns [`SourceError::GeoJson`] for invalid `GeoJSON` and
/// [`SourceError::Format`] if the document is not a `FeatureCollection`.
pub fn parse_counties(body: &str, name_property: &str) -> Result<Vec<GeoFeature>, SourceError> {
    let geojson: GeoJson = body.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(SourceError::Format {
            message: "expected a GeoJSON FeatureCollection".to_string(),
        });
    };

    let mut features = Vec::with_capacity(collection.features.len());

    for (i, feature) in collection.features.into_iter().enumerate() {
        let properties = feature.properties.unwrap_or_default();
        let name = properties
            .get(name_property)
            .and_then(value_to_label)
            .unwrap_or_else(|| format!("Feature {i}"));

        let Some(geometry) = feature.geometry else {
            log::warn!("Skipping county '{name}': no geometry");
            continue;
        };

        let geometry = match geo::Geometry::<f64>::try_from(geometry) {
            Ok(geo::Geometry::MultiPolygon(mp)) => mp,
            Ok(geo::Geometry::Polygon(p)) => MultiPolygon(vec![p]),
            Ok(_) => {
                log::warn!("Skipping county '{name}': geometry is not polygonal");
                continue;
            }
            Err(e) => {
                log::warn!("Skipping county '{name}': {e}");
                continue;
            }
        };

        let stats: BTreeMap<String, f64> = properties
            .iter()
            .filter(|(key, _)| key.as_str() != name_property)
            .filter_map(|(key, value)| {
                let value = value_to_f64(value);
                value.is_finite().then(|| (key.clone(), value))
            })
            .collect();

        features.push(GeoFeature {
            name,
            geometry,
            stats,
        });
    }

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{client, serve_once};

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Cook", "inmates": 1200, "rate": "3.5", "state": "IL"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"name": "Lake", "inmates": 300},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[2.0, 0.0], [3.0, 0.0], [3.0, 1.0], [2.0, 0.0]]],
                        [[[4.0, 0.0], [5.0, 0.0], [5.0, 1.0], [4.0, 0.0]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": {"name": "Seat"},
                "geometry": {"type": "Point", "coordinates": [0.5, 0.5]}
            },
            {
                "type": "Feature",
                "properties": null,
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn keeps_polygonal_features_only() {
        let features = parse_counties(COLLECTION, "name").unwrap();
        let names: Vec<&str> = features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Cook", "Lake"]);
        assert_eq!(features[1].geometry.0.len(), 2);
    }

    #[test]
    fn numeric_properties_become_stats() {
        let features = parse_counties(COLLECTION, "name").unwrap();
        let cook = &features[0];
        assert!((cook.stat("inmates") - 1200.0).abs() < f64::EPSILON);
        assert!((cook.stat("rate") - 3.5).abs() < f64::EPSILON);
        assert!(!cook.stats.contains_key("state"));
        assert!(!cook.stats.contains_key("name"));
    }

    #[test]
    fn unnamed_features_get_positional_names() {
        let features = parse_counties(COLLECTION, "county").unwrap();
        assert_eq!(features[0].name, "Feature 0");
        assert!((features[0].stat("inmates") - 1200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_non_collection() {
        let body = r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#;
        assert!(matches!(
            parse_counties(body, "name"),
            Err(SourceError::Format { .. })
        ));
    }

    #[test]
    fn rejects_invalid_geojson() {
        assert!(matches!(
            parse_counties("{\"type\": \"Nope\"}", "name"),
            Err(SourceError::GeoJson(_))
        ));
    }

    #[tokio::test]
    async fn fetch_returns_served_counties() {
        let base = serve_once("200 OK", COLLECTION);
        let features = fetch_counties(&client(), &format!("{base}/c.geojson"), "name")
            .await
            .unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name, "Cook");
    }

    #[tokio::test]
    async fn fetch_reports_server_error() {
        let base = serve_once("500 Internal Server Error", "");
        let err = fetch_counties(&client(), &format!("{base}/c.geojson"), "name")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Status { status, .. } if status.as_u16() == 500));
    }
}

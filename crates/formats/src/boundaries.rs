use std::fs;
use std::path::{Path, PathBuf};

use foundation::geo::{Boundary, GeoPoint};
use serde_json::Value;

/// Property keys that may carry the country name, in lookup order.
/// Natural Earth admin-0 exports use `ADMIN`.
const NAME_PROPERTIES: [&str; 3] = ["ADMIN", "NAME", "name"];

/// One country boundary row, keyed by the canonical entity name.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub entity: String,
    pub boundary: Boundary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryCollection {
    pub features: Vec<BoundaryFeature>,
}

#[derive(Debug)]
pub enum BoundaryError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    NotAFeatureCollection,
    InvalidFeature {
        index: usize,
        reason: String,
    },
}

impl std::fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            BoundaryError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            BoundaryError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for BoundaryError {}

pub fn read_boundaries(path: impl AsRef<Path>) -> Result<BoundaryCollection, BoundaryError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(|e| BoundaryError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    BoundaryCollection::from_geojson_str(&payload)
}

impl BoundaryCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, BoundaryError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| BoundaryError::InvalidFeature {
                index: 0,
                reason: format!("JSON parse error: {e}"),
            })?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, BoundaryError> {
        let obj = value.as_object().ok_or(BoundaryError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(BoundaryError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(BoundaryError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(BoundaryError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val.as_object().ok_or(BoundaryError::InvalidFeature {
                index,
                reason: "feature must be an object".to_string(),
            })?;

            let entity = feature_name(feat_obj).ok_or_else(|| BoundaryError::InvalidFeature {
                index,
                reason: format!("no name property (tried {NAME_PROPERTIES:?})"),
            })?;

            let geometry_val = feat_obj
                .get("geometry")
                .ok_or_else(|| BoundaryError::InvalidFeature {
                    index,
                    reason: "feature missing geometry".to_string(),
                })?;
            let boundary = parse_boundary(geometry_val)
                .map_err(|reason| BoundaryError::InvalidFeature { index, reason })?;

            features.push(BoundaryFeature { entity, boundary });
        }

        Ok(Self { features })
    }
}

fn feature_name(feat_obj: &serde_json::Map<String, Value>) -> Option<String> {
    let props = feat_obj.get("properties")?.as_object()?;
    for key in NAME_PROPERTIES {
        if let Some(name) = props.get(key).and_then(|v| v.as_str()) {
            return Some(name.to_string());
        }
    }
    None
}

fn parse_boundary(value: &Value) -> Result<Boundary, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Polygon" => Ok(Boundary::Polygon(parse_rings(coords)?)),
        "MultiPolygon" => Ok(Boundary::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("boundary must be an area, got: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_point(item)?);
    }
    Ok(out)
}

fn parse_rings(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let arr = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for ring in arr {
        out.push(parse_ring(ring)?);
    }
    Ok(out)
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<GeoPoint>>>, String> {
    let arr = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for poly in arr {
        out.push(parse_rings(poly)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{BoundaryCollection, BoundaryError};
    use foundation::geo::Boundary;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ADMIN": "Albania", "ISO_A3": "ALB" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[19.0, 40.0], [21.0, 40.0], [21.0, 42.0], [19.0, 42.0], [19.0, 40.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Fiji" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[177.0, -18.0], [178.0, -18.0], [178.0, -17.0], [177.0, -18.0]]],
                        [[[-180.0, -16.0], [-179.0, -16.0], [-179.0, -15.0], [-180.0, -16.0]]]
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_named_area_features() {
        let collection = BoundaryCollection::from_geojson_str(SAMPLE).unwrap();
        assert_eq!(collection.features.len(), 2);
        assert_eq!(collection.features[0].entity, "Albania");
        assert!(matches!(collection.features[0].boundary, Boundary::Polygon(_)));
        assert_eq!(collection.features[1].entity, "Fiji");
        assert!(matches!(
            collection.features[1].boundary,
            Boundary::MultiPolygon(ref polys) if polys.len() == 2
        ));
    }

    #[test]
    fn rejects_non_collection() {
        let err = BoundaryCollection::from_geojson_str(r#"{"type": "Feature"}"#).unwrap_err();
        assert!(matches!(err, BoundaryError::NotAFeatureCollection));
    }

    #[test]
    fn rejects_unnamed_feature() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "ISO_A3": "ALB" },
                "geometry": { "type": "Polygon", "coordinates": [] }
            }]
        }"#;
        let err = BoundaryCollection::from_geojson_str(payload).unwrap_err();
        assert!(matches!(err, BoundaryError::InvalidFeature { index: 0, .. }));
    }

    #[test]
    fn rejects_non_area_geometry() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "ADMIN": "Null Island" },
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            }]
        }"#;
        let err = BoundaryCollection::from_geojson_str(payload).unwrap_err();
        assert!(matches!(err, BoundaryError::InvalidFeature { index: 0, .. }));
    }
}

use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use crate::{ModelError, TourGeometry, TourProperties};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TourFeature {
    #[serde(default, deserialize_with = "lenient_geometry")]
    pub geometry: Option<TourGeometry>,
    #[serde(default, deserialize_with = "lenient_properties")]
    pub properties: TourProperties,
}

impl TourFeature {
    /// GeoJSON `Feature` with normalized properties. `id` becomes the
    /// top-level feature id when given.
    pub fn to_geojson(&self, id: Option<usize>) -> Value {
        let mut feature = json!({
            "type": "Feature",
            "geometry": self.geometry,
            "properties": self.properties.normalized(),
        });
        if let Some(id) = id {
            feature["id"] = json!(id);
        }
        feature
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<TourFeature>,
}

impl FeatureCollection {
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let document: Value = serde_json::from_str(text)?;
        Self::from_value(document)
    }

    // Null and other falsy entries are dropped, as are entries that are not
    // objects at all.
    pub fn from_value(document: Value) -> Result<Self, ModelError> {
        let entries = match document {
            Value::Object(mut map) => match map.remove("features") {
                Some(Value::Array(entries)) => entries,
                _ => return Err(ModelError::MissingFeatures),
            },
            _ => return Err(ModelError::MissingFeatures),
        };

        let features = entries
            .into_iter()
            .filter(is_truthy)
            .filter_map(|entry| serde_json::from_value::<TourFeature>(entry).ok())
            .collect();

        Ok(FeatureCollection { features })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn lenient_geometry<'de, D>(deserializer: D) -> Result<Option<TourGeometry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_properties<'de, D>(deserializer: D) -> Result<TourProperties, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).unwrap_or_default(),
        _ => TourProperties::default(),
    })
}

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Misspelled direction key found in older data files. Read, never written.
pub const LEGACY_DIRECTION_FIELD: &str = "dirction";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TourProperties {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(
        rename = "dirction",
        default,
        deserialize_with = "lenient_string",
        skip_serializing
    )]
    pub legacy_direction: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub vert_m: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub gpx: Option<String>,
    // Everything else, so variant-specific fields can still be indexed
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TourProperties {
    /// Direction value, coalescing the legacy misspelled key.
    pub fn direction(&self) -> Option<&str> {
        self.direction
            .as_deref()
            .or(self.legacy_direction.as_deref())
    }

    /// Text value of a property by its GeoJSON key. Numbers are formatted
    /// the way they are shown on cards.
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let known = match name {
            "title" => self.title.as_deref(),
            "slug" => self.slug.as_deref(),
            "page" => self.page.as_deref(),
            "region" => self.region.as_deref(),
            "province" => self.province.as_deref(),
            "country" => self.country.as_deref(),
            "subtitle" => self.subtitle.as_deref(),
            "activity" => self.activity.as_deref(),
            "difficulty" => self.difficulty.as_deref(),
            "direction" => self.direction(),
            "cover" => self.cover.as_deref(),
            "gpx" => self.gpx.as_deref(),
            "vert_m" => return self.vert_m.map(|v| Cow::Owned(format_number(v))),
            "distance_km" => return self.distance_km.map(|v| Cow::Owned(format_number(v))),
            _ => return self.extra.get(name).and_then(text_of).map(Cow::Owned),
        };
        known.map(Cow::Borrowed)
    }

    /// Copy with the legacy direction folded into `direction`.
    pub fn normalized(&self) -> TourProperties {
        let mut out = self.clone();
        out.direction = self.direction().map(str::to_string);
        out.legacy_direction = None;
        out
    }
}

/// Display text of a scalar JSON value; `None` for null, empty strings,
/// arrays and objects.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text_of))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_strings_are_absent() {
        let props: TourProperties =
            serde_json::from_value(json!({ "title": "  ", "region": "", "slug": "a" })).unwrap();
        assert_eq!(props.title, None);
        assert_eq!(props.region, None);
        assert_eq!(props.slug.as_deref(), Some("a"));
    }

    #[test]
    fn test_numbers_accept_strings_and_nulls() {
        let props: TourProperties = serde_json::from_value(json!({
            "vert_m": "1200",
            "distance_km": null,
        }))
        .unwrap();
        assert_eq!(props.vert_m, Some(1200.0));
        assert_eq!(props.distance_km, None);

        let bad: TourProperties =
            serde_json::from_value(json!({ "vert_m": "lots" })).unwrap();
        assert_eq!(bad.vert_m, None);
    }

    #[test]
    fn test_field_lookup_covers_extra_keys() {
        let props: TourProperties = serde_json::from_value(json!({
            "title": "Ginpeak",
            "province_code": "BC",
            "time_h": 5,
            "vert_m": 1250.0,
        }))
        .unwrap();
        assert_eq!(props.field("title").as_deref(), Some("Ginpeak"));
        assert_eq!(props.field("province_code").as_deref(), Some("BC"));
        assert_eq!(props.field("time_h").as_deref(), Some("5"));
        assert_eq!(props.field("vert_m").as_deref(), Some("1250"));
        assert_eq!(props.field("missing"), None);
    }

    #[test]
    fn test_normalized_never_writes_legacy_key() {
        let props: TourProperties =
            serde_json::from_value(json!({ "dirction": "up", "title": "X" })).unwrap();
        let written = serde_json::to_value(props.normalized()).unwrap();
        assert_eq!(written["direction"], "up");
        assert!(written.get(LEGACY_DIRECTION_FIELD).is_none());
    }

    #[test]
    fn test_format_number_drops_trailing_zero() {
        assert_eq!(format_number(1200.0), "1200");
        assert_eq!(format_number(12.35), "12.35");
    }
}

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::error::BrowserError;

pub const DEFAULT_DATA_URL: &str = "./data/tours.geojson";
pub const DEFAULT_DETAIL_PREFIX: &str = "./tours/";

// Configuration passed from the page to `start_tour_browser`. Every field
// has a default, so the page only sends what differs from its markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowserConfig {
    pub data_url: String,
    pub detail_page_prefix: String,
    pub elements: ElementIds,
    pub selectors: Vec<SelectorBinding>,
    pub text_fields: Vec<String>,
    pub hero_actions: Vec<HeroAction>,
    pub map: MapConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub search: String,
    pub fit_button: String,
    pub grid: String,
    pub count: String,
    pub map: String,
}

/// A `<select>` element filtering on one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorBinding {
    pub field: String,
    pub element: String,
}

/// Call-to-action button that scrolls to a section and optionally presets
/// the search box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroAction {
    pub button: String,
    pub section: String,
    #[serde(default)]
    pub preset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    pub access_token: Option<String>,
    pub style: String,
    pub center: [f64; 2],
    pub zoom: f64,
    pub colors: DirectionColors,
    pub line_width: f64,
    pub point_radius: f64,
    pub fit_padding: f64,
    pub fit_duration_ms: f64,
    pub fit_max_zoom: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionColors {
    pub ascent: String,
    pub descent: String,
    pub traverse: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        BrowserConfig {
            data_url: DEFAULT_DATA_URL.to_string(),
            detail_page_prefix: DEFAULT_DETAIL_PREFIX.to_string(),
            elements: ElementIds::default(),
            selectors: vec![
                SelectorBinding {
                    field: "province".to_string(),
                    element: "province-filter".to_string(),
                },
                SelectorBinding {
                    field: "region".to_string(),
                    element: "region-filter".to_string(),
                },
            ],
            text_fields: crate::filter::DEFAULT_TEXT_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            hero_actions: vec![
                HeroAction {
                    button: "hero-browse".to_string(),
                    section: "tours".to_string(),
                    preset: None,
                },
                HeroAction {
                    button: "hero-map".to_string(),
                    section: "map-section".to_string(),
                    preset: None,
                },
            ],
            map: MapConfig::default(),
        }
    }
}

impl Default for ElementIds {
    fn default() -> Self {
        ElementIds {
            search: "search".to_string(),
            fit_button: "fit-btn".to_string(),
            grid: "grid".to_string(),
            count: "count".to_string(),
            map: "map".to_string(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            access_token: None,
            style: "mapbox://styles/mapbox/outdoors-v12".to_string(),
            center: [-122.9, 50.1],
            zoom: 7.0,
            colors: DirectionColors::default(),
            line_width: 3.0,
            point_radius: 6.0,
            fit_padding: 40.0,
            fit_duration_ms: 800.0,
            fit_max_zoom: 13.0,
        }
    }
}

impl Default for DirectionColors {
    fn default() -> Self {
        DirectionColors {
            ascent: "#d7263d".to_string(),
            descent: "#1b98e0".to_string(),
            traverse: "#f49d37".to_string(),
        }
    }
}

impl BrowserConfig {
    /// Reads the config object handed over from JavaScript. `undefined` and
    /// `null` give the defaults.
    pub fn from_js(value: JsValue) -> Result<Self, BrowserError> {
        let config: BrowserConfig = if value.is_undefined() || value.is_null() {
            BrowserConfig::default()
        } else {
            serde_wasm_bindgen::from_value(value)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BrowserError> {
        if self.data_url.trim().is_empty() {
            return Err(BrowserError::Config("dataUrl must not be empty".to_string()));
        }
        let required = [
            ("elements.search", &self.elements.search),
            ("elements.grid", &self.elements.grid),
            ("elements.count", &self.elements.count),
            ("elements.map", &self.elements.map),
        ];
        for (name, id) in required {
            if id.trim().is_empty() {
                return Err(BrowserError::Config(format!("{} must not be empty", name)));
            }
        }
        if let Some(binding) = self.selectors.iter().find(|b| b.field.trim().is_empty()) {
            return Err(BrowserError::Config(format!(
                "selector #{} has no field",
                binding.element
            )));
        }
        if !(self.map.fit_padding >= 0.0) || !(self.map.fit_max_zoom > 0.0) {
            return Err(BrowserError::Config(
                "map.fitPadding must be >= 0 and map.fitMaxZoom > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn selector_fields(&self) -> Vec<String> {
        self.selectors.iter().map(|b| b.field.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: BrowserConfig = serde_json::from_value(json!({
            "dataUrl": "./data/alps.geojson",
            "elements": { "search": "q" },
            "map": { "fitPadding": 60 }
        }))
        .unwrap();
        assert_eq!(config.data_url, "./data/alps.geojson");
        assert_eq!(config.elements.search, "q");
        assert_eq!(config.elements.grid, "grid");
        assert_eq!(config.map.fit_padding, 60.0);
        assert_eq!(config.map.line_width, 3.0);
        assert_eq!(config.selector_fields(), vec!["province", "region"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_selector_variant_config() {
        let config: BrowserConfig = serde_json::from_value(json!({
            "selectors": [
                { "field": "difficulty", "element": "difficulty-filter" },
                { "field": "activity", "element": "activity-filter" }
            ],
            "heroActions": [
                { "button": "cta-easy", "section": "tours", "preset": "beginner" }
            ]
        }))
        .unwrap();
        assert_eq!(config.selector_fields(), vec!["difficulty", "activity"]);
        assert_eq!(config.hero_actions[0].preset.as_deref(), Some("beginner"));
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let mut config = BrowserConfig::default();
        config.data_url = " ".to_string();
        assert!(matches!(config.validate(), Err(BrowserError::Config(_))));

        let mut config = BrowserConfig::default();
        config.elements.map.clear();
        assert!(config.validate().is_err());

        let mut config = BrowserConfig::default();
        config.map.fit_padding = -1.0;
        assert!(config.validate().is_err());

        let mut config = BrowserConfig::default();
        config.selectors[0].field.clear();
        assert!(config.validate().is_err());
    }
}

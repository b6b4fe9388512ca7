use std::collections::BTreeMap;

use tour_models::{FeatureCollection, ModelError, TourFeature};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCache, RequestInit, Response};

use crate::error::BrowserError;
use crate::filter::{matches, FilterState};

/// A feature that passed the current filter, with its position in the store.
#[derive(Debug, Clone, Copy)]
pub struct VisibleTour<'a> {
    pub index: usize,
    pub feature: &'a TourFeature,
}

// Read-only for the lifetime of a page load. A successful fetch builds a
// new store; nothing mutates an existing one.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    features: Vec<TourFeature>,
    facets: BTreeMap<String, Vec<String>>,
}

impl FeatureStore {
    pub fn new(collection: FeatureCollection, facet_fields: &[String]) -> Self {
        let features = collection.features;
        let facets = facet_fields
            .iter()
            .map(|field| {
                let values = features
                    .iter()
                    .filter_map(|f| f.properties.field(field).map(|v| v.into_owned()));
                (field.clone(), distinct_sorted(values))
            })
            .collect();
        FeatureStore { features, facets }
    }

    pub fn from_geojson_str(text: &str, facet_fields: &[String]) -> Result<Self, ModelError> {
        Ok(Self::new(FeatureCollection::parse(text)?, facet_fields))
    }

    pub fn features(&self) -> &[TourFeature] {
        &self.features
    }

    pub fn get(&self, index: usize) -> Option<&TourFeature> {
        self.features.get(index)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Distinct values of a selector field, in display order.
    pub fn facet(&self, field: &str) -> &[String] {
        self.facets.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn filter(&self, state: &FilterState, text_fields: &[String]) -> Vec<VisibleTour<'_>> {
        self.features
            .iter()
            .enumerate()
            .filter(|(_, f)| matches(&f.properties, state, text_fields))
            .map(|(index, feature)| VisibleTour { index, feature })
            .collect()
    }
}

/// Sorted case-insensitively. Values differing only in case collapse to
/// the first spelling seen; empty values are dropped.
pub fn distinct_sorted<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for value in values.into_iter().filter(|v| !v.trim().is_empty()) {
        seen.entry(value.to_lowercase()).or_insert(value);
    }
    seen.into_values().collect()
}

pub fn cache_busted_url(url: &str, stamp: f64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}_={:.0}", url, separator, stamp)
}

// Fetch the data file, bypassing every cache layer
pub async fn fetch_feature_store(
    url: &str,
    facet_fields: &[String],
) -> Result<FeatureStore, BrowserError> {
    let window = web_sys::window().ok_or(BrowserError::NoWindow)?;

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_cache(RequestCache::NoStore);
    let request = Request::new_with_str_and_init(&cache_busted_url(url, js_sys::Date::now()), &init)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(BrowserError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let text = JsFuture::from(response.text()?).await?;
    let text = text.as_string().unwrap_or_default();
    Ok(FeatureStore::from_geojson_str(&text, facet_fields)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "geometry": null, "properties": { "title": "A", "province": "BC", "region": "whistler" } },
            null,
            { "type": "Feature", "geometry": null, "properties": { "title": "B", "province": "BC", "region": "Squamish" } },
            { "type": "Feature", "geometry": null, "properties": { "title": "C", "province": "AB", "region": "" } },
            { "type": "Feature", "geometry": null, "properties": { "title": "D", "region": "Canmore" } }
        ]
    }"#;

    fn fields() -> Vec<String> {
        vec!["province".to_string(), "region".to_string()]
    }

    #[test]
    fn test_store_drops_null_entries_and_builds_facets() {
        let store = FeatureStore::from_geojson_str(DATA, &fields()).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.facet("province"), ["AB", "BC"]);
        assert_eq!(store.facet("region"), ["Canmore", "Squamish", "whistler"]);
        assert!(store.facet("country").is_empty());
    }

    #[test]
    fn test_filter_keeps_store_order_and_indices() {
        let store = FeatureStore::from_geojson_str(DATA, &fields()).unwrap();
        let state = FilterState::default().with_selection("province", "bc");
        let visible = store.filter(&state, &[]);
        let picked: Vec<(usize, Option<&str>)> = visible
            .iter()
            .map(|v| (v.index, v.feature.properties.title.as_deref()))
            .collect();
        assert_eq!(picked, vec![(0, Some("A")), (1, Some("B"))]);
    }

    #[test]
    fn test_filter_is_idempotent_and_leaves_store_alone() {
        let store = FeatureStore::from_geojson_str(DATA, &fields()).unwrap();
        let before = store.features().to_vec();
        let state = FilterState::new("a");
        let text = vec!["title".to_string()];
        let first: Vec<usize> = store.filter(&state, &text).iter().map(|v| v.index).collect();
        let second: Vec<usize> = store.filter(&state, &text).iter().map(|v| v.index).collect();
        assert_eq!(first, second);
        assert_eq!(store.features(), before.as_slice());
    }

    #[test]
    fn test_distinct_sorted_is_case_insensitive() {
        let values = ["beta", "Alpha", "alpha", "Beta", "beta", "", "  "]
            .iter()
            .map(|s| s.to_string());
        assert_eq!(distinct_sorted(values), vec!["Alpha", "beta"]);
    }

    #[test]
    fn test_case_variants_share_one_option() {
        let text = r#"{ "features": [
            { "properties": { "title": "A", "province": "BC" } },
            { "properties": { "title": "B", "province": "bc" } },
            { "properties": { "title": "C", "province": "AB" } }
        ] }"#;
        let store = FeatureStore::from_geojson_str(text, &fields()).unwrap();
        assert_eq!(store.facet("province"), ["AB", "BC"]);

        let state = FilterState::default().with_selection("province", &store.facet("province")[1]);
        let titles: Vec<Option<&str>> = store
            .filter(&state, &[])
            .iter()
            .map(|v| v.feature.properties.title.as_deref())
            .collect();
        assert_eq!(titles, vec![Some("A"), Some("B")]);
    }

    #[test]
    fn test_cache_busted_url() {
        assert_eq!(cache_busted_url("./data/tours.geojson", 1700.0), "./data/tours.geojson?_=1700");
        assert_eq!(cache_busted_url("/tours.json?v=2", 5.4), "/tours.json?v=2&_=5");
    }
}

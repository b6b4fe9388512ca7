use std::borrow::Cow;

use tour_models::TourProperties;

/// Properties concatenated into the free-text search haystack.
pub const DEFAULT_TEXT_FIELDS: &[&str] = &[
    "title",
    "region",
    "subtitle",
    "province",
    "country",
    "activity",
    "difficulty",
];

/// Current state of the search box and selectors. Values are stored
/// trimmed and lower-cased; empty selector values are not stored at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    query: String,
    selections: Vec<(String, String)>,
}

impl FilterState {
    pub fn new(query: &str) -> Self {
        FilterState {
            query: query.trim().to_lowercase(),
            selections: Vec::new(),
        }
    }

    pub fn with_selection(mut self, field: &str, value: &str) -> Self {
        let value = value.trim().to_lowercase();
        if !value.is_empty() {
            self.selections.push((field.to_string(), value));
        }
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selections(&self) -> &[(String, String)] {
        &self.selections
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.selections.is_empty()
    }
}

pub fn haystack(properties: &TourProperties, text_fields: &[String]) -> String {
    text_fields
        .iter()
        .map(|field| properties.field(field).unwrap_or_default())
        .collect::<Vec<Cow<'_, str>>>()
        .join(" ")
        .to_lowercase()
}

/// True when the properties pass the text query and every active selector.
pub fn matches(properties: &TourProperties, state: &FilterState, text_fields: &[String]) -> bool {
    if !state.query.is_empty() && !haystack(properties, text_fields).contains(&state.query) {
        return false;
    }
    state.selections.iter().all(|(field, wanted)| {
        let actual = properties.field(field).unwrap_or_default().to_lowercase();
        actual == *wanted
    })
}

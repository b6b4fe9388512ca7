use serde_json::Value;

use crate::cards::CardView;
use crate::config::BrowserConfig;
use crate::feature_store::FeatureStore;
use crate::filter::FilterState;
use crate::tour_map::source_data;

/// Everything one filter change pushes into the two views.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub cards: Vec<CardView>,
    pub map_data: Value,
}

impl RenderPlan {
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn map_feature_count(&self) -> usize {
        self.map_data["features"].as_array().map(Vec::len).unwrap_or(0)
    }
}

pub fn plan(store: &FeatureStore, state: &FilterState, config: &BrowserConfig) -> RenderPlan {
    let visible = store.filter(state, &config.text_fields);
    let cards = visible
        .iter()
        .map(|v| CardView::from_feature(v.feature, &config.detail_page_prefix))
        .collect();
    RenderPlan {
        cards,
        map_data: source_data(&visible),
    }
}

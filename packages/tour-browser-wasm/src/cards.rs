use tour_models::{format_number, TourFeature, TourProperties};
use web_sys::{Document, Element, HtmlElement, HtmlImageElement};

use crate::dom::{create_element, element_by_id};
use crate::error::BrowserError;
use crate::navigation::resolve_target;

pub const PLACEHOLDER_COVER: &str = "No photo";
pub const DEFAULT_TITLE: &str = "Untitled tour";
pub const TARGET_ATTRIBUTE: &str = "data-href";

/// What one summary card shows, independent of the DOM.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub cover: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub chips: Vec<String>,
    pub target: Option<String>,
}

impl CardView {
    pub fn from_feature(feature: &TourFeature, detail_prefix: &str) -> Self {
        let p = &feature.properties;
        CardView {
            cover: p.cover.clone(),
            title: display_title(p),
            subtitle: p.region.clone().or_else(|| p.subtitle.clone()),
            chips: chips(p),
            target: resolve_target(p, detail_prefix),
        }
    }
}

pub fn display_title(properties: &TourProperties) -> String {
    properties
        .title
        .as_deref()
        .or(properties.slug.as_deref())
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

fn chips(p: &TourProperties) -> Vec<String> {
    let mut chips = Vec::new();
    if let Some(activity) = &p.activity {
        chips.push(activity.clone());
    }
    if let Some(difficulty) = &p.difficulty {
        chips.push(difficulty.clone());
    }
    if let Some(vert) = p.vert_m {
        chips.push(format!("{} m", format_number(vert)));
    }
    if let Some(distance) = p.distance_km {
        chips.push(format!("{} km", format_number(distance)));
    }
    chips
}

pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 tour".to_string()
    } else {
        format!("{} tours", count)
    }
}

/// The card grid and its count label.
pub struct CardGrid {
    document: Document,
    grid: HtmlElement,
    count: HtmlElement,
}

impl CardGrid {
    pub fn new(document: &Document, grid_id: &str, count_id: &str) -> Result<Self, BrowserError> {
        Ok(CardGrid {
            document: document.clone(),
            grid: element_by_id(document, grid_id)?,
            count: element_by_id(document, count_id)?,
        })
    }

    pub fn grid(&self) -> &HtmlElement {
        &self.grid
    }

    /// Replaces every card in the grid and updates the count label.
    pub fn render(&self, cards: &[CardView]) -> Result<(), BrowserError> {
        self.grid.set_inner_html("");
        for card in cards {
            let element = self.build_card(card)?;
            self.grid.append_child(&element)?;
        }
        self.set_status(&count_label(cards.len()));
        Ok(())
    }

    pub fn set_status(&self, text: &str) {
        self.count.set_text_content(Some(text));
    }

    fn build_card(&self, card: &CardView) -> Result<Element, BrowserError> {
        let doc = &self.document;
        let article: HtmlElement = create_element(doc, "article", "card")?;
        if let Some(target) = &card.target {
            article.set_attribute(TARGET_ATTRIBUTE, target)?;
            article.set_attribute("role", "link")?;
            article.set_tab_index(0);
        }

        let cover: HtmlElement = create_element(doc, "div", "card-cover")?;
        match &card.cover {
            Some(src) => {
                let img: HtmlImageElement = create_element(doc, "img", "")?;
                img.set_src(src);
                img.set_alt(&card.title);
                img.set_attribute("loading", "lazy")?;
                cover.append_child(&img)?;
            }
            None => {
                let placeholder: HtmlElement = create_element(doc, "span", "card-cover-placeholder")?;
                placeholder.set_text_content(Some(PLACEHOLDER_COVER));
                cover.append_child(&placeholder)?;
            }
        }
        article.append_child(&cover)?;

        let body: HtmlElement = create_element(doc, "div", "card-body")?;
        let title: HtmlElement = create_element(doc, "h3", "card-title")?;
        title.set_text_content(Some(&card.title));
        body.append_child(&title)?;

        if let Some(subtitle) = &card.subtitle {
            let line: HtmlElement = create_element(doc, "p", "card-subtitle")?;
            line.set_text_content(Some(subtitle));
            body.append_child(&line)?;
        }

        if !card.chips.is_empty() {
            let row: HtmlElement = create_element(doc, "div", "card-chips")?;
            for chip in &card.chips {
                let span: HtmlElement = create_element(doc, "span", "chip")?;
                span.set_text_content(Some(chip));
                row.append_child(&span)?;
            }
            body.append_child(&row)?;
        }

        article.append_child(&body)?;
        Ok(article.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(properties: serde_json::Value) -> TourFeature {
        serde_json::from_value(json!({ "geometry": null, "properties": properties })).unwrap()
    }

    #[test]
    fn test_full_card() {
        let card = CardView::from_feature(
            &feature(json!({
                "title": "Mount Brew",
                "slug": "brew",
                "region": "Whistler",
                "subtitle": "North couloir",
                "activity": "ski_tour",
                "difficulty": "advanced",
                "vert_m": 1450,
                "distance_km": 12.4,
                "cover": "./photos/brew/cover.jpg"
            })),
            "./tours/",
        );
        assert_eq!(card.cover.as_deref(), Some("./photos/brew/cover.jpg"));
        assert_eq!(card.title, "Mount Brew");
        assert_eq!(card.subtitle.as_deref(), Some("Whistler"));
        assert_eq!(card.chips, vec!["ski_tour", "advanced", "1450 m", "12.4 km"]);
        assert_eq!(card.target.as_deref(), Some("./tours/brew.html"));
    }

    #[test]
    fn test_missing_fields_are_omitted() {
        let card = CardView::from_feature(&feature(json!({ "slug": "ginpeak-up" })), "./tours/");
        assert_eq!(card.cover, None);
        assert_eq!(card.title, "ginpeak-up");
        assert_eq!(card.subtitle, None);
        assert!(card.chips.is_empty());
        assert_eq!(card.target.as_deref(), Some("./tours/ginpeak-up.html"));
    }

    #[test]
    fn test_subtitle_falls_back_and_title_defaults() {
        let card = CardView::from_feature(&feature(json!({ "subtitle": "Spring corn" })), "./tours/");
        assert_eq!(card.title, DEFAULT_TITLE);
        assert_eq!(card.subtitle.as_deref(), Some("Spring corn"));
        assert_eq!(card.target, None);
    }

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(0), "0 tours");
        assert_eq!(count_label(1), "1 tour");
        assert_eq!(count_label(12), "12 tours");
    }
}

use tour_models::TourProperties;

use crate::error::BrowserError;

/// Detail page for a tour: an explicit `page`, else `{prefix}{slug}.html`.
pub fn resolve_target(properties: &TourProperties, detail_prefix: &str) -> Option<String> {
    if let Some(page) = properties.page.as_deref() {
        return Some(page.to_string());
    }
    properties
        .slug
        .as_deref()
        .map(|slug| format!("{}{}.html", detail_prefix, slug))
}

// Opens in a new browsing context that cannot reach back to this page
pub fn open_target(url: &str) -> Result<(), BrowserError> {
    let window = web_sys::window().ok_or(BrowserError::NoWindow)?;
    window.open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: serde_json::Value) -> TourProperties {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_page_overrides_slug() {
        let p = props(json!({ "page": "https://example.org/brew", "slug": "brew" }));
        assert_eq!(
            resolve_target(&p, "./tours/").as_deref(),
            Some("https://example.org/brew")
        );
    }

    #[test]
    fn test_slug_builds_detail_path() {
        let p = props(json!({ "slug": "ginpeak-up" }));
        assert_eq!(
            resolve_target(&p, "./tours/").as_deref(),
            Some("./tours/ginpeak-up.html")
        );
    }

    #[test]
    fn test_nothing_to_open() {
        assert_eq!(resolve_target(&TourProperties::default(), "./tours/"), None);
        assert_eq!(resolve_target(&props(json!({ "page": "", "slug": " " })), "./tours/"), None);
    }
}

use crate::TourProperties;

/// Travel direction of a tour track, used to color it on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascent,
    Descent,
    Traverse,
    Unknown,
}

impl Direction {
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "up" | "ascent" => Direction::Ascent,
            "down" | "descent" => Direction::Descent,
            "traverse" | "cross" => Direction::Traverse,
            _ => Direction::Unknown,
        }
    }

    pub fn from_properties(properties: &TourProperties) -> Self {
        properties
            .direction()
            .map(Direction::classify)
            .unwrap_or(Direction::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascent => "ascent",
            Direction::Descent => "descent",
            Direction::Traverse => "traverse",
            Direction::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: serde_json::Value) -> TourProperties {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_classify_aliases() {
        assert_eq!(Direction::classify("up"), Direction::Ascent);
        assert_eq!(Direction::classify(" ASCENT "), Direction::Ascent);
        assert_eq!(Direction::classify("Down"), Direction::Descent);
        assert_eq!(Direction::classify("descent"), Direction::Descent);
        assert_eq!(Direction::classify("cross"), Direction::Traverse);
        assert_eq!(Direction::classify("Traverse"), Direction::Traverse);
        assert_eq!(Direction::classify("loop"), Direction::Unknown);
        assert_eq!(Direction::classify(""), Direction::Unknown);
    }

    #[test]
    fn test_legacy_field_matches_current_field() {
        let current = props(json!({ "direction": "ASCENT" }));
        let legacy = props(json!({ "dirction": "ascent" }));
        assert_eq!(Direction::from_properties(&current), Direction::Ascent);
        assert_eq!(Direction::from_properties(&legacy), Direction::Ascent);
    }

    #[test]
    fn test_current_field_wins_over_legacy() {
        let both = props(json!({ "direction": "down", "dirction": "up" }));
        assert_eq!(Direction::from_properties(&both), Direction::Descent);
        assert_eq!(
            Direction::from_properties(&TourProperties::default()),
            Direction::Unknown
        );
    }
}

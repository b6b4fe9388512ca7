//! Metadata encoded in GPX file names, e.g. `Ginpeak_CAN_BC_Whistler_up`.

const COUNTRIES: &[(&str, &str)] = &[
    ("CAN", "Canada"),
    ("USA", "United States"),
    ("AUT", "Austria"),
    ("DEU", "Germany"),
    ("CHE", "Switzerland"),
];

const PROVINCES: &[(&str, &str)] = &[
    ("BC", "British Columbia"),
    ("AB", "Alberta"),
    ("YT", "Yukon"),
    ("NT", "Northwest Territories"),
    ("NU", "Nunavut"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlugMetadata {
    pub title: String,
    pub country_code: String,
    pub country: String,
    pub province_code: String,
    pub province: String,
    pub region: String,
    pub direction: String,
}

impl SlugMetadata {
    // The last four `_`-separated parts are country code, province code,
    // region and direction; everything before them is the title. Slugs with
    // fewer than five parts only yield a title.
    pub fn parse(slug: &str) -> Self {
        let base = slug.replace('-', "_");
        let parts: Vec<&str> = base.split('_').filter(|p| !p.is_empty()).collect();

        let mut meta = SlugMetadata {
            title: title_from_slug(slug),
            ..Default::default()
        };
        if parts.len() < 5 {
            return meta;
        }

        let (title_parts, tail) = parts.split_at(parts.len() - 4);
        let title = title_parts.join(" ");
        if !title.trim().is_empty() {
            meta.title = title_case(title.trim());
        }

        meta.country_code = tail[0].to_uppercase();
        meta.country = expand(COUNTRIES, &meta.country_code);
        meta.province_code = tail[1].to_uppercase();
        meta.province = expand(PROVINCES, &meta.province_code);
        meta.region = title_case(tail[2]);
        meta.direction = tail[3].to_lowercase();
        meta
    }
}

fn expand(table: &[(&str, &str)], code: &str) -> String {
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// `brew-hut_north` -> `Brew Hut North`
pub fn title_from_slug(slug: &str) -> String {
    title_case(&slug.replace(['-', '_'], " "))
}

// Upper-cases the first letter of every alphabetic run and lower-cases the
// rest, so `o'neil` becomes `O'Neil`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_slug() {
        let meta = SlugMetadata::parse("Ginpeak_CAN_BC_Whistler_up");
        assert_eq!(
            meta,
            SlugMetadata {
                title: "Ginpeak".to_string(),
                country_code: "CAN".to_string(),
                country: "Canada".to_string(),
                province_code: "BC".to_string(),
                province: "British Columbia".to_string(),
                region: "Whistler".to_string(),
                direction: "up".to_string(),
            }
        );
    }

    #[test]
    fn test_multi_word_title_and_unknown_codes() {
        let meta = SlugMetadata::parse("brew_hut_north_nzl_xx_squamish_Traverse");
        assert_eq!(meta.title, "Brew Hut North");
        assert_eq!(meta.country, "NZL");
        assert_eq!(meta.province, "XX");
        assert_eq!(meta.region, "Squamish");
        assert_eq!(meta.direction, "traverse");
    }

    #[test]
    fn test_short_slug_only_has_title() {
        let meta = SlugMetadata::parse("ginpeak-up");
        assert_eq!(meta.title, "Ginpeak Up");
        assert!(meta.country.is_empty());
        assert!(meta.region.is_empty());
        assert!(meta.direction.is_empty());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("o'neil col 2nd"), "O'Neil Col 2Nd");
        assert_eq!(title_from_slug("WEDGE_mountain"), "Wedge Mountain");
    }
}

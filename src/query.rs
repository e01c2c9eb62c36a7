// Query classification: ambiguity check and the normalized search string
// every source receives (also the cache key body).

use crate::extractor::extract;
use crate::model::{CanonicalAttributes, Category};

/// Classification result: either the query is too vague to answer, or it
/// carries enough discriminators to fan out.
#[derive(Debug)]
pub enum Classified {
    Hint,
    Query {
        attrs: CanonicalAttributes,
        normalized: String,
    },
}

/// Parses the raw query and decides whether it is specific enough.
///
/// Queries under 2 trimmed characters and queries missing their category's
/// required discriminators are answered with a hint instead of a search.
pub fn classify(raw_query: &str) -> Classified {
    let raw = raw_query.trim();
    if raw.chars().count() < 2 {
        return Classified::Hint;
    }

    let attrs = extract(raw);
    if is_ambiguous(&attrs) {
        return Classified::Hint;
    }

    let normalized = build_search_query(&attrs, raw);
    Classified::Query { attrs, normalized }
}

/// Category-specific discriminator sets. An iPhone query without model and
/// storage tier cannot be answered meaningfully; a MacBook additionally
/// needs line, size and chip. AirPods are specific enough on their own.
fn is_ambiguous(attrs: &CanonicalAttributes) -> bool {
    match attrs.category {
        Some(Category::Iphone) => attrs.model.is_none() || attrs.storage.is_none(),
        Some(Category::Macbook) => {
            attrs.line.is_none()
                || attrs.size.is_none()
                || attrs.chip.is_none()
                || attrs.storage.is_none()
        }
        Some(Category::Ipad) => {
            attrs.line.is_none() || attrs.size.is_none() || attrs.storage.is_none()
        }
        Some(Category::Airpods) => false,
        None => true,
    }
}

/// Storage tier rendered as the bare number ("256gb" -> "256"); terabyte
/// tiers keep their unit.
fn storage_token(storage: &str) -> &str {
    storage.strip_suffix("gb").unwrap_or(storage)
}

fn color_tokens(color: Option<&str>, parts: &mut Vec<String>) {
    if let Some(color) = color {
        parts.extend(color.replace('_', " ").split_whitespace().map(String::from));
    }
}

/// Deterministic search string: category keyword followed by the present
/// fields in a fixed order, each in canonical textual form. Semantically
/// equivalent queries collapse to the same string, hence the same cache
/// key and the same request to every source. Unrecognized queries pass
/// through verbatim.
fn build_search_query(attrs: &CanonicalAttributes, raw: &str) -> String {
    let Some(cat) = attrs.category else {
        return raw.to_string();
    };
    let mut parts: Vec<String> = vec![cat.keyword().to_string()];

    match cat {
        Category::Iphone => {
            if let Some(model) = &attrs.model {
                parts.push(model.clone());
            }
            if let Some(line) = &attrs.line {
                parts.extend(line.split_whitespace().map(String::from));
            }
            if let Some(storage) = &attrs.storage {
                parts.push(storage_token(storage).to_string());
            }
            color_tokens(attrs.color.as_deref(), &mut parts);
        }
        Category::Macbook => {
            if let Some(line) = &attrs.line {
                parts.push(line.clone());
            }
            if let Some(size) = &attrs.size {
                parts.push(size.clone());
            }
            if let Some(chip) = &attrs.chip {
                parts.push(chip.to_uppercase());
            }
            if let Some(ram) = &attrs.ram {
                parts.push(format!("{ram}gb"));
            }
            if let Some(storage) = &attrs.storage {
                parts.push(storage_token(storage).to_string());
            }
            color_tokens(attrs.color.as_deref(), &mut parts);
        }
        Category::Ipad => {
            if let Some(line) = &attrs.line {
                if line != "ipad" {
                    parts.push(line.clone());
                }
            }
            if let Some(size) = &attrs.size {
                parts.push(size.clone());
            }
            if let Some(chip) = &attrs.chip {
                parts.push(chip.to_uppercase());
            }
            if let Some(ram) = &attrs.ram {
                parts.push(format!("{ram}gb"));
            }
            if let Some(storage) = &attrs.storage {
                parts.push(storage_token(storage).to_string());
            }
            color_tokens(attrs.color.as_deref(), &mut parts);
        }
        Category::Airpods => {
            if let Some(line) = &attrs.line {
                if line != "airpods" {
                    parts.push(line.clone());
                }
            }
            if let Some(model) = &attrs.model {
                parts.push(model.clone());
            }
            color_tokens(attrs.color.as_deref(), &mut parts);
        }
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract;

    fn normalized(raw: &str) -> String {
        match classify(raw) {
            Classified::Query { normalized, .. } => normalized,
            Classified::Hint => panic!("unexpected hint for {raw:?}"),
        }
    }

    #[test]
    fn too_short_query_is_a_hint() {
        assert!(matches!(classify("i"), Classified::Hint));
        assert!(matches!(classify("  a  "), Classified::Hint));
    }

    #[test]
    fn bare_iphone_is_ambiguous() {
        assert!(matches!(classify("iphone"), Classified::Hint));
        assert!(matches!(classify("iphone 16"), Classified::Hint));
        assert!(matches!(classify("iphone 256gb"), Classified::Hint));
    }

    #[test]
    fn iphone_with_model_and_storage_is_specific() {
        assert!(matches!(classify("iphone 16 256gb"), Classified::Query { .. }));
    }

    #[test]
    fn macbook_needs_line_size_chip_storage() {
        assert!(matches!(classify("macbook air m2 512gb"), Classified::Hint));
        assert!(matches!(classify("macbook air 13 512gb"), Classified::Hint));
        assert!(matches!(
            classify("macbook air 13 m2 512gb"),
            Classified::Query { .. }
        ));
    }

    #[test]
    fn airpods_are_never_ambiguous() {
        assert!(matches!(classify("airpods"), Classified::Query { .. }));
    }

    #[test]
    fn unrecognized_query_is_a_hint() {
        assert!(matches!(classify("thinkpad x1 carbon"), Classified::Hint));
    }

    #[test]
    fn equivalent_spellings_collapse_to_one_string() {
        let a = normalized("iPhone16 Pro 256GB");
        let b = normalized("iphone 16pro 256 gb");
        let c = normalized("iphone16pro256gb");
        assert_eq!(a, "iphone 16 pro 256");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn macbook_string_renders_chip_upper_and_ram_unit() {
        let s = normalized("macbook pro 14 m4 16gb 512gb space black");
        assert_eq!(s, "macbook pro 14 M4 16gb 512 space black");
    }

    #[test]
    fn ipad_base_line_is_omitted_from_the_string() {
        let s = normalized("ipad 10 64gb");
        assert_eq!(s, "ipad 10 64");
    }

    #[test]
    fn extraction_is_idempotent_over_the_normalized_string() {
        for raw in [
            "iPhone 16 Pro Max 256GB Desert Titanium",
            "MacBook Air M2 13 512GB Midnight",
            "ipad pro 11 m4 256gb",
            "airpods pro 2",
        ] {
            let first = extract(raw);
            let rebuilt = build_search_query(&first, raw);
            let second = extract(&rebuilt);
            assert_eq!(first, second, "normalized string: {rebuilt:?}");
        }
    }
}

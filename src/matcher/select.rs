// Candidate selection: required-match gate, weighted scoring and the
// three-level (score, price, specificity) comparator.

use crate::extractor::extract;
use crate::matcher::filters::contains_stopwords;
use crate::model::{CanonicalAttributes, Category, Listing};

/// Line with the category default applied: a plain "iphone 16" and a
/// listing with no line token both mean the base line; bare "airpods"
/// means the regular line.
fn norm_line<'a>(category: Category, line: Option<&'a str>) -> Option<&'a str> {
    match category {
        Category::Iphone => line.or(Some("base")),
        Category::Airpods => line.or(Some("airpods")),
        _ => line,
    }
}

fn eq_if_set(query: &Option<String>, candidate: &Option<String>) -> bool {
    query.is_none() || query == candidate
}

/// Strict equality on the fields the query actually specified; an unset
/// query field imposes no constraint. Which fields are checked depends on
/// the category.
fn required_match(query: &CanonicalAttributes, attrs: &CanonicalAttributes) -> bool {
    if let Some(qc) = query.category {
        if attrs.category != Some(qc) {
            return false;
        }
    }
    let Some(cat) = query.category.or(attrs.category) else {
        return false;
    };

    match cat {
        Category::Iphone => {
            if !eq_if_set(&query.model, &attrs.model) {
                return false;
            }
            if !eq_if_set(&query.storage, &attrs.storage) {
                return false;
            }
            let ql = norm_line(cat, query.line.as_deref());
            let il = norm_line(cat, attrs.line.as_deref());
            if ql.is_some() && ql != il {
                return false;
            }
            eq_if_set(&query.color, &attrs.color)
        }
        Category::Macbook => {
            eq_if_set(&query.line, &attrs.line)
                && eq_if_set(&query.size, &attrs.size)
                && eq_if_set(&query.chip, &attrs.chip)
                && eq_if_set(&query.storage, &attrs.storage)
                && eq_if_set(&query.color, &attrs.color)
        }
        Category::Ipad => {
            eq_if_set(&query.line, &attrs.line)
                && eq_if_set(&query.size, &attrs.size)
                && eq_if_set(&query.storage, &attrs.storage)
                && eq_if_set(&query.chip, &attrs.chip)
                && eq_if_set(&query.color, &attrs.color)
        }
        Category::Airpods => {
            let ql = norm_line(cat, query.line.as_deref());
            let il = norm_line(cat, attrs.line.as_deref());
            if ql.is_some() && ql != il {
                return false;
            }
            eq_if_set(&query.model, &attrs.model) && eq_if_set(&query.color, &attrs.color)
        }
    }
}

fn add_if_eq(score: &mut u32, weight: u32, query: &Option<String>, candidate: &Option<String>) {
    if query.is_some() && query == candidate {
        *score += weight;
    }
}

/// Category-specific fixed weight table. Only fields the query specified
/// contribute, and only on exact match.
fn score(query: &CanonicalAttributes, attrs: &CanonicalAttributes) -> u32 {
    let Some(cat) = query.category.or(attrs.category) else {
        return 0;
    };

    let mut s = 0;
    match cat {
        Category::Iphone => {
            add_if_eq(&mut s, 5, &query.model, &attrs.model);
            add_if_eq(&mut s, 5, &query.storage, &attrs.storage);
            let ql = norm_line(cat, query.line.as_deref());
            let il = norm_line(cat, attrs.line.as_deref());
            if ql.is_some() && ql == il {
                s += 3;
            }
            add_if_eq(&mut s, 1, &query.color, &attrs.color);
        }
        Category::Macbook => {
            add_if_eq(&mut s, 5, &query.chip, &attrs.chip);
            add_if_eq(&mut s, 4, &query.line, &attrs.line);
            add_if_eq(&mut s, 4, &query.storage, &attrs.storage);
            add_if_eq(&mut s, 3, &query.size, &attrs.size);
            add_if_eq(&mut s, 1, &query.color, &attrs.color);
        }
        Category::Ipad => {
            add_if_eq(&mut s, 4, &query.line, &attrs.line);
            add_if_eq(&mut s, 4, &query.storage, &attrs.storage);
            add_if_eq(&mut s, 3, &query.size, &attrs.size);
            add_if_eq(&mut s, 2, &query.chip, &attrs.chip);
            add_if_eq(&mut s, 1, &query.color, &attrs.color);
        }
        Category::Airpods => {
            let ql = norm_line(cat, query.line.as_deref());
            let il = norm_line(cat, attrs.line.as_deref());
            if ql.is_some() && ql == il {
                s += 5;
            }
            add_if_eq(&mut s, 3, &query.model, &attrs.model);
            if query.model.is_none() && attrs.model.is_none() {
                s += 1;
            }
            add_if_eq(&mut s, 1, &query.color, &attrs.color);
        }
    }
    s
}

/// Picks the single best listing for the query, or `None` when nothing
/// qualifies.
///
/// Candidates are walked in input order; the running best is replaced only
/// by a strictly higher score, then a strictly lower price on a score tie,
/// then a strictly higher specificity on a score-and-price tie, so the
/// first-seen candidate wins any remaining tie. Attributes computed for a
/// title are cached on the listing and reused if the slice is scored again.
pub fn select_best(items: &mut [Listing], query: &CanonicalAttributes) -> Option<Listing> {
    let mut best: Option<(usize, u32, u64, usize)> = None;

    for i in 0..items.len() {
        if contains_stopwords(&items[i].title) {
            continue;
        }

        let item = &mut items[i];
        if item.attrs.is_none() {
            item.attrs = Some(extract(&item.title));
        }
        let Some(attrs) = item.attrs.as_ref() else {
            continue;
        };

        if !required_match(query, attrs) {
            continue;
        }

        let Some(price) = item.price.as_int() else {
            continue;
        };

        let item_score = score(query, attrs);
        let item_spec = attrs.specificity();

        match best {
            None => best = Some((i, item_score, price, item_spec)),
            Some((_, best_score, best_price, best_spec)) => {
                if item_score > best_score {
                    best = Some((i, item_score, price, item_spec));
                } else if item_score == best_score {
                    if price < best_price {
                        best = Some((i, item_score, price, item_spec));
                    } else if price == best_price && item_spec > best_spec {
                        best = Some((i, item_score, price, item_spec));
                    }
                }
            }
        }
    }

    best.map(|(i, _, _, _)| items[i].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PriceTag;

    fn listing(title: &str, price: PriceTag) -> Listing {
        Listing::new("TestShop", title.to_string(), price, format!("/item/{title}"))
    }

    fn query(text: &str) -> CanonicalAttributes {
        extract(text)
    }

    #[test]
    fn lower_price_wins_on_score_tie() {
        let q = query("iphone 16 pro 256gb");
        let mut items = vec![
            listing("iPhone 16 Pro 256GB", PriceTag::Number(105_000)),
            listing("iPhone 16 Pro 256GB", PriceTag::Number(99_990)),
        ];
        let best = select_best(&mut items, &q).unwrap();
        assert_eq!(best.price, PriceTag::Number(99_990));
    }

    #[test]
    fn higher_specificity_wins_on_score_and_price_tie() {
        let q = query("iphone 16 256gb");
        let mut items = vec![
            listing("iPhone 16 256GB", PriceTag::Number(80_000)),
            listing("iPhone 16 256GB Blue", PriceTag::Number(80_000)),
        ];
        let best = select_best(&mut items, &q).unwrap();
        assert_eq!(best.title, "iPhone 16 256GB Blue");
    }

    #[test]
    fn first_seen_wins_full_tie() {
        let q = query("iphone 16 256gb");
        let mut items = vec![
            listing("iPhone 16 256GB Blue", PriceTag::Number(80_000)),
            listing("iPhone 16 256GB Pink", PriceTag::Number(80_000)),
        ];
        let best = select_best(&mut items, &q).unwrap();
        assert_eq!(best.title, "iPhone 16 256GB Blue");
    }

    #[test]
    fn base_line_query_rejects_pro_listings() {
        let q = query("iphone 16 256gb");
        let mut items = vec![
            listing("iPhone 16 Pro 256GB", PriceTag::Number(90_000)),
            listing("iPhone 16 256GB", PriceTag::Number(85_000)),
        ];
        let best = select_best(&mut items, &q).unwrap();
        assert_eq!(best.title, "iPhone 16 256GB");
    }

    #[test]
    fn stopword_titles_are_rejected() {
        let q = query("iphone 16 256gb");
        let mut items = vec![
            listing("Чехол для iPhone 16 256GB", PriceTag::Number(500)),
            listing("iPhone 16 256GB", PriceTag::Number(85_000)),
        ];
        let best = select_best(&mut items, &q).unwrap();
        assert_eq!(best.title, "iPhone 16 256GB");
    }

    #[test]
    fn unparsable_price_discards_the_listing() {
        let q = query("iphone 16 256gb");
        let mut items = vec![listing("iPhone 16 256GB", PriceTag::Text("цена договорная".into()))];
        assert!(select_best(&mut items, &q).is_none());
    }

    #[test]
    fn textual_price_digits_are_concatenated() {
        let q = query("iphone 16 256gb");
        let mut items = vec![listing("iPhone 16 256GB", PriceTag::Text("79 990 ₽".into()))];
        let best = select_best(&mut items, &q).unwrap();
        assert_eq!(best.price.as_int(), Some(79_990));
    }

    #[test]
    fn wrong_storage_is_gated_out() {
        let q = query("iphone 16 256gb");
        let mut items = vec![listing("iPhone 16 128GB", PriceTag::Number(70_000))];
        assert!(select_best(&mut items, &q).is_none());
    }

    #[test]
    fn macbook_gate_checks_every_specified_field() {
        let q = query("macbook air 13 m2 512gb");
        let mut items = vec![
            listing("MacBook Air M2 13 256GB", PriceTag::Number(95_000)),
            listing("MacBook Air M3 13 512GB", PriceTag::Number(120_000)),
            listing("MacBook Air M2 13 512GB", PriceTag::Number(110_000)),
        ];
        let best = select_best(&mut items, &q).unwrap();
        assert_eq!(best.title, "MacBook Air M2 13 512GB");
    }

    #[test]
    fn airpods_without_model_match_modelless_listings() {
        let q = query("airpods pro");
        let mut items = vec![
            listing("AirPods Pro 2", PriceTag::Number(20_000)),
            listing("AirPods Pro", PriceTag::Number(18_000)),
        ];
        // Query has no model, so both pass the gate; the modelless
        // listing additionally collects the no-model bonus point.
        let best = select_best(&mut items, &q).unwrap();
        assert_eq!(best.title, "AirPods Pro");
    }

    #[test]
    fn attributes_are_cached_on_the_listing() {
        let q = query("iphone 16 256gb");
        let mut items = vec![listing("iPhone 16 256GB", PriceTag::Number(85_000))];
        assert!(items[0].attrs.is_none());
        select_best(&mut items, &q);
        assert!(items[0].attrs.is_some());
    }

    #[test]
    fn uncategorized_listings_never_match() {
        let q = query("iphone 16 256gb");
        let mut items = vec![listing("Ноутбук игровой 256GB", PriceTag::Number(85_000))];
        assert!(select_best(&mut items, &q).is_none());
    }
}

//! Parsing of delimited free-text replies into candidates
//!
//! The collaborator is unreliable, so nothing here fails: segments that do not
//! carry a usable `NAME` are dropped and every other field falls back to a default.

use super::ENTRY_DELIMITER;
use crate::domain::place::{Candidate, PlaceCategory};

pub fn parse_response(text: &str, category: PlaceCategory) -> Vec<Candidate> {
    text.split(ENTRY_DELIMITER)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| parse_segment(segment, category))
        .collect()
}

fn parse_segment(segment: &str, category: PlaceCategory) -> Option<Candidate> {
    let fields = SegmentFields::extract(segment);
    let name = fields.name.filter(|name| !name.is_empty())?;

    let mut candidate = Candidate::new(name, category);
    candidate.description = fields.description.unwrap_or_default();
    candidate.rating =
        fields.rating.as_deref().and_then(parse_rating).unwrap_or(Candidate::DEFAULT_RATING);
    candidate.price_level = fields
        .price
        .as_deref()
        .and_then(parse_price_level)
        .unwrap_or(Candidate::DEFAULT_PRICE_LEVEL);
    candidate.address_hint = fields.location.filter(|location| !location.is_empty());
    candidate.is_hidden_gem = fields.hidden_gem.as_deref().map(parse_flag);
    candidate.cuisine = fields.cuisine.filter(|value| !value.is_empty());
    candidate.best_time = fields.best_time.filter(|value| !value.is_empty());
    candidate.amenities = fields.amenities.as_deref().map(split_list).unwrap_or_default();

    Some(candidate)
}

#[derive(Debug, Default)]
struct SegmentFields {
    name: Option<String>,
    description: Option<String>,
    rating: Option<String>,
    price: Option<String>,
    location: Option<String>,
    hidden_gem: Option<String>,
    cuisine: Option<String>,
    best_time: Option<String>,
    amenities: Option<String>,
}

impl SegmentFields {
    fn extract(segment: &str) -> Self {
        let mut fields = Self::default();

        for line in segment.lines() {
            let Some((label, value)) = split_labeled_line(line) else {
                continue;
            };

            let slot = match label.as_str() {
                "NAME" => &mut fields.name,
                "DESCRIPTION" => &mut fields.description,
                "RATING" => &mut fields.rating,
                "PRICE" => &mut fields.price,
                "LOCATION" => &mut fields.location,
                "HIDDEN_GEM" => &mut fields.hidden_gem,
                "CUISINE" => &mut fields.cuisine,
                "BEST_TIME" => &mut fields.best_time,
                "AMENITIES" => &mut fields.amenities,
                _ => continue,
            };

            // first occurrence wins
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        fields
    }
}

/// Splits `LABEL: value`, tolerating list markers and markdown bold around the label.
fn split_labeled_line(line: &str) -> Option<(String, String)> {
    let stripped = strip_list_numbering(line.trim().trim_start_matches(['-', '*', '#', ' ']));
    let (raw_label, raw_value) = stripped.split_once(':')?;

    let label = raw_label.trim().trim_matches('*').trim().to_ascii_uppercase().replace(' ', "_");
    if label.is_empty() || !label.chars().all(|ch| ch.is_ascii_alphabetic() || ch == '_') {
        return None;
    }

    let value = raw_value.trim().trim_matches('*').trim().to_string();
    Some((label, value))
}

/// Drops a leading `1.` or `2)` marker.
fn strip_list_numbering(line: &str) -> &str {
    let rest = line.trim_start_matches(|ch: char| ch.is_ascii_digit());
    if rest.len() == line.len() {
        return line;
    }
    match rest.strip_prefix(['.', ')']) {
        Some(rest) => rest.trim_start_matches(['-', '*', '#', ' ']),
        None => line,
    }
}

fn parse_rating(raw: &str) -> Option<f64> {
    let rating = leading_number(raw)?;
    rating.is_finite().then(|| rating.clamp(0.0, 5.0))
}

/// Currency symbols count first; otherwise the first number, clamped into 1..=5.
fn parse_price_level(raw: &str) -> Option<u8> {
    let symbols = raw.chars().filter(|ch| matches!(ch, '$' | '€' | '£' | '₹')).count();
    if symbols > 0 {
        return Some(symbols.min(5) as u8);
    }

    leading_number(raw).map(|level| level.round().clamp(1.0, 5.0) as u8)
}

/// First decimal number appearing in the value, e.g. `4.6/5` yields 4.6.
fn leading_number(raw: &str) -> Option<f64> {
    let start = raw.find(|ch: char| ch.is_ascii_digit())?;
    let digits: String = raw[start..]
        .chars()
        .take_while(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();
    digits.trim_end_matches('.').parse::<f64>().ok()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "yes" | "y" | "true" | "1")
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty()).map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "NAME: Eiffel Tower
DESCRIPTION: Iron lattice landmark on the Champ de Mars.
RATING: 4.7
PRICE: 3
LOCATION: Champ de Mars, 7th arrondissement
BEST_TIME: Sunset
---
NAME: Musee d'Orsay
DESCRIPTION: Impressionist masterpieces in a former railway station.
RATING: 4.8/5
PRICE: $$
LOCATION: 1 Rue de la Legion d'Honneur
---
";

    #[test]
    fn parses_well_formed_segments() {
        let candidates = parse_response(WELL_FORMED, PlaceCategory::Attraction);

        assert_eq!(candidates.len(), 2);
        let tower = &candidates[0];
        assert_eq!(tower.name, "Eiffel Tower");
        assert_eq!(tower.category, PlaceCategory::Attraction);
        assert_eq!(tower.rating, 4.7);
        assert_eq!(tower.price_level, 3);
        assert_eq!(tower.address_hint.as_deref(), Some("Champ de Mars, 7th arrondissement"));
        assert_eq!(tower.best_time.as_deref(), Some("Sunset"));
        assert!(tower.location.is_none());

        let orsay = &candidates[1];
        assert_eq!(orsay.rating, 4.8);
        assert_eq!(orsay.price_level, 2);
    }

    #[test]
    fn parsing_is_idempotent_on_well_formed_input() {
        assert_eq!(
            parse_response(WELL_FORMED, PlaceCategory::Attraction),
            parse_response(WELL_FORMED, PlaceCategory::Attraction)
        );
    }

    #[test]
    fn segments_without_name_are_dropped() {
        let text = "DESCRIPTION: nameless\nRATING: 5\n---\nNAME:   \n---\n\
                    name: Cafe de Flore\nrating: 4.2";
        let candidates = parse_response(text, PlaceCategory::Restaurant);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Cafe de Flore");
    }

    #[test]
    fn text_without_delimiters_is_a_single_segment() {
        let candidates = parse_response(
            "Here are some ideas!\nNAME: Le Comptoir\nCUISINE: French bistro",
            PlaceCategory::Restaurant,
        );

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].cuisine.as_deref(), Some("French bistro"));
    }

    #[test]
    fn garbage_input_never_panics() {
        for text in ["", "---", "------", ":::", "NAME", "\u{0}\u{1}---::", "RATING: NAME: x"] {
            let _ = parse_response(text, PlaceCategory::Attraction);
        }
        assert!(parse_response("---\n---\n", PlaceCategory::Attraction).is_empty());
    }

    #[test]
    fn missing_or_bad_rating_and_price_use_defaults() {
        let candidates = parse_response(
            "NAME: Hostel One\nRATING: excellent\nPRICE: cheap",
            PlaceCategory::Accommodation,
        );

        assert_eq!(candidates[0].rating, 4.0);
        assert_eq!(candidates[0].price_level, 2);
    }

    #[test]
    fn rating_and_price_are_clamped() {
        let candidates =
            parse_response("NAME: Overhyped\nRATING: 9.5\nPRICE: 7", PlaceCategory::Restaurant);

        assert_eq!(candidates[0].rating, 5.0);
        assert_eq!(candidates[0].price_level, 5);
    }

    #[test]
    fn tolerates_markdown_labels_and_spaced_hidden_gem() {
        let text = "- **Name:** Shakespeare and Company\n* **Hidden Gem:** Yes\n**Rating**: 4.6";
        let candidates = parse_response(text, PlaceCategory::Attraction);

        assert_eq!(candidates[0].name, "Shakespeare and Company");
        assert_eq!(candidates[0].is_hidden_gem, Some(true));
        assert_eq!(candidates[0].rating, 4.6);
    }

    #[test]
    fn numbered_entries_keep_their_fields() {
        let text =
            "1. NAME: Eiffel Tower\nRATING: 4.7\n---\n2) **Name:** Louvre Museum\nRATING: 4.8";
        let candidates = parse_response(text, PlaceCategory::Attraction);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "Eiffel Tower");
        assert_eq!(candidates[1].name, "Louvre Museum");
        assert_eq!(candidates[1].rating, 4.8);
    }

    #[test]
    fn currency_symbols_win_over_amounts_in_price() {
        let candidates = parse_response(
            "NAME: Bistro\nPRICE: $$ (about 25 EUR)\n---\nNAME: Brasserie\nPRICE: 3 (~40 EUR)",
            PlaceCategory::Restaurant,
        );

        assert_eq!(candidates[0].price_level, 2);
        assert_eq!(candidates[1].price_level, 3);
    }

    #[test]
    fn amenities_are_split_and_trimmed() {
        let text = "NAME: Hotel Lutetia\nAMENITIES: Spa , Free WiFi,, Rooftop bar ";
        let candidates = parse_response(text, PlaceCategory::Accommodation);

        assert_eq!(candidates[0].amenities, vec!["Spa", "Free WiFi", "Rooftop bar"]);
    }

    #[test]
    fn first_occurrence_of_a_label_wins() {
        let candidates = parse_response("NAME: First\nNAME: Second", PlaceCategory::Restaurant);
        assert_eq!(candidates[0].name, "First");
    }
}

//! Prompt construction for the text-generation collaborator
//!
//! Every section is conditional on the option or trip field that drives it, so
//! absent fields never show up as empty or placeholder lines. Section order is
//! fixed and the output is deterministic for a given input.

use std::fmt::Write as _;

use super::options::{RecommendationOptions, SortBy};
use super::{ENTRY_DELIMITER, RECOMMENDATIONS_PER_CATEGORY, TOP_RATED_THRESHOLD};
use crate::domain::place::PlaceCategory;
use crate::domain::trip::TripContext;

/// System instruction sent with every recommendation prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert local travel guide. You recommend real, \
currently operating places and answer strictly in the requested plain-text format.";

/// Trip context and user options that shape one prompt.
#[derive(Clone, Copy, Debug)]
pub struct PromptContext<'a> {
    pub trip: &'a TripContext,
    pub options: &'a RecommendationOptions,
}

impl<'a> PromptContext<'a> {
    pub fn new(trip: &'a TripContext, options: &'a RecommendationOptions) -> Self {
        Self { trip, options }
    }
}

pub fn build_prompt(
    category: PlaceCategory,
    destination: &str,
    context: &PromptContext<'_>,
) -> String {
    let trip = context.trip;
    let options = context.options;
    let mut sections = Vec::new();

    sections.push(format!(
        "Recommend exactly {RECOMMENDATIONS_PER_CATEGORY} real {} in {destination}.",
        category.plural_label()
    ));

    push_block(&mut sections, "Trip details:", trip_detail_bullets(trip, options));
    push_block(&mut sections, "Quality requirements:", quality_bullets(options));
    push_block(&mut sections, "Price constraints:", price_bullets(options));

    let top_categories = trip.top_categories();
    if !top_categories.is_empty() {
        sections.push(format!(
            "User preferences:\n- The traveler usually enjoys: {}",
            top_categories.join(", ")
        ));
    }

    match options.sort_by {
        SortBy::BestMatch => {}
        SortBy::Rating => sections.push(
            "Priority:\n- List the highest-rated places first.".to_string(),
        ),
        SortBy::Distance => sections.push(
            "Priority:\n- List the places closest to the city center first.".to_string(),
        ),
    }

    sections.push(output_fields(category, options));
    sections.push(rules(options));
    sections.push(format!(
        "Separate each place with a line containing only {ENTRY_DELIMITER}. \
Do not add any introduction, numbering, or closing remarks."
    ));

    sections.join("\n\n")
}

fn push_block(sections: &mut Vec<String>, heading: &str, bullets: Vec<String>) {
    if bullets.is_empty() {
        return;
    }
    let mut block = heading.to_string();
    for bullet in bullets {
        let _ = write!(block, "\n- {bullet}");
    }
    sections.push(block);
}

fn trip_detail_bullets(trip: &TripContext, options: &RecommendationOptions) -> Vec<String> {
    let mut bullets = Vec::new();

    if let Some(budget) = trip.budget.filter(|budget| *budget > 0.0) {
        match trip.currency.as_deref().map(str::trim).filter(|currency| !currency.is_empty()) {
            Some(currency) => bullets.push(format!("Total budget: {budget} {currency}")),
            None => bullets.push(format!("Total budget: {budget}")),
        }
    }
    if let Some(days) = trip.duration_days.filter(|days| *days > 0) {
        bullets.push(format!("Duration: {days} day{}", plural_suffix(days)));
    }
    if let Some(travelers) = trip.travelers.filter(|travelers| *travelers > 0) {
        let noun = if travelers == 1 { "person" } else { "people" };
        bullets.push(format!("Travelers: {travelers} {noun}"));
    }
    if options.max_radius > 0.0 {
        bullets.push(format!("Search radius: within {} km of the city center", options.max_radius));
    }

    bullets
}

fn quality_bullets(options: &RecommendationOptions) -> Vec<String> {
    let mut bullets = Vec::new();

    if options.min_rating > 0.0 {
        bullets.push(format!("Minimum rating: {} out of 5", options.min_rating));
    }
    if options.top_rated_only {
        bullets.push(format!("Only top-rated places ({TOP_RATED_THRESHOLD}+ stars)"));
    }
    if options.show_hidden_gems {
        bullets.push(
            "Prefer hidden gems: lesser-known local favorites away from the main tourist crowds"
                .to_string(),
        );
    }

    bullets
}

fn price_bullets(options: &RecommendationOptions) -> Vec<String> {
    let Some(range) = options.active_price_range() else {
        return Vec::new();
    };

    let mut bullets = Vec::new();
    if let Some(min) = range.min {
        bullets.push(format!("Price level at least {min} on a 1-5 scale"));
    }
    if let Some(max) = range.max {
        bullets.push(format!("Price level at most {max} on a 1-5 scale"));
    }
    bullets
}

fn output_fields(category: PlaceCategory, options: &RecommendationOptions) -> String {
    let mut fields = String::from(
        "For each place, provide these fields exactly:\n\
NAME: the official name\n\
DESCRIPTION: one or two sentences on why it is worth visiting\n\
RATING: average visitor rating from 0 to 5\n\
PRICE: price level from 1 (budget) to 5 (luxury)\n\
LOCATION: street address or neighborhood",
    );

    if options.show_hidden_gems {
        fields.push_str("\nHIDDEN_GEM: yes or no");
    }

    fields.push_str(match category {
        PlaceCategory::Restaurant => "\nCUISINE: main cuisine type",
        PlaceCategory::Attraction => "\nBEST_TIME: best time of day or season to visit",
        PlaceCategory::Accommodation => "\nAMENITIES: comma-separated list of key amenities",
    });

    fields
}

fn rules(options: &RecommendationOptions) -> String {
    let mut rules = String::from("Rules:\n- Only include real places that currently exist");

    if options.min_rating > 0.0 {
        let _ = write!(rules, "\n- Do not include places rated below {}", options.min_rating);
    }
    if options.top_rated_only {
        let _ = write!(rules, "\n- Every place must be rated {TOP_RATED_THRESHOLD} or higher");
    }
    if let Some(range) = options.active_price_range() {
        let _ = write!(
            rules,
            "\n- Every place must have a price level between {} and {}",
            range.min.unwrap_or(1),
            range.max.unwrap_or(5)
        );
    }
    if options.max_radius > 0.0 {
        let _ = write!(rules, "\n- Stay within {} km of the city center", options.max_radius);
    }
    rules.push_str("\n- Do not repeat a place");

    rules
}

fn plural_suffix(count: u32) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trip::CategoryPreference;
    use crate::recommendations::options::PriceRange;

    fn build(
        trip: &TripContext,
        options: &RecommendationOptions,
        category: PlaceCategory,
    ) -> String {
        build_prompt(category, &trip.display_destination(), &PromptContext::new(trip, options))
    }

    #[test]
    fn opening_names_category_destination_and_count() {
        let trip = TripContext::new("Paris");
        let prompt = build(&trip, &RecommendationOptions::default(), PlaceCategory::Restaurant);

        assert!(prompt.starts_with("Recommend exactly 10 real restaurants in Paris."));
        assert!(prompt
            .trim_end()
            .ends_with("Do not add any introduction, numbering, or closing remarks."));
        assert!(prompt.contains("line containing only ---"));
    }

    #[test]
    fn absent_trip_fields_never_render_placeholder_lines() {
        let trip = TripContext::new("Lisbon");
        let prompt = build(&trip, &RecommendationOptions::default(), PlaceCategory::Attraction);

        assert!(!prompt.contains("Total budget"));
        assert!(!prompt.contains("Duration"));
        assert!(!prompt.contains("Travelers"));
        assert!(!prompt.contains("Price constraints"));
        assert!(!prompt.contains("User preferences"));
        assert!(!prompt.contains("Priority:"));
        assert!(!prompt.contains("HIDDEN_GEM"));
        assert!(!prompt.contains("None"));
    }

    #[test]
    fn present_fields_render_in_fixed_order() {
        let mut trip = TripContext::new("Jaipur");
        trip.country = Some("India".to_string());
        trip.budget = Some(1500.0);
        trip.currency = Some("USD".to_string());
        trip.duration_days = Some(5);
        trip.travelers = Some(2);
        trip.preferences = vec![
            CategoryPreference { category: "attraction".to_string(), weight: 12.0 },
            CategoryPreference { category: "restaurant".to_string(), weight: 6.0 },
        ];
        let options = RecommendationOptions {
            show_hidden_gems: true,
            top_rated_only: true,
            price_range: Some(PriceRange { min: Some(2), max: Some(3) }),
            sort_by: SortBy::Distance,
            ..RecommendationOptions::default()
        };

        let prompt = build(&trip, &options, PlaceCategory::Attraction);

        assert!(prompt.contains("in Jaipur, India."));
        assert!(prompt.contains("- Total budget: 1500 USD"));
        assert!(prompt.contains("- Duration: 5 days"));
        assert!(prompt.contains("- Travelers: 2 people"));
        assert!(prompt.contains("- Only top-rated places (4.5+ stars)"));
        assert!(prompt.contains("- Price level at least 2 on a 1-5 scale"));
        assert!(prompt.contains("- The traveler usually enjoys: attraction, restaurant"));
        assert!(prompt.contains("closest to the city center first"));
        assert!(prompt.contains("HIDDEN_GEM: yes or no"));
        assert!(prompt.contains("BEST_TIME:"));
        assert!(prompt.contains("price level between 2 and 3"));

        let order = [
            "Trip details:",
            "Quality requirements:",
            "Price constraints:",
            "User preferences:",
            "Priority:",
            "For each place",
            "Rules:",
            "Separate each place",
        ];
        let positions: Vec<usize> =
            order.iter().map(|needle| prompt.find(needle).expect("section present")).collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "sections out of order");
    }

    #[test]
    fn category_specific_field_follows_category() {
        let trip = TripContext::new("Rome");
        let options = RecommendationOptions::default();

        assert!(build(&trip, &options, PlaceCategory::Restaurant).contains("CUISINE:"));
        let hotels = build(&trip, &options, PlaceCategory::Accommodation);
        assert!(hotels.contains("AMENITIES:"));
        assert!(!hotels.contains("CUISINE:"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let trip = TripContext::new("Oslo");
        let options = RecommendationOptions::default();
        assert_eq!(
            build(&trip, &options, PlaceCategory::Restaurant),
            build(&trip, &options, PlaceCategory::Restaurant)
        );
    }
}

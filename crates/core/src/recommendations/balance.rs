//! Category balancing across per-category ranked lists

use std::collections::HashSet;

use super::CATEGORY_SHARE_PERCENT;
use crate::domain::place::{Candidate, PlaceCategory};

/// Output slots per category. Multi-category requests split `limit` by the
/// category's percentage share, rounded up; a single category gets every slot.
pub fn slot_allocation(categories: &[PlaceCategory], limit: usize) -> Vec<(PlaceCategory, usize)> {
    if categories.len() == 1 {
        return vec![(categories[0], limit)];
    }

    categories
        .iter()
        .map(|category| (*category, ceil_share(limit, share_percent(*category))))
        .collect()
}

/// Select candidates per category up to its slot, skipping names already taken,
/// then backfill from the unused pool until `limit` is reached. Groups are
/// consumed in the given order and keep their upstream ordering; nothing is re-scored.
pub fn balance_categories(
    ranked: Vec<(PlaceCategory, Vec<Candidate>)>,
    limit: usize,
) -> Vec<Candidate> {
    let categories: Vec<PlaceCategory> = ranked.iter().map(|(category, _)| *category).collect();
    let slots = slot_allocation(&categories, limit);

    let mut seen = HashSet::new();
    let mut selected = Vec::with_capacity(limit);
    let mut unused = Vec::new();

    for ((_, candidates), (_, slot)) in ranked.into_iter().zip(slots) {
        let mut taken = 0;
        for candidate in candidates {
            if taken < slot && !seen.contains(&candidate.dedup_key()) {
                seen.insert(candidate.dedup_key());
                selected.push(candidate);
                taken += 1;
            } else {
                unused.push(candidate);
            }
        }
    }

    for candidate in unused {
        if selected.len() >= limit {
            break;
        }
        if seen.insert(candidate.dedup_key()) {
            selected.push(candidate);
        }
    }

    selected.truncate(limit);
    selected
}

fn share_percent(category: PlaceCategory) -> usize {
    CATEGORY_SHARE_PERCENT
        .iter()
        .find(|(candidate, _)| *candidate == category)
        .map(|(_, percent)| *percent)
        .unwrap_or(0)
}

fn ceil_share(limit: usize, percent: usize) -> usize {
    (limit * percent).div_ceil(100)
}

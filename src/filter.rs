//! Drill filtering: tag category derivation, filter state, matching.
//!
//! Everything here is pure, synchronous computation over the loaded drill
//! slice. Catalogs are expected to be tens of drills, so there is no index,
//! no caching, no background work: every call recomputes from scratch.
//!
//! ## Matching semantics
//!
//! A drill matches a [`FilterState`] iff, for every category with at least
//! one selected value, the drill carries at least one of those values: OR
//! within a category, AND across categories. A drill with no tags in a
//! constrained category never matches that constraint.
//!
//! ## Query strings
//!
//! Listing pages accept an initial filter state encoded as
//! `?age_level=mite,squirt&equipment=blaze_pods`. [`FilterState::to_query`]
//! and [`FilterState::from_query`] implement that codec; unknown categories
//! are ignored on parse.

use crate::types::{DrillRecord, TagCategory};
use rand::seq::IndexedRandom;
use std::collections::{BTreeMap, BTreeSet};

/// User-selected tag values per category.
///
/// Created empty, mutated only through [`toggle`](FilterState::toggle),
/// [`remove`](FilterState::remove), and [`reset`](FilterState::reset).
/// Selection order within a category is preserved for display; it does not
/// affect matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    selected: BTreeMap<TagCategory, Vec<String>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected values for one category; empty means "no constraint".
    pub fn selected(&self, category: TagCategory) -> &[String] {
        self.selected.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Add `value` to the category if absent, remove it if present.
    pub fn toggle(&mut self, category: TagCategory, value: &str) {
        let values = self.selected.entry(category).or_default();
        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
        } else {
            values.push(value.to_string());
        }
    }

    /// Remove `value` from the category; no-op if absent.
    pub fn remove(&mut self, category: TagCategory, value: &str) {
        if let Some(values) = self.selected.get_mut(&category) {
            values.retain(|v| v != value);
        }
    }

    /// Clear all selections.
    pub fn reset(&mut self) {
        self.selected.clear();
    }

    /// True when no category has a selected value.
    pub fn is_empty(&self) -> bool {
        self.selected.values().all(Vec::is_empty)
    }

    /// All active `(category, value)` pairs, in category display order.
    pub fn active(&self) -> Vec<(TagCategory, &str)> {
        TagCategory::ALL
            .into_iter()
            .flat_map(|category| {
                self.selected(category)
                    .iter()
                    .map(move |v| (category, v.as_str()))
            })
            .collect()
    }

    /// Encode as a listing-page query string (no leading `?`). Empty
    /// categories are omitted; an empty state encodes as "".
    pub fn to_query(&self) -> String {
        TagCategory::ALL
            .into_iter()
            .filter(|category| !self.selected(*category).is_empty())
            .map(|category| format!("{}={}", category, self.selected(category).join(",")))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Decode a listing-page query string. A leading `?` is tolerated.
    /// Unknown categories and empty values are ignored; duplicate values
    /// keep their first occurrence.
    pub fn from_query(query: &str) -> Self {
        let mut state = FilterState::new();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, values)) = pair.split_once('=') else {
                continue;
            };
            let Ok(category) = key.parse::<TagCategory>() else {
                continue;
            };
            for value in values.split(',') {
                if value.is_empty() || state.selected(category).contains(&value.to_string()) {
                    continue;
                }
                state.selected.entry(category).or_default().push(value.to_string());
            }
        }
        state
    }
}

/// Distinct tag values per category, across the whole catalog.
///
/// All six categories are always present, even with zero observed values, so
/// the filter UI renders a stable set of controls regardless of current
/// data. Values are sorted lexicographically on the raw string.
pub fn derive_tag_categories(drills: &[DrillRecord]) -> BTreeMap<TagCategory, Vec<String>> {
    let mut categories: BTreeMap<TagCategory, BTreeSet<String>> =
        TagCategory::ALL.into_iter().map(|c| (c, BTreeSet::new())).collect();

    for drill in drills {
        for (category, values) in &drill.tags {
            categories
                .entry(*category)
                .or_default()
                .extend(values.iter().cloned());
        }
    }

    categories
        .into_iter()
        .map(|(category, values)| (category, values.into_iter().collect()))
        .collect()
}

/// The subsequence of `drills` matching `state`, in original order.
pub fn apply_filters<'a>(drills: &'a [DrillRecord], state: &FilterState) -> Vec<&'a DrillRecord> {
    drills.iter().filter(|drill| matches(drill, state)).collect()
}

fn matches(drill: &DrillRecord, state: &FilterState) -> bool {
    TagCategory::ALL.into_iter().all(|category| {
        let wanted = state.selected(category);
        wanted.is_empty()
            || drill
                .tag_values(category)
                .iter()
                .any(|v| wanted.contains(v))
    })
}

/// Uniform random pick over the filtered subset. `None` when nothing
/// matches. The caller supplies the RNG so tests stay deterministic.
pub fn pick_random<'a, R: rand::Rng + ?Sized>(
    drills: &'a [DrillRecord],
    state: &FilterState,
    rng: &mut R,
) -> Option<&'a DrillRecord> {
    apply_filters(drills, state).choose(rng).copied()
}

/// Display form of a raw tag value or category key: underscores become
/// spaces, each segment's first letter is capitalized. Total on any input;
/// empty segments collapse silently.
pub fn format_tag_label(raw: &str) -> String {
    raw.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::drill_with_tags;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn age_catalog() -> Vec<DrillRecord> {
        vec![
            drill_with_tags("one", &[(TagCategory::AgeLevel, &["mite"])]),
            drill_with_tags("two", &[(TagCategory::AgeLevel, &["mite", "squirt"])]),
            drill_with_tags("three", &[(TagCategory::AgeLevel, &["squirt"])]),
        ]
    }

    fn slugs<'a>(drills: &[&'a DrillRecord]) -> Vec<&'a str> {
        drills.iter().map(|d| d.slug.as_str()).collect()
    }

    #[test]
    fn empty_state_is_identity() {
        let drills = age_catalog();
        let filtered = apply_filters(&drills, &FilterState::new());
        assert_eq!(slugs(&filtered), vec!["one", "two", "three"]);
    }

    #[test]
    fn or_within_category_preserves_order() {
        let drills = age_catalog();
        let mut state = FilterState::new();
        state.toggle(TagCategory::AgeLevel, "mite");

        let filtered = apply_filters(&drills, &state);
        assert_eq!(slugs(&filtered), vec!["one", "two"]);
    }

    #[test]
    fn and_across_categories() {
        let drills = vec![
            drill_with_tags(
                "both",
                &[
                    (TagCategory::AgeLevel, &["mite"]),
                    (TagCategory::Equipment, &["blaze_pods"]),
                ],
            ),
            drill_with_tags("age-only", &[(TagCategory::AgeLevel, &["mite"])]),
        ];
        let mut state = FilterState::new();
        state.toggle(TagCategory::AgeLevel, "mite");
        state.toggle(TagCategory::Equipment, "blaze_pods");

        let filtered = apply_filters(&drills, &state);
        assert_eq!(slugs(&filtered), vec!["both"]);
    }

    #[test]
    fn untagged_drill_never_matches_constraint() {
        let drills = vec![drill_with_tags("untagged", &[])];
        let mut state = FilterState::new();
        state.toggle(TagCategory::SkillLevel, "beginner");

        assert!(apply_filters(&drills, &state).is_empty());
    }

    #[test]
    fn widening_a_category_grows_constraining_a_new_one_shrinks() {
        // Widening an already-constrained category (OR) can only grow the
        // result; constraining a fresh category can only shrink it.
        let drills = age_catalog();
        let mut state = FilterState::new();
        state.toggle(TagCategory::AgeLevel, "mite");
        let narrow = apply_filters(&drills, &state).len();

        state.toggle(TagCategory::AgeLevel, "squirt");
        let wide = apply_filters(&drills, &state).len();
        assert!(wide >= narrow);

        state.toggle(TagCategory::Equipment, "blaze_pods");
        let constrained = apply_filters(&drills, &state).len();
        assert!(constrained <= wide);
    }

    #[test]
    fn filtering_is_idempotent() {
        let drills = age_catalog();
        let mut state = FilterState::new();
        state.toggle(TagCategory::AgeLevel, "squirt");

        let once: Vec<DrillRecord> = apply_filters(&drills, &state)
            .into_iter()
            .cloned()
            .collect();
        let twice = apply_filters(&once, &state);
        assert_eq!(once.len(), twice.len());
    }

    #[test]
    fn toggle_twice_is_involution() {
        let mut state = FilterState::new();
        let original = state.clone();
        state.toggle(TagCategory::Equipment, "blaze_pods");
        assert!(!state.is_empty());
        state.toggle(TagCategory::Equipment, "blaze_pods");
        assert_eq!(state, original);
    }

    #[test]
    fn remove_and_reset() {
        let mut state = FilterState::new();
        state.toggle(TagCategory::AgeLevel, "mite");
        state.toggle(TagCategory::AgeLevel, "squirt");

        state.remove(TagCategory::AgeLevel, "mite");
        assert_eq!(state.selected(TagCategory::AgeLevel), ["squirt"]);

        state.remove(TagCategory::SkillLevel, "not-there");
        state.reset();
        assert!(state.is_empty());
    }

    #[test]
    fn all_six_categories_always_derived() {
        let derived = derive_tag_categories(&[]);
        assert_eq!(derived.len(), 6);
        for category in TagCategory::ALL {
            assert_eq!(derived[&category], Vec::<String>::new());
        }
    }

    #[test]
    fn derived_values_sorted_and_distinct() {
        let drills = vec![
            drill_with_tags("a", &[(TagCategory::SkillLevel, &["intermediate", "beginner"])]),
            drill_with_tags("b", &[(TagCategory::SkillLevel, &["beginner", "advanced"])]),
        ];
        let derived = derive_tag_categories(&drills);
        assert_eq!(
            derived[&TagCategory::SkillLevel],
            vec!["advanced", "beginner", "intermediate"]
        );
        assert_eq!(derived[&TagCategory::Equipment], Vec::<String>::new());
    }

    #[test]
    fn active_pairs_in_category_order() {
        let mut state = FilterState::new();
        state.toggle(TagCategory::Equipment, "blaze_pods");
        state.toggle(TagCategory::SkillLevel, "beginner");

        assert_eq!(
            state.active(),
            vec![
                (TagCategory::SkillLevel, "beginner"),
                (TagCategory::Equipment, "blaze_pods"),
            ]
        );
    }

    #[test]
    fn query_round_trip() {
        let mut state = FilterState::new();
        state.toggle(TagCategory::AgeLevel, "mite");
        state.toggle(TagCategory::AgeLevel, "squirt");
        state.toggle(TagCategory::Equipment, "blaze_pods");

        let query = state.to_query();
        assert_eq!(query, "age_level=mite,squirt&equipment=blaze_pods");
        assert_eq!(FilterState::from_query(&query), state);
        assert_eq!(FilterState::from_query(&format!("?{query}")), state);
    }

    #[test]
    fn query_parse_ignores_junk() {
        let state = FilterState::from_query("age_level=mite,,mite&era=origin&noequals");
        assert_eq!(state.selected(TagCategory::AgeLevel), ["mite"]);
        assert_eq!(state.active().len(), 1);
    }

    #[test]
    fn empty_state_encodes_empty() {
        assert_eq!(FilterState::new().to_query(), "");
        assert!(FilterState::from_query("").is_empty());
    }

    #[test]
    fn random_pick_honors_filters() {
        let drills = age_catalog();
        let mut state = FilterState::new();
        state.toggle(TagCategory::AgeLevel, "mite");
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let pick = pick_random(&drills, &state, &mut rng).unwrap();
            assert!(pick.slug == "one" || pick.slug == "two");
        }
    }

    #[test]
    fn random_pick_none_when_nothing_matches() {
        let drills = age_catalog();
        let mut state = FilterState::new();
        state.toggle(TagCategory::Equipment, "tennis_balls");
        let mut rng = StdRng::seed_from_u64(7);

        assert!(pick_random(&drills, &state, &mut rng).is_none());
    }

    #[test]
    fn tag_labels_formatted() {
        assert_eq!(format_tag_label("skill_level"), "Skill Level");
        assert_eq!(format_tag_label("blaze_pods"), "Blaze Pods");
        assert_eq!(format_tag_label("mite"), "Mite");
        assert_eq!(format_tag_label(""), "");
        assert_eq!(format_tag_label("_x_"), " X ");
    }
}

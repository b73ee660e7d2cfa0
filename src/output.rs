//! CLI output formatting for the drill pipeline.
//!
//! # Output Format
//!
//! ## Check / Index
//!
//! ```text
//! Drills
//! 001 Angle Work (2 diagrams)
//!     Source: angle-work/
//!     Tags: age_level: mite; skill_level: beginner
//! 002 Power Push (1 diagram, video)
//!     Source: power-push/
//!     Tags: age_level: mite, squirt
//!
//! 2 drills loaded
//! ```
//!
//! Index mode appends a skip count and one line per warning:
//!
//! ```text
//! 2 drills loaded, 1 skipped
//! Warning: skipped drill 'broken': [broken] drill.yml missing required field 'name' (string)
//! ```
//!
//! ## Build
//!
//! ```text
//! Angle Work → drills/angle-work/index.html
//! Power Push → drills/power-push/index.html
//!
//! Generated 2 drill pages, 1 listing, drill-index.json
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::load::IndexWarning;
use crate::types::{DrillRecord, TagCategory};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Header line for one drill: index, name, diagram/video summary.
fn drill_header(index: usize, drill: &DrillRecord) -> String {
    let mut details = Vec::new();
    match drill.images.len() {
        0 => {}
        1 => details.push("1 diagram".to_string()),
        n => details.push(format!("{n} diagrams")),
    }
    if drill.video.is_some() {
        details.push("video".to_string());
    }
    if details.is_empty() {
        format!("{} {}", format_index(index), drill.name)
    } else {
        format!("{} {} ({})", format_index(index), drill.name, details.join(", "))
    }
}

/// One-line tag summary in category order, empty categories omitted.
fn tag_summary(drill: &DrillRecord) -> Option<String> {
    let groups: Vec<String> = TagCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let values = drill.tag_values(category);
            if values.is_empty() {
                None
            } else {
                Some(format!("{}: {}", category, values.join(", ")))
            }
        })
        .collect();
    if groups.is_empty() {
        None
    } else {
        Some(groups.join("; "))
    }
}

// ============================================================================
// Check / Index output
// ============================================================================

/// Format the catalog inventory shown by `check` and `index`.
pub fn format_catalog_output(drills: &[DrillRecord], warnings: &[IndexWarning]) -> Vec<String> {
    let mut lines = vec!["Drills".to_string()];

    for (i, drill) in drills.iter().enumerate() {
        lines.push(drill_header(i + 1, drill));
        lines.push(format!("    Source: {}/", drill.slug));
        if let Some(tags) = tag_summary(drill) {
            lines.push(format!("    Tags: {tags}"));
        }
    }

    lines.push(String::new());
    let loaded = match drills.len() {
        1 => "1 drill loaded".to_string(),
        n => format!("{n} drills loaded"),
    };
    if warnings.is_empty() {
        lines.push(loaded);
    } else {
        lines.push(format!("{loaded}, {} skipped", warnings.len()));
    }

    for warning in warnings {
        lines.push(format!("Warning: {warning}"));
    }

    lines
}

pub fn print_catalog_output(drills: &[DrillRecord], warnings: &[IndexWarning]) {
    for line in format_catalog_output(drills, warnings) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the page manifest shown after a successful build.
pub fn format_build_output(drills: &[DrillRecord]) -> Vec<String> {
    let mut lines = Vec::new();

    for drill in drills {
        lines.push(format!("{} → drills/{}/index.html", drill.name, drill.slug));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {} drill page{}, 1 listing, drill-index.json",
        drills.len(),
        if drills.len() == 1 { "" } else { "s" }
    ));

    lines
}

pub fn print_build_output(drills: &[DrillRecord]) {
    for line in format_build_output(drills) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::drill_with_tags;

    fn sample() -> Vec<DrillRecord> {
        let mut a = drill_with_tags(
            "angle-work",
            &[
                (TagCategory::AgeLevel, &["mite"]),
                (TagCategory::SkillLevel, &["beginner"]),
            ],
        );
        a.name = "Angle Work".to_string();
        a.images = vec!["one.png".to_string(), "two.png".to_string()];
        a.video = None;

        let mut b = drill_with_tags("power-push", &[(TagCategory::AgeLevel, &["mite", "squirt"])]);
        b.name = "Power Push".to_string();
        b.images = vec!["diagram.png".to_string()];
        b.video = Some("https://youtu.be/abc".to_string());

        vec![a, b]
    }

    #[test]
    fn catalog_lists_drills_with_sources_and_tags() {
        let lines = format_catalog_output(&sample(), &[]);

        assert_eq!(lines[0], "Drills");
        assert_eq!(lines[1], "001 Angle Work (2 diagrams)");
        assert_eq!(lines[2], "    Source: angle-work/");
        assert_eq!(lines[3], "    Tags: skill_level: beginner; age_level: mite");
        assert_eq!(lines[4], "002 Power Push (1 diagram, video)");
        assert_eq!(*lines.last().unwrap(), "2 drills loaded");
    }

    #[test]
    fn drill_without_media_gets_bare_header() {
        let mut drill = drill_with_tags("bare", &[]);
        drill.name = "Bare".to_string();
        drill.images.clear();
        drill.video = None;

        let lines = format_catalog_output(&[drill], &[]);
        assert_eq!(lines[1], "001 Bare");
        // No tag line either
        assert_eq!(lines[2], "    Source: bare/");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "1 drill loaded");
    }

    #[test]
    fn warnings_append_after_count() {
        let warnings = vec![IndexWarning::SkippedDrill {
            folder: "broken".to_string(),
            message: "drill.yml missing required field 'name'".to_string(),
        }];
        let lines = format_catalog_output(&sample(), &warnings);

        let last = lines.last().unwrap();
        assert!(last.starts_with("Warning: skipped drill 'broken'"));
        assert_eq!(lines[lines.len() - 2], "2 drills loaded, 1 skipped");
    }

    #[test]
    fn build_output_maps_names_to_pages() {
        let lines = format_build_output(&sample());

        assert_eq!(lines[0], "Angle Work → drills/angle-work/index.html");
        assert_eq!(lines[1], "Power Push → drills/power-push/index.html");
        assert_eq!(
            *lines.last().unwrap(),
            "Generated 2 drill pages, 1 listing, drill-index.json"
        );
    }
}

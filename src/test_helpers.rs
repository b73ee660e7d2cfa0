//! Shared test utilities for the drillbook test suite.
//!
//! Fixture catalogs are built programmatically into temp directories, so
//! every test gets an isolated tree it can mutate freely.

use crate::types::{DrillRecord, TagCategory, Tags};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write one drill folder under `<content_root>/drills/<slug>`, with the
/// given `drill.yml` content and zero-byte image files.
pub fn write_drill(content_root: &Path, slug: &str, yml: &str, images: &[&str]) {
    let folder = content_root.join("drills").join(slug);
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join("drill.yml"), yml).unwrap();
    for image in images {
        fs::write(folder.join(image), b"fake image").unwrap();
    }
}

/// A complete, valid `drill.yml` referencing `diagram.png`.
pub fn sample_drill_yml(name: &str) -> String {
    format!(
        r#"name: {name}
description: Quick lateral power pushes across the crease.
coaching_points:
  - Lead with the stick
  - Stay square to the shooter
images:
  - diagram.png
video: https://www.youtube.com/watch?v=dQw4w9WgXcQ
tags:
  skill_level:
    - beginner
  age_level:
    - mite
"#
    )
}

/// In-memory record with just a slug and tags, for filter-engine tests.
pub fn drill_with_tags(slug: &str, tags: &[(TagCategory, &[&str])]) -> DrillRecord {
    let mut tag_map = Tags::new();
    for (category, values) in tags {
        tag_map.insert(*category, values.iter().map(|v| v.to_string()).collect());
    }
    DrillRecord {
        slug: slug.to_string(),
        name: crate::filter::format_tag_label(slug),
        description: format!("Test drill '{slug}'."),
        coaching_points: vec!["Track the puck".to_string()],
        images: vec![],
        video: None,
        tags: tag_map,
    }
}

/// Content root with three drills tagged `age_level: [mite]`,
/// `[mite, squirt]`, and `[squirt]` respectively (the filtering scenario
/// used throughout the suite), each with one image.
pub fn setup_catalog() -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (slug, ages) in [
        ("angle-work", "    - mite\n"),
        ("power-push", "    - mite\n    - squirt\n"),
        ("rebound-control", "    - squirt\n"),
    ] {
        let yml = format!(
            r#"name: {name}
description: Test drill for the {slug} scenario.
coaching_points:
  - Stay square to the shooter
images:
  - diagram.png
tags:
  age_level:
{ages}"#,
            name = crate::filter::format_tag_label(slug),
        );
        write_drill(tmp.path(), slug, &yml, &["diagram.png"]);
    }
    tmp
}

/// Find a drill by slug. Panics with the available slugs on a miss.
pub fn find_drill<'a>(drills: &'a [DrillRecord], slug: &str) -> &'a DrillRecord {
    drills.iter().find(|d| d.slug == slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = drills.iter().map(|d| d.slug.as_str()).collect();
        panic!("drill '{slug}' not found. Available: {slugs:?}")
    })
}

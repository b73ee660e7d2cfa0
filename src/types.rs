//! Shared types used across all pipeline stages.
//!
//! A [`DrillRecord`] is produced once by the loader and then read everywhere:
//! page generation, the filter engine, the JSON index, and sheet export all
//! consume the same immutable record list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The six fixed classification axes for drill tags.
///
/// The set is closed by design: `drill.yml` files may carry other keys under
/// `tags:`, but only these six ever reach a [`DrillRecord`]. Keeping the enum
/// closed means the filter UI renders the same six controls regardless of
/// what the current catalog happens to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    SkillLevel,
    TeamDrill,
    AgeLevel,
    FundamentalSkill,
    SkatingSkill,
    Equipment,
}

impl TagCategory {
    /// All categories in display order.
    pub const ALL: [TagCategory; 6] = [
        TagCategory::SkillLevel,
        TagCategory::TeamDrill,
        TagCategory::AgeLevel,
        TagCategory::FundamentalSkill,
        TagCategory::SkatingSkill,
        TagCategory::Equipment,
    ];

    /// Stable snake_case form, as used in `drill.yml` and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            TagCategory::SkillLevel => "skill_level",
            TagCategory::TeamDrill => "team_drill",
            TagCategory::AgeLevel => "age_level",
            TagCategory::FundamentalSkill => "fundamental_skill",
            TagCategory::SkatingSkill => "skating_skill",
            TagCategory::Equipment => "equipment",
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// Tag values per category. Categories absent from `drill.yml` are simply
/// absent here; [`DrillRecord::tag_values`] treats absence as empty.
pub type Tags = BTreeMap<TagCategory, Vec<String>>;

/// A single drill, loaded from one `drills/<slug>/drill.yml` folder.
///
/// Immutable once loaded. The `slug` is the source folder name and doubles
/// as the page route (`/drills/<slug>`) and the staged asset directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillRecord {
    /// Unique identifier derived from the source folder name.
    pub slug: String,
    /// Drill title shown in listings, pages, and exported sheets.
    pub name: String,
    /// Plain-text description of the drill.
    pub description: String,
    /// Ordered coaching points. May be empty.
    pub coaching_points: Vec<String>,
    /// Image file names relative to the drill folder. First is the cover.
    pub images: Vec<String>,
    /// Optional video URL (YouTube links get a derived thumbnail).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Tag values per category.
    pub tags: Tags,
}

impl DrillRecord {
    /// Tag values for one category; absent category reads as empty.
    pub fn tag_values(&self, category: TagCategory) -> &[String] {
        self.tags.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cover image used in listings: the first `images` entry, if any.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

//! Static HTML site generation.
//!
//! Final stage of the drillbook build pipeline. Takes the loaded catalog and
//! produces the served site:
//!
//! ```text
//! dist/
//! ├── index.html                 # Listing page with the filter modal
//! ├── drill-index.json           # Machine-readable catalog
//! └── drills/
//!     ├── power-push/
//!     │   ├── index.html         # Drill detail page
//!     │   ├── drill.yml          # Staged source files
//!     │   └── diagram.png
//!     └── butterfly-slides/
//!         └── index.html
//! ```
//!
//! Assets are staged first so every `/drills/<slug>/<file>` URL the pages
//! reference already resolves. The listing page carries the full filter UI:
//! one fieldset per tag category (always all six, even when a category has
//! no values in the current catalog), with checkbox state driven by
//! `static/filter.js` and seeded from the page query string
//! (`?age_level=mite,squirt`).
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! CSS and JS are embedded at compile time from `static/` and inlined into
//! every page; the palette custom properties are generated from config.

use crate::config::{self, SiteConfig};
use crate::filter::{derive_tag_categories, format_tag_label};
use crate::stage::{self, StageError};
use crate::types::{DrillRecord, TagCategory};
use maud::{html, Markup, DOCTYPE};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("staging error: {0}")]
    Stage(#[from] StageError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const FILTER_JS: &str = include_str!("../static/filter.js");

/// Generate the full site from a loaded catalog.
///
/// Stages assets before writing any page, per the build ordering contract.
pub fn generate(
    drills: &[DrillRecord],
    site_config: &SiteConfig,
    content_root: &Path,
    output_dir: &Path,
) -> Result<(), GenerateError> {
    fs::create_dir_all(output_dir)?;
    stage::stage_assets(&content_root.join("drills"), &output_dir.join("drills"))?;

    let color_css = config::generate_color_css(&site_config.colors);
    let css = format!("{color_css}\n\n{CSS_STATIC}");

    let listing = render_listing(drills, site_config, &css);
    fs::write(output_dir.join("index.html"), listing.into_string())?;

    for drill in drills {
        let drill_dir = output_dir.join("drills").join(&drill.slug);
        fs::create_dir_all(&drill_dir)?;
        let page = render_drill_page(drill, site_config, &css);
        fs::write(drill_dir.join("index.html"), page.into_string())?;
    }

    // The single machine-readable source of truth for the whole catalog
    let json = serde_json::to_string_pretty(drills)?;
    fs::write(output_dir.join("drill-index.json"), json)?;

    Ok(())
}

/// YouTube preview image for a video URL; `None` for anything else.
///
/// Handles `youtube.com/watch?v=<id>` and `youtu.be/<id>` forms.
pub fn youtube_thumbnail(video_url: &str) -> Option<String> {
    let id = ["youtube.com/watch?v=", "youtu.be/"]
        .iter()
        .find_map(|marker| {
            let start = video_url.find(marker)? + marker.len();
            let rest = &video_url[start..];
            let end = rest
                .find(['&', '?', '#'])
                .unwrap_or(rest.len());
            Some(&rest[..end])
        })
        .filter(|id| !id.is_empty())?;
    Some(format!("https://img.youtube.com/vi/{id}/mqdefault.jpg"))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Base HTML document: inline styles, shared header, page content.
fn base_document(title: &str, site_config: &SiteConfig, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (maud::PreEscaped(css.to_string())) }
            }
            body {
                header.site-header {
                    a.site-title href="/" { (site_config.site.title) }
                }
                main.container {
                    (content)
                }
            }
        }
    }
}

/// One fieldset of checkboxes per tag category. All six categories render
/// even when empty, so the control set is stable across catalogs.
fn filter_controls(categories: &std::collections::BTreeMap<TagCategory, Vec<String>>) -> Markup {
    html! {
        details.filter-modal id="drill-filters" {
            summary { "Filter Drills" }
            form id="filter-form" {
                @for category in TagCategory::ALL {
                    fieldset data-category=(category.as_str()) {
                        legend { (format_tag_label(category.as_str())) }
                        @let values = categories.get(&category).map(Vec::as_slice).unwrap_or(&[]);
                        @if values.is_empty() {
                            p.filter-empty { "No values yet" }
                        }
                        @for value in values {
                            label.filter-option {
                                input type="checkbox" name=(category.as_str()) value=(value);
                                (format_tag_label(value))
                            }
                        }
                    }
                }
                div.filter-actions {
                    button type="button" id="filter-reset" { "Reset" }
                    button type="button" id="filter-random" { "I Need a Drill" }
                }
            }
        }
    }
}

fn render_listing(drills: &[DrillRecord], site_config: &SiteConfig, css: &str) -> Markup {
    let categories = derive_tag_categories(drills);

    let content = html! {
        section.hero {
            h1 { (site_config.site.title) }
            p { (site_config.site.tagline) }
        }
        (filter_controls(&categories))
        p id="drill-count" data-total=(drills.len()) {}
        div.drill-grid id="drill-grid" {
            @for drill in drills {
                // data-tags drives the client-side filter engine
                article.drill-card
                    data-slug=(drill.slug)
                    data-tags=(serde_json::to_string(&drill.tags).unwrap_or_else(|_| "{}".into()))
                {
                    @if let Some(cover) = drill.cover_image() {
                        div.card-image {
                            img src=(format!("/drills/{}/{}", drill.slug, cover)) alt=(drill.name);
                        }
                    }
                    div.card-body {
                        h2 { (drill.name) }
                        a.view-drill href=(format!("/drills/{}/", drill.slug)) { "View Drill" }
                    }
                }
            }
        }
        script { (maud::PreEscaped(FILTER_JS.to_string())) }
    };

    base_document(&site_config.site.title, site_config, css, content)
}

fn tag_chips(drill: &DrillRecord) -> Markup {
    html! {
        div.tag-groups {
            @for category in TagCategory::ALL {
                @let values = drill.tag_values(category);
                @if !values.is_empty() {
                    div.tag-group {
                        h3 { (format_tag_label(category.as_str())) }
                        ul.tag-chips {
                            @for value in values {
                                li { (format_tag_label(value)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_drill_page(drill: &DrillRecord, site_config: &SiteConfig, css: &str) -> Markup {
    let content = html! {
        nav.breadcrumb {
            a href="/" { "All Drills" }
        }
        article.drill-detail {
            h1 { (drill.name) }
            (tag_chips(drill))
            section {
                h2 { "Description" }
                p { (drill.description) }
            }
            @if !drill.coaching_points.is_empty() {
                section {
                    h2 { "Coaching Points" }
                    ul.coaching-points {
                        @for point in &drill.coaching_points {
                            li { (point) }
                        }
                    }
                }
            }
            @for (index, image) in drill.images.iter().enumerate() {
                figure.drill-diagram {
                    img src=(format!("/drills/{}/{}", drill.slug, image))
                        alt=(format!("Drill diagram {}", index + 1));
                }
            }
            @if let Some(video) = &drill.video {
                section.drill-video {
                    h2 { "Video" }
                    a href=(video) rel="noopener" target="_blank" {
                        @if let Some(thumbnail) = youtube_thumbnail(video) {
                            img src=(thumbnail) alt="Video preview";
                        } @else {
                            "Watch video"
                        }
                    }
                }
            }
            button.print-button onclick="window.print()" { "Print Drill" }
        }
    };

    base_document(
        &format!("{} - {}", drill.name, site_config.site.title),
        site_config,
        css,
        content,
    )
}

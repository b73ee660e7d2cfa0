//! # Drillbook
//!
//! A static site generator for youth hockey goaltending drill libraries.
//! Your filesystem is the data source: each folder under `content/drills/`
//! is one drill — a `drill.yml` describing it plus the diagram images it
//! references.
//!
//! # Architecture: Load → Stage → Generate
//!
//! ```text
//! 1. Load      content/drills/  →  Vec<DrillRecord>   (YAML → validated records)
//! 2. Stage     content/drills/  →  dist/drills/       (byte-for-byte asset mirror)
//! 3. Generate  records          →  dist/              (HTML pages + drill-index.json)
//! ```
//!
//! Loading is strict for builds and best-effort for queries:
//!
//! - [`load::load_catalog`] fails on the first invalid drill, with an error
//!   naming the folder and the exact schema violation. Used by `build` and
//!   `check` — a broken drill should never ship silently.
//! - [`load::index_catalog`] skips invalid drills and collects a warning per
//!   skip. Used by `index`, `pick`, and `export` — a query over the catalog
//!   should not be held hostage by one bad file.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | Drill discovery, YAML parsing, schema validation, image reference checks |
//! | [`stage`] | Mirrors drill folders into the output tree so image URLs resolve |
//! | [`generate`] | Renders the listing page, drill pages, and `drill-index.json` using Maud |
//! | [`filter`] | Tag filter engine: selection state, matching, query-string codec, random pick |
//! | [`sheet`] | Printable PDF drill sheets: layout engine over a drawing-backend trait |
//! | [`config`] | `config.toml` loading, validation, and palette CSS generation |
//! | [`types`] | Shared types: [`DrillRecord`](types::DrillRecord), the closed [`TagCategory`](types::TagCategory) set |
//! | [`output`] | CLI output formatting — inventory and build summaries |
//!
//! # Design Decisions
//!
//! ## Failsafe YAML Loading
//!
//! `drill.yml` is parsed into a generic YAML value and validated explicitly
//! rather than deserialized straight into a struct. This keeps error messages
//! precise (folder, field, expected shape) and makes scalar handling
//! deliberate: a value like `2010` in a string position is rendered back to
//! its literal text instead of failing or silently becoming a number.
//!
//! ## Filtering Is AND-Across, OR-Within
//!
//! A drill matches the current selection when, for every category with at
//! least one selected value, the drill carries at least one of them.
//! Categories with nothing selected don't constrain. The same semantics run
//! in three places — the Rust engine in [`filter`], the generated listing
//! page's script, and the `pick` command — and the engine's tests are the
//! reference for all three.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system. Malformed markup is a build error, interpolation is
//! auto-escaped, and there is no template directory to ship or get out of
//! sync.
//!
//! ## PDF Export Behind a Drawing Trait
//!
//! The sheet layout engine targets the small
//! [`SheetBackend`](sheet::SheetBackend) trait (text, boxes, images, page
//! breaks) instead of calling `lopdf` directly. Layout tests assert on
//! recorded drawing operations; only the backend tests parse actual PDF
//! bytes.

pub mod config;
pub mod filter;
pub mod generate;
pub mod load;
pub mod output;
pub mod sheet;
pub mod stage;
pub mod types;

#[cfg(test)]
pub mod test_helpers;

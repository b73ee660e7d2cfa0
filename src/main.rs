use clap::{Parser, Subcommand};
use drillbook::sheet::{export_file_name, render_sheet, PdfBackend};
use drillbook::{config, filter, generate, load, output};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "drillbook")]
#[command(about = "Static site generator for goaltending drill libraries")]
#[command(long_about = "\
Static site generator for goaltending drill libraries

Your filesystem is the data source. Each folder under content/drills/ is one
drill: a drill.yml describing it plus the diagram images it references.

Content structure:

  content/
  ├── config.toml                  # Site identity and colors (optional)
  └── drills/
      ├── angle-work/
      │   ├── drill.yml            # name, description, coaching points, tags
      │   ├── diagram-1.png        # Referenced from drill.yml images list
      │   └── diagram-2.png
      └── power-push/
          ├── drill.yml
          └── setup.png

Tags drive the listing-page filters. Six categories are recognized:
skill_level, team_drill, age_level, fundamental_skill, skating_skill,
equipment. Unknown tag keys are ignored.

Run 'drillbook gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the full site: validate, stage assets, generate pages
    Build,
    /// Validate the content directory without building
    Check,
    /// List the catalog, skipping (and reporting) invalid drills
    Index,
    /// Export one drill as a printable PDF sheet
    Export {
        /// Drill folder name, e.g. 'power-push'
        slug: String,
    },
    /// Pick a random drill, optionally narrowed by filters
    Pick {
        /// Filter expression, repeatable: --filter age_level=mite,squirt
        #[arg(long = "filter", value_name = "CATEGORY=VALUES")]
        filters: Vec<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            let drills = load::load_catalog(&cli.source)?;
            generate::generate(&drills, &site_config, &cli.source, &cli.output)?;
            output::print_build_output(&drills);
        }
        Command::Check => {
            config::load_config(&cli.source)?;
            let drills = load::load_catalog(&cli.source)?;
            output::print_catalog_output(&drills, &[]);
        }
        Command::Index => {
            let index = load::index_catalog(&cli.source)?;
            output::print_catalog_output(&index.drills, &index.warnings);
        }
        Command::Export { slug } => {
            let index = load::index_catalog(&cli.source)?;
            let drill = index
                .drills
                .iter()
                .find(|d| d.slug == slug)
                .ok_or_else(|| format!("no drill named '{slug}' in {}", cli.source.display()))?;

            let assets_dir = cli.source.join("drills").join(&drill.slug);
            let mut backend = PdfBackend::new();
            render_sheet(drill, &assets_dir, &mut backend)?;
            let bytes = backend.finish()?;

            std::fs::create_dir_all(&cli.output)?;
            let path = cli.output.join(export_file_name(&drill.name));
            std::fs::write(&path, bytes)?;
            println!("Exported {} → {}", drill.name, path.display());
        }
        Command::Pick { filters } => {
            let index = load::index_catalog(&cli.source)?;
            let state = filter::FilterState::from_query(&filters.join("&"));
            match filter::pick_random(&index.drills, &state, &mut rand::rng()) {
                Some(drill) => println!("{} ({})", drill.name, drill.slug),
                None => println!("No drills match the selected filters"),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

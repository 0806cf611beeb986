//! dso-query: inspect and search a deep-sky catalog from the command line.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dsocat::catalogs::legacy::convert_legacy_catalog;
use dsocat::{
    radec_to_uvec, ConvexRegion, DsoCatalog, FilterConfig, ListingCode, LoaderConfig,
    ObjectRecord,
};
use dsocat::object::UNKNOWN_MAGNITUDE;

#[derive(Parser)]
#[command(name = "dso-query")]
#[command(about = "Query a deep-sky object catalog")]
#[command(version)]
struct Cli {
    /// Directory holding the catalog sets
    #[arg(long, global = true, default_value = "nebulae")]
    data_dir: PathBuf,

    /// Catalog set to load
    #[arg(long, global = true, default_value = "default")]
    set: String,

    /// Load objects from every catalog instead of NGC, IC and Messier only
    #[arg(long, global = true)]
    all_catalogs: bool,

    /// Sky culture name file replacing the default names
    #[arg(long, global = true)]
    culture_names: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a legacy text catalog to the binary format
    Convert {
        /// Tab-separated legacy catalog
        input: PathBuf,
        /// Binary catalog to write
        output: PathBuf,
        /// Coordinates are sexagesimal (HH:MM:SS / DD:MM:SS) rather than decimal degrees
        #[arg(long)]
        sexagesimal: bool,
    },

    /// Resolve a name or designation
    Resolve {
        text: String,
        /// Match against localized names
        #[arg(long)]
        localized: bool,
    },

    /// Complete a partially typed name or designation
    Complete {
        prefix: String,
        #[arg(long, default_value = "10")]
        max: usize,
        /// Names must start with the prefix at a word boundary
        #[arg(long)]
        whole_words: bool,
    },

    /// List objects within a cone
    Region {
        /// Right ascension of the center, degrees
        ra_deg: f64,
        /// Declination of the center, degrees
        #[arg(allow_hyphen_values = true)]
        dec_deg: f64,
        /// Cone radius, degrees
        radius_deg: f64,
    },

    /// Print a listing by code (0 bright galaxies, 1-29 types, 100-114 catalogs, 150/151 curated)
    List {
        code: u32,
        /// Apply the type filter
        #[arg(long)]
        type_filtered: bool,
    },

    /// Summarize the loaded catalog
    Info,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Convert {
            input,
            output,
            sexagesimal,
        } => {
            let summary = convert_legacy_catalog(input, output, !sexagesimal)
                .with_context(|| format!("converting {}", input.display()))?;
            println!(
                "converted {} of {} rows ({} skipped)",
                summary.converted,
                summary.rows_seen,
                summary.skipped.len()
            );
        }
        Commands::Resolve { text, localized } => {
            let catalog = open_catalog(&cli)?;
            let found = if *localized {
                catalog.resolve_localized(text)
            } else {
                catalog.resolve(text)
            };
            match found.and_then(|h| catalog.get(h)) {
                Some(record) => print_record(record),
                None => bail!("no object matches {text:?}"),
            }
        }
        Commands::Complete {
            prefix,
            max,
            whole_words,
        } => {
            let catalog = open_catalog(&cli)?;
            for text in catalog.autocomplete(prefix, *max, *whole_words, true) {
                println!("{text}");
            }
        }
        Commands::Region {
            ra_deg,
            dec_deg,
            radius_deg,
        } => {
            let catalog = open_catalog(&cli)?;
            let center = radec_to_uvec(ra_deg.to_radians(), dec_deg.to_radians());
            let region = ConvexRegion::cap(center, radius_deg.to_radians());
            for handle in catalog.objects_in_region(&region) {
                if let Some(record) = catalog.get(handle) {
                    print_record(record);
                }
            }
        }
        Commands::List {
            code,
            type_filtered,
        } => {
            let Some(listing) = ListingCode::from_code(*code) else {
                bail!("unknown listing code {code}");
            };
            let mut catalog = open_catalog(&cli)?;
            catalog.set_use_type_filters(*type_filtered);
            for line in catalog.list_by_type(listing, true) {
                println!("{line}");
            }
        }
        Commands::Info => {
            let catalog = open_catalog(&cli)?;
            let named = catalog
                .store()
                .iter()
                .filter(|(_, r)| r.proper_name().is_some())
                .count();
            println!("set:      {}", catalog.set_name());
            println!("objects:  {}", catalog.len());
            println!("named:    {named}");
            println!("catalogs: {:?}", catalog.filters().catalog_mask());
            println!(
                "index:    nside {} ({} cells)",
                catalog.index().nside(),
                catalog.index().cell_count()
            );
        }
    }
    Ok(())
}

fn open_catalog(cli: &Cli) -> anyhow::Result<DsoCatalog> {
    let filter_config = if cli.all_catalogs {
        FilterConfig::all_catalogs()
    } else {
        FilterConfig::default()
    };
    let mut catalog = DsoCatalog::open(LoaderConfig::new(cli.data_dir.clone()), &filter_config, &cli.set)
        .with_context(|| format!("loading catalog set {:?}", cli.set))?;
    if let Some(path) = &cli.culture_names {
        catalog.update_sky_culture(Some(path.as_path()))?;
    }
    Ok(catalog)
}

fn print_record(record: &ObjectRecord) {
    let magnitude = record.brightest_magnitude();
    let magnitude = if magnitude >= UNKNOWN_MAGNITUDE {
        "-".to_string()
    } else {
        format!("{magnitude:.1}")
    };
    println!(
        "{:<14} {:>9.4} {:>+9.4}  {:>5}  {:?}  {}",
        record.designation(),
        record.ra_rad().to_degrees(),
        record.dec_rad().to_degrees(),
        magnitude,
        record.object_type,
        record.english_name(),
    );
}

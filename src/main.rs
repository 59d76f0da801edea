use clap::{Parser, Subcommand};
use footprint::boundary::{BoundaryCache, HttpBoundarySource, DEFAULT_BOUNDARY_URL};
use footprint::ledger::FileStorage;
use footprint::location::{Gazetteer, LocationResolver};
use footprint::{Footprint, FootprintError, Location, Notice, SubmitOutcome};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Footprint — keep a ledger of the places you have been.
///
/// Names are matched against a built-in table of Chinese cities and
/// provinces; the history lives in ~/.footprint unless --data-dir is given.
///
/// Examples:
///   footprint add 北京市
///   footprint add 广东省
///   footprint list --json
///   footprint stats --json
///   footprint boundary --region 广东省
///   footprint clear --yes
#[derive(Parser)]
#[command(name = "footprint", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding the stored ledger.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Replacement gazetteer JSON (cities + province aliases).
    #[arg(long, global = true)]
    gazetteer: Option<PathBuf>,

    /// URL of the province boundary GeoJSON.
    #[arg(long, global = true, default_value = DEFAULT_BOUNDARY_URL)]
    boundary_url: String,

    /// Boundary fetch timeout in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,

    /// Log resolver and ledger activity (overridden by RUST_LOG).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Mark a city or province as visited.
    Add { name: String },
    /// Show visited locations in the order they were added.
    List {
        /// Print the stored JSON form.
        #[arg(long)]
        json: bool,
    },
    /// Forget every visited location.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Show what a name resolves to without recording it.
    Resolve { name: String },
    /// Count visited cities and provinces.
    Stats {
        /// Print the counts as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the cities the gazetteer knows.
    Cities,
    /// List the province short names the gazetteer knows.
    Provinces,
    /// Fetch the province boundary dataset and list its regions.
    Boundary {
        /// Print the properties of one region instead of the list.
        #[arg(long)]
        region: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let resolver = build_resolver(&cli);
    let storage = match &cli.data_dir {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::open_default(),
    };
    let mut footprint = Footprint::open(resolver, storage);

    match &cli.command {
        Command::Add { name } => add(&mut footprint, name.trim()),
        Command::List { json } => list(footprint.ledger().list(), *json),
        Command::Clear { yes } => {
            if !*yes {
                eprintln!("Error: Refusing to clear {} location(s) without --yes.", footprint.ledger().len());
                std::process::exit(1);
            }
            footprint.clear();
            eprintln!("  Travel history cleared.");
        }
        Command::Resolve { name } => match footprint.resolve(name.trim()) {
            Ok(loc) => println!("{}", describe(&loc)),
            Err(e) => fail(&Notice::from_error(&FootprintError::from(e))),
        },
        Command::Stats { json } => {
            let stats = footprint.ledger().stats();
            if *json {
                print_json(&stats);
                return;
            }
            println!("  Cities:    {}", stats.cities);
            println!("  Provinces: {}", stats.provinces);
            println!("  Regions:   {} {}", stats.regions.len(), stats.regions.join("、"));
        }
        Command::Cities => {
            for name in footprint.resolver().gazetteer().city_names() {
                println!("{}", name);
            }
        }
        Command::Provinces => {
            for name in footprint.resolver().gazetteer().province_names() {
                println!("{}", name);
            }
        }
        Command::Boundary { region } => fetch_boundary(&cli, region.as_deref()).await,
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "footprint=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_resolver(cli: &Cli) -> LocationResolver {
    match &cli.gazetteer {
        Some(path) => {
            let gazetteer = Gazetteer::from_json_file(path).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
            LocationResolver::with_gazetteer(gazetteer)
        }
        None => LocationResolver::new(),
    }
}

fn add(footprint: &mut Footprint<FileStorage>, name: &str) {
    if name.is_empty() {
        eprintln!("Error: Please enter a city or province name.");
        std::process::exit(1);
    }
    match footprint.submit(name) {
        Ok(SubmitOutcome::Added(loc)) => {
            eprintln!("  Added {}", describe(&loc));
            eprintln!("  {} location(s) visited.", footprint.ledger().len());
        }
        Ok(SubmitOutcome::AlreadyVisited(loc)) => {
            eprintln!("  Already visited: {}", describe(&loc));
        }
        Err(e) => fail(&Notice::from_error(&e)),
    }
}

fn list(locations: &[Location], json: bool) {
    if json {
        print_json(locations);
        return;
    }
    if locations.is_empty() {
        eprintln!("  No locations yet. Try: footprint add 北京");
        return;
    }
    for (i, loc) in locations.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, describe(loc));
    }
}

async fn fetch_boundary(cli: &Cli, region: Option<&str>) {
    let source = HttpBoundarySource::new(cli.boundary_url.clone())
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    eprintln!("  Fetching {}", source.url());
    let cache = BoundaryCache::new(source);

    match cache.get().await {
        Ok(dataset) => {
            if let Some(name) = region {
                match dataset.feature(name) {
                    Some(feature) => print_json(&feature.properties),
                    None => {
                        eprintln!("Error: No region named '{}' in boundary dataset.", name);
                        std::process::exit(1);
                    }
                }
                return;
            }
            let regions = dataset.region_names();
            eprintln!("  {} regions in boundary dataset.", regions.len());
            for name in regions {
                println!("{}", name);
            }
        }
        Err(e) => fail(&Notice::map_error(&e)),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    let out = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    println!("{}", out);
}

fn describe(loc: &Location) -> String {
    match loc.coordinates() {
        Some((lat, lon)) => format!("{} [{:.4}, {:.4}]", loc, lat, lon),
        None => loc.to_string(),
    }
}

fn fail(notice: &Notice) -> ! {
    eprintln!("Error: {}", notice.message);
    std::process::exit(1);
}

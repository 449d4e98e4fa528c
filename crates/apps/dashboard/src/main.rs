use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dashboard::{ChoroplethDoc, DashboardDoc, GlobeDoc, SankeyDoc, SelectorsDoc};
use dataset::{DatasetRepository, MergedTable};
use views::{
    Destination, DestinationDomain, TOP_N, YearDomain, derive_choropleth, derive_flows,
    derive_sankey,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Migrant-stock dashboard data pipeline")]
struct Args {
    /// Long-format migration CSV (Entity, Year, total immigrants)
    #[arg(long)]
    migration: PathBuf,

    /// GeoJSON FeatureCollection of country boundaries
    #[arg(long)]
    boundaries: PathBuf,

    /// Selected year (default: latest year in the data)
    #[arg(long)]
    year: Option<i32>,

    /// Destination country (default: first in sorted order)
    #[arg(long)]
    destination: Option<String>,

    /// Number of Sankey source countries
    #[arg(long, default_value_t = TOP_N)]
    top: usize,

    /// Write one JSON file per panel here instead of a single document
    /// on stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut repo = DatasetRepository::new();

    let table = repo.migration_table(&args.migration)?.clone();
    info!(
        rows = table.rows().len(),
        years = table.years().len(),
        "migration table loaded"
    );
    let year_domain = YearDomain::new(table.axis());

    let geometry = repo.country_geometry(&args.boundaries)?.clone();
    info!(rows = geometry.len(), "boundaries loaded");

    let merged = MergedTable::join(&geometry, &table);
    info!(rows = merged.rows().len(), "merged table built");

    let destinations = DestinationDomain::new(&merged);

    let year = select_year(&year_domain, args.year)?;
    let destination = select_destination(&destinations, args.destination.as_deref())?;
    info!(year, destination = destination.entity(), "deriving panels");

    let choropleth = derive_choropleth(&merged, year)
        .ok_or_else(|| format!("year {year} is not a table column"))?;
    let flows = derive_flows(&merged, &destination, year)
        .ok_or_else(|| format!("year {year} is not a table column"))?;
    let sankey = derive_sankey(&merged, &destination, year, args.top)
        .ok_or_else(|| format!("year {year} is not a table column"))?;

    let doc = DashboardDoc {
        selectors: SelectorsDoc::new(&year_domain, destinations.names(), year, destination.entity()),
        choropleth: ChoroplethDoc::new(&choropleth),
        globe: GlobeDoc::new(&flows),
        sankey: SankeyDoc::new(&sankey),
    };

    match &args.out {
        Some(dir) => write_panels(dir, &doc, args.pretty)?,
        None => println!("{}", to_json(&doc, args.pretty)?),
    }

    Ok(())
}

fn select_year(domain: &YearDomain, requested: Option<i32>) -> Result<i32, Box<dyn Error>> {
    match requested {
        Some(year) if domain.contains(year) => Ok(year),
        Some(year) => Err(format!("year {year} not in data (available: {:?})", domain.years()).into()),
        None => domain
            .default_year()
            .ok_or_else(|| "migration table has no year columns".into()),
    }
}

fn select_destination(
    domain: &DestinationDomain,
    requested: Option<&str>,
) -> Result<Destination, Box<dyn Error>> {
    match requested {
        Some(name) => domain
            .resolve(name)
            .ok_or_else(|| format!("destination {name:?} not in the merged data").into()),
        None => domain
            .default_destination()
            .ok_or_else(|| "no countries survived the merge".into()),
    }
}

fn write_panels(dir: &PathBuf, doc: &DashboardDoc, pretty: bool) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(dir)?;
    let panels = [
        ("selectors.json", to_json(&doc.selectors, pretty)?),
        ("choropleth.json", to_json(&doc.choropleth, pretty)?),
        ("globe.json", to_json(&doc.globe, pretty)?),
        ("sankey.json", to_json(&doc.sankey, pretty)?),
    ];
    for (name, payload) in panels {
        let path = dir.join(name);
        fs::write(&path, payload)?;
        info!(path = %path.display(), "panel written");
    }
    Ok(())
}

fn to_json(value: &impl serde::Serialize, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

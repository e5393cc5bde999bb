//! Velorail CLI: explore remote knowledge graphs from the command line

use clap::{ArgAction, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use velorail::{
    Catalog, Explorer, KgWalker, LocFinder, Params, QueryExecutor, QuerySource, Record,
    TabularResult, TriplePos,
};

#[derive(Parser)]
#[command(name = "velorail", version, about = "Explore RDF knowledge graphs via SPARQL")]
struct Cli {
    /// Endpoint YAML added to the bundled endpoints (same names replace them)
    #[arg(long, global = true, env = "VELORAIL_ENDPOINTS")]
    endpoints: Option<PathBuf>,

    /// Named query YAML added to the bundled queries; repeat for several files
    #[arg(long, global = true, action = ArgAction::Append)]
    queries: Vec<PathBuf>,

    /// Endpoint to query
    #[arg(long, short = 'e', default_value = "osm-qlever", global = true)]
    endpoint: String,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Explore the triples around a node
    Explore {
        /// Namespace prefix, e.g. osmrel
        prefix: String,
        /// Local identifier, e.g. 10492086
        local_id: String,
        /// Role of the node: subject, predicate or object
        #[arg(long, default_value = "subject")]
        pos: TriplePos,
        /// Count values per predicate instead of listing them
        #[arg(long)]
        summary: bool,
    },
    /// Generate a query for the single-valued properties of a node
    Gen {
        prefix: String,
        local_id: String,
        /// Properties to include (all if omitted)
        #[arg(long = "prop")]
        props: Vec<String>,
        /// Number of properties to project; the rest are commented out
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Fetch the selected properties of a node in one record
    Walk {
        prefix: String,
        local_id: String,
        /// Properties to fetch, e.g. P138 or wdt:P138 (all if omitted)
        props: Vec<String>,
    },
    /// Run a named query or literal query text
    Query {
        /// Query name, or query text with --text
        query: String,
        /// Treat the argument as query text
        #[arg(long)]
        text: bool,
        /// Template parameter as name=value
        #[arg(long = "param", short = 'p', value_parser = parse_param)]
        params: Vec<(String, String)>,
        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Train stations near a point
    Stations {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in km
        #[arg(long, default_value_t = 10.0)]
        radius: f64,
    },
    /// List configured endpoints
    Endpoints,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", s))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Arc::new(load_catalog(&cli)?);
    let executor = QueryExecutor::with_http(catalog.clone())?;
    let format = &cli.format;

    match cli.command {
        Commands::Explore {
            prefix,
            local_id,
            pos,
            summary,
        } => {
            let explorer = Explorer::new(executor, &cli.endpoint);
            let node = explorer.get_node(&prefix, &local_id)?;
            let result = explorer.explore(&node, pos, summary).await?;
            print_result(&result, format)?;
        }
        Commands::Gen {
            prefix,
            local_id,
            props,
            limit,
        } => {
            let walker = KgWalker::new(executor, &cli.endpoint)?;
            let node = walker.explorer().get_node(&prefix, &local_id)?;
            println!("{}", walker.generated_query(&node, &props, limit).await?);
        }
        Commands::Walk {
            prefix,
            local_id,
            props,
        } => {
            let walker = KgWalker::new(executor, &cli.endpoint)?;
            match walker.walk(&prefix, &local_id, &props).await? {
                Some(record) => print_result(&TabularResult::from_records(vec![record]), format)?,
                None => println!("(no results)"),
            }
        }
        Commands::Query {
            query,
            text,
            params,
            timeout,
        } => {
            let params: Params = params.into_iter().collect();
            let source = if text {
                QuerySource::Text(&query)
            } else {
                QuerySource::Named(&query)
            };
            let result = match timeout {
                Some(secs) => {
                    let timeout = Duration::from_secs(secs);
                    executor
                        .execute_with_timeout(&cli.endpoint, source, &params, timeout)
                        .await?
                }
                None => executor.execute(&cli.endpoint, source, &params).await?,
            };
            print_result(&result, format)?;
        }
        Commands::Stations { lat, lon, radius } => {
            let finder = LocFinder::new(executor);
            let stations = finder.train_stations_near(lat, lon, radius).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stations)?),
                _ => {
                    let records = stations
                        .into_iter()
                        .map(|s| {
                            let mut record = s.record;
                            record.insert("distance_km", format!("{:.2}", s.distance_km));
                            record
                        })
                        .collect();
                    print_result(&TabularResult::from_records(records), format)?;
                }
            }
        }
        Commands::Endpoints => {
            let rows: Vec<Record> = catalog
                .endpoints()
                .map(|e| {
                    [
                        ("name", e.name.clone()),
                        ("endpoint", e.endpoint.clone()),
                        ("method", format!("{:?}", e.method).to_uppercase()),
                        ("prefixes", e.namespaces().len().to_string()),
                    ]
                    .into_iter()
                    .collect::<Record>()
                })
                .collect();
            print_result(&TabularResult::from_records(rows), format)?;
        }
    }

    Ok(())
}

/// Bundled endpoints and queries with the user's files layered on top
fn load_catalog(cli: &Cli) -> velorail::ExploreResult<Catalog> {
    let mut builder = Catalog::builder().builtin_endpoints()?.builtin_queries()?;
    if let Some(path) = &cli.endpoints {
        builder = builder.endpoints_file(path)?;
    }
    for path in &cli.queries {
        builder = builder.queries_file(path)?;
    }
    Ok(builder.build())
}

fn print_result(
    result: &TabularResult,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result.records)?);
        }
        OutputFormat::Csv => {
            if !result.columns.is_empty() {
                let header: Vec<String> =
                    result.columns.iter().map(|c| format_csv_value(c)).collect();
                println!("{}", header.join(","));
                for record in result {
                    let cells: Vec<String> = result
                        .columns
                        .iter()
                        .map(|c| format_csv_value(record.get(c).unwrap_or_default()))
                        .collect();
                    println!("{}", cells.join(","));
                }
            }
        }
        OutputFormat::Table => {
            if result.columns.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(&result.columns);

            for record in result {
                let cells: Vec<&str> = result
                    .columns
                    .iter()
                    .map(|c| record.get(c).unwrap_or_default())
                    .collect();
                table.add_row(cells);
            }

            println!("{}", table);
            println!("{} row(s)", result.len());
        }
    }

    Ok(())
}

fn format_csv_value(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

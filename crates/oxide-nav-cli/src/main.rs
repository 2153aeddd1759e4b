//! oxide-nav CLI
//!
//! Command-line tool for exercising route tables: runs navigations, builds
//! paths and restores dehydrated navigation state.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use oxide_nav::{
    navigate, DehydratedState, FluxContext, NavigationRequest, RouteStore, RouteTable,
    SharedRouteStore,
};
use oxide_nav_matcher::{Method, Params};

/// Route tables and navigation state from the command line.
#[derive(Parser)]
#[command(name = "oxide-nav")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Route table (JSON object of route name to definition).
    #[arg(short, long, env = "OXIDE_NAV_ROUTES", default_value = "routes.json")]
    routes: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Navigate to a URL and print the resulting store state.
    Navigate {
        /// URL to navigate to.
        url: String,

        /// Request method.
        #[arg(short, long, default_value = "GET")]
        method: Method,
    },

    /// Build the path of a named route.
    Path {
        /// Route name.
        name: String,

        /// Route parameters as key=value pairs.
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// Rehydrate a dehydrated store and print its current route.
    Restore {
        /// Snapshot produced by the navigate command.
        snapshot: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let routes = load_routes(&cli.routes)?;
    debug!(count = routes.len(), path = %cli.routes.display(), "loaded route table");

    match cli.command {
        Commands::Navigate { url, method } => {
            let context = FluxContext::new(SharedRouteStore::new(RouteStore::with_static_routes(
                routes,
            )));
            let outcome = navigate(&context, NavigationRequest::new(url).method(method)).await;

            let state = context.store().read().dehydrate();
            println!("{}", serde_json::to_string_pretty(&state)?);

            match outcome {
                Ok(()) => {
                    info!("navigation complete");
                    Ok(())
                }
                Err(err) => Err(err).context("navigation failed"),
            }
        }
        Commands::Path { name, params } => {
            let params: Params = params.into_iter().collect();
            let store = RouteStore::with_static_routes(routes);
            let path = store
                .make_path(&name, &params)
                .with_context(|| format!("cannot build a path for route '{name}'"))?;
            println!("{path}");
            Ok(())
        }
        Commands::Restore { snapshot } => {
            let raw = fs::read_to_string(&snapshot)
                .with_context(|| format!("reading {}", snapshot.display()))?;
            let state: DehydratedState = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", snapshot.display()))?;

            let mut store = RouteStore::with_static_routes(routes);
            store.rehydrate(state);

            match store.current_route() {
                Some(route) => {
                    println!("{}", serde_json::to_string_pretty(&*route)?);
                    Ok(())
                }
                None => anyhow::bail!("snapshot has no current route"),
            }
        }
    }
}

fn load_routes(path: &Path) -> anyhow::Result<RouteTable> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let routes = serde_json::from_str(&raw)
        .with_context(|| format!("parsing route table {}", path.display()))?;
    Ok(routes)
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

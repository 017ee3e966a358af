use clap::{Parser, Subcommand};
use tracing::error;

use extension_catalog::app::{App, CatalogMode};
use extension_catalog::catalog::types::ViewFilter;
use extension_catalog::config::{self, AppConfig};

#[derive(Parser)]
#[command(name = "extension-catalog")]
#[command(version, about = "Installed extensions and the versions available for them")]
struct Cli {
    /// Use only the cached catalog
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List extensions
    List {
        /// all, installed, not-installed or new-versions
        #[arg(long, default_value = "all", value_parser = parse_filter)]
        filter: ViewFilter,
        /// Fetch the catalog even if the cache is fresh
        #[arg(long)]
        refresh: bool,
        /// Print the listed versions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the versions and available actions of one extension
    Show {
        id: String,
        /// Version to display instead of the version in focus
        #[arg(long)]
        version: Option<String>,
    },
    /// Fetch the catalog into the cache
    Refresh,
}

fn parse_filter(value: &str) -> Result<ViewFilter, String> {
    value.parse()
}

fn catalog_mode(offline: bool, refresh: bool) -> CatalogMode {
    if offline {
        CatalogMode::Offline
    } else if refresh {
        CatalogMode::Refresh
    } else {
        CatalogMode::Cached
    }
}

fn main() -> anyhow::Result<()> {
    let Cli { offline, command } = Cli::parse();

    let _guard = extension_catalog::logging::init(&config::log_path())?;
    let app = App::new(AppConfig::load(&config::config_path())?, config::db_path());
    let mut stdout = std::io::stdout().lock();

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            match command {
                Command::List {
                    filter,
                    refresh,
                    json,
                } => {
                    app.list(&mut stdout, filter, json, catalog_mode(offline, refresh))
                        .await
                }
                Command::Show { id, version } => {
                    app.show(
                        &mut stdout,
                        &id,
                        version.as_deref(),
                        catalog_mode(offline, false),
                    )
                    .await
                }
                Command::Refresh => app.refresh(&mut stdout).await,
            }
        });

    result.inspect_err(|e| error!("{:#}", e))
}

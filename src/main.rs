use actix_web::{web, App, HttpServer};
use anyhow::Result;
use clap::Parser;
use log::info;

use flowfilter::api::routes;
use flowfilter::api::state::AppState;
use flowfilter::filters::catalog::Catalog;
use flowfilter::filters::options::MAX_OPTIONS;
use flowfilter::models::config::AppConfig;
use flowfilter::models::filter::Match;
use flowfilter::utils::logging;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Network flow filter catalog and query compiler with REST API")]
struct Args {
    /// Address for the REST API server
    #[clap(long, default_value = "127.0.0.1")]
    host: String,

    /// Port for the REST API server
    #[clap(short, long, default_value = "3000")]
    port: u16,

    /// Match mode used when a request does not give one (all, any)
    #[clap(short, long = "match", default_value = "all")]
    match_mode: Match,

    /// Maximum autocomplete suggestions per lookup
    #[clap(long, default_value_t = MAX_OPTIONS)]
    max_options: usize,

    /// Log level (trace, debug, info, warn, error, off)
    #[clap(long, default_value = "info")]
    log_level: String,

    /// Log level for the filter compiler and URL codec, overrides --log-level there
    #[clap(long)]
    filters_log_level: Option<String>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger with specified level
    logging::init_logger(
        logging::get_log_level(&args.log_level),
        args.filters_log_level.as_deref().map(logging::get_log_level),
    );

    info!("Starting FlowFilter v{}", env!("CARGO_PKG_VERSION"));

    // Create application config
    let config = AppConfig {
        host: args.host,
        port: args.port,
        default_match: args.match_mode,
        max_options: args.max_options,
    };

    // Display strings are served untranslated; the console localizes them
    let catalog = Catalog::builtin(&|key: &str| key.to_string())?;
    info!("Loaded {} filter definitions", catalog.definitions().len());

    let app_state = web::Data::new(AppState::new(catalog, config.clone()));

    info!("Starting FlowFilter API server on {}:{}", config.host, config.port);

    // Start the HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

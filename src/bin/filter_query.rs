use anyhow::Result;
use clap::Parser;

use flowfilter::filters::cache::AutocompleteCache;
use flowfilter::filters::catalog::Catalog;
use flowfilter::filters::{query, url};
use flowfilter::utils::logging;

/// Print the backend queries for a page URL
#[derive(Parser, Debug)]
#[clap(author, version, about = "Decode a filters URL value and compile it for both match modes")]
struct Args {
    /// Page query string or bare `filters` value, e.g. "?filters=port%3D80&match=any"
    input: String,

    /// Log level (trace, debug, info, warn, error, off)
    #[clap(long, default_value = "warn")]
    log_level: String,

    /// Log level for the filter compiler and URL codec, overrides --log-level there
    #[clap(long)]
    filters_log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logger(
        logging::get_log_level(&args.log_level),
        args.filters_log_level.as_deref().map(logging::get_log_level),
    );

    println!("Filter Query Test Application");

    let params = url::parse_page_query(&args.input);
    let url_value = params.filters.unwrap_or_else(|| args.input.clone());

    let catalog = Catalog::builtin(&|key: &str| key.to_string())?;
    let cache = AutocompleteCache::new();
    let filters = url::deserialize(&url_value, &catalog, &cache).await;

    if filters.is_empty() {
        println!("No known filters in input, the query matches everything");
    }
    for filter in &filters {
        let op = if filter.negated { "!=" } else { "=" };
        let values: Vec<String> = filter
            .values
            .iter()
            .map(|value| match &value.display {
                Some(display) if display != &value.v => format!("{} ({})", value.v, display),
                _ => value.v.clone(),
            })
            .collect();
        println!("  {} {} {}", filter.definition.name, op, values.join(", "));
    }

    println!("Match mode from URL: {}", params.match_mode);
    println!("match all: {}", query::compile_match_all(&filters));
    println!("match any: {}", query::compile_match_any(&filters));
    println!("URL: ?{}", url::page_query(&filters, params.match_mode));

    Ok(())
}

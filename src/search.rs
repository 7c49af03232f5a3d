use std::path::Path;

use anyhow::{bail, Context};
use tracing::info;

use crate::{
    cli::SearchArgs,
    services::{
        llm_client::llm_service::LlmService,
        places_client::{
            places_service::PlacesService,
            types::{filter_spec::FilterSpec, google_text_search_response::Place},
        },
    },
};

/// Expands the request into entities and a filter, then fetches and merges
/// every entity's results. `llm` must be present whenever
/// `args.needs_llm()` holds.
pub async fn run_search(
    args: &SearchArgs,
    places: &PlacesService,
    llm: Option<&LlmService>,
) -> anyhow::Result<Vec<Place>> {
    info!("Fetching locations for query: {}", args.query);

    let entities = if args.no_expand {
        vec![args.query.clone()]
    } else {
        let llm = llm.context("query expansion requires a chat model")?;
        llm.generate_sub_queries(&args.query)
            .await
            .context("failed to generate sub-queries")?
    };

    if entities.is_empty() {
        bail!("query expansion produced no searches for {:?}", args.query);
    }

    let filter = if args.explicit_filter() {
        FilterSpec::from_comma_lists(args.contains.as_deref(), args.matches.as_deref())
    } else {
        let llm = llm.context("filter generation requires a chat model")?;
        llm.generate_filter(&args.query)
            .await
            .context("failed to generate filter")?
    };

    info!(?entities, contains = ?filter.contains, matches = ?filter.matches, "searching");

    let locations = places.fetch_all_locations(&entities, &filter).await?;

    Ok(locations)
}

/// Writes indented JSON to `output`, or to stdout when no file is given.
pub fn write_output(locations: &[Place], output: Option<&Path>) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(locations).context("failed to marshal locations")?;

    match output {
        Some(path) => {
            info!("Writing results to file: {}", path.display());
            std::fs::write(path, data)
                .with_context(|| format!("failed to write to file {}", path.display()))?;
        }
        None => println!("{data}"),
    }

    Ok(())
}

mod app;
mod cli;
mod middlewares;
mod routes;
mod search;
mod services;
mod types;
mod utils;

use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use clap::{CommandFactory, Parser};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};

use crate::{
    app::{gen_app, AppConfig},
    cli::{Cli, Commands, LlmArgs, SearchArgs, ServeArgs},
    services::{
        llm_client::{
            chatgpt_client::{ChatGptClient, ChatGptClientConfig},
            llm_service::LlmService,
        },
        places_client::places_service::{PlacesService, PlacesServiceConfig},
    },
    utils::{
        prompt_reader::PromptDirectory,
        rest_caller::{RestCaller, RestCallerConfig},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Completion { shell } = &cli.command {
        clap_complete::generate(
            *shell,
            &mut Cli::command(),
            "places-scout",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let api_key = cli.api_key.clone().filter(|k| !k.is_empty()).ok_or_else(|| {
        anyhow!("missing Google Places API key, set it via --api-key flag or GOOGLE_API_KEY environment variable")
    })?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling...");
                cancel.cancel();
            }
        }
    });

    let places = PlacesServiceConfig {
        api_key,
        host: cli.host.clone(),
        page_delay: Duration::from_millis(cli.page_delay_ms),
    };
    let caller = RestCallerConfig {
        retries: cli.retries,
        ..Default::default()
    };

    match cli.command {
        Commands::Search(args) => search_command(args, places, caller, cancel).await,
        Commands::Serve(args) => serve_command(args, places, caller, cancel).await,
        // Answered before logging is set up.
        Commands::Completion { .. } => Ok(()),
    }
}

async fn search_command(
    args: SearchArgs,
    places: PlacesServiceConfig,
    caller: RestCallerConfig,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let llm = if args.needs_llm() {
        Some(gen_llm_service(&args.llm)?)
    } else {
        None
    };

    let service = PlacesService::new(
        places,
        Arc::new(RestCaller::new(caller, cancel.clone())),
        cancel,
    );

    let locations = search::run_search(&args, &service, llm.as_ref()).await?;

    search::write_output(&locations, args.output.as_deref())
}

fn gen_llm_service(args: &LlmArgs) -> anyhow::Result<LlmService> {
    let api_key = args
        .openai_api_key
        .clone()
        .filter(|k| !k.is_empty())
        .context("missing OpenAI API key, set it via --openai-api-key flag or OPENAI_API_KEY environment variable, or pass --no-expand together with --contains/--matches")?;

    let client = ChatGptClient::new(ChatGptClientConfig {
        api_key,
        host: args.openai_host.clone(),
        model: args.model.clone(),
    });

    Ok(LlmService::new(
        Arc::new(client),
        Arc::new(PromptDirectory::new(args.prompts_dir.clone())),
    ))
}

async fn serve_command(
    args: ServeArgs,
    places: PlacesServiceConfig,
    caller: RestCallerConfig,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let app = gen_app(AppConfig {
        places,
        caller,
        auth_key: args.auth_key,
        cancel: cancel.clone(),
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("failed to bind port {}", args.port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    Ok(())
}

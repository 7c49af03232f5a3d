use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Fetch locations using the Google Places text search API.
///
/// A free-text request is expanded into several narrower searches and a
/// name filter by a chat model, every search is paged through, and the
/// filtered, de-duplicated places are printed as JSON.
#[derive(Parser, Debug)]
#[command(name = "places-scout", version, about, long_about = None)]
pub struct Cli {
    /// Google Places API key.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Places API host, without a trailing slash.
    #[arg(
        long,
        env = "PLACES_HOST",
        default_value = "https://maps.googleapis.com",
        global = true
    )]
    pub host: String,

    /// Extra attempts per request after the first failure.
    #[arg(long, env = "PLACES_RETRIES", default_value_t = 3, global = true)]
    pub retries: usize,

    /// Wait between result pages, in milliseconds.
    #[arg(long, env = "PLACES_PAGE_DELAY_MS", default_value_t = 5000, global = true)]
    pub page_delay_ms: u64,

    /// Log debug output to stderr.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one search and write the results as JSON.
    Search(SearchArgs),
    /// Serve searches over HTTP.
    Serve(ServeArgs),
    /// Print a shell completion script to stdout.
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Free-text search request.
    #[arg(long, short = 'q', default_value = "Whole Foods In USA")]
    pub query: String,

    /// File to write the JSON results to instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Search for the query as given instead of expanding it.
    #[arg(long)]
    pub no_expand: bool,

    /// Comma-separated substring terms. Skips filter generation.
    #[arg(long)]
    pub contains: Option<String>,

    /// Comma-separated exact-name terms. Skips filter generation.
    #[arg(long)]
    pub matches: Option<String>,

    #[command(flatten)]
    pub llm: LlmArgs,
}

impl SearchArgs {
    pub fn explicit_filter(&self) -> bool {
        self.contains.is_some() || self.matches.is_some()
    }

    /// The chat model is only consulted for expansion or filter generation.
    pub fn needs_llm(&self) -> bool {
        !self.no_expand || !self.explicit_filter()
    }
}

#[derive(Args, Debug, Clone)]
pub struct LlmArgs {
    /// OpenAI API key, required unless both --no-expand and a filter are given.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Chat completions host, without a trailing slash.
    #[arg(long, env = "OPENAI_HOST", default_value = "https://api.openai.com")]
    pub openai_host: String,

    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    /// Directory holding query_prompt.txt and filter_prompt.txt.
    #[arg(long, env = "PROMPTS_DIR", default_value = "prompts")]
    pub prompts_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Require this key in the Authorization header.
    #[arg(long, env = "AUTH_KEY", hide_env_values = true)]
    pub auth_key: Option<String>,
}

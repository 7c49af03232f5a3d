use std::sync::Arc;

use tracing::debug;

use crate::{
    services::places_client::types::filter_spec::FilterSpec, utils::prompt_reader::PromptReader,
};

use super::{chatgpt_client::LlmClient, types::llm_service_error::LlmServiceError};

const QUERY_PROMPT_FILE: &str = "query_prompt.txt";
const FILTER_PROMPT_FILE: &str = "filter_prompt.txt";
const INPUT_QUERY: &str = "input query: ";

/// Turns a free-text request into search entities and a name filter by
/// asking the model with the matching prompt template.
#[derive(Clone)]
pub struct LlmService {
    client: Arc<dyn LlmClient>,
    prompts: Arc<dyn PromptReader>,
}

impl LlmService {
    pub fn new(client: Arc<dyn LlmClient>, prompts: Arc<dyn PromptReader>) -> Self {
        Self { client, prompts }
    }

    pub async fn generate_sub_queries(&self, query: &str) -> Result<Vec<String>, LlmServiceError> {
        let reply = self.ask(QUERY_PROMPT_FILE, query).await?;
        let queries = extract_search_queries(&reply);

        debug!(?queries, "generated sub-queries");

        Ok(queries)
    }

    pub async fn generate_filter(&self, query: &str) -> Result<FilterSpec, LlmServiceError> {
        let reply = self.ask(FILTER_PROMPT_FILE, query).await?;
        let filter = extract_contains_and_matches(&reply);

        debug!(contains = ?filter.contains, matches = ?filter.matches, "generated filter");

        Ok(filter)
    }

    async fn ask(&self, prompt_file: &str, query: &str) -> Result<String, LlmServiceError> {
        let context = self.prompts.read_prompt(prompt_file).await?;

        self.client
            .query(&context, &format!("{INPUT_QUERY}{query}"))
            .await
    }
}

/// Collects the text after every `search [n]:` marker, one per line.
fn extract_search_queries(input: &str) -> Vec<String> {
    input
        .trim()
        .lines()
        .filter_map(|line| parse_search_line(line.trim()))
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_search_line(line: &str) -> Option<&str> {
    line.match_indices("search").find_map(|(idx, marker)| {
        let rest = line[idx + marker.len()..].trim_start();
        let rest = rest.strip_prefix('[')?;
        let digits = rest.find(|c: char| !c.is_ascii_digit())?;
        if digits == 0 {
            return None;
        }
        let rest = rest[digits..].strip_prefix("]:")?;

        Some(rest.trim())
    })
}

fn extract_contains_and_matches(input: &str) -> FilterSpec {
    FilterSpec::new(
        labelled_list(input, "contains:"),
        labelled_list(input, "matches:"),
    )
}

/// Finds the first `label` (ASCII case-insensitive) and splits the text
/// up to the end of that line on commas.
fn labelled_list<'a>(input: &'a str, label: &str) -> Vec<&'a str> {
    let lowered = input.to_ascii_lowercase();

    let Some(start) = lowered.find(label) else {
        return Vec::new();
    };

    let value = input[start + label.len()..].trim_start();
    let value = value.split('\n').next().unwrap_or_default();

    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

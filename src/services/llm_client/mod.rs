pub mod chatgpt_client;
pub mod llm_service;
pub mod types;

pub mod llm_client;
pub mod places_client;

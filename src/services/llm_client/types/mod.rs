pub mod chat_completion;
pub mod llm_service_error;

pub mod app_error;
pub mod cancellation;
pub mod prompt_reader;
pub mod rest_caller;
pub mod validated_query;

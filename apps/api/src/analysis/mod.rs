pub mod analyzer;
pub mod handlers;
pub mod normalizer;
pub mod prompts;
pub mod query;
pub mod schema;
pub mod store;

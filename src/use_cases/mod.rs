pub mod create_content;
pub mod generate_feed;
pub mod log_consumption;
pub mod register_agent;
pub mod related_content;
pub mod semantic_search;
pub mod view_content;

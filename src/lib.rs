pub mod articles;
pub mod config;
pub mod favorites;
pub mod feed;
pub mod fetcher;
pub mod preview;
pub mod summarizer;
pub mod telemetry;

pub mod cli;
pub mod error;
pub mod normalizer;
pub mod payload;
pub mod record;
pub mod render;
pub mod samples;
pub mod search;
pub mod store;

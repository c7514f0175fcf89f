pub mod annotate;
pub mod args;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod ingest;
pub mod layout;
pub mod logging;
pub mod model;
pub mod render;
pub mod run;

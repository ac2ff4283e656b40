pub mod api;
pub mod config;
pub mod error;
pub mod graph;
pub mod loader;
pub mod metrics;
pub mod optimizer;
pub mod partition;
pub mod reassign;
pub mod scorer;
// cmd and reports belong to the binary crate (main.rs).

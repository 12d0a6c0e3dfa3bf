#[cfg(test)]
mod tests;

#[cfg(test)]
pub use tests::support;

pub mod app;
pub mod compose;
pub mod config;
pub mod contest;
pub mod controller;
pub mod envfile;
pub mod error;
pub mod executor;
pub mod http;
pub mod impact;
pub mod locate;
pub mod metrics;
pub mod middleware;
pub mod orchestrator;
pub mod policy;
pub mod shutdown;

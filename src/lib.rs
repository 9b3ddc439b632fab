//! Self-assessment against a capability matrix: rate skills, flag focus
//! areas, and export the results as text or CSV.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod rating;
pub mod render;
pub mod repl;
pub mod report;
pub mod store;
pub mod view;

pub use catalog::Catalog;
pub use config::Config;
pub use rating::Rating;
pub use store::AssessmentStore;

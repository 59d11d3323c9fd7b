// Library exports for the CLI, integration tests and the surrounding dashboard

pub mod app_data;
pub mod audit;
pub mod cli;
pub mod config;
pub mod errors;
pub mod providers;
pub mod services;
pub mod stores;
pub mod types;

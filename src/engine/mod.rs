pub mod models;
pub mod error;
pub mod rules;
pub mod agent;
pub mod transcript;
pub mod match_runner;
pub mod arena;
pub mod store;
pub mod playoffs;
pub mod catalogue;
pub mod config;

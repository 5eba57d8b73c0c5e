pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod relay;
pub mod transfer;
pub mod views;
pub mod workflow;

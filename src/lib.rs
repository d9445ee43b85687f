// src/lib.rs
pub mod commands;
pub mod config;
pub mod connections;
pub mod health;
pub mod metrics;
pub mod pods;
pub mod server;

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod server;
pub mod service;

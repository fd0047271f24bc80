//! Configuration and wire models shared by the API and the pipeline

pub mod config;
pub mod models;

//! Small helpers shared by the pipeline stages

pub mod filters;
pub mod links;
pub mod mime;

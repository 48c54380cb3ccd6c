pub mod config;
pub mod entrypoint;
pub mod model;
pub mod service;

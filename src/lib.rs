pub mod commands;
pub mod environment;
pub mod knowledge;
pub mod models;
pub mod plan;

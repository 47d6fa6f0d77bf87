pub mod config;
pub mod error;
pub mod game;
pub mod pose;
pub mod render;
pub mod scheduler;
pub mod scoring;

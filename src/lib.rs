pub mod api;
pub mod bootstrap;
pub mod config;
pub mod database;
pub mod error;
pub mod favorites;
pub mod friends;
pub mod identity;
pub mod posting;
pub mod remixes;
pub mod telemetry;
pub mod trending;
pub mod utils;

pub mod comparison;
pub mod config;
pub mod http_client;
pub mod logging;
pub mod matchup;
pub mod nhl_api;
pub mod persist;
pub mod playoffs;
pub mod predictions;
pub mod provider;
pub mod schedule;
pub mod standings;
pub mod state;

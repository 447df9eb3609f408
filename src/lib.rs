pub mod admin;
pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod notifications;
pub mod ratings;
pub mod skills;
pub mod state;
pub mod store;
pub mod swaps;
pub mod users;

#[cfg(test)]
mod testing;

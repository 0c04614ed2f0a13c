pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod progression;
pub mod quiz;
pub mod session;
pub mod state;
pub mod store;

#[cfg(test)]
pub mod testing;

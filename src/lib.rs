pub mod cli;
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod store;
pub mod view;

pub use db::Database;

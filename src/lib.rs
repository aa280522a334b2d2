pub mod api;
pub mod config;
pub mod db;
pub mod defaults;
pub mod models;
pub mod providers;
pub mod repl;
pub mod terminal;

pub mod db;
pub mod errors;
pub mod loader;
pub mod models;
pub mod project;
pub mod reader;
pub mod sql;

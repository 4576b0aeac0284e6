pub mod connections;
pub mod record;
pub mod schema;

pub mod optimize;
pub mod schema;
pub mod types;

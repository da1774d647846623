pub mod db;
pub mod models;
mod query;
mod rows;
mod schema;
mod tables;

pub use db::{Database, DatabaseError};
pub use query::MigratedFilesCursor;
pub use schema::Schema;
pub use tables::*;

//! Infrastructure: SQLite connection and migrations.

pub mod db;

pub(crate) use db::get_connection;
pub use db::{acquire_connection, Availability, DbConn, DbPool, DbSource};

//! Domain enums shared by use cases and storage.

mod role;

pub use role::UserRole;

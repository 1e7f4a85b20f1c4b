/// Admin allow-list loading from environment variables
pub mod admins;

/// Database configuration and connection management
pub mod database;

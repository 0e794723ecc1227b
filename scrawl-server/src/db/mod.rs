//! Database layer: connection pool, schema bootstrap, repositories

pub mod pool;
pub mod repos;
pub mod schema;

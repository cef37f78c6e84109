// Library for tests and demos to access modules

pub mod config;
pub mod datasets;
pub mod downsample;
pub mod log_reader;
pub mod models;
pub mod routes;
pub mod schema;
pub mod usage;
pub mod usage_repo;

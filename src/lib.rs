// Library for tests to access modules

pub mod aggregation;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod row_key;
pub mod scan;
pub mod stat_dao;
pub mod store;

pub mod api;
pub mod config;
pub mod humanize;
pub mod observability;
pub mod pagination;
pub mod purge;
pub mod transport;

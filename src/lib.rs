pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod paths;
pub mod scoring;
pub mod session;
pub mod srs;

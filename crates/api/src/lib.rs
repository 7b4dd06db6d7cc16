//! HTTP service for the flight scheduler: configuration, routes, the
//! resource access facade and background jobs.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod jobs;
pub mod middleware;
pub mod routes;
pub mod services;

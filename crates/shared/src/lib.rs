//! Shared utilities and common types for the flight scheduler backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Session token (JWT) validation
//! - Common validation logic for tail numbers and airport codes

pub mod jwt;
pub mod validation;

//! Unit tests for harness settings loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `precedence`: Layer precedence tests
//! - `derived_settings`: Timeout, worker, filter, and format derivation tests

mod derived_settings;

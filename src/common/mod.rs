//! Common utilities and shared functionality
//!
//! Wheel types shared by every layer, and the configuration loader.

pub mod types;
pub mod config;

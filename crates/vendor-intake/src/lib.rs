//! Vendor onboarding: buyers submit vendor requests, admins decide them, and approved
//! requests are promoted into the shared vendor catalog.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

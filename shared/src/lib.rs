//! Panorama API boundary
//!
//! This crate provides the [`PanoramaApi`] trait the device manager is written
//! against, the XML request builders and response parsing for the Panorama
//! XML API, and [`PanoramaClient`], an HTTP implementation of the trait.

pub mod client;
pub mod traits;
pub mod xml;

pub use client::{ClientConfig, PanoramaClient};
pub use traits::PanoramaApi;
pub use xml::{ApiError, ApiResponse, JobStatus};

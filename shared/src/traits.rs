//! The remote configuration boundary consumed by the device manager

use crate::xml::{ApiError, ApiResponse};
use async_trait::async_trait;

/// Operations the device manager needs from a Panorama appliance
///
/// Implementations own transport, authentication and XML decoding; callers
/// only see parsed responses and [`ApiError`]s.
#[async_trait]
pub trait PanoramaApi: Send + Sync {
    /// Run an operational command (`type=op`)
    async fn op(&self, cmd: &str) -> Result<ApiResponse, ApiError>;

    /// Stage an element below `xpath` (`type=config&action=set`)
    async fn set_config(&self, xpath: &str, element: &str) -> Result<ApiResponse, ApiError>;

    /// Stage removal of the node at `xpath` (`type=config&action=delete`)
    async fn delete_config(&self, xpath: &str) -> Result<ApiResponse, ApiError>;

    /// Apply staged configuration, waiting for the commit job to finish
    async fn commit(&self) -> Result<(), ApiError>;

    /// Generate a device registration token valid for `validity_days`
    async fn vm_auth_key(&self, validity_days: u32) -> Result<String, ApiError>;
}

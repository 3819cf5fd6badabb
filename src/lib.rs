//! Panorama device manager
//!
//! Manages firewall device groups on a Panorama appliance on behalf of a
//! security orchestrator, and builds the bootstrap packages new firewalls
//! boot from. The appliance is reached through the
//! [`PanoramaApi`](panorama_shared::PanoramaApi) boundary.

pub mod bootstrap;
pub mod config;
pub mod device;
pub mod error;
pub mod model;
pub mod session;

#[cfg(test)]
mod mock;

pub use bootstrap::{BootstrapBuilder, BootstrapPackage, DeviceInfo};
pub use config::{BootstrapConfig, DeviceApiConfig};
pub use device::{DeviceGroupLister, DeviceGroupReconciler, ManagerDeviceApi, PollPolicy};
pub use error::DeviceError;
pub use model::{
    ApplianceManagerConnector, BootstrapInfo, DeviceGroup, DeviceMember, DeviceMemberSpec,
    ReconcileOutcome, VirtualSystem,
};
pub use session::PanDeviceApi;

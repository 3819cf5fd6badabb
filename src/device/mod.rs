//! Device group management
//!
//! This module handles:
//! - The orchestrator-facing device management trait
//! - Listing device groups from Panorama
//! - Creating and deleting device groups and waiting for the change to land
//! - Polling budgets for that wait

mod api;
mod lister;
mod poll;
mod reconciler;

pub use api::ManagerDeviceApi;
pub use lister::DeviceGroupLister;
pub use poll::PollPolicy;
pub use reconciler::DeviceGroupReconciler;

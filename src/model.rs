//! Orchestration-side elements and device records

use std::fmt;

/// A device group on Panorama, the unit the orchestrator manages
///
/// The name doubles as the display id. Nothing else about a group is tracked
/// locally; Panorama is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceGroup {
    name: String,
}

impl DeviceGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DeviceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Result of reconciling a device group against Panorama
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Create found the group already present; nothing was changed
    AlreadyExists,
    /// Group was added and became visible
    Created,
    /// Group never became visible within the create budget
    CreateFailed,
    /// Delete found no such group; nothing was changed
    AlreadyAbsent,
    /// Group was removed and is gone
    Deleted,
    /// Group was still listed when the delete budget ran out
    DeleteTimedOut,
}

impl ReconcileOutcome {
    /// Whether the group is in the requested state afterwards
    pub fn is_converged(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists | Self::Created | Self::AlreadyAbsent | Self::Deleted
        )
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AlreadyExists => "already exists",
            Self::Created => "created",
            Self::CreateFailed => "create failed",
            Self::AlreadyAbsent => "already absent",
            Self::Deleted => "deleted",
            Self::DeleteTimedOut => "delete timed out",
        };
        f.write_str(label)
    }
}

/// The management appliance connector configured in the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplianceManagerConnector {
    pub name: String,
    /// Address firewalls use to reach Panorama
    pub ip_address: String,
}

impl ApplianceManagerConnector {
    pub fn new(name: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ip_address: ip_address.into(),
        }
    }
}

/// Orchestration-side virtual system; its name is the device group name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualSystem {
    pub name: String,
}

impl VirtualSystem {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Per-device information the orchestrator supplies when asking for a
/// bootstrap package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapInfo {
    /// Display name of the firewall being provisioned
    pub name: String,
}

impl BootstrapInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Parameters of an individual firewall member
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceMemberSpec {
    pub name: String,
    pub host_name: String,
    pub ip_address: String,
    pub mgmt_ip_address: String,
    pub gateway: String,
    pub prefix_length: String,
}

/// An individual firewall known to the manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMember {
    pub id: String,
    pub name: String,
}

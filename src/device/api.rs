//! The device-management capability the orchestrator drives

use crate::bootstrap::BootstrapPackage;
use crate::error::DeviceError;
use crate::model::{BootstrapInfo, DeviceGroup, DeviceMember, DeviceMemberSpec, ReconcileOutcome};
use async_trait::async_trait;
use bytes::Bytes;

/// Device management as seen by the orchestrator
///
/// Device group operations must be implemented. Member-level operations
/// default to [`DeviceError::Unsupported`]; a manager that provisions
/// individual firewalls overrides them.
#[async_trait]
pub trait ManagerDeviceApi: Send + Sync {
    fn is_device_group_supported(&self) -> bool;

    async fn list_devices(&self) -> Result<Vec<DeviceGroup>, DeviceError>;

    async fn get_device_by_id(&self, id: &str) -> Result<Option<DeviceGroup>, DeviceError>;

    /// Id of the device called `name`, if any
    async fn find_device_by_name(&self, name: &str) -> Result<Option<String>, DeviceError>;

    async fn create_device_group(&self) -> Result<ReconcileOutcome, DeviceError>;

    async fn update_device_group(&self, existing: &DeviceGroup) -> Result<ReconcileOutcome, DeviceError>;

    async fn delete_device_group(&self) -> Result<ReconcileOutcome, DeviceError>;

    async fn get_bootstrap_package(&self, info: &BootstrapInfo) -> Result<BootstrapPackage, DeviceError>;

    fn is_upgrade_supported(&self, _model_type: &str, _prev_version: &str, _new_version: &str) -> bool {
        false
    }

    async fn create_device_member(&self, _member: &DeviceMemberSpec) -> Result<String, DeviceError> {
        Err(DeviceError::Unsupported("create_device_member"))
    }

    async fn update_device_member(
        &self,
        _id: &str,
        _member: &DeviceMemberSpec,
    ) -> Result<String, DeviceError> {
        Err(DeviceError::Unsupported("update_device_member"))
    }

    async fn delete_device_member(&self, _id: &str) -> Result<(), DeviceError> {
        Err(DeviceError::Unsupported("delete_device_member"))
    }

    async fn get_device_member_by_id(&self, _id: &str) -> Result<Option<DeviceMember>, DeviceError> {
        Err(DeviceError::Unsupported("get_device_member_by_id"))
    }

    async fn find_device_member_by_name(&self, _name: &str) -> Result<Option<DeviceMember>, DeviceError> {
        Err(DeviceError::Unsupported("find_device_member_by_name"))
    }

    async fn list_device_members(&self) -> Result<Vec<DeviceMember>, DeviceError> {
        Err(DeviceError::Unsupported("list_device_members"))
    }

    async fn get_device_member_config_by_id(&self, _id: &str) -> Result<Bytes, DeviceError> {
        Err(DeviceError::Unsupported("get_device_member_config_by_id"))
    }

    async fn get_device_member_configuration(&self, _instance: &str) -> Result<Bytes, DeviceError> {
        Err(DeviceError::Unsupported("get_device_member_configuration"))
    }

    async fn get_device_member_additional_configuration(
        &self,
        _instance: &str,
    ) -> Result<Bytes, DeviceError> {
        Err(DeviceError::Unsupported("get_device_member_additional_configuration"))
    }

    /// Release resources held by the session
    fn close(&self) {}
}

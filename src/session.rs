//! Panorama device session
//!
//! One session serves one virtual system: its device group is named after the
//! virtual system, and every bootstrap package it builds points firewalls at
//! that group.

use crate::bootstrap::{BootstrapBuilder, BootstrapPackage, DeviceInfo};
use crate::config::DeviceApiConfig;
use crate::device::{DeviceGroupReconciler, ManagerDeviceApi};
use crate::error::DeviceError;
use crate::model::{
    ApplianceManagerConnector, BootstrapInfo, DeviceGroup, ReconcileOutcome, VirtualSystem,
};
use async_trait::async_trait;
use panorama_shared::PanoramaApi;
use std::sync::Arc;
use tracing::{debug, info};

/// [`ManagerDeviceApi`] backed by a Panorama appliance
pub struct PanDeviceApi {
    connector: ApplianceManagerConnector,
    vs: VirtualSystem,
    reconciler: DeviceGroupReconciler,
    bootstrap: BootstrapBuilder,
}

impl PanDeviceApi {
    /// Open a session, obtaining the device registration token up front
    pub async fn new(
        connector: ApplianceManagerConnector,
        vs: VirtualSystem,
        client: Arc<dyn PanoramaApi>,
        config: DeviceApiConfig,
    ) -> Result<Self, DeviceError> {
        let validity_days = config.bootstrap.auth_key_validity_days;
        let auth_key = client
            .vm_auth_key(validity_days)
            .await
            .map_err(DeviceError::SessionInit)?;

        info!(
            "Device session for {} on {} ({}) ready, registration token valid for {} days",
            vs.name, connector.name, connector.ip_address, validity_days
        );

        Ok(Self {
            reconciler: DeviceGroupReconciler::new(client, &config),
            bootstrap: BootstrapBuilder::new(config.bootstrap, auth_key),
            connector,
            vs,
        })
    }

    /// Name of the device group this session manages
    pub fn device_group_name(&self) -> &str {
        &self.vs.name
    }

    pub fn connector(&self) -> &ApplianceManagerConnector {
        &self.connector
    }
}

#[async_trait]
impl ManagerDeviceApi for PanDeviceApi {
    fn is_device_group_supported(&self) -> bool {
        true
    }

    async fn list_devices(&self) -> Result<Vec<DeviceGroup>, DeviceError> {
        self.reconciler.lister().list_device_groups().await
    }

    async fn get_device_by_id(&self, id: &str) -> Result<Option<DeviceGroup>, DeviceError> {
        if id.is_empty() {
            return Err(DeviceError::InvalidArgument("empty device id".into()));
        }
        self.reconciler.lister().get_by_name(id).await
    }

    async fn find_device_by_name(&self, name: &str) -> Result<Option<String>, DeviceError> {
        Ok(self
            .get_device_by_id(name)
            .await?
            .map(|group| group.id().to_string()))
    }

    async fn create_device_group(&self) -> Result<ReconcileOutcome, DeviceError> {
        self.reconciler.create(&self.vs.name).await
    }

    async fn update_device_group(&self, existing: &DeviceGroup) -> Result<ReconcileOutcome, DeviceError> {
        debug!("Updating device group {} as {}", existing, self.vs.name);
        self.reconciler.update(&self.vs.name).await
    }

    async fn delete_device_group(&self) -> Result<ReconcileOutcome, DeviceError> {
        self.reconciler.delete(&self.vs.name).await
    }

    async fn get_bootstrap_package(&self, info: &BootstrapInfo) -> Result<BootstrapPackage, DeviceError> {
        self.bootstrap.build(&DeviceInfo {
            device_name: info.name.clone(),
            appliance_address: self.connector.ip_address.clone(),
            device_group: self.vs.name.clone(),
        })
    }
}

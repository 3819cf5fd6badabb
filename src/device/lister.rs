//! Device group listing

use crate::error::DeviceError;
use crate::model::DeviceGroup;
use panorama_shared::xml::SHOW_DEVICE_GROUPS_CMD;
use panorama_shared::PanoramaApi;
use std::sync::Arc;
use tracing::debug;

/// Reads the current device groups from Panorama
///
/// Every call goes to the appliance; nothing is cached.
#[derive(Clone)]
pub struct DeviceGroupLister {
    client: Arc<dyn PanoramaApi>,
}

impl DeviceGroupLister {
    pub fn new(client: Arc<dyn PanoramaApi>) -> Self {
        Self { client }
    }

    /// All device groups Panorama currently reports
    pub async fn list_device_groups(&self) -> Result<Vec<DeviceGroup>, DeviceError> {
        let names = self
            .client
            .op(SHOW_DEVICE_GROUPS_CMD)
            .await
            .and_then(|response| response.device_groups())
            .map_err(DeviceError::RemoteQuery)?;

        debug!("Panorama lists {} device groups", names.len());
        Ok(names.into_iter().map(DeviceGroup::new).collect())
    }

    /// The device group called `name`, if Panorama lists one
    pub async fn get_by_name(&self, name: &str) -> Result<Option<DeviceGroup>, DeviceError> {
        Ok(self
            .list_device_groups()
            .await?
            .into_iter()
            .find(|group| group.name() == name))
    }

    pub async fn exists(&self, name: &str) -> Result<bool, DeviceError> {
        Ok(self.get_by_name(name).await?.is_some())
    }
}

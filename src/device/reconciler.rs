//! Device group reconciliation
//!
//! A create or delete is staged, committed, and then confirmed by polling the
//! device group listing until Panorama reports the expected state:
//!
//! ```text
//! exists? ──yes──> AlreadyExists            exists? ──no──> AlreadyAbsent
//!    │no                                       │yes
//! set-config + commit                       delete-config + commit
//!    │                                         │
//! poll until listed ──budget spent──> Err   poll until gone ──budget spent──> DeleteTimedOut
//!    │                                         │
//! Created                                   Deleted
//! ```

use super::lister::DeviceGroupLister;
use super::poll::PollPolicy;
use crate::config::DeviceApiConfig;
use crate::error::DeviceError;
use crate::model::ReconcileOutcome;
use panorama_shared::xml;
use panorama_shared::PanoramaApi;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Creates and deletes device groups on Panorama
pub struct DeviceGroupReconciler {
    client: Arc<dyn PanoramaApi>,
    lister: DeviceGroupLister,
    xpath_prefix: String,
    description: String,
    create_poll: PollPolicy,
    delete_poll: PollPolicy,
}

impl DeviceGroupReconciler {
    pub fn new(client: Arc<dyn PanoramaApi>, config: &DeviceApiConfig) -> Self {
        Self {
            lister: DeviceGroupLister::new(client.clone()),
            client,
            xpath_prefix: config.device_group_xpath.clone(),
            description: config.device_group_description.clone(),
            create_poll: config.create_poll,
            delete_poll: config.delete_poll,
        }
    }

    pub fn lister(&self) -> &DeviceGroupLister {
        &self.lister
    }

    /// Add the device group `name` and wait until Panorama lists it
    pub async fn create(&self, name: &str) -> Result<ReconcileOutcome, DeviceError> {
        info!("Adding device group {}", name);

        if self.lister.exists(name).await? {
            error!("Device group {} already exists!", name);
            return Ok(ReconcileOutcome::AlreadyExists);
        }

        // a group that could not be addressed for delete is never created
        self.xpath(name)?;
        let element = xml::entry_element(name, Some(&self.description), Some("<devices/>"));
        self.client
            .set_config(&self.xpath_prefix, &element)
            .await
            .map_err(|source| DeviceError::ConfigRequest {
                action: "add",
                name: name.to_string(),
                source,
            })?;

        self.commit(format!(
            "Commit failed when adding Device Group Name: {}",
            name
        ))
        .await?;

        let policy = self.create_poll;
        let mut listed = self.lister.exists(name).await?;
        let mut attempt = 0;
        while !listed && attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
            if policy.should_escalate(attempt) {
                warn!(
                    "Device group {} still not added after {:?}. Will keep trying for {:?}",
                    name,
                    policy.elapsed(attempt),
                    policy.remaining(attempt)
                );
            }
            listed = self.lister.exists(name).await?;
            attempt += 1;
        }

        if !listed {
            error!(
                "Device group {}: {} after {} attempts",
                name,
                ReconcileOutcome::CreateFailed,
                attempt
            );
            return Err(DeviceError::CreateTimeout {
                name: name.to_string(),
                attempts: attempt,
                waited: policy.budget(),
            });
        }

        info!("Device group {} added successfully.", name);
        Ok(ReconcileOutcome::Created)
    }

    /// Re-run [`create`](Self::create); members and attributes are not diffed
    pub async fn update(&self, name: &str) -> Result<ReconcileOutcome, DeviceError> {
        self.create(name).await
    }

    /// Remove the device group `name` and wait until Panorama stops listing it
    ///
    /// Running out of polling budget is not an error: the group is reported
    /// as [`ReconcileOutcome::DeleteTimedOut`] and left for manual cleanup.
    pub async fn delete(&self, name: &str) -> Result<ReconcileOutcome, DeviceError> {
        info!("Deleting device group {}", name);
        let xpath = self.xpath(name)?;

        if !self.lister.exists(name).await? {
            error!("Device group {} does not exist!", name);
            return Ok(ReconcileOutcome::AlreadyAbsent);
        }

        self.client
            .delete_config(&xpath)
            .await
            .map_err(|source| DeviceError::ConfigRequest {
                action: "delete",
                name: name.to_string(),
                source,
            })?;

        self.commit(format!(
            "Commit failed when deleting Device Group Name: {}. Does it contain objects?",
            name
        ))
        .await?;

        let policy = self.delete_poll;
        let mut listed = self.lister.exists(name).await?;
        let mut attempt = 0;
        while listed && attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
            listed = self.lister.exists(name).await?;
            attempt += 1;
        }

        if listed {
            error!("Failed to delete {}. Delete manually from the appliance!", name);
            return Ok(ReconcileOutcome::DeleteTimedOut);
        }

        info!("Device group {} deleted.", name);
        Ok(ReconcileOutcome::Deleted)
    }

    fn xpath(&self, name: &str) -> Result<String, DeviceError> {
        xml::entry_xpath(&self.xpath_prefix, name).ok_or_else(|| {
            DeviceError::InvalidArgument(format!(
                "device group name {} mixes single and double quotes",
                name
            ))
        })
    }

    async fn commit(&self, message: String) -> Result<(), DeviceError> {
        self.client
            .commit()
            .await
            .map_err(|source| DeviceError::Commit { message, source })
    }
}

//! Device manager configuration
//!
//! Everything the session needs beyond the connector identity is passed in
//! here at construction; nothing is read from the environment.

use crate::bootstrap::templates;
use crate::device::PollPolicy;
use panorama_shared::xml::XPATH_DEVICE_GROUP_PREFIX;
use std::time::Duration;

/// Defaults for device group reconciliation and bootstrap packaging
pub mod defaults {
    /// Delay between device group existence checks
    pub const POLL_INTERVAL_MS: u64 = 1000;

    /// Existence checks after a create before giving up (~15 minutes)
    pub const CREATE_MAX_ATTEMPTS: u32 = 900;

    /// Absence checks after a delete before giving up
    pub const DELETE_MAX_ATTEMPTS: u32 = 30;

    /// Attempt index after which create polling warns on every iteration
    pub const CREATE_ESCALATE_AFTER: u32 = 30;

    /// License authorization code written to `/license/authcodes`
    pub const LICENSE_AUTH_CODE: &str = "I7517916";

    /// Lifetime of the device registration token, in days
    pub const AUTH_KEY_VALIDITY_DAYS: u32 = 8760;

    /// Description set on device groups created by the manager
    pub const DEVICE_GROUP_DESCRIPTION: &str = "OSC Device group - do not remove";
}

/// Contents and token settings for bootstrap packages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub license_auth_code: String,
    pub auth_key_validity_days: u32,
    /// `init-cfg.txt` template; see [`templates::INIT_CFG`] for placeholders
    pub init_cfg_template: String,
    /// `bootstrap.xml` template; see [`templates::BOOTSTRAP_XML`] for placeholders
    pub bootstrap_xml_template: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            license_auth_code: defaults::LICENSE_AUTH_CODE.into(),
            auth_key_validity_days: defaults::AUTH_KEY_VALIDITY_DAYS,
            init_cfg_template: templates::INIT_CFG.into(),
            bootstrap_xml_template: templates::BOOTSTRAP_XML.into(),
        }
    }
}

/// Configuration for a device session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceApiConfig {
    /// Configuration path device groups are created under
    pub device_group_xpath: String,
    pub device_group_description: String,
    /// Polling after a create commit
    pub create_poll: PollPolicy,
    /// Polling after a delete commit
    pub delete_poll: PollPolicy,
    pub bootstrap: BootstrapConfig,
}

impl Default for DeviceApiConfig {
    fn default() -> Self {
        let interval = Duration::from_millis(defaults::POLL_INTERVAL_MS);
        Self {
            device_group_xpath: XPATH_DEVICE_GROUP_PREFIX.into(),
            device_group_description: defaults::DEVICE_GROUP_DESCRIPTION.into(),
            create_poll: PollPolicy::new(interval, defaults::CREATE_MAX_ATTEMPTS)
                .escalate_after(defaults::CREATE_ESCALATE_AFTER),
            delete_poll: PollPolicy::new(interval, defaults::DELETE_MAX_ATTEMPTS),
            bootstrap: BootstrapConfig::default(),
        }
    }
}

impl DeviceApiConfig {
    /// Default configuration with zero-delay polling of the given budgets
    pub fn immediate(create_attempts: u32, delete_attempts: u32) -> Self {
        Self {
            create_poll: PollPolicy::immediate(create_attempts)
                .escalate_after(defaults::CREATE_ESCALATE_AFTER),
            delete_poll: PollPolicy::immediate(delete_attempts),
            ..Default::default()
        }
    }
}

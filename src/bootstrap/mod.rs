//! Bootstrap packages for newly provisioned firewalls
//!
//! A package always holds the same five files:
//! ```text
//! /config/init-cfg.txt    init config pointing at Panorama and the device group
//! /config/bootstrap.xml   minimal running config
//! /license/authcodes      license authorization code
//! /content                empty: no content bundle
//! /software               empty: no software bundle
//! ```

pub mod templates;

use crate::config::BootstrapConfig;
use crate::error::DeviceError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use panorama_shared::xml::escape;
use std::collections::BTreeMap;
use tracing::{debug, error};

pub const INIT_CFG_PATH: &str = "/config/init-cfg.txt";
pub const BOOTSTRAP_XML_PATH: &str = "/config/bootstrap.xml";
pub const LICENSE_PATH: &str = "/license/authcodes";
pub const CONTENT_PATH: &str = "/content";
pub const SOFTWARE_PATH: &str = "/software";

/// Everything the builder needs to know about the target device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Display name of the firewall
    pub device_name: String,
    /// Address of the Panorama appliance
    pub appliance_address: String,
    /// Device group the firewall joins
    pub device_group: String,
}

/// Files a firewall reads on first boot, keyed by path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapPackage {
    files: BTreeMap<&'static str, Bytes>,
}

impl BootstrapPackage {
    pub fn get(&self, path: &str) -> Option<&Bytes> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Bytes)> {
        self.files.iter().map(|(path, data)| (*path, data))
    }

    /// File contents as standard base64, for orchestrators that carry files as text
    pub fn encoded(&self) -> BTreeMap<&'static str, String> {
        self.files
            .iter()
            .map(|(path, data)| (*path, STANDARD.encode(data)))
            .collect()
    }
}

/// Renders bootstrap packages for one session
#[derive(Debug, Clone)]
pub struct BootstrapBuilder {
    config: BootstrapConfig,
    auth_key: String,
}

impl BootstrapBuilder {
    /// `auth_key` is the registration token the session obtained from Panorama
    pub fn new(config: BootstrapConfig, auth_key: impl Into<String>) -> Self {
        Self {
            config,
            auth_key: auth_key.into(),
        }
    }

    /// Assemble all five files for `info`
    ///
    /// The package is all or nothing: every file is attempted, and if any of
    /// them fails the error lists each failure.
    pub fn build(&self, info: &DeviceInfo) -> Result<BootstrapPackage, DeviceError> {
        let entries = [
            (INIT_CFG_PATH, self.init_cfg(info)),
            (BOOTSTRAP_XML_PATH, self.bootstrap_xml(info)),
            (LICENSE_PATH, self.license()),
            (CONTENT_PATH, Ok(Bytes::new())),
            (SOFTWARE_PATH, Ok(Bytes::new())),
        ];

        let mut files = BTreeMap::new();
        let mut failures = Vec::new();
        for (path, entry) in entries {
            match entry {
                Ok(data) => {
                    files.insert(path, data);
                }
                Err(reason) => {
                    error!("Bootstrap file {} for {}: {}", path, info.device_name, reason);
                    failures.push(format!("{}: {}", path, reason));
                }
            }
        }

        if !failures.is_empty() {
            return Err(DeviceError::Bootstrap {
                device: info.device_name.clone(),
                failures,
            });
        }

        debug!(
            "Bootstrap package for {} in device group {}: {} files",
            info.device_name,
            info.device_group,
            files.len()
        );
        Ok(BootstrapPackage { files })
    }

    fn init_cfg(&self, info: &DeviceInfo) -> Result<Bytes, String> {
        let values = [
            ("device_name", info.device_name.as_str()),
            ("panorama_server", info.appliance_address.as_str()),
            ("device_group", info.device_group.as_str()),
            ("auth_key", self.auth_key.as_str()),
        ];
        // init-cfg is one key=value per line
        for (key, value) in &values {
            if value.contains(['\r', '\n']) {
                return Err(format!("line break in value for {{{}}}", key));
            }
        }
        templates::render(&self.config.init_cfg_template, &values).map(Bytes::from)
    }

    fn bootstrap_xml(&self, info: &DeviceInfo) -> Result<Bytes, String> {
        templates::render(
            &self.config.bootstrap_xml_template,
            &[
                ("device_name", escape(&info.device_name).as_str()),
                ("panorama_server", escape(&info.appliance_address).as_str()),
            ],
        )
        .map(Bytes::from)
    }

    fn license(&self) -> Result<Bytes, String> {
        if self.config.license_auth_code.is_empty() {
            return Err("no license authorization code configured".into());
        }
        Ok(Bytes::from(self.config.license_auth_code.clone()))
    }
}

//! In-memory Panorama for tests
//!
//! Answers with the same XML the appliance sends, so response parsing is
//! exercised along with the device manager logic.

use async_trait::async_trait;
use panorama_shared::xml::{self, ApiError, ApiResponse};
use panorama_shared::PanoramaApi;
use std::sync::{Mutex, MutexGuard};

/// A staged configuration change awaiting commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staged {
    Add(String),
    Remove(String),
}

#[derive(Debug, Default)]
pub struct MockState {
    /// Groups currently listed
    pub groups: Vec<String>,
    /// Committed groups not listed yet, with listings left before they appear
    pub propagating: Vec<(String, u32)>,
    pub staged: Vec<Staged>,
    /// Listings a committed group takes to appear
    pub visible_after: u32,
    /// Committed groups never appear
    pub never_visible: bool,
    /// Committed deletes never take effect
    pub never_removed: bool,
    pub fail_listing: bool,
    pub fail_commit: bool,
    pub fail_set: bool,
    pub fail_auth_key: bool,
    pub auth_key: String,
    pub list_calls: u32,
    pub set_calls: u32,
    pub delete_calls: u32,
    pub commit_calls: u32,
    pub auth_key_calls: u32,
    pub last_set: Option<(String, String)>,
    pub last_delete: Option<String>,
}

pub struct MockPanorama {
    state: Mutex<MockState>,
}

impl MockPanorama {
    pub fn new(groups: &[&str]) -> Self {
        Self {
            state: Mutex::new(MockState {
                groups: groups.iter().map(|g| g.to_string()).collect(),
                auth_key: "755036225328715".into(),
                ..Default::default()
            }),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Count of set/delete/commit calls
    pub fn mutations(&self) -> u32 {
        let state = self.state();
        state.set_calls + state.delete_calls + state.commit_calls
    }
}

fn rejected(message: &str) -> ApiError {
    ApiError::Rejected {
        code: None,
        message: message.into(),
    }
}

fn success() -> Result<ApiResponse, ApiError> {
    ApiResponse::parse(r#"<response status="success" code="20"><msg>command succeeded</msg></response>"#)
}

/// Value of the first `name="..."` attribute in `text`
fn quoted_name(text: &str) -> Option<String> {
    let start = text.find("name=\"")? + "name=\"".len();
    let len = text[start..].find('"')?;
    Some(text[start..start + len].to_string())
}

#[async_trait]
impl PanoramaApi for MockPanorama {
    async fn op(&self, cmd: &str) -> Result<ApiResponse, ApiError> {
        let mut state = self.state();

        if cmd.contains("<vm-auth-key>") {
            state.auth_key_calls += 1;
            if state.fail_auth_key {
                return Err(rejected("VM auth key generation failed"));
            }
            return ApiResponse::parse(format!(
                r#"<response status="success"><result>VM auth key {} generated. Expires at: 2027/10/16 10:00:00</result></response>"#,
                state.auth_key
            ));
        }

        if cmd != xml::SHOW_DEVICE_GROUPS_CMD {
            return Err(rejected("unknown command"));
        }

        state.list_calls += 1;
        if state.fail_listing {
            return Err(rejected("listing unavailable"));
        }

        let mut arrived = Vec::new();
        state.propagating.retain_mut(|(name, left)| {
            if *left == 0 {
                arrived.push(name.clone());
                false
            } else {
                *left -= 1;
                true
            }
        });
        state.groups.extend(arrived);

        let entries: String = state
            .groups
            .iter()
            .map(|g| {
                format!(
                    r#"<entry name="{}"><devices><entry name="0072000{}"/></devices></entry>"#,
                    g,
                    g.len()
                )
            })
            .collect();
        ApiResponse::parse(format!(
            r#"<response status="success"><result><devicegroups>{}</devicegroups></result></response>"#,
            entries
        ))
    }

    async fn set_config(&self, xpath: &str, element: &str) -> Result<ApiResponse, ApiError> {
        let mut state = self.state();
        state.set_calls += 1;
        state.last_set = Some((xpath.to_string(), element.to_string()));
        if state.fail_set {
            return Err(rejected("set failed"));
        }
        let name = quoted_name(element).ok_or_else(|| rejected("entry without name"))?;
        state.staged.push(Staged::Add(name));
        success()
    }

    async fn delete_config(&self, xpath: &str) -> Result<ApiResponse, ApiError> {
        let mut state = self.state();
        state.delete_calls += 1;
        state.last_delete = Some(xpath.to_string());
        let name = quoted_name(xpath).ok_or_else(|| rejected("xpath without name"))?;
        state.staged.push(Staged::Remove(name));
        success()
    }

    async fn commit(&self) -> Result<(), ApiError> {
        let mut state = self.state();
        state.commit_calls += 1;
        if state.fail_commit {
            state.staged.clear();
            return Err(ApiError::CommitFailed {
                job: 1,
                result: "FAIL".into(),
                details: "device-group is in use".into(),
            });
        }

        for change in std::mem::take(&mut state.staged) {
            match change {
                Staged::Add(name) if !state.never_visible => {
                    let after = state.visible_after;
                    state.propagating.push((name, after));
                }
                Staged::Remove(name) if !state.never_removed => {
                    state.groups.retain(|g| *g != name);
                }
                _ => {}
            }
        }
        Ok(())
    }

    async fn vm_auth_key(&self, validity_days: u32) -> Result<String, ApiError> {
        self.op(&xml::vm_auth_key_cmd(validity_days))
            .await?
            .vm_auth_key()
    }
}

//! Panorama XML API request builders and response parsing
//!
//! Every reply from the XML API is wrapped as:
//! ```text
//! <response status="success|error" [code="N"]> ... </response>
//! ```
//!
//! [`ApiResponse::parse`] validates that envelope once; the accessors on
//! [`ApiResponse`] then pull out the pieces each call site cares about.

use roxmltree::{Document, Node};
use thiserror::Error;

/// Configuration path under which device groups live on Panorama
pub const XPATH_DEVICE_GROUP_PREFIX: &str =
    "/config/devices/entry[@name='localhost.localdomain']/device-group";

/// Operational command listing all device groups
pub const SHOW_DEVICE_GROUPS_CMD: &str = "<show><devicegroups></devicegroups></show>";

/// Commit command for staged configuration
pub const COMMIT_CMD: &str = "<commit></commit>";

/// Errors raised at the Panorama API boundary
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server replied with HTTP status {0}")]
    Status(u16),

    #[error("malformed XML response: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("unexpected response: {0}")]
    Malformed(String),

    #[error("request rejected: {message}")]
    Rejected { code: Option<u32>, message: String },

    #[error("commit job {job} finished with {result}: {details}")]
    CommitFailed {
        job: u64,
        result: String,
        details: String,
    },

    #[error("commit job {job} still running after {polls} polls")]
    CommitTimeout { job: u64, polls: u32 },
}

/// A successful API response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Optional `code` attribute of the response element
    pub code: Option<u32>,
    message: Option<String>,
    body: String,
}

/// State of an asynchronous job, as reported by `<show><jobs>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub id: u64,
    /// `ACT`, `PEND` or `FIN`
    pub status: String,
    /// `OK`, `FAIL` or `PEND` while still running
    pub result: String,
    pub progress: Option<String>,
    pub details: Option<String>,
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        self.status == "FIN"
    }

    pub fn succeeded(&self) -> bool {
        self.result == "OK"
    }
}

impl ApiResponse {
    /// Parse a raw response body, rejecting anything whose status is not `success`
    pub fn parse(body: impl Into<String>) -> Result<Self, ApiError> {
        let body = body.into();

        let (status, code, message) = {
            let doc = Document::parse(&body)?;
            let root = doc.root_element();
            if !root.has_tag_name("response") {
                return Err(ApiError::Malformed(format!(
                    "expected <response>, got <{}>",
                    root.tag_name().name()
                )));
            }
            let status = root.attribute("status").unwrap_or_default().to_string();
            let code = root.attribute("code").and_then(|c| c.trim().parse().ok());
            (status, code, collect_messages(root))
        };

        if status != "success" {
            return Err(ApiError::Rejected {
                code,
                message: message.unwrap_or_else(|| format!("response status {:?}", status)),
            });
        }

        Ok(Self {
            code,
            message,
            body,
        })
    }

    /// Human-readable message lines carried by the response, if any
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Raw XML body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Names of the device groups in a `<show><devicegroups>` reply
    ///
    /// Only direct `entry` children of `devicegroups` are groups; the member
    /// devices nested below them are ignored. A reply without a
    /// `devicegroups` element lists no groups.
    pub fn device_groups(&self) -> Result<Vec<String>, ApiError> {
        let doc = Document::parse(&self.body)?;
        let Some(groups) = doc
            .descendants()
            .find(|n| n.has_tag_name("devicegroups"))
        else {
            return Ok(Vec::new());
        };

        Ok(groups
            .children()
            .filter(|n| n.has_tag_name("entry"))
            .filter_map(|n| n.attribute("name"))
            .map(str::to_string)
            .collect())
    }

    /// Job id enqueued by a commit, or `None` when there was nothing to commit
    pub fn job_id(&self) -> Result<Option<u64>, ApiError> {
        let doc = Document::parse(&self.body)?;
        let Some(job) = child(doc.root_element(), "result").and_then(|r| child(r, "job")) else {
            return Ok(None);
        };

        if job.children().any(|n| n.is_element()) {
            return Ok(None);
        }

        let text = job.text().unwrap_or_default().trim();
        text.parse()
            .map(Some)
            .map_err(|_| ApiError::Malformed(format!("invalid job id {:?}", text)))
    }

    /// Job state from a `<show><jobs><id>N</id></jobs></show>` reply
    pub fn job_status(&self) -> Result<Option<JobStatus>, ApiError> {
        let doc = Document::parse(&self.body)?;
        let Some(job) = child(doc.root_element(), "result").and_then(|r| child(r, "job")) else {
            return Ok(None);
        };

        let field = |name: &str| child(job, name).map(text_of).filter(|t| !t.is_empty());

        let id: u64 = field("id")
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| ApiError::Malformed("job status without id".into()))?;

        Ok(Some(JobStatus {
            id,
            status: field("status").unwrap_or_default(),
            result: field("result").unwrap_or_default(),
            progress: field("progress"),
            details: child(job, "details").and_then(lines_of),
        }))
    }

    /// Registration token from a `<request><bootstrap><vm-auth-key>` reply
    ///
    /// The result text reads `VM auth key <TOKEN> generated. Expires at: ...`.
    pub fn vm_auth_key(&self) -> Result<String, ApiError> {
        const MARKER: &str = "VM auth key ";

        let doc = Document::parse(&self.body)?;
        let text = child(doc.root_element(), "result")
            .map(text_of)
            .unwrap_or_default();

        text.find(MARKER)
            .map(|at| &text[at + MARKER.len()..])
            .and_then(|rest| rest.split_whitespace().next())
            .map(str::to_string)
            .ok_or_else(|| ApiError::Malformed(format!("no VM auth key in {:?}", text)))
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

/// Concatenated text of a node and all its descendants, trimmed
fn text_of(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Leaf `line` texts below `node`, joined; falls back to the node's own text
fn lines_of(node: Node) -> Option<String> {
    let lines: Vec<String> = node
        .descendants()
        .filter(|n| n.has_tag_name("line"))
        .filter(|n| !n.children().any(|c| c.is_element()))
        .map(text_of)
        .filter(|t| !t.is_empty())
        .collect();

    if !lines.is_empty() {
        return Some(lines.join(" "));
    }

    let text = text_of(node);
    (!text.is_empty()).then_some(text)
}

fn collect_messages(root: Node) -> Option<String> {
    let messages: Vec<String> = root
        .descendants()
        .filter(|n| n.has_tag_name("msg"))
        .filter_map(lines_of)
        .collect();

    (!messages.is_empty()).then(|| messages.join(" "))
}

/// Escape text for use inside an XML attribute or element
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build an `<entry name="...">` element with optional description and inner XML
pub fn entry_element(name: &str, description: Option<&str>, inner: Option<&str>) -> String {
    let mut element = format!("<entry name=\"{}\">", escape(name));
    if let Some(description) = description {
        element.push_str(&format!("<description>{}</description>", escape(description)));
    }
    if let Some(inner) = inner {
        element.push_str(inner);
    }
    element.push_str("</entry>");
    element
}

/// XPath of a named entry below `prefix`
///
/// XPath string literals have no escapes, so the name is quoted with
/// whichever quote it does not contain. `None` if it contains both.
pub fn entry_xpath(prefix: &str, name: &str) -> Option<String> {
    let quote = match (name.contains('"'), name.contains('\'')) {
        (false, _) => '"',
        (true, false) => '\'',
        (true, true) => return None,
    };
    Some(format!("{}/entry[ @name={q}{}{q} ]", prefix, name, q = quote))
}

/// Operational command reporting a single job
pub fn show_job_cmd(job: u64) -> String {
    format!("<show><jobs><id>{}</id></jobs></show>", job)
}

/// Operational command generating a VM auth key valid for `days`
pub fn vm_auth_key_cmd(days: u32) -> String {
    format!(
        "<request><bootstrap><vm-auth-key><generate><lifetime>{}</lifetime></generate></vm-auth-key></bootstrap></request>",
        days
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_rejected() {
        let body = r#"<response status="error" code="403"><result><msg>Invalid credentials.</msg></result></response>"#;
        match ApiResponse::parse(body) {
            Err(ApiError::Rejected { code, message }) => {
                assert_eq!(code, Some(403));
                assert_eq!(message, "Invalid credentials.");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_error_lines_joined() {
        let body = r#"<response status="error"><msg><line><![CDATA[ device-group -> dg1 is invalid]]></line><line>commit failed</line></msg></response>"#;
        let err = ApiResponse::parse(body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "request rejected: device-group -> dg1 is invalid commit failed"
        );
    }

    #[test]
    fn test_non_response_root() {
        let result = ApiResponse::parse("<html><body>login</body></html>");
        assert!(matches!(result, Err(ApiError::Malformed(_))));
    }

    #[test]
    fn test_device_groups_ignores_nested_entries() {
        let body = r#"
            <response status="success">
              <result>
                <devicegroups>
                  <entry name="vss-A">
                    <devices>
                      <entry name="007200001234"><hostname>fw1</hostname></entry>
                    </devices>
                  </entry>
                  <entry name="vss-B"/>
                </devicegroups>
              </result>
            </response>"#;
        let response = ApiResponse::parse(body).expect("parse failed");
        assert_eq!(response.device_groups().unwrap(), vec!["vss-A", "vss-B"]);
    }

    #[test]
    fn test_device_groups_missing_element() {
        let response = ApiResponse::parse(r#"<response status="success"><result/></response>"#)
            .expect("parse failed");
        assert!(response.device_groups().unwrap().is_empty());
    }

    #[test]
    fn test_commit_job_id() {
        let body = r#"<response status="success" code="19"><result><msg><line>Commit job enqueued with jobid 7</line></msg><job>7</job></result></response>"#;
        let response = ApiResponse::parse(body).unwrap();
        assert_eq!(response.job_id().unwrap(), Some(7));
        assert_eq!(response.message(), Some("Commit job enqueued with jobid 7"));

        let nothing = ApiResponse::parse(
            r#"<response status="success" code="19"><msg>There are no changes to commit.</msg></response>"#,
        )
        .unwrap();
        assert_eq!(nothing.job_id().unwrap(), None);
    }

    #[test]
    fn test_job_status() {
        let body = r#"<response status="success"><result><job>
            <id>7</id><type>Commit</type><status>FIN</status><result>FAIL</result>
            <progress>100</progress>
            <details><line>Validation Error: dg1 is in use</line></details>
        </job></result></response>"#;
        let status = ApiResponse::parse(body).unwrap().job_status().unwrap().unwrap();
        assert_eq!(status.id, 7);
        assert!(status.is_finished());
        assert!(!status.succeeded());
        assert_eq!(status.details.as_deref(), Some("Validation Error: dg1 is in use"));
    }

    #[test]
    fn test_vm_auth_key() {
        let body = r#"<response status="success"><result>VM auth key 755036225328715 generated. Expires at: 2027/10/16 10:00:00</result></response>"#;
        let key = ApiResponse::parse(body).unwrap().vm_auth_key().unwrap();
        assert_eq!(key, "755036225328715");

        let missing = ApiResponse::parse(r#"<response status="success"><result/></response>"#).unwrap();
        assert!(matches!(missing.vm_auth_key(), Err(ApiError::Malformed(_))));
    }

    #[test]
    fn test_entry_builders() {
        assert_eq!(
            entry_element("vss-A", Some("a & b"), Some("<devices/>")),
            r#"<entry name="vss-A"><description>a &amp; b</description><devices/></entry>"#
        );
        assert_eq!(
            entry_xpath(XPATH_DEVICE_GROUP_PREFIX, "vss-A").as_deref(),
            Some("/config/devices/entry[@name='localhost.localdomain']/device-group/entry[ @name=\"vss-A\" ]")
        );
    }

    #[test]
    fn test_entry_xpath_quotes_name() {
        assert_eq!(
            entry_xpath("/dg", r#"vss "A""#).as_deref(),
            Some(r#"/dg/entry[ @name='vss "A"' ]"#)
        );
        assert_eq!(
            entry_xpath("/dg", "vss's").as_deref(),
            Some(r#"/dg/entry[ @name="vss's" ]"#)
        );
        assert_eq!(entry_xpath("/dg", r#"a"b'c"#), None);
    }
}

//! Bootstrap file templates
//!
//! Templates use `{name}` placeholders. Rendering fails on a placeholder with
//! no value or an empty value, so a package is never built with holes in it.
//! Braces that do not enclose an identifier are copied through unchanged.

/// `init-cfg.txt` for a firewall managed by Panorama
///
/// Placeholders: `device_name`, `panorama_server`, `device_group`, `auth_key`.
pub const INIT_CFG: &str = "\
type=dhcp-client
hostname={device_name}
panorama-server={panorama_server}
dgname={device_group}
vm-auth-key={auth_key}
dhcp-send-hostname=yes
dhcp-send-client-id=yes
dhcp-accept-server-hostname=yes
dhcp-accept-server-domain=yes
";

/// Minimal `bootstrap.xml` pointing the firewall at Panorama
///
/// Placeholders: `device_name`, `panorama_server`.
pub const BOOTSTRAP_XML: &str = r#"<?xml version="1.0"?>
<config version="8.0.0" urldb="paloaltonetworks">
  <devices>
    <entry name="localhost.localdomain">
      <deviceconfig>
        <system>
          <hostname>{device_name}</hostname>
          <panorama-server>{panorama_server}</panorama-server>
        </system>
      </deviceconfig>
    </entry>
  </devices>
</config>
"#;

/// Substitute `{key}` placeholders in `template`
pub fn render(template: &str, values: &[(&str, &str)]) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let key_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let key = &after[..key_len];

        if key.is_empty() || !after[key_len..].starts_with('}') {
            out.push('{');
            rest = after;
            continue;
        }

        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) if !value.is_empty() => out.push_str(value),
            Some(_) => return Err(format!("empty value for {{{}}}", key)),
            None => return Err(format!("no value for {{{}}}", key)),
        }
        rest = &after[key_len + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

//! Binary URL templates
//!
//! `bin` entries use Go template placeholders: `{{.Version}}`, `{{.OS}}`,
//! `{{.Arch}}` and `{{.BinSuffix}}`. Whitespace inside the braces is allowed.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{AkamaiError, Result};
use crate::host;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\{\{\s*\.(\w+)\s*\}\}").unwrap()
});

/// Platform values substituted into a binary URL template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryTarget {
    pub os: String,
    pub arch: String,
    pub bin_suffix: String,
}

impl BinaryTarget {
    /// The platform this process runs on
    #[must_use]
    pub fn host() -> Self {
        Self {
            os: host::os_name().to_string(),
            arch: host::arch_name().to_string(),
            bin_suffix: host::binary_suffix().to_string(),
        }
    }
}

/// Render a `bin` template for `version` on `target`
pub fn render_bin_template(template: &str, version: &str, target: &BinaryTarget) -> Result<String> {
    let mut unknown = None;

    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        match &caps[1] {
            "Version" => version.to_string(),
            "OS" => target.os.clone(),
            "Arch" => target.arch.clone(),
            "BinSuffix" => target.bin_suffix.clone(),
            other => {
                unknown.get_or_insert_with(|| other.to_string());
                String::new()
            }
        }
    });

    if let Some(field) = unknown {
        return Err(AkamaiError::ManifestInvalid {
            path: template.to_string(),
            reason: format!("unknown placeholder .{field} in bin template"),
        });
    }

    Ok(rendered.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux() -> BinaryTarget {
        BinaryTarget {
            os: "linux".to_string(),
            arch: "amd64".to_string(),
            bin_suffix: String::new(),
        }
    }

    #[test]
    fn test_render_all_placeholders() {
        let url = render_bin_template(
            "https://example.com/releases/{{.Version}}/akamai-purge-{{.Version}}-{{.OS}}{{.Arch}}{{.BinSuffix}}",
            "1.2.0",
            &linux(),
        )
        .unwrap();
        assert_eq!(
            url,
            "https://example.com/releases/1.2.0/akamai-purge-1.2.0-linuxamd64"
        );
    }

    #[test]
    fn test_render_windows_suffix_and_spaces() {
        let target = BinaryTarget {
            os: "windows".to_string(),
            arch: "386".to_string(),
            bin_suffix: ".exe".to_string(),
        };
        let url = render_bin_template("x-{{ .OS }}-{{.Arch}}{{ .BinSuffix }}", "1", &target).unwrap();
        assert_eq!(url, "x-windows-386.exe");
    }

    #[test]
    fn test_render_unknown_placeholder() {
        let err = render_bin_template("x-{{.Flavor}}", "1", &linux()).unwrap_err();
        assert!(matches!(err, AkamaiError::ManifestInvalid { .. }));
    }
}

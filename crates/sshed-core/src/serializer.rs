use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{ConfigError, Result};
use crate::host::HostCollection;
use crate::validate::check_record;

const INDENT: &str = "    ";

/// Render hosts back to the OpenSSH config dialect.
///
/// Each block is `Host <name>`, one indented line per option, then a blank line.
pub fn stringify(hosts: &HostCollection) -> String {
    let mut out = String::new();

    for host in hosts {
        out.push_str(&format!("Host {}\n", host.name));
        for (key, value) in host.options.iter() {
            out.push_str(&format!("{INDENT}{key} {value}\n"));
        }
        out.push('\n');
    }

    out
}

/// Output dialects understood by [`export`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// The OpenSSH config dialect itself.
    #[default]
    Native,
    /// Lossless JSON dump, accepted by [`import`].
    Structured,
    /// YAML mapping per host. Informational only; there is no importer.
    Simplified,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Structured => "structured",
            Self::Simplified => "simplified",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" | "ssh" => Ok(Self::Native),
            "structured" | "json" => Ok(Self::Structured),
            "simplified" | "yaml" | "yml" => Ok(Self::Simplified),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

pub fn export(hosts: &HostCollection, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Native => Ok(stringify(hosts)),
        ExportFormat::Structured => {
            let mut json = serde_json::to_string_pretty(hosts)
                .map_err(|e| ConfigError::Encode(e.to_string()))?;
            json.push('\n');
            Ok(json)
        }
        ExportFormat::Simplified => {
            serde_yaml::to_string(&Simplified(hosts))
                .map_err(|e| ConfigError::Encode(e.to_string()))
        }
    }
}

/// `name -> { key -> value }`, host order kept. Later duplicates of a name
/// are skipped since a YAML mapping key can only appear once.
struct Simplified<'a>(&'a HostCollection);

impl Serialize for Simplified<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seen = HashSet::new();
        let mut map = serializer.serialize_map(None)?;
        for host in self.0 {
            if seen.insert(host.name.as_str()) {
                map.serialize_entry(&host.name, &host.options)?;
            }
        }
        map.end()
    }
}

/// Decode a structured (JSON) dump produced by [`export`].
///
/// Fails with [`ConfigError::Decode`] when the text is not JSON, with
/// [`ConfigError::Shape`] when it is JSON but not a list of records that can
/// be written back as config text, and with [`ConfigError::Duplicate`] when a
/// name appears twice.
pub fn import(text: &str) -> Result<HostCollection> {
    serde_json::from_str::<serde_json::Value>(text).map_err(ConfigError::Decode)?;

    // Decoded a second time straight into records so option order survives.
    let hosts: HostCollection =
        serde_json::from_str(text).map_err(|e| ConfigError::Shape(e.to_string()))?;

    let mut seen = HashSet::new();
    for host in &hosts {
        check_record(host).map_err(ConfigError::Shape)?;
        if !seen.insert(host.name.as_str()) {
            return Err(ConfigError::Duplicate(host.name.clone()));
        }
    }

    Ok(hosts)
}

//! Per-switch configuration file parsing
//!
//! A switch is configured by a plain text file, `switch<ID>.cfg`:
//!
//! ```text
//! 100
//! r-0 T
//! r-1 T
//! rr-0-1 10
//! rr-0-2 20
//! ```
//!
//! The first line is the bridge priority. Each following line names an
//! interface and either `T` (trunk) or the VLAN id of an access port.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::{Error, PortKind, Result};

/// Parsed contents of a `switch<ID>.cfg` file.
#[derive(Debug, Clone)]
pub struct SwitchConfig {
    /// Bridge priority; doubles as the bridge id in root election
    pub priority: u32,
    /// Interface assignments in file order
    pub interfaces: Vec<(String, PortKind)>,
}

impl SwitchConfig {
    /// Parse a configuration from its text form.
    pub fn parse_str(text: &str) -> Result<Self> {
        let mut lines = text.lines();

        let priority = lines
            .next()
            .ok_or_else(|| Error::config("empty configuration file"))?
            .trim()
            .parse::<u32>()
            .map_err(|e| Error::config(format!("invalid priority line: {}", e)))?;

        let mut interfaces = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut parts = line.split_whitespace();
            let name = parts
                .next()
                .ok_or_else(|| Error::config(format!("malformed line: {:?}", line)))?;
            let token = parts
                .next()
                .ok_or_else(|| Error::config(format!("missing VLAN or 'T' for {}", name)))?;

            if !seen.insert(name) {
                return Err(Error::config(format!("duplicate interface {}", name)));
            }

            let kind = if token == "T" {
                PortKind::Trunk
            } else {
                let vlan = token
                    .parse::<u16>()
                    .map_err(|_| Error::config(format!("invalid VLAN id {:?} for {}", token, name)))?;
                PortKind::Access { vlan }
            };

            interfaces.push((name.to_string(), kind));
        }

        if interfaces.is_empty() {
            return Err(Error::config("no interfaces configured"));
        }

        Ok(Self {
            priority,
            interfaces,
        })
    }

    /// Load `switch<ID>.cfg` from a configuration directory.
    pub fn load(config_dir: &Path, switch_id: &str) -> Result<Self> {
        let path = config_dir.join(format!("switch{}.cfg", switch_id));
        let text = fs::read_to_string(&path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse_str(&text)
    }

    /// Kind configured for an interface name, if any.
    pub fn kind_for(&self, name: &str) -> Option<PortKind> {
        self.interfaces
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, k)| *k)
    }
}

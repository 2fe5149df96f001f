//! CAM table: learned MAC-to-port bindings

use std::collections::HashMap;

use softswitch_core::{MacAddr, PortId};
use tracing::trace;

/// Learned mapping from source MAC to the port it was last seen on.
///
/// Entries never age out and the table is unbounded; the last writer wins.
/// A stale entry is only ever corrected by seeing the MAC again elsewhere.
#[derive(Debug, Default)]
pub struct CamTable {
    entries: HashMap<MacAddr, PortId>,
}

impl CamTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or move) a MAC behind a port.
    pub fn learn(&mut self, mac: MacAddr, port: PortId) {
        if self.entries.insert(mac, port) != Some(port) {
            trace!("learned {} on port {}", mac, port);
        }
    }

    /// Port a MAC was last seen on, if any.
    pub fn lookup(&self, mac: &MacAddr) -> Option<PortId> {
        self.entries.get(mac).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learn_and_lookup() {
        let mut cam = CamTable::new();
        let mac = MacAddr([0, 1, 2, 3, 4, 5]);

        assert_eq!(cam.lookup(&mac), None);
        cam.learn(mac, 3);
        assert_eq!(cam.lookup(&mac), Some(3));
    }

    #[test]
    fn test_last_writer_wins() {
        let mut cam = CamTable::new();
        let mac = MacAddr([0, 1, 2, 3, 4, 5]);

        cam.learn(mac, 1);
        cam.learn(mac, 2);
        assert_eq!(cam.lookup(&mac), Some(2));
        assert_eq!(cam.len(), 1);
    }
}

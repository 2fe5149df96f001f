//! Test doubles shared by the engine tests

use parking_lot::Mutex;
use softswitch_core::{Error, LinkIo, MacAddr, PortId, Result};
use std::collections::VecDeque;

/// Recording [`LinkIo`]: sends accumulate, receives come from a script.
pub struct MockLink {
    mac: MacAddr,
    names: Vec<String>,
    sends: Mutex<Vec<(PortId, Vec<u8>)>>,
    rx_queue: Mutex<VecDeque<(PortId, Vec<u8>)>>,
}

impl MockLink {
    pub fn new(num_ports: usize) -> Self {
        Self {
            mac: MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]),
            names: (0..num_ports).map(|i| format!("port{}", i)).collect(),
            sends: Mutex::new(Vec::new()),
            rx_queue: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_mac(mut self, mac: MacAddr) -> Self {
        self.mac = mac;
        self
    }

    /// Queue a frame for a later `receive()` call.
    pub fn push_rx(&self, port: PortId, frame: Vec<u8>) {
        self.rx_queue.lock().push_back((port, frame));
    }

    /// Everything sent so far, in order.
    pub fn sends(&self) -> Vec<(PortId, Vec<u8>)> {
        self.sends.lock().clone()
    }

    /// Drain the recorded sends.
    pub fn take_sends(&self) -> Vec<(PortId, Vec<u8>)> {
        std::mem::take(&mut *self.sends.lock())
    }
}

impl LinkIo for MockLink {
    fn receive(&self) -> Result<(PortId, Vec<u8>)> {
        self.rx_queue
            .lock()
            .pop_front()
            .ok_or_else(|| Error::link("rx script exhausted"))
    }

    fn send(&self, port: PortId, frame: &[u8]) -> Result<()> {
        self.sends.lock().push((port, frame.to_vec()));
        Ok(())
    }

    fn local_mac(&self) -> MacAddr {
        self.mac
    }

    fn interface_name(&self, port: PortId) -> Option<&str> {
        self.names.get(port).map(String::as_str)
    }

    fn num_ports(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_records_sends_and_replays_rx_script() {
        let mac = MacAddr([0x02, 0, 0, 0, 0, 0x42]);
        let link = MockLink::new(2).with_mac(mac);
        assert_eq!(link.local_mac(), mac);
        assert_eq!(link.num_ports(), 2);
        assert_eq!(link.interface_name(1), Some("port1"));

        link.push_rx(0, vec![1, 2, 3]);
        assert_eq!(link.receive().unwrap(), (0, vec![1, 2, 3]));
        assert!(link.receive().is_err());

        link.send(1, &[9]).unwrap();
        assert_eq!(link.take_sends(), vec![(1, vec![9])]);
        assert!(link.sends().is_empty());
    }
}

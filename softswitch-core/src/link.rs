//! Link I/O: numbered-port frame receive/transmit
//!
//! The switching engine talks to the wire through the [`LinkIo`] trait so
//! tests can substitute a recording mock. The production implementation,
//! [`DataLinkPorts`], opens one `pnet_datalink` Ethernet channel per named
//! interface and pumps received frames from per-port threads into a single
//! queue, so `receive()` yields the next frame from any port.

use parking_lot::Mutex;
use pnet_datalink::{self, Channel, DataLinkSender};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, error, info};

use crate::{Error, MacAddr, PortId, Result};

/// Frame I/O on a set of numbered ports.
///
/// `receive` blocks the calling thread until the next frame arrives on any
/// port; `send` is best-effort per port. Port ids are dense, `0..num_ports()`.
pub trait LinkIo {
    /// Block until the next frame arrives on any port
    fn receive(&self) -> Result<(PortId, Vec<u8>)>;

    /// Transmit a frame on one port
    fn send(&self, port: PortId, frame: &[u8]) -> Result<()>;

    /// MAC address the switch uses as its own (BPDU source)
    fn local_mac(&self) -> MacAddr;

    /// OS-level name of a port, if it exists
    fn interface_name(&self, port: PortId) -> Option<&str>;

    /// Number of attached ports
    fn num_ports(&self) -> usize;
}

struct PortChannel {
    name: String,
    mac: MacAddr,
    tx: Mutex<Box<dyn DataLinkSender>>,
}

/// `pnet_datalink`-backed [`LinkIo`] over a list of OS interfaces.
///
/// Interface order defines port numbering: the first name becomes port 0.
pub struct DataLinkPorts {
    ports: Vec<PortChannel>,
    rx: Mutex<mpsc::Receiver<(PortId, Vec<u8>)>>,
}

impl DataLinkPorts {
    /// Open every named interface and start its receive pump.
    pub fn open(names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::link("no interfaces given"));
        }

        let (queue_tx, queue_rx) = mpsc::channel();
        let mut ports = Vec::with_capacity(names.len());

        for (id, name) in names.iter().enumerate() {
            let interfaces = pnet_datalink::interfaces();
            let interface = interfaces
                .into_iter()
                .find(|iface| iface.name == *name)
                .ok_or_else(|| Error::InterfaceNotFound(name.clone()))?;

            let mac = if let Some(mac) = interface.mac {
                MacAddr([mac.0, mac.1, mac.2, mac.3, mac.4, mac.5])
            } else {
                MacAddr::zero()
            };

            let (tx, mut rx) = match pnet_datalink::channel(&interface, Default::default()) {
                Ok(Channel::Ethernet(tx, rx)) => (tx, rx),
                Ok(_) => return Err(Error::link("unsupported channel type")),
                Err(e) => {
                    return Err(Error::link(format!(
                        "failed to open channel on {}: {}",
                        name, e
                    )))
                }
            };

            let queue = queue_tx.clone();
            let pump_name = name.clone();
            thread::spawn(move || loop {
                match rx.next() {
                    Ok(frame) => {
                        if queue.send((id, frame.to_vec())).is_err() {
                            debug!("receive queue closed, stopping pump for {}", pump_name);
                            break;
                        }
                    }
                    Err(e) => {
                        error!("receive error on {}: {}", pump_name, e);
                        break;
                    }
                }
            });

            info!("port {}: {} ({})", id, name, mac);
            ports.push(PortChannel {
                name: name.clone(),
                mac,
                tx: Mutex::new(tx),
            });
        }

        Ok(Self {
            ports,
            rx: Mutex::new(queue_rx),
        })
    }
}

impl LinkIo for DataLinkPorts {
    fn receive(&self) -> Result<(PortId, Vec<u8>)> {
        self.rx
            .lock()
            .recv()
            .map_err(|_| Error::link("all receive pumps stopped"))
    }

    fn send(&self, port: PortId, frame: &[u8]) -> Result<()> {
        let channel = self
            .ports
            .get(port)
            .ok_or(Error::UnknownDestinationPort(port))?;

        channel
            .tx
            .lock()
            .send_to(frame, None)
            .ok_or_else(|| Error::link(format!("send on port {} failed", port)))?
            .map_err(|e| Error::link(format!("send on port {}: {}", port, e)))?;

        Ok(())
    }

    fn local_mac(&self) -> MacAddr {
        self.ports[0].mac
    }

    fn interface_name(&self, port: PortId) -> Option<&str> {
        self.ports.get(port).map(|p| p.name.as_str())
    }

    fn num_ports(&self) -> usize {
        self.ports.len()
    }
}

/// List the datalink interfaces visible to the process.
pub fn available_interfaces() -> Vec<(String, MacAddr)> {
    pnet_datalink::interfaces()
        .into_iter()
        .map(|iface| {
            let mac = iface
                .mac
                .map(|m| MacAddr([m.0, m.1, m.2, m.3, m.4, m.5]))
                .unwrap_or_else(MacAddr::zero);
            (iface.name, mac)
        })
        .collect()
}

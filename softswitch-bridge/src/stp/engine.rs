//! STP state machine: root election and trunk port transitions

use softswitch_core::{LinkIo, PortId};
use tracing::{debug, info, warn};

use super::constants::PATH_COST_INCREMENT;
use super::packet::Bpdu;
use crate::port::{PortTable, StpState};

/// Bridge-level spanning tree state.
///
/// `own_bridge_id` is fixed at construction. `root_bridge_id` starts equal
/// to it and only ever decreases as better roots are learned, so a bridge
/// that has stepped down never silently becomes root again. `root_port` is
/// `None` exactly while this bridge is root.
#[derive(Debug)]
pub struct StpEngine {
    own_bridge_id: u32,
    root_bridge_id: u32,
    root_path_cost: u32,
    root_port: Option<PortId>,
}

impl StpEngine {
    /// Seed the election: the bridge only knows itself, so it claims root
    /// and opens every trunk port.
    pub fn new(priority: u32, ports: &mut PortTable) -> Self {
        ports.set_all_trunks(StpState::Blocking);

        let engine = Self {
            own_bridge_id: priority,
            root_bridge_id: priority,
            root_path_cost: 0,
            root_port: None,
        };

        if engine.is_root() {
            ports.set_all_trunks(StpState::Listening);
        }

        info!("bridge {} starts as root", engine.own_bridge_id);
        engine
    }

    pub fn is_root(&self) -> bool {
        self.own_bridge_id == self.root_bridge_id
    }

    pub fn own_bridge_id(&self) -> u32 {
        self.own_bridge_id
    }

    pub fn root_bridge_id(&self) -> u32 {
        self.root_bridge_id
    }

    pub fn root_path_cost(&self) -> u32 {
        self.root_path_cost
    }

    pub fn root_port(&self) -> Option<PortId> {
        self.root_port
    }

    /// Periodic hello: only the root originates BPDUs.
    ///
    /// The claim goes out every trunk port, root port included; non-root
    /// bridges stay silent and only relay inside [`process_bpdu`].
    ///
    /// [`process_bpdu`]: Self::process_bpdu
    pub fn hello<L: LinkIo>(&self, ports: &PortTable, link: &L) {
        if !self.is_root() {
            return;
        }

        let bpdu = Bpdu::new(self.own_bridge_id, self.own_bridge_id, 0);
        let frame = bpdu.build(link.local_mac());

        for id in ports.trunk_ids() {
            if let Err(e) = link.send(id, &frame) {
                warn!("hello on port {} failed: {}", id, e);
            }
        }
    }

    /// Feed one received BPDU through the election.
    pub fn process_bpdu<L: LinkIo>(
        &mut self,
        bpdu: &Bpdu,
        ingress: PortId,
        ports: &mut PortTable,
        link: &L,
    ) {
        let was_root = self.is_root();

        if bpdu.root_bridge_id < self.root_bridge_id {
            self.root_bridge_id = bpdu.root_bridge_id;
            self.root_path_cost = bpdu.root_path_cost + PATH_COST_INCREMENT;
            self.root_port = Some(ingress);
            info!(
                "adopted root {} via port {}, cost {}",
                self.root_bridge_id, ingress, self.root_path_cost
            );

            if was_root {
                // stepping down: stop forwarding everywhere but towards the
                // new root until the topology settles
                let trunks: Vec<PortId> = ports.trunk_ids().collect();
                for id in trunks {
                    if id != ingress {
                        ports.set_stp_state(id, StpState::Blocking);
                    }
                }
            }

            if ports.stp_state(ingress) == Some(StpState::Blocking) {
                ports.set_stp_state(ingress, StpState::Listening);
            }

            // relay the adopted root on every other trunk port
            let relay = Bpdu::new(self.own_bridge_id, self.root_bridge_id, self.root_path_cost);
            let frame = relay.build(link.local_mac());
            let trunks: Vec<PortId> = ports.trunk_ids().collect();
            for id in trunks {
                if id != ingress {
                    if let Err(e) = link.send(id, &frame) {
                        warn!("relay on port {} failed: {}", id, e);
                    }
                }
            }
        } else if bpdu.root_bridge_id == self.root_bridge_id {
            if self.root_port == Some(ingress)
                && bpdu.root_path_cost + PATH_COST_INCREMENT < self.root_path_cost
            {
                // the path through the root port got cheaper
                self.root_path_cost = bpdu.root_path_cost + PATH_COST_INCREMENT;
                debug!("root path cost lowered to {}", self.root_path_cost);
            } else if self.root_port != Some(ingress)
                && bpdu.root_path_cost > self.root_path_cost
                && ports.stp_state(ingress) == Some(StpState::Blocking)
            {
                // the neighbor on this segment is farther from the root
                // than we are; the port may leave the blocked state
                ports.set_stp_state(ingress, StpState::Listening);
            }
        } else if bpdu.sender_bridge_id == self.own_bridge_id {
            // our own advertisement came back: that segment is a loop
            ports.set_stp_state(ingress, StpState::Blocking);
        }
        // anything else advertises a worse root and is dropped

        if self.is_root() {
            ports.set_all_trunks(StpState::Listening);
        }
    }
}

//! Port registry: per-port administrative metadata and trunk STP state

use softswitch_core::{Error, LinkIo, PortId, PortKind, Result, SwitchConfig};
use tracing::debug;

/// Spanning tree state of a trunk port.
///
/// Blocking ports neither forward nor flood data frames; Listening ports
/// are forwarding-eligible. Access ports have no STP state, they are
/// implicitly always forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StpState {
    Blocking,
    Listening,
}

/// Runtime role of a port: the configured kind plus, for trunks, the STP
/// state the engine drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRole {
    Access { vlan: u16 },
    Trunk { state: StpState },
}

/// One switch port.
#[derive(Debug, Clone)]
pub struct Port {
    pub id: PortId,
    pub name: String,
    pub role: PortRole,
}

impl Port {
    /// Configured kind, without the runtime state
    pub fn kind(&self) -> PortKind {
        match self.role {
            PortRole::Access { vlan } => PortKind::Access { vlan },
            PortRole::Trunk { .. } => PortKind::Trunk,
        }
    }

    pub fn is_trunk(&self) -> bool {
        matches!(self.role, PortRole::Trunk { .. })
    }

    /// STP state for trunk ports, `None` for access ports
    pub fn stp_state(&self) -> Option<StpState> {
        match self.role {
            PortRole::Trunk { state } => Some(state),
            PortRole::Access { .. } => None,
        }
    }
}

/// Ordered collection of every port on the switch.
///
/// Built once at startup from the configuration file and the attached
/// links; ports are never added or removed afterwards. Only the STP engine
/// mutates trunk states.
#[derive(Debug, Default)]
pub struct PortTable {
    ports: Vec<Port>,
}

impl PortTable {
    /// Resolve the configuration against the attached interfaces.
    ///
    /// Every attached port must have a config line and every configured
    /// name must be attached; either mismatch is a startup error. New trunk
    /// ports start Blocking, the engine flips them before traffic flows.
    pub fn from_config<L: LinkIo>(config: &SwitchConfig, link: &L) -> Result<Self> {
        let mut ports = Vec::with_capacity(link.num_ports());

        for id in 0..link.num_ports() {
            let name = link
                .interface_name(id)
                .ok_or_else(|| Error::link(format!("port {} has no interface name", id)))?;
            let kind = config
                .kind_for(name)
                .ok_or_else(|| Error::config(format!("interface {} not in configuration", name)))?;

            let role = match kind {
                PortKind::Access { vlan } => PortRole::Access { vlan },
                PortKind::Trunk => PortRole::Trunk {
                    state: StpState::Blocking,
                },
            };

            ports.push(Port {
                id,
                name: name.to_string(),
                role,
            });
        }

        for (name, _) in &config.interfaces {
            if !ports.iter().any(|p| &p.name == name) {
                return Err(Error::config(format!(
                    "configured interface {} is not attached",
                    name
                )));
            }
        }

        Ok(Self { ports })
    }

    /// Build a table directly from roles, ids assigned in order.
    pub fn from_roles(roles: Vec<PortRole>) -> Self {
        let ports = roles
            .into_iter()
            .enumerate()
            .map(|(id, role)| Port {
                id,
                name: format!("port{}", id),
                role,
            })
            .collect();
        Self { ports }
    }

    pub fn get(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id)
    }

    pub fn kind(&self, id: PortId) -> Option<PortKind> {
        self.get(id).map(Port::kind)
    }

    /// STP state of a port; `None` for access ports and unknown ids
    pub fn stp_state(&self, id: PortId) -> Option<StpState> {
        self.get(id).and_then(Port::stp_state)
    }

    /// Flip one trunk port's STP state. No-op on access ports.
    pub fn set_stp_state(&mut self, id: PortId, state: StpState) {
        if let Some(port) = self.ports.get_mut(id) {
            if let PortRole::Trunk { state: current } = &mut port.role {
                if *current != state {
                    debug!("port {} ({}) -> {:?}", port.id, port.name, state);
                    *current = state;
                }
            }
        }
    }

    /// Put every trunk port into one state.
    pub fn set_all_trunks(&mut self, state: StpState) {
        let trunks: Vec<PortId> = self.trunk_ids().collect();
        for id in trunks {
            self.set_stp_state(id, state);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    /// Ids of every trunk port, in port order
    pub fn trunk_ids(&self) -> impl Iterator<Item = PortId> + '_ {
        self.ports.iter().filter(|p| p.is_trunk()).map(|p| p.id)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_trunks_one_access() -> PortTable {
        PortTable::from_roles(vec![
            PortRole::Trunk {
                state: StpState::Blocking,
            },
            PortRole::Trunk {
                state: StpState::Blocking,
            },
            PortRole::Access { vlan: 10 },
        ])
    }

    #[test]
    fn test_roles_and_kinds() {
        let ports = two_trunks_one_access();
        assert_eq!(ports.kind(0), Some(PortKind::Trunk));
        assert_eq!(ports.kind(2), Some(PortKind::Access { vlan: 10 }));
        assert_eq!(ports.stp_state(0), Some(StpState::Blocking));
        assert_eq!(ports.stp_state(2), None);
        assert_eq!(ports.trunk_ids().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_set_state_ignores_access_ports() {
        let mut ports = two_trunks_one_access();
        ports.set_stp_state(2, StpState::Listening);
        assert_eq!(ports.stp_state(2), None);

        ports.set_stp_state(0, StpState::Listening);
        assert_eq!(ports.stp_state(0), Some(StpState::Listening));
    }

    #[test]
    fn test_set_all_trunks() {
        let mut ports = two_trunks_one_access();
        ports.set_all_trunks(StpState::Listening);
        assert_eq!(ports.stp_state(0), Some(StpState::Listening));
        assert_eq!(ports.stp_state(1), Some(StpState::Listening));
        assert_eq!(ports.stp_state(2), None);
    }
}

//! VLAN-aware forwarding engine and spanning tree for softswitch
//!
//! The pieces, leaf first:
//!
//! - [`ethernet`]: header parsing and VLAN tag add/remove
//! - [`cam`]: the learned MAC-to-port table
//! - [`port`]: per-port administrative metadata and trunk STP state
//! - [`stp`]: BPDU wire format and the root election state machine
//! - [`forward`]: unicast/flood dispatch with tag translation
//! - [`switch`]: the driver tying it together under one mutex, with a
//!   receive loop and the 1-second BPDU timer

pub mod cam;
pub mod ethernet;
pub mod forward;
pub mod port;
pub mod stp;
pub mod switch;

#[cfg(test)]
pub(crate) mod testutil;

pub use cam::CamTable;
pub use ethernet::EthernetHeader;
pub use port::{Port, PortRole, PortTable, StpState};
pub use stp::{Bpdu, StpEngine};
pub use switch::{Switch, SwitchState};

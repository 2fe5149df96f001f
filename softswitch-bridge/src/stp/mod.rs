//! Simplified Spanning Tree Protocol
//!
//! Trunk ports exchange BPDUs to elect the bridge with the numerically
//! lowest id as root and to block redundant paths. The model is
//! deliberately small:
//!
//! - two port states only, Blocking and Listening
//! - a fixed per-hop path cost of 10
//! - the root originates one BPDU per second on every trunk port
//!
//! ## Frame format
//!
//! BPDUs ride in 29-byte 802.3 frames with an LLC header:
//! destination `01:80:c2:00:00:00`, LLC DSAP/SSAP 0x42, then sender bridge
//! id, root bridge id and root path cost as 4-byte big-endian integers.

pub mod engine;
pub mod packet;

pub use engine::StpEngine;
pub use packet::Bpdu;

/// STP protocol constants
pub mod constants {
    use softswitch_core::MacAddr;
    use std::time::Duration;

    /// STP multicast destination MAC address
    pub const STP_MULTICAST_MAC: MacAddr = MacAddr([0x01, 0x80, 0xC2, 0x00, 0x00, 0x00]);

    /// LLC header for BPDU frames
    pub const STP_LLC_DSAP: u8 = 0x42;
    pub const STP_LLC_SSAP: u8 = 0x42;
    pub const STP_LLC_CONTROL: u8 = 0x03;

    /// Total size of a BPDU frame on the wire
    pub const BPDU_FRAME_SIZE: usize = 29;

    /// Cost added per hop towards the root
    pub const PATH_COST_INCREMENT: u32 = 10;

    /// How often the root originates BPDUs
    pub const HELLO_INTERVAL: Duration = Duration::from_secs(1);
}

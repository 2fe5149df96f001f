//! BPDU wire format

use bytes::{BufMut, BytesMut};
use softswitch_core::{Error, MacAddr, Result};

use super::constants::*;

/// Bridge Protocol Data Unit
///
/// Carried in a fixed 29-byte frame; all multi-byte fields big-endian.
///
/// | Offset | Len | Field |
/// |---|---|---|
/// | 0 | 6 | destination MAC (STP multicast) |
/// | 6 | 6 | source MAC |
/// | 12 | 2 | length/type `0x0003` |
/// | 14 | 3 | LLC `42 42 03` |
/// | 17 | 4 | sender bridge id |
/// | 21 | 4 | root bridge id |
/// | 25 | 4 | root path cost |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bpdu {
    /// Bridge that put this BPDU on the segment
    pub sender_bridge_id: u32,
    /// Root the sender currently believes in
    pub root_bridge_id: u32,
    /// Sender's cost to that root
    pub root_path_cost: u32,
}

impl Bpdu {
    pub fn new(sender_bridge_id: u32, root_bridge_id: u32, root_path_cost: u32) -> Self {
        Self {
            sender_bridge_id,
            root_bridge_id,
            root_path_cost,
        }
    }

    /// Build the full 29-byte frame, ready for the wire.
    pub fn build(&self, src_mac: MacAddr) -> Vec<u8> {
        let mut frame = BytesMut::with_capacity(BPDU_FRAME_SIZE);

        // Ethernet
        frame.put_slice(&STP_MULTICAST_MAC.0);
        frame.put_slice(&src_mac.0);
        frame.put_u8(0x00);
        frame.put_u8(0x03);

        // LLC
        frame.put_u8(STP_LLC_DSAP);
        frame.put_u8(STP_LLC_SSAP);
        frame.put_u8(STP_LLC_CONTROL);

        // BPDU payload
        frame.put_u32(self.sender_bridge_id);
        frame.put_u32(self.root_bridge_id);
        frame.put_u32(self.root_path_cost);

        frame.to_vec()
    }

    /// Parse a BPDU frame.
    ///
    /// Anything other than exactly 29 bytes is malformed; the caller drops
    /// the frame without touching bridge state.
    pub fn parse(frame: &[u8]) -> Result<Self> {
        if frame.len() != BPDU_FRAME_SIZE {
            return Err(Error::MalformedBpdu {
                len: frame.len(),
                expected: BPDU_FRAME_SIZE,
            });
        }

        let sender_bridge_id = u32::from_be_bytes([frame[17], frame[18], frame[19], frame[20]]);
        let root_bridge_id = u32::from_be_bytes([frame[21], frame[22], frame[23], frame[24]]);
        let root_path_cost = u32::from_be_bytes([frame[25], frame[26], frame[27], frame[28]]);

        Ok(Self {
            sender_bridge_id,
            root_bridge_id,
            root_path_cost,
        })
    }
}

//! Ethernet header parsing and VLAN tag manipulation
//!
//! Tagged frames carry a 4-byte tag after the two MAC addresses: a 2-byte
//! marker (0x8200) followed by a 2-byte tag-control field whose low 12 bits
//! are the VLAN id.

use bytes::{BufMut, BytesMut};
use softswitch_core::{Error, MacAddr, Result};

/// Tag marker value identifying a VLAN-tagged frame
pub const VLAN_TPID: u16 = 0x8200;

/// VLAN ID mask (12 bits)
pub const VLAN_ID_MASK: u16 = 0x0FFF;

/// Size of a VLAN tag in bytes (2 marker + 2 tag control)
pub const VLAN_TAG_SIZE: usize = 4;

/// Untagged Ethernet header size
const ETH_HEADER_SIZE: usize = 14;

/// Decoded Ethernet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub dest: MacAddr,
    pub src: MacAddr,
    pub ethertype: u16,
    /// VLAN id carried by the frame, `None` when untagged
    pub vlan_id: Option<u16>,
}

impl EthernetHeader {
    /// Parse the header of a raw frame.
    ///
    /// Reads the 16-bit field at offset 12; when it equals [`VLAN_TPID`] the
    /// next 16 bits hold the tag control field and the real ethertype sits
    /// at offset 16.
    pub fn parse(frame: &[u8]) -> Result<Self> {
        if frame.len() < ETH_HEADER_SIZE {
            return Err(Error::TruncatedFrame(frame.len()));
        }

        let mut dest = [0u8; 6];
        let mut src = [0u8; 6];
        dest.copy_from_slice(&frame[0..6]);
        src.copy_from_slice(&frame[6..12]);

        let mut ethertype = u16::from_be_bytes([frame[12], frame[13]]);
        let mut vlan_id = None;

        if ethertype == VLAN_TPID {
            if frame.len() < ETH_HEADER_SIZE + VLAN_TAG_SIZE {
                return Err(Error::TruncatedFrame(frame.len()));
            }
            let tci = u16::from_be_bytes([frame[14], frame[15]]);
            vlan_id = Some(tci & VLAN_ID_MASK);
            ethertype = u16::from_be_bytes([frame[16], frame[17]]);
        }

        Ok(Self {
            dest: MacAddr(dest),
            src: MacAddr(src),
            ethertype,
            vlan_id,
        })
    }
}

/// Insert a VLAN tag right after the two MAC addresses.
///
/// Output length is input length + 4. Only the low 12 bits of `vlan_id` are
/// carried.
///
/// # Example
///
/// ```
/// use softswitch_bridge::ethernet::{add_vlan_tag, remove_vlan_tag};
///
/// let frame = vec![0u8; 20];
/// let tagged = add_vlan_tag(&frame, 10);
/// assert_eq!(tagged.len(), frame.len() + 4);
/// assert_eq!(remove_vlan_tag(&tagged), frame);
/// ```
pub fn add_vlan_tag(frame: &[u8], vlan_id: u16) -> Vec<u8> {
    let mut tagged = BytesMut::with_capacity(frame.len() + VLAN_TAG_SIZE);
    tagged.put_slice(&frame[..12]);
    tagged.put_u16(VLAN_TPID);
    tagged.put_u16(vlan_id & VLAN_ID_MASK);
    tagged.put_slice(&frame[12..]);
    tagged.to_vec()
}

/// Strip the VLAN tag from a frame, if it carries one.
///
/// Untagged (or too-short) frames come back unchanged, so the operation is
/// idempotent.
pub fn remove_vlan_tag(frame: &[u8]) -> Vec<u8> {
    if frame.len() < ETH_HEADER_SIZE + VLAN_TAG_SIZE {
        return frame.to_vec();
    }

    let marker = u16::from_be_bytes([frame[12], frame[13]]);
    if marker != VLAN_TPID {
        return frame.to_vec();
    }

    let mut stripped = Vec::with_capacity(frame.len() - VLAN_TAG_SIZE);
    stripped.extend_from_slice(&frame[..12]);
    stripped.extend_from_slice(&frame[12 + VLAN_TAG_SIZE..]);
    stripped
}

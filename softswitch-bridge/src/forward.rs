//! VLAN-aware forwarding: unicast, flood and broadcast handling
//!
//! Tag discipline: frames between trunk ports travel tagged and unmodified;
//! frames entering from an access port get tagged with that port's VLAN
//! before leaving a trunk; frames leaving an access port always go out
//! untagged and only onto ports of the matching VLAN.

use softswitch_core::{LinkIo, PortId, PortKind};
use tracing::{debug, trace, warn};

use crate::cam::CamTable;
use crate::ethernet::{add_vlan_tag, remove_vlan_tag, EthernetHeader};
use crate::port::{PortTable, StpState};

/// Forward one already-decoded data frame.
///
/// Learns the source MAC, then either forwards to the CAM-resolved port or
/// floods. Frames are never sent back out the ingress port. Returns how
/// many copies left the switch; VLAN mismatches and STP-blocked targets
/// cost the frame silently.
pub fn dispatch<L: LinkIo>(
    header: &EthernetHeader,
    frame: &[u8],
    ingress: PortId,
    ports: &PortTable,
    cam: &mut CamTable,
    link: &L,
) -> usize {
    cam.learn(header.src, ingress);

    let Some(ingress_kind) = ports.kind(ingress) else {
        warn!("frame from unknown port {}", ingress);
        return 0;
    };

    if header.dest.is_unicast() {
        if let Some(dest_port) = cam.lookup(&header.dest) {
            match ports.kind(dest_port) {
                Some(kind) => {
                    return forward_unicast(
                        header,
                        frame,
                        ingress,
                        ingress_kind,
                        dest_port,
                        kind,
                        ports,
                        link,
                    );
                }
                None => {
                    // the CAM remembers a port that left the registry:
                    // treat as a miss
                    debug!(
                        "CAM entry {} -> {} is stale, flooding",
                        header.dest, dest_port
                    );
                }
            }
        }
    }

    flood(header, frame, ingress, ingress_kind, ports, link)
}

#[allow(clippy::too_many_arguments)]
fn forward_unicast<L: LinkIo>(
    header: &EthernetHeader,
    frame: &[u8],
    ingress: PortId,
    ingress_kind: PortKind,
    dest_port: PortId,
    dest_kind: PortKind,
    ports: &PortTable,
    link: &L,
) -> usize {
    match dest_kind {
        PortKind::Trunk => {
            if ports.stp_state(dest_port) == Some(StpState::Blocking) {
                trace!("drop: port {} is blocking", dest_port);
                return 0;
            }

            match ingress_kind {
                PortKind::Trunk => send(link, dest_port, frame),
                PortKind::Access { vlan } => {
                    let tagged = add_vlan_tag(frame, vlan);
                    send(link, dest_port, &tagged)
                }
            }
        }
        PortKind::Access { vlan: dest_vlan } => match ingress_kind {
            PortKind::Trunk => {
                if header.vlan_id != Some(dest_vlan) {
                    trace!(
                        "drop: frame vlan {:?} does not match port {} vlan {}",
                        header.vlan_id,
                        dest_port,
                        dest_vlan
                    );
                    return 0;
                }
                let stripped = remove_vlan_tag(frame);
                send(link, dest_port, &stripped)
            }
            PortKind::Access { vlan: src_vlan } => {
                if src_vlan != dest_vlan {
                    trace!(
                        "drop: vlan {} to vlan {} crossing denied",
                        src_vlan,
                        dest_vlan
                    );
                    return 0;
                }
                send(link, dest_port, frame)
            }
        },
    }
}

/// Unknown-unicast and broadcast/multicast handling.
fn flood<L: LinkIo>(
    header: &EthernetHeader,
    frame: &[u8],
    ingress: PortId,
    ingress_kind: PortKind,
    ports: &PortTable,
    link: &L,
) -> usize {
    let mut sent = 0;

    match ingress_kind {
        PortKind::Trunk => {
            for port in ports.iter().filter(|p| p.id != ingress) {
                match port.kind() {
                    PortKind::Trunk => {
                        if port.stp_state() != Some(StpState::Blocking) {
                            sent += send(link, port.id, frame);
                        }
                    }
                    PortKind::Access { vlan } => {
                        if header.vlan_id == Some(vlan) {
                            let stripped = remove_vlan_tag(frame);
                            sent += send(link, port.id, &stripped);
                        }
                    }
                }
            }
        }
        PortKind::Access { vlan: src_vlan } => {
            for port in ports.iter().filter(|p| p.id != ingress) {
                match port.kind() {
                    PortKind::Access { vlan } => {
                        if vlan == src_vlan {
                            sent += send(link, port.id, frame);
                        }
                    }
                    PortKind::Trunk => {
                        if port.stp_state() == Some(StpState::Blocking) {
                            continue;
                        }
                        let tagged = add_vlan_tag(frame, src_vlan);
                        sent += send(link, port.id, &tagged);
                    }
                }
            }
        }
    }

    sent
}

fn send<L: LinkIo>(link: &L, port: PortId, frame: &[u8]) -> usize {
    match link.send(port, frame) {
        Ok(()) => 1,
        Err(e) => {
            warn!("send on port {} failed: {}", port, e);
            0
        }
    }
}

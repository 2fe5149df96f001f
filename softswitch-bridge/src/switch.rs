//! Bridge driver: owns the shared state, runs the receive loop and the
//! BPDU timer

use std::sync::Arc;

use parking_lot::Mutex;
use softswitch_core::{Error, LinkIo, PortId, Result, SwitchConfig};
use tokio::task;
use tracing::{debug, info};

use crate::cam::CamTable;
use crate::ethernet::EthernetHeader;
use crate::forward;
use crate::port::PortTable;
use crate::stp::constants::{HELLO_INTERVAL, STP_MULTICAST_MAC};
use crate::stp::{Bpdu, StpEngine};

/// Everything the receive path and the timer path share.
///
/// Held behind a single mutex: each received frame and each timer tick runs
/// to completion under the lock, so STP transitions, CAM learning and
/// forwarding decisions for one event are atomic with respect to the other
/// path.
pub struct SwitchState {
    pub stp: StpEngine,
    pub ports: PortTable,
    pub cam: CamTable,
}

/// The switch: shared state plus the link collaborator.
pub struct Switch<L: LinkIo> {
    state: Arc<Mutex<SwitchState>>,
    link: Arc<L>,
}

impl<L: LinkIo + Send + Sync + 'static> Switch<L> {
    /// Build the port table from configuration and seed the election.
    pub fn new(config: &SwitchConfig, link: L) -> Result<Self> {
        let mut ports = PortTable::from_config(config, &link)?;
        let stp = StpEngine::new(config.priority, &mut ports);

        info!(
            "bridge {} up with {} ports ({} trunks)",
            config.priority,
            ports.len(),
            ports.trunk_ids().count()
        );
        for port in ports.iter() {
            info!("  port {} {}: {}", port.id, port.name, port.kind());
        }

        Ok(Self {
            state: Arc::new(Mutex::new(SwitchState {
                stp,
                ports,
                cam: CamTable::new(),
            })),
            link: Arc::new(link),
        })
    }

    /// Run forever: a hello timer task plus the blocking receive loop.
    pub async fn run(self) -> Result<()> {
        let timer_state = Arc::clone(&self.state);
        let timer_link = Arc::clone(&self.link);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(HELLO_INTERVAL);
            loop {
                ticker.tick().await;
                let state = timer_state.lock();
                state.stp.hello(&state.ports, timer_link.as_ref());
            }
        });

        loop {
            let link = Arc::clone(&self.link);
            let (port, frame) = task::spawn_blocking(move || link.receive())
                .await
                .map_err(|e| Error::link(format!("receive task failed: {}", e)))??;

            if let Err(e) = self.handle_frame(port, &frame) {
                // bad frames only cost themselves
                debug!("frame on port {} dropped: {}", port, e);
            }
        }
    }

    /// Process one received frame to completion.
    ///
    /// BPDUs go to the STP engine and are consumed; everything else is
    /// learned and forwarded.
    pub fn handle_frame(&self, ingress: PortId, frame: &[u8]) -> Result<()> {
        let header = EthernetHeader::parse(frame)?;
        let mut state = self.state.lock();

        if header.dest == STP_MULTICAST_MAC {
            let bpdu = Bpdu::parse(frame)?;
            let SwitchState { stp, ports, .. } = &mut *state;
            stp.process_bpdu(&bpdu, ingress, ports, self.link.as_ref());
            return Ok(());
        }

        let SwitchState { ports, cam, .. } = &mut *state;
        forward::dispatch(&header, frame, ingress, ports, cam, self.link.as_ref());
        Ok(())
    }

    /// Shared state handle, for inspection.
    pub fn state(&self) -> Arc<Mutex<SwitchState>> {
        Arc::clone(&self.state)
    }

    /// The link collaborator.
    pub fn link(&self) -> &L {
        &self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::StpState;
    use crate::testutil::MockLink;
    use softswitch_core::MacAddr;

    const HOST_A: MacAddr = MacAddr([0x02, 0, 0, 0, 0, 0xaa]);
    const HOST_B: MacAddr = MacAddr([0x02, 0, 0, 0, 0, 0xbb]);

    fn switch_under_test() -> Switch<MockLink> {
        // port 0 trunk, port 1 trunk, port 2 access vlan 10
        let config = SwitchConfig::parse_str("100\nport0 T\nport1 T\nport2 10\n").unwrap();
        Switch::new(&config, MockLink::new(3)).unwrap()
    }

    fn data_frame(dest: MacAddr, src: MacAddr) -> Vec<u8> {
        let mut frame = Vec::new();
        frame.extend_from_slice(dest.as_bytes());
        frame.extend_from_slice(src.as_bytes());
        frame.extend_from_slice(&0x0800u16.to_be_bytes());
        frame.extend_from_slice(&[0u8; 8]);
        frame
    }

    #[test]
    fn new_switch_claims_root() {
        let switch = switch_under_test();
        let state = switch.state();
        let state = state.lock();

        assert!(state.stp.is_root());
        assert_eq!(state.ports.stp_state(0), Some(StpState::Listening));
        assert_eq!(state.ports.stp_state(1), Some(StpState::Listening));
    }

    #[test]
    fn bpdu_frames_drive_stp_and_are_consumed() {
        let switch = switch_under_test();

        let claim = Bpdu::new(50, 50, 0).build(MacAddr([0x02, 0, 0, 0, 0, 0x02]));
        switch.handle_frame(0, &claim).unwrap();

        let state = switch.state();
        let state = state.lock();
        assert_eq!(state.stp.root_bridge_id(), 50);
        assert_eq!(state.stp.root_port(), Some(0));
        assert!(
            state.cam.is_empty(),
            "control frames never reach the CAM table"
        );
        assert_eq!(state.ports.stp_state(1), Some(StpState::Blocking));
    }

    #[test]
    fn malformed_bpdu_is_dropped_without_state_change() {
        let switch = switch_under_test();

        let mut truncated = Bpdu::new(50, 50, 0).build(MacAddr([0x02, 0, 0, 0, 0, 0x02]));
        truncated.pop();
        let err = switch.handle_frame(0, &truncated).unwrap_err();
        assert!(matches!(err, Error::MalformedBpdu { len: 28, .. }));

        let state = switch.state();
        let state = state.lock();
        assert!(state.stp.is_root(), "bad BPDU must not move the election");
        assert_eq!(state.ports.stp_state(1), Some(StpState::Listening));
    }

    #[test]
    fn data_frames_are_learned_and_forwarded() {
        let switch = switch_under_test();

        // unknown unicast from the access port floods both open trunks
        switch
            .handle_frame(2, &data_frame(HOST_B, HOST_A))
            .unwrap();

        let state = switch.state();
        {
            let state = state.lock();
            assert_eq!(state.cam.lookup(&HOST_A), Some(2));
        }

        let targets: Vec<_> = switch.link().sends().iter().map(|(p, _)| *p).collect();
        assert_eq!(targets, vec![0, 1], "tagged copies on both open trunks");
    }

    #[test]
    fn truncated_frame_is_rejected() {
        let switch = switch_under_test();
        assert!(switch.handle_frame(0, &[0u8; 10]).is_err());
    }
}

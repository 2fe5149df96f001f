//! Error types for softswitch

use thiserror::Error;

/// Result type alias for switch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for softswitch
///
/// The frame-scoped variants (`MalformedBpdu`, `UnknownDestinationPort`,
/// `VlanMismatch`) only ever cost the offending frame; the receive loop
/// logs them and keeps running. Configuration and link bring-up errors are
/// fatal at startup.
#[derive(Error, Debug)]
pub enum Error {
    /// Network I/O error
    #[error("Network I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Link layer error
    #[error("Link error: {0}")]
    Link(String),

    /// Interface not found
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    /// BPDU frame with a wrong length
    #[error("Malformed BPDU: {len} bytes (expected {expected})")]
    MalformedBpdu { len: usize, expected: usize },

    /// CAM entry names a port that left the registry
    #[error("Unknown destination port {0}")]
    UnknownDestinationPort(crate::PortId),

    /// Frame VLAN tag inconsistent with the destination port
    #[error("VLAN mismatch: frame carries {frame:?}, port expects {port}")]
    VlanMismatch { frame: Option<u16>, port: u16 },

    /// Ethernet frame too short to parse
    #[error("Truncated frame: {0} bytes")]
    TruncatedFrame(usize),
}

impl Error {
    /// Create a configuration error with a custom message
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a link error with a custom message
    pub fn link<S: Into<String>>(msg: S) -> Self {
        Error::Link(msg.into())
    }

    /// True for errors that only cost a single frame
    pub fn is_frame_scoped(&self) -> bool {
        matches!(
            self,
            Error::MalformedBpdu { .. }
                | Error::UnknownDestinationPort(_)
                | Error::VlanMismatch { .. }
                | Error::TruncatedFrame(_)
        )
    }
}

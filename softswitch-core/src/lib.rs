//! Core types, link I/O and configuration for softswitch
//!
//! This crate holds the vocabulary shared by the switching engine and the
//! CLI: MAC addresses and port kinds, the error type, the [`LinkIo`]
//! abstraction over raw frame I/O, and the `switch<ID>.cfg` parser.

pub mod config;
pub mod error;
pub mod link;
pub mod types;

pub use config::SwitchConfig;
pub use error::{Error, Result};
pub use link::{available_interfaces, DataLinkPorts, LinkIo};
pub use types::{MacAddr, PortId, PortKind};

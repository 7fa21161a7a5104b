//! UPnP device description parsing
//!
//! A device description lists the device's identity and its services. Two
//! things are read from it: the device-level fields via serde
//! ([`DeviceInfo`]) and the block describing one named service
//! ([`find_service`]).

pub mod parser;

pub use parser::{find_service, DeviceInfo, ServiceEntry, SERVICE_SCHEMA};

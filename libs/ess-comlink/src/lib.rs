//! Communication link for SNMP-style field devices
//!
//! Devices are queried with batched get-requests addressed by object
//! identifier. A device may answer with values, or with an explicit
//! "no such name" error when an object does not exist on its firmware.
//! That condition is kept distinct from transport failures.

pub mod error;
pub mod link;
pub mod message;
pub mod oid;

pub use error::{ComLinkError, Result};
pub use link::{CommLink, Transport};
pub use message::{GetRequest, GetResponse, WireValue};
pub use oid::ObjectId;

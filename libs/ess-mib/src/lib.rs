//! NTCIP 1204 environmental sensor station object model
//!
//! Raw wire integers become bounded, unit-aware readings through the
//! [`convert`] types. Per-sensor rows are collected in [`table::EssTable`]s
//! whose length is itself read from the device. One [`EssRec`] gathers every
//! value group for a single polling cycle and commits it to a [`SensorModel`].

pub mod convert;
pub mod enums;
pub mod error;
pub mod ess_type;
pub mod groups;
pub mod mib1204;
pub mod model;
pub mod record;
pub mod sensors;
pub mod table;

pub use convert::{
    EssAngle, EssBoolean, EssConvertible, EssDistance, EssEnum, EssInterval, EssMeasure,
    EssNumber, EssPressure, EssSpeed, EssString, EssTemperature,
};
pub use enums::EssEnumType;
pub use error::{MibError, Result};
pub use ess_type::EssType;
pub use mib1204::Mib1204;
pub use model::SensorModel;
pub use record::EssRec;
pub use table::{EssRow, EssTable};

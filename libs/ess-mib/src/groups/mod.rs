//! Scalar value groups, one per physical subsystem

pub mod atmospheric;
pub mod instrument;
pub mod precipitation;
pub mod radiation;

pub use atmospheric::AtmosphericValues;
pub use instrument::InstrumentValues;
pub use precipitation::PrecipitationValues;
pub use radiation::RadiationValues;

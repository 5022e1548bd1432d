// lib.rs

mod config;
pub use config::*;

mod clock;
pub use clock::*;

mod measure;
pub use measure::*;

mod display;
pub use display::*;

mod tm1637;
pub use tm1637::*;

mod telemetry;
pub use telemetry::*;

mod station;
pub use station::*;

#[cfg(target_os = "espidf")]
mod wifi;
#[cfg(target_os = "espidf")]
pub use wifi::*;

#[cfg(test)]
mod testutil;

pub const FW_VERSION: &str = env!("CARGO_PKG_VERSION");

// EOF

//! ESP Bus Core - Pin-Verwaltung und Bus-Konfiguration
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie entscheidet, welche LED-Busse mit welchen GPIOs angelegt werden:
//!
//! - [`PinRegistry`]: wer besitzt welchen Pin
//! - [`DefaultBusResolver`]: Default-Busse, Konflikte werden umgangen
//! - [`BusConfigBuilder`]: Speicherbudget für die Pixel-Buffer
//! - [`AllocatorContext`]: alles zusammen, inkl. gespeicherter Einträge
//!
//! Die Firmware legt mit dem Ergebnis die eigentlichen Busse an.

#![no_std]

#[macro_use]
mod fmt;

pub mod builder;
pub mod bus_type;
pub mod color_order;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod peripherals;
pub mod pins;
pub mod preview;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod traits;
pub mod validator;

// Re-exports für einfachen Zugriff
pub use builder::{BuildOutcome, BusConfigBuilder, BusList, DropReason, MAX_BUSES};
pub use bus_type::{BusType, OUTPUT_MAX_PINS};
pub use color_order::{ColorOrder, ColorOrderMap, ColorOrderMapping, WhiteSwap};
pub use context::{AllocatorContext, BusPlan, Limits, PlanSource};
pub use descriptor::{AutoWhiteMode, BusDescriptor};
pub use error::{ConfigError, RecordError};
pub use peripherals::{PeripheralConfig, PeripheralPins};
pub use pins::{PIN_UNASSIGNED, Pin, PinSpec};
pub use preview::BusPreview;
pub use record::{BusRecord, ColorOrderRecord, LedSettings};
pub use registry::{Esp32C6Layout, Esp32Layout, GpioLayout, PinError, PinOwner, PinRegistry};
pub use resolver::{DefaultBusResolver, DefaultBusSpec, ResolveOutcome, find_free_pin};
pub use traits::{LedError, SmartLedWriter};
pub use validator::{is_satisfiable, required_pins};

// Library-Root: Bus-Setup und Tasks der Firmware
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod settings;
pub mod setup;
pub mod tasks;

// Re-exports von esp-bus-core
pub use esp_bus_core::{AllocatorContext, BusPlan, BusPreview, Esp32C6Layout, LedError, SmartLedWriter};

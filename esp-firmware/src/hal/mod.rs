// Hardware Abstraction Layer (HAL) Module
//
// Implementierungen der Traits aus esp-bus-core für den ESP32-C6.

pub mod led_writer;

pub use led_writer::RmtLedWriter;

// Task-Modul: Enthält alle Embassy Tasks

pub mod bus_preview;

// Re-export Tasks für einfachen Import
pub use bus_preview::bus_preview_task;

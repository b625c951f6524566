// Bus-Setup beim Boot
//
// Reihenfolge: Peripherie-Pins → Bus-Plan (explizit oder Default) →
// Pins der Busse belegen. Busse, deren Pins nicht belegt werden können,
// werden verworfen und der Pixel-Buffer neu berechnet.

use defmt::{info, warn};
use esp_bus_core::{AllocatorContext, BusPlan, BusRecord, ConfigError, GpioLayout, LedSettings};

use crate::config::{DEFAULT_BUSES, DEFAULT_COLOR_ORDER, JSON_BUS_BUFFER_SIZE};
use crate::settings::peripheral_config;

/// Konfiguriert Peripherie und LED-Busse
///
/// Gibt den Plan mit den tatsächlich angelegten Bussen zurück.
pub fn configure_buses<L: GpioLayout>(
    context: &mut AllocatorContext<L>,
    settings: Option<&LedSettings>,
) -> Result<BusPlan, ConfigError> {
    let peripherals = context.apply_peripherals(&peripheral_config());
    info!(
        "Peripheral pins: buttons {}, ir {}, relay {}",
        peripherals.buttons, peripherals.ir, peripherals.relay
    );

    let plan = context.apply(settings, DEFAULT_BUSES, DEFAULT_COLOR_ORDER)?;
    let plan = context.materialize(plan);

    log_plan(&plan);
    Ok(plan)
}

/// Loggt den Plan, jeder Bus im gespeicherten Format
pub fn log_plan(plan: &BusPlan) {
    info!(
        "{} bus(es) from {}, {} dropped, {} color order mapping(s), buffer {}B",
        plan.buses.len(),
        plan.source,
        plan.dropped,
        plan.color_orders.len(),
        plan.total_memory
    );
    let mut buffer = [0u8; JSON_BUS_BUFFER_SIZE];
    for (index, bus) in plan.buses.iter().enumerate() {
        info!("Bus #{}: {}", index, bus);
        match serde_json_core::to_slice(&BusRecord::from(bus), &mut buffer) {
            Ok(len) => {
                if let Ok(json) = core::str::from_utf8(&buffer[..len]) {
                    info!("Bus #{} saved as {}", index, json);
                }
            }
            Err(_) => warn!("Bus #{} does not fit the JSON buffer", index),
        }
    }
}

//! Default-Busse ohne gespeicherte Konfiguration
//!
//! Beim ersten Boot (oder wenn die Konfiguration unlesbar ist) werden die
//! Busse aus der einkompilierten Default-Liste erzeugt. Pins, die schon
//! belegt oder auf dieser Plattform nicht nutzbar sind, werden durch den
//! nächsthöheren freien Pin ersetzt.

use crate::builder::{BusList, MAX_BUSES};
use crate::bus_type::BusType;
use crate::color_order::ColorOrder;
use crate::descriptor::BusDescriptor;
use crate::error::ConfigError;
use crate::pins::{Pin, PinSpec};
use crate::registry::{GpioLayout, PinOwner, PinRegistry};
use crate::validator::{is_satisfiable, required_pins};

/// Einkompilierte Default-Konfiguration
///
/// Gibt es mehr Busse als Typen bzw. Pixelanzahlen, wird jeweils der
/// letzte Eintrag wiederholt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultBusSpec<'a> {
    pub types: &'a [BusType],
    pub pins: &'a [Pin],
    pub counts: &'a [u16],
}

impl<'a> DefaultBusSpec<'a> {
    pub const fn new(types: &'a [BusType], pins: &'a [Pin], counts: &'a [u16]) -> Self {
        Self { types, pins, counts }
    }

    /// Für `const _: () = assert!(SPEC.is_satisfiable())` in der Firmware
    pub const fn is_satisfiable(&self) -> bool {
        !self.types.is_empty()
            && !self.counts.is_empty()
            && is_satisfiable(self.types, self.pins.len())
    }

    /// Laufzeit-Variante von [`Self::is_satisfiable`]
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.types.is_empty() || self.counts.is_empty() {
            return Err(ConfigError::Empty);
        }
        if !is_satisfiable(self.types, self.pins.len()) {
            return Err(ConfigError::Unsatisfiable {
                required: required_pins(self.types) as u16,
                available: self.pins.len() as u16,
            });
        }
        Ok(())
    }

    fn type_at(&self, index: usize) -> BusType {
        self.types[index.min(self.types.len() - 1)]
    }

    fn count_at(&self, index: usize) -> u16 {
        self.counts[index.min(self.counts.len() - 1)]
    }
}

/// Ergebnis der Default-Auflösung
#[derive(Debug, Clone, Default)]
pub struct ResolveOutcome {
    pub buses: BusList,
    /// Pin-Raum erschöpft, restliche Busse wurden nicht erzeugt
    pub exhausted: bool,
}

/// Sucht ab `start` aufwärts den ersten freien, als Ausgang nutzbaren Pin
///
/// `excluded` schließt zusätzliche Pins aus (bereits für diesen Bus gewählt,
/// für spätere Busse vorgesehen). Die Suche endet an der Pin-Obergrenze der
/// Plattform.
pub fn find_free_pin<L, F>(registry: &PinRegistry<L>, start: Pin, excluded: F) -> Option<Pin>
where
    L: GpioLayout,
    F: Fn(Pin) -> bool,
{
    (start..registry.pin_ceiling())
        .find(|&pin| !registry.is_allocated(pin) && registry.is_usable(pin, true) && !excluded(pin))
}

/// Erzeugt Busse aus einer [`DefaultBusSpec`]
pub struct DefaultBusResolver<'a> {
    spec: DefaultBusSpec<'a>,
    max_buses: usize,
    max_leds: u16,
    color_order: ColorOrder,
}

impl<'a> DefaultBusResolver<'a> {
    pub fn new(spec: DefaultBusSpec<'a>, max_buses: usize, max_leds: u16) -> Self {
        Self {
            spec,
            max_buses: max_buses.min(MAX_BUSES),
            max_leds,
            color_order: ColorOrder::default(),
        }
    }

    pub fn with_color_order(mut self, order: ColorOrder) -> Self {
        self.color_order = order;
        self
    }

    /// Löst alle Default-Busse auf und belegt ihre Pins als [`PinOwner::LedBus`]
    ///
    /// Vorher werden alle LED-Pins freigegeben: jeder Aufruf ist eine komplette
    /// Neukonfiguration, bei unveränderter Registry also idempotent.
    pub fn resolve<L: GpioLayout>(&self, registry: &mut PinRegistry<L>) -> Result<ResolveOutcome, ConfigError> {
        self.spec.check()?;
        registry.release_owner(PinOwner::LedBus);

        let mut outcome = ResolveOutcome::default();
        let mut pins_index = 0;
        let mut start: u16 = 0;

        for i in 0..self.max_buses {
            let bus_type = self.spec.type_at(i);
            let needed = bus_type.required_pins();

            // alle Pins verbraucht → alle Ausgänge konfiguriert
            if pins_index + needed > self.spec.pins.len() {
                break;
            }

            let literal = &self.spec.pins[pins_index..pins_index + needed];
            let Some(pins) = self.resolve_bus_pins(registry, bus_type, literal) else {
                warn!("No available pins left! Can't configure output #{}.", i);
                outcome.exhausted = true;
                break;
            };
            pins_index += needed;

            let count = if bus_type.is_analog() { 1 } else { self.spec.count_at(i) };
            let bus = BusDescriptor::new(bus_type, pins, start, count).with_color_order(self.color_order);
            if let Err(err) = bus.validate(self.max_leds) {
                warn!("Default bus #{} rejected: {}", i, err);
                break;
            }

            if !bus_type.is_virtual() {
                if let Err(err) = registry.allocate_multiple(&bus.pin_claims(), PinOwner::LedBus) {
                    warn!("Default bus #{} pins not available: {}", i, err);
                    break;
                }
            }

            start = bus.end() as u16;
            if outcome.buses.push(bus).is_err() {
                break;
            }
        }

        info!("Resolved {} default bus(es)", outcome.buses.len());
        Ok(outcome)
    }

    fn resolve_bus_pins<L: GpioLayout>(
        &self,
        registry: &PinRegistry<L>,
        bus_type: BusType,
        literal: &[Pin],
    ) -> Option<PinSpec> {
        let mut chosen = PinSpec::EMPTY;
        for (slot, &pin) in literal.iter().enumerate() {
            // Virtuelle Busse: IP-Oktette, keine GPIOs
            if bus_type.is_virtual() {
                chosen.set(slot, pin);
                continue;
            }
            let usable = !registry.is_allocated(pin) && registry.is_usable(pin, true) && !chosen.contains(pin);
            let pin = if usable {
                pin
            } else {
                debug!("GPIO{} cannot be used for this LED output", pin);
                find_free_pin(registry, pin.saturating_add(1), |candidate| {
                    chosen.contains(candidate) || self.spec.pins.contains(&candidate)
                })?
            };
            chosen.set(slot, pin);
        }
        Some(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Esp32Layout;

    const STRIP: BusType = BusType::Ws2812Rgb;

    #[test]
    fn test_find_free_pin_skips_excluded_and_allocated() {
        let mut reg = PinRegistry::new(Esp32Layout::default());
        reg.allocate(13, false, PinOwner::Button).unwrap();
        let pin = find_free_pin(&reg, 12, |p| p == 12 || p == 14);
        assert_eq!(pin, Some(15));
    }

    #[test]
    fn test_find_free_pin_respects_ceiling() {
        let reg = PinRegistry::new(Esp32Layout::default());
        // 34..=39 sind Input-Only
        assert_eq!(find_free_pin(&reg, 34, |_| false), None);
        assert_eq!(find_free_pin(&reg, 200, |_| false), None);
    }

    #[test]
    fn test_literal_pins_are_kept_when_free() {
        let mut reg = PinRegistry::new(Esp32Layout::default());
        let types = [STRIP, BusType::Apa102];
        let pins = [2, 4, 5];
        let counts = [30, 60];
        let outcome = DefaultBusResolver::new(DefaultBusSpec::new(&types, &pins, &counts), 4, 1000)
            .resolve(&mut reg)
            .unwrap();
        assert_eq!(outcome.buses.len(), 2);
        assert_eq!(outcome.buses[0].pins, PinSpec::from_slice(&[2]));
        assert_eq!(outcome.buses[1].pins, PinSpec::from_slice(&[4, 5]));
        assert_eq!(outcome.buses[1].start, 30);
        assert_eq!(reg.count_owned(PinOwner::LedBus), 3);
    }

    #[test]
    fn test_analog_default_has_length_one() {
        let mut reg = PinRegistry::new(Esp32Layout::default());
        let types = [BusType::Analog2Ch];
        let pins = [2, 4];
        let outcome = DefaultBusResolver::new(DefaultBusSpec::new(&types, &pins, &[120]), 4, 1000)
            .resolve(&mut reg)
            .unwrap();
        assert_eq!(outcome.buses[0].length, 1);
    }

    #[test]
    fn test_unsatisfiable_spec_is_rejected() {
        let mut reg = PinRegistry::new(Esp32Layout::default());
        let types = [BusType::Apa102];
        let pins = [2, 4, 5];
        let result = DefaultBusResolver::new(DefaultBusSpec::new(&types, &pins, &[10]), 4, 1000).resolve(&mut reg);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Unsatisfiable {
                required: 2,
                available: 3
            }
        );
        assert_eq!(reg.count_owned(PinOwner::LedBus), 0);
    }
}

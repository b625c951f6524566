//! Allokations-Kontext: Pin-Registry + Plattform-Grenzen
//!
//! Ersetzt globale Zustände. Der Kontext wird vom Konfigurations-Code
//! besessen und per `&mut` an jede Auflösung übergeben.

use crate::builder::{BusConfigBuilder, BusList, MAX_BUSES};
use crate::color_order::{ColorOrder, ColorOrderMap};
use crate::descriptor::BusDescriptor;
use crate::error::ConfigError;
use crate::peripherals::{PeripheralConfig, PeripheralPins};
use crate::pins::Pin;
use crate::record::LedSettings;
use crate::registry::{GpioLayout, PinError, PinOwner, PinRegistry};
use crate::resolver::{DefaultBusResolver, DefaultBusSpec};

/// Plattform-Grenzen für die Bus-Konfiguration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximale Anzahl physischer Busse
    pub max_buses: usize,
    /// Maximale Pixelanzahl über alle Busse
    pub max_leds: u16,
    /// Budget für alle Pixel-Buffer in Bytes
    pub max_led_memory: usize,
    /// Parallel-Ausgabe, falls die Konfiguration nichts angibt
    pub parallel_output: bool,
}

impl Limits {
    /// ESP32-C6: 2 RMT-Kanäle + LEDC, wenig RAM
    pub const ESP32C6: Self = Self {
        max_buses: 6,
        max_leds: 1536,
        max_led_memory: 32_000,
        parallel_output: false,
    };
}

/// Herkunft einer Bus-Liste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlanSource {
    Explicit,
    Defaults,
}

/// Ergebnis einer kompletten Bus-Konfiguration
#[derive(Debug, Clone)]
pub struct BusPlan {
    pub source: PlanSource,
    pub buses: BusList,
    /// Pixel-Buffer aller Busse in Bytes
    pub total_memory: usize,
    /// Einträge/Busse, die nicht übernommen wurden
    pub dropped: usize,
    pub color_orders: ColorOrderMap,
    /// Parallel-Ausgabe, mit der `total_memory` berechnet wurde
    pub parallel_output: bool,
}

pub struct AllocatorContext<L: GpioLayout> {
    registry: PinRegistry<L>,
    limits: Limits,
    peripherals: PeripheralPins,
}

impl<L: GpioLayout> AllocatorContext<L> {
    pub fn new(layout: L, limits: Limits) -> Self {
        Self {
            registry: PinRegistry::new(layout),
            limits,
            peripherals: PeripheralPins::default(),
        }
    }

    pub fn registry(&self) -> &PinRegistry<L> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PinRegistry<L> {
        &mut self.registry
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn peripherals(&self) -> &PeripheralPins {
        &self.peripherals
    }

    /// Alle Belegungen verwerfen
    pub fn reset(&mut self) {
        self.registry.reset();
        self.peripherals = PeripheralPins::default();
    }

    /// Taster, IR, Relais, I2C und SPI (vor den LED-Bussen aufrufen)
    pub fn apply_peripherals(&mut self, config: &PeripheralConfig) -> PeripheralPins {
        self.peripherals.apply(&mut self.registry, config);
        self.peripherals
    }

    /// Default-Busse auflösen, Pins belegen und das Speicherbudget anwenden
    ///
    /// Pins von Bussen, die am Budget scheitern, werden wieder freigegeben.
    pub fn apply_defaults(&mut self, spec: DefaultBusSpec<'_>, color_order: ColorOrder) -> Result<BusPlan, ConfigError> {
        info!("No buses configured, init default");
        let resolved = DefaultBusResolver::new(spec, self.limits.max_buses, self.limits.max_leds)
            .with_color_order(color_order)
            .resolve(&mut self.registry)?;

        let outcome = BusConfigBuilder::new(self.limits.max_led_memory)
            .with_parallel_output(self.limits.parallel_output)
            .build(resolved.buses.iter().copied());

        for bus in resolved.buses.iter().skip(outcome.accepted.len()) {
            self.release_bus(bus);
        }

        Ok(BusPlan {
            source: PlanSource::Defaults,
            buses: outcome.accepted,
            total_memory: outcome.total_memory,
            dropped: outcome.dropped,
            color_orders: ColorOrderMap::new(),
            parallel_output: self.limits.parallel_output,
        })
    }

    /// Explizite Bus-Einträge übernehmen
    ///
    /// Ungültige Einträge werden übersprungen. Nur physische Busse zählen
    /// gegen `max_buses`. Pins werden hier nicht belegt, das passiert beim
    /// Anlegen der Busse über [`Self::claim_bus`].
    pub fn apply_explicit(&mut self, settings: &LedSettings) -> BusPlan {
        self.registry.release_owner(PinOwner::LedBus);

        let abl = settings.abl_milliamps_max();
        let total = settings.total_leds();
        let mut candidates = BusList::new();
        let mut skipped = 0;
        let mut physical = 0;

        for (index, record) in settings.ins.iter().flatten().enumerate() {
            if physical >= self.limits.max_buses || candidates.is_full() {
                break;
            }
            let bus = match record
                .to_descriptor(abl, total)
                .and_then(|bus| bus.validate(self.limits.max_leds).map(|()| bus))
            {
                Ok(bus) => bus,
                Err(err) => {
                    warn!("Bus #{} skipped: {}", index, err);
                    skipped += 1;
                    continue;
                }
            };
            if !bus.bus_type.is_virtual() {
                physical += 1;
            }
            // Kapazität oben geprüft
            let _ = candidates.push(bus);
        }

        if settings.rev.unwrap_or(false) {
            if let Some(first) = candidates.first_mut() {
                first.reversed = true;
            }
        }

        let parallel_output = settings.prl.unwrap_or(self.limits.parallel_output);
        let outcome = BusConfigBuilder::new(self.limits.max_led_memory)
            .with_parallel_output(parallel_output)
            .build(candidates);

        let mut color_orders = ColorOrderMap::new();
        for entry in settings.com.iter().flatten().filter(|entry| entry.len > 0) {
            if !color_orders.add(entry.start, entry.len, entry.order()) {
                warn!("Color order map full, {} mapping(s) kept", color_orders.len());
                break;
            }
        }

        BusPlan {
            source: PlanSource::Explicit,
            buses: outcome.accepted,
            total_memory: outcome.total_memory,
            dropped: outcome.dropped + skipped,
            color_orders,
            parallel_output,
        }
    }

    /// Explizite Einträge, oder Default-Busse wenn keine vorhanden sind
    pub fn apply(
        &mut self,
        settings: Option<&LedSettings>,
        defaults: DefaultBusSpec<'_>,
        color_order: ColorOrder,
    ) -> Result<BusPlan, ConfigError> {
        match settings {
            Some(settings) if settings.ins.is_some() => Ok(self.apply_explicit(settings)),
            _ => self.apply_defaults(defaults, color_order),
        }
    }

    /// Belegt die Pins aller Busse eines Plans
    ///
    /// Busse, deren Pins einem anderen Subsystem oder einem früheren Bus
    /// gehören, werden verworfen.
    /// Danach wird der Pixel-Buffer für die verbleibende Liste neu berechnet.
    /// Default-Busse sind schon belegt, das Belegen ist für denselben
    /// Besitzer idempotent.
    pub fn materialize(&mut self, plan: BusPlan) -> BusPlan {
        let mut claimed = BusList::new();
        let mut rejected = 0;
        for bus in plan.buses.iter() {
            let result = match shared_pin(&claimed, bus) {
                Some(pin) => Err(PinError::Owned {
                    pin,
                    owner: PinOwner::LedBus,
                }),
                None => self.claim_bus(bus),
            };
            match result {
                Ok(()) => {
                    // Nie mehr Busse als im Plan
                    let _ = claimed.push(*bus);
                }
                Err(err) => {
                    warn!("PIN ALLOC error for bus at pixel {}: {}", bus.start, err);
                    rejected += 1;
                }
            }
        }

        // Ohne den verworfenen Bus kann ein anderer der erste seiner Gruppe werden
        let outcome = BusConfigBuilder::new(self.limits.max_led_memory)
            .with_parallel_output(plan.parallel_output)
            .build(claimed.iter().copied());
        for bus in claimed.iter().skip(outcome.accepted.len()) {
            self.release_bus(bus);
        }

        BusPlan {
            buses: outcome.accepted,
            total_memory: outcome.total_memory,
            dropped: plan.dropped + rejected + outcome.dropped,
            ..plan
        }
    }

    /// Belegt die Pins eines Busses als LED-Bus (alles oder nichts)
    ///
    /// Virtuelle Busse haben keine GPIOs und sind immer erfolgreich.
    pub fn claim_bus(&mut self, bus: &BusDescriptor) -> Result<(), PinError> {
        if bus.bus_type.is_virtual() {
            return Ok(());
        }
        self.registry.allocate_multiple(&bus.pin_claims(), PinOwner::LedBus)
    }

    /// Gibt die Pins eines Busses frei
    pub fn release_bus(&mut self, bus: &BusDescriptor) {
        if !bus.bus_type.is_virtual() {
            self.registry.deallocate_multiple(bus.pins.as_slots(), PinOwner::LedBus);
        }
    }
}

/// Erster Pin von `bus`, den schon ein Bus aus `claimed` nutzt
fn shared_pin(claimed: &[BusDescriptor], bus: &BusDescriptor) -> Option<Pin> {
    if bus.bus_type.is_virtual() {
        return None;
    }
    claimed
        .iter()
        .filter(|other| !other.bus_type.is_virtual())
        .find_map(|other| bus.pins.iter().find(|pin| other.pins.contains(*pin)))
}

const _: () = assert!(Limits::ESP32C6.max_buses <= MAX_BUSES);

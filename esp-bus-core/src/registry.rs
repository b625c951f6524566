//! Pin-Registry: wer besitzt welchen GPIO?
//!
//! Jeder Pin hat höchstens einen Besitzer ([`PinOwner`]). Ein Subsystem kann
//! einen Pin nur belegen, wenn er frei oder bereits sein eigener ist, und nur
//! selbst wieder freigeben. Plattform-Wissen (reservierte Pins, Input-Only)
//! steckt hinter dem Trait [`GpioLayout`].

use crate::pins::{PIN_UNASSIGNED, Pin};

/// Größte unterstützte GPIO-Anzahl (ESP32-S3: 49 GPIOs)
pub const MAX_GPIO: usize = 50;

/// Subsystem, dem ein Pin gehört
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinOwner {
    #[default]
    None,
    LedBus,
    Button,
    Relay,
    I2c,
    Spi,
    Ir,
    Ethernet,
}

/// Fehler bei der Pin-Belegung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin existiert nicht, ist reserviert oder (als Ausgang) Input-Only
    Unusable(Pin),
    /// Pin gehört bereits einem anderen Subsystem
    Owned { pin: Pin, owner: PinOwner },
    /// `PinOwner::None` kann keine Pins belegen
    NoOwner,
}

/// Plattform-spezifische GPIO-Eigenschaften
pub trait GpioLayout {
    /// Anzahl GPIOs (gültige Nummern: `0..pin_count()`)
    fn pin_count(&self) -> u8;

    /// Von der Plattform belegt (Flash, PSRAM, USB ...)
    fn is_reserved(&self, pin: Pin) -> bool;

    /// Pin kann nur als Eingang genutzt werden
    fn is_input_only(&self, pin: Pin) -> bool;
}

/// ESP32-C6: GPIO0..=30, Flash an GPIO24..=30
///
/// `usb_jtag`: USB-Serial-JTAG wird für Logging genutzt (GPIO12/13).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Esp32C6Layout {
    pub usb_jtag: bool,
}

impl Default for Esp32C6Layout {
    fn default() -> Self {
        Self { usb_jtag: true }
    }
}

impl GpioLayout for Esp32C6Layout {
    fn pin_count(&self) -> u8 {
        31
    }

    fn is_reserved(&self, pin: Pin) -> bool {
        matches!(pin, 24..=30) || (self.usb_jtag && matches!(pin, 12 | 13))
    }

    fn is_input_only(&self, _pin: Pin) -> bool {
        false
    }
}

/// Klassischer ESP32: GPIO0..=39, Flash an GPIO6..=11, GPIO34..=39 nur Eingang
///
/// `psram`: WROVER-Module nutzen GPIO16/17 für den PSRAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Esp32Layout {
    pub psram: bool,
}

impl GpioLayout for Esp32Layout {
    fn pin_count(&self) -> u8 {
        40
    }

    fn is_reserved(&self, pin: Pin) -> bool {
        // 20, 24, 28..=31 sind auf dem Chip nicht herausgeführt
        matches!(pin, 6..=11 | 20 | 24 | 28..=31) || (self.psram && matches!(pin, 16 | 17))
    }

    fn is_input_only(&self, pin: Pin) -> bool {
        matches!(pin, 34..=39)
    }
}

/// Besitz-Tabelle aller GPIOs
pub struct PinRegistry<L: GpioLayout> {
    layout: L,
    owners: [PinOwner; MAX_GPIO],
}

impl<L: GpioLayout> PinRegistry<L> {
    pub fn new(layout: L) -> Self {
        Self {
            layout,
            owners: [PinOwner::None; MAX_GPIO],
        }
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Höchste GPIO-Nummer + 1 (Grenze für die Pin-Suche)
    pub fn pin_ceiling(&self) -> Pin {
        self.layout.pin_count().min(MAX_GPIO as u8)
    }

    pub fn owner(&self, pin: Pin) -> PinOwner {
        self.owners
            .get(pin as usize)
            .copied()
            .unwrap_or(PinOwner::None)
    }

    pub fn is_allocated(&self, pin: Pin) -> bool {
        self.owner(pin) != PinOwner::None
    }

    /// Pin existiert, ist nicht reserviert und (für Ausgänge) nicht Input-Only
    pub fn is_usable(&self, pin: Pin, for_output: bool) -> bool {
        if pin == PIN_UNASSIGNED || pin >= self.pin_ceiling() {
            return false;
        }
        if self.layout.is_reserved(pin) {
            return false;
        }
        !(for_output && self.layout.is_input_only(pin))
    }

    /// Belegt einen Pin für `owner`
    ///
    /// Erneutes Belegen durch denselben Besitzer ist erfolgreich.
    pub fn allocate(&mut self, pin: Pin, is_output: bool, owner: PinOwner) -> Result<(), PinError> {
        if owner == PinOwner::None {
            return Err(PinError::NoOwner);
        }
        if !self.is_usable(pin, is_output) {
            return Err(PinError::Unusable(pin));
        }
        match self.owner(pin) {
            PinOwner::None => {
                self.owners[pin as usize] = owner;
                debug!("PIN ALLOC: GPIO{} -> {}", pin, owner);
                Ok(())
            }
            current if current == owner => Ok(()),
            current => Err(PinError::Owned {
                pin,
                owner: current,
            }),
        }
    }

    /// Gibt einen Pin frei, aber nur wenn er `owner` gehört
    ///
    /// Liefert `true` wenn der Pin danach frei ist.
    pub fn deallocate(&mut self, pin: Pin, owner: PinOwner) -> bool {
        match self.owner(pin) {
            PinOwner::None => true,
            current if current == owner => {
                self.owners[pin as usize] = PinOwner::None;
                debug!("PIN DEALLOC: GPIO{} ({})", pin, owner);
                true
            }
            _ => false,
        }
    }

    /// Alles-oder-nichts Belegung mehrerer Pins (`(pin, is_output)`)
    ///
    /// Nicht belegte Slots ([`PIN_UNASSIGNED`]) werden übersprungen. Schlägt
    /// ein Pin fehl, werden die in diesem Aufruf neu belegten Pins wieder
    /// freigegeben.
    pub fn allocate_multiple(&mut self, pins: &[(Pin, bool)], owner: PinOwner) -> Result<(), PinError> {
        let mut fresh: u64 = 0;
        for &(pin, is_output) in pins {
            if pin == PIN_UNASSIGNED {
                continue;
            }
            let was_free = !self.is_allocated(pin);
            if let Err(err) = self.allocate(pin, is_output, owner) {
                self.rollback(fresh, owner);
                return Err(err);
            }
            if was_free {
                fresh |= 1u64 << pin;
            }
        }
        Ok(())
    }

    pub fn deallocate_multiple(&mut self, pins: &[Pin], owner: PinOwner) -> bool {
        pins.iter()
            .filter(|pin| **pin != PIN_UNASSIGNED)
            .fold(true, |all, pin| self.deallocate(*pin, owner) && all)
    }

    /// Gibt alle Pins eines Subsystems frei
    pub fn release_owner(&mut self, owner: PinOwner) {
        for slot in self.owners.iter_mut().filter(|slot| **slot == owner) {
            *slot = PinOwner::None;
        }
    }

    /// Anzahl Pins im Besitz von `owner`
    pub fn count_owned(&self, owner: PinOwner) -> usize {
        self.owners.iter().filter(|slot| **slot == owner).count()
    }

    /// Alle Pins freigeben (neuer Boot-Zyklus)
    pub fn reset(&mut self) {
        self.owners = [PinOwner::None; MAX_GPIO];
    }

    fn rollback(&mut self, fresh: u64, owner: PinOwner) {
        for pin in 0..MAX_GPIO as Pin {
            if fresh & (1u64 << pin) != 0 {
                self.deallocate(pin, owner);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PinRegistry<Esp32Layout> {
        PinRegistry::new(Esp32Layout::default())
    }

    #[test]
    fn test_usable_rejects_flash_and_out_of_range() {
        let reg = registry();
        assert!(reg.is_usable(2, true));
        assert!(!reg.is_usable(6, false));
        assert!(!reg.is_usable(40, false));
        assert!(!reg.is_usable(PIN_UNASSIGNED, false));
    }

    #[test]
    fn test_input_only_pin_not_usable_as_output() {
        let reg = registry();
        assert!(reg.is_usable(35, false));
        assert!(!reg.is_usable(35, true));
    }

    #[test]
    fn test_allocate_same_owner_is_idempotent() {
        let mut reg = registry();
        assert_eq!(reg.allocate(4, false, PinOwner::Button), Ok(()));
        assert_eq!(reg.allocate(4, false, PinOwner::Button), Ok(()));
        assert_eq!(
            reg.allocate(4, true, PinOwner::LedBus),
            Err(PinError::Owned {
                pin: 4,
                owner: PinOwner::Button
            })
        );
    }

    #[test]
    fn test_deallocate_requires_owner() {
        let mut reg = registry();
        reg.allocate(4, false, PinOwner::Button).unwrap();
        assert!(!reg.deallocate(4, PinOwner::Relay));
        assert_eq!(reg.owner(4), PinOwner::Button);
        assert!(reg.deallocate(4, PinOwner::Button));
        assert!(!reg.is_allocated(4));
    }

    #[test]
    fn test_allocate_multiple_rolls_back() {
        let mut reg = registry();
        reg.allocate(22, true, PinOwner::Relay).unwrap();
        let result = reg.allocate_multiple(&[(21, true), (22, true)], PinOwner::I2c);
        assert!(result.is_err());
        assert!(!reg.is_allocated(21));
        assert_eq!(reg.owner(22), PinOwner::Relay);
    }

    #[test]
    fn test_allocate_multiple_keeps_previously_owned_pins() {
        let mut reg = registry();
        reg.allocate(18, true, PinOwner::Spi).unwrap();
        let result = reg.allocate_multiple(&[(18, true), (19, true), (6, true)], PinOwner::Spi);
        assert_eq!(result, Err(PinError::Unusable(6)));
        assert_eq!(reg.owner(18), PinOwner::Spi);
        assert!(!reg.is_allocated(19));
    }
}

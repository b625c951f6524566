//! Pins der übrigen Peripherie (Taster, IR, Relais, I2C, SPI)
//!
//! Diese Subsysteme belegen ihre Pins mit eigenem [`PinOwner`], damit eine
//! spätere LED-Konfiguration sie nicht stillschweigend übernimmt.

use heapless::Vec;

use crate::pins::{PIN_UNASSIGNED, Pin};
use crate::registry::{GpioLayout, PinOwner, PinRegistry};

/// Maximale Anzahl Taster
pub const MAX_BUTTONS: usize = 4;

/// Gewünschte Peripherie-Pins (negativ = deaktiviert)
///
/// `None` bedeutet: Feld nicht konfiguriert, aktuelle Belegung bleibt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeripheralConfig {
    pub buttons: Option<Vec<i16, MAX_BUTTONS>>,
    pub ir: Option<i16>,
    pub relay: Option<i16>,
    /// `[sda, scl]`
    pub i2c: Option<[i16; 2]>,
    /// `[mosi, sclk, miso]`, MISO optional
    pub spi: Option<[i16; 3]>,
}

/// Tatsächlich belegte Peripherie-Pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeripheralPins {
    pub buttons: [Option<Pin>; MAX_BUTTONS],
    pub ir: Option<Pin>,
    pub relay: Option<Pin>,
    pub i2c: Option<[Pin; 2]>,
    pub spi: Option<[Pin; 3]>,
}

/// Negativ oder zu groß → nicht konfiguriert
fn configured(pin: i16) -> Option<Pin> {
    Pin::try_from(pin).ok().filter(|pin| *pin != PIN_UNASSIGNED)
}

impl PeripheralPins {
    /// Übernimmt eine neue Peripherie-Konfiguration
    ///
    /// Alte Pins eines Subsystems werden nur freigegeben, wenn das Subsystem
    /// neu konfiguriert wird. Pins, die nicht belegt werden können, bleiben
    /// unbelegt (`None`); das Subsystem ist dann deaktiviert.
    pub fn apply<L: GpioLayout>(&mut self, registry: &mut PinRegistry<L>, config: &PeripheralConfig) {
        if let Some(buttons) = &config.buttons {
            self.apply_buttons(registry, buttons);
        }
        if let Some(pin) = config.ir {
            self.ir = Self::reassign(registry, self.ir, pin, false, PinOwner::Ir);
        }
        if let Some(pin) = config.relay {
            self.relay = Self::reassign(registry, self.relay, pin, true, PinOwner::Relay);
        }
        if let Some([sda, scl]) = config.i2c {
            if let Some(old) = self.i2c.take() {
                registry.deallocate_multiple(&old, PinOwner::I2c);
            }
            self.i2c = match (configured(sda), configured(scl)) {
                (Some(sda), Some(scl)) => registry
                    .allocate_multiple(&[(sda, true), (scl, true)], PinOwner::I2c)
                    .ok()
                    .map(|()| [sda, scl]),
                _ => None,
            };
        }
        if let Some([mosi, sclk, miso]) = config.spi {
            if let Some(old) = self.spi.take() {
                registry.deallocate_multiple(&old, PinOwner::Spi);
            }
            let miso = configured(miso).unwrap_or(PIN_UNASSIGNED);
            self.spi = match (configured(mosi), configured(sclk)) {
                (Some(mosi), Some(sclk)) => registry
                    .allocate_multiple(&[(mosi, true), (sclk, true), (miso, false)], PinOwner::Spi)
                    .ok()
                    .map(|()| [mosi, sclk, miso]),
                _ => None,
            };
        }
    }

    fn apply_buttons<L: GpioLayout>(&mut self, registry: &mut PinRegistry<L>, buttons: &[i16]) {
        for pin in self.buttons.iter_mut() {
            if let Some(old) = pin.take() {
                registry.deallocate(old, PinOwner::Button);
            }
        }
        for (index, (slot, wanted)) in self.buttons.iter_mut().zip(buttons).enumerate() {
            let Some(pin) = configured(*wanted) else {
                continue;
            };
            match registry.allocate(pin, false, PinOwner::Button) {
                Ok(()) => *slot = Some(pin),
                Err(err) => warn!("PIN ALLOC error: GPIO{} for button #{}: {}", pin, index, err),
            }
        }
    }

    fn reassign<L: GpioLayout>(
        registry: &mut PinRegistry<L>,
        old: Option<Pin>,
        wanted: i16,
        is_output: bool,
        owner: PinOwner,
    ) -> Option<Pin> {
        if let Some(old) = old {
            registry.deallocate(old, owner);
        }
        let pin = configured(wanted)?;
        match registry.allocate(pin, is_output, owner) {
            Ok(()) => Some(pin),
            Err(err) => {
                warn!("PIN ALLOC error: GPIO{} for {}: {}", pin, owner, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Esp32Layout;

    fn buttons(pins: &[i16]) -> Option<Vec<i16, MAX_BUTTONS>> {
        let mut list = Vec::new();
        for p in pins {
            list.push(*p).unwrap();
        }
        Some(list)
    }

    #[test]
    fn test_buttons_are_reassigned() {
        let mut reg = PinRegistry::new(Esp32Layout::default());
        let mut pins = PeripheralPins::default();
        pins.apply(&mut reg, &PeripheralConfig { buttons: buttons(&[0, -1, 35]), ..Default::default() });
        assert_eq!(pins.buttons[0], Some(0));
        assert_eq!(pins.buttons[1], None);
        // Taster sind Eingänge, Input-Only ist erlaubt
        assert_eq!(pins.buttons[2], Some(35));

        pins.apply(&mut reg, &PeripheralConfig { buttons: buttons(&[4]), ..Default::default() });
        assert_eq!(pins.buttons, [Some(4), None, None, None]);
        assert!(!reg.is_allocated(0));
        assert!(!reg.is_allocated(35));
    }

    #[test]
    fn test_relay_needs_output_pin() {
        let mut reg = PinRegistry::new(Esp32Layout::default());
        let mut pins = PeripheralPins::default();
        pins.apply(&mut reg, &PeripheralConfig { relay: Some(36), ..Default::default() });
        assert_eq!(pins.relay, None);
        pins.apply(&mut reg, &PeripheralConfig { relay: Some(12), ..Default::default() });
        assert_eq!(pins.relay, Some(12));
        assert_eq!(reg.owner(12), PinOwner::Relay);
    }

    #[test]
    fn test_spi_without_miso() {
        let mut reg = PinRegistry::new(Esp32Layout::default());
        let mut pins = PeripheralPins::default();
        pins.apply(&mut reg, &PeripheralConfig { spi: Some([23, 18, -1]), ..Default::default() });
        assert_eq!(pins.spi, Some([23, 18, PIN_UNASSIGNED]));
        assert_eq!(reg.count_owned(PinOwner::Spi), 2);
    }

    #[test]
    fn test_i2c_conflict_leaves_both_free() {
        let mut reg = PinRegistry::new(Esp32Layout::default());
        reg.allocate(22, true, PinOwner::LedBus).unwrap();
        let mut pins = PeripheralPins::default();
        pins.apply(&mut reg, &PeripheralConfig { i2c: Some([21, 22]), ..Default::default() });
        assert_eq!(pins.i2c, None);
        assert!(!reg.is_allocated(21));
    }
}

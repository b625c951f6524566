//! Bus-Einträge im gespeicherten Format
//!
//! Feldnamen und Codes entsprechen der `hw.led` Sektion der
//! Konfigurationsdatei. Mit Feature `serde` lassen sich die Strukturen direkt
//! (de)serialisieren. Fehlende Felder sind `None` und bekommen beim Umwandeln
//! ihre Standardwerte.

use heapless::Vec;

use crate::builder::MAX_BUSES;
use crate::bus_type::{BusType, OUTPUT_MAX_PINS};
use crate::color_order::{ColorOrder, MAX_COLOR_ORDER_MAPPINGS, pack_order, unpack_order};
use crate::descriptor::{ABL_MILLIAMPS_DEFAULT, AutoWhiteMode, BusDescriptor, LED_MILLIAMPS_DEFAULT};
use crate::error::RecordError;
use crate::pins::PinSpec;

/// Bit 7 des gespeicherten Typ-Codes: Refresh im ausgeschalteten Zustand
const REFRESH_FLAG: u8 = 0x80;

/// Ein Eintrag aus `hw.led.ins`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusRecord {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub start: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub len: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pin: Vec<i16, OUTPUT_MAX_PINS>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub order: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub rev: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub skip: Option<u8>,
    #[cfg_attr(feature = "serde", serde(rename = "type", default, skip_serializing_if = "Option::is_none"))]
    pub bus_type: Option<u8>,
    #[cfg_attr(feature = "serde", serde(rename = "ref", default, skip_serializing_if = "Option::is_none"))]
    pub refresh: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub rgbwm: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub freq: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub ledma: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub maxpwr: Option<u16>,
}

/// Ein Eintrag aus `hw.com`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorOrderRecord {
    #[cfg_attr(feature = "serde", serde(default))]
    pub start: u16,
    #[cfg_attr(feature = "serde", serde(default))]
    pub len: u16,
    #[cfg_attr(feature = "serde", serde(default))]
    pub order: u8,
}

/// Die `hw.led` Sektion
///
/// `ins == None` bedeutet: keine Bus-Konfiguration vorhanden → Default-Busse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedSettings {
    /// Gesamtzahl Pixel (für die Stromaufteilung pro Ausgang)
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub total: Option<u16>,
    /// Globale Stromgrenze in mA
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub maxpwr: Option<u16>,
    /// Parallel-Ausgabe für Single-Wire Busse
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub prl: Option<bool>,
    /// Alte globale Einstellung: ersten Bus umkehren
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub rev: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub ins: Option<Vec<BusRecord, MAX_BUSES>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub com: Option<Vec<ColorOrderRecord, MAX_COLOR_ORDER_MAPPINGS>>,
}

impl LedSettings {
    pub fn abl_milliamps_max(&self) -> u16 {
        self.maxpwr.unwrap_or(ABL_MILLIAMPS_DEFAULT)
    }

    /// Gesamtzahl Pixel; ohne Angabe die Summe aller Einträge
    pub fn total_leds(&self) -> u16 {
        self.total.unwrap_or_else(|| {
            self.ins
                .iter()
                .flatten()
                .map(|record| record.len.unwrap_or(1))
                .fold(0u16, u16::saturating_add)
        })
    }
}

impl BusRecord {
    /// Wandelt den Eintrag in eine Bus-Beschreibung
    ///
    /// Prüft nur Typ und Pins; den Pixelbereich prüft
    /// [`BusDescriptor::validate`].
    pub fn to_descriptor(&self, abl_milliamps_max: u16, total_leds: u16) -> Result<BusDescriptor, RecordError> {
        if self.pin.is_empty() {
            return Err(RecordError::NoPins);
        }
        let code = self.bus_type.unwrap_or(BusType::Ws2812Rgb.code());
        let bus_type = BusType::from_code(code & !REFRESH_FLAG).ok_or(RecordError::UnknownType(code))?;

        let mut length = self.len.unwrap_or(1);
        if bus_type.is_analog() && length == 0 {
            length = 1;
        }
        let (color_order, white_swap) = unpack_order(self.order.unwrap_or(0));

        let mut bus = BusDescriptor::new(bus_type, PinSpec::from_config(&self.pin), self.start.unwrap_or(0), length);
        bus.color_order = color_order;
        bus.white_swap = white_swap;
        bus.reversed = self.rev.unwrap_or(false);
        bus.skip = self.skip.unwrap_or(0);
        bus.refresh_on_off = self.refresh.unwrap_or(code & REFRESH_FLAG != 0);
        bus.auto_white = AutoWhiteMode::from_code(self.rgbwm.unwrap_or(0));
        bus.frequency = self.freq.unwrap_or(0);

        if bus_type.is_analog() || bus_type.is_virtual() {
            bus.milliamps_per_led = 0;
            bus.milliamps_max = 0;
        } else {
            bus.milliamps_per_led = self.ledma.unwrap_or(LED_MILLIAMPS_DEFAULT);
            bus.milliamps_max = self
                .maxpwr
                .unwrap_or_else(|| share_of_current(abl_milliamps_max, length, total_leds));
        }
        Ok(bus)
    }
}

/// Anteil eines Ausgangs an der globalen Stromgrenze (nach Pixelanzahl)
fn share_of_current(abl_milliamps_max: u16, length: u16, total_leds: u16) -> u16 {
    if total_leds == 0 {
        return abl_milliamps_max;
    }
    let share = u32::from(abl_milliamps_max) * u32::from(length) / u32::from(total_leds);
    u16::try_from(share).unwrap_or(u16::MAX)
}

impl From<&BusDescriptor> for BusRecord {
    fn from(bus: &BusDescriptor) -> Self {
        let mut pin = Vec::new();
        for p in bus.pins.iter() {
            // Kapazität == OUTPUT_MAX_PINS, kann nicht überlaufen
            let _ = pin.push(i16::from(p));
        }
        Self {
            start: Some(bus.start),
            len: Some(bus.length),
            pin,
            order: Some(pack_order(bus.color_order, bus.white_swap)),
            rev: Some(bus.reversed),
            skip: Some(bus.skip),
            bus_type: Some(bus.bus_type.code()),
            refresh: Some(bus.refresh_on_off),
            rgbwm: Some(bus.auto_white as u8),
            freq: Some(bus.frequency),
            ledma: Some(bus.milliamps_per_led),
            maxpwr: Some(bus.milliamps_max),
        }
    }
}

impl ColorOrderRecord {
    pub fn order(&self) -> ColorOrder {
        unpack_order(self.order).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_order::WhiteSwap;

    fn record(pins: &[i16]) -> BusRecord {
        let mut pin = Vec::new();
        for p in pins {
            pin.push(*p).unwrap();
        }
        BusRecord {
            pin,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let bus = record(&[2]).to_descriptor(850, 100).unwrap();
        assert_eq!(bus.bus_type, BusType::Ws2812Rgb);
        assert_eq!(bus.length, 1);
        assert_eq!(bus.start, 0);
        assert_eq!(bus.milliamps_per_led, LED_MILLIAMPS_DEFAULT);
        // 850 mA * 1 / 100
        assert_eq!(bus.milliamps_max, 8);
    }

    #[test]
    fn test_packed_fields_are_unpacked() {
        let mut rec = record(&[2]);
        rec.bus_type = Some(0x80 | 30);
        rec.order = Some(0x12);
        let bus = rec.to_descriptor(850, 0).unwrap();
        assert_eq!(bus.bus_type, BusType::Sk6812Rgbw);
        assert!(bus.refresh_on_off);
        assert_eq!(bus.color_order, ColorOrder::Brg);
        assert_eq!(bus.white_swap, WhiteSwap::Blue);
        assert_eq!(bus.milliamps_max, 850);
    }

    #[test]
    fn test_analog_has_no_current_limit() {
        let mut rec = record(&[4, 5]);
        rec.bus_type = Some(42);
        rec.ledma = Some(30);
        rec.maxpwr = Some(500);
        let bus = rec.to_descriptor(850, 10).unwrap();
        assert_eq!(bus.milliamps_per_led, 0);
        assert_eq!(bus.milliamps_max, 0);
    }

    #[test]
    fn test_rejects_empty_pins_and_unknown_type() {
        assert_eq!(record(&[]).to_descriptor(850, 1), Err(RecordError::NoPins));
        let mut rec = record(&[2]);
        rec.bus_type = Some(7);
        assert_eq!(rec.to_descriptor(850, 1), Err(RecordError::UnknownType(7)));
    }

    #[test]
    fn test_descriptor_repacks_for_saving() {
        let mut rec = record(&[16, 17]);
        rec.bus_type = Some(BusType::Apa102.code() | 0x80);
        rec.len = Some(60);
        rec.order = Some(0x31);
        let bus = rec.to_descriptor(850, 60).unwrap();
        let saved = BusRecord::from(&bus);
        assert_eq!(saved.bus_type, Some(BusType::Apa102.code()));
        assert_eq!(saved.refresh, Some(true));
        assert_eq!(saved.order, Some(0x31));
        assert_eq!(saved.pin.as_slice(), &[16, 17]);
    }
}

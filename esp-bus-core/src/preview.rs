//! Test-Anzeige nach dem Boot
//!
//! Lässt das erste Pixel des ersten Single-Wire Busses nacheinander rot,
//! grün und blau leuchten. Stimmt die konfigurierte Farbreihenfolge nicht,
//! sieht man das sofort am Strip.

use rgb::RGB8;

use crate::color_order::{ColorOrder, ColorOrderMap};
use crate::context::BusPlan;
use crate::descriptor::BusDescriptor;
use crate::pins::Pin;
use crate::traits::{LedError, SmartLedWriter};

/// Zyklus der Test-Anzeige (logische Farben, Helligkeit 1)
const PREVIEW_SEQUENCE: [RGB8; 3] = [
    RGB8 { r: 1, g: 0, b: 0 },
    RGB8 { r: 0, g: 1, b: 0 },
    RGB8 { r: 0, g: 0, b: 1 },
];

/// Test-Anzeige für einen Bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusPreview {
    bus: BusDescriptor,
    order: ColorOrder,
    brightness: u8,
    step: usize,
}

impl BusPreview {
    /// Erster Single-Wire Bus des Plans, `None` wenn es keinen gibt
    ///
    /// Die Farbreihenfolge des ersten Pixels kann durch die
    /// Farbreihenfolge-Map überschrieben sein.
    pub fn for_plan(plan: &BusPlan, brightness: u8) -> Option<Self> {
        let bus = plan
            .buses
            .iter()
            .find(|bus| {
                bus.bus_type.is_digital() && !bus.bus_type.is_two_pin() && bus.pins.get(0).is_some()
            })?;
        Some(Self::new(*bus, &plan.color_orders, brightness))
    }

    /// Daten-Pin (Slot 0) des Busses
    pub fn data_pin(&self) -> Option<Pin> {
        self.bus.pins.get(0)
    }

    pub fn new(bus: BusDescriptor, color_orders: &ColorOrderMap, brightness: u8) -> Self {
        Self {
            order: color_orders.order_for(bus.start, bus.color_order),
            bus,
            brightness,
            step: 0,
        }
    }

    pub fn bus(&self) -> &BusDescriptor {
        &self.bus
    }

    pub fn order(&self) -> ColorOrder {
        self.order
    }

    /// Nächste logische Farbe (ohne Umordnung)
    pub fn next_color(&mut self) -> RGB8 {
        let base = PREVIEW_SEQUENCE[self.step % PREVIEW_SEQUENCE.len()];
        self.step = self.step.wrapping_add(1);
        RGB8 {
            r: base.r * self.brightness,
            g: base.g * self.brightness,
            b: base.b * self.brightness,
        }
    }

    /// Schreibt die nächste Farbe in Leitungs-Reihenfolge
    ///
    /// Gibt die logische Farbe zurück (für das Log).
    pub fn advance<W: SmartLedWriter>(&mut self, writer: &mut W) -> Result<RGB8, LedError> {
        let color = self.next_color();
        writer.write(self.order.reorder(color))?;
        Ok(color)
    }
}

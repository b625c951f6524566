//! Farbreihenfolge und Farbreihenfolge-Map
//!
//! Im gespeicherten Format enthält der Order-Code im unteren Nibble die
//! Reihenfolge und im oberen Nibble den Weiß-Kanal-Tausch. Hier sind beide
//! getrennte Felder.

use heapless::Vec;
use rgb::RGB8;

/// Maximale Anzahl Einträge der Farbreihenfolge-Map
pub const MAX_COLOR_ORDER_MAPPINGS: usize = 10;

/// Kanal-Reihenfolge auf der Datenleitung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ColorOrder {
    #[default]
    Grb = 0,
    Rgb = 1,
    Brg = 2,
    Rbg = 3,
    Bgr = 4,
    Gbr = 5,
}

/// Tausch des Weiß-Kanals mit einem Farbkanal (RGBW-Strips)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WhiteSwap {
    #[default]
    None = 0,
    Blue = 1,
    Green = 2,
    Red = 3,
}

impl ColorOrder {
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Grb,
            1 => Self::Rgb,
            2 => Self::Brg,
            3 => Self::Rbg,
            4 => Self::Bgr,
            5 => Self::Gbr,
            _ => return None,
        })
    }

    /// Ordnet eine Farbe so um, dass ein GRB-Treiber sie in dieser
    /// Reihenfolge auf die Leitung schreibt
    ///
    /// ```
    /// # use rgb::RGB8;
    /// # use esp_bus_core::ColorOrder;
    /// let red = RGB8 { r: 10, g: 0, b: 0 };
    /// // RGB-Strip an GRB-Treiber: erstes Byte muss Rot sein
    /// assert_eq!(ColorOrder::Rgb.reorder(red), RGB8 { r: 0, g: 10, b: 0 });
    /// ```
    pub fn reorder(self, color: RGB8) -> RGB8 {
        let wire = match self {
            Self::Grb => [color.g, color.r, color.b],
            Self::Rgb => [color.r, color.g, color.b],
            Self::Brg => [color.b, color.r, color.g],
            Self::Rbg => [color.r, color.b, color.g],
            Self::Bgr => [color.b, color.g, color.r],
            Self::Gbr => [color.g, color.b, color.r],
        };
        // GRB-Treiber sendet g, r, b
        RGB8 {
            g: wire[0],
            r: wire[1],
            b: wire[2],
        }
    }
}

impl WhiteSwap {
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Blue,
            2 => Self::Green,
            3 => Self::Red,
            _ => Self::None,
        }
    }
}

/// Zerlegt den gespeicherten Order-Code in Reihenfolge und Weiß-Tausch
///
/// Unbekannte Reihenfolgen fallen auf GRB zurück.
pub fn unpack_order(code: u8) -> (ColorOrder, WhiteSwap) {
    (
        ColorOrder::from_code(code & 0x0F).unwrap_or_default(),
        WhiteSwap::from_code(code >> 4),
    )
}

pub fn pack_order(order: ColorOrder, swap: WhiteSwap) -> u8 {
    ((swap as u8) << 4) | order as u8
}

/// Eintrag der Farbreihenfolge-Map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorOrderMapping {
    pub start: u16,
    pub len: u16,
    pub order: ColorOrder,
}

/// Überschreibt die Farbreihenfolge für Pixelbereiche, unabhängig vom Bus
#[derive(Debug, Clone, Default)]
pub struct ColorOrderMap {
    mappings: Vec<ColorOrderMapping, MAX_COLOR_ORDER_MAPPINGS>,
}

impl ColorOrderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fügt einen Bereich hinzu; `false` wenn voll oder `len == 0`
    pub fn add(&mut self, start: u16, len: u16, order: ColorOrder) -> bool {
        if len == 0 {
            return false;
        }
        self.mappings
            .push(ColorOrderMapping { start, len, order })
            .is_ok()
    }

    /// Reihenfolge für ein Pixel; erster passender Eintrag gewinnt
    pub fn order_for(&self, pixel: u16, default: ColorOrder) -> ColorOrder {
        self.mappings
            .iter()
            .find(|m| pixel >= m.start && u32::from(pixel) < u32::from(m.start) + u32::from(m.len))
            .map_or(default, |m| m.order)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorOrderMapping> {
        self.mappings.iter()
    }

    pub fn clear(&mut self) {
        self.mappings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grb_reorder_is_identity() {
        let color = RGB8 { r: 1, g: 2, b: 3 };
        assert_eq!(ColorOrder::Grb.reorder(color), color);
    }

    #[test]
    fn test_unpack_and_pack_order() {
        let (order, swap) = unpack_order(0x21);
        assert_eq!(order, ColorOrder::Rgb);
        assert_eq!(swap, WhiteSwap::Green);
        assert_eq!(pack_order(order, swap), 0x21);
        assert_eq!(unpack_order(0x0F).0, ColorOrder::Grb);
    }

    #[test]
    fn test_map_lookup_and_capacity() {
        let mut map = ColorOrderMap::new();
        assert!(!map.add(0, 0, ColorOrder::Rgb));
        assert!(map.add(10, 5, ColorOrder::Bgr));
        assert_eq!(map.order_for(9, ColorOrder::Grb), ColorOrder::Grb);
        assert_eq!(map.order_for(14, ColorOrder::Grb), ColorOrder::Bgr);
        assert_eq!(map.order_for(15, ColorOrder::Grb), ColorOrder::Grb);

        for i in 1..MAX_COLOR_ORDER_MAPPINGS as u16 {
            assert!(map.add(100 * i, 1, ColorOrder::Rgb));
        }
        assert!(!map.add(5000, 1, ColorOrder::Rgb));
        assert_eq!(map.len(), MAX_COLOR_ORDER_MAPPINGS);
    }
}

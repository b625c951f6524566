//! Fehler-Typen der Bus-Konfiguration
//!
//! Keiner dieser Fehler bricht den Boot ab: ein fehlerhafter Eintrag wird
//! übersprungen, eine ungültige Default-Konfiguration wird abgelehnt.

/// Grund, warum ein expliziter Bus-Eintrag übersprungen wurde
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Leere Pin-Liste
    NoPins,
    /// Weniger Pins als der Bus-Typ benötigt
    TooFewPins { required: u8, given: u8 },
    /// Typ-Code nicht im Katalog
    UnknownType(u8),
    /// Länge 0 bei einem digitalen oder virtuellen Bus
    ZeroLength,
    /// `start + length` liegt hinter der maximalen Pixelanzahl
    OutOfRange { end: u32, max: u16 },
}

/// Ungültige Default-Konfiguration (zur Laufzeit übergeben)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Pin-Liste passt nicht zu den Pin-Anforderungen der Typen
    Unsatisfiable { required: u16, available: u16 },
    /// Keine Typen oder keine Pixelanzahlen angegeben
    Empty,
}

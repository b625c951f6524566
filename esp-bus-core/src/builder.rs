//! Bus-Liste mit Speicherbudget zusammenstellen
//!
//! Die Kandidaten werden in ihrer Reihenfolge übernommen, bis der nächste
//! das Budget sprengen würde. Ab dort wird abgeschnitten (kein Umsortieren).

use heapless::Vec;

use crate::descriptor::BusDescriptor;

/// Maximale Anzahl Busse in einer Liste (physisch + virtuell)
pub const MAX_BUSES: usize = 16;

/// Geordnete Liste von Bus-Beschreibungen
pub type BusList = Vec<BusDescriptor, MAX_BUSES>;

/// Warum die Liste abgeschnitten wurde
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DropReason {
    /// Pixel-Buffer hätte `max_led_memory` überschritten
    OutOfMemory,
    /// Mehr Kandidaten als [`MAX_BUSES`]
    TooManyBuses,
}

/// Ergebnis von [`BusConfigBuilder::build`]
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    pub accepted: BusList,
    /// Summe der Pixel-Buffer aller übernommenen Busse in Bytes
    pub total_memory: usize,
    /// Anzahl verworfener Kandidaten (Suffix der Eingabe)
    pub dropped: usize,
    pub drop_reason: Option<DropReason>,
    /// Erster verworfener Kandidat (für die Diagnose)
    pub first_dropped: Option<BusDescriptor>,
}

/// Übernimmt Kandidaten bis zum Speicherlimit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfigBuilder {
    max_memory: usize,
    parallel_output: bool,
}

impl BusConfigBuilder {
    pub const fn new(max_memory: usize) -> Self {
        Self {
            max_memory,
            parallel_output: false,
        }
    }

    /// Single-Wire Busse teilen sich einen Sende-Buffer (Parallel-Ausgabe)
    pub const fn with_parallel_output(mut self, enabled: bool) -> Self {
        self.parallel_output = enabled;
        self
    }

    pub const fn max_memory(&self) -> usize {
        self.max_memory
    }

    pub fn build<I>(&self, candidates: I) -> BuildOutcome
    where
        I: IntoIterator<Item = BusDescriptor>,
    {
        let mut outcome = BuildOutcome::default();
        let mut grouped_count = 0usize;
        let mut candidates = candidates.into_iter();

        while let Some(bus) = candidates.next() {
            let grouped = bus.bus_type.is_digital() && !bus.bus_type.is_two_pin();
            let first_of_group = self.parallel_output && grouped && grouped_count == 0;
            let cost = bus.memory_usage(first_of_group);

            if outcome.total_memory + cost > self.max_memory {
                warn!(
                    "Out of LED memory! Bus {} ({} px) #{} not created.",
                    bus.bus_type.code(),
                    bus.length,
                    outcome.accepted.len()
                );
                outcome.dropped = 1 + candidates.by_ref().count();
                outcome.drop_reason = Some(DropReason::OutOfMemory);
                outcome.first_dropped = Some(bus);
                break;
            }
            if let Err(bus) = outcome.accepted.push(bus) {
                warn!("Too many buses, #{} not created.", MAX_BUSES);
                outcome.dropped = 1 + candidates.by_ref().count();
                outcome.drop_reason = Some(DropReason::TooManyBuses);
                outcome.first_dropped = Some(bus);
                break;
            }
            if grouped {
                grouped_count += 1;
            }
            outcome.total_memory += cost;
        }

        info!("LED buffer size: {}B/{}B", outcome.total_memory, self.max_memory);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus_type::BusType;
    use crate::pins::PinSpec;

    fn strip(pin: u8, length: u16) -> BusDescriptor {
        BusDescriptor::new(BusType::Ws2812Rgb, PinSpec::from_slice(&[pin]), 0, length)
    }

    #[test]
    fn test_truncates_at_budget() {
        let builder = BusConfigBuilder::new(2048);
        let outcome = builder.build([strip(1, 300), strip(2, 300), strip(3, 300)]);
        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.total_memory, 1800);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.drop_reason, Some(DropReason::OutOfMemory));
        assert_eq!(outcome.first_dropped.map(|bus| bus.pins), Some(PinSpec::from_slice(&[3])));
    }

    #[test]
    fn test_exact_budget_is_accepted() {
        let outcome = BusConfigBuilder::new(900).build([strip(1, 300)]);
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.drop_reason, None);
    }

    #[test]
    fn test_no_refill_after_drop() {
        // Der dritte Bus würde passen, kommt aber nach dem verworfenen
        let outcome = BusConfigBuilder::new(1000).build([strip(1, 200), strip(2, 200), strip(3, 10)]);
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.dropped, 2);
        assert_eq!(outcome.total_memory, 600);
    }

    #[test]
    fn test_list_capacity_limits_bus_count() {
        let candidates = (0..MAX_BUSES as u8 + 2).map(|pin| strip(pin, 1));
        let outcome = BusConfigBuilder::new(10_000).build(candidates);
        assert_eq!(outcome.accepted.len(), MAX_BUSES);
        assert_eq!(outcome.dropped, 2);
        assert_eq!(outcome.drop_reason, Some(DropReason::TooManyBuses));
        assert_eq!(outcome.total_memory, MAX_BUSES * 3);
        assert_eq!(
            outcome.first_dropped.map(|bus| bus.pins),
            Some(PinSpec::from_slice(&[MAX_BUSES as u8]))
        );
    }

    #[test]
    fn test_analog_buses_are_free() {
        let pwm = BusDescriptor::new(BusType::Analog3Ch, PinSpec::from_slice(&[4, 5, 6]), 0, 1);
        let outcome = BusConfigBuilder::new(0).build([pwm, pwm]);
        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.total_memory, 0);
    }

    #[test]
    fn test_parallel_output_charges_first_of_group() {
        let builder = BusConfigBuilder::new(10_000).with_parallel_output(true);
        let clocked = BusDescriptor::new(BusType::Apa102, PinSpec::from_slice(&[7, 8]), 0, 100);
        let outcome = builder.build([clocked, strip(1, 100), strip(2, 100)]);
        // 2-Pin: 300, erster Single-Wire: 600, zweiter: 300
        assert_eq!(outcome.total_memory, 1200);
    }
}

//! Integration Tests für die Test-Anzeige
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockLedWriter

use esp_bus_core::{
    AllocatorContext, BusPreview, BusType, ColorOrder, DefaultBusSpec, Esp32C6Layout, LedError, Limits,
    SmartLedWriter,
};
use rgb::RGB8;

// ============================================================================
// Mock LED Writer
// ============================================================================

#[derive(Default)]
pub struct MockLedWriter {
    pub last_color: Option<RGB8>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl MockLedWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SmartLedWriter for MockLedWriter {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_color = Some(color);
        self.write_count += 1;
        Ok(())
    }
}

fn preview_for(types: &[BusType], pins: &[u8], order: ColorOrder) -> Option<BusPreview> {
    let mut ctx = AllocatorContext::new(Esp32C6Layout::default(), Limits::ESP32C6);
    let plan = ctx
        .apply_defaults(DefaultBusSpec::new(types, pins, &[10]), order)
        .unwrap();
    BusPreview::for_plan(&plan, 10)
}

// ============================================================================
// Tests: MockLedWriter
// ============================================================================

#[test]
fn test_mock_led_writer_write() {
    let mut mock = MockLedWriter::new();
    let color = RGB8 { r: 10, g: 0, b: 0 };

    assert_eq!(mock.write_count, 0);
    assert_eq!(mock.last_color, None);

    mock.write(color).unwrap();

    assert_eq!(mock.write_count, 1);
    assert_eq!(mock.last_color, Some(color));
}

#[test]
fn test_mock_led_writer_fail() {
    let mut mock = MockLedWriter::new();
    mock.fail_next_write = true;

    let result = mock.write(RGB8 { r: 10, g: 0, b: 0 });
    assert_eq!(result, Err(LedError::WriteFailed));
    assert_eq!(mock.write_count, 0);
    assert_eq!(mock.last_color, None);
}

// ============================================================================
// Tests: BusPreview
// ============================================================================

#[test]
fn test_preview_picks_first_single_wire_bus() {
    let preview = preview_for(&[BusType::Apa102, BusType::Ws2812Rgb], &[2, 3, 8], ColorOrder::Grb).unwrap();
    assert_eq!(preview.bus().bus_type, BusType::Ws2812Rgb);
    assert_eq!(preview.bus().pins.get(0), Some(8));
}

#[test]
fn test_no_preview_without_single_wire_bus() {
    assert!(preview_for(&[BusType::Analog3Ch], &[2, 3, 4], ColorOrder::Grb).is_none());
}

#[test]
fn test_preview_writes_in_bus_color_order() {
    let mut preview = preview_for(&[BusType::Ws2812Rgb], &[8], ColorOrder::Rgb).unwrap();
    let mut mock = MockLedWriter::new();

    let color = preview.advance(&mut mock).unwrap();
    assert_eq!(color, RGB8 { r: 10, g: 0, b: 0 });
    // RGB-Strip am GRB-Treiber: Rot muss im ersten (g) Byte stehen
    assert_eq!(mock.last_color, Some(RGB8 { r: 0, g: 10, b: 0 }));

    let color = preview.advance(&mut mock).unwrap();
    assert_eq!(color, RGB8 { r: 0, g: 10, b: 0 });
    assert_eq!(mock.last_color, Some(RGB8 { r: 10, g: 0, b: 0 }));
    assert_eq!(mock.write_count, 2);
}

#[test]
fn test_preview_continues_after_write_error() {
    let mut preview = preview_for(&[BusType::Ws2812Rgb], &[8], ColorOrder::Grb).unwrap();
    let mut mock = MockLedWriter::new();
    mock.fail_next_write = true;

    assert_eq!(preview.advance(&mut mock), Err(LedError::WriteFailed));
    // Nächster Schritt ist grün, rot wurde übersprungen
    assert_eq!(preview.advance(&mut mock), Ok(RGB8 { r: 0, g: 10, b: 0 }));
    assert_eq!(mock.last_color, Some(RGB8 { r: 0, g: 10, b: 0 }));
}

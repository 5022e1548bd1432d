// display.rs

use embedded_hal::delay::DelayNs;
use log::*;

use crate::{ClockReading, TEMPERATURE_DWELL_MS};

pub const SEG_BLANK: u8 = 0b0000_0000;
pub const SEG_COLON: u8 = 0b1000_0000;
pub const SEG_MINUS: u8 = 0b0100_0000;
/// Segments a, b, f and g: a small circle at the top of the digit.
pub const SEG_DEGREE: u8 = 0b0110_0011;

//      A
//     ---
//  F |   | B
//     -G-
//  E |   | C
//     ---
//      D
const DIGITS: [u8; 10] = [
    0b0011_1111, // 0
    0b0000_0110, // 1
    0b0101_1011, // 2
    0b0100_1111, // 3
    0b0110_0110, // 4
    0b0110_1101, // 5
    0b0111_1101, // 6
    0b0000_0111, // 7
    0b0111_1111, // 8
    0b0110_1111, // 9
];

pub trait SegmentDisplay {
    type Error: core::fmt::Debug;

    fn set_brightness(&mut self, level: u8);
    fn write_segments(&mut self, segments: &[u8; 4]) -> Result<(), Self::Error>;
}

pub fn encode_digit(d: u8) -> u8 {
    DIGITS[(d % 10) as usize]
}

pub fn encode_time(hours: u8, minutes: u8) -> [u8; 4] {
    let hour10 = hours / 10;
    [
        if hour10 == 0 { SEG_BLANK } else { encode_digit(hour10) },
        encode_digit(hours % 10) | SEG_COLON,
        encode_digit(minutes / 10),
        encode_digit(minutes % 10),
    ]
}

/// Sign, two digits of whole degrees and a degree mark.
/// Hundreds do not fit and are dropped: 105.2 shows as " 05°".
pub fn encode_temperature(temp: f32) -> [u8; 4] {
    let whole = temp.abs().trunc() as u32;
    [
        if temp < 0.0 { SEG_MINUS } else { SEG_BLANK },
        encode_digit(((whole / 10) % 10) as u8),
        encode_digit((whole % 10) as u8),
        SEG_DEGREE,
    ]
}

pub struct DisplayRenderer<D> {
    display: D,
    segments: [u8; 4],
}

impl<D: SegmentDisplay> DisplayRenderer<D> {
    pub fn new(mut display: D, brightness: u8) -> Self {
        display.set_brightness(brightness);
        Self {
            display,
            segments: [SEG_BLANK; 4],
        }
    }

    pub fn device(&self) -> &D {
        &self.display
    }

    /// Pattern most recently pushed to the display.
    pub fn segments(&self) -> &[u8; 4] {
        &self.segments
    }

    pub fn show_time(&mut self, clock: &ClockReading) {
        self.push(encode_time(clock.hours, clock.minutes));
    }

    /// Blocks for the dwell time so the reading stays up long enough to read.
    pub fn show_temperature<W: DelayNs>(&mut self, temp: f32, delay: &mut W) {
        self.push(encode_temperature(temp));
        delay.delay_ms(TEMPERATURE_DWELL_MS);
    }

    fn push(&mut self, segments: [u8; 4]) {
        self.segments = segments;
        if let Err(e) = self.display.write_segments(&self.segments) {
            error!("Display write failed: {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::RecordingDelay;

    #[derive(Default)]
    struct FakeDisplay {
        brightness: Option<u8>,
        writes: Vec<[u8; 4]>,
        fail: bool,
    }

    impl SegmentDisplay for FakeDisplay {
        type Error = &'static str;

        fn set_brightness(&mut self, level: u8) {
            self.brightness = Some(level);
        }

        fn write_segments(&mut self, segments: &[u8; 4]) -> Result<(), Self::Error> {
            self.writes.push(*segments);
            if self.fail {
                Err("bus stuck")
            } else {
                Ok(())
            }
        }
    }

    fn digit_of(seg: u8) -> Option<u8> {
        DIGITS.iter().position(|&d| d == seg).map(|p| p as u8)
    }

    #[test]
    fn time_layout_for_every_minute_of_the_day() {
        for h in 0..24u8 {
            for m in 0..60u8 {
                let s = encode_time(h, m);
                assert_eq!(s[0] == SEG_BLANK, h < 10, "{h}:{m}");
                if h >= 10 {
                    assert_eq!(digit_of(s[0]), Some(h / 10));
                }
                assert_eq!(digit_of(s[1] & !SEG_COLON), Some(h % 10));
                assert_ne!(s[1] & SEG_COLON, 0);
                assert_eq!(digit_of(s[2]), Some(m / 10));
                assert_eq!(digit_of(s[3]), Some(m % 10));
            }
        }
    }

    #[test]
    fn nine_oh_five() {
        assert_eq!(
            encode_time(9, 5),
            [SEG_BLANK, encode_digit(9) | SEG_COLON, encode_digit(0), encode_digit(5)]
        );
    }

    #[test]
    fn temperature_layout_in_two_digit_range() {
        for i in -999..=9999 {
            let t = i as f32 / 100.0;
            let s = encode_temperature(t);
            let whole = t.abs().trunc() as u8;
            assert_eq!(s[0] == SEG_MINUS, t < 0.0, "{t}");
            assert_eq!(digit_of(s[1]), Some(whole / 10), "{t}");
            assert_eq!(digit_of(s[2]), Some(whole % 10), "{t}");
            assert_eq!(s[3], SEG_DEGREE);
        }
    }

    #[test]
    fn hundreds_are_dropped() {
        let s = encode_temperature(105.2);
        assert_eq!(s, [SEG_BLANK, encode_digit(0), encode_digit(5), SEG_DEGREE]);
    }

    #[test]
    fn disconnected_sentinel_renders_as_is() {
        let s = encode_temperature(crate::DEVICE_DISCONNECTED_C);
        assert_eq!(s, [SEG_MINUS, encode_digit(2), encode_digit(7), SEG_DEGREE]);
    }

    #[test]
    fn renderer_sets_brightness_once() {
        let r = DisplayRenderer::new(FakeDisplay::default(), 2);
        assert_eq!(r.display.brightness, Some(2));
        assert!(r.display.writes.is_empty());
    }

    #[test]
    fn temperature_holds_for_dwell() {
        let mut r = DisplayRenderer::new(FakeDisplay::default(), 2);
        let mut delay = RecordingDelay::default();

        r.show_temperature(-3.7, &mut delay);
        assert_eq!(delay.total_ms(), 10_000);
        assert_eq!(r.display.writes, vec![encode_temperature(-3.7)]);
    }

    #[test]
    fn time_replaces_temperature() {
        let mut r = DisplayRenderer::new(FakeDisplay::default(), 2);
        let mut delay = RecordingDelay::default();

        r.show_temperature(22.0, &mut delay);
        r.show_time(&ClockReading::new(14, 30, 40));
        assert_eq!(*r.segments(), encode_time(14, 30));
        assert_eq!(r.display.writes.len(), 2);
    }

    #[test]
    fn write_errors_are_swallowed() {
        let display = FakeDisplay {
            fail: true,
            ..Default::default()
        };
        let mut r = DisplayRenderer::new(display, 2);
        r.show_time(&ClockReading::new(0, 0, 0));
        assert_eq!(*r.segments(), encode_time(0, 0));
    }
}

// EOF

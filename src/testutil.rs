// testutil.rs

use embedded_hal::delay::DelayNs;

/// Adds up requested delays instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    ns: u64,
}

impl RecordingDelay {
    pub fn total_ms(&self) -> u64 {
        self.ns / 1_000_000
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.ns += u64::from(us) * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ns += u64::from(ms) * 1_000_000;
    }
}

// EOF

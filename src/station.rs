// station.rs

use embedded_hal::delay::DelayNs;
use log::*;

use crate::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Clock,
    Temperature,
}

pub fn is_sample_second(seconds: u8) -> bool {
    seconds % SAMPLE_PERIOD_S == SAMPLE_PHASE_S
}

/// Everything the polling loop touches, owned in one place.
pub struct Station<T, S, D, P, W> {
    clock: T,
    sensor: SensorReader<S>,
    display: DisplayRenderer<D>,
    telemetry: TelemetrySender<P>,
    delay: W,
    pub clock_reading: ClockReading,
    pub temperature: f32,
}

impl<T, S, D, P, W> Station<T, S, D, P, W>
where
    T: TimeSource,
    S: TemperatureSensor,
    D: SegmentDisplay,
    P: HttpPoster,
    W: DelayNs,
{
    pub fn new(
        clock: T,
        sensor: SensorReader<S>,
        display: DisplayRenderer<D>,
        telemetry: TelemetrySender<P>,
        delay: W,
    ) -> Self {
        Self {
            clock,
            sensor,
            display,
            telemetry,
            delay,
            clock_reading: ClockReading::default(),
            temperature: DEVICE_DISCONNECTED_C,
        }
    }

    pub fn display(&self) -> &DisplayRenderer<D> {
        &self.display
    }

    pub fn step(&mut self) -> Phase {
        self.clock_reading = self.clock.now();
        self.display.show_time(&self.clock_reading);

        if !is_sample_second(self.clock_reading.seconds) {
            self.delay.delay_ms(LOOP_YIELD_MS);
            return Phase::Clock;
        }

        debug!("Sampling at {:?}", self.clock_reading);
        self.temperature = self.sensor.sample(&mut self.delay);
        self.telemetry.send(self.temperature);
        self.display.show_temperature(self.temperature, &mut self.delay);
        Phase::Temperature
    }

    pub fn run(&mut self) -> ! {
        info!("Entering main loop...");
        loop {
            self.step();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::testutil::RecordingDelay;

    struct ScriptedClock(VecDeque<ClockReading>);

    impl TimeSource for ScriptedClock {
        fn now(&mut self) -> ClockReading {
            self.0.pop_front().unwrap_or_default()
        }
    }

    struct FixedSensor {
        value: f32,
        conversions: u32,
    }

    impl TemperatureSensor for FixedSensor {
        fn request_conversion(&mut self) {
            self.conversions += 1;
        }
        fn read_celsius(&mut self, _index: usize) -> f32 {
            self.value
        }
    }

    #[derive(Default)]
    struct Screen {
        writes: Vec<[u8; 4]>,
    }

    impl SegmentDisplay for Screen {
        type Error = core::convert::Infallible;

        fn set_brightness(&mut self, _level: u8) {}

        fn write_segments(&mut self, segments: &[u8; 4]) -> Result<(), Self::Error> {
            self.writes.push(*segments);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Outbox {
        urls: Vec<String>,
    }

    impl HttpPoster for Outbox {
        fn post(&mut self, url: &str, _headers: &[(&str, &str)]) -> anyhow::Result<u16> {
            self.urls.push(url.to_string());
            Ok(204)
        }
    }

    type TestStation = Station<ScriptedClock, FixedSensor, Screen, Outbox, RecordingDelay>;

    fn station(times: &[(u8, u8, u8)], temp: f32) -> TestStation {
        Station::new(
            ScriptedClock(
                times
                    .iter()
                    .map(|&(h, m, s)| ClockReading::new(h, m, s))
                    .collect(),
            ),
            SensorReader::new(FixedSensor {
                value: temp,
                conversions: 0,
            }),
            DisplayRenderer::new(Screen::default(), 2),
            TelemetrySender::new(Outbox::default(), "http://sink/"),
            RecordingDelay::default(),
        )
    }

    #[test]
    fn sample_second_gate() {
        let hits: Vec<u8> = (0..60).filter(|&s| is_sample_second(s)).collect();
        assert_eq!(hits, vec![5, 35]);
    }

    #[test]
    fn second_34_only_shows_time() {
        let mut st = station(&[(9, 5, 34)], 21.5);

        assert_eq!(st.step(), Phase::Clock);
        assert_eq!(st.sensor.sensor().conversions, 0);
        assert!(st.telemetry.poster().urls.is_empty());
        assert_eq!(*st.display().segments(), encode_time(9, 5));
    }

    #[test]
    fn clock_path_yields_one_tick() {
        let mut st = station(&[(9, 5, 34), (9, 5, 36), (9, 5, 37)], 21.5);

        for _ in 0..3 {
            assert_eq!(st.step(), Phase::Clock);
        }
        assert_eq!(st.delay.total_ms(), 3 * u64::from(LOOP_YIELD_MS));
    }

    #[test]
    fn second_35_samples_posts_and_dwells() {
        let mut st = station(&[(9, 5, 35)], 21.5);

        assert_eq!(st.step(), Phase::Temperature);
        assert_eq!(st.sensor.sensor().conversions, 1);
        assert_eq!(st.temperature, 21.5);
        assert_eq!(st.telemetry.poster().urls, vec!["http://sink/21.5000".to_string()]);
        assert_eq!(st.delay.total_ms(), 1_000 + 10_000);
        assert_eq!(
            st.display.device().writes,
            vec![encode_time(9, 5), encode_temperature(21.5)]
        );
    }

    #[test]
    fn time_comes_back_after_temperature() {
        let mut st = station(&[(23, 59, 5), (23, 59, 16)], -4.2);

        assert_eq!(st.step(), Phase::Temperature);
        assert_eq!(*st.display().segments(), encode_temperature(-4.2));
        assert_eq!(st.step(), Phase::Clock);
        assert_eq!(*st.display().segments(), encode_time(23, 59));
        assert_eq!(st.clock_reading, ClockReading::new(23, 59, 16));
        assert_eq!(st.temperature, -4.2);
    }

    #[test]
    fn disconnected_sensor_is_still_sent() {
        let mut st = station(&[(12, 0, 5)], DEVICE_DISCONNECTED_C);

        st.step();
        assert_eq!(st.telemetry.poster().urls, vec!["http://sink/-127.0000".to_string()]);
        assert_eq!(*st.display().segments(), encode_temperature(DEVICE_DISCONNECTED_C));
    }
}

// EOF

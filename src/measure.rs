// measure.rs

use embedded_hal::delay::DelayNs;
use log::*;

use crate::CONVERSION_WAIT_MS;

/// What the Dallas driver reports when the sensor does not answer.
pub const DEVICE_DISCONNECTED_C: f32 = -127.0;

pub trait TemperatureSensor {
    fn request_conversion(&mut self);
    /// Celsius of the `index`th sensor on the bus, or [`DEVICE_DISCONNECTED_C`].
    fn read_celsius(&mut self, index: usize) -> f32;
}

pub struct SensorReader<S> {
    sensor: S,
}

impl<S: TemperatureSensor> SensorReader<S> {
    pub fn new(sensor: S) -> Self {
        Self { sensor }
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn sample<D: DelayNs>(&mut self, delay: &mut D) -> f32 {
        self.sensor.request_conversion();
        delay.delay_ms(CONVERSION_WAIT_MS);
        let temp = self.sensor.read_celsius(0);
        info!("Temperature: {temp:.2}");
        temp
    }
}

/// DS18B20 operations on one bus, addressed by 64-bit ROM code.
pub trait DallasBus {
    type Error: core::fmt::Debug;

    fn search(&mut self) -> Result<Vec<u64>, Self::Error>;
    fn set_resolution_12bit(&mut self, rom: u64) -> Result<(), Self::Error>;
    /// Every sensor on the bus converts at once.
    fn start_conversion(&mut self) -> Result<(), Self::Error>;
    fn read_celsius(&mut self, rom: u64) -> Result<f32, Self::Error>;
}

// When performing a measurement it can happen that no device was found on the one-wire-bus
// in addition to the bus errors. Therefore we extend the error cases for proper error handling.
#[derive(Debug)]
pub enum MeasurementError<E> {
    OneWireError(E),
    NoDeviceFound,
    NoBus,
}

/// Sensors are looked up again on every read, so one that comes up
/// after boot is picked up on the next sample.
pub struct OneWireThermometer<B> {
    bus: Option<B>,
    ids: Vec<u64>,
}

impl<B: DallasBus> OneWireThermometer<B> {
    /// Without a bus every read returns [`DEVICE_DISCONNECTED_C`].
    pub fn new(bus: Option<B>) -> Self {
        let mut me = Self {
            bus,
            ids: Vec::new(),
        };
        match me.scan() {
            Ok(()) => info!("Onewire devices: {:016x?}", me.ids),
            Err(e) => error!("Onewire scan failed: {e:?}"),
        }
        me
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    fn scan(&mut self) -> Result<(), MeasurementError<B::Error>> {
        let bus = self.bus.as_mut().ok_or(MeasurementError::NoBus)?;
        let found = bus.search().map_err(MeasurementError::OneWireError)?;

        for rom in found.iter().filter(|rom| !self.ids.contains(rom)) {
            info!("New sensor {rom:016x}");
            if let Err(e) = bus.set_resolution_12bit(*rom) {
                error!("Cannot set resolution on {rom:016x}: {e:?}");
            }
        }
        self.ids = found;

        if self.ids.is_empty() {
            Err(MeasurementError::NoDeviceFound)
        } else {
            Ok(())
        }
    }

    fn read(&mut self, index: usize) -> Result<f32, MeasurementError<B::Error>> {
        self.scan()?;
        let rom = *self.ids.get(index).ok_or(MeasurementError::NoDeviceFound)?;
        let bus = self.bus.as_mut().ok_or(MeasurementError::NoBus)?;
        bus.read_celsius(rom).map_err(MeasurementError::OneWireError)
    }
}

impl<B: DallasBus> TemperatureSensor for OneWireThermometer<B> {
    fn request_conversion(&mut self) {
        let Some(bus) = self.bus.as_mut() else {
            return;
        };
        if let Err(e) = bus.start_conversion() {
            warn!("Conversion request failed: {e:?}");
        }
    }

    fn read_celsius(&mut self, index: usize) -> f32 {
        match self.read(index) {
            Ok(t) => t,
            Err(e) => {
                warn!("Sensor #{index} read failed: {e:?}");
                DEVICE_DISCONNECTED_C
            }
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::{EspOneWire, OneWirePin};

#[cfg(target_os = "espidf")]
mod esp {
    use ds18b20::{Ds18b20, Resolution};
    use esp_idf_hal::{
        delay::Ets,
        gpio::{AnyIOPin, InputOutput, PinDriver},
        sys::EspError,
    };
    use one_wire_bus::{Address, OneWire, OneWireError, SearchState};

    use super::*;

    pub type OneWirePin = PinDriver<'static, AnyIOPin, InputOutput>;

    pub struct EspOneWire {
        bus: OneWire<OneWirePin>,
    }

    impl EspOneWire {
        pub fn new(pin: OneWirePin) -> Result<Self, OneWireError<EspError>> {
            Ok(Self {
                bus: OneWire::new(pin)?,
            })
        }
    }

    impl DallasBus for EspOneWire {
        type Error = OneWireError<EspError>;

        fn search(&mut self) -> Result<Vec<u64>, Self::Error> {
            let mut ids = Vec::new();
            let mut st: SearchState;
            let mut state = None;

            loop {
                match self.bus.device_search(state, false, &mut Ets)? {
                    None => {
                        break;
                    }
                    Some((device_address, s)) => {
                        ids.push(device_address.0);
                        st = s;
                        state = Some(&st);
                    }
                }
            }
            Ok(ids)
        }

        fn set_resolution_12bit(&mut self, rom: u64) -> Result<(), Self::Error> {
            let sensor = Ds18b20::new::<EspError>(Address(rom))?;
            sensor.set_config(i8::MIN, i8::MAX, Resolution::Bits12, &mut self.bus, &mut Ets)
        }

        fn start_conversion(&mut self) -> Result<(), Self::Error> {
            ds18b20::start_simultaneous_temp_measurement(&mut self.bus, &mut Ets)
        }

        fn read_celsius(&mut self, rom: u64) -> Result<f32, Self::Error> {
            let sensor = Ds18b20::new::<EspError>(Address(rom))?;
            let sensor_data = sensor.read_data(&mut self.bus, &mut Ets)?;
            Ok(sensor_data.temperature)
        }
    }
}


// EOF

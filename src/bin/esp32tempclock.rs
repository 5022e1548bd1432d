// bin/esp32tempclock.rs

#[cfg(target_os = "espidf")]
use esp32tempclock::*;
#[cfg(target_os = "espidf")]
use esp_idf_hal::{
    delay::{Ets, FreeRtos},
    gpio::{IOPin, OutputPin, PinDriver, Pull},
    prelude::Peripherals,
};
#[cfg(target_os = "espidf")]
use esp_idf_svc::{eventloop::EspSystemEventLoop, nvs};
#[cfg(target_os = "espidf")]
use log::*;

#[cfg(target_os = "espidf")]
esp_idf_sys::esp_app_desc!();

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    info!("Hello.");
    info!("Starting up esp32tempclock v{FW_VERSION}.");

    let config = MyConfig::default();
    info!("My config:\n{config:#?}");

    let sysloop = EspSystemEventLoop::take()?;
    let nvs_default_partition = nvs::EspDefaultNvsPartition::take()?;

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    #[cfg(feature = "esp32c3")]
    let (clk_pin, dio_pin, onew_pin) = (
        pins.gpio4.downgrade_output(),
        pins.gpio5.downgrade(),
        pins.gpio6.downgrade(),
    );

    #[cfg(feature = "esp32s")]
    let (clk_pin, dio_pin, onew_pin) = (
        pins.gpio18.downgrade_output(),
        pins.gpio19.downgrade(),
        pins.gpio4.downgrade(),
    );

    let clk = PinDriver::output(clk_pin)?;
    let mut dio = PinDriver::input_output_od(dio_pin)?;
    dio.set_pull(Pull::Up)?;
    let tm1637 = Tm1637::new(clk, dio, Ets)?;
    let display = DisplayRenderer::new(tm1637, config.brightness);

    info!("Scanning 1-wire devices...");
    let bus = match open_onewire(onew_pin) {
        Ok(b) => Some(b),
        Err(e) => {
            error!("Onewire bus unavailable, no temperature readings: {e:#}");
            None
        }
    };
    let sensor = SensorReader::new(OneWireThermometer::new(bus));

    let mut wifi = Wifi::new(peripherals.modem, sysloop, Some(nvs_default_partition))?;
    wifi.start(&config);

    let clock = SntpClock::new(&config.ntp_server, &config.timezone)?;
    let telemetry = TelemetrySender::new(
        EspPoster::new(std::time::Duration::from_secs(HTTP_TIMEOUT_S)),
        config.telemetry_url.as_str(),
    );

    let mut station = Station::new(clock, sensor, display, telemetry, FreeRtos);
    station.run()
}

#[cfg(target_os = "espidf")]
fn open_onewire(pin: esp_idf_hal::gpio::AnyIOPin) -> anyhow::Result<EspOneWire> {
    let mut drv = PinDriver::input_output_od(pin)?;
    drv.set_pull(Pull::Up)?;
    match EspOneWire::new(drv) {
        Ok(b) => Ok(b),
        Err(e) => anyhow::bail!("Cannot open 1-wire bus: {e:?}"),
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("esp32tempclock only runs on ESP-IDF targets.");
}

// EOF

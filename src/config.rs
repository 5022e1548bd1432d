// config.rs

use std::fmt;

const DEFAULT_BRIGHTNESS: u8 = 2;

/// Seconds between temperature samples.
pub const SAMPLE_PERIOD_S: u8 = 30;
/// Second within each period at which the sample is taken.
pub const SAMPLE_PHASE_S: u8 = 5;
/// Worst case DS18B20 conversion at 12 bits is 750 ms.
pub const CONVERSION_WAIT_MS: u32 = 1000;
/// How long the temperature stays on the display.
pub const TEMPERATURE_DWELL_MS: u32 = 10_000;
pub const HTTP_TIMEOUT_S: u64 = 10;
/// One FreeRTOS tick at 100 Hz, lets the idle task feed the watchdog.
pub const LOOP_YIELD_MS: u32 = 10;

#[derive(Clone)]
pub struct MyConfig {
    pub wifi_ssid: String,
    pub wifi_pass: String,

    pub ntp_server: String,
    pub timezone: String,

    pub telemetry_url: String,
    pub brightness: u8,
}

impl Default for MyConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: option_env!("WIFI_SSID").unwrap_or("internet").into(),
            wifi_pass: option_env!("WIFI_PASS").unwrap_or("password").into(),

            ntp_server: option_env!("NTP_SERVER").unwrap_or("pool.ntp.org").into(),
            timezone: option_env!("MY_TZ")
                .unwrap_or("EET-2EEST,M3.5.0/3,M10.5.0/4")
                .into(),

            telemetry_url: option_env!("TELEMETRY_URL")
                .unwrap_or("http://temp.local/temperature/")
                .into(),
            brightness: option_env!("DISPLAY_BRIGHTNESS")
                .unwrap_or("-")
                .parse()
                .unwrap_or(DEFAULT_BRIGHTNESS),
        }
    }
}

// keep the wifi password out of the boot log
impl fmt::Debug for MyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MyConfig")
            .field("wifi_ssid", &self.wifi_ssid)
            .field("wifi_pass", &"********")
            .field("ntp_server", &self.ntp_server)
            .field("timezone", &self.timezone)
            .field("telemetry_url", &self.telemetry_url)
            .field("brightness", &self.brightness)
            .finish()
    }
}


// EOF

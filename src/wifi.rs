// wifi.rs

use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{BlockingWifi, EspWifi},
};
use log::*;

use crate::MyConfig;

/// Station mode Wi-Fi, associated once at boot.
pub struct Wifi {
    wifi: BlockingWifi<EspWifi<'static>>,
}

impl Wifi {
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
    ) -> anyhow::Result<Self> {
        info!("Initializing Wi-Fi...");
        let espwifi = EspWifi::new(modem, sysloop.clone(), nvs)?;
        Ok(Self {
            wifi: BlockingWifi::wrap(espwifi, sysloop)?,
        })
    }

    pub fn configure(&mut self, config: &MyConfig) -> anyhow::Result<()> {
        info!("WiFi setting credentials...");
        let ssid = match config.wifi_ssid.as_str().try_into() {
            Ok(s) => s,
            Err(_) => anyhow::bail!("WiFi SSID too long: {}", config.wifi_ssid),
        };
        let password = match config.wifi_pass.as_str().try_into() {
            Ok(p) => p,
            Err(_) => anyhow::bail!("WiFi password too long"),
        };
        let auth_method = if config.wifi_pass.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        self.wifi
            .set_configuration(&Configuration::Client(ClientConfiguration {
                ssid,
                password,
                auth_method,
                ..Default::default()
            }))?;

        info!("WiFi driver starting...");
        self.wifi.start()?;
        Ok(())
    }

    pub fn connect(&mut self) -> anyhow::Result<()> {
        info!("WiFi connecting...");
        self.wifi.connect()?;

        info!("WiFi waiting for association...");
        self.wifi.wait_netif_up()?;

        let ip_info = self.wifi.wifi().sta_netif().get_ip_info()?;
        info!("WiFi connected, IP {}", ip_info.ip);
        Ok(())
    }

    /// Never fails: without a network the clock and display still work.
    pub fn start(&mut self, config: &MyConfig) {
        if let Err(e) = self.configure(config).and_then(|_| self.connect()) {
            error!("WiFi connection failed: {e:?}");
        }
    }
}

// EOF

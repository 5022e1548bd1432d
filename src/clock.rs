// clock.rs

use chrono::Timelike;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockReading {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl ClockReading {
    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn from_time<T: Timelike>(t: &T) -> Self {
        Self::new(t.hour() as u8, t.minute() as u8, t.second() as u8)
    }
}

pub trait TimeSource {
    fn now(&mut self) -> ClockReading;
}

#[cfg(target_os = "espidf")]
pub use esp::SntpClock;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::sntp::{EspSntp, SntpConf, SyncStatus};
    use log::*;

    use super::*;

    /// System clock kept in sync by SNTP, read in the configured local time.
    pub struct SntpClock {
        sntp: EspSntp<'static>,
        synced: bool,
    }

    impl SntpClock {
        pub fn new(ntp_server: &str, timezone: &str) -> anyhow::Result<Self> {
            // chrono reads POSIX TZ rules from the environment
            std::env::set_var("TZ", timezone);

            let mut conf = SntpConf::default();
            conf.servers[0] = ntp_server;
            let sntp = EspSntp::new(&conf)?;
            info!("SNTP started with server {ntp_server}, TZ={timezone}");

            let clock = Self {
                sntp,
                synced: false,
            };
            info!("SNTP status: {:?}", clock.sntp.get_sync_status());
            Ok(clock)
        }

        pub fn is_synced(&self) -> bool {
            self.sntp.get_sync_status() == SyncStatus::Completed
        }
    }

    impl TimeSource for SntpClock {
        fn now(&mut self) -> ClockReading {
            if !self.synced && self.is_synced() {
                self.synced = true;
                info!("Time synchronized: {}", chrono::Local::now());
            }
            ClockReading::from_time(&chrono::Local::now())
        }
    }
}


// EOF

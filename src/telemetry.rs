// telemetry.rs

use log::*;

/// Reported instead of an HTTP status when the request never got a response.
pub const HTTP_CONNECTION_FAILED: i32 = -1;

pub trait HttpPoster {
    /// POST with an empty body, returning the response status.
    fn post(&mut self, url: &str, headers: &[(&str, &str)]) -> anyhow::Result<u16>;
}

pub fn format_reading(value: f32) -> String {
    format!("{value:.4}")
}

pub struct TelemetrySender<P> {
    poster: P,
    base_url: String,
}

impl<P: HttpPoster> TelemetrySender<P> {
    pub fn new(poster: P, base_url: impl Into<String>) -> Self {
        Self {
            poster,
            base_url: base_url.into(),
        }
    }

    pub fn poster(&self) -> &P {
        &self.poster
    }

    pub fn url_for(&self, value: f32) -> String {
        format!("{}{}", self.base_url, format_reading(value))
    }

    /// Fire and forget, the outcome is only logged.
    pub fn send(&mut self, value: f32) -> i32 {
        let url = self.url_for(value);
        debug!("POST {url}");

        let code = match self
            .poster
            .post(&url, &[("Content-Type", "text/plain"), ("Content-Length", "0")])
        {
            Ok(status) => i32::from(status),
            Err(e) => {
                error!("HTTP request failed: {e:#}");
                HTTP_CONNECTION_FAILED
            }
        };

        if (200..300).contains(&code) {
            info!("HTTP response code: {code}");
        } else {
            warn!("HTTP response code: {code}");
        }
        code
    }
}

#[cfg(target_os = "espidf")]
pub use esp::EspPoster;

#[cfg(target_os = "espidf")]
mod esp {
    use std::time::Duration;

    use embedded_svc::http::client::Client as HttpClient;
    use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};

    use super::*;

    pub struct EspPoster {
        timeout: Duration,
    }

    impl EspPoster {
        pub fn new(timeout: Duration) -> Self {
            Self { timeout }
        }
    }

    impl HttpPoster for EspPoster {
        fn post(&mut self, url: &str, headers: &[(&str, &str)]) -> anyhow::Result<u16> {
            // a fresh connection every time, samples are 30 s apart
            let connection = EspHttpConnection::new(&HttpConfiguration {
                timeout: Some(self.timeout),
                ..Default::default()
            })?;
            let mut client = HttpClient::wrap(connection);

            let request = client.post(url, headers)?;
            let response = request.submit()?;
            Ok(response.status())
        }
    }
}


// EOF

// build.rs

use std::env;

fn main() -> anyhow::Result<()> {
    // Necessary because of this issue: https://github.com/rust-lang/cargo/issues/9641
    // see also https://github.com/rust-lang/cargo/issues/9554

    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::build::CfgArgs::output_propagated("ESP_IDF")?;
        embuild::build::LinkArgs::output_propagated("ESP_IDF")?;
    }

    let wifi_ssid = env::var("WIFI_SSID").unwrap_or_else(|_| "internet".into());
    let wifi_pass = env::var("WIFI_PASS").unwrap_or_else(|_| "password".into());
    let ntp_server = env::var("NTP_SERVER").unwrap_or_else(|_| "pool.ntp.org".into());
    let my_tz = env::var("MY_TZ").unwrap_or_else(|_| "EET-2EEST,M3.5.0/3,M10.5.0/4".into());
    let telemetry_url =
        env::var("TELEMETRY_URL").unwrap_or_else(|_| "http://temp.local/temperature/".into());
    let brightness = env::var("DISPLAY_BRIGHTNESS").unwrap_or_else(|_| "2".into());

    println!("cargo:rustc-env=WIFI_SSID={wifi_ssid}");
    println!("cargo:rustc-env=WIFI_PASS={wifi_pass}");
    println!("cargo:rustc-env=NTP_SERVER={ntp_server}");
    println!("cargo:rustc-env=MY_TZ={my_tz}");
    println!("cargo:rustc-env=TELEMETRY_URL={telemetry_url}");
    println!("cargo:rustc-env=DISPLAY_BRIGHTNESS={brightness}");

    for var in [
        "WIFI_SSID",
        "WIFI_PASS",
        "NTP_SERVER",
        "MY_TZ",
        "TELEMETRY_URL",
        "DISPLAY_BRIGHTNESS",
    ] {
        println!("cargo:rerun-if-env-changed={var}");
    }

    Ok(())
}

// EOF

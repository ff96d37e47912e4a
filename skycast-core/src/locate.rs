//! Best-effort location detection from the caller's public IP.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const IPAPI_URL: &str = "https://ipapi.co/json/";
const DETECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    city: Option<String>,
}

/// Guess the caller's city from their IP address. Returns `None` on any
/// failure; callers fall back to asking the user.
pub async fn detect_city() -> Option<String> {
    let res = match Client::new().get(IPAPI_URL).timeout(DETECT_TIMEOUT).send().await {
        Ok(res) => res,
        Err(err) => {
            debug!(%err, "IP location request failed");
            return None;
        }
    };

    if !res.status().is_success() {
        debug!(status = %res.status(), "IP location returned an error status");
        return None;
    }

    let body: IpApiResponse = match res.json().await {
        Ok(body) => body,
        Err(err) => {
            debug!(%err, "IP location response was unparseable");
            return None;
        }
    };

    body.city.filter(|city| !city.is_empty())
}

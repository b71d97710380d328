//! Best-effort location lookup from a client IP address.

use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LocationConfig;
use crate::infrastructure::http::{HttpClientBase, HttpError};

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location lookup failed: {0}")]
    Http(#[from] HttpError),
    #[error("lookup for {ip} returned no city or region")]
    Incomplete { ip: IpAddr },
}

pub struct LocationResolver {
    base: HttpClientBase,
    fallback: String,
}

impl LocationResolver {
    pub fn from_config(config: &LocationConfig) -> Self {
        Self {
            base: HttpClientBase::new(
                "ipinfo".to_string(),
                config.lookup_endpoint.clone(),
                None,
                Duration::from_secs(config.timeout_secs),
            ),
            fallback: config.fallback.clone(),
        }
    }

    /// Resolves `ip` to a "City, Region[ Postal][, Country]" string.
    ///
    /// Private and loopback addresses map to the configured fallback. Lookup
    /// failures yield `None`: the location is optional context.
    pub async fn resolve(&self, ip: IpAddr) -> Option<String> {
        if is_private(ip) {
            debug!(%ip, fallback = self.fallback.as_str(), "Private address, using fallback location");
            return Some(self.fallback.clone());
        }

        match self.lookup(ip).await {
            Ok(location) => {
                debug!(%ip, location = location.as_str(), "Resolved client location");
                Some(location)
            }
            Err(err) => {
                warn!(%ip, %err, "IP location lookup failed");
                None
            }
        }
    }

    async fn lookup(&self, ip: IpAddr) -> Result<String, LocationError> {
        let url = self.base.build_url(&format!("{ip}/json"));
        let info: IpInfo = self.base.get_json(&url).await?;
        info.format().ok_or(LocationError::Incomplete { ip })
    }
}

fn is_private(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            // fc00::/7 unique local, fe80::/10 link local
            let first = v6.segments()[0];
            v6.is_loopback()
                || v6.is_unspecified()
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpInfo {
    city: Option<String>,
    region: Option<String>,
    postal: Option<String>,
    country: Option<String>,
}

impl IpInfo {
    fn format(self) -> Option<String> {
        let city = self.city.filter(|s| !s.is_empty())?;
        let region = self.region.filter(|s| !s.is_empty())?;
        let mut location = format!("{city}, {region}");
        if let Some(postal) = self.postal.filter(|s| !s.is_empty()) {
            location.push(' ');
            location.push_str(&postal);
        }
        if let Some(country) = self.country.filter(|s| !s.is_empty()) {
            location.push_str(", ");
            location.push_str(&country);
        }
        Some(location)
    }
}

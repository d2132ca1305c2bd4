use anyhow::{bail, Result};
use std::env;

pub const DEFAULT_DEMO_PASSWORD: &str = "DemoPassword123!";

#[derive(Debug, Clone)]
pub struct Config {
    /// Password for the generated demo account.
    pub demo_password: String,

    /// IANA timezone id for the demo user's working day.
    /// Unset or unknown falls back to Pacific time.
    pub timezone: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env if present, ignore if missing
        Self::from_getter(|key| env::var(key).ok())
    }

    /// Parse config from a custom getter function (for testing)
    pub fn from_getter<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            demo_password: get("DEMO_USER_PASSWORD")
                .unwrap_or_else(|| DEFAULT_DEMO_PASSWORD.to_string()),

            timezone: get("DEMO_TIMEZONE").filter(|s| !s.trim().is_empty()),
        })
    }

    /// Create config from a HashMap (convenience for testing)
    #[cfg(test)]
    pub fn from_map(map: &std::collections::HashMap<&str, &str>) -> Result<Self> {
        Self::from_getter(|key| map.get(key).map(|v| v.to_string()))
    }

    /// Validate configuration values at startup.
    /// Returns Ok(()) if all validations pass, or Err with details of what failed.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.demo_password.trim().is_empty() {
            errors.push("DEMO_USER_PASSWORD cannot be empty.".to_string());
        }

        // Runtime falls back to Pacific for unknown ids; an explicit
        // validation run still flags the likely typo.
        if let Some(tz) = &self.timezone {
            if tz.parse::<chrono_tz::Tz>().is_err() {
                errors.push(format!(
                    "DEMO_TIMEZONE '{}' is not a known IANA timezone.",
                    tz
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )
        }
    }
}

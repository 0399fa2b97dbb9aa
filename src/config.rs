use crate::model::ConfigError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;

const DATA_BASE_URL: &str = "https://raw.githubusercontent.com/zfathii/bismillah/main/dashboard";

/// Geographic bounds covered by the background map image.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MapExtent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl Default for MapExtent {
    fn default() -> Self {
        Self {
            lon_min: -73.982_830_55,
            lon_max: -33.751_169_44,
            lat_min: -33.8,
            lat_max: 5.4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub orders_source: String,
    pub geolocation_source: String,
    pub map_image_source: String,
    pub output_dir: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub request_timeout_seconds: u64,
    pub map_extent: MapExtent,
    pub title: String,
    pub author: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            orders_source: format!("{DATA_BASE_URL}/df.csv"),
            geolocation_source: format!("{DATA_BASE_URL}/geolocation.csv"),
            map_image_source: "assets/brazil-map.jpg".to_string(),
            output_dir: "dashboard".to_string(),
            start_date: None,
            end_date: None,
            request_timeout_seconds: 30,
            map_extent: MapExtent::default(),
            title: "E-Commerce Public Data Analysis".to_string(),
            author: "Fathimah Zulfah".to_string(),
        }
    }
}

impl AppConfig {
    /// Checks the configured date window before any data is fetched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ConfigError::InvalidRange { start, end });
            }
        }
        Ok(())
    }
}

/// Loads the configuration; a missing file yields the defaults.
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_string(),
                source,
            });
        }
    };
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.output_dir, "dashboard");
        assert_eq!(config.request_timeout_seconds, 30);
        assert!(config.start_date.is_none());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "orders_source": "data/orders.csv", "start_date": "2018-01-01" }}"#
        )
        .unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.orders_source, "data/orders.csv");
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2018, 1, 1));
        assert_eq!(config.map_extent, MapExtent::default());
    }

    #[test]
    fn malformed_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = load_config(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "start_date": "2018-02-01", "end_date": "2018-01-01" }}"#
        )
        .unwrap();

        let err = load_config(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { .. }));
    }
}

//! Per-render input data: time, place, user and logo.

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalised postal address.
///
/// Every field is optional. Empty strings are treated the same as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Full one-line address as reported by the geocoder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

const HOUSE_NUMBER_KEYS: &[&str] = &["house_number", "housenumber"];
const STREET_KEYS: &[&str] = &["road", "pedestrian", "path", "street"];
const WARD_KEYS: &[&str] = &["suburb", "quarter", "neighbourhood", "village", "hamlet"];
const DISTRICT_KEYS: &[&str] = &["district", "county", "town"];
const PROVINCE_KEYS: &[&str] = &["city", "state"];

impl AddressInfo {
    /// Build an address from a reverse-geocoder response.
    ///
    /// Accepts either the full response (with an `address` object and an
    /// optional `display_name`) or the bare `address` object. For each field
    /// the first non-empty key in precedence order wins.
    pub fn from_geocoder_fields(value: &Value) -> Self {
        let fields = value.get("address").unwrap_or(value);
        let pick = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| fields.get(*k).and_then(Value::as_str))
                .map(str::trim)
                .find(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            house_number: pick(HOUSE_NUMBER_KEYS),
            street: pick(STREET_KEYS),
            ward: pick(WARD_KEYS),
            district: pick(DISTRICT_KEYS),
            province: pick(PROVINCE_KEYS),
            country: pick(&["country"]),
            display_name: value
                .get("display_name")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// The single address line drawn on the photo.
    ///
    /// Joins house number, street, ward, district and province with ", ",
    /// skipping empty parts. Country is not included.
    pub fn joined(&self) -> String {
        [
            &self.house_number,
            &self.street,
            &self.ward,
            &self.district,
            &self.province,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    pub fn is_empty(&self) -> bool {
        self.joined().is_empty()
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `"lat, lon"` with six decimal places.
    pub fn display(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Everything a single render needs to know about the photo.
#[derive(Debug, Clone)]
pub struct WatermarkContext {
    pub address: Option<AddressInfo>,
    pub location: Option<GeoPoint>,
    pub timestamp: DateTime<FixedOffset>,
    pub user_name: Option<String>,
    /// URL, `data:` URI or file path of the logo.
    pub company_logo: Option<String>,
    /// Accepted for compatibility; labels are always formatted by [`Locale`](super::datetime::Locale).
    pub time_format: Option<String>,
}

impl Default for WatermarkContext {
    fn default() -> Self {
        Self::now()
    }
}

impl WatermarkContext {
    /// Empty context stamped with the current local time.
    pub fn now() -> Self {
        Self::at(Local::now().fixed_offset())
    }

    pub fn at(timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            address: None,
            location: None,
            timestamp,
            user_name: None,
            company_logo: None,
            time_format: None,
        }
    }

    pub fn with_address(mut self, address: AddressInfo) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.company_logo = Some(logo.into());
        self
    }

    /// Non-empty user name, if any.
    pub fn user_name(&self) -> Option<&str> {
        self.user_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Non-empty joined address line, if any.
    pub fn address_line(&self) -> Option<String> {
        self.address
            .as_ref()
            .map(AddressInfo::joined)
            .filter(|s| !s.is_empty())
    }

    pub fn logo(&self) -> Option<&str> {
        self.company_logo
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

//! Time, date and weekday labels.
//!
//! Labels are produced from explicit month and weekday tables rather than
//! the platform locale so the same timestamp always renders the same text.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    #[serde(alias = "vi-vn", alias = "vietnamese")]
    Vi,
    #[serde(alias = "en-us", alias = "en-gb", alias = "english")]
    En,
}

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl Locale {
    /// 24-hour `HH:MM`.
    pub fn time_label(&self, ts: &DateTime<FixedOffset>) -> String {
        format!("{:02}:{:02}", ts.hour(), ts.minute())
    }

    /// Long-form date, day first.
    pub fn date_label(&self, ts: &DateTime<FixedOffset>) -> String {
        match self {
            Self::Vi => format!("{} tháng {}, {}", ts.day(), ts.month(), ts.year()),
            Self::En => format!(
                "{} {} {}",
                ts.day(),
                EN_MONTHS[ts.month0() as usize],
                ts.year()
            ),
        }
    }

    pub fn weekday_label(&self, ts: &DateTime<FixedOffset>) -> &'static str {
        match (self, ts.weekday()) {
            (Self::Vi, Weekday::Mon) => "Thứ Hai",
            (Self::Vi, Weekday::Tue) => "Thứ Ba",
            (Self::Vi, Weekday::Wed) => "Thứ Tư",
            (Self::Vi, Weekday::Thu) => "Thứ Năm",
            (Self::Vi, Weekday::Fri) => "Thứ Sáu",
            (Self::Vi, Weekday::Sat) => "Thứ Bảy",
            (Self::Vi, Weekday::Sun) => "Chủ Nhật",
            (Self::En, Weekday::Mon) => "Monday",
            (Self::En, Weekday::Tue) => "Tuesday",
            (Self::En, Weekday::Wed) => "Wednesday",
            (Self::En, Weekday::Thu) => "Thursday",
            (Self::En, Weekday::Fri) => "Friday",
            (Self::En, Weekday::Sat) => "Saturday",
            (Self::En, Weekday::Sun) => "Sunday",
        }
    }
}

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};

/// Opening window of the salon for a single weekday.
///
/// Times are wall-clock times in the salon's timezone and serialize as
/// `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    #[serde(with = "hh_mm")]
    pub start: NaiveTime,
    #[serde(with = "hh_mm")]
    pub end: NaiveTime,
    #[serde(default)]
    pub closed: bool,
}

impl BusinessHours {
    pub fn open(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            closed: false,
        }
    }

    pub fn closed() -> Self {
        Self {
            start: NaiveTime::default(),
            end: NaiveTime::default(),
            closed: true,
        }
    }

    /// A closed day is always valid; an open day needs `start < end`.
    pub fn is_valid(&self) -> bool {
        self.closed || self.start < self.end
    }
}

/// Business hours for every day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    pub monday: BusinessHours,
    pub tuesday: BusinessHours,
    pub wednesday: BusinessHours,
    pub thursday: BusinessHours,
    pub friday: BusinessHours,
    pub saturday: BusinessHours,
    pub sunday: BusinessHours,
}

impl WeeklyHours {
    pub fn for_weekday(&self, weekday: Weekday) -> &BusinessHours {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &BusinessHours)> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .map(move |day| (day, self.for_weekday(day)))
    }

    /// Rejects any open day whose end is not after its start.
    pub fn validate(&self) -> BookingResult<()> {
        match self.iter().find(|(_, hours)| !hours.is_valid()) {
            Some((day, hours)) => Err(BookingError::Validation(format!(
                "Business hours for {} must end after they start ({} - {})",
                day,
                hours.start.format("%H:%M"),
                hours.end.format("%H:%M")
            ))),
            None => Ok(()),
        }
    }
}

impl Default for WeeklyHours {
    /// Mon-Fri 09:00-18:00, Sat 09:00-14:00, Sun closed.
    fn default() -> Self {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default();
        let weekday = BusinessHours::open(nine, NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default());
        Self {
            monday: weekday,
            tuesday: weekday,
            wednesday: weekday,
            thursday: weekday,
            friday: weekday,
            saturday: BusinessHours::open(nine, NaiveTime::from_hms_opt(14, 0, 0).unwrap_or_default()),
            sunday: BusinessHours::closed(),
        }
    }
}

/// `"HH:MM"`, or `"HH:MM:SS"` when the time carries seconds.
mod hh_mm {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%H:%M";
    const FORMAT_WITH_SECONDS: &str = "%H:%M:%S";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        let format = if time.second() == 0 {
            FORMAT
        } else {
            FORMAT_WITH_SECONDS
        };
        serializer.serialize_str(&time.format(format).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, FORMAT_WITH_SECONDS))
            .map_err(|e| de::Error::custom(format!("invalid time of day {:?}: {}", raw, e)))
    }
}

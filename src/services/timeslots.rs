use chrono::{Months, NaiveDate};

/// A selectable time slot. For monthly packages the value carries a compound
/// `"<time-range>|<period-label>"` encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotOption {
    pub label: String,
    pub value: String,
}

impl SlotOption {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// Package-specific time slots for a service starting on `start`.
///
/// An unrecognized package id means the catalog disagrees with the booking
/// flow that produced it; the generic defaults keep the conversation alive
/// but the condition is reported through `tracing`.
pub fn options_for(package_id: &str, start: NaiveDate) -> Vec<SlotOption> {
    match package_id {
        "hourly" => vec![
            SlotOption::new("Morning (08:00-12:00)", "08:00-12:00"),
            SlotOption::new("Afternoon (14:00-18:00)", "14:00-18:00"),
            SlotOption::new("Evening (18:00-22:00)", "18:00-22:00"),
        ],
        "daily" => vec![
            SlotOption::new("8 hours (08:00-16:00)", "08:00-16:00"),
            SlotOption::new("10 hours (08:00-18:00)", "08:00-18:00"),
            SlotOption::new("12 hours (08:00-20:00)", "08:00-20:00"),
        ],
        "24hour" => vec![SlotOption::new("Full day (00:00-24:00)", "00:00-24:00")],
        "monthly" => {
            let end = start.checked_add_months(Months::new(1)).unwrap_or(start);
            let period = format!(
                "{} 至 {}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            );
            vec![
                SlotOption::new("Daytime (08:00-20:00)", format!("08:00-20:00|{period}")),
                SlotOption::new("Full day (00:00-24:00)", format!("00:00-24:00|{period}")),
            ]
        }
        other => {
            tracing::warn!(package_id = other, "unrecognized package id, falling back to generic time slots");
            vec![
                SlotOption::new("Morning (08:00-12:00)", "08:00-12:00"),
                SlotOption::new("Afternoon (14:00-18:00)", "14:00-18:00"),
                SlotOption::new("Full day (08:00-20:00)", "08:00-20:00"),
            ]
        }
    }
}

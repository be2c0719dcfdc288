//! Interval - `!repeat` ディレクティブが表す期間
//!
//! [`IntervalSpec`] はカレンダー基準です。月・年はカレンダー上で足すので
//! （1/31 + 1 か月 = 2/28 or 2/29）、秒数に換算することはできません。

use std::fmt;

use chrono::{DateTime, Days, Months, Utc};

/// Units a directive may use, stored in their plural form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl IntervalUnit {
    /// Look up a unit by its plural name (`"days"`, `"weeks"`, ...).
    pub fn from_plural(name: &str) -> Option<Self> {
        match name {
            "days" => Some(Self::Days),
            "weeks" => Some(Self::Weeks),
            "months" => Some(Self::Months),
            "years" => Some(Self::Years),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }

    fn singular(self) -> &'static str {
        match self {
            Self::Days => "day",
            Self::Weeks => "week",
            Self::Months => "month",
            Self::Years => "year",
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered (unit, count) pairs.
///
/// Invariants:
/// - at least one pair
/// - every count is positive
/// - each unit appears once; repeated units are summed into the first one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSpec {
    parts: Vec<(IntervalUnit, u32)>,
}

impl IntervalSpec {
    /// Single-unit spec. Returns `None` for a zero count.
    pub fn new(unit: IntervalUnit, count: u32) -> Option<Self> {
        Self::from_parts([(unit, count)])
    }

    /// Build a spec from clauses in directive order.
    ///
    /// Returns `None` when there are no clauses, a count is zero, or a
    /// summed count overflows `u32`.
    pub fn from_parts(parts: impl IntoIterator<Item = (IntervalUnit, u32)>) -> Option<Self> {
        let mut merged: Vec<(IntervalUnit, u32)> = Vec::new();
        for (unit, count) in parts {
            if count == 0 {
                return None;
            }
            match merged.iter_mut().find(|(u, _)| *u == unit) {
                Some((_, total)) => *total = total.checked_add(count)?,
                None => merged.push((unit, count)),
            }
        }
        if merged.is_empty() {
            return None;
        }
        Some(Self { parts: merged })
    }

    pub fn parts(&self) -> &[(IntervalUnit, u32)] {
        &self.parts
    }

    /// Count for `unit`, 0 when the unit is absent.
    pub fn count(&self, unit: IntervalUnit) -> u32 {
        self.parts
            .iter()
            .find(|(u, _)| *u == unit)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Add this interval to `instant`, clause by clause in directive order.
    ///
    /// `None` if the result leaves chrono's representable range.
    pub fn add_to(&self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.parts
            .iter()
            .try_fold(instant, |at, &(unit, count)| match unit {
                IntervalUnit::Days => at.checked_add_days(Days::new(u64::from(count))),
                IntervalUnit::Weeks => at.checked_add_days(Days::new(u64::from(count) * 7)),
                IntervalUnit::Months => at.checked_add_months(Months::new(count)),
                IntervalUnit::Years => at.checked_add_months(Months::new(count.checked_mul(12)?)),
            })
    }
}

impl fmt::Display for IntervalSpec {
    /// `1 month and 2 days`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (unit, count)) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(" and ")?;
            }
            if *count == 1 {
                write!(f, "1 {}", unit.singular())?;
            } else {
                write!(f, "{count} {unit}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
    }

    #[test]
    fn duplicate_units_are_summed_in_first_position() {
        let spec = IntervalSpec::from_parts([
            (IntervalUnit::Days, 1),
            (IntervalUnit::Weeks, 2),
            (IntervalUnit::Days, 3),
        ])
        .unwrap();

        assert_eq!(
            spec.parts(),
            &[(IntervalUnit::Days, 4), (IntervalUnit::Weeks, 2)]
        );
        assert_eq!(spec.count(IntervalUnit::Months), 0);
    }

    #[test]
    fn empty_or_zero_is_rejected() {
        assert!(IntervalSpec::from_parts([]).is_none());
        assert!(IntervalSpec::new(IntervalUnit::Days, 0).is_none());
    }

    #[test]
    fn months_are_calendar_months() {
        let spec = IntervalSpec::new(IntervalUnit::Months, 1).unwrap();
        assert_eq!(spec.add_to(at(2024, 1, 31)), Some(at(2024, 2, 29)));
        assert_eq!(spec.add_to(at(2023, 1, 31)), Some(at(2023, 2, 28)));
    }

    #[test]
    fn clauses_apply_in_directive_order() {
        // 1 month then 2 days: Jan 30 -> Feb 29 -> Mar 2
        let month_first =
            IntervalSpec::from_parts([(IntervalUnit::Months, 1), (IntervalUnit::Days, 2)]).unwrap();
        assert_eq!(month_first.add_to(at(2024, 1, 30)), Some(at(2024, 3, 2)));

        // 2 days then 1 month: Jan 30 -> Feb 1 -> Mar 1
        let days_first =
            IntervalSpec::from_parts([(IntervalUnit::Days, 2), (IntervalUnit::Months, 1)]).unwrap();
        assert_eq!(days_first.add_to(at(2024, 1, 30)), Some(at(2024, 3, 1)));
    }

    #[test]
    fn weeks_and_years() {
        let spec =
            IntervalSpec::from_parts([(IntervalUnit::Years, 1), (IntervalUnit::Weeks, 2)]).unwrap();
        assert_eq!(spec.add_to(at(2024, 2, 29)), Some(at(2025, 3, 14)));
    }

    #[test]
    fn display_reads_like_the_directive() {
        let spec =
            IntervalSpec::from_parts([(IntervalUnit::Months, 1), (IntervalUnit::Days, 2)]).unwrap();
        assert_eq!(spec.to_string(), "1 month and 2 days");
    }
}

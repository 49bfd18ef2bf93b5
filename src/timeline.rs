use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::model::{MatchRecord, Surface};
use crate::statistic::{Reduction, Statistic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Granularity {
    Month,
    Quarter,
}

impl Granularity {
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        let month = match self {
            Granularity::Month => date.month(),
            Granularity::Quarter => (date.month0() / 3) * 3 + 1,
        };
        NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
    }

    pub fn label(self, start: NaiveDate) -> String {
        match self {
            Granularity::Month => format!("{}-{:02}", start.year(), start.month()),
            Granularity::Quarter => start.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Granularity::Month => "Month-Year",
            Granularity::Quarter => "Quarter",
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" | "monthly" | "m" => Ok(Granularity::Month),
            "quarter" | "quarterly" | "q" => Ok(Granularity::Quarter),
            other => Err(format!("unknown bucket granularity `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub label: String,
    pub start: NaiveDate,
    /// Rows that fell into this bucket.
    pub matches: usize,
    /// `None` when no match was played in the bucket.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub player: String,
    pub surface: Option<Surface>,
    pub statistic: Statistic,
    pub granularity: Granularity,
    pub title: &'static str,
    pub points: Vec<TimelinePoint>,
}

impl Timeline {
    pub fn non_empty(&self) -> impl Iterator<Item = &TimelinePoint> {
        self.points.iter().filter(|p| p.value.is_some())
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct DayAgg {
    rows: usize,
    sum: f64,
}

impl DayAgg {
    fn reduce(&self, reduction: Reduction) -> f64 {
        match reduction {
            Reduction::Sum => self.sum,
            Reduction::Mean => self.sum / self.rows as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct BucketAgg {
    rows: usize,
    days: usize,
    acc: f64,
}

/// Time-bucketed series of one statistic for one player.
///
/// Rows are reduced per calendar day first, then per bucket: sums add up day
/// sums and rates average the day means. Every bucket between the first and
/// last match is emitted; buckets with no match carry `value: None`.
pub fn aggregate_timeline<'a>(
    matches: impl IntoIterator<Item = &'a MatchRecord>,
    player: &str,
    surface: Option<Surface>,
    statistic: Statistic,
    granularity: Granularity,
) -> Timeline {
    let mut days: BTreeMap<NaiveDate, DayAgg> = BTreeMap::new();
    for r in matches {
        if r.player_name != player || surface.is_some_and(|s| s != r.surface) {
            continue;
        }
        let day = days.entry(r.tourney_date).or_default();
        day.rows += 1;
        day.sum += statistic.value(r);
    }

    let reduction = statistic.reduction();
    let mut buckets: BTreeMap<NaiveDate, BucketAgg> = BTreeMap::new();
    if let (Some((first, _)), Some((last, _))) = (days.first_key_value(), days.last_key_value()) {
        for date in first.iter_days().take_while(|d| d <= last) {
            let bucket = buckets.entry(granularity.bucket_start(date)).or_default();
            if let Some(day) = days.get(&date) {
                bucket.rows += day.rows;
                bucket.days += 1;
                bucket.acc += day.reduce(reduction);
            }
        }
    }

    let points = buckets
        .into_iter()
        .map(|(start, b)| TimelinePoint {
            label: granularity.label(start),
            start,
            matches: b.rows,
            value: (b.days > 0).then(|| match reduction {
                Reduction::Sum => b.acc,
                Reduction::Mean => b.acc / b.days as f64,
            }),
        })
        .collect();

    Timeline {
        player: player.to_string(),
        surface,
        statistic,
        granularity,
        title: statistic.axis_label(),
        points,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::Granularity;

    #[test]
    fn quarter_starts_on_first_day() {
        let d = NaiveDate::from_ymd_opt(2019, 8, 17).unwrap();
        let q = Granularity::Quarter.bucket_start(d);
        assert_eq!(q, NaiveDate::from_ymd_opt(2019, 7, 1).unwrap());
        assert_eq!(Granularity::Quarter.label(q), "2019-07-01");
        let m = Granularity::Month.bucket_start(d);
        assert_eq!(Granularity::Month.label(m), "2019-08");
    }

    #[test]
    fn parses_granularity() {
        assert_eq!("Quarterly".parse::<Granularity>(), Ok(Granularity::Quarter));
        assert_eq!("month".parse::<Granularity>(), Ok(Granularity::Month));
        assert!("weekly".parse::<Granularity>().is_err());
    }
}

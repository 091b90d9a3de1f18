// Upload timing — when did well-viewed videos go out?
//
// Groups timestamped records by publish hour (UTC), weekday and calendar
// date and averages their view counts. The "optimal" hour and day are simply
// the buckets with the highest mean, which is as correlational as the term
// ranking: a small sample can be dominated by one viral upload.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::VideoRecord;
use crate::error::{AnalysisError, AnalysisResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyViews {
    /// Hour of day, 0-23 UTC
    pub hour: u32,
    pub mean_views: f64,
    pub videos: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyViews {
    pub day: Weekday,
    pub mean_views: f64,
    pub videos: usize,
}

/// Upload count and mean views for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateActivity {
    pub date: NaiveDate,
    pub uploads: usize,
    pub mean_views: f64,
}

/// View-count aggregates by publish time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSchedule {
    /// Only hours that had at least one upload, ascending
    pub hourly: Vec<HourlyViews>,
    /// Only weekdays that had at least one upload, Monday first
    pub daily: Vec<DailyViews>,
    pub by_date: Vec<DateActivity>,
    pub optimal_hour: u32,
    pub optimal_day: Weekday,
    /// Records that carried a publish time
    pub videos: usize,
}

/// Running sum and count for one bucket.
#[derive(Default, Clone, Copy)]
struct Bucket {
    total: f64,
    count: usize,
}

impl Bucket {
    fn add(&mut self, views: u64) {
        self.total += views as f64;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Key of the bucket with the highest mean; earliest key wins ties.
fn best_bucket<K: Copy>(buckets: &BTreeMap<K, Bucket>) -> Option<K> {
    let mut best: Option<(K, f64)> = None;
    for (&key, bucket) in buckets {
        let mean = bucket.mean();
        if best.map_or(true, |(_, m)| mean > m) {
            best = Some((key, mean));
        }
    }
    best.map(|(key, _)| key)
}

impl UploadSchedule {
    /// Aggregate the records that have a publish time.
    ///
    /// Fails with `InsufficientData` when none do.
    pub fn from_records(records: &[VideoRecord]) -> AnalysisResult<Self> {
        let mut hours: BTreeMap<u32, Bucket> = BTreeMap::new();
        let mut days: BTreeMap<u32, Bucket> = BTreeMap::new();
        let mut dates: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
        let mut videos = 0;

        for record in records {
            let Some(ts) = record.published_at else {
                continue;
            };
            videos += 1;
            hours.entry(ts.hour()).or_default().add(record.view_count);
            days.entry(ts.weekday().num_days_from_monday())
                .or_default()
                .add(record.view_count);
            dates.entry(ts.date_naive()).or_default().add(record.view_count);
        }

        let (Some(optimal_hour), Some(best_day)) = (best_bucket(&hours), best_bucket(&days))
        else {
            return Err(AnalysisError::InsufficientData(
                "no records carry a publish time".to_string(),
            ));
        };
        let optimal_day = weekday_from_index(best_day);

        info!(
            videos,
            optimal_hour,
            optimal_day = %optimal_day,
            "Computed upload schedule"
        );

        Ok(Self {
            hourly: hours
                .iter()
                .map(|(&hour, b)| HourlyViews {
                    hour,
                    mean_views: b.mean(),
                    videos: b.count,
                })
                .collect(),
            daily: days
                .iter()
                .map(|(&day, b)| DailyViews {
                    day: weekday_from_index(day),
                    mean_views: b.mean(),
                    videos: b.count,
                })
                .collect(),
            by_date: dates
                .iter()
                .map(|(&date, b)| DateActivity {
                    date,
                    uploads: b.count,
                    mean_views: b.mean(),
                })
                .collect(),
            optimal_hour,
            optimal_day,
            videos,
        })
    }
}

fn weekday_from_index(days_from_monday: u32) -> Weekday {
    match days_from_monday {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

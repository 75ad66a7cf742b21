//! Calendar bucketing of dated records.
//!
//! Each record lands in exactly one bucket, chosen by a single date field.
//! Sales and expenses are placed by creation date and payments by payment
//! date, so a payment can settle a sale in a later period than the sale itself.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{ExpenseRecord, PaymentRecord, RecordSet, SaleRecord};

/// Calendar unit of a bucket.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
    Year,
}

/// First day of a week bucket.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl Granularity {
    /// First calendar day of the period containing `date`.
    pub fn period_start(self, date: NaiveDate, week_start: WeekStart) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                let back = match week_start {
                    WeekStart::Monday => date.weekday().num_days_from_monday(),
                    WeekStart::Sunday => date.weekday().num_days_from_sunday(),
                };
                date.checked_sub_days(Days::new(u64::from(back)))
                    .unwrap_or(date)
            }
            Granularity::Month => date.with_day(1).unwrap_or(date),
            Granularity::Year => date.with_ordinal(1).unwrap_or(date),
        }
    }

    /// Display label for the period beginning on `start`.
    ///
    /// Monday weeks use ISO week numbering (`2024-W01`). Sunday weeks use the
    /// Sunday-based week of year of their first day (`2023-W53` for the week
    /// starting 2023-12-31).
    pub fn label(self, start: NaiveDate, week_start: WeekStart) -> String {
        match self {
            Granularity::Day => start.format("%Y-%m-%d").to_string(),
            Granularity::Week => match week_start {
                WeekStart::Monday => {
                    let iso = start.iso_week();
                    format!("{}-W{:02}", iso.year(), iso.week())
                }
                WeekStart::Sunday => start.format("%Y-W%U").to_string(),
            },
            Granularity::Month => start.format("%Y-%m").to_string(),
            Granularity::Year => start.format("%Y").to_string(),
        }
    }

    pub fn key(self, date: NaiveDate, week_start: WeekStart) -> BucketKey {
        let start = self.period_start(date, week_start);
        BucketKey {
            start,
            label: self.label(start, week_start),
        }
    }
}

/// Identifies one calendar period. Ordered by start date.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub start: NaiveDate,
    pub label: String,
}

/// Accumulated activity for one calendar period.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TimeBucket {
    pub key: BucketKey,
    pub sales_total: f64,
    pub paid_total: f64,
    pub expense_total: f64,
    /// Number of sales.
    pub transaction_count: usize,
    /// Product units sold.
    pub product_count: f64,
}

impl TimeBucket {
    pub fn empty(key: BucketKey) -> Self {
        Self {
            key,
            sales_total: 0.0,
            paid_total: 0.0,
            expense_total: 0.0,
            transaction_count: 0,
            product_count: 0.0,
        }
    }

    fn absorb(&mut self, other: &TimeBucket) {
        self.sales_total += other.sales_total;
        self.paid_total += other.paid_total;
        self.expense_total += other.expense_total;
        self.transaction_count += other.transaction_count;
        self.product_count += other.product_count;
    }
}

/// Which date of a record decides its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    CreatedAt,
    PaymentDate,
}

/// A record that can be placed in a [`TimeBucket`].
pub trait BucketSource {
    /// The record's date for `field`, or `None` when it has no such date.
    fn bucket_date(&self, field: DateField) -> Option<NaiveDate>;

    /// Adds this record's contribution to `bucket`.
    fn accumulate(&self, bucket: &mut TimeBucket);
}

impl BucketSource for SaleRecord {
    fn bucket_date(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::CreatedAt => self.created_on,
            DateField::PaymentDate => None,
        }
    }

    fn accumulate(&self, bucket: &mut TimeBucket) {
        bucket.sales_total += self.total_amount;
        bucket.transaction_count += 1;
        bucket.product_count += self.units();
    }
}

impl BucketSource for PaymentRecord {
    fn bucket_date(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::CreatedAt => self.created_on,
            DateField::PaymentDate => self.paid_on,
        }
    }

    fn accumulate(&self, bucket: &mut TimeBucket) {
        bucket.paid_total += self.amount;
    }
}

impl BucketSource for ExpenseRecord {
    fn bucket_date(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::CreatedAt => self.created_on,
            DateField::PaymentDate => None,
        }
    }

    fn accumulate(&self, bucket: &mut TimeBucket) {
        bucket.expense_total += self.amount;
    }
}

/// Groups `records` into calendar buckets by `field`, sorted ascending.
///
/// Records without a date for `field` are left out.
pub fn bucket<R: BucketSource>(
    records: &[R],
    field: DateField,
    granularity: Granularity,
    week_start: WeekStart,
) -> Vec<TimeBucket> {
    let mut buckets: BTreeMap<NaiveDate, TimeBucket> = BTreeMap::new();

    for record in records {
        let Some(date) = record.bucket_date(field) else {
            continue;
        };
        let key = granularity.key(date, week_start);
        let entry = buckets
            .entry(key.start)
            .or_insert_with(|| TimeBucket::empty(key));
        record.accumulate(entry);
    }

    buckets.into_values().collect()
}

/// Merges bucket series that share a granularity into one ascending series.
///
/// A period active in any input appears once, with zeros for categories that
/// had no activity in it.
pub fn merge_series<I>(series: I) -> Vec<TimeBucket>
where
    I: IntoIterator<Item = Vec<TimeBucket>>,
{
    let mut merged: BTreeMap<NaiveDate, TimeBucket> = BTreeMap::new();

    for part in series {
        for b in part {
            match merged.get_mut(&b.key.start) {
                Some(existing) => existing.absorb(&b),
                None => {
                    merged.insert(b.key.start, b);
                }
            }
        }
    }

    merged.into_values().collect()
}

/// The standard merged series: sales and expenses by creation date, payments
/// by payment date.
pub fn bucket_records(
    records: &RecordSet,
    granularity: Granularity,
    week_start: WeekStart,
) -> Vec<TimeBucket> {
    merge_series([
        bucket(&records.sales, DateField::CreatedAt, granularity, week_start),
        bucket(&records.payments, DateField::PaymentDate, granularity, week_start),
        bucket(&records.expenses, DateField::CreatedAt, granularity, week_start),
    ])
}

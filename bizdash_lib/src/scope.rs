//! Narrowing a record set to a date range and/or an owning user.
//!
//! The backend usually scopes records before they reach the engine; this is
//! for callers holding a wider snapshot.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{EntityRef, RecordSet};

/// Inclusive calendar range. Either bound may be open.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether `date` falls inside the range. An undated record only belongs
    /// to an unbounded range.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub range: DateRange,
    /// Identifier of the seller / collecting user / recording user.
    pub owner: Option<String>,
}

impl Scope {
    pub fn new(range: DateRange, owner: Option<String>) -> Self {
        Self { range, owner }
    }

    fn owned(&self, who: Option<&EntityRef>) -> bool {
        match &self.owner {
            None => true,
            Some(owner) => who.is_some_and(|w| &w.id == owner),
        }
    }

    /// A fresh record set holding only the records inside this scope.
    ///
    /// Sales and expenses are dated by creation, payments by payment date.
    pub fn apply(&self, records: &RecordSet) -> RecordSet {
        RecordSet {
            sales: records
                .sales
                .iter()
                .filter(|s| self.range.contains(s.created_on) && self.owned(s.seller.as_ref()))
                .cloned()
                .collect(),
            payments: records
                .payments
                .iter()
                .filter(|p| self.range.contains(p.paid_on) && self.owned(p.collected_by.as_ref()))
                .cloned()
                .collect(),
            expenses: records
                .expenses
                .iter()
                .filter(|e| self.range.contains(e.created_on) && self.owned(e.recorded_by.as_ref()))
                .cloned()
                .collect(),
        }
    }
}

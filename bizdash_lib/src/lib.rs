//! Aggregation engine for the business dashboard: normalization, time
//! bucketing, financial metrics, trends, payment-status breakdown and rankings.
//!
//! Every analytics function is pure and infallible over a normalized
//! [`RecordSet`]; errors only come from configuration and input validation.

pub mod bucket;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod ranking;
pub mod report;
pub mod scope;
pub mod status;
pub mod trend;
pub mod validation;

pub use bizdash_records;
pub use bizdash_records::{RawExpense, RawPayment, RawSale, RecordBatch};

pub use bucket::{bucket, bucket_records, merge_series, BucketKey, DateField, Granularity, TimeBucket, WeekStart};
pub use config::{AnalyticsConfig, ConfigError};
pub use error::DashboardError;
pub use metrics::{compute_metrics, summarize_records, summarize_series, BucketMetrics, FinancialMetrics};
pub use model::{
    EntityRef, ExpenseRecord, LineItem, PaymentMethod, PaymentRecord, PaymentRef, RecordSet,
    SaleRecord, SaleStatus,
};
pub use normalize::{normalize, NormalizationReport, Normalized, Normalizer};
pub use ranking::{
    run_ranking, RankDirection, RankEntity, RankMeasure, RankedEntity, RankingRequest,
};
pub use report::{
    build_report, build_report_from_raw, build_report_normalized, trends_for, DashboardReport,
};
pub use scope::{DateRange, Scope};
pub use status::{classify_by_status, StatusBreakdown, StatusBucket};
pub use trend::{analyze_trends, analyze_trends_as_of, analyze_trends_with, TrendOptions, TrendSummary};

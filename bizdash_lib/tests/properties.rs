// Property-based tests for bucketing, metrics and ranking invariants.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use bizdash_lib::ranking::{clients_by_spend, products_by_revenue};
use bizdash_lib::{
    bucket_records, build_report, compute_metrics, AnalyticsConfig, DateRange, EntityRef,
    ExpenseRecord, Granularity, LineItem, PaymentMethod, PaymentRecord, RankDirection, RecordSet,
    SaleRecord, SaleStatus, Scope, WeekStart,
};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn day(offset: Option<u64>) -> Option<NaiveDate> {
    let base = NaiveDate::from_ymd_opt(2023, 11, 15)?;
    offset.and_then(|o| base.checked_add_days(Days::new(o)))
}

/// Whole currency units keep sums exact in f64.
fn arb_amount() -> impl Strategy<Value = f64> {
    (0u32..100_000).prop_map(f64::from)
}

fn arb_offset() -> impl Strategy<Value = Option<u64>> {
    prop_oneof![
        4 => (0u64..500).prop_map(Some),
        1 => Just(None),
    ]
}

fn arb_status() -> impl Strategy<Value = SaleStatus> {
    prop_oneof![
        Just(SaleStatus::Completed),
        Just(SaleStatus::PartiallyPaid),
        Just(SaleStatus::Pending),
        Just(SaleStatus::Cancelled),
    ]
}

fn arb_sale() -> impl Strategy<Value = SaleRecord> {
    (arb_offset(), arb_amount(), arb_status(), 0u8..5, 0u8..4, 1u32..10).prop_map(
        |(offset, total, status, client, product, quantity)| SaleRecord {
            id: String::new(),
            created_on: day(offset),
            total_amount: total,
            items: vec![LineItem {
                product: Some(EntityRef::new(format!("p{}", product), format!("Product {}", product))),
                quantity: f64::from(quantity),
                price_at_sale: total / f64::from(quantity),
                cost_price: None,
            }],
            status,
            client: Some(EntityRef::new(format!("c{}", client), format!("Client {}", client))),
            seller: None,
            payments: Vec::new(),
            profit: None,
        },
    )
}

fn arb_payment() -> impl Strategy<Value = PaymentRecord> {
    (arb_offset(), arb_amount()).prop_map(|(offset, amount)| PaymentRecord {
        id: String::new(),
        amount,
        paid_on: day(offset),
        created_on: None,
        method: PaymentMethod::Cash,
        sale_id: None,
        collected_by: None,
    })
}

fn arb_expense() -> impl Strategy<Value = ExpenseRecord> {
    (arb_offset(), arb_amount(), 0u8..3).prop_map(|(offset, amount, category)| ExpenseRecord {
        id: String::new(),
        amount,
        created_on: day(offset),
        category: format!("cat{}", category),
        supplier: None,
        recorded_by: None,
    })
}

fn arb_records() -> impl Strategy<Value = RecordSet> {
    (
        prop::collection::vec(arb_sale(), 0..30),
        prop::collection::vec(arb_payment(), 0..30),
        prop::collection::vec(arb_expense(), 0..30),
    )
        .prop_map(|(mut sales, mut payments, mut expenses)| {
            for (i, s) in sales.iter_mut().enumerate() {
                s.id = format!("s{}", i);
            }
            for (i, p) in payments.iter_mut().enumerate() {
                p.id = format!("pay{}", i);
            }
            for (i, e) in expenses.iter_mut().enumerate() {
                e.id = format!("e{}", i);
            }
            RecordSet {
                sales,
                payments,
                expenses,
            }
        })
}

fn arb_granularity() -> impl Strategy<Value = Granularity> {
    prop_oneof![
        Just(Granularity::Day),
        Just(Granularity::Week),
        Just(Granularity::Month),
        Just(Granularity::Year),
    ]
}

fn arb_week_start() -> impl Strategy<Value = WeekStart> {
    prop_oneof![Just(WeekStart::Monday), Just(WeekStart::Sunday)]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn bucket_totals_equal_dated_totals(
        records in arb_records(),
        granularity in arb_granularity(),
        week_start in arb_week_start(),
    ) {
        let series = bucket_records(&records, granularity, week_start);

        let dated_sales: f64 = records.sales.iter().filter(|s| s.created_on.is_some()).map(|s| s.total_amount).sum();
        let dated_paid: f64 = records.payments.iter().filter(|p| p.paid_on.is_some()).map(|p| p.amount).sum();
        let dated_expenses: f64 = records.expenses.iter().filter(|e| e.created_on.is_some()).map(|e| e.amount).sum();
        let dated_count = records.sales.iter().filter(|s| s.created_on.is_some()).count();

        prop_assert_eq!(series.iter().map(|b| b.sales_total).sum::<f64>(), dated_sales);
        prop_assert_eq!(series.iter().map(|b| b.paid_total).sum::<f64>(), dated_paid);
        prop_assert_eq!(series.iter().map(|b| b.expense_total).sum::<f64>(), dated_expenses);
        prop_assert_eq!(series.iter().map(|b| b.transaction_count).sum::<usize>(), dated_count);
    }

    #[test]
    fn buckets_are_strictly_ascending(
        records in arb_records(),
        granularity in arb_granularity(),
        week_start in arb_week_start(),
    ) {
        let series = bucket_records(&records, granularity, week_start);
        for pair in series.windows(2) {
            prop_assert!(pair[0].key.start < pair[1].key.start);
            prop_assert_ne!(&pair[0].key.label, &pair[1].key.label);
        }
    }

    #[test]
    fn zero_denominators_give_zero(expenses in arb_amount(), paid in arb_amount(), sales in arb_amount()) {
        let no_sales = compute_metrics(0.0, expenses, paid);
        prop_assert_eq!(no_sales.profit_margin, 0.0);
        prop_assert_eq!(no_sales.net_margin, 0.0);
        prop_assert_eq!(no_sales.operational_efficiency, 0.0);
        prop_assert_eq!(no_sales.collection_rate, 0.0);

        let no_expenses = compute_metrics(sales, 0.0, paid);
        prop_assert_eq!(no_expenses.roi, 0.0);
        prop_assert!(no_expenses.profit_margin.is_finite());
    }

    #[test]
    fn report_is_deterministic(records in arb_records()) {
        let config = AnalyticsConfig::default();
        let first = serde_json::to_string(&build_report(&records, &config)).unwrap();
        let second = serde_json::to_string(&build_report(&records, &config)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn ranking_is_ordered_and_bounded(records in arb_records(), n in 1usize..6) {
        let top = products_by_revenue(&records.sales, n, RankDirection::Top);
        prop_assert!(top.len() <= n);
        for pair in top.windows(2) {
            prop_assert!(pair[0].measure >= pair[1].measure);
        }

        let bottom = clients_by_spend(&records.sales, n, RankDirection::Bottom);
        prop_assert!(bottom.len() <= n);
        for pair in bottom.windows(2) {
            prop_assert!(pair[0].measure <= pair[1].measure);
        }
    }

    #[test]
    fn equal_measures_keep_first_seen_order(clients in prop::collection::vec(0u8..10, 1..20), n in 1usize..10) {
        let sales: Vec<SaleRecord> = clients
            .iter()
            .enumerate()
            .map(|(i, c)| SaleRecord {
                id: format!("s{}", i),
                created_on: None,
                total_amount: 0.0,
                items: Vec::new(),
                status: SaleStatus::Completed,
                client: Some(EntityRef::new(format!("c{}", c), format!("c{}", c))),
                seller: None,
                payments: Vec::new(),
                profit: None,
            })
            .collect();

        let mut first_seen: Vec<String> = Vec::new();
        for c in &clients {
            let id = format!("c{}", c);
            if !first_seen.contains(&id) {
                first_seen.push(id);
            }
        }
        first_seen.truncate(n);

        for direction in [RankDirection::Top, RankDirection::Bottom] {
            let ranked = clients_by_spend(&sales, n, direction);
            let ids: Vec<String> = ranked.into_iter().map(|r| r.id).collect();
            prop_assert_eq!(&ids, &first_seen);
        }
    }

    #[test]
    fn scope_only_removes(records in arb_records(), from in 0u64..500, len in 0u64..200) {
        let range = DateRange::new(day(Some(from)), day(Some(from + len)));
        let scoped = Scope::new(range, None).apply(&records);
        prop_assert!(scoped.sales.len() <= records.sales.len());
        prop_assert!(scoped.payments.iter().all(|p| range.contains(p.paid_on)));
        prop_assert!(scoped.expenses.iter().all(|e| e.created_on.is_some()));
    }
}

//! Top-N / bottom-N rankings over products, clients, sellers and more.
//!
//! Groups are keyed by a stable identifier, never by display name, so two
//! distinct products that share a name stay apart. Orderings are stable: on
//! equal measures the group seen first in the input keeps the earlier rank.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::model::{EntityRef, ExpenseRecord, PaymentRecord, RecordSet, SaleRecord};

/// Which end of the ordering to keep.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RankDirection {
    /// Largest measure first.
    #[default]
    Top,
    /// Smallest measure first.
    Bottom,
}

/// One ranked group.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RankedEntity {
    pub id: String,
    pub name: String,
    /// The value the ranking is ordered by.
    pub measure: f64,
    /// Secondary figure: units sold for products, number of records otherwise.
    pub count: f64,
}

/// What a single input item adds to its group.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Contribution {
    pub measure: f64,
    pub count: f64,
}

impl Contribution {
    pub fn new(measure: f64, count: f64) -> Self {
        Self { measure, count }
    }
}

/// Sums contributions per group, keeping groups in first-seen order.
///
/// Items for which `group_key` returns `None` are ignored.
pub fn accumulate<T, K, M>(items: impl IntoIterator<Item = T>, group_key: K, measure: M) -> Vec<RankedEntity>
where
    K: Fn(&T) -> Option<EntityRef>,
    M: Fn(&T) -> Contribution,
{
    let mut groups: Vec<RankedEntity> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let Some(key) = group_key(&item) else {
            continue;
        };
        let contribution = measure(&item);

        let slot = match index.get(&key.id) {
            Some(&slot) => slot,
            None => {
                index.insert(key.id.clone(), groups.len());
                groups.push(RankedEntity {
                    id: key.id,
                    name: key.name,
                    measure: 0.0,
                    count: 0.0,
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[slot];
        group.measure += contribution.measure;
        group.count += contribution.count;
    }

    groups
}

/// Stable-sorts groups by measure in `direction` and keeps the first `n`.
pub fn order(mut groups: Vec<RankedEntity>, n: usize, direction: RankDirection) -> Vec<RankedEntity> {
    groups.sort_by(|a, b| {
        let ord = match direction {
            RankDirection::Top => b.measure.partial_cmp(&a.measure),
            RankDirection::Bottom => a.measure.partial_cmp(&b.measure),
        };
        ord.unwrap_or(Ordering::Equal)
    });
    groups.truncate(n);
    groups
}

/// Groups `items` by `group_key`, sums `measure` per group and returns the
/// first `n` groups in `direction`.
pub fn rank<T, K, M>(
    items: impl IntoIterator<Item = T>,
    group_key: K,
    measure: M,
    n: usize,
    direction: RankDirection,
) -> Vec<RankedEntity>
where
    K: Fn(&T) -> Option<EntityRef>,
    M: Fn(&T) -> Contribution,
{
    order(accumulate(items, group_key, measure), n, direction)
}

/// Profit of a sale.
///
/// A profit stored on the sale wins. Otherwise the line items decide, with an
/// unknown unit cost counted as zero. Only a sale with neither falls back to
/// `fallback_rate` of its total.
pub fn sale_profit(sale: &SaleRecord, fallback_rate: f64) -> f64 {
    if let Some(profit) = sale.profit {
        return profit;
    }
    if !sale.items.is_empty() {
        return sale.items.iter().map(|item| item.profit()).sum();
    }
    sale.total_amount * fallback_rate
}

/// Products by revenue (price at sale times quantity). `count` is units sold.
pub fn products_by_revenue(sales: &[SaleRecord], n: usize, direction: RankDirection) -> Vec<RankedEntity> {
    rank(
        sales.iter().flat_map(|s| s.items.iter()),
        |item| item.product.clone(),
        |item| Contribution::new(item.revenue(), item.quantity),
        n,
        direction,
    )
}

/// Products by units sold. `count` is units sold as well.
pub fn products_by_quantity(sales: &[SaleRecord], n: usize, direction: RankDirection) -> Vec<RankedEntity> {
    rank(
        sales.iter().flat_map(|s| s.items.iter()),
        |item| item.product.clone(),
        |item| Contribution::new(item.quantity, item.quantity),
        n,
        direction,
    )
}

/// Clients by total spend. `count` is the number of purchases.
pub fn clients_by_spend(sales: &[SaleRecord], n: usize, direction: RankDirection) -> Vec<RankedEntity> {
    rank(
        sales,
        |sale| sale.client.clone(),
        |sale| Contribution::new(sale.total_amount, 1.0),
        n,
        direction,
    )
}

/// Clients by number of purchases.
pub fn clients_by_purchases(sales: &[SaleRecord], n: usize, direction: RankDirection) -> Vec<RankedEntity> {
    rank(
        sales,
        |sale| sale.client.clone(),
        |_| Contribution::new(1.0, 1.0),
        n,
        direction,
    )
}

/// Clients with exactly one purchase in the given sales, ordered by spend.
pub fn inactive_clients(sales: &[SaleRecord], n: usize, direction: RankDirection) -> Vec<RankedEntity> {
    let mut groups = accumulate(
        sales,
        |sale| sale.client.clone(),
        |sale| Contribution::new(sale.total_amount, 1.0),
    );
    groups.retain(|g| g.count == 1.0);
    order(groups, n, direction)
}

/// Sellers by total sales amount. `count` is the number of sales.
pub fn sellers_by_sales(sales: &[SaleRecord], n: usize, direction: RankDirection) -> Vec<RankedEntity> {
    rank(
        sales,
        |sale| sale.seller.clone(),
        |sale| Contribution::new(sale.total_amount, 1.0),
        n,
        direction,
    )
}

/// Sellers by profit, see [`sale_profit`]. `count` is the number of sales.
pub fn sellers_by_profit(
    sales: &[SaleRecord],
    n: usize,
    direction: RankDirection,
    fallback_rate: f64,
) -> Vec<RankedEntity> {
    rank(
        sales,
        |sale| sale.seller.clone(),
        |sale| Contribution::new(sale_profit(sale, fallback_rate), 1.0),
        n,
        direction,
    )
}

/// Sellers by number of sales.
pub fn sellers_by_count(sales: &[SaleRecord], n: usize, direction: RankDirection) -> Vec<RankedEntity> {
    rank(
        sales,
        |sale| sale.seller.clone(),
        |_| Contribution::new(1.0, 1.0),
        n,
        direction,
    )
}

/// Categories are matched case-insensitively; the first spelling seen names the group.
fn category_key(e: &ExpenseRecord) -> Option<EntityRef> {
    Some(EntityRef::new(e.category.to_lowercase(), e.category.clone()))
}

fn method_key(p: &PaymentRecord) -> Option<EntityRef> {
    let label = p.method.to_string();
    Some(EntityRef::new(label.clone(), label))
}

/// Expense categories by amount.
pub fn expenses_by_category(expenses: &[ExpenseRecord], n: usize, direction: RankDirection) -> Vec<RankedEntity> {
    rank(
        expenses,
        |e| category_key(e),
        |e| Contribution::new(e.amount, 1.0),
        n,
        direction,
    )
}

/// Expense categories by number of expenses.
pub fn expenses_by_category_count(expenses: &[ExpenseRecord], n: usize, direction: RankDirection) -> Vec<RankedEntity> {
    rank(expenses, |e| category_key(e), |_| Contribution::new(1.0, 1.0), n, direction)
}

/// Payment methods by amount collected.
pub fn payments_by_method(payments: &[PaymentRecord], n: usize, direction: RankDirection) -> Vec<RankedEntity> {
    rank(
        payments,
        |p| method_key(p),
        |p| Contribution::new(p.amount, 1.0),
        n,
        direction,
    )
}

/// Payment methods by number of payments.
pub fn payments_by_method_count(payments: &[PaymentRecord], n: usize, direction: RankDirection) -> Vec<RankedEntity> {
    rank(payments, |p| method_key(p), |_| Contribution::new(1.0, 1.0), n, direction)
}

/// The kind of entity a ranking is about.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RankEntity {
    Products,
    Clients,
    InactiveClients,
    Sellers,
    Categories,
    Methods,
}

/// The figure a ranking is ordered by.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RankMeasure {
    Revenue,
    Quantity,
    Spend,
    Sales,
    Profit,
    Count,
    Amount,
}

impl RankEntity {
    /// Measures that make sense for this entity; the first one is the default.
    pub fn measures(self) -> &'static [RankMeasure] {
        match self {
            RankEntity::Products => &[RankMeasure::Revenue, RankMeasure::Quantity],
            RankEntity::Clients => &[RankMeasure::Spend, RankMeasure::Count],
            RankEntity::InactiveClients => &[RankMeasure::Spend],
            RankEntity::Sellers => &[RankMeasure::Sales, RankMeasure::Profit, RankMeasure::Count],
            RankEntity::Categories => &[RankMeasure::Amount, RankMeasure::Count],
            RankEntity::Methods => &[RankMeasure::Amount, RankMeasure::Count],
        }
    }

    pub fn default_measure(self) -> RankMeasure {
        self.measures()[0]
    }
}

impl fmt::Display for RankEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RankEntity::Products => "products",
            RankEntity::Clients => "clients",
            RankEntity::InactiveClients => "inactive-clients",
            RankEntity::Sellers => "sellers",
            RankEntity::Categories => "categories",
            RankEntity::Methods => "methods",
        };
        write!(f, "{}", label)
    }
}

impl fmt::Display for RankMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RankMeasure::Revenue => "revenue",
            RankMeasure::Quantity => "quantity",
            RankMeasure::Spend => "spend",
            RankMeasure::Sales => "sales",
            RankMeasure::Profit => "profit",
            RankMeasure::Count => "count",
            RankMeasure::Amount => "amount",
        };
        write!(f, "{}", label)
    }
}

/// A fully specified ranking. Build it through
/// [`crate::validation::validate_ranking`] to reject nonsensical pairs.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct RankingRequest {
    pub entity: RankEntity,
    pub measure: RankMeasure,
    pub direction: RankDirection,
    pub n: usize,
}

/// Runs `request` over `records`.
///
/// A measure that does not apply to the entity falls back to the entity's
/// default measure.
pub fn run_ranking(records: &RecordSet, request: &RankingRequest, fallback_rate: f64) -> Vec<RankedEntity> {
    let RankingRequest {
        entity,
        direction,
        n,
        ..
    } = *request;
    let measure = if entity.measures().contains(&request.measure) {
        request.measure
    } else {
        entity.default_measure()
    };

    match (entity, measure) {
        (RankEntity::Products, RankMeasure::Quantity) => products_by_quantity(&records.sales, n, direction),
        (RankEntity::Products, _) => products_by_revenue(&records.sales, n, direction),
        (RankEntity::Clients, RankMeasure::Count) => clients_by_purchases(&records.sales, n, direction),
        (RankEntity::Clients, _) => clients_by_spend(&records.sales, n, direction),
        (RankEntity::InactiveClients, _) => inactive_clients(&records.sales, n, direction),
        (RankEntity::Sellers, RankMeasure::Profit) => {
            sellers_by_profit(&records.sales, n, direction, fallback_rate)
        }
        (RankEntity::Sellers, RankMeasure::Count) => sellers_by_count(&records.sales, n, direction),
        (RankEntity::Sellers, _) => sellers_by_sales(&records.sales, n, direction),
        (RankEntity::Categories, RankMeasure::Count) => {
            expenses_by_category_count(&records.expenses, n, direction)
        }
        (RankEntity::Categories, _) => expenses_by_category(&records.expenses, n, direction),
        (RankEntity::Methods, RankMeasure::Count) => {
            payments_by_method_count(&records.payments, n, direction)
        }
        (RankEntity::Methods, _) => payments_by_method(&records.payments, n, direction),
    }
}

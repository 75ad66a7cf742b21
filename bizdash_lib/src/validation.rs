use chrono::NaiveDate;

use crate::bucket::{Granularity, WeekStart};
use crate::error::DashboardError;
use crate::ranking::{RankDirection, RankEntity, RankMeasure, RankingRequest};
use crate::scope::DateRange;

pub const MAX_TOP_N: usize = 100;
pub const MAX_OWNER_LENGTH: usize = 64;

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, DashboardError> {
    if input.len() > max_len {
        return Err(DashboardError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(DashboardError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate an owner (user) identifier.
pub fn validate_owner(input: &str) -> Result<String, DashboardError> {
    sanitize_text(input, MAX_OWNER_LENGTH)
}

/// Validate a granularity: case-insensitive, supports d/w/m/y and daily/weekly/... forms.
pub fn validate_granularity(input: &str) -> Result<Granularity, DashboardError> {
    match input.trim().to_lowercase().as_str() {
        "day" | "d" | "daily" => Ok(Granularity::Day),
        "week" | "w" | "weekly" => Ok(Granularity::Week),
        "month" | "m" | "monthly" => Ok(Granularity::Month),
        "year" | "y" | "yearly" => Ok(Granularity::Year),
        _ => Err(DashboardError::InvalidInput(format!(
            "unknown granularity '{}'. Valid values: day, week, month, year",
            input
        ))),
    }
}

/// Validate a week start day: monday (mon) or sunday (sun).
pub fn validate_week_start(input: &str) -> Result<WeekStart, DashboardError> {
    match input.trim().to_lowercase().as_str() {
        "monday" | "mon" => Ok(WeekStart::Monday),
        "sunday" | "sun" => Ok(WeekStart::Sunday),
        _ => Err(DashboardError::InvalidInput(format!(
            "unknown week start '{}'. Valid values: monday, sunday",
            input
        ))),
    }
}

/// Validate a date string in YYYY-MM-DD format.
pub fn validate_date(input: &str) -> Result<NaiveDate, DashboardError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        DashboardError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2024-06-01)",
            trimmed
        ))
    })
}

/// Validate optional range bounds; `from` must not be after `to`.
pub fn validate_date_range(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<DateRange, DashboardError> {
    let from = from.map(validate_date).transpose()?;
    let to = to.map(validate_date).transpose()?;
    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            return Err(DashboardError::InvalidInput(format!(
                "--from {} is after --to {}",
                f, t
            )));
        }
    }
    Ok(DateRange::new(from, to))
}

/// Validate top-N (must be 1..=100).
pub fn validate_top(n: usize) -> Result<usize, DashboardError> {
    if !(1..=MAX_TOP_N).contains(&n) {
        return Err(DashboardError::InvalidInput(format!(
            "top must be between 1 and {}",
            MAX_TOP_N
        )));
    }
    Ok(n)
}

/// Validate a ranking direction: top (desc) or bottom (asc).
pub fn validate_direction(input: &str) -> Result<RankDirection, DashboardError> {
    match input.trim().to_lowercase().as_str() {
        "top" | "desc" => Ok(RankDirection::Top),
        "bottom" | "asc" => Ok(RankDirection::Bottom),
        _ => Err(DashboardError::InvalidInput(format!(
            "unknown direction '{}'. Valid values: top, bottom",
            input
        ))),
    }
}

/// Validate a ranking entity name.
pub fn validate_entity(input: &str) -> Result<RankEntity, DashboardError> {
    match input.trim().to_lowercase().replace('_', "-").as_str() {
        "products" | "product" => Ok(RankEntity::Products),
        "clients" | "client" => Ok(RankEntity::Clients),
        "inactive-clients" | "inactive" => Ok(RankEntity::InactiveClients),
        "sellers" | "seller" | "users" => Ok(RankEntity::Sellers),
        "categories" | "category" => Ok(RankEntity::Categories),
        "methods" | "method" => Ok(RankEntity::Methods),
        _ => Err(DashboardError::InvalidInput(format!(
            "unknown entity '{}'. Valid values: products, clients, inactive-clients, sellers, categories, methods",
            input
        ))),
    }
}

fn parse_measure(input: &str) -> Option<RankMeasure> {
    match input.trim().to_lowercase().as_str() {
        "revenue" => Some(RankMeasure::Revenue),
        "quantity" | "qty" => Some(RankMeasure::Quantity),
        "spend" => Some(RankMeasure::Spend),
        "sales" => Some(RankMeasure::Sales),
        "profit" => Some(RankMeasure::Profit),
        "count" => Some(RankMeasure::Count),
        "amount" => Some(RankMeasure::Amount),
        _ => None,
    }
}

/// Validate a measure for `entity`. `None` selects the entity's default measure.
pub fn validate_measure(
    entity: RankEntity,
    input: Option<&str>,
) -> Result<RankMeasure, DashboardError> {
    let Some(input) = input else {
        return Ok(entity.default_measure());
    };
    let allowed = entity
        .measures()
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    match parse_measure(input) {
        Some(measure) if entity.measures().contains(&measure) => Ok(measure),
        _ => Err(DashboardError::InvalidInput(format!(
            "measure '{}' does not apply to {}. Valid values: {}",
            input, entity, allowed
        ))),
    }
}

/// Validate every part of a ranking request.
pub fn validate_ranking(
    entity: &str,
    measure: Option<&str>,
    direction: &str,
    top: usize,
) -> Result<RankingRequest, DashboardError> {
    let entity = validate_entity(entity)?;
    Ok(RankingRequest {
        entity,
        measure: validate_measure(entity, measure)?,
        direction: validate_direction(direction)?,
        n: validate_top(top)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Granularity --

    #[test]
    fn granularity_valid() {
        assert_eq!(validate_granularity("day").unwrap(), Granularity::Day);
        assert_eq!(validate_granularity("W").unwrap(), Granularity::Week);
        assert_eq!(validate_granularity(" monthly ").unwrap(), Granularity::Month);
        assert_eq!(validate_granularity("year").unwrap(), Granularity::Year);
    }

    #[test]
    fn granularity_invalid() {
        assert!(validate_granularity("hour").is_err());
    }

    #[test]
    fn week_start_valid() {
        assert_eq!(validate_week_start("Sun").unwrap(), WeekStart::Sunday);
        assert_eq!(validate_week_start("monday").unwrap(), WeekStart::Monday);
        assert!(validate_week_start("friday").is_err());
    }

    // -- Dates --

    #[test]
    fn date_valid() {
        assert_eq!(
            validate_date("2024-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn date_invalid() {
        assert!(validate_date("01/06/2024").is_err());
        assert!(validate_date("2024-02-30").is_err());
    }

    #[test]
    fn date_range_ordered() {
        let r = validate_date_range(Some("2024-01-01"), Some("2024-01-31")).unwrap();
        assert_eq!(r.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(r.to, NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[test]
    fn date_range_reversed() {
        assert!(validate_date_range(Some("2024-02-01"), Some("2024-01-31")).is_err());
    }

    #[test]
    fn date_range_open() {
        let r = validate_date_range(None, Some("2024-01-31")).unwrap();
        assert!(r.from.is_none());
        assert!(validate_date_range(None, None).unwrap().is_unbounded());
    }

    // -- Ranking --

    #[test]
    fn top_bounds() {
        assert_eq!(validate_top(1).unwrap(), 1);
        assert_eq!(validate_top(100).unwrap(), 100);
        assert!(validate_top(0).is_err());
        assert!(validate_top(101).is_err());
    }

    #[test]
    fn direction_aliases() {
        assert_eq!(validate_direction("TOP").unwrap(), RankDirection::Top);
        assert_eq!(validate_direction("asc").unwrap(), RankDirection::Bottom);
        assert!(validate_direction("sideways").is_err());
    }

    #[test]
    fn entity_aliases() {
        assert_eq!(validate_entity("inactive_clients").unwrap(), RankEntity::InactiveClients);
        assert_eq!(validate_entity("Product").unwrap(), RankEntity::Products);
        assert!(validate_entity("suppliers").is_err());
    }

    #[test]
    fn measure_default_and_pairs() {
        assert_eq!(
            validate_measure(RankEntity::Sellers, None).unwrap(),
            RankMeasure::Sales
        );
        assert_eq!(
            validate_measure(RankEntity::Sellers, Some("profit")).unwrap(),
            RankMeasure::Profit
        );
        assert!(validate_measure(RankEntity::Products, Some("profit")).is_err());
        assert!(validate_measure(RankEntity::Products, Some("bogus")).is_err());
    }

    #[test]
    fn ranking_request() {
        let req = validate_ranking("products", Some("quantity"), "bottom", 3).unwrap();
        assert_eq!(req.entity, RankEntity::Products);
        assert_eq!(req.measure, RankMeasure::Quantity);
        assert_eq!(req.direction, RankDirection::Bottom);
        assert_eq!(req.n, 3);
    }

    // -- Owner --

    #[test]
    fn owner_sanitized() {
        assert_eq!(validate_owner("  u1\n ").unwrap(), "u1");
        assert!(validate_owner("   ").is_err());
        assert!(validate_owner(&"x".repeat(65)).is_err());
    }
}

//! Ranking of salespeople by the ratio between their sold total and their salary.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::domain::{Money, Salesperson};
use crate::engine::SalespersonKey;

/// `None` ranks below every ratio; it stands for salespeople without salary.
type Ratio = Option<Decimal>;

/// Returns the salesperson with the highest sales-to-salary ratio among those who contributed at
/// least one sale. Ties go to the earliest registered salesperson.
pub(super) fn top_ratio<'a>(
    salespeople: &'a [Salesperson],
    totals: &HashMap<SalespersonKey, Money>,
) -> Option<&'a Salesperson> {
    let mut best: Option<(&Salesperson, Ratio)> = None;

    // walking in registration order makes the strict comparison below pick the earliest on ties
    for (key, salesperson) in salespeople.iter().enumerate() {
        let Some(total) = totals.get(&key) else {
            continue;
        };
        let candidate = ratio(*total, salesperson.salary());
        match best {
            Some((_, best_ratio)) if candidate <= best_ratio => {}
            _ => best = Some((salesperson, candidate)),
        }
    }

    best.map(|(salesperson, _)| salesperson)
}

fn ratio(total: Money, salary: Money) -> Ratio {
    if salary <= Decimal::ZERO {
        return None;
    }
    // only an extremely small salary can overflow the division
    Some(total.checked_div(salary).unwrap_or(Decimal::MAX))
}

//! Module for the aggregation engine accumulating the statistics of one input file

mod orchestration;
mod ranking;


use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::warn;

use crate::domain::{Model, Money, Record, Report, Sale, Salesperson};

pub(crate) use orchestration::{aggregate_lines, aggregate_lines_parallel};

/// Identity of a registered salesperson: its position in the registration order.
///
/// Two salespeople sharing a name are still distinct entries.
type SalespersonKey = usize;

#[derive(Debug, Clone, Copy)]
struct BestSale {
    sale_id: u64,
    total: Money,
}

/// Thread-safe accumulator of the statistics of a single session (one input file).
///
/// All operations take `&self`, so one instance can be fed from several threads at once.
#[derive(Debug, Default)]
pub struct Aggregator {
    client_count: AtomicU64,
    salesperson_count: AtomicU64,

    salespeople: RwLock<Vec<Salesperson>>,
    totals: Mutex<HashMap<SalespersonKey, Money>>,

    best_sale: Mutex<Option<BestSale>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a model to the session. Returns `false`, leaving the state untouched, for models which
    /// are not one of the record kinds and for sales whose total price overflows.
    pub fn try_add(&self, model: impl Model) -> bool {
        let name = model.model_name();
        let Some(record) = model.into_record() else {
            warn!(model = name, "rejected model which cannot be aggregated");
            return false;
        };

        match record {
            Record::Salesperson(salesperson) => {
                self.add_salesperson(salesperson);
                true
            }
            Record::Client(_) => {
                self.client_count.fetch_add(1, Ordering::Relaxed);
                true
            }
            Record::Sale(sale) => self.add_sale(&sale),
        }
    }

    fn add_salesperson(&self, salesperson: Salesperson) {
        self.salesperson_count.fetch_add(1, Ordering::Relaxed);
        self.salespeople.write().push(salesperson);
    }

    fn add_sale(&self, sale: &Sale) -> bool {
        let Some(total) = sale.total_price() else {
            warn!(sale_id = sale.sale_id(), "rejected sale whose total price overflows");
            return false;
        };

        {
            let mut best = self.best_sale.lock();
            // strict comparison: on equal totals the sale seen first stays
            if best.is_none_or(|current| total > current.total) {
                *best = Some(BestSale {
                    sale_id: sale.sale_id(),
                    total,
                });
            }
        }

        // the registry lock is held across the update, so a concurrent registration cannot
        // interleave between lookup and contribution
        let salespeople = self.salespeople.read();
        let Some(key) = salespeople
            .iter()
            .position(|s| s.name() == sale.salesperson_name())
        else {
            return true;
        };

        let mut totals = self.totals.lock();
        let cumulative = totals.entry(key).or_default();
        *cumulative = cumulative.checked_add(total).unwrap_or_else(|| {
            warn!(
                salesperson = sale.salesperson_name(),
                "cumulative sales total overflows, capping it"
            );
            Money::MAX
        });
        true
    }

    /// Takes a point-in-time snapshot of the session statistics.
    pub fn report(&self) -> Report {
        let most_expensive_sale_id = self
            .best_sale
            .lock()
            .map(|best| best.sale_id)
            .unwrap_or_default();

        let top_ratio_salesperson = {
            let salespeople = self.salespeople.read();
            let totals = self.totals.lock();
            ranking::top_ratio(&salespeople, &totals).map(|s| s.name().to_string())
        };

        Report {
            client_count: self.client_count.load(Ordering::Relaxed),
            salesperson_count: self.salesperson_count.load(Ordering::Relaxed),
            most_expensive_sale_id,
            top_ratio_salesperson,
        }
    }
}

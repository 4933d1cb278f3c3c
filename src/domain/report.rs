use serde::{Deserialize, Serialize};

/// Summary of one input file, produced once per ingestion job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub client_count: u64,
    pub salesperson_count: u64,
    /// Id of the sale with the highest total price, `0` if no sale was recorded.
    pub most_expensive_sale_id: u64,
    /// Salesperson with the highest ratio of sold total to salary.
    pub top_ratio_salesperson: Option<String>,
}

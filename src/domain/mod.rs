//! Module for the types defining the sales domain.

mod record;
mod report;

use std::fmt;

use rust_decimal::Decimal;

pub use record::{Client, Item, Sale, Salesperson};
pub use report::Report;

pub type Money = Decimal;

/// Numeric code identifying the kind of a record in the input grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Salesperson = 1,
    Client = 2,
    Sale = 3,
}

impl RecordKind {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::Salesperson),
            2 => Some(Self::Client),
            3 => Some(Self::Sale),
            _ => None,
        }
    }

    pub fn code(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Salesperson => "salesperson",
            RecordKind::Client => "client",
            RecordKind::Sale => "sale",
        };
        f.write_str(name)
    }
}

/// A single parsed line of an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Salesperson(Salesperson),
    Client(Client),
    Sale(Sale),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Salesperson(_) => RecordKind::Salesperson,
            Record::Client(_) => RecordKind::Client,
            Record::Sale(_) => RecordKind::Sale,
        }
    }

    pub fn code(&self) -> u16 {
        self.kind().code()
    }
}

impl From<Salesperson> for Record {
    fn from(value: Salesperson) -> Self {
        Record::Salesperson(value)
    }
}

impl From<Client> for Record {
    fn from(value: Client) -> Self {
        Record::Client(value)
    }
}

impl From<Sale> for Record {
    fn from(value: Sale) -> Self {
        Record::Sale(value)
    }
}

/// Anything that can be offered to the [`Aggregator`](crate::Aggregator).
///
/// Only the three record kinds are accepted; other domain values (a bare [`Item`], a [`Report`])
/// implement the trait so they can be offered, but yield no record and are rejected.
pub trait Model {
    /// Short name used in diagnostics.
    fn model_name(&self) -> &'static str;

    /// Converts the model into an aggregatable record, if it is one.
    fn into_record(self) -> Option<Record>;
}

impl Model for Record {
    fn model_name(&self) -> &'static str {
        match self {
            Record::Salesperson(s) => s.model_name(),
            Record::Client(c) => c.model_name(),
            Record::Sale(s) => s.model_name(),
        }
    }

    fn into_record(self) -> Option<Record> {
        Some(self)
    }
}

impl Model for Salesperson {
    fn model_name(&self) -> &'static str {
        "salesperson"
    }

    fn into_record(self) -> Option<Record> {
        Some(Record::Salesperson(self))
    }
}

impl Model for Client {
    fn model_name(&self) -> &'static str {
        "client"
    }

    fn into_record(self) -> Option<Record> {
        Some(Record::Client(self))
    }
}

impl Model for Sale {
    fn model_name(&self) -> &'static str {
        "sale"
    }

    fn into_record(self) -> Option<Record> {
        Some(Record::Sale(self))
    }
}

impl Model for Item {
    fn model_name(&self) -> &'static str {
        "item"
    }

    fn into_record(self) -> Option<Record> {
        None
    }
}

impl Model for Report {
    fn model_name(&self) -> &'static str {
        "report"
    }

    fn into_record(self) -> Option<Record> {
        None
    }
}

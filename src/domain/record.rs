//! Module defining the records which can be encoded on a line of an input file

use rust_decimal::Decimal;

use crate::domain::Money;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salesperson {
    tax_id: String,
    name: String,
    salary: Money,
}

impl Salesperson {
    pub fn new(
        tax_id: impl Into<String>,
        name: impl Into<String>,
        salary: Money,
    ) -> Result<Self, String> {
        if salary < Decimal::ZERO {
            return Err(format!("the salary must not be negative, got {salary}"));
        }
        Ok(Self {
            tax_id: tax_id.into(),
            name: name.into(),
            salary,
        })
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn salary(&self) -> Money {
        self.salary
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    tax_id: String,
    name: String,
    business_area: String,
}

impl Client {
    pub fn new(
        tax_id: impl Into<String>,
        name: impl Into<String>,
        business_area: impl Into<String>,
    ) -> Self {
        Self {
            tax_id: tax_id.into(),
            name: name.into(),
            business_area: business_area.into(),
        }
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn business_area(&self) -> &str {
        &self.business_area
    }
}

/// A single sold position. Only meaningful as part of a [`Sale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    item_id: u64,
    quantity: Decimal,
    price: Money,
}

impl Item {
    pub fn new(item_id: u64, quantity: Decimal, price: Money) -> Self {
        Self {
            item_id,
            quantity,
            price,
        }
    }

    pub fn item_id(&self) -> u64 {
        self.item_id
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn price(&self) -> Money {
        self.price
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    sale_id: u64,
    items: Vec<Item>,
    salesperson_name: String,
}

impl Sale {
    pub fn new(sale_id: u64, items: Vec<Item>, salesperson_name: impl Into<String>) -> Self {
        Self {
            sale_id,
            items,
            salesperson_name: salesperson_name.into(),
        }
    }

    pub fn sale_id(&self) -> u64 {
        self.sale_id
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn salesperson_name(&self) -> &str {
        &self.salesperson_name
    }

    /// Sum of the item prices; zero for a sale without items. `None` if the sum does not fit
    /// into [`Money`].
    ///
    /// The price of an item is taken as-is, the quantity does not scale it.
    pub fn total_price(&self) -> Option<Money> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.price))
    }
}

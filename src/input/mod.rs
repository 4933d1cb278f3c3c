//! Module defining the parsing logic used to convert the lines of an input file into validated domain
//! types that can be provided to the aggregation engine.

mod grammar;

use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::{Client, Item, Record, RecordKind, Sale, Salesperson};
use crate::error::{ParseError, invalid_record};
use grammar::{
    FIELD_SEPARATOR, GRAMMAR, ITEM_FIELD_SEPARATOR, ITEM_LIST_END, ITEM_LIST_START,
    ITEM_SEPARATOR, RECORD_FIELDS,
};


/// Parses a single line of an input file.
///
/// Malformed input is never fatal: the returned [`ParseError`] describes why the line was rejected
/// and the caller decides whether to log it and move on. Inside a sale, individual items with invalid
/// content are dropped (and logged) while the rest of the sale is kept.
pub fn parse_line(line: &str) -> Result<Record, ParseError> {
    let code = GRAMMAR
        .line
        .captures(line)
        .and_then(|captures| captures.get(1))
        .ok_or(ParseError::InvalidShape)?
        .as_str()
        .parse::<u16>()
        .map_err(|_| ParseError::InvalidShape)?;

    let kind = RecordKind::from_code(code).ok_or(ParseError::UnknownCode(code))?;

    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != RECORD_FIELDS {
        return Err(invalid_record(
            kind,
            format!("expected {RECORD_FIELDS} fields, found {}", fields.len()),
        ));
    }

    match kind {
        RecordKind::Salesperson => parse_salesperson(line, &fields).map(Record::Salesperson),
        RecordKind::Client => parse_client(line, &fields).map(Record::Client),
        RecordKind::Sale => parse_sale(line, &fields).map(Record::Sale),
    }
}

fn parse_salesperson(line: &str, fields: &[&str]) -> Result<Salesperson, ParseError> {
    let kind = RecordKind::Salesperson;
    if !GRAMMAR.salesperson.is_match(line) {
        return Err(invalid_record(kind, "fields do not match `taxId ç name ç salary`"));
    }

    let salary = fields[3]
        .parse::<Decimal>()
        .map_err(|e| invalid_record(kind, format!("cannot parse salary `{}`: {e}", fields[3])))?;

    Salesperson::new(fields[1], fields[2], salary).map_err(|msg| invalid_record(kind, msg))
}

fn parse_client(line: &str, fields: &[&str]) -> Result<Client, ParseError> {
    if !GRAMMAR.client.is_match(line) {
        return Err(invalid_record(
            RecordKind::Client,
            "fields do not match `taxId ç name ç businessArea`",
        ));
    }

    Ok(Client::new(fields[1], fields[2], fields[3]))
}

fn parse_sale(line: &str, fields: &[&str]) -> Result<Sale, ParseError> {
    let kind = RecordKind::Sale;
    if !GRAMMAR.sale.is_match(line) {
        return Err(invalid_record(kind, "fields do not match `saleId ç [items] ç salesperson`"));
    }

    let sale_id = fields[1]
        .parse::<u64>()
        .map_err(|e| invalid_record(kind, format!("cannot parse sale id `{}`: {e}", fields[1])))?;
    let items = parse_items(fields[2]).map_err(|msg| invalid_record(kind, msg))?;

    let sale = Sale::new(sale_id, items, fields[3]);
    if sale.total_price().is_none() {
        return Err(invalid_record(kind, "total price overflows"));
    }
    Ok(sale)
}

/// Parses a `[id-quantity-price,...]` block.
///
/// The block shape (brackets, at least one entry, three parts per entry) is all-or-nothing. An
/// entry with the right shape but unparsable content is skipped.
fn parse_items(block: &str) -> Result<Vec<Item>, String> {
    let inner = block
        .strip_prefix(ITEM_LIST_START)
        .and_then(|rest| rest.strip_suffix(ITEM_LIST_END))
        .ok_or_else(|| format!("item list `{block}` is not enclosed in brackets"))?;

    if inner.contains([ITEM_LIST_START, ITEM_LIST_END]) {
        return Err(format!("item list `{block}` contains nested brackets"));
    }
    if inner.is_empty() {
        return Err("item list is empty".to_string());
    }

    let mut items = Vec::new();
    for entry in inner.split(ITEM_SEPARATOR) {
        let parts: Vec<&str> = entry.split(ITEM_FIELD_SEPARATOR).collect();
        if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
            return Err(format!("item `{entry}` is not an `id-quantity-price` triple"));
        }

        match parse_item(parts[0], parts[1], parts[2]) {
            Ok(item) => items.push(item),
            Err(reason) => warn!(item = entry, "skipping item: {reason}"),
        }
    }

    Ok(items)
}

fn parse_item(item_id: &str, quantity: &str, price: &str) -> Result<Item, String> {
    if !GRAMMAR.integer.is_match(item_id) {
        return Err(format!("item id `{item_id}` is not an integer"));
    }
    if !GRAMMAR.integer.is_match(quantity) {
        return Err(format!("quantity `{quantity}` is not an integer"));
    }
    if !GRAMMAR.decimal.is_match(price) {
        return Err(format!("price `{price}` is not a decimal"));
    }

    let item_id = item_id
        .parse::<u64>()
        .map_err(|e| format!("cannot parse item id `{item_id}`: {e}"))?;
    let quantity = quantity
        .parse::<Decimal>()
        .map_err(|e| format!("cannot parse quantity `{quantity}`: {e}"))?;
    let price = price
        .parse::<Decimal>()
        .map_err(|e| format!("cannot parse price `{price}`: {e}"))?;

    Ok(Item::new(item_id, quantity, price))
}

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::{
    errors::ValidationError, value_objects::enums::invoice_statuses::InvoiceStatus,
};

/// Invoice fields after coercion from a loosely typed request body.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInvoiceFields {
    pub invoice_name: String,
    pub total: f64,
    /// `None` when the payload did not carry a status.
    pub status: Option<InvoiceStatus>,
    pub date: NaiveDate,
    pub due_date: i32,
    pub from_name: String,
    pub from_email: String,
    pub from_address: String,
    pub client_name: String,
    pub client_email: String,
    pub client_address: String,
    pub currency: String,
    pub invoice_number: i32,
    pub note: Option<String>,
    pub invoice_item_description: String,
    pub invoice_item_quantity: i32,
    pub invoice_item_rate: f64,
}

/// Decodes a raw request body. Anything that is not JSON is a malformed body.
pub fn decode_payload(body: &[u8]) -> Result<Value, ValidationError> {
    serde_json::from_slice(body).map_err(|_| ValidationError::MalformedBody)
}

/// Validates a full invoice payload. The first failing field aborts the whole payload.
pub fn validate_invoice_payload(
    payload: &Value,
    currency: &str,
) -> Result<ValidatedInvoiceFields, ValidationError> {
    let fields = as_object(payload)?;

    let invoice_name = required_text(fields, "invoiceName")?;
    let total = decimal(fields, "total")?;
    let invoice_number = integer(fields, "invoiceNumber", 1)?;
    let due_date = integer(fields, "dueDate", 0)?;
    let invoice_item_quantity = integer(fields, "invoiceItemQuantity", 1)?;
    let invoice_item_rate = decimal(fields, "invoiceItemRate")?;
    let date = calendar_date(fields, "date")?;
    let status = optional_status(fields)?;
    let currency = supported_currency(fields, currency)?;

    Ok(ValidatedInvoiceFields {
        invoice_name,
        total,
        status,
        date,
        due_date,
        from_name: text(fields, "fromName")?,
        from_email: email(fields, "fromEmail")?,
        from_address: text(fields, "fromAddress")?,
        client_name: text(fields, "clientName")?,
        client_email: email(fields, "clientEmail")?,
        client_address: text(fields, "clientAddress")?,
        currency,
        invoice_number,
        note: optional_text(fields, "note")?,
        invoice_item_description: text(fields, "invoiceItemDescription")?,
        invoice_item_quantity,
        invoice_item_rate,
    })
}

/// Validates a `{ "status": ... }` body for the status transition.
pub fn validate_status_payload(payload: &Value) -> Result<InvoiceStatus, ValidationError> {
    let fields = as_object(payload)?;

    match present(fields, "status") {
        None => Err(ValidationError::MissingField("status")),
        Some(Value::String(raw)) if raw.is_empty() => Err(ValidationError::MissingField("status")),
        Some(Value::String(raw)) => raw
            .parse::<InvoiceStatus>()
            .map_err(|_| ValidationError::InvalidField("status")),
        Some(_) => Err(ValidationError::InvalidField("status")),
    }
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, ValidationError> {
    payload.as_object().ok_or(ValidationError::MalformedBody)
}

/// Missing keys and explicit `null` are treated the same.
fn present<'a>(fields: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    fields.get(field).filter(|value| !value.is_null())
}

fn required_text(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match present(fields, field) {
        None => Err(ValidationError::MissingField(field)),
        Some(Value::String(raw)) if raw.trim().is_empty() => {
            Err(ValidationError::MissingField(field))
        }
        Some(Value::String(raw)) => Ok(raw.clone()),
        Some(_) => Err(ValidationError::InvalidField(field)),
    }
}

fn optional_text(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match present(fields, field) {
        None => Ok(None),
        Some(Value::String(raw)) => Ok(Some(raw.clone())),
        Some(_) => Err(ValidationError::InvalidField(field)),
    }
}

fn text(fields: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    Ok(optional_text(fields, field)?.unwrap_or_default())
}

fn email(fields: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    let value = text(fields, field)?;
    if !value.is_empty() && !value.contains('@') {
        return Err(ValidationError::InvalidField(field));
    }
    Ok(value)
}

/// Non-negative finite decimal, given as a JSON number or numeric string.
fn decimal(fields: &Map<String, Value>, field: &'static str) -> Result<f64, ValidationError> {
    let parsed = match present(fields, field) {
        None => return Err(ValidationError::MissingField(field)),
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        // `+ 0.0` turns a negative zero into zero.
        Some(value) if value.is_finite() && value >= 0.0 => Ok(value + 0.0),
        _ => Err(ValidationError::InvalidField(field)),
    }
}

fn integer(
    fields: &Map<String, Value>,
    field: &'static str,
    min: i32,
) -> Result<i32, ValidationError> {
    let parsed = match present(fields, field) {
        None => return Err(ValidationError::MissingField(field)),
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::String(raw)) => raw.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    parsed
        .and_then(|value| i32::try_from(value).ok())
        .filter(|value| *value >= min)
        .ok_or(ValidationError::InvalidField(field))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its UTC date).
fn calendar_date(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<NaiveDate, ValidationError> {
    let raw = match present(fields, field) {
        None => return Err(ValidationError::MissingField(field)),
        Some(Value::String(raw)) => raw.trim(),
        Some(_) => return Err(ValidationError::InvalidField(field)),
    };

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc).date_naive());
    }

    // Timestamps without an offset keep their own calendar day.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|timestamp| timestamp.date())
        .map_err(|_| ValidationError::InvalidField(field))
}

fn optional_status(fields: &Map<String, Value>) -> Result<Option<InvoiceStatus>, ValidationError> {
    match present(fields, "status") {
        None => Ok(None),
        Some(Value::String(raw)) => raw
            .parse::<InvoiceStatus>()
            .map(Some)
            .map_err(|_| ValidationError::InvalidField("status")),
        Some(_) => Err(ValidationError::InvalidField("status")),
    }
}

fn supported_currency(
    fields: &Map<String, Value>,
    supported: &str,
) -> Result<String, ValidationError> {
    match optional_text(fields, "currency")? {
        Some(requested) if !requested.eq_ignore_ascii_case(supported) => {
            Err(ValidationError::InvalidField("currency"))
        }
        _ => Ok(supported.to_string()),
    }
}

//! Row → JSON decoding
//!
//! Catalog rows are decoded column by column into a JSON object keyed by
//! column name, then deserialized into the typed record. Values JSON cannot
//! hold natively (timestamps, dates, uuids) are rendered as strings. Columns
//! of any other type are cast to text in SQL before they are read, see
//! [`text_cast_query`], so nothing is dropped.

use chordanalyzr_core::{ExportError, ExportResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use postgres_types::{FromSql, Kind, Type};
use serde_json::{Map, Number, Value};
use tokio_postgres::Row;
use uuid::Uuid;

// ============================================================================
// COLUMN TYPES
// ============================================================================

/// Whether values of `ty` can be read in binary form by [`row_to_map`].
pub fn has_json_mapping(ty: &Type) -> bool {
    if let Kind::Enum(_) = ty.kind() {
        return true;
    }
    matches!(
        *ty,
        Type::INT2
            | Type::INT4
            | Type::INT8
            | Type::OID
            | Type::FLOAT4
            | Type::FLOAT8
            | Type::BOOL
            | Type::TEXT
            | Type::VARCHAR
            | Type::BPCHAR
            | Type::NAME
            | Type::UNKNOWN
            | Type::JSON
            | Type::JSONB
            | Type::UUID
            | Type::TIMESTAMP
            | Type::TIMESTAMPTZ
            | Type::DATE
            | Type::TIME
            | Type::INT2_ARRAY
            | Type::INT4_ARRAY
            | Type::INT8_ARRAY
            | Type::FLOAT4_ARRAY
            | Type::FLOAT8_ARRAY
            | Type::BOOL_ARRAY
            | Type::TEXT_ARRAY
            | Type::VARCHAR_ARRAY
            | Type::BPCHAR_ARRAY
    )
}

/// Wrap `sql` so every column without a JSON mapping arrives as `text`
/// (`text[]` for arrays, keeping one string per element).
///
/// Returns `None` when every column can be read as-is. The wrapper is a
/// plain projection over the original query, so row order is unchanged.
pub fn text_cast_query<'a, I>(sql: &str, columns: I) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, &'a Type)>,
{
    let mut needs_cast = false;
    let select: Vec<String> = columns
        .into_iter()
        .map(|(name, ty)| {
            let ident = quote_ident(name);
            match text_cast(ty) {
                Some(cast) => {
                    needs_cast = true;
                    format!("q.{ident}::{cast} AS {ident}")
                }
                None => format!("q.{ident}"),
            }
        })
        .collect();
    needs_cast.then(|| format!("SELECT {} FROM ({}) AS q", select.join(", "), sql))
}

fn text_cast(ty: &Type) -> Option<&'static str> {
    if has_json_mapping(ty) {
        return None;
    }
    match ty.kind() {
        Kind::Array(_) => Some("text[]"),
        _ => Some("text"),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

// ============================================================================
// ROW DECODING
// ============================================================================

/// Decode every column of `row` into a JSON object, in column order.
///
/// `record` names the row in errors. A column that fails to decode, or whose
/// type has no mapping, is a [`ExportError::Decode`].
pub fn row_to_map(row: &Row, record: &str) -> ExportResult<Map<String, Value>> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let ty = column.type_();
            let value = decode_cell(row, idx, ty)
                .map_err(|e| {
                    ExportError::decode(record, format!("column {} ({}): {}", column.name(), ty, e))
                })?
                .ok_or_else(|| {
                    ExportError::decode(
                        record,
                        format!("column {} has no JSON mapping for type {}", column.name(), ty),
                    )
                })?;
            Ok((column.name().to_string(), value))
        })
        .collect()
}

/// `Ok(None)` when `ty` has no mapping.
fn decode_cell(row: &Row, idx: usize, ty: &Type) -> Result<Option<Value>, tokio_postgres::Error> {
    if let Kind::Enum(_) = ty.kind() {
        return plain::<EnumLabel>(row, idx).map(Some);
    }
    let value = match *ty {
        Type::INT2 => plain::<i16>(row, idx),
        Type::INT4 => plain::<i32>(row, idx),
        Type::INT8 => plain::<i64>(row, idx),
        Type::OID => plain::<u32>(row, idx),
        Type::FLOAT4 => float::<f32>(row, idx),
        Type::FLOAT8 => float::<f64>(row, idx),
        Type::BOOL => plain::<bool>(row, idx),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            plain::<String>(row, idx)
        }
        Type::JSON | Type::JSONB => row
            .try_get::<_, Option<Value>>(idx)
            .map(|v| v.unwrap_or(Value::Null)),
        Type::UUID => formatted::<Uuid>(row, idx, ToString::to_string),
        Type::TIMESTAMP => formatted::<NaiveDateTime>(row, idx, timestamp_text),
        Type::TIMESTAMPTZ => formatted::<DateTime<Utc>>(row, idx, timestamptz_text),
        Type::DATE => formatted::<NaiveDate>(row, idx, ToString::to_string),
        Type::TIME => formatted::<NaiveTime>(row, idx, time_text),
        Type::INT2_ARRAY => plain::<Vec<Option<i16>>>(row, idx),
        Type::INT4_ARRAY => plain::<Vec<Option<i32>>>(row, idx),
        Type::INT8_ARRAY => plain::<Vec<Option<i64>>>(row, idx),
        Type::FLOAT4_ARRAY => float_array::<f32>(row, idx),
        Type::FLOAT8_ARRAY => float_array::<f64>(row, idx),
        Type::BOOL_ARRAY => plain::<Vec<Option<bool>>>(row, idx),
        Type::TEXT_ARRAY | Type::VARCHAR_ARRAY | Type::BPCHAR_ARRAY => {
            plain::<Vec<Option<String>>>(row, idx)
        }
        _ => return Ok(None),
    };
    value.map(Some)
}

/// Types with a direct JSON counterpart.
fn plain<'a, T>(row: &'a Row, idx: usize) -> Result<Value, tokio_postgres::Error>
where
    T: FromSql<'a> + Into<Value>,
{
    row.try_get::<_, Option<T>>(idx)
        .map(|v| v.map_or(Value::Null, Into::into))
}

/// Types exported as a string.
fn formatted<'a, T>(
    row: &'a Row,
    idx: usize,
    render: fn(&T) -> String,
) -> Result<Value, tokio_postgres::Error>
where
    T: FromSql<'a>,
{
    row.try_get::<_, Option<T>>(idx)
        .map(|v| v.map_or(Value::Null, |t| Value::String(render(&t))))
}

fn float<'a, T>(row: &'a Row, idx: usize) -> Result<Value, tokio_postgres::Error>
where
    T: FromSql<'a> + Into<f64>,
{
    row.try_get::<_, Option<T>>(idx)
        .map(|v| v.map_or(Value::Null, |f| float_value(f.into())))
}

fn float_array<'a, T>(row: &'a Row, idx: usize) -> Result<Value, tokio_postgres::Error>
where
    T: FromSql<'a> + Into<f64>,
{
    row.try_get::<_, Option<Vec<Option<T>>>>(idx).map(|v| {
        v.map_or(Value::Null, |items| {
            items
                .into_iter()
                .map(|f| f.map_or(Value::Null, |f| float_value(f.into())))
                .collect()
        })
    })
}

/// NaN and infinities have no JSON number form.
fn float_value(f: f64) -> Value {
    Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(f.to_string()))
}

// ============================================================================
// DATE AND TIME TEXT
// ============================================================================

// Fractional seconds are printed as six digits, and only when non-zero.
fn clock_format(nanos: u32) -> &'static str {
    if nanos == 0 {
        "%H:%M:%S"
    } else {
        "%H:%M:%S%.6f"
    }
}

fn timestamp_text(ts: &NaiveDateTime) -> String {
    format!(
        "{} {}",
        ts.format("%Y-%m-%d"),
        ts.format(clock_format(ts.nanosecond()))
    )
}

/// `2024-01-01 00:00:00+00:00`
fn timestamptz_text(ts: &DateTime<Utc>) -> String {
    format!("{}+00:00", timestamp_text(&ts.naive_utc()))
}

fn time_text(t: &NaiveTime) -> String {
    t.format(clock_format(t.nanosecond())).to_string()
}

/// Label of a PostgreSQL enum value. Enums travel as their UTF-8 label.
struct EnumLabel(String);

impl<'a> FromSql<'a> for EnumLabel {
    fn from_sql(
        _ty: &Type,
        raw: &'a [u8],
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        Ok(EnumLabel(std::str::from_utf8(raw)?.to_string()))
    }

    fn accepts(ty: &Type) -> bool {
        matches!(ty.kind(), Kind::Enum(_))
    }
}

impl From<EnumLabel> for Value {
    fn from(label: EnumLabel) -> Self {
        Value::String(label.0)
    }
}

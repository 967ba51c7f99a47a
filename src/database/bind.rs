use serde_json::Value;
use sqlx::{self, postgres::PgArguments, FromRow};

// Positional parameter binding for dynamically assembled statements. The
// assembler and filter builder collect values as serde_json::Value; this
// helper translates each into a typed sqlx bind in ordinal order.

/// The Postgres type a JSON value binds as
#[derive(Debug, PartialEq)]
enum BindValue<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(&'a str),
    Digits(String),
    Json(&'a Value),
}

fn classify(v: &Value) -> BindValue<'_> {
    match v {
        Value::Null => BindValue::Null,
        Value::Bool(b) => BindValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                BindValue::Int(i)
            } else if let Some(u) = n.as_u64() {
                match i64::try_from(u) {
                    Ok(i) => BindValue::Int(i),
                    // Beyond i64 range; keep the digits as text
                    Err(_) => BindValue::Digits(n.to_string()),
                }
            } else if let Some(f) = n.as_f64() {
                BindValue::Float(f)
            } else {
                BindValue::Digits(n.to_string())
            }
        }
        Value::String(s) => BindValue::Text(s),
        Value::Array(_) | Value::Object(_) => BindValue::Json(v), // JSONB
    }
}

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match classify(v) {
        BindValue::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        BindValue::Bool(b) => q.bind(b),
        BindValue::Int(i) => q.bind(i),
        BindValue::Float(f) => q.bind(f),
        BindValue::Text(s) => q.bind(s),
        BindValue::Digits(s) => q.bind(s),
        BindValue::Json(j) => q.bind(j.clone()),
    }
}

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("No data supplied for update")]
    EmptyUpdate,
}

/// Static mapping from external (client-facing) field names to storage
/// column names for one entity. Fields absent from `renames` keep their
/// external name as the column name. Identity-bearing fields are listed
/// in `immutable` and are never written by a partial update. Non-text
/// columns are listed in `casts` with their SQL type so a bound value
/// (including NULL) always reaches Postgres with a matching type.
pub struct ColumnMap {
    pub table: &'static str,
    pub key_column: &'static str,
    renames: &'static [(&'static str, &'static str)],
    immutable: &'static [&'static str],
    casts: &'static [(&'static str, &'static str)],
}

impl ColumnMap {
    pub const fn new(
        table: &'static str,
        key_column: &'static str,
        renames: &'static [(&'static str, &'static str)],
        immutable: &'static [&'static str],
        casts: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            table,
            key_column,
            renames,
            immutable,
            casts,
        }
    }

    pub fn column_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.renames
            .iter()
            .find(|(external, _)| *external == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }

    pub fn is_immutable(&self, field: &str) -> bool {
        self.immutable.contains(&field)
    }

    pub fn cast_for(&self, field: &str) -> Option<&'static str> {
        self.casts
            .iter()
            .find(|(external, _)| *external == field)
            .map(|(_, sql_type)| *sql_type)
    }
}

/// Ordered assignment clauses plus the parallel ordered bound values
/// produced by the assembler. The Nth clause always uses placeholder $N;
/// `next_param` is the first unused ordinal, for the caller's WHERE key.
#[derive(Debug)]
pub struct UpdateSet {
    pub assignments: Vec<String>,
    pub values: Vec<Value>,
}

impl UpdateSet {
    pub fn set_clause(&self) -> String {
        self.assignments.join(", ")
    }

    pub fn next_param(&self) -> usize {
        self.values.len() + 1
    }
}

/// Turn a sparse field map into `"col" = $N` clauses and matching bound
/// values, in the field map's iteration order. Identity fields are dropped
/// regardless of what the caller supplied; an update with nothing left to
/// write is a caller error, not a silent no-op.
pub fn partial_update(fields: &Map<String, Value>, columns: &ColumnMap) -> Result<UpdateSet, UpdateError> {
    if fields.is_empty() {
        return Err(UpdateError::EmptyUpdate);
    }

    let mut assignments = Vec::with_capacity(fields.len());
    let mut values = Vec::with_capacity(fields.len());

    for (field, value) in fields {
        if columns.is_immutable(field) {
            continue;
        }
        let column = columns.column_for(field);
        let ordinal = assignments.len() + 1;
        assignments.push(match columns.cast_for(field) {
            Some(sql_type) => format!("\"{}\" = ${}::{}", column, ordinal, sql_type),
            None => format!("\"{}\" = ${}", column, ordinal),
        });
        values.push(value.clone());
    }

    if assignments.is_empty() {
        return Err(UpdateError::EmptyUpdate);
    }

    Ok(UpdateSet { assignments, values })
}

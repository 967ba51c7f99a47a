use std::collections::HashMap;

use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Unknown search parameter: {0}")]
    UnknownParameter(String),

    #[error("Parameter '{name}' must be an integer, got '{value}'")]
    NotAnInteger { name: String, value: String },

    #[error("Parameter '{name}' must be \"true\" or \"false\", got '{value}'")]
    NotABoolean { name: String, value: String },

    #[error("Parameter '{0}' must be non-negative")]
    NegativeBound(String),

    #[error("'{min}' cannot exceed '{max}'")]
    InvertedRange { min: &'static str, max: &'static str },
}

/// How one search criterion translates into a predicate clause
pub enum Criterion {
    /// Case-insensitive substring match, wildcard-wrapped on both sides
    Substring { column: &'static str },
    /// Integer lower bound (column >= value)
    MinInt {
        column: &'static str,
        reject_negative: bool,
    },
    /// Integer upper bound (column <= value)
    MaxInt { column: &'static str },
    /// "true" restricts to column > 0; "false" imposes no restriction
    PositiveFlag { column: &'static str },
}

/// The closed, ordered criterion vocabulary for one entity's search
/// endpoint. Clause order is the vocabulary order here, never the
/// caller's parameter order, and each declared (min, max) pair is
/// checked for inverted ranges before any clause is built.
pub struct SearchVocabulary {
    fields: &'static [(&'static str, Criterion)],
    ranges: &'static [(&'static str, &'static str)],
}

/// A validated, safely parameterized conjunction of predicate clauses
#[derive(Debug, Clone, PartialEq)]
pub struct WherePredicate {
    pub clause: String,
    pub params: Vec<Value>,
}

impl SearchVocabulary {
    pub const fn new(
        fields: &'static [(&'static str, Criterion)],
        ranges: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self { fields, ranges }
    }

    /// Validate the supplied criteria and build the WHERE predicate.
    /// Returns None when nothing restricts the result set, so callers can
    /// issue the unfiltered listing statement with no WHERE clause at all.
    pub fn build(&self, criteria: &HashMap<String, String>) -> Result<Option<WherePredicate>, SearchError> {
        // Closed vocabulary: reject unrecognized keys outright
        for key in criteria.keys() {
            if !self.fields.iter().any(|(name, _)| *name == key.as_str()) {
                return Err(SearchError::UnknownParameter(key.clone()));
            }
        }

        // Validate every supplied criterion before building any clause
        let mut parsed_ints: HashMap<&'static str, i64> = HashMap::new();
        for (name, criterion) in self.fields {
            let Some(raw) = criteria.get(*name) else { continue };
            match criterion {
                Criterion::MinInt { reject_negative, .. } => {
                    let n = parse_int(name, raw)?;
                    if *reject_negative && n < 0 {
                        return Err(SearchError::NegativeBound(name.to_string()));
                    }
                    parsed_ints.insert(*name, n);
                }
                Criterion::MaxInt { .. } => {
                    parsed_ints.insert(*name, parse_int(name, raw)?);
                }
                Criterion::PositiveFlag { .. } => {
                    if raw != "true" && raw != "false" {
                        return Err(SearchError::NotABoolean {
                            name: name.to_string(),
                            value: raw.clone(),
                        });
                    }
                }
                Criterion::Substring { .. } => {}
            }
        }

        for (min_key, max_key) in self.ranges {
            if let (Some(min), Some(max)) = (parsed_ints.get(min_key), parsed_ints.get(max_key)) {
                if min > max {
                    return Err(SearchError::InvertedRange {
                        min: *min_key,
                        max: *max_key,
                    });
                }
            }
        }

        // Build clauses in fixed vocabulary order with sequential placeholders
        let mut clauses: Vec<String> = vec![];
        let mut params: Vec<Value> = vec![];
        for (name, criterion) in self.fields {
            let Some(raw) = criteria.get(*name) else { continue };
            match criterion {
                Criterion::Substring { column } => {
                    params.push(json!(format!("%{}%", raw.trim())));
                    clauses.push(format!("\"{}\" ILIKE ${}", column, params.len()));
                }
                Criterion::MinInt { column, .. } => {
                    params.push(json!(parsed_ints[name]));
                    clauses.push(format!("\"{}\" >= ${}", column, params.len()));
                }
                Criterion::MaxInt { column } => {
                    params.push(json!(parsed_ints[name]));
                    clauses.push(format!("\"{}\" <= ${}", column, params.len()));
                }
                Criterion::PositiveFlag { column } => {
                    if raw == "true" {
                        clauses.push(format!("\"{}\" > 0", column));
                    }
                }
            }
        }

        if clauses.is_empty() {
            return Ok(None);
        }

        Ok(Some(WherePredicate {
            clause: clauses.join(" AND "),
            params,
        }))
    }
}

fn parse_int(name: &str, raw: &str) -> Result<i64, SearchError> {
    raw.trim().parse::<i64>().map_err(|_| SearchError::NotAnInteger {
        name: name.to_string(),
        value: raw.to_string(),
    })
}

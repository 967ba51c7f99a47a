use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::search::{Criterion, SearchVocabulary};
use crate::database::update::ColumnMap;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

// id and the owning company are immutable; a job never moves between companies
pub const JOB_COLUMNS: ColumnMap = ColumnMap::new(
    "jobs",
    "id",
    &[("companyHandle", "company_handle")],
    &["id", "companyHandle"],
    &[("salary", "integer"), ("equity", "numeric")],
);

pub const JOB_SEARCH: SearchVocabulary = SearchVocabulary::new(
    &[
        ("title", Criterion::Substring { column: "title" }),
        (
            "minSalary",
            Criterion::MinInt {
                column: "salary",
                reject_negative: true,
            },
        ),
        ("hasEquity", Criterion::PositiveFlag { column: "equity" }),
    ],
    &[],
);

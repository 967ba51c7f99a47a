use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::search::{Criterion, SearchVocabulary};
use crate::database::update::ColumnMap;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

pub const COMPANY_COLUMNS: ColumnMap = ColumnMap::new(
    "companies",
    "handle",
    &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")],
    &["handle"],
    &[("numEmployees", "integer")],
);

pub const COMPANY_SEARCH: SearchVocabulary = SearchVocabulary::new(
    &[
        ("name", Criterion::Substring { column: "name" }),
        (
            "minEmployees",
            Criterion::MinInt {
                column: "num_employees",
                reject_negative: false,
            },
        ),
        ("maxEmployees", Criterion::MaxInt { column: "num_employees" }),
    ],
    &[("minEmployees", "maxEmployees")],
);

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incarceration record types shared across the dashboard.
//!
//! A [`Record`] is one raw row from the incarceration dataset. Rows are
//! grouped by a [`GroupColumn`] into [`Aggregate`]s, and a [`BarMetric`]
//! picks which aggregate statistic a bar chart plots.
//!
//! Input data is loosely typed, so numeric fields are parsed leniently:
//! anything that is not a number or a numeric string becomes `NaN` rather
//! than failing the whole dataset.

pub mod lenient;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Group key used when a record has no value for the grouping column.
pub const UNDEFINED_KEY: &str = "undefined";

const fn nan() -> f64 {
    f64::NAN
}

/// A single incarceration record.
///
/// The well-known columns are typed fields; every other column in the
/// source row is preserved in [`Record::extra`] so it can still be used
/// as a grouping column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Sex of the incarcerated person (e.g. `"M"`, `"F"`).
    #[serde(
        default,
        alias = "Sex",
        deserialize_with = "lenient::deserialize_label"
    )]
    pub sex: Option<String>,
    /// Age in years. `NaN` when missing or non-numeric.
    #[serde(default = "nan", alias = "Age", deserialize_with = "lenient::deserialize_f64")]
    pub age: f64,
    /// Ethnicity label.
    #[serde(
        default,
        alias = "Ethnicity",
        deserialize_with = "lenient::deserialize_label"
    )]
    pub ethnicity: Option<String>,
    /// Time served, in the dataset's native unit. `NaN` when missing or
    /// non-numeric.
    #[serde(
        default = "nan",
        alias = "time_served",
        alias = "TimeServed",
        deserialize_with = "lenient::deserialize_f64"
    )]
    pub time_served: f64,
    /// All remaining columns, keyed by their original name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Record {
    /// Returns the group key of this record for `column`.
    ///
    /// Missing values yield [`UNDEFINED_KEY`]. Numeric columns are keyed
    /// by their shortest decimal representation, so `20.0` and `20` land
    /// in the same group.
    #[must_use]
    pub fn group_key(&self, column: &GroupColumn) -> String {
        match column {
            GroupColumn::Sex => label_key(self.sex.as_deref()),
            GroupColumn::Ethnicity => label_key(self.ethnicity.as_deref()),
            GroupColumn::Age => number_key(self.age),
            GroupColumn::TimeServed => number_key(self.time_served),
            GroupColumn::Other(name) => self
                .extra
                .get(name)
                .and_then(lenient::value_to_label)
                .unwrap_or_else(|| UNDEFINED_KEY.to_string()),
        }
    }
}

fn label_key(value: Option<&str>) -> String {
    value.unwrap_or(UNDEFINED_KEY).to_string()
}

fn number_key(value: f64) -> String {
    if value.is_nan() {
        UNDEFINED_KEY.to_string()
    } else {
        value.to_string()
    }
}

/// The record column that drives grouping (the bar chart's X axis).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroupColumn {
    /// `sex`
    Sex,
    /// `age`
    Age,
    /// `ethnicity`
    Ethnicity,
    /// `timeServed`
    TimeServed,
    /// Any other column, by its name in the source data.
    Other(String),
}

impl GroupColumn {
    /// The typed columns every record carries.
    #[must_use]
    pub fn known() -> [Self; 4] {
        [Self::Sex, Self::Age, Self::Ethnicity, Self::TimeServed]
    }

    /// Returns the column name as it appears in the dataset.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Sex => "sex",
            Self::Age => "age",
            Self::Ethnicity => "ethnicity",
            Self::TimeServed => "timeServed",
            Self::Other(name) => name,
        }
    }

    /// Human-readable axis label.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Sex => "Sex".to_string(),
            Self::Age => "Age".to_string(),
            Self::Ethnicity => "Ethnicity".to_string(),
            Self::TimeServed => "Time served".to_string(),
            Self::Other(name) => name.clone(),
        }
    }
}

/// Matches the typed columns by the same names and aliases that
/// [`Record`] deserializes them from. Any other spelling (`"AGE"`) is a
/// distinct source column.
impl FromStr for GroupColumn {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Ok(match name {
            "sex" | "Sex" => Self::Sex,
            "age" | "Age" => Self::Age,
            "ethnicity" | "Ethnicity" => Self::Ethnicity,
            "timeServed" | "time_served" | "TimeServed" => Self::TimeServed,
            _ => Self::Other(name.to_string()),
        })
    }
}

impl From<String> for GroupColumn {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(column) => column,
            Err(never) => match never {},
        }
    }
}

impl From<GroupColumn> for String {
    fn from(value: GroupColumn) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for GroupColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregate statistic plotted on the bar chart's Y axis.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum BarMetric {
    /// Number of records in the group.
    #[default]
    Amount,
    /// Mean age of the group.
    AgeAvg,
    /// Mean time served of the group.
    TimeServedAvg,
}

impl BarMetric {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Amount, Self::AgeAvg, Self::TimeServedAvg]
    }

    /// Human-readable axis label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Amount => "Number of people",
            Self::AgeAvg => "Average age",
            Self::TimeServedAvg => "Average time served",
        }
    }
}

/// Grouped summary of the records sharing one grouping-column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    /// Distinct value of the grouping column.
    pub key: String,
    /// Number of records in the group.
    pub amount: u64,
    /// Mean age. `NaN` if any member's age is `NaN`.
    pub age_avg: f64,
    /// Mean time served. `NaN` if any member's time served is `NaN`.
    pub time_served_avg: f64,
}

impl Aggregate {
    /// Returns the value of `metric` for this group.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn metric(&self, metric: BarMetric) -> f64 {
        match metric {
            BarMetric::Amount => self.amount as f64,
            BarMetric::AgeAvg => self.age_avg,
            BarMetric::TimeServedAvg => self.time_served_avg,
        }
    }
}

//! Column access helpers shared by the engine steps.
//!
//! Every registry-known column is handled as nullable `Float64`; null is the
//! absence marker.

use polars::prelude::*;

/// Values of `name` as `f64`, with non-numeric text read as absent.
pub fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

pub fn float_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Column::new(name.into(), values)
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

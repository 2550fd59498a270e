//! Polars DataFrame conversion.

use polars::prelude::*;

use crate::types::{ColumnData, XptDataset};

impl XptDataset {
    /// Convert to a DataFrame: numerics as `Float64`, text as `String`.
    pub fn into_dataframe(self) -> PolarsResult<DataFrame> {
        let columns = self
            .columns
            .into_iter()
            .zip(self.data)
            .map(|(column, values)| {
                let name = PlSmallStr::from(column.name);
                match values {
                    ColumnData::Numeric(values) => Column::new(name, values),
                    ColumnData::Text(values) => Column::new(name, values),
                }
            })
            .collect::<Vec<_>>();
        DataFrame::new(columns)
    }
}

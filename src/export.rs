//! Export of stacked-block datasets through polars
//!
//! The index becomes the first column of the frame, followed by the data
//! columns in file order.

use crate::error::{AuricError, Result};
use crate::models::TabularDataset;
use polars::prelude::{
    Column, CsvWriter, DataFrame, ParquetCompression, ParquetWriter, SerWriter,
};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// File formats a dataset can be written as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Parquet,
    Csv,
}

impl ExportFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("parquet") => Ok(ExportFormat::Parquet),
            Some("csv") => Ok(ExportFormat::Csv),
            _ => Err(AuricError::configuration(format!(
                "Cannot tell the export format of {}; use a .parquet or .csv extension",
                path.display()
            ))),
        }
    }
}

impl TabularDataset {
    /// Convert to a DataFrame; every column must match the index length
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let rows = self.row_count();
        if let Some(column) = self.columns.iter().find(|c| c.values.len() != rows) {
            return Err(AuricError::invalid_format(
                &self.source,
                format!(
                    "column '{}' has {} values but the index has {}",
                    column.name,
                    column.values.len(),
                    rows
                ),
            ));
        }

        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new(
            self.index.name.as_str().into(),
            &self.index.values,
        ));
        for column in &self.columns {
            columns.push(Column::new(column.name.as_str().into(), &column.values));
        }

        Ok(DataFrame::new(columns)?)
    }
}

pub fn write_parquet(dataset: &TabularDataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut df = dataset.to_dataframe()?;
    let file = File::create(path).map_err(|e| AuricError::file_access(path, e))?;
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Snappy)
        .finish(&mut df)?;
    debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

pub fn write_csv(dataset: &TabularDataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut df = dataset.to_dataframe()?;
    let mut file = File::create(path).map_err(|e| AuricError::file_access(path, e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

/// Write in the format named by the file extension
pub fn write_dataset(dataset: &TabularDataset, path: impl AsRef<Path>) -> Result<ExportFormat> {
    let path = path.as_ref();
    let format = ExportFormat::from_path(path)?;
    match format {
        ExportFormat::Parquet => write_parquet(dataset, path)?,
        ExportFormat::Csv => write_csv(dataset, path)?,
    }
    Ok(format)
}

use std::path::Path;

use fitsio::tables::{ColumnDataType, ColumnDescription};

use super::FitsError;

/// One `D` (float64) column to be written into a binary table
#[derive(Debug, Clone, Copy)]
pub struct TableColumn<'a> {
    /// `TTYPEn`
    pub name: &'a str,
    /// `TUNITn`
    pub unit: Option<&'a str>,
    /// Column values, one per row
    pub values: &'a [f64],
}

impl<'a> TableColumn<'a> {
    /// Create a column without a unit
    pub fn new(name: &'a str, values: &'a [f64]) -> Self {
        Self {
            name,
            unit: None,
            values,
        }
    }

    /// Attach a `TUNITn` value
    pub fn with_unit(mut self, unit: &'a str) -> Self {
        self.unit = Some(unit);
        self
    }
}

/// Value of a primary header keyword
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    /// Character string
    String(String),
    /// Integer
    Integer(i64),
}

/// Sequential writer for FITS files made of a primary HDU and binary tables
pub struct BinTableWriter {
    fits: fitsio::FitsFile,
    tables_written: usize,
}

impl BinTableWriter {
    /// Create (or replace) a file holding an empty primary HDU
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, FitsError> {
        let fits = fitsio::FitsFile::create(path.as_ref()).overwrite().open()?;
        Ok(Self {
            fits,
            tables_written: 0,
        })
    }

    /// Add a keyword to the primary header
    pub fn write_primary_key(&mut self, keyword: &str, value: HeaderValue) -> Result<(), FitsError> {
        let primary = self.fits.primary_hdu()?;
        match value {
            HeaderValue::String(s) => primary.write_key(&mut self.fits, keyword, s)?,
            HeaderValue::Integer(i) => primary.write_key(&mut self.fits, keyword, i)?,
        }
        Ok(())
    }

    /// Append one binary table extension
    pub fn write_table(&mut self, extname: &str, columns: &[TableColumn<'_>]) -> Result<(), FitsError> {
        let rows = columns.first().map_or(0, |c| c.values.len());
        if let Some(bad) = columns.iter().find(|c| c.values.len() != rows) {
            return Err(FitsError::LengthMismatch {
                column: bad.name.to_string(),
                expected: rows,
                actual: bad.values.len(),
            });
        }

        let descriptions = columns
            .iter()
            .map(|c| {
                ColumnDescription::new(c.name)
                    .with_type(ColumnDataType::Double)
                    .create()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let hdu = self.fits.create_table(extname.to_string(), &descriptions)?;

        for (i, column) in columns.iter().enumerate() {
            hdu.write_col(&mut self.fits, column.name, column.values)?;
            if let Some(unit) = column.unit {
                hdu.write_key(&mut self.fits, &format!("TUNIT{}", i + 1), unit)?;
            }
        }

        self.tables_written += 1;
        Ok(())
    }

    /// Number of table extensions written so far
    pub fn tables_written(&self) -> usize {
        self.tables_written
    }

    /// Close the file, flushing everything written
    pub fn finish(self) -> Result<(), FitsError> {
        drop(self.fits);
        Ok(())
    }
}

use anyhow::{Context, Result};
use std::path::PathBuf;

use jwstfits::extract::{ExtensionSchema, FileKind};
use jwstfits::fits::{ExtensionSource, FitsFile, HduKind};

/// Display the extensions and columns of a FITS file
pub fn run(file: PathBuf, head: usize) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let mut fits = FitsFile::open(&file).context("Failed to open FITS file")?;
    let schema = ExtensionSchema::default();

    println!("FITS File Information");
    println!("=====================");
    println!("File: {}", file.display());
    match FileKind::detect(fits.extensions(), &schema) {
        Ok(kind) => println!("Detected kind: {}", kind),
        Err(e) => println!("Detected kind: <none> ({})", e),
    }
    println!();

    println!("Extensions:");
    for ext in fits.extensions() {
        let kind = match ext.kind {
            HduKind::Primary => "primary",
            HduKind::Table => "table",
            HduKind::Image => "image",
        };
        println!("  [{:3}] {:<12} {:<8} {} rows", ext.index, ext.name, kind, ext.rows());
        for column in &ext.columns {
            match &column.unit {
                Some(unit) => println!("          {} ({})", column.name, unit),
                None => println!("          {}", column.name),
            }
        }
    }

    if head > 0 {
        if let Some(&index) = schema.spectral_extensions(fits.extensions()).first() {
            let names = [
                schema.wavelength_column.as_str(),
                schema.flux_column.as_str(),
                schema.flux_error_column.as_str(),
            ];
            let mut columns = Vec::with_capacity(names.len());
            for name in names {
                columns.push(
                    fits.read_column(index, name)
                        .with_context(|| format!("Failed to read {} from extension {}", name, index))?,
                );
            }

            println!();
            println!("First {} rows of extension {}:", head, index);
            println!("  {:>14} {:>14} {:>14}", names[0], names[1], names[2]);
            for row in 0..head.min(columns[0].len()) {
                println!(
                    "  {:>14.6} {:>14.6e} {:>14.6e}",
                    columns[0][row], columns[1][row], columns[2][row]
                );
            }
        }
    }

    fits.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_info_on_demo_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo_x1dints.fits");
        super::super::demo::run(path.clone(), 3, 20).unwrap();

        run(path.clone(), 0).unwrap();
        run(path, 5).unwrap();
    }

    #[test]
    fn test_info_missing_file() {
        let dir = tempdir().unwrap();
        assert!(run(dir.path().join("absent.fits"), 0).is_err());
    }
}

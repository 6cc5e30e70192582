//! Final-abundance CSV tables (`isotope`, `X` columns).

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use nf_core::Real;
use tracing::debug;

use crate::error::{AbundanceError, AbundanceResult};
use crate::snapshot::AbundanceSnapshot;

/// File name of the final-abundance table inside a run folder.
pub const FINAL_ABUNDANCE_FILE: &str = "final_abundances.csv";

pub const ISOTOPE_COLUMN: &str = "isotope";
pub const X_COLUMN: &str = "X";

/// Parse a final-abundance CSV from any reader. `origin` is only used in
/// error messages.
pub fn parse_final_abundances<R: Read>(reader: R, origin: &Path) -> AbundanceResult<AbundanceSnapshot> {
    let csv_err = |source: csv::Error| AbundanceError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_err)?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AbundanceError::MissingColumn {
                path: origin.to_path_buf(),
                column: name,
            })
    };
    let iso_idx = column(ISOTOPE_COLUMN)?;
    let x_idx = column(X_COLUMN)?;

    let mut pairs = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        // header is row 1
        let row = i + 2;

        let isotope = record.get(iso_idx).unwrap_or("");
        if isotope.is_empty() {
            return Err(AbundanceError::InvalidValue {
                path: origin.to_path_buf(),
                row,
                column: ISOTOPE_COLUMN,
                value: isotope.to_string(),
            });
        }

        let raw_x = record.get(x_idx).unwrap_or("");
        let x: Real = raw_x.parse().map_err(|_| AbundanceError::InvalidValue {
            path: origin.to_path_buf(),
            row,
            column: X_COLUMN,
            value: raw_x.to_string(),
        })?;

        pairs.push((isotope.to_string(), x));
    }

    debug!(path = %origin.display(), isotopes = pairs.len(), "parsed final abundances");
    Ok(AbundanceSnapshot::from_pairs(pairs))
}

/// Read a final-abundance CSV file.
pub fn read_final_abundances(path: &Path) -> AbundanceResult<AbundanceSnapshot> {
    if !path.exists() {
        return Err(AbundanceError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|e| AbundanceError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_final_abundances(file, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> AbundanceResult<AbundanceSnapshot> {
        parse_final_abundances(content.as_bytes(), Path::new("final_abundances.csv"))
    }

    #[test]
    fn reads_named_columns_in_any_order() {
        let snap = parse("X,isotope,Z\n1.0e-3,Ne-20,10\n0.02,O-16,8\n").unwrap();
        assert_eq!(snap.entries()[0].isotope, "O-16");
        assert_eq!(snap.get("Ne-20"), Some(1.0e-3));
    }

    #[test]
    fn zero_is_kept() {
        let snap = parse("isotope,X\nF-19,0.0\nO-16,0.5\n").unwrap();
        assert_eq!(snap.get("F-19"), Some(0.0));
        assert_eq!(snap.entries()[1].isotope, "F-19");
    }

    #[test]
    fn missing_column_is_fatal() {
        let err = parse("isotope,Y\nO-16,0.5\n").unwrap_err();
        assert!(matches!(
            err,
            AbundanceError::MissingColumn { column: "X", .. }
        ));
    }

    #[test]
    fn bad_value_names_row() {
        let err = parse("isotope,X\nO-16,0.5\nC-12,abc\n").unwrap_err();
        match err {
            AbundanceError::InvalidValue { row, column, value, .. } => {
                assert_eq!(row, 3);
                assert_eq!(column, "X");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn whitespace_is_trimmed() {
        let snap = parse("isotope , X\n O-16 , 0.5 \n").unwrap();
        assert_eq!(snap.get("O-16"), Some(0.5));
    }
}

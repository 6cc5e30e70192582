//! Mass fraction of one isotope against simulation time.
//!
//! A run's `summary.csv` lists X per isotope for every `iso_massf*.DAT`
//! dump (`file`, `isotope`, `X` columns). The dump time is the `agej`
//! field near the top of each dump file.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::LazyLock;

use csv::ReaderBuilder;
use nf_core::Real;
use regex::Regex;
use tracing::debug;

use crate::error::{AbundanceError, AbundanceResult};
use crate::final_table::{ISOTOPE_COLUMN, X_COLUMN};

/// Per-dump abundance summary inside a run folder.
pub const SUMMARY_FILE: &str = "summary.csv";
pub const FILE_COLUMN: &str = "file";
/// Name prefix of the abundance dump files.
pub const DUMP_PREFIX: &str = "iso_massf";

/// Only the header block of a dump is searched for `agej`.
const AGEJ_SEARCH_LINES: usize = 120;

static AGEJ_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bagej\b\s*([0-9.+\-Ee]+)").expect("agej pattern is valid")
});

/// One row of `summary.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub file: String,
    pub isotope: String,
    pub x: Real,
}

/// Parse a summary CSV from any reader. `origin` is only used in errors.
pub fn parse_summary<R: Read>(reader: R, origin: &Path) -> AbundanceResult<Vec<SummaryRow>> {
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
    let file_idx = column(FILE_COLUMN)?;
    let iso_idx = column(ISOTOPE_COLUMN)?;
    let x_idx = column(X_COLUMN)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let raw_x = record.get(x_idx).unwrap_or("");
        let x: Real = raw_x.parse().map_err(|_| AbundanceError::InvalidValue {
            path: origin.to_path_buf(),
            row: i + 2,
            column: X_COLUMN,
            value: raw_x.to_string(),
        })?;
        rows.push(SummaryRow {
            file: record.get(file_idx).unwrap_or("").to_string(),
            isotope: record.get(iso_idx).unwrap_or("").to_string(),
            x,
        });
    }

    debug!(path = %origin.display(), rows = rows.len(), "parsed abundance summary");
    Ok(rows)
}

pub fn read_summary(path: &Path) -> AbundanceResult<Vec<SummaryRow>> {
    if !path.exists() {
        return Err(AbundanceError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| AbundanceError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_summary(file, path)
}

/// First `agej` value in the header block, if any.
pub fn agej_from_header<R: BufRead>(reader: R) -> Option<Real> {
    for line in reader.lines().take(AGEJ_SEARCH_LINES) {
        let Ok(line) = line else { break };
        if let Some(caps) = AGEJ_PATTERN.captures(&line) {
            return caps[1].parse().ok();
        }
    }
    None
}

/// `agej` of one dump file.
pub fn read_agej(path: &Path) -> AbundanceResult<Option<Real>> {
    let file = File::open(path).map_err(|e| AbundanceError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(agej_from_header(BufReader::new(file)))
}

/// One point of an isotope's time evolution.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionPoint {
    pub file: String,
    pub time: Real,
    pub x: Real,
}

/// Join the summary rows of `isotope` with the dump times, sorted by time.
///
/// Rows whose dump has no known finite time are dropped.
pub fn isotope_evolution(
    rows: &[SummaryRow],
    times: &BTreeMap<String, Real>,
    isotope: &str,
) -> AbundanceResult<Vec<EvolutionPoint>> {
    let matching: Vec<&SummaryRow> = rows.iter().filter(|r| r.isotope == isotope).collect();
    if matching.is_empty() {
        let mut seen = BTreeSet::new();
        let examples: Vec<&str> = rows
            .iter()
            .map(|r| r.isotope.as_str())
            .filter(|iso| seen.insert(*iso))
            .take(25)
            .collect();
        return Err(AbundanceError::UnknownIsotope {
            isotope: isotope.to_string(),
            examples: examples.join(", "),
        });
    }

    let mut points: Vec<EvolutionPoint> = matching
        .iter()
        .filter_map(|row| {
            let time = times.get(&row.file).copied().filter(|t| t.is_finite())?;
            Some(EvolutionPoint {
                file: row.file.clone(),
                time,
                x: row.x,
            })
        })
        .collect();

    debug!(
        isotope,
        kept = points.len(),
        dropped = matching.len() - points.len(),
        "joined summary with dump times"
    );
    points.sort_by(|a, b| a.time.total_cmp(&b.time));
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "\
file,isotope,X
iso_massf00002.DAT,HE-4,0.30
iso_massf00001.DAT,HE-4,0.28
iso_massf00001.DAT,N-14,1.0e-3
iso_massf00003.DAT,HE-4,0.31
";

    fn rows() -> Vec<SummaryRow> {
        parse_summary(SUMMARY.as_bytes(), Path::new("summary.csv")).unwrap()
    }

    #[test]
    fn agej_is_read_from_header() {
        let header = "H NAME: test\nH cycle 10\nH agej   3.5E+02 s\n  1 H 1 0.7\n";
        assert_eq!(agej_from_header(header.as_bytes()), Some(350.0));
        assert_eq!(agej_from_header("H cycle 10\n".as_bytes()), None);
        // word boundary: "magej" is not the field
        assert_eq!(agej_from_header("H magej 1.0\n".as_bytes()), None);
    }

    #[test]
    fn agej_beyond_header_block_is_ignored() {
        let mut content = "x\n".repeat(AGEJ_SEARCH_LINES);
        content.push_str("agej 1.0\n");
        assert_eq!(agej_from_header(content.as_bytes()), None);
    }

    #[test]
    fn evolution_is_sorted_by_time() {
        let times = BTreeMap::from([
            ("iso_massf00001.DAT".to_string(), 10.0),
            ("iso_massf00002.DAT".to_string(), 20.0),
            ("iso_massf00003.DAT".to_string(), Real::NAN),
        ]);
        let points = isotope_evolution(&rows(), &times, "HE-4").unwrap();
        let xs: Vec<_> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.28, 0.30]);
        assert_eq!(points[0].file, "iso_massf00001.DAT");
    }

    #[test]
    fn unknown_isotope_lists_examples() {
        let err = isotope_evolution(&rows(), &BTreeMap::new(), "O-16").unwrap_err();
        match err {
            AbundanceError::UnknownIsotope { isotope, examples } => {
                assert_eq!(isotope, "O-16");
                assert_eq!(examples, "HE-4, N-14");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn summary_needs_file_column() {
        let err = parse_summary("isotope,X\nHE-4,0.3\n".as_bytes(), Path::new("summary.csv"))
            .unwrap_err();
        assert!(matches!(
            err,
            AbundanceError::MissingColumn { column: "file", .. }
        ));
    }
}

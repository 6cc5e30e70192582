//! Fixed-layout flux record parsing and decoding.
//!
//! Layout of a data row (whitespace separated):
//!
//! ```text
//! idx  Z1 A1  Z3 A3  Z5 A5  Z7 A7  flux  [energy  timescale ...]
//! ```
//!
//! Slots 1 and 3 are reactants, 5 and 7 products. A proton count of zero
//! marks an empty slot.

use std::path::Path;

use nf_core::{ELEMENTS, ElementTable, Real};

use crate::error::{FluxError, FluxResult, RecordError};
use crate::reaction::ReactionEvent;

/// Leading columns every record must provide.
pub const MIN_COLUMNS: usize = 10;

const FLUX_COLUMN: usize = 9;

/// One numeric data row, before decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based line number in the source file.
    pub line: usize,
    pub fields: Vec<Real>,
}

/// Split a flux file into numeric rows.
///
/// Blank lines and `#` comments are skipped. Every data row must have the
/// same number of columns, and at least [`MIN_COLUMNS`].
pub fn parse_records(content: &str, origin: &Path) -> FluxResult<Vec<RawRecord>> {
    let malformed = |line: usize, reason: RecordError| FluxError::Malformed {
        path: origin.to_path_buf(),
        line,
        reason,
    };

    let mut records = Vec::new();
    let mut width: Option<usize> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let data = raw.split('#').next().unwrap_or("").trim();
        if data.is_empty() {
            continue;
        }

        let fields = data
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<Real>()
                    .map_err(|_| RecordError::NotNumeric {
                        token: token.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| malformed(line, reason))?;

        match width {
            None => {
                if fields.len() < MIN_COLUMNS {
                    return Err(malformed(
                        line,
                        RecordError::TooFewColumns {
                            expected: MIN_COLUMNS,
                            found: fields.len(),
                        },
                    ));
                }
                width = Some(fields.len());
            }
            Some(expected) if expected != fields.len() => {
                return Err(malformed(
                    line,
                    RecordError::InconsistentColumns {
                        expected,
                        found: fields.len(),
                    },
                ));
            }
            Some(_) => {}
        }

        records.push(RawRecord { line, fields });
    }

    Ok(records)
}

/// Truncate a stored slot value to a non-negative integer.
fn slot_value(value: Real, what: &'static str) -> Result<u32, RecordError> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < 0.0 || truncated > u32::MAX as Real {
        return Err(RecordError::InvalidSlot { what, value });
    }
    Ok(truncated as u32)
}

/// Decode one record into a reaction event using `elements`.
///
/// No thresholding happens here; the flux keeps its sign and full precision.
pub fn decode_with(elements: &ElementTable, fields: &[Real]) -> Result<ReactionEvent, RecordError> {
    if fields.len() < MIN_COLUMNS {
        return Err(RecordError::TooFewColumns {
            expected: MIN_COLUMNS,
            found: fields.len(),
        });
    }

    let mut slots = Vec::with_capacity(4);
    for pair in fields[1..FLUX_COLUMN].chunks_exact(2) {
        let z = slot_value(pair[0], "proton number")?;
        let a = slot_value(pair[1], "mass number")?;
        slots.push(elements.resolve(z, a));
    }

    let mut slots = slots.into_iter();
    let reactants = slots.by_ref().take(2).flatten().collect();
    let products = slots.flatten().collect();

    Ok(ReactionEvent {
        reactants,
        products,
        flux: fields[FLUX_COLUMN],
    })
}

/// [`decode_with`] using the built-in element table.
pub fn decode(fields: &[Real]) -> Result<ReactionEvent, RecordError> {
    decode_with(&ELEMENTS, fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> &'static Path {
        Path::new("flux_00001.DAT")
    }

    #[test]
    fn decode_two_body_capture() {
        let fields = [1.0, 8.0, 15.0, 1.0, 1.0, 9.0, 16.0, 0.0, 0.0, 2.5e-6, 1.2, 3.4];
        let event = decode(&fields).unwrap();
        assert_eq!(event.key().as_str(), "O-15 + H-1 -> F-16");
        assert_eq!(event.flux, 2.5e-6);
    }

    #[test]
    fn decode_keeps_negative_flux() {
        let fields = [2.0, 9.0, 16.0, 0.0, 0.0, 8.0, 16.0, 1.0, 1.0, -1.0e-7, 0.0, 0.0];
        let event = decode(&fields).unwrap();
        assert_eq!(event.key().as_str(), "F-16 -> O-16 + H-1");
        assert_eq!(event.flux, -1.0e-7);
        assert_eq!(event.reactants.len(), 1);
        assert_eq!(event.products.len(), 2);
    }

    #[test]
    fn decode_truncates_float_slots() {
        let fields = [1.0, 6.9, 13.2, 0.0, 0.0, 7.0, 13.0, 0.0, 0.0, 1.0];
        let event = decode(&fields).unwrap();
        assert_eq!(event.key().as_str(), "C-13 -> N-13");
    }

    #[test]
    fn decode_rejects_short_rows() {
        let err = decode(&[1.0, 8.0, 16.0]).unwrap_err();
        assert_eq!(
            err,
            RecordError::TooFewColumns {
                expected: 10,
                found: 3
            }
        );
    }

    #[test]
    fn decode_rejects_negative_slot() {
        let fields = [1.0, -8.0, 15.0, 0.0, 0.0, 9.0, 16.0, 0.0, 0.0, 1.0];
        assert!(matches!(
            decode(&fields),
            Err(RecordError::InvalidSlot { what: "proton number", .. })
        ));
    }

    #[test]
    fn parse_skips_blank_and_comment_lines() {
        let content = "# idx Z1 A1 ...\n\n1 8 15 1 1 9 16 0 0 2.5e-6 0 0\n   # trailing\n";
        let records = parse_records(content, origin()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line, 3);
        assert_eq!(records[0].fields.len(), 12);
    }

    #[test]
    fn parse_rejects_inconsistent_widths() {
        let content = "1 8 15 1 1 9 16 0 0 2.5e-6 0 0\n2 8 15 1 1 9 16 0 0 2.5e-6\n";
        let err = parse_records(content, origin()).unwrap_err();
        match err {
            FluxError::Malformed { line, reason, .. } => {
                assert_eq!(line, 2);
                assert_eq!(
                    reason,
                    RecordError::InconsistentColumns {
                        expected: 12,
                        found: 10
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let content = "1 8 15 1 1 9 16 0 0 abc 0 0\n";
        assert!(matches!(
            parse_records(content, origin()),
            Err(FluxError::Malformed {
                reason: RecordError::NotNumeric { .. },
                ..
            })
        ));
    }

    #[test]
    fn parse_rejects_too_few_columns() {
        let content = "1 8 15 1 1\n";
        assert!(matches!(
            parse_records(content, origin()),
            Err(FluxError::Malformed {
                line: 1,
                reason: RecordError::TooFewColumns { .. },
                ..
            })
        ));
    }
}

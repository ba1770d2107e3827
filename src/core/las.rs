// LasQC - core/las.rs
//
// LAS 2.0 reader for unwrapped files. Turns decoded file text into the
// header/curve model the QC core consumes.
// Core layer: accepts strings and bytes, never touches the filesystem.

use crate::core::model::{Curve, HeaderField, LasFile};
use crate::util::constants;
use crate::util::error::LasError;
use regex::Regex;
use std::sync::OnceLock;

/// `MNEM.UNIT   VALUE : DESCRIPTION`. The unit runs from the first dot to
/// the next whitespace; the description follows the last colon.
fn header_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?P<mnem>[^.\s][^.]*?)\s*\.(?P<unit>\S*)(?P<rest>.*)$")
            .unwrap_or_else(|e| unreachable!("header line regex is valid: {e}"))
    })
}

/// Decode raw file bytes: UTF-8 first, then Latin-1, which accepts any
/// byte sequence. A UTF-8 byte-order mark is dropped.
pub fn decode_bytes(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            tracing::debug!("File is not valid UTF-8; decoding as Latin-1");
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}

fn parse_header_line(line: &str) -> Option<HeaderField> {
    let caps = header_line_regex().captures(line)?;
    let rest = caps.name("rest").map_or("", |m| m.as_str());
    let (value, description) = match rest.rfind(':') {
        Some(idx) => (&rest[..idx], &rest[idx + 1..]),
        None => (rest, ""),
    };
    Some(HeaderField {
        mnemonic: caps["mnem"].trim().to_string(),
        unit: caps["unit"].to_string(),
        value: value.trim().to_string(),
        description: description.trim().to_string(),
    })
}

/// Parse decoded LAS text.
///
/// Supported sections: ~V, ~W, ~C, ~P, ~O (ignored), ~A. Null samples
/// (the ~W `NULL` value, or -999.25 when undeclared) become `None`.
/// The first curve is the index; it is reported as a curve as well.
pub fn parse_las(text: &str) -> Result<LasFile, LasError> {
    let mut file = LasFile::default();
    let mut section: Option<char> = None;
    let mut rows: Vec<(usize, Vec<&str>)> = Vec::new();
    let mut saw_data = false;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_number = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('~') {
            let kind = name.chars().next().map(|c| c.to_ascii_uppercase());
            if kind == Some('A') {
                saw_data = true;
            }
            section = kind;
            continue;
        }

        match section {
            Some(kind @ ('V' | 'W' | 'C' | 'P')) => {
                let field = parse_header_line(line).ok_or(LasError::MalformedLine {
                    line_number,
                    section: kind,
                })?;
                match kind {
                    'V' => file.version.push(field),
                    'W' => file.well.push(field),
                    'P' => file.params.push(field),
                    _ => {
                        if file.curves.len() >= constants::MAX_LAS_CURVES {
                            return Err(LasError::TooManyCurves {
                                count: file.curves.len() + 1,
                                max: constants::MAX_LAS_CURVES,
                            });
                        }
                        file.curves.push(Curve {
                            mnemonic: field.mnemonic,
                            unit: field.unit,
                            description: field.description,
                            values: Vec::new(),
                            basis: Vec::new(),
                        });
                    }
                }
            }
            Some('A') => rows.push((line_number, line.split_whitespace().collect())),
            // ~O and unrecognised sections are free text.
            _ => {}
        }
    }

    let wrapped = file
        .version
        .iter()
        .find(|f| f.mnemonic.eq_ignore_ascii_case(constants::HEADER_WRAP))
        .is_some_and(|f| f.value.eq_ignore_ascii_case("YES"));
    if wrapped {
        return Err(LasError::WrappedUnsupported);
    }
    if !saw_data {
        return Err(LasError::MissingDataSection);
    }
    if file.curves.is_empty() {
        return Err(LasError::NoCurves);
    }

    let null = file
        .well
        .iter()
        .find(|f| f.mnemonic.eq_ignore_ascii_case(constants::HEADER_NULL))
        .and_then(|f| f.value.parse::<f64>().ok())
        .unwrap_or(constants::DEFAULT_LAS_NULL);

    let width = file.curves.len();
    for (line_number, tokens) in rows {
        if tokens.len() != width {
            return Err(LasError::ColumnMismatch {
                line_number,
                expected: width,
                found: tokens.len(),
            });
        }
        let mut row = Vec::with_capacity(width);
        for token in tokens {
            let v: f64 = token.parse().map_err(|_| LasError::InvalidValue {
                line_number,
                raw: token.to_string(),
            })?;
            row.push(if v == null || !v.is_finite() { None } else { Some(v) });
        }
        let index = row[0];
        for (curve, value) in file.curves.iter_mut().zip(row) {
            curve.values.push(value);
            curve.basis.push(index);
        }
    }

    tracing::debug!(
        curves = file.curves.len(),
        samples = file.curves.first().map_or(0, |c| c.values.len()),
        well_fields = file.well.len(),
        null,
        "LAS parsed"
    );

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
~Version Information
 VERS.                  2.0 :   CWLS LOG ASCII STANDARD - VERSION 2.0
 WRAP.                   NO :   ONE LINE PER DEPTH STEP
~Well Information
#MNEM.UNIT      DATA                  DESCRIPTION
 STRT.M         100.0              :  START DEPTH
 NULL.          -999.25            :  NULL VALUE
 WELL.          PAE-123            :  WELL
 DATE.          2024-05-01 10:30   :  LOG DATE
 SRVC.                             :  SERVICE COMPANY
~Curve Information
 DEPT.M                 :  1  DEPTH
 GRC .GAPI              :  2  GAMMA RAY
 CAL .IN                :  3  CALIPER
~Parameter
 BHT .DEGC      35.5    :  BOTTOM HOLE TEMPERATURE
~Other
 Free text, ignored.
~A  DEPTH  GR  CAL
100.0   45.2   8.5
100.5  -999.25 8.6
101.0   50.1   8.7
";

    #[test]
    fn test_parse_sample() {
        let las = parse_las(SAMPLE).unwrap();
        assert_eq!(las.version.len(), 2);
        assert_eq!(las.params.len(), 1);
        let names: Vec<&str> = las.curves.iter().map(|c| c.mnemonic.as_str()).collect();
        assert_eq!(names, vec!["DEPT", "GRC", "CAL"]);
        assert_eq!(las.curves[1].unit, "GAPI");
        assert_eq!(las.curves[1].values, vec![Some(45.2), None, Some(50.1)]);
        assert_eq!(las.curves[2].basis, vec![Some(100.0), Some(100.5), Some(101.0)]);
    }

    #[test]
    fn test_header_values_and_empty_fields() {
        let las = parse_las(SAMPLE).unwrap();
        assert_eq!(las.well_value("WELL"), Some("PAE-123"));
        // Colons inside the value are kept; the last colon starts the description.
        assert_eq!(las.well_value("DATE"), Some("2024-05-01 10:30"));
        let srvc = las.well.iter().find(|f| f.mnemonic == "SRVC").unwrap();
        assert!(srvc.is_empty());
        assert_eq!(srvc.description, "SERVICE COMPANY");
    }

    #[test]
    fn test_custom_null_value() {
        let text = "~W\n NULL. -1 : NULL\n~C\n DEPT.M : D\n X. : X\n~A\n1 -1\n2 5\n";
        let las = parse_las(text).unwrap();
        assert_eq!(las.curves[1].values, vec![None, Some(5.0)]);
    }

    #[test]
    fn test_missing_data_section() {
        let text = "~C\n DEPT.M : D\n";
        assert!(matches!(parse_las(text), Err(LasError::MissingDataSection)));
    }

    #[test]
    fn test_no_curves() {
        let text = "~W\n WELL. X : W\n~A\n";
        assert!(matches!(parse_las(text), Err(LasError::NoCurves)));
    }

    #[test]
    fn test_wrapped_rejected() {
        let text = "~V\n WRAP. YES : wrapped\n~C\n DEPT.M : D\n~A\n1\n";
        assert!(matches!(parse_las(text), Err(LasError::WrappedUnsupported)));
    }

    #[test]
    fn test_column_mismatch_reports_line() {
        let text = "~C\n DEPT.M : D\n GR.GAPI : G\n~A\n1 2\n3\n";
        match parse_las(text) {
            Err(LasError::ColumnMismatch {
                line_number,
                expected,
                found,
            }) => {
                assert_eq!(line_number, 6);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("Expected ColumnMismatch, got: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_value() {
        let text = "~C\n DEPT.M : D\n~A\nabc\n";
        assert!(matches!(parse_las(text), Err(LasError::InvalidValue { .. })));
    }

    #[test]
    fn test_malformed_header_line() {
        let text = "~W\n no dot here\n~C\n DEPT.M : D\n~A\n1\n";
        assert!(matches!(
            parse_las(text),
            Err(LasError::MalformedLine { section: 'W', .. })
        ));
    }

    #[test]
    fn test_decode_latin1_fallback() {
        let bytes = b"~W\n FLD. CA\xd1ADON : FIELD\n";
        let text = decode_bytes(bytes);
        assert!(text.contains("CAÑADON"));
    }

    #[test]
    fn test_decode_strips_bom() {
        let text = decode_bytes(b"\xEF\xBB\xBF~V\n");
        assert!(text.starts_with("~V"));
    }
}

//! Input file parsing and submission output.
//!
//! Input format:
//!
//! ```text
//! <short_range>,<long_range>
//! <short_cost>,<long_cost>
//! <x>,<y>
//! <x>,<y>
//! ...
//! ```
//!
//! Blank lines are ignored and reported line numbers are 1-based positions in
//! the original text.

use cam_cover_core::{Candidate, Piece};
use chrono::NaiveDate;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Malformed input errors. Parsing stops at the first one.
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("missing {what} header line (expected `<short>,<long>`)")]
    MissingHeader { what: &'static str },
    #[error("line {line}: malformed {what} header `{text}`: {reason}")]
    BadHeader {
        line: usize,
        what: &'static str,
        text: String,
        reason: String,
    },
    #[error("line {line}: malformed piece `{text}`: {reason}")]
    BadPiece {
        line: usize,
        text: String,
        reason: String,
    },
}

/// Raw contents of an input file.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedInput {
    /// `(short, long)` ranges.
    pub ranges: (f64, f64),
    /// `(short, long)` unit costs.
    pub costs: (f64, f64),
    pub pieces: Vec<Piece>,
}

fn split_pair(text: &str) -> Result<(&str, &str), String> {
    let mut parts = text.split(',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Ok((a.trim(), b.trim())),
        _ => Err("expected exactly two comma-separated values".to_string()),
    }
}

fn parse_header(line: usize, what: &'static str, text: &str) -> Result<(f64, f64), InputError> {
    let bad = |reason: String| InputError::BadHeader {
        line,
        what,
        text: text.to_string(),
        reason,
    };
    let (a, b) = split_pair(text).map_err(bad)?;
    let parse = |s: &str| -> Result<f64, String> {
        let v: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
        if v.is_finite() && v > 0.0 {
            Ok(v)
        } else {
            Err(format!("`{s}` must be a positive number"))
        }
    };
    let a = parse(a).map_err(bad)?;
    let b = parse(b).map_err(bad)?;
    Ok((a, b))
}

fn parse_piece(line: usize, text: &str) -> Result<Piece, InputError> {
    let bad = |reason: String| InputError::BadPiece {
        line,
        text: text.to_string(),
        reason,
    };
    let (a, b) = split_pair(text).map_err(bad)?;
    let parse = |s: &str| -> Result<i64, String> {
        let v: i64 = s.parse().map_err(|_| format!("`{s}` is not an integer"))?;
        if v < 0 {
            Err(format!("`{s}` is negative; grid coordinates must be >= 0"))
        } else {
            Ok(v)
        }
    };
    Ok(Piece::new(parse(a).map_err(bad)?, parse(b).map_err(bad)?))
}

/// Parse the text of an input file.
pub fn parse_input(text: &str) -> Result<ParsedInput, InputError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (line, ranges_text) = lines
        .next()
        .ok_or(InputError::MissingHeader { what: "range" })?;
    let ranges = parse_header(line, "range", ranges_text)?;

    let (line, costs_text) = lines
        .next()
        .ok_or(InputError::MissingHeader { what: "cost" })?;
    let costs = parse_header(line, "cost", costs_text)?;

    let pieces = lines
        .map(|(line, text)| parse_piece(line, text))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedInput {
        ranges,
        costs,
        pieces,
    })
}

/// Read and parse an input file.
pub fn read_input(path: impl AsRef<Path>) -> Result<ParsedInput, InputError> {
    let text = fs::read_to_string(path)?;
    parse_input(&text)
}

/// `submission_YYYY-MM-DD.txt`.
pub fn submission_file_name(date: NaiveDate) -> String {
    format!("submission_{}.txt", date.format("%Y-%m-%d"))
}

/// Write one `"<code>,<x>,<y>"` line per selected candidate.
pub fn write_submission<'a, W, I>(selected: I, out: W) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Candidate>,
{
    let mut out = BufWriter::new(out);
    for c in selected {
        writeln!(out, "{}", c.label())?;
    }
    out.flush()
}

/// Write the dated submission file into `dir` and return its path.
pub fn write_submission_file<'a, I>(dir: &Path, date: NaiveDate, selected: I) -> io::Result<PathBuf>
where
    I: IntoIterator<Item = &'a Candidate>,
{
    fs::create_dir_all(dir)?;
    let path = dir.join(submission_file_name(date));
    write_submission(selected, fs::File::create(&path)?)?;
    Ok(path)
}

/// Read back a submission file into candidates.
pub fn read_submission(path: impl AsRef<Path>) -> Result<Vec<Candidate>, InputError> {
    let text = fs::read_to_string(path)?;
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| {
            Candidate::parse_label(l).ok_or_else(|| InputError::BadPiece {
                line: i + 1,
                text: l.to_string(),
                reason: "expected `<code>,<x>,<y>`".to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cam_cover_core::CameraKind;
    use nalgebra::Point2;

    #[test]
    fn parses_headers_and_pieces() {
        let input = parse_input("2,5\n1,3\n0,0\n3,0\n\n 7 , 9 \n").expect("parse");
        assert_eq!(input.ranges, (2.0, 5.0));
        assert_eq!(input.costs, (1.0, 3.0));
        assert_eq!(
            input.pieces,
            vec![Piece::new(0, 0), Piece::new(3, 0), Piece::new(7, 9)]
        );
    }

    #[test]
    fn accepts_real_headers() {
        let input = parse_input("1.5,4.25\n0.5,2\n").expect("parse");
        assert_eq!(input.ranges, (1.5, 4.25));
        assert_eq!(input.costs, (0.5, 2.0));
        assert!(input.pieces.is_empty());
    }

    #[test]
    fn missing_headers_are_reported() {
        assert!(matches!(
            parse_input(""),
            Err(InputError::MissingHeader { what: "range" })
        ));
        assert!(matches!(
            parse_input("2,5\n"),
            Err(InputError::MissingHeader { what: "cost" })
        ));
    }

    #[test]
    fn bad_lines_carry_line_numbers() {
        let err = parse_input("2,5\n1,x\n").unwrap_err();
        assert!(matches!(err, InputError::BadHeader { line: 2, what: "cost", .. }));

        let err = parse_input("2,5\n1,3\n0,0\n\n4;4\n").unwrap_err();
        let InputError::BadPiece { line, text, .. } = err else {
            panic!("expected BadPiece, got {err:?}");
        };
        assert_eq!(line, 5);
        assert_eq!(text, "4;4");

        let err = parse_input("2,5\n1,3\n1.5,2\n").unwrap_err();
        assert!(err.to_string().starts_with("line 3: malformed piece `1.5,2`"));

        let err = parse_input("2,5\n1,3\n-1,2\n").unwrap_err();
        assert!(err.to_string().contains("negative"));

        let err = parse_input("0,5\n1,3\n").unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn submission_name_and_lines() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("date");
        assert_eq!(submission_file_name(date), "submission_2024-03-09.txt");

        let selected = [
            Candidate::new(CameraKind::Short, Point2::new(5.0, 5.0)),
            Candidate::new(CameraKind::Long, Point2::new(1.5, 4.25)),
        ];
        let mut buf = Vec::new();
        write_submission(&selected, &mut buf).expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "1,5,5\n2,1.5,4.25\n");
    }

    #[test]
    fn submission_file_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).expect("date");
        let selected = [Candidate::new(CameraKind::Long, Point2::new(1.5, 4.680_811_895_072_606))];
        let path = write_submission_file(dir.path(), date, &selected).expect("write");
        assert!(path.ends_with("submission_2024-01-02.txt"));
        assert_eq!(read_submission(&path).expect("read"), selected.to_vec());
    }
}

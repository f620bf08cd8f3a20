//! Decoder for the line-oriented mirror protocol.
//!
//! A response looks like this, with `\t` standing for a tab:
//!
//! ```text
//! O
//! H\tasof
//! D\t1700000000
//! H\tnick\tscore
//! D\tAlice\t10
//! D\tBob\t7
//! $\t42\t$
//! ```
//!
//! The first line signals success or failure. `H` lines open a dataset and
//! name its columns, `D` lines add a row to the open dataset, `$` lines close
//! a section. Anything else continues whichever field was opened last.

use crate::StatsError;

pub const SUCCESS_SENTINEL: &str = "O";
pub const FAILURE_SENTINEL: &str = "E\t998";
/// Some mirrors answer an unknown player with an echoed header on the status line.
pub const HEADER_ECHO_PREFIX: &str = "O\tH\tasof\tD";
pub const NOT_FOUND_MARKER: &str = "Player Not Found";

pub const HEADER_PREFIX: &str = "H\t";
pub const DATA_PREFIX: &str = "D\t";
pub const END_PREFIX: &str = "$\t";
pub const FIELD_DELIMITER: char = '\t';

/// One titled section of a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Default)]
struct RawDataset {
    header: String,
    rows: Vec<String>,
}

impl RawDataset {
    fn split(self) -> Dataset {
        Dataset {
            columns: split_fields(&self.header),
            rows: self.rows.iter().map(|row| split_fields(row)).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenField {
    Nothing,
    Header,
    Row,
}

/// Parses a raw payload into its ordered datasets.
///
/// # Errors
///
/// Returns `NotFound` when the mirror reports an unknown entity and
/// `SourceError` for any other status line or a grammar deviation.
pub fn decode_payload(raw: &str) -> Result<Vec<Dataset>, StatsError> {
    let mut lines = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line));

    let status = lines.next().unwrap_or_default().trim();
    if status != SUCCESS_SENTINEL {
        return Err(classify_failure(status, lines));
    }

    let mut datasets: Vec<RawDataset> = Vec::new();
    let mut open = OpenField::Nothing;

    for line in lines {
        if let Some(header) = line.strip_prefix(HEADER_PREFIX) {
            datasets.push(RawDataset {
                header: header.to_owned(),
                rows: Vec::new(),
            });
            open = OpenField::Header;
        } else if let Some(row) = line.strip_prefix(DATA_PREFIX) {
            let dataset = datasets
                .last_mut()
                .ok_or_else(|| StatsError::source("data line received before any header"))?;
            dataset.rows.push(row.to_owned());
            open = OpenField::Row;
        } else if line.starts_with(END_PREFIX) {
            continue;
        } else {
            append_continuation(&mut datasets, open, line)?;
        }
    }

    tracing::debug!(datasets = datasets.len(), "decoded payload");
    Ok(datasets.into_iter().map(RawDataset::split).collect())
}

fn append_continuation(
    datasets: &mut [RawDataset],
    open: OpenField,
    line: &str,
) -> Result<(), StatsError> {
    let target = match (open, datasets.last_mut()) {
        (OpenField::Header, Some(dataset)) => Some(&mut dataset.header),
        (OpenField::Row, Some(dataset)) => dataset.rows.last_mut(),
        _ => None,
    };

    match target {
        Some(field) => field.push_str(line),
        None if line.is_empty() => {}
        None => {
            return Err(StatsError::source(
                "continuation line received before any header",
            ))
        }
    }

    Ok(())
}

fn classify_failure<'a>(status: &str, mut rest: impl Iterator<Item = &'a str>) -> StatsError {
    let not_found = status == FAILURE_SENTINEL
        || status.starts_with(HEADER_ECHO_PREFIX)
        || rest.any(|line| line.contains(NOT_FOUND_MARKER));

    if not_found {
        StatsError::not_found()
    } else {
        tracing::warn!(status, "mirror answered with an unrecognized status line");
        StatsError::source("Source query resulted in an error")
    }
}

fn split_fields(text: &str) -> Vec<String> {
    text.split(FIELD_DELIMITER).map(str::to_owned).collect()
}

//! Seed file loading.
//!
//! The file is a flat sequence of line pairs: a description line, then a
//! ticket-count line, repeated once per event. Event ids are assigned
//! 0, 1, 2, … in the order pairs appear. Lines are read as raw bytes, not
//! decoded as UTF-8, since the description is opaque payload data.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

/// Maximum description length an event may carry.
pub const MAX_DESCRIPTION_LEN: usize = 80;

/// Failure loading or parsing a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The file could not be opened.
    #[error("could not open seed file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// An I/O error occurred while reading a line.
    #[error("error reading seed file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// A description line had no matching ticket-count line.
    #[error("seed file {path} ends with an unpaired description line")]
    UnpairedDescription { path: String },
    /// A description line was empty.
    #[error("seed file {path} has an empty description")]
    EmptyDescription { path: String },
    /// A description line exceeded `MAX_DESCRIPTION_LEN` bytes.
    #[error("seed file {path} has a description longer than {MAX_DESCRIPTION_LEN} bytes")]
    DescriptionTooLong { path: String },
    /// A ticket-count line was not a valid `u16`.
    #[error("seed file {path} has a non-numeric or out-of-range ticket count: {value:?}")]
    BadTicketCount { path: String, value: Vec<u8> },
}

/// Load `(description, tickets_available)` pairs from a seed file, in file
/// order, ready to hand to [`crate::catalog::Catalog::from_seed`].
pub fn load_events(path: &Path) -> Result<Vec<(Vec<u8>, u16)>, SeedError> {
    let path_display = path.display().to_string();
    let file = File::open(path).map_err(|source| SeedError::Open {
        path: path_display.clone(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let mut events = Vec::new();
    loop {
        let Some(description) = read_line_bytes(&mut reader, &path_display)? else {
            break;
        };
        if description.is_empty() {
            return Err(SeedError::EmptyDescription {
                path: path_display,
            });
        }
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(SeedError::DescriptionTooLong {
                path: path_display,
            });
        }

        let Some(tickets_line) = read_line_bytes(&mut reader, &path_display)? else {
            return Err(SeedError::UnpairedDescription {
                path: path_display,
            });
        };
        let tickets_available = parse_ticket_count(&tickets_line, &path_display)?;

        events.push((description, tickets_available));
    }

    Ok(events)
}

/// Read one line, stripping a trailing `\n` (and a preceding `\r`), returning
/// `None` at end of file. An empty trailing line with no newline is treated
/// as end of file, matching `fgets` returning `NULL` at EOF.
fn read_line_bytes(
    reader: &mut impl BufRead,
    path_display: &str,
) -> Result<Option<Vec<u8>>, SeedError> {
    let mut line = Vec::new();
    let n = reader
        .read_until(b'\n', &mut line)
        .map_err(|source| SeedError::Read {
            path: path_display.to_owned(),
            source,
        })?;
    if n == 0 {
        return Ok(None);
    }
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

fn parse_ticket_count(line: &[u8], path_display: &str) -> Result<u16, SeedError> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.trim().parse::<u16>().ok())
        .ok_or_else(|| SeedError::BadTicketCount {
            path: path_display.to_owned(),
            value: line.to_vec(),
        })
}

// worklog-report - platform/fs.rs
//
// Reading the worklog export from disk and decoding it into rows of cells.

use crate::util::constants;
use crate::util::error::InputError;
use std::io::Read;
use std::path::Path;

/// Read and decode a CSV export. Row 0 is the header, returned as-is.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, InputError> {
    let metadata = std::fs::metadata(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.len() > constants::MAX_INPUT_FILE_SIZE {
        return Err(InputError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_INPUT_FILE_SIZE,
        });
    }

    let file = std::fs::File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = decode_rows(file).map_err(|source| InputError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), rows = rows.len(), "Read export");
    Ok(rows)
}

/// Decode CSV from any reader.
///
/// No header handling (the header is just the first row), rows may differ
/// in length, and a leading UTF-8 byte-order mark is dropped.
pub fn decode_rows<R: Read>(reader: R) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    if let Some(first) = rows.first_mut().and_then(|r| r.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    Ok(rows)
}

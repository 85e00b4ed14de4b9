//! CSV to row objects, with encoding and delimiter auto-detection.
//!
//! Each data row becomes a JSON object keyed by the header names. Values are
//! kept as strings; interpreting them is the hierarchy builder's job.

use serde_json::{json, Map, Value};
use std::io::Read;
use std::path::Path;

/// Delimiters considered by [`detect_delimiter`], in tie-break order.
const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// CSV parsing error with context
#[derive(Debug, Clone)]
pub struct CsvError {
    pub line: usize,
    pub column: Option<String>,
    pub value: Option<String>,
    pub message: String,
}

impl std::fmt::Display for CsvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.column, &self.value) {
            (Some(col), Some(val)) => {
                write!(f, "Line {}, column '{}' (value '{}'): {}", self.line, col, val, self.message)
            }
            (Some(col), None) => {
                write!(f, "Line {}, column '{}': {}", self.line, col, self.message)
            }
            (None, Some(val)) => {
                write!(f, "Line {} (value '{}'): {}", self.line, val, self.message)
            }
            _ => {
                write!(f, "Line {}: {}", self.line, self.message)
            }
        }
    }
}

impl std::error::Error for CsvError {}

impl CsvError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            value: None,
            message: message.into(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
        CsvError::new(line, err.to_string())
    }
}

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed records as JSON objects
    pub records: Vec<Value>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers
    pub headers: Vec<String>,
}

impl ParseResult {
    /// Whether a column is present in the header row.
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is always reported as `utf-8`; chardet only sees input that is
/// not, where it picks between the single-byte Western encodings. Anything
/// else it guesses falls back to `windows-1252`, the usual spreadsheet export.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        _ => "windows-1252".to_string(),
    }
}

/// Decode bytes to a string using the given encoding.
///
/// Labels unknown to `encoding_rs` fall back to lossy UTF-8. A UTF-8
/// byte-order mark is dropped.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" => String::from_utf8_lossy(bytes).into_owned(),
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        label => match encoding_rs::Encoding::for_label(label.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };

    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Human-readable delimiter name for logs.
pub fn format_delimiter(delimiter: char) -> String {
    match delimiter {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Comma wins ties and is returned when no candidate appears at all.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &CANDIDATE_DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV into JSON objects with explicit delimiter.
///
/// # Example
/// ```ignore
/// use hierarchy::csv_to_json;
///
/// let csv = "sector_1,company_name\nai,Acme";
/// let rows = csv_to_json(csv, ',').unwrap();
///
/// assert_eq!(rows[0]["sector_1"], "ai");
/// assert_eq!(rows[0]["company_name"], "Acme");
/// ```
pub fn csv_to_json(csv: &str, delimiter: char) -> Result<Vec<Value>, CsvError> {
    parse_csv(csv.as_bytes(), delimiter)
}

/// Parse CSV from a reader into JSON objects.
pub fn parse_csv<R: Read>(reader: R, delimiter: char) -> Result<Vec<Value>, CsvError> {
    read_records(reader, delimiter).map(|(_, records)| records)
}

/// Parse CSV file with auto-detection of encoding and delimiter.
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> Result<ParseResult, CsvError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| CsvError::new(0, format!("Cannot read file '{}': {}", path.display(), e)))?;

    parse_bytes_auto(&bytes)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> Result<ParseResult, CsvError> {
    parse_bytes(bytes, None)
}

/// Parse CSV bytes, auto-detecting the encoding and, unless given, the delimiter.
pub fn parse_bytes(bytes: &[u8], delimiter: Option<char>) -> Result<ParseResult, CsvError> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));

    parse_string_with_metadata(&content, delimiter, encoding)
}

/// Parse CSV string with explicit delimiter and return metadata.
pub fn parse_string_with_metadata(
    content: &str,
    delimiter: char,
    encoding: String,
) -> Result<ParseResult, CsvError> {
    let (headers, records) = read_records(content.as_bytes(), delimiter)?;

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
        headers,
    })
}

fn read_records<R: Read>(reader: R, delimiter: char) -> Result<(Vec<String>, Vec<Value>), CsvError> {
    if !delimiter.is_ascii() {
        return Err(CsvError::new(0, "Delimiter is not an ASCII character").with_value(delimiter.to_string()));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::new(1, "Empty CSV file: no headers found"));
    }

    // Rows are keyed by header name, so a repeated name would drop a column.
    for (i, header) in headers.iter().enumerate() {
        if !header.is_empty() && headers[..i].contains(header) {
            return Err(CsvError::new(1, "Duplicate header").with_column(header.clone()));
        }
    }

    let mut records = Vec::new();

    for result in rdr.records() {
        let record = result?;

        // Whitespace-only line
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }

        let mut obj = Map::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            obj.insert(header.clone(), json!(value));
        }

        records.push(Value::Object(obj));
    }

    Ok((headers, records))
}

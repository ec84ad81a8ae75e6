//! CSV Import service
//!
//! Imports shared expenses from CSV files with column mapping, date parsing,
//! duplicate detection, and batch import.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder, StringRecord};

use crate::error::{TripsplitError, TripsplitResult};
use crate::models::SharedExpense;
use crate::services::expense::{CreateExpenseInput, ExpenseService};
use crate::storage::Storage;

/// Column mapping configuration for CSV import
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub date_column: usize,
    pub description_column: Option<usize>,
    pub amount_column: usize,
    pub payer_column: usize,
    /// Participants column; ids inside it are split on `participant_separator`
    pub participants_column: Option<usize>,
    pub participant_separator: char,
    pub trip_column: Option<usize>,
    /// Date format string (e.g., "%Y-%m-%d", "%d/%m/%Y")
    pub date_format: String,
    pub has_header: bool,
    /// Field delimiter; the csv reader only takes single-byte delimiters
    pub delimiter: u8,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date_column: 0,
            description_column: Some(1),
            amount_column: 2,
            payer_column: 3,
            participants_column: Some(4),
            participant_separator: ';',
            trip_column: Some(5),
            date_format: "%Y-%m-%d".to_string(),
            has_header: true,
            delimiter: b',',
        }
    }
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set the field delimiter; only ASCII characters are accepted
    pub fn with_delimiter(mut self, delimiter: char) -> TripsplitResult<Self> {
        if !delimiter.is_ascii() {
            return Err(TripsplitError::Validation(format!(
                "CSV delimiter must be an ASCII character, got '{}'",
                delimiter
            )));
        }
        self.delimiter = delimiter as u8;
        Ok(self)
    }

    /// Detect column positions from a header row
    ///
    /// Columns that cannot be recognized keep their default position.
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut mapping = Self::new();

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();

            if h.contains("date") {
                mapping.date_column = idx;
            } else if h.contains("amount") || h.contains("total") {
                mapping.amount_column = idx;
            } else if h.contains("payer") || h.contains("paid") {
                mapping.payer_column = idx;
            } else if h.contains("participant") || h.contains("with") || h.contains("split") {
                mapping.participants_column = Some(idx);
            } else if h.contains("desc") || h.contains("memo") || h.contains("note") {
                mapping.description_column = Some(idx);
            } else if h.contains("trip") || h.contains("group") {
                mapping.trip_column = Some(idx);
            }
        }

        mapping
    }
}

/// A parsed row from the CSV before import
#[derive(Debug, Clone)]
pub struct ParsedExpense {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub payer: String,
    pub participants: Vec<String>,
    pub trip: Option<String>,
    /// Row number in the CSV (1-indexed, excluding header)
    pub row_number: usize,
}

impl ParsedExpense {
    /// Key used to detect rows that were already imported
    fn duplicate_key(&self) -> (NaiveDate, u64, String, String) {
        duplicate_key(self.date, self.amount, &self.payer, &self.description)
    }
}

fn duplicate_key(
    date: NaiveDate,
    amount: f64,
    payer: &str,
    description: &str,
) -> (NaiveDate, u64, String, String) {
    (
        date,
        amount.to_bits(),
        payer.trim().to_lowercase(),
        description.trim().to_lowercase(),
    )
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates_skipped: usize,
    pub errors: usize,
    /// Error messages by row number
    pub error_messages: BTreeMap<usize, String>,
    pub imported_ids: Vec<String>,
}

/// Service for CSV import of shared expenses
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse every record, keeping per-row failures
    pub fn parse_records<R: std::io::Read>(
        &self,
        reader: &mut Reader<R>,
        mapping: &ColumnMapping,
    ) -> Vec<Result<ParsedExpense, (usize, String)>> {
        reader
            .records()
            .enumerate()
            .map(|(idx, record)| {
                let row_number = idx + 1;
                let record = record.map_err(|e| (row_number, format!("Unreadable row: {}", e)))?;
                parse_record(&record, row_number, mapping).map_err(|e| (row_number, e))
            })
            .collect()
    }

    /// Import expenses from a CSV file
    ///
    /// Rows that fail to parse or validate are counted and reported; the rest
    /// are saved in one batch. `trip`, when given, tags every imported
    /// expense; otherwise the file's trip column is used.
    pub fn import_file(
        &self,
        path: &Path,
        mapping: Option<ColumnMapping>,
        trip: Option<&str>,
    ) -> TripsplitResult<ImportResult> {
        let mut reader = ReaderBuilder::new()
            .has_headers(mapping.as_ref().map(|m| m.has_header).unwrap_or(true))
            .delimiter(mapping.as_ref().map(|m| m.delimiter).unwrap_or(b','))
            .flexible(true)
            .from_path(path)
            .map_err(|e| TripsplitError::Import(format!("{}: {}", path.display(), e)))?;

        let mapping = match mapping {
            Some(mapping) => mapping,
            None => ColumnMapping::from_headers(reader.headers()?),
        };

        let rows = self.parse_records(&mut reader, &mapping);
        self.import_rows(rows, trip)
    }

    /// Validate parsed rows, drop duplicates and persist the rest
    pub fn import_rows(
        &self,
        rows: Vec<Result<ParsedExpense, (usize, String)>>,
        trip: Option<&str>,
    ) -> TripsplitResult<ImportResult> {
        let mut seen: HashSet<_> = self
            .storage
            .expenses
            .get_all()?
            .iter()
            .map(|e| duplicate_key(e.date, e.total_amount, &e.payer_id, &e.description))
            .collect();

        let mut result = ImportResult::default();
        let mut batch: Vec<SharedExpense> = Vec::new();

        for row in rows {
            let parsed = match row {
                Ok(parsed) => parsed,
                Err((row_number, message)) => {
                    result.errors += 1;
                    result.error_messages.insert(row_number, message);
                    continue;
                }
            };

            if !seen.insert(parsed.duplicate_key()) {
                result.duplicates_skipped += 1;
                continue;
            }

            let input = CreateExpenseInput {
                total_amount: parsed.amount,
                payer_id: parsed.payer,
                participant_ids: parsed.participants,
                description: Some(parsed.description),
                trip: trip.map(str::to_string).or(parsed.trip),
                date: Some(parsed.date),
            };

            match ExpenseService::build(input) {
                Ok(expense) => batch.push(expense),
                Err(e) => {
                    result.errors += 1;
                    result.error_messages.insert(parsed.row_number, e.to_string());
                }
            }
        }

        result.imported_ids = batch.iter().map(|e| e.id.to_string()).collect();
        result.imported = ExpenseService::new(self.storage).create_many(batch)?;

        Ok(result)
    }
}

/// Parse a single CSV record
fn parse_record(
    record: &StringRecord,
    row_number: usize,
    mapping: &ColumnMapping,
) -> Result<ParsedExpense, String> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .map(str::trim)
            .ok_or_else(|| format!("Missing {} column", name))
    };

    let date = parse_date(field(mapping.date_column, "date")?, &mapping.date_format)?;
    let amount = parse_amount(field(mapping.amount_column, "amount")?)?;
    let payer = field(mapping.payer_column, "payer")?.to_string();

    let description = mapping
        .description_column
        .and_then(|col| record.get(col))
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let participants = mapping
        .participants_column
        .and_then(|col| record.get(col))
        .map(|s| {
            s.split(mapping.participant_separator)
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let trip = mapping
        .trip_column
        .and_then(|col| record.get(col))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    Ok(ParsedExpense {
        date,
        description,
        amount,
        payer,
        participants,
        trip,
        row_number,
    })
}

/// Parse a date string, falling back to common formats
fn parse_date(s: &str, primary_format: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, primary_format) {
        return Ok(date);
    }

    let formats = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y"];
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| format!("Could not parse date: '{}'", s))
}

/// Parse an amount, tolerating currency symbols and thousands separators
fn parse_amount(s: &str) -> Result<f64, String> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();

    cleaned
        .parse::<f64>()
        .map_err(|_| format!("Could not parse amount: '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TripsplitPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TripsplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn write_csv(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("import.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.50").unwrap(), 1234.5);
        assert_eq!(parse_amount(" 90 ").unwrap(), 90.0);
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_parse_date_fallback() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(parse_date("2025-03-14", "%d/%m/%Y").unwrap(), expected);
        assert_eq!(parse_date("14.03.2025", "%Y-%m-%d").unwrap(), expected);
        assert!(parse_date("someday", "%Y-%m-%d").is_err());
    }

    #[test]
    fn test_mapping_from_headers() {
        let headers =
            StringRecord::from(vec!["Amount", "Paid by", "Date", "Participants", "Note", "Trip"]);
        let mapping = ColumnMapping::from_headers(&headers);

        assert_eq!(mapping.amount_column, 0);
        assert_eq!(mapping.payer_column, 1);
        assert_eq!(mapping.date_column, 2);
        assert_eq!(mapping.participants_column, Some(3));
        assert_eq!(mapping.description_column, Some(4));
        assert_eq!(mapping.trip_column, Some(5));
    }

    #[test]
    fn test_delimiter_must_be_ascii() {
        assert_eq!(ColumnMapping::new().with_delimiter('\t').unwrap().delimiter, b'\t');
        assert!(ColumnMapping::new()
            .with_delimiter('§')
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_import_without_header_and_custom_delimiter() {
        let (temp_dir, storage) = create_test_storage();
        let path = write_csv(&temp_dir, "2025-06-01|Dinner|90|alice|bob;carol\n");

        let mapping = ColumnMapping::new()
            .with_header(false)
            .with_delimiter('|')
            .unwrap();
        let result = ImportService::new(&storage)
            .import_file(&path, Some(mapping), None)
            .unwrap();

        assert_eq!(result.imported, 1);
        let expense = &storage.expenses.get_all().unwrap()[0];
        assert_eq!(expense.total_amount, 90.0);
        assert_eq!(expense.participant_ids, vec!["bob", "carol"]);
    }

    #[test]
    fn test_import_file() {
        let (temp_dir, storage) = create_test_storage();
        let path = write_csv(
            &temp_dir,
            "date,description,amount,payer,participants\n\
             2025-06-01,Dinner,90,alice,bob;carol\n\
             2025-06-02,Taxi,30,bob,alice\n",
        );

        let result = ImportService::new(&storage)
            .import_file(&path, None, Some("Lisbon"))
            .unwrap();

        assert_eq!(result.imported, 2);
        assert_eq!(result.errors, 0);

        let expenses = storage.expenses.get_by_trip("lisbon").unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].participant_ids, vec!["bob", "carol"]);
    }

    #[test]
    fn test_trip_column_used_unless_overridden() {
        let (temp_dir, storage) = create_test_storage();
        let path = write_csv(
            &temp_dir,
            "date,description,amount,payer,participants,trip\n\
             2025-06-01,Dinner,90,alice,bob,Porto\n\
             2025-06-02,Taxi,30,bob,alice,\n",
        );

        let result = ImportService::new(&storage)
            .import_file(&path, None, None)
            .unwrap();
        assert_eq!(result.imported, 2);
        assert_eq!(storage.expenses.get_by_trip("porto").unwrap().len(), 1);

        let (temp_dir, storage) = create_test_storage();
        let path = write_csv(
            &temp_dir,
            "date,description,amount,payer,participants,trip\n\
             2025-06-01,Dinner,90,alice,bob,Porto\n",
        );
        ImportService::new(&storage)
            .import_file(&path, None, Some("Lisbon"))
            .unwrap();
        assert_eq!(storage.expenses.get_by_trip("lisbon").unwrap().len(), 1);
    }

    #[test]
    fn test_exported_expenses_import_back() {
        let (temp_dir, storage) = create_test_storage();
        let original = SharedExpense::new(10.0 / 3.0, "alice", vec!["bob".into()])
            .with_description("Snacks")
            .with_trip("Porto")
            .with_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        storage.expenses.upsert(original.clone()).unwrap();

        let path = temp_dir.path().join("export.csv");
        let file = std::fs::File::create(&path).unwrap();
        crate::export::export_expenses_csv(&[original.clone()], file).unwrap();

        // Same storage: recognized as already imported
        let again = ImportService::new(&storage)
            .import_file(&path, None, None)
            .unwrap();
        assert_eq!(again.imported, 0);
        assert_eq!(again.duplicates_skipped, 1);

        // Fresh storage: amount and trip survive
        let (_other_dir, fresh) = create_test_storage();
        let result = ImportService::new(&fresh).import_file(&path, None, None).unwrap();
        assert_eq!(result.imported, 1);
        let imported = &fresh.expenses.get_by_trip("porto").unwrap()[0];
        assert_eq!(imported.total_amount, original.total_amount);
        assert_eq!(imported.description, "Snacks");
    }

    #[test]
    fn test_import_reports_bad_rows() {
        let (temp_dir, storage) = create_test_storage();
        let path = write_csv(
            &temp_dir,
            "date,description,amount,payer,participants\n\
             2025-06-01,Dinner,90,alice,bob\n\
             not-a-date,Lunch,20,bob,alice\n\
             2025-06-03,Refund,-5,bob,alice\n",
        );

        let result = ImportService::new(&storage)
            .import_file(&path, None, None)
            .unwrap();

        assert_eq!(result.imported, 1);
        assert_eq!(result.errors, 2);
        assert!(result.error_messages.contains_key(&2));
        assert!(result.error_messages.contains_key(&3));
    }

    #[test]
    fn test_import_skips_duplicates() {
        let (temp_dir, storage) = create_test_storage();
        let path = write_csv(
            &temp_dir,
            "date,description,amount,payer,participants\n\
             2025-06-01,Dinner,90,alice,bob\n",
        );

        let service = ImportService::new(&storage);
        assert_eq!(service.import_file(&path, None, None).unwrap().imported, 1);

        let again = service.import_file(&path, None, None).unwrap();
        assert_eq!(again.imported, 0);
        assert_eq!(again.duplicates_skipped, 1);
        assert_eq!(storage.expenses.count().unwrap(), 1);
    }
}

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int32Type, Int64Type,
};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{format_number, CoffeeDataset, Column, Transaction, NON_CARD};
use crate::error::LoadError;

/// Extensions offered by the open-file dialog.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "xlsx", "xlsm", "xls", "xlsb", "ods", "csv", "json", "parquet", "pq",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the transaction sheet from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xls` / `.ods` – first worksheet, header in the first row
/// * `.csv`     – header row
/// * `.json`    – `[{ "date": "...", "coffee_name": "...", ... }, ...]`
/// * `.parquet` – flat columns, one row per sale
///
/// Missing `card` values become [`NON_CARD`]; everything else is kept as is.
pub fn load_file(path: &Path) -> Result<CoffeeDataset, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_spreadsheet(path)?,
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    build_dataset(table)
}

// ---------------------------------------------------------------------------
// Format-neutral intermediate table
// ---------------------------------------------------------------------------

/// A single source cell before it is bound to a schema column.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

#[derive(Debug, Default)]
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// Only a truly empty string is a missing value; whitespace is kept.
fn text_cell(s: &str) -> Cell {
    if s.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn read_spreadsheet(path: &Path) -> Result<RawTable, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoWorksheet)??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(RawTable::default());
    };

    Ok(RawTable {
        headers: header_row.iter().map(|c| c.to_string()).collect(),
        rows: rows
            .map(|row| row.iter().map(spreadsheet_cell).collect())
            .collect(),
    })
}

fn spreadsheet_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) => text_cell(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => Cell::Date(dt.date()),
            None => Cell::Number(dt.as_f64()),
        },
        other => text_cell(&other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(text_cell).collect());
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn read_json(path: &Path) -> Result<RawTable, LoadError> {
    let root: JsonValue = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    let records = root.as_array().ok_or_else(|| {
        LoadError::Malformed("expected a top-level JSON array of records".to_string())
    })?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("record {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_cell).unwrap_or(Cell::Empty))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::Null => Cell::Empty,
        JsonValue::String(s) => text_cell(s),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => Cell::Number(f),
            None => Cell::Text(n.to_string()),
        },
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per schema field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<RawTable, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        let columns = batch.columns();
        for row in 0..batch.num_rows() {
            let cells = columns
                .iter()
                .map(|col| arrow_cell(col, row))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
    }

    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> Result<Cell, LoadError> {
    if col.is_null(row) {
        return Ok(Cell::Empty);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => text_cell(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => text_cell(col.as_string::<i64>().value(row)),
        DataType::Int32 => Cell::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Cell::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => Cell::Number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Cell::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Cell::Text(col.as_boolean().value(row).to_string()),
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .value_as_date(row)
            .map_or(Cell::Empty, Cell::Date),
        DataType::Date64 => col
            .as_primitive::<Date64Type>()
            .value_as_date(row)
            .map_or(Cell::Empty, Cell::Date),
        // Timestamps, dictionaries and the like: fall back to Arrow's own rendering.
        _ => {
            let formatter = ArrayFormatter::try_new(col.as_ref(), &FormatOptions::default())?;
            text_cell(&formatter.value(row).to_string())
        }
    };
    Ok(cell)
}

// ---------------------------------------------------------------------------
// Binding cells to the schema
// ---------------------------------------------------------------------------

/// Map every schema column to its position in the source header.
fn resolve_columns(headers: &[String]) -> Result<HashMap<Column, usize>, LoadError> {
    let mut positions = HashMap::new();
    for (i, header) in headers.iter().enumerate() {
        if let Some(column) = Column::from_name(header) {
            positions.entry(column).or_insert(i);
        }
    }

    for column in Column::ALL {
        if !positions.contains_key(&column) {
            return Err(LoadError::MissingColumn(column.name()));
        }
    }
    Ok(positions)
}

fn invalid(row: usize, column: Column, cell: &Cell) -> LoadError {
    let value = match cell {
        Cell::Empty => String::new(),
        Cell::Text(s) => s.clone(),
        Cell::Number(n) => n.to_string(),
        Cell::Date(d) => d.to_string(),
    };
    LoadError::InvalidValue {
        row,
        column: column.name(),
        value,
    }
}

fn category(cell: &Cell, row: usize, column: Column) -> Result<String, LoadError> {
    match cell {
        Cell::Text(s) => Ok(s.clone()),
        Cell::Number(n) => Ok(format_number(*n)),
        Cell::Date(d) => Ok(d.format("%Y-%m-%d").to_string()),
        Cell::Empty => Err(invalid(row, column, cell)),
    }
}

fn card(cell: &Cell, row: usize) -> Result<String, LoadError> {
    match cell {
        Cell::Empty => Ok(NON_CARD.to_string()),
        other => category(other, row, Column::Card),
    }
}

fn money(cell: &Cell, row: usize) -> Result<f64, LoadError> {
    let value = match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(invalid(row, Column::Money, cell)),
    }
}

/// Accepts native dates and `YYYY-MM-DD`, ignoring any trailing time part.
fn date(cell: &Cell, row: usize) -> Result<NaiveDate, LoadError> {
    let parsed = match cell {
        Cell::Date(d) => Some(*d),
        Cell::Text(s) => s
            .trim()
            .split(['T', ' '])
            .next()
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(row, Column::Date, cell))
}

fn build_dataset(table: RawTable) -> Result<CoffeeDataset, LoadError> {
    let positions = resolve_columns(&table.headers)?;
    let empty = Cell::Empty;

    let mut transactions = Vec::with_capacity(table.rows.len());
    for (i, cells) in table.rows.iter().enumerate() {
        let row = i + 1;
        let cell = |column: Column| cells.get(positions[&column]).unwrap_or(&empty);

        transactions.push(Transaction {
            date: date(cell(Column::Date), row)?,
            time_of_day: category(cell(Column::TimeOfDay), row, Column::TimeOfDay)?,
            month_name: category(cell(Column::MonthName), row, Column::MonthName)?,
            weekday: category(cell(Column::Weekday), row, Column::Weekday)?,
            cash_type: category(cell(Column::CashType), row, Column::CashType)?,
            card: card(cell(Column::Card), row)?,
            coffee_name: category(cell(Column::CoffeeName), row, Column::CoffeeName)?,
            money: money(cell(Column::Money), row)?,
        });
    }

    Ok(CoffeeDataset::new(transactions))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Date32Array, Float64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use parquet::arrow::ArrowWriter;
    use rust_xlsxwriter::{Format, Workbook};
    use tempfile::TempDir;

    use super::*;

    const HEADER: &str = "date,time_of_day,month_name,weekday,cash_type,card,coffee_name,money";

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_csv_null_card_becomes_sentinel() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "sales.csv",
            &format!(
                "{HEADER}\n\
                 2024-03-01,Morning,Mar,Fri,card,ANON-0000-0000-0001,Latte,38.7\n\
                 2024-03-01,Night,Mar,Fri,cash,,Espresso,40\n"
            ),
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        let rows = ds.transactions();
        assert_eq!(rows[0].card, "ANON-0000-0000-0001");
        assert_eq!(rows[1].card, NON_CARD);
        assert_eq!(rows[1].money, 40.0);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_header_names_are_case_insensitive_and_unordered() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "sales.csv",
            "money,coffee_name,Time_of_Day,Weekday,Month_name,cash_type,card,Date,hour_of_day\n\
             38.7,Latte,Morning,Fri,Mar,card,ANON-1,2024-03-01 10:15:50.520,10\n",
        );

        let ds = load_file(&path).unwrap();
        let tx = &ds.transactions()[0];
        assert_eq!(tx.time_of_day, "Morning");
        assert_eq!(tx.month_name, "Mar");
        assert_eq!(tx.coffee_name, "Latte");
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_missing_column_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "sales.csv",
            "date,time_of_day,month_name,weekday,cash_type,card,coffee_name\n",
        );

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("money")));
    }

    #[test]
    fn test_invalid_money_is_reported_with_row() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "sales.csv",
            &format!("{HEADER}\n2024-03-01,Morning,Mar,Fri,card,A,Latte,free\n"),
        );

        match load_file(&path).unwrap_err() {
            LoadError::InvalidValue { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "money");
                assert_eq!(value, "free");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_category_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "sales.csv",
            &format!("{HEADER}\n2024-03-01,Morning,Mar,Fri,card,A,,3.0\n"),
        );
        assert!(matches!(
            load_file(&path).unwrap_err(),
            LoadError::InvalidValue { column: "coffee_name", .. }
        ));
    }

    #[test]
    fn test_missing_file_and_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("Coffee_sales.xlsx");
        assert!(matches!(load_file(&missing).unwrap_err(), LoadError::NotFound(_)));

        let txt = write(&dir, "sales.txt", HEADER);
        assert!(matches!(
            load_file(&txt).unwrap_err(),
            LoadError::UnsupportedFormat(ref ext) if ext == "txt"
        ));
    }

    #[test]
    fn test_unreadable_spreadsheet_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "Coffee_sales.xlsx", "not a zip archive");
        assert!(matches!(load_file(&path).unwrap_err(), LoadError::Spreadsheet(_)));
    }

    #[test]
    fn test_json_records() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "sales.json",
            r#"[
                {"date": "2024-03-01", "time_of_day": "Morning", "month_name": "Mar",
                 "weekday": "Fri", "cash_type": "cash", "card": null,
                 "coffee_name": "Latte", "money": 3.5},
                {"date": "2024-03-02", "time_of_day": "Night", "month_name": "Mar",
                 "weekday": 6, "cash_type": "card", "card": "ANON-2",
                 "coffee_name": "Espresso", "money": 2}
            ]"#,
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.transactions()[0].card, NON_CARD);
        assert_eq!(ds.transactions()[1].weekday, "6");
        assert_eq!(ds.total_revenue(), 5.5);
    }

    #[test]
    fn test_json_must_be_array() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "sales.json", r#"{"date": "2024-03-01"}"#);
        assert!(matches!(load_file(&path).unwrap_err(), LoadError::Malformed(_)));
    }

    #[test]
    fn test_parquet_with_native_dates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sales.parquet");

        let text = |values: Vec<Option<&str>>| Arc::new(StringArray::from(values)) as ArrayRef;
        let schema = Arc::new(Schema::new(vec![
            Field::new("date", DataType::Date32, false),
            Field::new("Time_of_Day", DataType::Utf8, false),
            Field::new("Month_name", DataType::Utf8, false),
            Field::new("Weekday", DataType::Utf8, false),
            Field::new("cash_type", DataType::Utf8, false),
            Field::new("card", DataType::Utf8, true),
            Field::new("coffee_name", DataType::Utf8, false),
            Field::new("money", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Date32Array::from(vec![19783, 19784])),
                text(vec![Some("Morning"), Some("Afternoon")]),
                text(vec![Some("Mar"), Some("Mar")]),
                text(vec![Some("Fri"), Some("Sat")]),
                text(vec![Some("card"), Some("cash")]),
                text(vec![Some("ANON-1"), None]),
                text(vec![Some("Latte"), Some("Cocoa")]),
                Arc::new(Float64Array::from(vec![38.7, 33.8])),
            ],
        )
        .unwrap();

        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        let rows = ds.transactions();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(rows[1].time_of_day, "Afternoon");
        assert_eq!(rows[1].card, NON_CARD);
        assert_eq!(rows[1].money, 33.8);
    }

    #[test]
    fn test_spreadsheet_cells() {
        assert_eq!(spreadsheet_cell(&Data::Empty), Cell::Empty);
        assert_eq!(spreadsheet_cell(&Data::String(String::new())), Cell::Empty);
        assert_eq!(
            spreadsheet_cell(&Data::String("  ".into())),
            Cell::Text("  ".into())
        );
        assert_eq!(spreadsheet_cell(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(
            spreadsheet_cell(&Data::DateTimeIso("2024-03-01T10:15:50".into())),
            Cell::Text("2024-03-01T10:15:50".into())
        );
    }

    #[test]
    fn test_excel_serial_dates() {
        let serial = ExcelDateTime::new(45352.43, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            spreadsheet_cell(&Data::DateTime(serial)),
            Cell::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );

        // Out of chrono's range: keep the raw serial.
        let overflow = ExcelDateTime::new(1e15, ExcelDateTimeType::DateTime, false);
        assert_eq!(spreadsheet_cell(&Data::DateTime(overflow)), Cell::Number(1e15));
    }

    #[test]
    fn test_whitespace_text_is_not_missing() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "sales.csv",
            &format!("{HEADER}\n2024-03-01,Morning,Mar,Fri,card,  ,Latte,38.7\n"),
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.transactions()[0].card, "  ");
    }

    #[test]
    fn test_xlsx_workbook_end_to_end() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Coffee_sales.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm");
        let headers = [
            "hour_of_day", "cash_type", "card", "money", "coffee_name",
            "Time_of_Day", "Weekday", "Month_name", "Date",
        ];
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        let rows = [
            (10.0, "card", Some("ANON-0000-0000-0001"), 38.7, "Latte", "Morning", 45352.43),
            (21.0, "cash", None, 40.0, "Espresso", "Night", 45353.9),
        ];
        for (i, (hour, cash, card, money, coffee, time, serial)) in rows.into_iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_number(row, 0, hour).unwrap();
            sheet.write_string(row, 1, cash).unwrap();
            if let Some(card) = card {
                sheet.write_string(row, 2, card).unwrap();
            }
            sheet.write_number(row, 3, money).unwrap();
            sheet.write_string(row, 4, coffee).unwrap();
            sheet.write_string(row, 5, time).unwrap();
            sheet.write_string(row, 6, "Fri").unwrap();
            sheet.write_string(row, 7, "Mar").unwrap();
            sheet.write_number_with_format(row, 8, serial, &date_format).unwrap();
        }
        workbook.save(&path).unwrap();

        let ds = load_file(&path).unwrap();
        let rows = ds.transactions();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(rows[0].card, "ANON-0000-0000-0001");
        assert_eq!(rows[1].card, NON_CARD);
        assert_eq!(rows[1].value(Column::Money), "40");
        assert_eq!(rows[0].time_of_day, "Morning");
    }
}

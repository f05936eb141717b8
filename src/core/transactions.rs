use crate::domain::model::{Column, Transaction, TransactionBatch};
use crate::utils::error::{CategorizeError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const CURRENCY_NOISE: [char; 4] = ['$', '€', '£', ','];

// Two-digit years are tried before four-digit ones: chrono reads "24" as year 24.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d", "%m-%d-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Turns a possibly currency-formatted cell into a number.
///
/// Never fails: anything that still is not a number after stripping currency
/// symbols and thousands separators becomes `0.0` and is logged.
pub fn clean_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return value;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !CURRENCY_NOISE.contains(c) && !c.is_whitespace())
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("Could not convert amount '{}' to a number, using 0.0", raw);
            0.0
        }
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Plain decimal text, keeping one fractional digit on whole numbers.
pub fn format_amount(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<(Vec<Column>, Vec<Option<usize>>)> {
    let mut columns = Vec::with_capacity(headers.len());
    // 每個來源欄位對應到 columns 的位置；None 表示丟棄
    let mut slots = Vec::with_capacity(headers.len());
    let mut extra_count = 0;

    for header in headers.iter() {
        let column = match header.trim() {
            "Date" => Column::Date,
            "Description" => Column::Description,
            "Amount" => Column::Amount,
            "Balance" => Column::Balance,
            "Subcategory" => {
                tracing::debug!("Existing Subcategory column will be replaced");
                slots.push(None);
                continue;
            }
            other => {
                extra_count += 1;
                Column::Other {
                    name: other.to_string(),
                    index: extra_count - 1,
                }
            }
        };
        slots.push(Some(columns.len()));
        columns.push(column);
    }

    for required in [Column::Date, Column::Description, Column::Amount] {
        if !columns.contains(&required) {
            return Err(CategorizeError::MissingColumn {
                column: required.header().to_string(),
            });
        }
    }

    Ok((columns, slots))
}

/// Reads a CSV export with a header row into a batch, normalizing dates and amounts.
pub fn read_transactions(data: &[u8]) -> Result<TransactionBatch> {
    // Short rows are allowed; missing trailing cells read as empty.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let (columns, slots) = resolve_columns(&headers)?;

    let mut transactions = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record?;
        let row = row_index + 1;

        let mut date = None;
        let mut description = String::new();
        let mut amount = 0.0;
        let mut balance = None;
        let mut extra = Vec::new();

        for (field, slot) in record.iter().zip(&slots) {
            let Some(position) = slot else { continue };
            match &columns[*position] {
                Column::Date => {
                    date = Some(parse_date(field).ok_or_else(|| CategorizeError::InvalidDate {
                        row,
                        value: field.to_string(),
                    })?);
                }
                Column::Description => description = field.to_string(),
                Column::Amount => {
                    if field.trim().is_empty() {
                        tracing::warn!("Row {} has an empty amount, using 0.0", row);
                    } else {
                        amount = clean_amount(field);
                    }
                }
                Column::Balance => {
                    if !field.trim().is_empty() {
                        balance = Some(clean_amount(field));
                    }
                }
                Column::Other { .. } => extra.push(field.to_string()),
            }
        }

        let date = date.ok_or_else(|| CategorizeError::InvalidDate {
            row,
            value: String::new(),
        })?;

        transactions.push(Transaction {
            date,
            description,
            amount,
            balance,
            extra,
            subcategory: None,
        });
    }

    Ok(TransactionBatch {
        columns,
        transactions,
    })
}

/// Serializes the batch with its source columns plus a trailing `Subcategory` column.
pub fn write_transactions(batch: &TransactionBatch) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = batch.headers();
    header.push("Subcategory");
    writer.write_record(&header)?;

    for txn in &batch.transactions {
        let mut row: Vec<String> = batch
            .columns
            .iter()
            .map(|column| match column {
                Column::Date => txn.date.format("%Y-%m-%d").to_string(),
                Column::Description => txn.description.clone(),
                Column::Amount => format_amount(txn.amount),
                Column::Balance => txn.balance.map(format_amount).unwrap_or_default(),
                Column::Other { index, .. } => txn.extra.get(*index).cloned().unwrap_or_default(),
            })
            .collect();
        row.push(
            txn.subcategory
                .as_ref()
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
        );
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| CategorizeError::ProcessingError {
            message: format!("Failed to flush CSV output: {}", e),
        })
}

/// `categorized_transactions_<model>.csv`, where `<model>` is the identifier up
/// to its first `:` in lower case.
pub fn output_filename(model: &str) -> String {
    let suffix = model.split(':').next().unwrap_or(model).to_lowercase();
    format!("categorized_transactions_{}.csv", suffix)
}

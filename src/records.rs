use std::io::Read;

use serde_json::{Map, Number, Value};

use crate::config::Coercion;
use crate::error::ValidateError;

/// One data row keyed by the header's column names, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based data row number; the header is not counted.
    pub line: usize,
    pub fields: Vec<(String, String)>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Convert into the JSON object handed to the validator.
    ///
    /// A repeated column name keeps its last value.
    pub fn to_instance(&self, coercion: Coercion) -> Value {
        let mut object = Map::with_capacity(self.fields.len());
        for (name, raw) in &self.fields {
            object.insert(name.clone(), coerce(raw, coercion));
        }
        Value::Object(object)
    }
}

fn coerce(raw: &str, coercion: Coercion) -> Value {
    if coercion == Coercion::Numbers {
        let text = raw.trim();
        if let Ok(int) = text.parse::<i64>() {
            return Value::Number(int.into());
        }
        if let Some(number) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(number);
        }
    }
    Value::String(raw.to_string())
}

/// Lazy, single-pass reader of [`Record`]s from delimited text.
pub struct RecordReader<R: Read> {
    input: String,
    reader: csv::Reader<R>,
    header: Vec<String>,
    row: csv::StringRecord,
    line: usize,
}

impl<R: Read> RecordReader<R> {
    /// Read the header row and prepare to stream data rows.
    ///
    /// `input` names the source in error messages.
    pub fn new(input: impl Into<String>, source: R, delimiter: u8) -> Result<Self, ValidateError> {
        let input = input.into();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let header = reader
            .headers()
            .map_err(|e| ValidateError::input_unreadable(&input, format!("header: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            input,
            reader,
            header,
            row: csv::StringRecord::new(),
            line: 0,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record, ValidateError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.row) {
            Ok(false) => None,
            Ok(true) => {
                self.line += 1;

                if self.row.len() > self.header.len() {
                    tracing::debug!(
                        line = self.line,
                        columns = self.header.len(),
                        fields = self.row.len(),
                        "surplus fields dropped"
                    );
                }

                let fields = self
                    .header
                    .iter()
                    .zip(self.row.iter())
                    .map(|(name, value)| (name.clone(), value.to_string()))
                    .collect();

                Some(Ok(Record {
                    line: self.line,
                    fields,
                }))
            }
            Err(e) => Some(Err(ValidateError::input_unreadable(
                &self.input,
                format!("data row {}: {e}", self.line + 1),
            ))),
        }
    }
}

/// Stream records from `source`, reading the header first.
pub fn extract_records<R: Read>(
    input: impl Into<String>,
    source: R,
    delimiter: u8,
) -> Result<RecordReader<R>, ValidateError> {
    RecordReader::new(input, source, delimiter)
}

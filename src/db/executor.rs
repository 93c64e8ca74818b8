use duckdb::Connection;
use duckdb::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::StoreError;

/// A single result cell, reduced to a display-ready scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CellValue::Null,
            Value::Boolean(b) => CellValue::Boolean(b),
            Value::TinyInt(i) => CellValue::Integer(i as i64),
            Value::SmallInt(i) => CellValue::Integer(i as i64),
            Value::Int(i) => CellValue::Integer(i as i64),
            Value::BigInt(i) => CellValue::Integer(i),
            Value::HugeInt(i) => i64::try_from(i)
                .map(CellValue::Integer)
                .unwrap_or_else(|_| CellValue::Text(i.to_string())),
            Value::UTinyInt(i) => CellValue::Integer(i as i64),
            Value::USmallInt(i) => CellValue::Integer(i as i64),
            Value::UInt(i) => CellValue::Integer(i as i64),
            Value::UBigInt(i) => i64::try_from(i)
                .map(CellValue::Integer)
                .unwrap_or_else(|_| CellValue::Text(i.to_string())),
            Value::Float(x) => CellValue::Real(x as f64),
            Value::Double(x) => CellValue::Real(x),
            Value::Decimal(d) => CellValue::Text(d.to_string()),
            Value::Text(s) => CellValue::Text(s),
            Value::Enum(s) => CellValue::Text(s),
            // Temporal, blob and nested values only appear when the model
            // writes expressions over them; a debug rendering is enough.
            other => CellValue::Text(format!("{:?}", other)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("NULL"),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Real(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered rows produced by a statement. Empty means the statement ran but
/// returned no data, which is not an error.
pub type RowSet = Vec<Vec<CellValue>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

/// A SQL statement that passed the leading-keyword check. The executor only
/// accepts this type, so unchecked text never reaches the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    text: String,
    kind: StatementKind,
}

impl SqlStatement {
    /// Classifies trimmed text by its leading keyword, case-insensitively.
    /// Returns `None` unless it starts with SELECT, INSERT, UPDATE or DELETE.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let kind = Self::classify(trimmed)?;
        Some(Self {
            text: trimmed.to_string(),
            kind,
        })
    }

    fn classify(trimmed: &str) -> Option<StatementKind> {
        const PREFIXES: [(&str, StatementKind); 4] = [
            ("select", StatementKind::Select),
            ("insert", StatementKind::Insert),
            ("update", StatementKind::Update),
            ("delete", StatementKind::Delete),
        ];

        PREFIXES.into_iter().find_map(|(prefix, kind)| {
            trimmed
                .get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
                .then_some(kind)
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn is_mutation(&self) -> bool {
        self.kind != StatementKind::Select
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Runs a checked statement on the given connection.
///
/// SELECT statements are queried and their rows collected; mutating
/// statements run in autocommit mode and yield an empty row set, matching
/// the "statement produced no data" contract.
pub fn run_statement(conn: &Connection, statement: &SqlStatement) -> Result<RowSet, StoreError> {
    match statement.kind() {
        StatementKind::Select => {
            let mut stmt = conn.prepare(statement.text())?;
            let mut rows = stmt.query([])?;
            let mut out: RowSet = Vec::new();

            while let Some(row) = rows.next()? {
                let column_count = row.as_ref().column_count();
                let mut cells = Vec::with_capacity(column_count);
                for idx in 0..column_count {
                    let value: Value = row.get(idx)?;
                    cells.push(CellValue::from(value));
                }
                out.push(cells);
            }

            Ok(out)
        }
        _ => {
            let affected = conn.execute(statement.text(), [])?;
            tracing::debug!("Statement affected {} row(s)", affected);
            Ok(Vec::new())
        }
    }
}

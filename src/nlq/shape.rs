use serde::Serialize;
use std::error::Error;
use std::fmt;

use crate::db::executor::{CellValue, RowSet};

/// A query result reduced to a display-ready form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Presentable {
    /// The statement ran but produced no rows.
    NoData,
    /// A single-row, single-column result, e.g. a COUNT or AVG.
    Scalar { value: CellValue },
    Table {
        headers: Vec<String>,
        rows: RowSet,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum ShapeError {
    ColumnMismatch { expected: usize, actual: usize },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::ColumnMismatch { expected, actual } => write!(
                f,
                "result width {} does not match the {} known columns",
                actual, expected
            ),
        }
    }
}

impl Error for ShapeError {}

/// Shapes raw rows for presentation. Rules apply in order: no rows, then a
/// lone scalar, then known headers for a `SELECT * FROM EMPLOYEE` statement,
/// then synthesized positional headers.
pub fn shape(
    rows: RowSet,
    statement: &str,
    known_columns: &[&str],
) -> Result<Presentable, ShapeError> {
    if rows.is_empty() {
        return Ok(Presentable::NoData);
    }

    if let [row] = rows.as_slice() {
        if let [value] = row.as_slice() {
            return Ok(Presentable::Scalar {
                value: value.clone(),
            });
        }
    }

    let width = rows[0].len();
    let normalized = statement.trim().to_lowercase();
    if normalized.starts_with("select * from employee") {
        if width != known_columns.len() {
            return Err(ShapeError::ColumnMismatch {
                expected: known_columns.len(),
                actual: width,
            });
        }
        let headers = known_columns.iter().map(|c| c.to_string()).collect();
        return Ok(Presentable::Table { headers, rows });
    }

    let headers = (1..=width).map(|i| format!("Column_{}", i)).collect();
    Ok(Presentable::Table { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::employee::EMPLOYEE_COLUMNS;

    fn employee_row(id: i64, name: &str) -> Vec<CellValue> {
        vec![
            CellValue::Integer(id),
            CellValue::Text(name.to_string()),
            CellValue::Real(52_000.0),
            CellValue::Integer(29),
            CellValue::Text("Male".to_string()),
            CellValue::Text("Engineer".to_string()),
            CellValue::Integer(40),
            CellValue::Real(80.0),
            CellValue::Real(500.0),
        ]
    }

    #[test]
    fn no_rows_shape_to_no_data() {
        let shaped = shape(Vec::new(), "DELETE FROM EMPLOYEE WHERE ID = 7", &EMPLOYEE_COLUMNS);
        assert_eq!(shaped, Ok(Presentable::NoData));
    }

    #[test]
    fn a_lone_cell_shapes_to_a_scalar() {
        let rows = vec![vec![CellValue::Integer(42)]];
        let shaped = shape(rows, "SELECT COUNT(*) FROM EMPLOYEE", &EMPLOYEE_COLUMNS).unwrap();
        assert_eq!(
            shaped,
            Presentable::Scalar {
                value: CellValue::Integer(42)
            }
        );
    }

    #[test]
    fn star_select_gets_the_known_headers() {
        let rows = vec![employee_row(1, "Amir"), employee_row(2, "Bea")];
        let shaped = shape(rows.clone(), "SELECT * FROM EMPLOYEE", &EMPLOYEE_COLUMNS).unwrap();

        match shaped {
            Presentable::Table { headers, rows: shaped_rows } => {
                assert_eq!(headers, EMPLOYEE_COLUMNS.map(String::from).to_vec());
                assert_eq!(shaped_rows, rows);
            }
            other => panic!("expected a table, got {:?}", other),
        }
    }

    #[test]
    fn star_select_matching_is_case_insensitive_and_trimmed() {
        let rows = vec![employee_row(1, "Amir"), employee_row(2, "Bea")];
        let shaped = shape(
            rows,
            "  select * FROM Employee WHERE AGE > 30;  ",
            &EMPLOYEE_COLUMNS,
        )
        .unwrap();
        assert!(matches!(shaped, Presentable::Table { headers, .. } if headers[0] == "ID"));
    }

    #[test]
    fn width_mismatch_against_known_headers_is_an_error() {
        let rows = vec![
            vec![CellValue::Integer(1), CellValue::Text("Amir".to_string())],
            vec![CellValue::Integer(2), CellValue::Text("Bea".to_string())],
        ];
        let err = shape(rows, "SELECT * FROM EMPLOYEE", &EMPLOYEE_COLUMNS).unwrap_err();
        assert_eq!(err, ShapeError::ColumnMismatch { expected: 9, actual: 2 });
    }

    #[test]
    fn other_statements_get_positional_headers() {
        let rows = vec![
            vec![CellValue::Integer(5), CellValue::Text("HR".to_string())],
            vec![CellValue::Integer(3), CellValue::Text("Sales".to_string())],
        ];
        let shaped = shape(
            rows,
            "SELECT COUNT(*), DESIGNATION FROM EMPLOYEE GROUP BY DESIGNATION",
            &EMPLOYEE_COLUMNS,
        )
        .unwrap();

        match shaped {
            Presentable::Table { headers, .. } => {
                assert_eq!(headers, vec!["Column_1".to_string(), "Column_2".to_string()]);
            }
            other => panic!("expected a table, got {:?}", other),
        }
    }

    #[test]
    fn serializes_with_a_kind_tag() {
        let shaped = Presentable::Scalar {
            value: CellValue::Integer(7),
        };
        let json = serde_json::to_value(&shaped).unwrap();
        assert_eq!(json["kind"], "scalar");
        assert_eq!(json["value"], 7);
    }
}

use duckdb::{Connection, params};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use super::StoreError;
use super::employee::{Employee, Gender, NewEmployee};
use super::executor::{self, RowSet, SqlStatement};

const SCHEMA_SQL: &str = "
    CREATE SEQUENCE IF NOT EXISTS employee_id_seq START 1;
    CREATE TABLE IF NOT EXISTS EMPLOYEE (
        ID BIGINT PRIMARY KEY DEFAULT nextval('employee_id_seq'),
        NAME VARCHAR NOT NULL,
        SALARY DOUBLE NOT NULL,
        AGE BIGINT NOT NULL,
        GENDER VARCHAR NOT NULL,
        DESIGNATION VARCHAR NOT NULL,
        WORKING_HOURS BIGINT NOT NULL,
        MONTHLY_LUNCH_BILL DOUBLE NOT NULL,
        BONUS DOUBLE NOT NULL
    );
";

const EMPLOYEE_FIELDS: &str =
    "ID, NAME, SALARY, AGE, GENDER, DESIGNATION, WORKING_HOURS, MONTHLY_LUNCH_BILL, BONUS";

/// Result of a delete request. Zero matches is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted { count: usize },
    NotFound,
}

/// Handle to the employee database. DuckDB takes an exclusive lock on the
/// file, so one connection is opened up front and shared behind a mutex
/// instead of reopening per operation.
#[derive(Clone)]
pub struct EmployeeStore {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeStore {
    /// Opens the store and creates the schema if it is missing.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let db_path = db_path.into();
        let conn =
            Connection::open(&db_path).map_err(|e| StoreError::Connection(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)?;
        info!("Employee schema ready at {}", db_path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn connect(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Connection("connection mutex poisoned".to_string()))
    }

    /// Inserts a record and returns it with the database-assigned id.
    pub fn insert(&self, employee: &NewEmployee) -> Result<Employee, StoreError> {
        let conn = self.connect()?;
        let id: i64 = conn.query_row(
            "INSERT INTO EMPLOYEE (NAME, SALARY, AGE, GENDER, DESIGNATION, WORKING_HOURS, MONTHLY_LUNCH_BILL, BONUS)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING ID",
            params![
                employee.name,
                employee.salary,
                employee.age,
                employee.gender.as_str(),
                employee.designation,
                employee.working_hours,
                employee.monthly_lunch_bill,
                employee.bonus,
            ],
            |row| row.get(0),
        )?;

        Ok(Employee {
            id,
            name: employee.name.clone(),
            salary: employee.salary,
            age: employee.age,
            gender: employee.gender,
            designation: employee.designation.clone(),
            working_hours: employee.working_hours,
            monthly_lunch_bill: employee.monthly_lunch_bill,
            bonus: employee.bonus,
        })
    }

    /// The full roster, ordered by id.
    pub fn list(&self) -> Result<Vec<Employee>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM EMPLOYEE ORDER BY ID",
            EMPLOYEE_FIELDS
        ))?;

        let rows = stmt.query_map([], Self::row_to_employee)?;
        let mut employees = Vec::new();
        for row in rows {
            employees.push(row?);
        }
        Ok(employees)
    }

    pub fn get(&self, id: i64) -> Result<Option<Employee>, StoreError> {
        let conn = self.connect()?;
        let result = conn.query_row(
            &format!("SELECT {} FROM EMPLOYEE WHERE ID = ?", EMPLOYEE_FIELDS),
            params![id],
            Self::row_to_employee,
        );

        match result {
            Ok(employee) => Ok(Some(employee)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All records matching the exact name, ordered by id.
    pub fn find_by_name(&self, name: &str) -> Result<Vec<Employee>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM EMPLOYEE WHERE NAME = ? ORDER BY ID",
            EMPLOYEE_FIELDS
        ))?;

        let rows = stmt.query_map(params![name], Self::row_to_employee)?;
        let mut employees = Vec::new();
        for row in rows {
            employees.push(row?);
        }
        Ok(employees)
    }

    pub fn delete_by_id(&self, id: i64) -> Result<DeleteOutcome, StoreError> {
        let conn = self.connect()?;
        let affected = conn.execute("DELETE FROM EMPLOYEE WHERE ID = ?", params![id])?;
        Ok(Self::delete_outcome(affected))
    }

    pub fn delete_by_name(&self, name: &str) -> Result<DeleteOutcome, StoreError> {
        let conn = self.connect()?;
        let affected = conn.execute("DELETE FROM EMPLOYEE WHERE NAME = ?", params![name])?;
        Ok(Self::delete_outcome(affected))
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        let conn = self.connect()?;
        let count = conn.query_row("SELECT COUNT(*) FROM EMPLOYEE", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Runs an already-checked statement against this store.
    pub fn execute_raw(&self, statement: &SqlStatement) -> Result<RowSet, StoreError> {
        let conn = self.connect()?;
        executor::run_statement(&conn, statement)
    }

    fn delete_outcome(affected: usize) -> DeleteOutcome {
        if affected == 0 {
            DeleteOutcome::NotFound
        } else {
            DeleteOutcome::Deleted { count: affected }
        }
    }

    fn row_to_employee(row: &duckdb::Row<'_>) -> Result<Employee, duckdb::Error> {
        let gender: String = row.get(4)?;
        Ok(Employee {
            id: row.get(0)?,
            name: row.get(1)?,
            salary: row.get(2)?,
            age: row.get(3)?,
            gender: Gender::from_db_text(&gender),
            designation: row.get(5)?,
            working_hours: row.get(6)?,
            monthly_lunch_bill: row.get(7)?,
            bonus: row.get(8)?,
        })
    }
}

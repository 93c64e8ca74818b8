use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Column order of the EMPLOYEE table, used when shaping `SELECT *` results.
pub const EMPLOYEE_COLUMNS: [&str; 9] = [
    "ID",
    "NAME",
    "SALARY",
    "AGE",
    "GENDER",
    "DESIGNATION",
    "WORKING_HOURS",
    "MONTHLY_LUNCH_BILL",
    "BONUS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    /// Reads a stored gender value. Model-written inserts are not forced
    /// through the enum, so anything unrecognized maps to `Other`.
    pub fn from_db_text(text: &str) -> Self {
        if text.eq_ignore_ascii_case("male") {
            Gender::Male
        } else if text.eq_ignore_ascii_case("female") {
            Gender::Female
        } else {
            Gender::Other
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored employee record. The id is assigned by the database and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub salary: f64,
    pub age: i64,
    pub gender: Gender,
    pub designation: String,
    pub working_hours: i64,
    pub monthly_lunch_bill: f64,
    pub bonus: f64,
}

/// Input for creating an employee, before the database assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub salary: f64,
    pub age: i64,
    pub gender: Gender,
    pub designation: String,
    pub working_hours: i64,
    pub monthly_lunch_bill: f64,
    pub bonus: f64,
}

impl NewEmployee {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if self.designation.trim().is_empty() {
            return Err(ValidationError::EmptyField("designation"));
        }
        if self.salary < 0.0 {
            return Err(ValidationError::NegativeValue("salary"));
        }
        if self.age < 18 {
            return Err(ValidationError::UnderMinimumAge(self.age));
        }
        if self.working_hours < 0 {
            return Err(ValidationError::NegativeValue("working_hours"));
        }
        if self.monthly_lunch_bill < 0.0 {
            return Err(ValidationError::NegativeValue("monthly_lunch_bill"));
        }
        if self.bonus < 0.0 {
            return Err(ValidationError::NegativeValue("bonus"));
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField(&'static str),
    NegativeValue(&'static str),
    UnderMinimumAge(i64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => {
                write!(f, "Please fill out the required field: {}", field)
            }
            ValidationError::NegativeValue(field) => {
                write!(f, "Field {} must not be negative", field)
            }
            ValidationError::UnderMinimumAge(age) => {
                write!(f, "Age must be at least 18, got {}", age)
            }
        }
    }
}

impl Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_employee() -> NewEmployee {
        NewEmployee {
            name: "Dana Reyes".to_string(),
            salary: 58_000.0,
            age: 31,
            gender: Gender::Female,
            designation: "Data Scientist".to_string(),
            working_hours: 40,
            monthly_lunch_bill: 120.0,
            bonus: 1_500.0,
        }
    }

    #[test]
    fn valid_record_passes() {
        assert!(valid_employee().validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut employee = valid_employee();
        employee.name = "   ".to_string();
        assert_eq!(
            employee.validate(),
            Err(ValidationError::EmptyField("name"))
        );
    }

    #[test]
    fn underage_is_rejected() {
        let mut employee = valid_employee();
        employee.age = 17;
        assert_eq!(
            employee.validate(),
            Err(ValidationError::UnderMinimumAge(17))
        );
    }

    #[test]
    fn negative_bonus_is_rejected() {
        let mut employee = valid_employee();
        employee.bonus = -1.0;
        assert_eq!(
            employee.validate(),
            Err(ValidationError::NegativeValue("bonus"))
        );
    }

    #[test]
    fn gender_round_trips_through_db_text() {
        assert_eq!(Gender::from_db_text("Male"), Gender::Male);
        assert_eq!(Gender::from_db_text("female"), Gender::Female);
        assert_eq!(Gender::from_db_text("FEMALE"), Gender::Female);
        assert_eq!(Gender::from_db_text("nonbinary"), Gender::Other);
    }
}

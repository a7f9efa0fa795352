//! Obligation computation.
//!
//! An employee's obligations are every known training name minus the names
//! found in their own completion rows. The universe of names is taken from
//! the whole trainings table, whoever completed them.

use reminder_core::error::Result;
use reminder_tables::{Table, Value};
use std::collections::BTreeSet;

use crate::columns::{CATEGORY, PERSON_ID, STATUS, TRAINING_NAME};
use crate::employee::Employee;

/// Training names an employee has not completed.
///
/// Sorted only so rendered messages are stable; membership is what counts.
pub type ObligationSet = BTreeSet<String>;

pub const ACTIVE_STATUS: &str = "Active";
pub const EMPLOYEE_CATEGORY: &str = "Employee";

/// Roster rows with Status == "Active" and Category == "Employee", in source order.
pub fn active_employees(roster: &Table) -> Result<Table> {
    roster
        .filter(STATUS, &Value::from(ACTIVE_STATUS))?
        .filter(CATEGORY, &Value::from(EMPLOYEE_CATEGORY))
}

/// Trainings `employee` still has to complete.
///
/// An employee with no rows at all owes the whole universe; an empty
/// trainings table owes nothing.
pub fn not_completed(employee: &Employee, trainings: &Table) -> Result<ObligationSet> {
    let all_names = training_names(trainings)?;
    let own_rows = trainings.filter(PERSON_ID, &employee.person_id)?;
    let completed_names = training_names(&own_rows)?;
    let owed: ObligationSet = all_names.difference(&completed_names).cloned().collect();

    tracing::debug!(
        person_id = %employee.person_id,
        "🧮 {} of {} training(s) outstanding",
        owed.len(),
        all_names.len()
    );
    Ok(owed)
}

fn training_names(trainings: &Table) -> Result<ObligationSet> {
    Ok(trainings
        .column_values(TRAINING_NAME)?
        .into_iter()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::EMPLOYEE_COLUMNS;
    use reminder_core::error::ReminderError;

    fn employee(id: i64) -> Employee {
        Employee {
            person_id: Value::Int(id),
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "a@x.com".into(),
            status: "Active".into(),
            category: "Employee".into(),
        }
    }

    fn trainings(rows: &[(i64, &str)]) -> Table {
        Table::new(
            ["Person ID", "Training name"],
            rows.iter()
                .map(|(id, name)| vec![Value::Int(*id), Value::from(*name)])
                .collect(),
        )
    }

    fn set(names: &[&str]) -> ObligationSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn roster_row(id: i64, status: &str, category: &str) -> Vec<Value> {
        vec![
            Value::Int(id),
            "First".into(),
            "Last".into(),
            format!("p{id}@x.com").into(),
            status.into(),
            category.into(),
        ]
    }

    #[test]
    fn test_single_employee_scenario() {
        let t = trainings(&[(1, "Safety"), (2, "Ethics")]);
        assert_eq!(not_completed(&employee(1), &t).unwrap(), set(&["Ethics"]));
    }

    #[test]
    fn test_all_completed_is_empty() {
        let t = trainings(&[(1, "Safety"), (1, "Ethics"), (2, "Ethics")]);
        assert!(not_completed(&employee(1), &t).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_person_owes_everything() {
        let t = trainings(&[(1, "Safety"), (2, "Ethics"), (2, "Safety")]);
        let result = not_completed(&employee(42), &t).unwrap();
        assert_eq!(result, training_names(&t).unwrap());
        assert_eq!(result, set(&["Ethics", "Safety"]));
    }

    #[test]
    fn test_empty_trainings_owes_nothing() {
        let t = trainings(&[]);
        for id in 1..4 {
            assert!(not_completed(&employee(id), &t).unwrap().is_empty());
        }
    }

    #[test]
    fn test_result_is_subset_of_universe() {
        let t = trainings(&[(1, "A"), (2, "B"), (3, "C"), (3, "A"), (4, "D")]);
        let universe = training_names(&t).unwrap();
        for id in 0..6 {
            let owed = not_completed(&employee(id), &t).unwrap();
            assert!(owed.is_subset(&universe));
        }
    }

    #[test]
    fn test_repeated_runs_agree() {
        let t = trainings(&[(1, "A"), (2, "B"), (1, "C")]);
        let first = not_completed(&employee(2), &t).unwrap();
        let second = not_completed(&employee(2), &t).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_trainings_table_untouched() {
        let t = trainings(&[(1, "A"), (2, "B")]);
        let before = t.clone();
        let _ = not_completed(&employee(1), &t).unwrap();
        let owed_by_2 = not_completed(&employee(2), &t).unwrap();
        assert_eq!(t, before);
        assert_eq!(owed_by_2, set(&["A"]));
    }

    #[test]
    fn test_blank_training_names_ignored() {
        let t = Table::new(
            ["Person ID", "Training name"],
            vec![
                vec![Value::Int(1), Value::Empty],
                vec![Value::Int(2), "Ethics".into()],
            ],
        );
        assert_eq!(not_completed(&employee(1), &t).unwrap(), set(&["Ethics"]));
    }

    #[test]
    fn test_numeric_training_names_render_as_text() {
        let t = Table::new(
            ["Person ID", "Training name"],
            vec![vec![Value::Int(2), Value::Int(101)]],
        );
        assert_eq!(not_completed(&employee(1), &t).unwrap(), set(&["101"]));
    }

    #[test]
    fn test_missing_training_name_column() {
        let t = Table::new(["Person ID", "Course"], vec![]);
        let err = not_completed(&employee(1), &t).unwrap_err();
        assert!(matches!(err, ReminderError::ColumnNotFound(c) if c == "Training name"));
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_not_completed_logs_outstanding_count() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();

        let t = trainings(&[(1, "Safety"), (2, "Ethics"), (3, "Fire drill")]);
        tracing::subscriber::with_default(subscriber, || {
            not_completed(&employee(1), &t).unwrap();
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("2 of 3 training(s) outstanding"), "{output}");
        assert!(output.contains("person_id=1"), "{output}");
    }

    #[test]
    fn test_missing_person_id_column() {
        let t = Table::new(["ID", "Training name"], vec![vec![Value::Int(1), "A".into()]]);
        let err = not_completed(&employee(1), &t).unwrap_err();
        assert!(matches!(err, ReminderError::ColumnNotFound(c) if c == "Person ID"));
    }

    #[test]
    fn test_active_employees_filters_both_predicates() {
        let roster = Table::new(
            EMPLOYEE_COLUMNS.iter().copied(),
            vec![
                roster_row(1, "Active", "Employee"),
                roster_row(2, "Inactive", "Employee"),
                roster_row(3, "Active", "Contractor"),
                roster_row(4, "active", "Employee"),
                roster_row(5, "Active", "Employee"),
            ],
        );
        let active = active_employees(&roster).unwrap();
        let ids: Vec<_> = active.column_values("Person ID").unwrap();
        assert_eq!(ids, vec![&Value::Int(1), &Value::Int(5)]);
        for row in active.rows() {
            assert_eq!(row.text("Status").unwrap(), "Active");
            assert_eq!(row.text("Category").unwrap(), "Employee");
        }
        assert_eq!(roster.len(), 5);
    }

    #[test]
    fn test_active_employees_missing_category() {
        let roster = Table::new(
            ["Person ID", "Status"],
            vec![vec![Value::Int(1), "Active".into()]],
        );
        let err = active_employees(&roster).unwrap_err();
        assert!(matches!(err, ReminderError::ColumnNotFound(c) if c == "Category"));
    }
}

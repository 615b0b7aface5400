//! Spreadsheet rendering for the employee list.

use chrono::{DateTime, Utc};
use entity::Employee;
use rust_xlsxwriter::{Workbook, XlsxError};

const HEADERS: [&str; 7] = [
    "EmployeeId",
    "FirstName",
    "LastName",
    "Email",
    "HireDate",
    "IsActive",
    "CreatedAt",
];

/// One spreadsheet cell. Absent optional fields render as [`Cell::Empty`]
/// rather than a sentinel value.
#[derive(Clone, Debug, PartialEq)]
enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    Empty,
}

/// Column values for one employee row, in header order.
fn record_cells(employee: &Employee) -> [Cell; 7] {
    [
        Cell::Number(f64::from(employee.employee_id)),
        Cell::Text(employee.first_name.clone()),
        Cell::Text(employee.last_name.clone()),
        match &employee.email {
            Some(email) => Cell::Text(email.clone()),
            None => Cell::Empty,
        },
        Cell::Text(employee.hire_date.format("%Y-%m-%d").to_string()),
        match employee.is_active {
            Some(flag) => Cell::Bool(flag),
            None => Cell::Empty,
        },
        match employee.created_at {
            Some(stamp) => Cell::Text(sortable_timestamp(stamp)),
            None => Cell::Empty,
        },
    ]
}

/// ISO 8601 `yyyy-MM-ddTHH:mm:ssZ`, lexicographically sortable.
fn sortable_timestamp(stamp: DateTime<Utc>) -> String {
    stamp.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn timestamped_filename(now: DateTime<Utc>) -> String {
    format!("employees_{}.xlsx", now.format("%Y%m%d%H%M%S"))
}

/// Render the employee list as a binary workbook: one fixed header row, one
/// row per record.
pub fn render_workbook(employees: &[Employee]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Employees")?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (index, employee) in employees.iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, cell) in record_cells(employee).into_iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Number(value) => worksheet.write_number(row, col, value)?,
                Cell::Text(value) => worksheet.write_string(row, col, value)?,
                Cell::Bool(value) => worksheet.write_boolean(row, col, value)?,
                Cell::Empty => continue,
            };
        }
    }

    worksheet.autofit();
    workbook.save_to_buffer()
}

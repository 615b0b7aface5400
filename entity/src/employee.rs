use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Canonical read shape of an employee as exposed by the API.
///
/// Credentials never appear here: the password is write-only input on the
/// request shapes and is hashed before it reaches storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Store-assigned identity, immutable after creation.
    pub employee_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub hire_date: NaiveDate,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/employees`.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub last_name: String,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 150, message = "must be at most 150 characters")
    )]
    pub email: Option<String>,
    pub hire_date: NaiveDate,
    pub is_active: Option<bool>,
    /// Defaults to the current UTC time when absent.
    pub created_at: Option<DateTime<Utc>>,
    #[validate(length(min = 8, max = 200, message = "must be between 8 and 200 characters"))]
    pub password: String,
}

/// Body of `PUT /api/employees/{id}`. Identical to the create shape except
/// the password is optional; absent means the stored credential is untouched.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub last_name: String,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 150, message = "must be at most 150 characters")
    )]
    pub email: Option<String>,
    pub hire_date: NaiveDate,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    #[validate(length(min = 8, max = 200, message = "must be between 8 and 200 characters"))]
    pub password: Option<String>,
}

impl UpdateEmployeeRequest {
    /// The plaintext to rotate the credential to, if the request carries one.
    /// Blank input counts as "no change", matching the procedure contract
    /// where a NULL password parameter leaves the stored hash alone.
    pub fn password_change(&self) -> Option<&str> {
        self.password
            .as_deref()
            .map(str::trim)
            .filter(|plain| !plain.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateEmployeeRequest {
        serde_json::from_value(serde_json::json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "hireDate": "2024-03-01",
            "password": "correct horse battery"
        }))
        .unwrap()
    }

    #[test]
    fn valid_create_request_passes() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut request = create_request();
        request.first_name.clear();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("first_name"));
    }

    #[test]
    fn overlong_last_name_is_rejected() {
        let mut request = create_request();
        request.last_name = "x".repeat(101);
        assert!(request.validate().is_err());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut request = create_request();
        request.email = Some("not-an-address".into());
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn absent_email_is_fine() {
        let mut request = create_request();
        request.email = None;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        let mut request = create_request();
        request.password = "seven77".into();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn update_password_is_optional_but_checked_when_present() {
        let update: UpdateEmployeeRequest = serde_json::from_value(serde_json::json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "hireDate": "2024-03-01"
        }))
        .unwrap();
        assert!(update.validate().is_ok());
        assert_eq!(update.password_change(), None);

        let mut with_short = update.clone();
        with_short.password = Some("short".into());
        assert!(with_short.validate().is_err());
    }

    #[test]
    fn blank_update_password_means_no_change() {
        let mut update: UpdateEmployeeRequest = serde_json::from_value(serde_json::json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "hireDate": "2024-03-01",
            "password": "        "
        }))
        .unwrap();
        assert_eq!(update.password_change(), None);
        update.password = Some("a much better secret".into());
        assert_eq!(update.password_change(), Some("a much better secret"));
    }

    #[test]
    fn employee_serializes_camel_case_without_password() {
        let employee = Employee {
            employee_id: 7,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: None,
            hire_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            is_active: Some(true),
            created_at: None,
        };
        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["employeeId"], 7);
        assert_eq!(value["firstName"], "Ada");
        assert!(value["email"].is_null());
        assert!(value.get("password").is_none());
    }
}

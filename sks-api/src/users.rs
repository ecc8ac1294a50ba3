use serde::{Serialize, Deserialize};

use crate::{Validator, ApiError, ApiErrorKind, Detail};
use crate::error::GeneralKind;
use crate::validation;

#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
}

/// body of POST /registration. the password confirmation is checked by the
/// registration operation itself, not here, so that a mismatch surfaces as
/// the business rule kind and not as ValidationFailed
#[derive(Debug, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub re_password: String,
}

impl Validator for Registration {
    fn validate(&self) -> Result<(), ApiError> {
        let mut invalid = Vec::new();

        if !validation::username_valid(&self.username) {
            invalid.push("username");
        }

        if !validation::password_valid(&self.password) {
            invalid.push("password");
        }

        if !validation::email_valid(&self.email) {
            invalid.push("email");
        }

        if !invalid.is_empty() {
            Err(ApiError::from((
                ApiErrorKind::General(GeneralKind::ValidationFailed),
                Detail::mult_keys(invalid)
            )))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod test {
    use super::*;

    fn registration() -> Registration {
        Registration {
            username: String::from("admin"),
            password: String::from("admin"),
            email: String::from("admin@root.com"),
            re_password: String::from("admin"),
        }
    }

    #[test]
    fn registration_validates_shape() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn registration_rejects_bad_username() {
        let mut given = registration();
        given.username = String::from("has spaces");

        assert!(given.validate().is_err());
    }

    #[test]
    fn registration_rejects_bad_email() {
        let mut given = registration();
        given.email = String::from("not-an-email");

        assert!(given.validate().is_err());
    }

    #[test]
    fn registration_mismatch_is_not_shape_validation() {
        // password != re_password is a business rule owned by the
        // registration operation. shape validation must pass it through
        let mut given = registration();
        given.re_password = String::from("other");

        assert!(given.validate().is_ok());
    }
}

//! Synthetic person records.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::address::PostalAddress;

/// Gender of a synthetic person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Draws from the male name pool and receives the height offset.
    Male,
    /// Draws from the female name pool.
    Female,
}

impl Gender {
    /// Returns the lowercase label used in output records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synthetic person.
///
/// The address is shared with the pool it was drawn from; many persons can
/// point at the same address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Given name, trimmed.
    pub given_name: String,
    /// Family name, trimmed.
    pub family_name: String,
    /// Gender.
    pub gender: Gender,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Height in centimetres.
    pub height: u16,
    /// Eye colour, trimmed.
    pub eye_color: String,
    /// ASCII email address at a reserved test domain.
    pub email: String,
    /// Address drawn from the pre-loaded pool.
    pub address: Arc<PostalAddress>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_serializes_lowercase() {
        let male = serde_json::to_string(&Gender::Male).expect("serialize");
        let female = serde_json::to_string(&Gender::Female).expect("serialize");
        assert_eq!(male, "\"male\"");
        assert_eq!(female, "\"female\"");
    }

    #[test]
    fn person_serializes_to_camel_case() {
        let person = Person {
            given_name: "Anna".to_owned(),
            family_name: "Weber".to_owned(),
            gender: Gender::Female,
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 12).expect("valid date"),
            height: 168,
            eye_color: "grün".to_owned(),
            email: "AnnaWeber1990@email.test".to_owned(),
            address: Arc::new(PostalAddress::new("DE", "Mainz", "55116", "Markt", "3")),
        };
        let json = serde_json::to_string(&person).expect("serialize");
        assert!(json.contains("givenName"));
        assert!(json.contains("birthDate"));
        assert!(json.contains("\"1990-04-12\""));
        assert!(json.contains("eyeColor"));
    }
}

//! User Records

use cadence::checkout::CustomerIdentity;
use serde::{Deserialize, Serialize};

use crate::store::{Table, TableRecord};

/// Back-office access level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    Staff,
    Admin,
}

/// User Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub role: UserRole,
}

impl TableRecord for UserRecord {
    const TABLE: Table = Table::Users;
}

impl UserRecord {
    /// Contact details for checkout, when the profile has a name and phone.
    #[must_use]
    pub fn customer_identity(&self) -> Option<CustomerIdentity> {
        let filled = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        Some(CustomerIdentity {
            name: filled(&self.name)?,
            email: self.email.trim().to_string(),
            phone: filled(&self.phone)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_profiles_yield_no_identity() {
        let user = UserRecord {
            email: "ana@example.com".to_string(),
            name: Some("Ana Vera".to_string()),
            phone: Some("  ".to_string()),
            role: UserRole::Customer,
        };

        assert_eq!(user.customer_identity(), None);
    }

    #[test]
    fn complete_profiles_yield_identity() {
        let user = UserRecord {
            email: "ana@example.com".to_string(),
            name: Some("Ana Vera".to_string()),
            phone: Some("0991234567".to_string()),
            role: UserRole::Admin,
        };

        assert_eq!(
            user.customer_identity(),
            Some(CustomerIdentity {
                name: "Ana Vera".to_string(),
                email: "ana@example.com".to_string(),
                phone: "0991234567".to_string(),
            })
        );
    }
}

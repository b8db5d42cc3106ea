use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Lawyer,
    Secretary,
    Intern,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Lawyer, Role::Secretary, Role::Intern];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Lawyer => "lawyer",
            Role::Secretary => "secretary",
            Role::Intern => "intern",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Lawyer => "Lawyer",
            Role::Secretary => "Secretary",
            Role::Intern => "Intern",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_manage_users(self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_delete_records(self) -> bool {
        match self {
            Role::Admin | Role::Lawyer => true,
            Role::Secretary | Role::Intern => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated user as the server represents it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub role: Role,
    #[serde(rename = "is_active", default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

fn default_active() -> bool {
    true
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
pub(crate) fn sample_user(role: Role) -> UserProfile {
    UserProfile {
        id: 7,
        email: "ayse@lawdesk.test".to_string(),
        name: "Ayse".to_string(),
        surname: "Kaya".to_string(),
        role,
        active: true,
        phone: None,
        created_at: None,
        updated_at: None,
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(FreelancerId);

/// The editable attributes of a freelancer, as sent on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerFields {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub skillsets: String,
    #[serde(default)]
    pub hobby: String,
}

impl FreelancerFields {
    pub fn get(&self, field: RecordField) -> &str {
        match field {
            RecordField::Username => &self.username,
            RecordField::Email => &self.email,
            RecordField::PhoneNumber => &self.phone_number,
            RecordField::Skillsets => &self.skillsets,
            RecordField::Hobby => &self.hobby,
        }
    }

    pub fn set(&mut self, field: RecordField, value: impl Into<String>) {
        let slot = match field {
            RecordField::Username => &mut self.username,
            RecordField::Email => &mut self.email,
            RecordField::PhoneNumber => &mut self.phone_number,
            RecordField::Skillsets => &mut self.skillsets,
            RecordField::Hobby => &mut self.hobby,
        };
        *slot = value.into();
    }
}

/// A freelancer record as owned by the record service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Freelancer {
    pub id: FreelancerId,
    #[serde(flatten)]
    pub fields: FreelancerFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordField {
    Username,
    Email,
    PhoneNumber,
    Skillsets,
    Hobby,
}

impl RecordField {
    pub const ALL: [RecordField; 5] = [
        RecordField::Username,
        RecordField::Email,
        RecordField::PhoneNumber,
        RecordField::Skillsets,
        RecordField::Hobby,
    ];

    /// Name used on the wire and in query strings.
    pub fn wire_name(self) -> &'static str {
        match self {
            RecordField::Username => "username",
            RecordField::Email => "email",
            RecordField::PhoneNumber => "phoneNumber",
            RecordField::Skillsets => "skillsets",
            RecordField::Hobby => "hobby",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordField::Username => "Username",
            RecordField::Email => "Email",
            RecordField::PhoneNumber => "Phone Number",
            RecordField::Skillsets => "Skillsets",
            RecordField::Hobby => "Hobby",
        }
    }

    /// Accepts the wire name case-insensitively plus a few console shorthands.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "username" | "user" | "name" => Some(RecordField::Username),
            "email" | "mail" => Some(RecordField::Email),
            "phonenumber" | "phone_number" | "phone" => Some(RecordField::PhoneNumber),
            "skillsets" | "skills" => Some(RecordField::Skillsets),
            "hobby" => Some(RecordField::Hobby),
            _ => None,
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

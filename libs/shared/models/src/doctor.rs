use serde::{Deserialize, Serialize};

use crate::serde_helpers::decimal_text;

/// A row of `/users/doctors/`, or a doctor fetched by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub experience: Option<u32>,
    #[serde(default, with = "decimal_text")]
    pub consultation_fee: Option<String>,
    #[serde(default, with = "decimal_text")]
    pub rating: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

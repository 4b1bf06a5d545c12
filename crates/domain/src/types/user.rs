//! Signed-in officer profile
//!
//! Persisted next to the session tokens so a restarted client can show who
//! is signed in before the first API call.

use serde::{Deserialize, Serialize};

/// Profile of the signed-in officer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfficerProfile {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    #[serde(alias = "phone_number")]
    pub phone: Option<String>,
}

impl OfficerProfile {
    /// "First Last", falling back to the phone number.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if name.is_empty() {
            self.phone.clone().unwrap_or_default()
        } else {
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_full_name() {
        let profile = OfficerProfile {
            first_name: Some("Officer".into()),
            last_name: Some("User".into()),
            phone: Some("+254712345678".into()),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), "Officer User");
    }

    #[test]
    fn display_name_falls_back_to_phone() {
        let profile = OfficerProfile { phone: Some("+254712345678".into()), ..Default::default() };
        assert_eq!(profile.display_name(), "+254712345678");
    }

    #[test]
    fn accepts_phone_number_alias() {
        let profile: OfficerProfile =
            serde_json::from_str(r#"{"id": "1", "phone_number": "+254700000001"}"#).unwrap();
        assert_eq!(profile.phone.as_deref(), Some("+254700000001"));
    }
}

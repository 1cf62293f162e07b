//! Structured contact records produced per card.

use serde::{Deserialize, Serialize};

/// Contact fields extracted from one business card.
///
/// Every field is independently optional. `full_text` always keeps the card's
/// raw text so downstream consumers can audit what the extractor saw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub full_text: String,
}

impl ContactRecord {
    /// Create an empty record for the given card text.
    pub fn new(full_text: impl Into<String>) -> Self {
        Self {
            full_text: full_text.into(),
            ..Default::default()
        }
    }

    /// Whether the record identifies someone: a name, company or email is present.
    ///
    /// Records failing this check are dropped by the pipeline.
    pub fn is_identifiable(&self) -> bool {
        self.name.is_some() || self.company.is_some() || self.email.is_some()
    }

    /// Number of populated contact fields (excluding `full_text`).
    pub fn field_count(&self) -> usize {
        [
            &self.name,
            &self.company,
            &self.email,
            &self.phone,
            &self.mobile,
            &self.address,
            &self.website,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }

    /// Case-insensitive keyword match over name, company and email.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        [&self.name, &self.company, &self.email]
            .iter()
            .filter_map(|f| f.as_deref())
            .any(|v| v.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiable() {
        let mut record = ContactRecord::new("03-1234-5678");
        record.phone = Some("03-1234-5678".to_string());
        assert!(!record.is_identifiable());

        record.email = Some("taro@example.com".to_string());
        assert!(record.is_identifiable());
        assert_eq!(record.field_count(), 2);
    }

    #[test]
    fn test_serialization_skips_missing_fields() {
        let mut record = ContactRecord::new("taro@example.com");
        record.email = Some("taro@example.com".to_string());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["email"], "taro@example.com");
        assert!(json.get("name").is_none());
        assert_eq!(json["full_text"], "taro@example.com");
    }

    #[test]
    fn test_matches_keyword() {
        let record = ContactRecord {
            name: Some("Taro Yamada".to_string()),
            company: Some("株式会社テスト".to_string()),
            ..ContactRecord::new("")
        };
        assert!(record.matches_keyword("yamada"));
        assert!(record.matches_keyword("テスト"));
        assert!(!record.matches_keyword("suzuki"));
    }
}

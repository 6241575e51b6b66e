//! Defines the core data structures used in the mailforge application.

use crate::error::Result;
use crate::normalize::display_name;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single identity whose names feed template expansion.
///
/// Fields are raw user input and may be empty; normalization happens at
/// generation time. Input files may use either snake_case or camelCase
/// keys, and omitted fields default to empty strings.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Person {
    /// The person's first name.
    #[serde(default, alias = "firstName")]
    pub first_name: String,
    /// The person's last name.
    #[serde(default, alias = "lastName")]
    pub last_name: String,
    /// The password assigned to accounts generated for this person.
    #[serde(default)]
    pub password: String,
}

impl Person {
    pub(crate) fn new(first_name: &str, last_name: &str, password: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            password: password.to_string(),
        }
    }

    /// A person is usable when at least one name field is non-blank.
    pub(crate) fn is_usable(&self) -> bool {
        !self.first_name.trim().is_empty() || !self.last_name.trim().is_empty()
    }
}

/// One generated account record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResultRecord {
    /// Display form of the first name (see [`display_name`]).
    pub first_name: String,
    /// Display form of the last name.
    pub last_name: String,
    /// The password carried over from the source person.
    pub password: String,
    /// The full address, `<local>@<domain>`.
    pub username: String,
    /// The lowercased domain.
    pub domain: String,
}

impl ResultRecord {
    pub(crate) fn new(person: &Person, username: String, domain: &str) -> Self {
        Self {
            first_name: display_name(&person.first_name),
            last_name: display_name(&person.last_name),
            password: person.password.clone(),
            username,
            domain: domain.to_string(),
        }
    }
}

/// The ordered output of one generation run.
///
/// Usernames across `main` and `shared` are pairwise distinct; `shared`
/// preserves generation order.
#[derive(Serialize, Debug, Clone, Default)]
pub(crate) struct GeneratedSet {
    /// The distinguished main identity, when a main template was supplied
    /// and expanded to a non-empty local-part.
    pub main: Option<ResultRecord>,
    /// The shared-mailbox records, capped at the effective target count.
    pub shared: Vec<ResultRecord>,
}

/// The canonical serialization shape handed to callers.
#[derive(Serialize, Debug, Clone)]
pub(crate) struct ExportDocument {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    /// The main identity's address, or empty when none was generated.
    pub username: String,
    pub domain: String,
    /// The ordered shared records.
    pub sharedmailbox: Vec<ResultRecord>,
}

impl ExportDocument {
    /// Builds the output document from a generated set and the primary
    /// person the caller considers the document's subject.
    pub(crate) fn new(person: &Person, domain: &str, set: GeneratedSet) -> Self {
        Self {
            first_name: display_name(&person.first_name),
            last_name: display_name(&person.last_name),
            password: person.password.clone(),
            username: set
                .main
                .as_ref()
                .map(|record| record.username.clone())
                .unwrap_or_default(),
            domain: domain.to_string(),
            sharedmailbox: set.shared,
        }
    }
}

/// Reads a JSON array of persons from `path`, dropping records with no
/// usable name.
pub(crate) fn read_persons(path: &Path) -> Result<Vec<Person>> {
    let data = std::fs::read_to_string(path)?;
    let records: Vec<Person> = serde_json::from_str(&data)?;

    let total = records.len();
    let persons: Vec<Person> = records.into_iter().filter(Person::is_usable).collect();
    if persons.len() < total {
        tracing::warn!(
            "Skipped {} record(s) with no usable name in {}",
            total - persons.len(),
            path.display()
        );
    }
    tracing::info!("Loaded {} person(s) from {}", persons.len(), path.display());

    Ok(persons)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_usable() {
        assert!(Person::new("John", "", "").is_usable());
        assert!(Person::new("", "Doe", "").is_usable());
        assert!(!Person::new("  ", "", "pw").is_usable());
    }

    #[test]
    fn test_person_accepts_camel_case_keys() {
        let person: Person =
            serde_json::from_str(r#"{"firstName": "John", "lastName": "Doe"}"#).unwrap();
        assert_eq!(person.first_name, "John");
        assert_eq!(person.last_name, "Doe");
        assert_eq!(person.password, "");
    }

    #[test]
    fn test_export_document_shape() {
        let person = Person::new("John", "Doe", "hunter2");
        let record = ResultRecord::new(&person, "john.doe@acme.com".to_string(), "acme.com");
        let set = GeneratedSet {
            main: None,
            shared: vec![record],
        };
        let doc = ExportDocument::new(&person, "acme.com", set);
        let json: serde_json::Value = serde_json::from_str(
            &serde_json::to_string(&doc).unwrap(),
        )
        .unwrap();

        assert_eq!(json["username"], "");
        assert_eq!(json["domain"], "acme.com");
        assert_eq!(json["sharedmailbox"][0]["username"], "john.doe@acme.com");
        assert_eq!(json["sharedmailbox"][0]["first_name"], "John");
        assert_eq!(json["sharedmailbox"][0]["password"], "hunter2");
    }

    #[test]
    fn test_export_document_main_username() {
        let person = Person::new("John", "Doe", "");
        let main = ResultRecord::new(&person, "jdoe@acme.com".to_string(), "acme.com");
        let set = GeneratedSet {
            main: Some(main),
            shared: Vec::new(),
        };
        let doc = ExportDocument::new(&person, "acme.com", set);
        assert_eq!(doc.username, "jdoe@acme.com");
    }

    #[test]
    fn test_record_display_names() {
        let person = Person::new(" John ", "Van Der Beek", "");
        let record = ResultRecord::new(&person, "j@acme.com".to_string(), "acme.com");
        assert_eq!(record.first_name, "John");
        assert_eq!(record.last_name, "VanDerBeek");

        let two_word = Person::new("John", "Van Der", "");
        let record = ResultRecord::new(&two_word, "j@acme.com".to_string(), "acme.com");
        assert_eq!(record.last_name, "Van Der");
    }
}

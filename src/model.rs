use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

/// Author record as returned by the backend. `books` and `prizes` are only
/// populated on detail responses; list responses omit them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub birth_date: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub prizes: Vec<Prize>,
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub isbn: String,
    #[serde(default)]
    pub image: String,
    pub publishing_date: String,
    pub description: String,
    pub editorial: Editorial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Editorial {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prize {
    pub id: i64,
    pub premiation_date: String,
    pub name: String,
    pub description: String,
    pub organization: Organization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub tipo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AuthorName(String);

impl AuthorName {
    pub fn new(raw: &str) -> Result<Self, AuthorNameEmptyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(AuthorNameEmptyError)
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for AuthorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
#[error("Author name cannot be empty")]
pub struct AuthorNameEmptyError;

/// Calendar date in the `YYYY-MM-DD` shape the backend expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BirthDate(String);

impl BirthDate {
    pub fn new(raw: &str) -> Result<Self, BirthDateError> {
        let trimmed = raw.trim();
        if Self::is_valid(trimmed) {
            Ok(Self(trimmed.into()))
        } else {
            Err(BirthDateError(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }

    fn is_valid(s: &str) -> bool {
        static RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
        RE.is_match(s)
    }
}

impl std::fmt::Display for BirthDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug)]
#[error("\"{0}\" is not a valid ISO date")]
pub struct BirthDateError(String);

/// Fields for a new author. The id is assigned by the backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAuthor {
    name: AuthorName,
    birth_date: BirthDate,
    description: String,
    image: String,
}

impl NewAuthor {
    pub const fn new(
        name: AuthorName,
        birth_date: BirthDate,
        description: String,
        image: String,
    ) -> Self {
        Self {
            name,
            birth_date,
            description,
            image,
        }
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }

    pub const fn birth_date(&self) -> &BirthDate {
        &self.birth_date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> &str {
        &self.image
    }
}

/// Partial update; fields left unset are omitted from the request body so
/// the backend keeps their current values.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<AuthorName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    birth_date: Option<BirthDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

impl AuthorUpdate {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: None,
            birth_date: None,
            description: None,
            image: None,
        }
    }

    pub const fn name(&self) -> Option<&AuthorName> {
        self.name.as_ref()
    }

    pub fn set_name(&mut self, name: AuthorName) {
        self.name = Some(name);
    }

    pub const fn birth_date(&self) -> Option<&BirthDate> {
        self.birth_date.as_ref()
    }

    pub fn set_birth_date(&mut self, birth_date: BirthDate) {
        self.birth_date = Some(birth_date);
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: String) {
        self.description = Some(description);
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn set_image(&mut self, image: String) {
        self.image = Some(image);
    }
}

//! Form for registering an external package source.

use std::fmt;

use crate::package::Package;

/// Shown under every required field left empty.
pub const REQUIRED_MESSAGE: &str = "You must enter a value";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Repository,
    Author,
    Description,
}

impl Field {
    pub fn all() -> &'static [Field] {
        &[
            Field::Title,
            Field::Repository,
            Field::Author,
            Field::Description,
        ]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Title => write!(f, "title"),
            Field::Repository => write!(f, "repository"),
            Field::Author => write!(f, "author"),
            Field::Description => write!(f, "description"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    title: String,
    repository: String,
    author: String,
    description: String,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Repository => &self.repository,
            Field::Author => &self.author,
            Field::Description => &self.description,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Repository => &mut self.repository,
            Field::Author => &mut self.author,
            Field::Description => &mut self.description,
        }
    }

    pub fn error_message(&self, field: Field) -> Option<&'static str> {
        self.value(field).is_empty().then_some(REQUIRED_MESSAGE)
    }

    /// Fields that currently fail validation, with their messages.
    pub fn errors(&self) -> Vec<(Field, &'static str)> {
        Field::all()
            .iter()
            .filter_map(|&field| self.error_message(field).map(|msg| (field, msg)))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Close the form with the entered source, or nothing while any field is
    /// still empty.
    pub fn submit(&self) -> Option<Package> {
        if !self.is_valid() {
            return None;
        }

        Some(Package::external_source(
            self.title.clone(),
            self.repository.clone(),
            self.author.clone(),
            self.description.clone(),
        ))
    }

    pub fn cancel(self) -> Option<Package> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::EXTERNAL_MODULE_SOURCES;

    fn filled() -> RegistrationForm {
        let mut form = RegistrationForm::new();
        form.set(Field::Title, "MMM-Mine");
        form.set(Field::Repository, "https://github.com/me/MMM-Mine");
        form.set(Field::Author, "me");
        form.set(Field::Description, "My module");
        form
    }

    #[test]
    fn test_submit_with_all_fields() {
        let pkg = filled().submit().unwrap();

        assert_eq!(pkg.title, "MMM-Mine");
        assert_eq!(pkg.repository, "https://github.com/me/MMM-Mine");
        assert_eq!(pkg.author, "me");
        assert_eq!(pkg.description, "My module");
        assert_eq!(pkg.category, EXTERNAL_MODULE_SOURCES);
        assert_eq!(pkg.directory, "");
    }

    #[test]
    fn test_submit_blocked_by_any_empty_field() {
        for &field in Field::all() {
            let mut form = filled();
            form.set(field, "");

            assert!(form.submit().is_none(), "{} left empty", field);
            assert_eq!(form.error_message(field), Some(REQUIRED_MESSAGE));
            assert_eq!(form.errors(), vec![(field, REQUIRED_MESSAGE)]);
        }
    }

    #[test]
    fn test_new_form_reports_every_field() {
        let form = RegistrationForm::new();
        assert_eq!(form.errors().len(), 4);
        assert!(!form.is_valid());
    }

    #[test]
    fn test_cancel_returns_nothing() {
        assert!(filled().cancel().is_none());
    }
}

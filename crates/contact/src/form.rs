use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::Field;

/// The three user-editable fields of the contact form.
#[derive(Validate, Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct ContactFormData {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1), email)]
    pub email: String,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub message: String,
}

impl ContactFormData {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();

        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Message => self.message = value,
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.message.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

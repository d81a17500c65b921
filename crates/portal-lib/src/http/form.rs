//! Multipart form bodies for file-upload endpoints.
use reqwest::multipart::{Form, Part};

use crate::error::ApiError;

/// Value of a single form field
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

/// Ordered multipart form. Kept separate from `reqwest::multipart::Form`
/// because that type is consumed on send and cannot be inspected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    fields: Vec<FormField>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push(FormField {
            name: name.into(),
            value: FormValue::Text(value.to_string()),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.fields.push(FormField {
            name: name.into(),
            value: FormValue::File {
                file_name: file_name.into(),
                mime: mime.into(),
                bytes,
            },
        });
        self
    }

    /// Replace the value of an existing text field, or append it
    pub fn set(mut self, name: &str, value: impl ToString) -> Self {
        let value = FormValue::Text(value.to_string());
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(FormField {
                name: name.to_string(),
                value,
            }),
        }
        self
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub(crate) fn to_reqwest(&self) -> Result<Form, ApiError> {
        self.fields.iter().try_fold(Form::new(), |form, field| {
            Ok(match &field.value {
                FormValue::Text(text) => form.text(field.name.clone(), text.clone()),
                FormValue::File {
                    file_name,
                    mime,
                    bytes,
                } => {
                    let part = Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str(mime)
                        .map_err(|e| ApiError::Unknown(format!("invalid mime type {mime}: {e}")))?;
                    form.part(field.name.clone(), part)
                }
            })
        })
    }
}

//! Multipart request bodies for the back-office endpoints.

use reqwest::multipart::{Form, Part};

use super::GatewayError;

/// File attached to a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name
    pub field: String,

    /// File name sent to the gateway
    pub file_name: String,

    /// MIME type
    pub mime: String,

    /// File contents
    pub bytes: Vec<u8>,
}

/// Text fields and files of a multipart request.
///
/// Kept as plain data so services and their tests never touch `reqwest`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl MultipartPayload {
    /// An empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field. Repeated names become repeated form fields.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Add one text field per value.
    #[must_use]
    pub fn texts<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.fields
            .extend(values.into_iter().map(|value| (name.to_string(), value.into())));
        self
    }

    /// Attach a file.
    #[must_use]
    pub fn file(mut self, file: FilePart) -> Self {
        self.files.push(file);
        self
    }

    /// First value of a text field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attached files.
    #[must_use]
    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    pub(crate) fn into_form(self) -> Result<Form, GatewayError> {
        let mut form = Form::new();

        for (name, value) in self.fields {
            form = form.text(name, value);
        }

        for file in self.files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)?;

            form = form.part(file.field, part);
        }

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn field_returns_first_value() {
        let payload = MultipartPayload::new()
            .text("name", "Linen shirt")
            .texts("sizes", ["S", "M"]);

        assert_eq!(payload.field("name"), Some("Linen shirt"));
        assert_eq!(payload.field("sizes"), Some("S"));
        assert_eq!(payload.field("colors"), None);
    }

    #[test]
    fn into_form_accepts_valid_mime() -> TestResult {
        let payload = MultipartPayload::new().file(FilePart {
            field: "productImages".to_string(),
            file_name: "front.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            bytes: vec![0xff, 0xd8],
        });

        payload.into_form()?;

        Ok(())
    }
}

//! Pre-built `multipart/form-data` payloads

use uuid::Uuid;

/// One field of a multipart payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

impl Part {
    /// Plain text field
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: value.into().into_bytes(),
        }
    }

    /// Binary field
    pub fn bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            content_type: Some("application/octet-stream".to_string()),
            data: data.into(),
        }
    }

    /// Attach a file name to the field
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Set the content type of the field
    pub fn mime(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    fn write_to(&self, boundary: &str, out: &mut Vec<u8>) {
        out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        let mut disposition = format!(
            "Content-Disposition: form-data; name=\"{}\"",
            escape(&self.name)
        );
        if let Some(file_name) = &self.file_name {
            disposition.push_str(&format!("; filename=\"{}\"", escape(file_name)));
        }
        out.extend_from_slice(disposition.as_bytes());
        out.extend_from_slice(b"\r\n");
        if let Some(content_type) = &self.content_type {
            out.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.data);
        out.extend_from_slice(b"\r\n");
    }
}

/// Quoted-string escaping for field and file names
fn escape(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Ordered set of parts sent as one `multipart/form-data` body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multipart {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for Multipart {
    fn default() -> Self {
        Self::new()
    }
}

impl Multipart {
    /// Empty payload with a random boundary
    pub fn new() -> Self {
        Self::with_boundary(format!("http-wrapper-{}", Uuid::new_v4().simple()))
    }

    /// Empty payload with a fixed boundary
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    /// Append a part
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Append a plain text field
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part(Part::text(name, value))
    }

    /// Boundary separating the parts
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Parts in send order
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Value for the `Content-Type` header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encoded request body
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for part in &self.parts {
            part.write_to(&self.boundary, &mut out);
        }
        out.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_text_and_file_parts() {
        let form = Multipart::with_boundary("XyZ")
            .text("title", "report")
            .part(Part::bytes("upload", vec![0x00, 0xFF]).file_name("data.bin"));

        let mut expected = Vec::new();
        expected.extend_from_slice(
            b"--XyZ\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nreport\r\n",
        );
        expected.extend_from_slice(
            b"--XyZ\r\nContent-Disposition: form-data; name=\"upload\"; filename=\"data.bin\"\r\n",
        );
        expected.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        expected.extend_from_slice(&[0x00, 0xFF]);
        expected.extend_from_slice(b"\r\n--XyZ--\r\n");

        assert_eq!(form.encode(), expected);
        assert_eq!(form.content_type(), "multipart/form-data; boundary=XyZ");
    }

    #[test]
    fn test_empty_payload_is_just_the_terminator() {
        let form = Multipart::with_boundary("b");
        assert_eq!(form.encode(), b"--b--\r\n".to_vec());
        assert!(form.parts().is_empty());
    }

    #[test]
    fn test_random_boundaries_differ() {
        let first = Multipart::new();
        let second = Multipart::new();
        assert_ne!(first.boundary(), second.boundary());
        assert!(first.boundary().starts_with("http-wrapper-"));
    }

    #[test]
    fn test_names_are_escaped() {
        let form = Multipart::with_boundary("b").part(Part::text("a\"b", "v").mime("text/plain"));
        let encoded = String::from_utf8(form.encode()).expect("ASCII body");
        assert!(encoded.contains("name=\"a%22b\""));
        assert!(encoded.contains("Content-Type: text/plain\r\n"));
        assert_eq!(form.parts()[0].name(), "a\"b");
    }
}

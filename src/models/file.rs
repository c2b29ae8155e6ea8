/// A file picked in the image field of the employee form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    /// MIME type declared by the client, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(content_type: Option<&str>, bytes: impl Into<Vec<u8>>) -> Self {
        ImageUpload {
            file_name: None,
            content_type: content_type.map(str::to_string),
            bytes: bytes.into(),
        }
    }
}

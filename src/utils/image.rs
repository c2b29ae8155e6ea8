use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use crate::models::file::ImageUpload;
use crate::utils::validation::{validate_image, ValidationFailure};

/// Validates a picked file and encodes it as a `data:` URI for storage.
pub fn encode_image(upload: &ImageUpload, max_bytes: usize) -> Result<String, ValidationFailure> {
    let mime = validate_image(upload, max_bytes)?;
    Ok(format!("data:{};base64,{}", mime, B64.encode(&upload.bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_as_data_uri() {
        let upload = ImageUpload::new(Some("image/png"), b"abc".to_vec());
        assert_eq!(encode_image(&upload, 1024).unwrap(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn rejected_files_are_not_encoded() {
        let upload = ImageUpload::new(Some("text/plain"), b"abc".to_vec());
        assert_eq!(encode_image(&upload, 1024), Err(ValidationFailure::InvalidImageType));
    }
}

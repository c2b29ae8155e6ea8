use actix_multipart::Multipart;
use futures_util::StreamExt;
use log::debug;

use crate::controllers::form::FormController;
use crate::errors::AppError;
use crate::models::file::ImageUpload;
use crate::utils::validation::ValidationFailure;

fn text(name: &str, bytes: Vec<u8>) -> Result<String, AppError> {
    String::from_utf8(bytes)
        .map_err(|_| AppError::BadRequest(format!("Field '{}' is not valid UTF-8", name)))
}

/// Feeds a submitted employee form into the controller's draft.
///
/// Repeated `courses` parts replace the stored selection; no `courses` part
/// means nothing is checked. An `image` part with no content means no new file
/// was picked.
pub async fn read_employee_form(
    mut payload: Multipart,
    form: &mut FormController,
    max_image_bytes: usize,
) -> Result<(), AppError> {
    let mut courses = Vec::new();

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|err| AppError::BadRequest(err.to_string()))?;
        let name = field
            .content_disposition()
            .get_name()
            .unwrap_or_default()
            .to_string();
        let file_name = field
            .content_disposition()
            .get_filename()
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.essence_str().to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|err| AppError::BadRequest(err.to_string()))?;
            bytes.extend_from_slice(&chunk);
            if name == "image" && bytes.len() > max_image_bytes {
                return Err(ValidationFailure::ImageTooLarge(max_image_bytes).into());
            }
        }

        match name.as_str() {
            "courses" => courses.push(text(&name, bytes)?),
            "image" if bytes.is_empty() => {}
            "image" => {
                let upload = ImageUpload {
                    file_name,
                    content_type,
                    bytes,
                };
                form.select_image(&upload, max_image_bytes)?;
            }
            "name" | "email" | "mobile" | "designation" | "gender" => {
                let value = text(&name, bytes)?;
                form.set_field(&name, &value)?;
            }
            other => debug!("Ignoring form part '{}'", other),
        }
    }

    form.set_courses(courses);
    Ok(())
}

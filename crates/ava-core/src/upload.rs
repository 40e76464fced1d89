//! Client-side checks run before an image ever reaches the transport.

use ava_types::ValidationError;
use crate::ports::UploadFile;

const IMAGE_MIME_PREFIX: &str = "image/";

/// Accept only non-empty-named `image/*` files no larger than `max_bytes`.
pub fn validate_image(file: &dyn UploadFile, max_bytes: u64) -> Result<(), ValidationError> {
    if file.file_name().trim().is_empty() {
        return Err(ValidationError::EmptyFileName);
    }

    let mime_type = file.mime_type();
    if !mime_type.to_ascii_lowercase().starts_with(IMAGE_MIME_PREFIX) {
        return Err(ValidationError::NotAnImage { mime_type });
    }

    let size = file.size();
    if size > max_bytes {
        return Err(ValidationError::TooLarge { size, limit: max_bytes });
    }

    Ok(())
}

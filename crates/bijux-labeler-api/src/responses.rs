// SPDX-License-Identifier: Apache-2.0

/// Sent with stored bytes so browsers keep to the declared content type.
pub const NOSNIFF: &str = "nosniff";

/// Content type served for a stored file, guessed from its extension.
/// Unknown extensions fall back to `application/octet-stream`.
#[must_use]
pub fn image_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}

pub const MAX_DESCRIPTION_CHARS: usize = 200;

const IMAGE_MIME_PREFIX: &str = "image/";

/// Image selected by the user, kept in memory until it's uploaded
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn new(file_name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.to_string(), mime_type: mime_type.to_string(), bytes }
    }

    /// Guesses the MIME type from the file extension
    pub fn from_file_name(file_name: &str, bytes: Vec<u8>) -> Self {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        Self::new(file_name, mime.essence_str(), bytes)
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with(IMAGE_MIME_PREFIX)
    }
}

impl std::fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBlob")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// The moment being composed: lives from image selection
/// until a successful mint or a discard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingUpload {
    image: Option<ImageBlob>,
    description: String,
}

impl PendingUpload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects an image. Files that aren't images are ignored and `false` is returned.
    pub fn select_image(&mut self, image: ImageBlob) -> bool {
        if !image.is_image() {
            return false;
        }
        self.image = Some(image);
        true
    }

    /// Sets the note, truncated to [`MAX_DESCRIPTION_CHARS`] characters
    pub fn set_description(&mut self, description: &str) {
        self.description = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
    }

    pub fn image(&self) -> Option<&ImageBlob> {
        self.image.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn remaining_chars(&self) -> usize {
        MAX_DESCRIPTION_CHARS.saturating_sub(self.description.chars().count())
    }

    pub fn clear(&mut self) {
        self.image = None;
        self.description.clear();
    }
}

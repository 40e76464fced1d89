//! Browser file handle for image uploads.

use ava_core::ports::UploadFile;
use web_sys::File;

/// A file picked in the widget's file input
#[derive(Debug, Clone)]
pub struct PickedFile(File);

impl PickedFile {
    pub fn new(file: File) -> Self {
        Self(file)
    }

    pub fn as_file(&self) -> &File {
        &self.0
    }
}

impl From<File> for PickedFile {
    fn from(file: File) -> Self {
        Self(file)
    }
}

impl UploadFile for PickedFile {
    fn file_name(&self) -> String {
        self.0.name()
    }

    fn mime_type(&self) -> String {
        self.0.type_()
    }

    fn size(&self) -> u64 {
        self.0.size() as u64
    }
}

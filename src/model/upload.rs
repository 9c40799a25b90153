//! File columns. Rows keep a path relative to the uploads root; the bytes
//! themselves live wherever the deployment puts them.

use std::borrow::Cow;
use std::path::Path;

use validator::ValidationError;

/// Longest path a file column can hold.
pub const MAX_UPLOAD_PATH: usize = 100;

pub const DEFAULT_DISPLAY_PICTURE: &str = "Display_pics/name_of_pics.jpg";

const IMAGE_EXTENSIONS: &[&str] = &[
    "bmp", "gif", "ico", "jpeg", "jpg", "png", "tif", "tiff", "webp",
];
const PDF_EXTENSIONS: &[&str] = &["pdf"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    ProfilePicture,
    CourseImage,
    ModuleResource,
    Video,
}

impl UploadField {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::ProfilePicture => "profile_pics/",
            Self::CourseImage => "Display_pics/",
            Self::ModuleResource => "pdfs/",
            Self::Video => "videos/",
        }
    }

    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::ProfilePicture | Self::CourseImage => IMAGE_EXTENSIONS,
            Self::ModuleResource => PDF_EXTENSIONS,
            Self::Video => VIDEO_EXTENSIONS,
        }
    }

    pub fn default_path(&self) -> Option<&'static str> {
        match self {
            Self::ProfilePicture | Self::CourseImage => Some(DEFAULT_DISPLAY_PICTURE),
            Self::ModuleResource | Self::Video => None,
        }
    }

    /// Places `name` under this field's prefix. Directory parts of a bare
    /// client file name are dropped; a path that already sits under the
    /// prefix (or is the default) is kept as is.
    pub fn path(&self, name: &str) -> String {
        if name.starts_with(self.prefix()) || Some(name) == self.default_path() {
            return name.to_string();
        }

        let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
        format!("{}{}", self.prefix(), file_name)
    }

    pub fn validate(&self, name: &str) -> Result<(), ValidationError> {
        validate_extension(name, self.allowed_extensions())?;

        if self.path(name).chars().count() > MAX_UPLOAD_PATH {
            let mut err = ValidationError::new("upload_path_too_long");
            err.message = Some(Cow::Owned(format!(
                "Ensure this filename has at most {MAX_UPLOAD_PATH} characters."
            )));
            return Err(err);
        }

        Ok(())
    }
}

/// Case-insensitive check of the last extension of `name`.
pub fn validate_extension(name: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    let extension = Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if allowed.contains(&extension.as_str()) {
        return Ok(());
    }

    let mut err = ValidationError::new("invalid_extension");
    err.add_param(Cow::Borrowed("extension"), &extension);
    err.add_param(Cow::Borrowed("allowed_extensions"), &allowed.join(", "));
    err.message = Some(Cow::Owned(format!(
        "File extension “{}” is not allowed. Allowed extensions are: {}.",
        extension,
        allowed.join(", ")
    )));
    Err(err)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pdf_only_for_module_resources() {
        let field = UploadField::ModuleResource;
        assert!(field.validate("syllabus.pdf").is_ok());
        assert!(field.validate("SYLLABUS.PDF").is_ok());
        assert!(field.validate("pdfs/syllabus.pdf").is_ok());

        let err = field.validate("syllabus.docx").unwrap_err();
        assert_eq!(err.code, "invalid_extension");
        assert_eq!(
            err.message.as_deref(),
            Some("File extension “docx” is not allowed. Allowed extensions are: pdf.")
        );
    }

    #[test]
    fn video_whitelist() {
        let field = UploadField::Video;
        for name in ["intro.mp4", "intro.avi", "intro.MOV"] {
            assert!(field.validate(name).is_ok(), "{name} should pass");
        }
        for name in ["intro.mkv", "intro.mp4.exe", "intro", ".mp4", "intro."] {
            assert!(field.validate(name).is_err(), "{name} should fail");
        }
    }

    #[test]
    fn images_for_pictures() {
        assert!(UploadField::CourseImage.validate("cover.png").is_ok());
        assert!(UploadField::ProfilePicture.validate("me.JPEG").is_ok());
        assert!(UploadField::CourseImage.validate("cover.pdf").is_err());
        assert!(
            UploadField::CourseImage
                .validate(DEFAULT_DISPLAY_PICTURE)
                .is_ok()
        );
    }

    #[test]
    fn path_is_prefixed() {
        assert_eq!(UploadField::Video.path("intro.mp4"), "videos/intro.mp4");
        assert_eq!(
            UploadField::Video.path("videos/intro.mp4"),
            "videos/intro.mp4"
        );
        assert_eq!(
            UploadField::ModuleResource.path("C:\\Users\\me\\notes.pdf"),
            "pdfs/notes.pdf"
        );
        assert_eq!(
            UploadField::ProfilePicture.path(DEFAULT_DISPLAY_PICTURE),
            DEFAULT_DISPLAY_PICTURE
        );
        assert_eq!(
            UploadField::ProfilePicture.path("me.png"),
            "profile_pics/me.png"
        );
    }

    #[test]
    fn long_paths_are_rejected() {
        let name = format!("{}.pdf", "a".repeat(MAX_UPLOAD_PATH));
        let err = UploadField::ModuleResource.validate(&name).unwrap_err();
        assert_eq!(err.code, "upload_path_too_long");
    }
}

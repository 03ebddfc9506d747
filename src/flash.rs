//! One-shot user messages carried across a redirect in a signed cookie.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use serde::Serialize;

use crate::error::AppError;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Uploaded,
    Deleted,
    MissingFile,
    InvalidFileType,
    FileTooLarge,
    UploadFailed,
    DeleteFailed,
}

impl Flash {
    const ALL: [Flash; 7] = [
        Flash::Uploaded,
        Flash::Deleted,
        Flash::MissingFile,
        Flash::InvalidFileType,
        Flash::FileTooLarge,
        Flash::UploadFailed,
        Flash::DeleteFailed,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Flash::Uploaded => "uploaded",
            Flash::Deleted => "deleted",
            Flash::MissingFile => "missing_file",
            Flash::InvalidFileType => "invalid_file_type",
            Flash::FileTooLarge => "file_too_large",
            Flash::UploadFailed => "upload_failed",
            Flash::DeleteFailed => "delete_failed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    pub fn category(self) -> &'static str {
        match self {
            Flash::Uploaded | Flash::Deleted => "success",
            _ => "error",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::Uploaded => "Photo uploaded successfully",
            Flash::Deleted => "Photo deleted successfully",
            Flash::MissingFile => "No file selected",
            Flash::InvalidFileType => "Invalid file type. Allowed types: png, jpg, jpeg, gif",
            Flash::FileTooLarge => "File is too large",
            Flash::UploadFailed => "Error uploading photo",
            Flash::DeleteFailed => "Error deleting photo",
        }
    }
}

/// Message reported to the user for a failed upload.
impl From<&AppError> for Flash {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::MissingFile => Flash::MissingFile,
            AppError::InvalidFileType(_) => Flash::InvalidFileType,
            AppError::PayloadTooLarge(_) => Flash::FileTooLarge,
            _ => Flash::UploadFailed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashMessage {
    pub category: &'static str,
    pub message: &'static str,
}

impl From<Flash> for FlashMessage {
    fn from(flash: Flash) -> Self {
        Self {
            category: flash.category(),
            message: flash.message(),
        }
    }
}

/// Queue `flash` for the next page view, replacing any unread message.
pub fn push(jar: SignedCookieJar, flash: Flash) -> SignedCookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, flash.code()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

/// Read and clear the pending flash message.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<Flash>) {
    let flash = jar
        .get(FLASH_COOKIE)
        .and_then(|cookie| Flash::from_code(cookie.value()));

    if flash.is_none() {
        return (jar, None);
    }

    let mut removal = Cookie::from(FLASH_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), flash)
}

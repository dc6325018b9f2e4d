use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

macro_rules! impl_id {
    ($t:ty) => {
        impl $t {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $t {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

impl_id!(DocumentId);
impl_id!(JobId);

/// Format of an uploaded source document, resolved from a mime hint or file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    PlainText,
    Html,
    Pdf,
    Docx,
}

impl SourceFormat {
    /// Resolve the format, preferring the mime hint over the filename extension.
    pub fn detect(filename: &str, mime: Option<&str>) -> Option<Self> {
        if let Some(mime) = mime {
            let mime = mime.split(';').next().unwrap_or_default().trim();
            let from_mime = match mime {
                "text/plain" | "text/markdown" => Some(SourceFormat::PlainText),
                "text/html" | "application/xhtml+xml" => Some(SourceFormat::Html),
                "application/pdf" => Some(SourceFormat::Pdf),
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                    Some(SourceFormat::Docx)
                }
                _ => None,
            };
            if from_mime.is_some() {
                return from_mime;
            }
        }

        let extension = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "txt" | "md" | "text" => Some(SourceFormat::PlainText),
            "html" | "htm" => Some(SourceFormat::Html),
            "pdf" => Some(SourceFormat::Pdf),
            "docx" => Some(SourceFormat::Docx),
            _ => None,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::PlainText => write!(f, "plain_text"),
            SourceFormat::Html => write!(f, "html"),
            SourceFormat::Pdf => write!(f, "pdf"),
            SourceFormat::Docx => write!(f, "docx"),
        }
    }
}

impl std::str::FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain_text" => Ok(SourceFormat::PlainText),
            "html" => Ok(SourceFormat::Html),
            "pdf" => Ok(SourceFormat::Pdf),
            "docx" => Ok(SourceFormat::Docx),
            other => Err(format!("unknown source format: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_prefers_mime() {
        assert_eq!(
            SourceFormat::detect("notes.txt", Some("text/html; charset=utf-8")),
            Some(SourceFormat::Html)
        );
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        assert_eq!(
            SourceFormat::detect("Lecture.PDF", Some("application/octet-stream")),
            Some(SourceFormat::Pdf)
        );
        assert_eq!(SourceFormat::detect("readme", None), None);
    }

    #[test]
    fn test_source_format_round_trips_through_display() {
        let parsed: SourceFormat = SourceFormat::Docx.to_string().parse().unwrap();
        assert_eq!(parsed, SourceFormat::Docx);
    }
}

//! Domain models for spaces, blocks, and attachments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::text::language_display_name;

// =============================================================================
// SPACES
// =============================================================================

/// Category tag of a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpaceType {
    #[default]
    Learning,
    Work,
    Personal,
    Other,
}

impl SpaceType {
    pub const ALL: [SpaceType; 4] = [
        SpaceType::Learning,
        SpaceType::Work,
        SpaceType::Personal,
        SpaceType::Other,
    ];

    /// Stable storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Other => "other",
        }
    }

    /// Human label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Learning => "Learning",
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for SpaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SpaceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "learning" => Ok(Self::Learning),
            "work" => Ok(Self::Work),
            "personal" => Ok(Self::Personal),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown space type: {}", s)),
        }
    }
}

/// Where a space's processing runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpaceMode {
    OnDevice,
    #[default]
    PrivateCloudCompute,
}

impl SpaceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnDevice => "on_device",
            Self::PrivateCloudCompute => "private_cloud_compute",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OnDevice => "On-Device",
            Self::PrivateCloudCompute => "Private Cloud Compute",
        }
    }
}

impl std::fmt::Display for SpaceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SpaceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "on_device" | "ondevice" => Ok(Self::OnDevice),
            "private_cloud_compute" | "privatecloudcompute" | "cloud" => {
                Ok(Self::PrivateCloudCompute)
            }
            _ => Err(format!("Unknown space mode: {}", s)),
        }
    }
}

/// A named, user-created grouping of blocks and attachments.
///
/// A space owns its attachments: deleting it deletes every attachment
/// record and every backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: Uuid,
    pub name: String,
    pub space_type: SpaceType,
    pub mode: SpaceMode,
    pub created_at: DateTime<Utc>,
}

/// Request for creating a new space. The name is expected to be validated.
#[derive(Debug, Clone)]
pub struct CreateSpaceRequest {
    pub name: String,
    pub space_type: SpaceType,
    pub mode: SpaceMode,
}

/// A content block shown inside a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceBlock {
    pub id: Uuid,
    pub space_id: Uuid,
    pub title: String,
    pub kind: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// ATTACHMENTS
// =============================================================================

/// One imported file or saved pasted-text item belonging to exactly one space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    /// Owning space (required once persisted).
    pub space_id: Uuid,
    /// User-facing name, display only and not unique.
    pub original_file_name: String,
    /// On-disk key inside the attachment directory. Globally unique.
    pub stored_file_name: String,
    /// Detected language tag. Always present for admitted attachments.
    pub language_code: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl Attachment {
    /// Display text for the detected language.
    pub fn language_description(&self) -> String {
        match self.language_code.as_deref() {
            Some(code) if !code.trim().is_empty() => language_display_name(code),
            _ => "Language unknown".to_string(),
        }
    }
}

/// Fields needed to persist a new attachment record.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub space_id: Uuid,
    pub original_file_name: String,
    pub stored_file_name: String,
    pub language_code: Option<String>,
}

impl NewAttachment {
    /// Materialize the record with a fresh identifier and timestamp.
    pub fn into_attachment(self) -> Attachment {
        Attachment {
            id: Uuid::now_v7(),
            space_id: self.space_id,
            original_file_name: self.original_file_name,
            stored_file_name: self.stored_file_name,
            language_code: self.language_code,
            added_at: Utc::now(),
        }
    }
}

// =============================================================================
// CONTENT FAMILIES
// =============================================================================

/// Coarse format classification that drives the sampling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFamily {
    PlainText,
    Pdf,
    WordDocument,
    Unsupported,
}

impl std::fmt::Display for ContentFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlainText => write!(f, "plain_text"),
            Self::Pdf => write!(f, "pdf"),
            Self::WordDocument => write!(f, "word_document"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(language_code: Option<&str>) -> Attachment {
        NewAttachment {
            space_id: Uuid::nil(),
            original_file_name: "notes.txt".to_string(),
            stored_file_name: "abc-notes.txt".to_string(),
            language_code: language_code.map(str::to_string),
        }
        .into_attachment()
    }

    #[test]
    fn test_space_type_parse() {
        assert_eq!("learning".parse::<SpaceType>().unwrap(), SpaceType::Learning);
        assert_eq!(" Work ".parse::<SpaceType>().unwrap(), SpaceType::Work);
        assert!("hobby".parse::<SpaceType>().is_err());
    }

    #[test]
    fn test_space_type_display_matches_storage_key() {
        for t in SpaceType::ALL {
            assert_eq!(t.to_string(), t.as_str());
            assert_eq!(t.as_str().parse::<SpaceType>().unwrap(), t);
        }
    }

    #[test]
    fn test_space_mode_parse_accepts_hyphens() {
        assert_eq!("on-device".parse::<SpaceMode>().unwrap(), SpaceMode::OnDevice);
        assert_eq!(
            "private_cloud_compute".parse::<SpaceMode>().unwrap(),
            SpaceMode::PrivateCloudCompute
        );
        assert!("remote".parse::<SpaceMode>().is_err());
    }

    #[test]
    fn test_space_defaults() {
        assert_eq!(SpaceType::default(), SpaceType::Learning);
        assert_eq!(SpaceMode::default(), SpaceMode::PrivateCloudCompute);
    }

    #[test]
    fn test_space_mode_serde_snake_case() {
        let json = serde_json::to_string(&SpaceMode::OnDevice).unwrap();
        assert_eq!(json, "\"on_device\"");
    }

    #[test]
    fn test_into_attachment_assigns_identity() {
        let a = attachment(Some("en"));
        let b = attachment(Some("en"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.stored_file_name, "abc-notes.txt");
    }

    #[test]
    fn test_language_description_known_code() {
        assert_eq!(attachment(Some("en")).language_description(), "English");
    }

    #[test]
    fn test_language_description_unknown() {
        assert_eq!(attachment(None).language_description(), "Language unknown");
        assert_eq!(attachment(Some("  ")).language_description(), "Language unknown");
    }

    #[test]
    fn test_language_description_falls_back_to_code() {
        assert_eq!(attachment(Some("xx")).language_description(), "xx");
    }

    #[test]
    fn test_content_family_display() {
        assert_eq!(ContentFamily::WordDocument.to_string(), "word_document");
        assert_eq!(ContentFamily::Pdf.to_string(), "pdf");
    }
}

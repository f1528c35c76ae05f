//! Wire shapes for the portfolio API and the static backup document
//!
//! Every field defaults so that partially filled payloads still decode;
//! the transform decides what an absent value means.

use serde::{Deserialize, Deserializer, Serialize};

/// Explicit `null` decodes like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `GET /api/me/profile/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProfile {
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub medium_url: Option<String>,
    pub kaggle_url: Option<String>,
    pub resume: Option<String>,
}

/// Skill entry, used both by `GET /api/me/skills/` and inside tech stacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSkill {
    pub id: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Two-letter category code: FE, BE, DO, AI, OT.
    pub category: Option<String>,
    pub proficiency: Option<f64>,
    pub icon_url: Option<String>,
}

/// `GET /api/me/projects/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProject {
    pub id: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_featured: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub tech_stack: Vec<RawSkill>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub cover_image: Option<String>,
    pub slug: Option<String>,
    pub bento_size: Option<String>,
}

/// `GET /api/me/experience/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawExperience {
    pub id: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    pub company_website: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    /// `YYYY-MM-DD` or RFC 3339.
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tech_stack: Vec<RawSkill>,
}

/// `GET /api/me/social-links/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSocialLink {
    #[serde(deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// `GET /profile.json`: the five payloads aggregated into one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupDocument {
    pub profile: Option<RawProfile>,
    pub projects: Option<Vec<RawProject>>,
    pub skills: Option<Vec<RawSkill>>,
    pub experience: Option<Vec<RawExperience>>,
    pub social_links: Option<Vec<RawSocialLink>>,
}

/// Input to the transform, whichever source it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceDocuments {
    pub profile: RawProfile,
    pub projects: Vec<RawProject>,
    pub skills: Vec<RawSkill>,
    pub experience: Vec<RawExperience>,
    pub social_links: Vec<RawSocialLink>,
}

impl From<BackupDocument> for SourceDocuments {
    fn from(doc: BackupDocument) -> Self {
        Self {
            profile: doc.profile.unwrap_or_default(),
            projects: doc.projects.unwrap_or_default(),
            skills: doc.skills.unwrap_or_default(),
            experience: doc.experience.unwrap_or_default(),
            social_links: doc.social_links.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_project() {
        let json = r#"{"id":3,"title":"Chat App","tech_stack":[{"name":"Rust","category":"BE"}]}"#;
        let project: RawProject = serde_json::from_str(json).unwrap();
        assert_eq!(project.title, "Chat App");
        assert!(!project.is_featured);
        assert_eq!(project.tech_stack[0].category.as_deref(), Some("BE"));
        assert!(project.live_url.is_none());
    }

    #[test]
    fn test_parse_backup_document_missing_sections() {
        let json = r#"{"profile":{"name":"Sam"},"skills":[{"name":"Go","proficiency":7}]}"#;
        let doc: BackupDocument = serde_json::from_str(json).unwrap();
        let docs = SourceDocuments::from(doc);
        assert_eq!(docs.profile.name.as_deref(), Some("Sam"));
        assert_eq!(docs.skills.len(), 1);
        assert!(docs.projects.is_empty());
        assert!(docs.social_links.is_empty());
    }

    #[test]
    fn test_parse_experience_null_end_date() {
        let json = r#"{"company_name":"Acme","role":"Engineer","start_date":"2023-06-01","end_date":null}"#;
        let exp: RawExperience = serde_json::from_str(json).unwrap();
        assert!(exp.end_date.is_none());
        assert!(exp.tech_stack.is_empty());
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let json = r#"{"id":1,"title":"Chat","description":null,"is_featured":null,"tech_stack":null}"#;
        let project: RawProject = serde_json::from_str(json).unwrap();
        assert_eq!(project.title, "Chat");
        assert_eq!(project.description, "");
        assert!(!project.is_featured);
        assert!(project.tech_stack.is_empty());

        let exp: RawExperience =
            serde_json::from_str(r#"{"company_name":null,"role":null,"start_date":"2021-08-01"}"#).unwrap();
        assert_eq!(exp.role, "");
        assert_eq!(exp.company_name, "");

        let link: RawSocialLink = serde_json::from_str(r#"{"platform":"GitHub","url":null}"#).unwrap();
        assert_eq!(link.url, "");
        let skill: RawSkill = serde_json::from_str(r#"{"name":null,"proficiency":5}"#).unwrap();
        assert_eq!(skill.name, "");
    }

    #[test]
    fn test_backup_document_with_null_project_fields() {
        let json = r#"{"projects":[{"id":1,"title":"Chat","description":null,"tech_stack":[]}],
                       "experience":[{"company_name":"Acme","role":null,"start_date":"2020-01-01"}]}"#;
        let docs = SourceDocuments::from(serde_json::from_str::<BackupDocument>(json).unwrap());
        assert_eq!(docs.projects[0].title, "Chat");
        assert_eq!(docs.experience[0].company_name, "Acme");
    }
}

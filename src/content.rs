//! Normalized portfolio record
//!
//! One shape for every data source: the fallback store, the backup
//! document and the live API all end up as a `PortfolioContent`.

use serde::{Deserialize, Serialize};

use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioContent {
    pub profile: Profile,
    pub hero: Hero,
    pub projects: ProjectsSection,
    pub skills: Vec<String>,
    pub about: About,
    pub experience: ExperienceSection,
    pub contact: Contact,
    pub navigation: Navigation,
    pub footer: Footer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub tagline: String,
    pub bio: String,
    pub profile_image: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub github_url: String,
    pub linkedin_url: String,
    pub twitter_url: String,
    pub medium_url: String,
    pub kaggle_url: String,
    pub resume: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub greeting: String,
    pub name: String,
    pub title: String,
    pub tagline: String,
    pub code_snippets: Vec<String>,
    pub cta_buttons: Vec<CtaButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtaButton {
    pub text: String,
    pub href: String,
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectsSection {
    pub title: String,
    pub subtitle: String,
    pub projects: Vec<Project>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<u64>,
    pub title: String,
    pub description: String,
    /// "Featured" or "Live"
    pub status: String,
    pub category: String,
    pub link: String,
    pub github: String,
    pub tech: Vec<String>,
    pub image: Option<String>,
    pub icon: String,
    pub featured: bool,
    pub slug: Option<String>,
    pub bento_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
    pub description: String,
    pub skills: Vec<String>,
    pub skills_by_category: Vec<SkillGroup>,
    pub fun_facts: Vec<FunFact>,
    pub experience: ExperienceSummary,
    pub interests: Vec<String>,
}

/// Skills sharing a category label, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub skills: Vec<SkillBadge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillBadge {
    pub name: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunFact {
    pub emoji: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSummary {
    /// "{n}+" or "0" when there is no work history
    pub years: String,
    pub projects: usize,
    pub works: Vec<Work>,
    pub latest_work: Option<Work>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Work {
    pub id: Option<u64>,
    pub org: Organization,
    pub role: String,
    pub duration: Tenure,
    pub location: String,
    pub description: String,
    pub tech: Vec<String>,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub website: String,
}

/// Start and end dates as they came off the wire. `to == None` means current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenure {
    pub from: String,
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSection {
    pub title: String,
    pub subtitle: String,
    pub works: Vec<Work>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub title: String,
    pub subtitle: String,
    pub contact_info: ContactInfo,
    pub social_links: Vec<SocialLink>,
    pub form_fields: Vec<FormField>,
    pub submit_button: SubmitButton,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub location: String,
    pub availability: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: String,
    pub required: bool,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitButton {
    pub text: String,
    pub loading_text: String,
    pub success_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Navigation {
    pub logo: Logo,
    pub menu_items: Vec<MenuItem>,
    pub theme: ThemeOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logo {
    pub text: String,
    pub id: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub href: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeOptions {
    pub current: Theme,
    pub options: Vec<Theme>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    pub copyright: Copyright,
    pub social_links: Vec<SocialLink>,
    pub quick_links: Vec<QuickLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Copyright {
    pub year: i32,
    pub text: String,
    pub owner: String,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickLink {
    pub label: String,
    pub href: String,
}

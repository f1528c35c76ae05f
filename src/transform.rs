//! Raw payloads -> `PortfolioContent`
//!
//! Pure and deterministic: the only ambient input is `now`, passed in by
//! the caller. The backup document and the five API payloads go through
//! the same function, so both sources produce identical records.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::cmp::Ordering;

use crate::content::{
    About, ExperienceSection, ExperienceSummary, Hero, Organization, PortfolioContent, Profile,
    Project, ProjectsSection, SkillBadge, SkillGroup, SocialLink, Tenure, Work,
};
use crate::fallback;
use crate::models::{RawExperience, RawProfile, RawProject, RawSkill, RawSocialLink, SourceDocuments};

/// Running sum of selected skill-name lengths stays at or under this.
pub const SKILL_CHAR_BUDGET: usize = 110;
/// Selected regardless of the budget.
pub const MIN_SKILLS: usize = 6;

const DEFAULT_NAME: &str = "Developer";
const DEFAULT_TITLE: &str = "Full Stack Developer";
const DEFAULT_TAGLINE: &str = "Building amazing things";
const DEFAULT_AVATAR: &str = "/images/profile.jpg";
const DEFAULT_DESCRIPTION: &str = "Passionate developer building innovative solutions.";

const CATEGORY_LABELS: &[(&str, &str)] = &[
    ("FE", "Frontend"),
    ("BE", "Backend"),
    ("DO", "DevOps"),
    ("AI", "AI/ML"),
    ("OT", "Other"),
];

const PROJECT_ICONS: &[(&str, &str)] = &[
    ("movie", "🎬"),
    ("google", "🔍"),
    ("portfolio", "💼"),
    ("e-commerce", "🛒"),
    ("blog", "📝"),
    ("chat", "💬"),
];
const DEFAULT_PROJECT_ICON: &str = "🚀";

const ROLE_ICONS: &[(&str, &str)] = &[
    ("intern", "🖥️"),
    ("junior", "🌱"),
    ("senior", "🚀"),
    ("lead", "👨‍💼"),
    ("developer", "💻"),
    ("engineer", "⚙️"),
    ("architect", "🏗️"),
];
const DEFAULT_ROLE_ICON: &str = "💼";

const PLATFORM_ICONS: &[&str] = &[
    "github", "linkedin", "twitter", "email", "medium", "kaggle", "instagram", "facebook", "youtube",
];

const MILLIS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Build the normalized record from whichever source produced `docs`.
pub fn transform(docs: &SourceDocuments, now: DateTime<Utc>) -> PortfolioContent {
    let raw = &docs.profile;
    let links = &docs.social_links;

    let profile = build_profile(raw, links);

    let hero = Hero {
        greeting: "Hi, I'm".into(),
        name: text_or(&raw.name, DEFAULT_NAME),
        title: text_or(&raw.tagline, DEFAULT_TITLE),
        tagline: match present(&raw.bio) {
            Some(bio) => format!("{}.", bio.split('.').next().unwrap_or("")),
            None => DEFAULT_TAGLINE.into(),
        },
        code_snippets: fallback::code_snippets(),
        cta_buttons: fallback::cta_buttons(),
    };

    let projects = ProjectsSection {
        title: "Featured Projects".into(),
        subtitle: "A collection of my recent work and contributions".into(),
        projects: docs.projects.iter().map(build_project).collect(),
        categories: std::iter::once("All".to_string())
            .chain(unique_categories(&docs.skills))
            .collect(),
    };

    let selected = select_skills(&docs.skills);
    let skills: Vec<String> = selected.iter().map(|s| s.name.clone()).collect();

    let works: Vec<Work> = docs.experience.iter().map(build_work).collect();

    let about = About {
        description: text_or(&raw.bio, DEFAULT_DESCRIPTION),
        skills: skills.clone(),
        skills_by_category: group_by_category(&selected),
        fun_facts: fallback::fun_facts(),
        experience: ExperienceSummary {
            years: years_of_experience(&works, now),
            projects: docs.projects.len(),
            latest_work: latest_work(&works, now),
            works: works.clone(),
        },
        interests: fallback::interests(),
    };

    let experience = ExperienceSection {
        title: "Work Experience".into(),
        subtitle: "A summary of my professional journey".into(),
        works,
    };

    let social = transform_social_links(links, raw);

    let mut contact = fallback::contact();
    contact.contact_info.email = email_from_links(links);
    contact.social_links = social.clone();

    let mut footer = fallback::footer(now.year());
    footer.social_links = social;

    PortfolioContent {
        profile,
        hero,
        projects,
        skills,
        about,
        experience,
        contact,
        navigation: fallback::navigation(),
        footer,
    }
}

fn build_profile(raw: &RawProfile, links: &[RawSocialLink]) -> Profile {
    let mut profile = Profile {
        name: text_or(&raw.name, DEFAULT_NAME),
        title: text_or(&raw.tagline, DEFAULT_TITLE),
        tagline: text_or(&raw.tagline, DEFAULT_TAGLINE),
        bio: text_or(&raw.bio, ""),
        profile_image: text_or(&raw.avatar, DEFAULT_AVATAR),
        email: email_from_links(links),
        location: None,
        github_url: text_or(&raw.github_url, ""),
        linkedin_url: text_or(&raw.linkedin_url, ""),
        twitter_url: text_or(&raw.twitter_url, ""),
        medium_url: text_or(&raw.medium_url, ""),
        kaggle_url: text_or(&raw.kaggle_url, ""),
        resume: text_or(&raw.resume, ""),
    };

    // First match per platform wins; URLs already on the profile are kept.
    for link in links {
        let platform = link.platform.to_lowercase();
        if platform.contains("github") && profile.github_url.is_empty() {
            profile.github_url = link.url.clone();
        }
        if platform.contains("linkedin") && profile.linkedin_url.is_empty() {
            profile.linkedin_url = link.url.clone();
        }
        if (platform.contains("twitter") || platform.contains('x')) && profile.twitter_url.is_empty() {
            profile.twitter_url = link.url.clone();
        }
        if platform.contains("medium") && profile.medium_url.is_empty() {
            profile.medium_url = link.url.clone();
        }
        if platform.contains("kaggle") && profile.kaggle_url.is_empty() {
            profile.kaggle_url = link.url.clone();
        }
    }

    profile
}

fn build_project(project: &RawProject) -> Project {
    Project {
        id: project.id,
        title: project.title.clone(),
        description: project.description.clone(),
        status: if project.is_featured { "Featured" } else { "Live" }.into(),
        category: project_category(&project.tech_stack).into(),
        link: text_or(&project.live_url, ""),
        github: text_or(&project.github_url, ""),
        tech: project.tech_stack.iter().map(|s| s.name.clone()).collect(),
        image: project.cover_image.clone(),
        icon: project_icon(&project.title).into(),
        featured: project.is_featured,
        slug: project.slug.clone(),
        bento_size: project.bento_size.clone(),
    }
}

fn build_work(exp: &RawExperience) -> Work {
    Work {
        id: exp.id,
        org: Organization {
            name: exp.company_name.clone(),
            website: text_or(&exp.company_website, "#"),
        },
        role: exp.role.clone(),
        duration: Tenure {
            from: exp.start_date.clone(),
            to: present(&exp.end_date).map(str::to_string),
        },
        location: text_or(&exp.location, "Remote"),
        description: text_or(&exp.description, ""),
        tech: exp.tech_stack.iter().map(|s| s.name.clone()).collect(),
        icon: role_icon(&exp.role).into(),
    }
}

/// Label for a two-letter category code; unknown or missing -> "Other".
pub fn category_label(code: Option<&str>) -> &'static str {
    code.and_then(|c| CATEGORY_LABELS.iter().find(|(k, _)| *k == c))
        .map(|(_, label)| *label)
        .unwrap_or("Other")
}

/// Category of the first tech-stack entry.
pub fn project_category(tech_stack: &[RawSkill]) -> &'static str {
    match tech_stack.first() {
        Some(skill) => category_label(skill.category.as_deref()),
        None => "Other",
    }
}

pub fn project_icon(title: &str) -> &'static str {
    first_keyword_match(title, PROJECT_ICONS).unwrap_or(DEFAULT_PROJECT_ICON)
}

pub fn role_icon(role: &str) -> &'static str {
    first_keyword_match(role, ROLE_ICONS).unwrap_or(DEFAULT_ROLE_ICON)
}

fn first_keyword_match(text: &str, table: &[(&str, &'static str)]) -> Option<&'static str> {
    let key = text.to_lowercase();
    table
        .iter()
        .find(|(keyword, _)| key.contains(keyword))
        .map(|(_, icon)| *icon)
}

fn unique_categories(skills: &[RawSkill]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for skill in skills {
        let label = category_label(skill.category.as_deref());
        if !seen.iter().any(|s| s == label) {
            seen.push(label.to_string());
        }
    }
    seen
}

fn group_by_category(skills: &[RawSkill]) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = Vec::new();
    for skill in skills {
        let label = category_label(skill.category.as_deref());
        let badge = SkillBadge {
            name: skill.name.clone(),
            icon_url: skill.icon_url.clone(),
        };
        match groups.iter_mut().find(|g| g.category == label) {
            Some(group) => group.skills.push(badge),
            None => groups.push(SkillGroup {
                category: label.to_string(),
                skills: vec![badge],
            }),
        }
    }
    groups
}

/// Highest proficiency first, then greedily fill the character budget.
///
/// The first `MIN_SKILLS` entries are always taken. After that a skill is
/// taken only while the running name length stays within
/// `SKILL_CHAR_BUDGET`; the first one that would overflow ends selection.
pub fn select_skills(skills: &[RawSkill]) -> Vec<RawSkill> {
    let mut sorted = skills.to_vec();
    sorted.sort_by(|a, b| {
        let (pa, pb) = (a.proficiency.unwrap_or(0.0), b.proficiency.unwrap_or(0.0));
        pb.partial_cmp(&pa).unwrap_or(Ordering::Equal)
    });

    let mut selected = Vec::new();
    let mut chars = 0;
    for skill in sorted {
        let len = skill.name.chars().count();
        if chars + len <= SKILL_CHAR_BUDGET || selected.len() < MIN_SKILLS {
            chars += len;
            selected.push(skill);
        } else {
            break;
        }
    }
    selected
}

/// `YYYY-MM-DD` or `YYYY-MM` (first of the month, midnight UTC), or RFC 3339.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let day = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d"));
    if let Ok(date) = day {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whole years since the earliest start date, as "{n}+". "0" without history.
pub fn years_of_experience(works: &[Work], now: DateTime<Utc>) -> String {
    let earliest = works
        .iter()
        .filter_map(|w| parse_date(&w.duration.from))
        .min();

    match earliest {
        Some(start) => {
            let millis = (now - start).num_milliseconds() as f64;
            let years = (millis / MILLIS_PER_YEAR).floor().max(0.0) as i64;
            format!("{}+", years)
        }
        None => "0".into(),
    }
}

/// The entry with the latest start date, if it is still ongoing at `now`.
///
/// Ties keep the earlier entry. An entry whose end date has passed yields
/// `None`; the second most recent entry is never considered.
pub fn latest_work(works: &[Work], now: DateTime<Utc>) -> Option<Work> {
    let mut latest = works.first()?;
    for work in &works[1..] {
        if let (Some(candidate), Some(current)) =
            (parse_date(&work.duration.from), parse_date(&latest.duration.from))
        {
            if candidate > current {
                latest = work;
            }
        }
    }

    let ended = latest
        .duration
        .to
        .as_deref()
        .and_then(parse_date)
        .map(|to| to < now)
        .unwrap_or(false);

    if ended {
        None
    } else {
        Some(latest.clone())
    }
}

/// Address from the first `email` platform or `mailto:` link.
pub fn email_from_links(links: &[RawSocialLink]) -> String {
    links
        .iter()
        .find(|l| l.platform.to_lowercase() == "email" || l.url.contains("mailto:"))
        .map(|l| l.url.replace("mailto:", ""))
        .unwrap_or_else(|| fallback::CONTACT_EMAIL.to_string())
}

/// Links for the contact and footer sections.
///
/// Without API links, four defaults are built from the profile URLs.
pub fn transform_social_links(links: &[RawSocialLink], profile: &RawProfile) -> Vec<SocialLink> {
    if links.is_empty() {
        let link = |platform: &str, url: String, icon: &str| SocialLink {
            platform: platform.into(),
            url,
            icon: icon.into(),
        };
        return vec![
            link("GitHub", text_or(&profile.github_url, "https://github.com"), "github"),
            link("LinkedIn", text_or(&profile.linkedin_url, "https://linkedin.com"), "linkedin"),
            link("Twitter", text_or(&profile.twitter_url, "https://twitter.com"), "twitter"),
            link("Email", format!("mailto:{}", email_from_links(links)), "email"),
        ];
    }

    links
        .iter()
        .map(|l| SocialLink {
            platform: l.platform.clone(),
            url: l.url.clone(),
            icon: platform_icon(&l.platform).into(),
        })
        .collect()
}

pub fn platform_icon(platform: &str) -> &'static str {
    let key = platform.to_lowercase();
    PLATFORM_ICONS
        .iter()
        .find(|p| **p == key)
        .copied()
        .unwrap_or("link")
}

/// Empty strings count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn text_or(value: &Option<String>, default: &str) -> String {
    present(value).unwrap_or(default).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BackupDocument;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    fn skill(name: &str, proficiency: f64) -> RawSkill {
        RawSkill {
            name: name.into(),
            proficiency: Some(proficiency),
            ..Default::default()
        }
    }

    fn work(from: &str, to: Option<&str>) -> Work {
        Work {
            id: None,
            org: Organization { name: "Acme".into(), website: "#".into() },
            role: "Engineer".into(),
            duration: Tenure { from: from.into(), to: to.map(str::to_string) },
            location: "Remote".into(),
            description: String::new(),
            tech: vec![],
            icon: "⚙️".into(),
        }
    }

    fn link(platform: &str, url: &str) -> RawSocialLink {
        RawSocialLink { platform: platform.into(), url: url.into() }
    }

    #[test]
    fn test_select_skills_below_minimum_ignores_budget() {
        let skills = vec![skill("Python", 9.0), skill("Go", 5.0), skill("C", 1.0)];
        let names: Vec<_> = select_skills(&skills).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Python", "Go", "C"]);
    }

    #[test]
    fn test_select_skills_minimum_overrides_budget() {
        let long = "x".repeat(40);
        let skills: Vec<_> = (0..8).map(|i| skill(&format!("{}{}", long, i), 8.0 - i as f64)).collect();
        let selected = select_skills(&skills);
        // six forced in (246 chars), the seventh overflows and ends selection
        assert_eq!(selected.len(), MIN_SKILLS);
    }

    #[test]
    fn test_select_skills_stops_at_first_overflow() {
        let mut skills: Vec<_> = (0..6).map(|i| skill(&format!("s{:02}", i), 10.0)).collect(); // 18 chars
        skills.push(skill(&"a".repeat(90), 5.0)); // 108
        skills.push(skill("abc", 4.0)); // 111 > 110
        skills.push(skill("z", 3.0)); // would fit, but selection already stopped
        let names: Vec<_> = select_skills(&skills).into_iter().map(|s| s.name).collect();
        assert_eq!(names.len(), 7);
        assert!(!names.contains(&"z".to_string()));
    }

    #[test]
    fn test_select_skills_sorts_missing_proficiency_last() {
        let skills = vec![
            RawSkill { name: "Unrated".into(), ..Default::default() },
            skill("Rust", 10.0),
        ];
        let names: Vec<_> = select_skills(&skills).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Rust", "Unrated"]);
    }

    #[test]
    fn test_latest_work_current_when_open_ended() {
        let works = vec![work("2022-01-01", Some("2023-01-01")), work("2023-06-01", None)];
        let latest = latest_work(&works, now()).unwrap();
        assert_eq!(latest.duration.from, "2023-06-01");
    }

    #[test]
    fn test_latest_work_ended_is_none() {
        let works = vec![work("2021-01-01", None), work("2023-06-01", Some("2024-01-01"))];
        assert_eq!(latest_work(&works, now()), None);
    }

    #[test]
    fn test_latest_work_future_end_is_current() {
        let works = vec![work("2023-06-01", Some("2030-01-01"))];
        assert!(latest_work(&works, now()).is_some());
        assert_eq!(latest_work(&[], now()), None);
    }

    #[test]
    fn test_years_of_experience() {
        let works = vec![work("2023-06-01", None), work("2021-02-01", Some("2021-03-31"))];
        assert_eq!(years_of_experience(&works, now()), "4+");
        assert_eq!(years_of_experience(&[], now()), "0");
    }

    #[test]
    fn test_month_only_dates() {
        assert_eq!(parse_date("2021-08"), Utc.with_ymd_and_hms(2021, 8, 1, 0, 0, 0).single());
        assert_eq!(parse_date("2021-13"), None);
        assert_eq!(parse_date("2021"), None);

        let works = vec![work("2020-01", None)];
        assert_eq!(years_of_experience(&works, now()), "5+");

        let ended = vec![work("2023-06", Some("2024-12"))];
        assert_eq!(latest_work(&ended, now()), None);
        let ongoing = vec![work("2021-08", None), work("2023-06", Some("2025-04"))];
        assert_eq!(latest_work(&ongoing, now()).unwrap().duration.from, "2023-06");
    }

    #[test]
    fn test_category_and_icons() {
        assert_eq!(category_label(Some("AI")), "AI/ML");
        assert_eq!(category_label(Some("XX")), "Other");
        assert_eq!(category_label(None), "Other");
        assert_eq!(project_category(&[]), "Other");
        assert_eq!(project_icon("My Movie Finder"), "🎬");
        assert_eq!(project_icon("Google Chat clone"), "🔍"); // table order, not title order
        assert_eq!(project_icon("Compiler"), "🚀");
        assert_eq!(role_icon("Senior Software Engineer"), "🚀");
        assert_eq!(role_icon("Member Technical Staff"), "💼");
    }

    #[test]
    fn test_social_links_first_match_wins() {
        let links = vec![
            link("GitHub", "https://github.com/first"),
            link("github", "https://github.com/second"),
            link("X", "https://x.com/me"),
            link("Twitter", "https://twitter.com/me"),
            link("Email", "mailto:me@example.org"),
        ];
        let raw = RawProfile {
            linkedin_url: Some("https://linkedin.com/in/me".into()),
            ..Default::default()
        };
        let profile = build_profile(&raw, &links);
        assert_eq!(profile.github_url, "https://github.com/first");
        assert_eq!(profile.twitter_url, "https://x.com/me");
        assert_eq!(profile.linkedin_url, "https://linkedin.com/in/me");
        assert_eq!(profile.email, "me@example.org");
        assert_eq!(profile.medium_url, "");
    }

    #[test]
    fn test_profile_defaults() {
        let profile = build_profile(&RawProfile { name: Some(String::new()), ..Default::default() }, &[]);
        assert_eq!(profile.name, "Developer");
        assert_eq!(profile.title, "Full Stack Developer");
        assert_eq!(profile.tagline, "Building amazing things");
        assert_eq!(profile.profile_image, "/images/profile.jpg");
        assert_eq!(profile.email, fallback::CONTACT_EMAIL);
    }

    #[test]
    fn test_default_social_links_without_api_links() {
        let raw = RawProfile { github_url: Some("https://github.com/me".into()), ..Default::default() };
        let links = transform_social_links(&[], &raw);
        assert_eq!(links.len(), 4);
        assert_eq!(links[0].url, "https://github.com/me");
        assert_eq!(links[1].url, "https://linkedin.com");
        assert_eq!(links[3].url, format!("mailto:{}", fallback::CONTACT_EMAIL));

        let links = transform_social_links(&[link("Mastodon", "https://m.social/@me")], &raw);
        assert_eq!(links[0].icon, "link");
    }

    #[test]
    fn test_transform_projects_and_categories() {
        let docs = SourceDocuments {
            projects: vec![RawProject {
                id: Some(1),
                title: "Chat Server".into(),
                is_featured: true,
                tech_stack: vec![RawSkill { name: "Rust".into(), category: Some("BE".into()), ..Default::default() }],
                ..Default::default()
            }],
            skills: vec![
                RawSkill { name: "React".into(), category: Some("FE".into()), ..Default::default() },
                RawSkill { name: "Rust".into(), category: Some("BE".into()), ..Default::default() },
                RawSkill { name: "Vue".into(), category: Some("FE".into()), ..Default::default() },
            ],
            ..Default::default()
        };
        let content = transform(&docs, now());
        let project = &content.projects.projects[0];
        assert_eq!(project.status, "Featured");
        assert_eq!(project.category, "Backend");
        assert_eq!(project.icon, "💬");
        assert_eq!(project.tech, vec!["Rust"]);
        assert_eq!(content.projects.categories, vec!["All", "Frontend", "Backend"]);
        assert_eq!(content.about.skills_by_category[0].skills.len(), 2);
        assert_eq!(content.about.experience.projects, 1);
    }

    #[test]
    fn test_hero_tagline_is_first_sentence() {
        let docs = SourceDocuments {
            profile: RawProfile { bio: Some("Builds things. Breaks things.".into()), ..Default::default() },
            ..Default::default()
        };
        let content = transform(&docs, now());
        assert_eq!(content.hero.tagline, "Builds things.");
        assert_eq!(content.about.description, "Builds things. Breaks things.");
    }

    #[test]
    fn test_backup_and_combined_remote_produce_same_content() {
        let json = r#"{
            "profile": {"name": "Sam", "tagline": "Systems Engineer", "bio": "Writes Rust."},
            "projects": [{"id": 1, "title": "Blog Engine", "description": "Static site", "tech_stack": [{"name": "Rust", "category": "BE"}]}],
            "skills": [{"name": "Rust", "category": "BE", "proficiency": 9}],
            "experience": [{"id": 1, "company_name": "Acme", "role": "Lead Engineer", "start_date": "2020-01-01", "end_date": null}],
            "social_links": [{"platform": "GitHub", "url": "https://github.com/sam"}]
        }"#;
        let doc: BackupDocument = serde_json::from_str(json).unwrap();
        let from_backup = transform(&SourceDocuments::from(doc.clone()), now());

        let combined = SourceDocuments {
            profile: doc.profile.clone().unwrap(),
            projects: doc.projects.clone().unwrap(),
            skills: doc.skills.clone().unwrap(),
            experience: doc.experience.clone().unwrap(),
            social_links: doc.social_links.clone().unwrap(),
        };
        assert_eq!(transform(&combined, now()), from_backup);
        assert_eq!(from_backup.about.experience.years, "5+");
        assert_eq!(from_backup.about.experience.latest_work.unwrap().icon, "👨‍💼");
    }
}

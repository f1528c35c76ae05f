//! Hard-coded portfolio bundle
//!
//! Shown when neither the API nor the backup document can be loaded.
//! Also supplies the fixed pieces (snippets, fun facts, contact form,
//! navigation, footer) that the transform reuses for every source.

use chrono::{DateTime, Datelike, Utc};

use crate::content::{
    About, Contact, ContactInfo, Copyright, CtaButton, ExperienceSection, ExperienceSummary,
    Footer, FormField, FunFact, Hero, Logo, MenuItem, Navigation, Organization, PortfolioContent,
    Profile, Project, ProjectsSection, QuickLink, SkillBadge, SkillGroup, SocialLink, SubmitButton,
    Tenure, ThemeOptions, Work,
};
use crate::theme::Theme;
use crate::transform;

/// Used whenever no email link is available.
pub const CONTACT_EMAIL: &str = "hello@folio.dev";

const NAME: &str = "Alex Rivera";
const TITLE: &str = "Backend Engineer";
const TAGLINE: &str = "Innovating through code and automation";
const BIO: &str = "Backend and platform engineer focused on API development, automation and \
                   developer tooling. Always eager to learn and apply new technologies.";

/// The whole fallback bundle, with derived fields evaluated at `now`.
pub fn content(now: DateTime<Utc>) -> PortfolioContent {
    let works = works();
    let projects = projects();
    let skills: Vec<String> = [
        "Python", "Django", "FastAPI", "Java", "JavaScript", "React", "DevOps", "Docker", "Linux",
        "Git", "CI/CD", "API Development",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let about = About {
        description: "Backend and platform engineer with several years of professional \
                      experience building scalable services, CI/CD pipelines and robust APIs. \
                      When not coding: motorsport, cooking, and planning the next road trip."
            .into(),
        skills: skills.clone(),
        skills_by_category: vec![SkillGroup {
            category: "Other".into(),
            skills: skills
                .iter()
                .map(|name| SkillBadge { name: name.clone(), icon_url: None })
                .collect(),
        }],
        fun_facts: fun_facts(),
        experience: ExperienceSummary {
            years: transform::years_of_experience(&works, now),
            projects: projects.len(),
            latest_work: transform::latest_work(&works, now),
            works: works.clone(),
        },
        interests: interests(),
    };

    PortfolioContent {
        profile: Profile {
            name: NAME.into(),
            title: TITLE.into(),
            tagline: TAGLINE.into(),
            bio: BIO.into(),
            profile_image: "/images/profile.jpg".into(),
            email: CONTACT_EMAIL.into(),
            location: Some("India".into()),
            ..Default::default()
        },
        hero: Hero {
            greeting: "Hi, I'm".into(),
            name: NAME.into(),
            title: TITLE.into(),
            tagline: TAGLINE.into(),
            code_snippets: code_snippets(),
            cta_buttons: cta_buttons(),
        },
        projects: ProjectsSection {
            title: "Featured Projects".into(),
            subtitle: "A collection of my recent work and contributions".into(),
            projects,
            categories: ["All", "Web Development", "Data Science", "DevOps", "Mobile"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        },
        skills,
        about,
        experience: ExperienceSection {
            title: "Work Experience".into(),
            subtitle: "A summary of my professional journey".into(),
            works,
        },
        contact: contact(),
        navigation: navigation(),
        footer: footer(now.year()),
    }
}

pub fn code_snippets() -> Vec<String> {
    [
        r#"const ME = "Software Developer";"#,
        "function innovate() { return future; }",
        "while(learning) { evolve(); }",
        r#"ME.find("thrill_in_speed"); // F1 & road trips"#,
        r#"ME.create("culinary_masterpieces"); // Cooking & baking"#,
        "return ME.readyForNextChallenge();",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn cta_buttons() -> Vec<CtaButton> {
    vec![
        CtaButton { text: "View My Work".into(), href: "#projects".into(), primary: true },
        CtaButton { text: "Get In Touch".into(), href: "#contact".into(), primary: false },
    ]
}

pub fn fun_facts() -> Vec<FunFact> {
    [("🏎️", "Racing"), ("🎨", "Art"), ("🌙", "Dreams")]
        .iter()
        .map(|(emoji, text)| FunFact { emoji: emoji.to_string(), text: text.to_string() })
        .collect()
}

pub fn interests() -> Vec<String> {
    [
        "Formula 1 Racing",
        "Culinary Arts",
        "Cloud Architecture",
        "Open Source Contributions",
        "Travel & Photography",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn contact() -> Contact {
    let field = |name: &str, label: &str, kind: &str, placeholder: &str| FormField {
        name: name.into(),
        label: label.into(),
        kind: kind.into(),
        required: true,
        placeholder: placeholder.into(),
    };

    Contact {
        title: "Get In Touch".into(),
        subtitle: "Let's discuss your next project or opportunity".into(),
        contact_info: ContactInfo {
            email: CONTACT_EMAIL.into(),
            phone: "+1 (555) 123-4567".into(),
            location: "India".into(),
            availability: "Available for freelance and full-time opportunities".into(),
        },
        social_links: vec![
            social("GitHub", "https://github.com/folio-dev", "github"),
            social("LinkedIn", "https://linkedin.com/in/folio-dev", "linkedin"),
            social("Twitter", "https://twitter.com/folio-dev", "twitter"),
            social("Email", &format!("mailto:{}", CONTACT_EMAIL), "email"),
        ],
        form_fields: vec![
            field("name", "Full Name", "text", "Enter your full name"),
            field("email", "Email Address", "email", "Enter your email address"),
            field("subject", "Subject", "text", "What's this about?"),
            field("message", "Message", "textarea", "Tell me about your project or inquiry"),
        ],
        submit_button: SubmitButton {
            text: "Send Message".into(),
            loading_text: "Sending...".into(),
            success_text: "Message Sent!".into(),
        },
    }
}

pub fn navigation() -> Navigation {
    let item = |label: &str, id: &str| MenuItem {
        label: label.into(),
        href: format!("#{}", id),
        id: id.into(),
    };

    Navigation {
        logo: Logo { text: "FOLIO".into(), id: "home".into(), href: "#home".into() },
        menu_items: vec![item("About", "about"), item("Projects", "projects"), item("Contact", "contact")],
        theme: ThemeOptions {
            current: Theme::Dark,
            options: vec![Theme::Light, Theme::Dark],
        },
    }
}

pub fn footer(year: i32) -> Footer {
    Footer {
        copyright: Copyright {
            year,
            text: "All rights reserved.".into(),
            owner: NAME.into(),
            note: "Built with Rust, ratatui and too much coffee".into(),
        },
        social_links: vec![
            social("GitHub", "https://github.com/folio-dev", "github"),
            social("LinkedIn", "https://linkedin.com/in/folio-dev", "linkedin"),
            social("Twitter", "https://twitter.com/folio-dev", "twitter"),
        ],
        quick_links: vec![
            QuickLink { label: "Privacy Policy".into(), href: "/privacy".into() },
            QuickLink { label: "Terms of Service".into(), href: "/terms".into() },
        ],
    }
}

fn social(platform: &str, url: &str, icon: &str) -> SocialLink {
    SocialLink { platform: platform.into(), url: url.into(), icon: icon.into() }
}

fn projects() -> Vec<Project> {
    vec![
        Project {
            id: Some(1),
            title: "Movie Lens Explorer".into(),
            description: "Data visualization and prediction system for movie recommendations \
                          using machine learning and interactive dashboards."
                .into(),
            status: "Live".into(),
            category: "Data Science".into(),
            link: "https://folio.dev/movie-lens".into(),
            github: String::new(),
            tech: vec!["Python".into(), "Machine Learning".into(), "Data Visualization".into(), "Jupyter".into()],
            image: Some("movie".into()),
            icon: "🎬".into(),
            featured: true,
            slug: Some("movie-lens-explorer".into()),
            bento_size: None,
        },
        Project {
            id: Some(2),
            title: "Search Engine Clone".into(),
            description: "A replica of a search engine front page with responsive layout \
                          and query suggestions."
                .into(),
            status: "Live".into(),
            category: "Web Development".into(),
            link: "https://folio.dev/search".into(),
            github: String::new(),
            tech: vec!["HTML".into(), "CSS".into(), "JavaScript".into(), "Responsive Design".into()],
            image: Some("search".into()),
            icon: "🔍".into(),
            featured: true,
            slug: Some("search-engine-clone".into()),
            bento_size: None,
        },
    ]
}

fn works() -> Vec<Work> {
    let work = |id: u64, org: &str, site: &str, role: &str, from: &str, to: Option<&str>, tech: &[&str]| Work {
        id: Some(id),
        org: Organization { name: org.into(), website: site.into() },
        role: role.into(),
        duration: Tenure { from: from.into(), to: to.map(str::to_string) },
        location: "Remote".into(),
        description: String::new(),
        tech: tech.iter().map(|s| s.to_string()).collect(),
        icon: transform::role_icon(role).into(),
    };

    vec![
        work(1, "Northwind Labs", "https://northwind.example", "Virtual Intern",
            "2021-02-01", Some("2021-03-31"), &["Python", "TensorFlow", "OpenCV"]),
        work(2, "Bluebird Studio", "https://bluebird.example", "Junior Backend Developer",
            "2021-08-02", Some("2022-08-06"), &["Django", "Docker", "Celery"]),
        work(3, "Harbor Systems", "https://harbor.example", "Backend Developer",
            "2022-08-10", Some("2022-10-31"), &["Django", "AWS EC2", "GitLab"]),
        work(4, "Meridian Corp", "https://meridian.example", "Member Technical Staff",
            "2022-11-21", None, &["Java", "FastAPI", "Kafka", "Linux"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fallback_latest_work_is_open_ended_entry() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let content = content(now);
        let latest = content.about.experience.latest_work.unwrap();
        assert_eq!(latest.org.name, "Meridian Corp");
        assert_eq!(content.about.experience.years, "3+");
        assert_eq!(content.footer.copyright.year, 2025);
    }

    #[test]
    fn test_fallback_skills_mirror_about() {
        let content = content(Utc::now());
        assert_eq!(content.skills, content.about.skills);
        assert_eq!(content.profile.email, CONTACT_EMAIL);
        assert_eq!(content.navigation.theme.options, vec![Theme::Light, Theme::Dark]);
    }
}

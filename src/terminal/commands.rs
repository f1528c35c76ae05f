//! Command vocabulary and precomputed output blocks

use std::collections::BTreeMap;

use crate::content::PortfolioContent;
use crate::transform::parse_date;

pub struct CommandEntry {
    pub names: &'static [&'static str],
    pub description: &'static str,
}

pub struct CommandGroup {
    pub description: &'static str,
    pub entries: &'static [CommandEntry],
}

/// Everything the terminal offers for completion, grouped for `help`.
pub const GROUPS: &[CommandGroup] = &[
    CommandGroup {
        description: "Basic System Commands",
        entries: &[
            CommandEntry { names: &["cd"], description: "Change directory" },
            CommandEntry { names: &["cls", "clear"], description: "Clear the terminal screen" },
            CommandEntry { names: &["echo", "print"], description: "Display a line of text" },
            CommandEntry { names: &["cat"], description: "Display the contents of a file" },
            CommandEntry { names: &["whoami", "id"], description: "Display the current user" },
            CommandEntry { names: &["help", "man", "info", "?"], description: "Display help information" },
        ],
    },
    CommandGroup {
        description: "Profile Related Commands",
        entries: &[
            CommandEntry { names: &["about"], description: "Display information about the user" },
            CommandEntry { names: &["skills"], description: "Display information about the user's skills" },
            CommandEntry {
                names: &["experience", "education", "qualifications"],
                description: "Display information about the user's work/education information",
            },
            CommandEntry { names: &["projects"], description: "Display information about the user's projects" },
            CommandEntry { names: &["contact"], description: "Display contact information" },
        ],
    },
];

/// Flat completion list, in help order.
pub fn vocabulary() -> Vec<String> {
    GROUPS
        .iter()
        .flat_map(|g| g.entries.iter())
        .flat_map(|e| e.names.iter())
        .map(|n| n.to_string())
        .collect()
}

/// Command listing drawn as one tree per group.
pub fn help_text() -> String {
    let mut lines: Vec<String> = Vec::new();
    for group in GROUPS {
        lines.push(group.description.to_string());
        for entry in group.entries {
            lines.push(format!("├──{} - {}", entry.names.join(", "), entry.description));
        }
        if let Some(last) = lines.last_mut() {
            *last = last.replacen('├', "└", 1);
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Output text for each command that prints a fixed block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandTable {
    blocks: BTreeMap<&'static str, String>,
}

impl CommandTable {
    pub fn from_content(content: &PortfolioContent) -> Self {
        let mut blocks = BTreeMap::new();
        blocks.insert("about", about_block(content));
        blocks.insert("skills", skills_block(content));
        blocks.insert("experience", experience_block(content));
        blocks.insert("projects", projects_block(content));
        blocks.insert("contact", contact_block(content));
        blocks.insert(
            "help",
            format!("🔥 Available Commands:\n{}\nTip: Use Tab for auto-completion!\n", help_text()),
        );
        blocks.insert("whoami", format!("{} - {}", content.profile.name, content.profile.title));
        Self { blocks }
    }

    /// Exact, already lower-cased command name.
    pub fn get(&self, command: &str) -> Option<&str> {
        self.blocks.get(command).map(String::as_str)
    }

    pub fn commands(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.blocks.keys().copied()
    }
}

fn about_block(content: &PortfolioContent) -> String {
    let profile = &content.profile;
    let location = profile
        .location
        .clone()
        .unwrap_or_else(|| content.contact.contact_info.location.clone());
    format!(
        "👋 Hi! I'm {}, {}.\n\n\
         🎯 Current Focus: Building scalable software solutions with modern technologies\n\
         💼 Experience: {} years in software development\n\
         🌍 Location: {}\n\
         🎓 Always learning and exploring new technologies",
        profile.name, profile.title, content.about.experience.years, location
    )
}

fn skills_block(content: &PortfolioContent) -> String {
    let mut out = String::from("🛠️ Technical Skills:\n");
    for group in &content.about.skills_by_category {
        out.push_str(&format!("\n{}:\n", group.category));
        for (i, skill) in group.skills.iter().enumerate() {
            let branch = if i + 1 == group.skills.len() { "└──" } else { "├──" };
            out.push_str(&format!("{} {}\n", branch, skill.name));
        }
    }
    out
}

fn experience_block(content: &PortfolioContent) -> String {
    let mut out = String::from("💼 Professional Experience:\n");
    for work in &content.experience.works {
        let to = work
            .duration
            .to
            .as_deref()
            .map(short_date)
            .unwrap_or_else(|| "Present".to_string());
        out.push_str(&format!(
            "\n  {} {} | {}\n  📅 {} - {}\n",
            work.icon,
            work.role,
            work.org.name,
            short_date(&work.duration.from),
            to
        ));
    }
    out
}

fn projects_block(content: &PortfolioContent) -> String {
    let mut out = format!("🚀 {}:\n", content.projects.title);
    for project in &content.projects.projects {
        out.push_str(&format!(
            "\n  {} {} [{}] - {}\n  {}\n",
            project.icon, project.title, project.status, project.category, project.description
        ));
        if !project.link.is_empty() {
            out.push_str(&format!("  🔗 {}\n", project.link));
        }
    }
    out
}

fn contact_block(content: &PortfolioContent) -> String {
    let mut out = format!("📬 Let's Connect!\n\n📧 Email: {}\n", content.contact.contact_info.email);
    for link in content.contact.social_links.iter().filter(|l| l.icon != "email") {
        out.push_str(&format!("🔗 {}: {}\n", link.platform, link.url));
    }
    out.push_str(
        "\n💬 Open for:\n\
         • Full-time opportunities\n\
         • Freelance projects\n\
         • Technical discussions\n\
         • Collaboration on open source\n\n\
         Feel free to reach out! I usually respond within 24 hours.",
    );
    out
}

/// "2021-02-01" -> "Feb 2021"; unparseable input is returned unchanged.
pub fn short_date(date: &str) -> String {
    parse_date(date)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| date.to_string())
}

//! The canonical structured résumé shape.
//!
//! Every field beyond `name`/`title` is optional on the wire
//! (`#[serde(default)]`) so a tailoring delta that omits a section still
//! deserializes; `ResumeDocument::merged_over` then fills the gaps from the
//! original document.

use serde::{Deserialize, Serialize};

/// Opaque date-like strings — "2021-03", "March 2021", "Present" are all
/// valid. Never parsed as calendar dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub linkedin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub stack: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub stack: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub period: Period,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageSkill {
    pub language: String,
    #[serde(default)]
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub url: String,
}

/// One tailoring edit — what was altered and why. Produced by the model
/// during tailoring so the user can audit the changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub section: String,
    pub description: String,
    #[serde(default)]
    pub reason: String,
}

/// The canonical structured résumé document.
///
/// Invariant: `name` and `title` are non-empty for any accepted document
/// (enforced in `generation::extract`, not here — the type also carries
/// partial deltas during tailoring).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub languages: Vec<LanguageSkill>,
    #[serde(default)]
    pub publications: Vec<Publication>,
    #[serde(default)]
    pub personality_traits: Vec<String>,
    #[serde(default)]
    pub changes: Vec<Change>,
}

impl ResumeDocument {
    /// Merges this document (a tailoring delta) over `original`.
    ///
    /// Delta fields win; anything the model omitted (empty string or empty
    /// list) falls back to the original — a partial update, not a full
    /// replacement. `changes` is the one exception: it describes THIS
    /// tailoring pass and is never inherited from the original.
    pub fn merged_over(self, original: &ResumeDocument) -> ResumeDocument {
        ResumeDocument {
            name: keep_text(self.name, &original.name),
            title: keep_text(self.title, &original.title),
            contact: Contact {
                email: keep_text(self.contact.email, &original.contact.email),
                phone: keep_text(self.contact.phone, &original.contact.phone),
                location: keep_text(self.contact.location, &original.contact.location),
                website: keep_text(self.contact.website, &original.contact.website),
                linkedin: keep_text(self.contact.linkedin, &original.contact.linkedin),
            },
            summary: keep_text(self.summary, &original.summary),
            skills: keep_list(self.skills, &original.skills),
            experience: keep_list(self.experience, &original.experience),
            projects: keep_list(self.projects, &original.projects),
            education: keep_list(self.education, &original.education),
            certifications: keep_list(self.certifications, &original.certifications),
            languages: keep_list(self.languages, &original.languages),
            publications: keep_list(self.publications, &original.publications),
            personality_traits: keep_list(self.personality_traits, &original.personality_traits),
            changes: self.changes,
        }
    }
}

fn keep_text(delta: String, original: &str) -> String {
    if delta.trim().is_empty() {
        original.to_string()
    } else {
        delta
    }
}

fn keep_list<T: Clone>(delta: Vec<T>, original: &[T]) -> Vec<T> {
    if delta.is_empty() {
        original.to_vec()
    } else {
        delta
    }
}

//! Structured resume record produced from oracle JSON.
//!
//! The oracle does not enforce the schema, so every record is built leniently
//! from a `serde_json::Value`: missing keys default to empty and nothing here
//! fails. Numbers and booleans are rendered as strings only in display fields.
//! Fields that feed the keyword gap (skill lists, project and certification
//! fields) take strings only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
    pub gpa: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub position: String,
    pub company: String,
    pub duration: String,
    pub location: String,
    pub responsibilities: Vec<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub duration: String,
    pub key_features: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub language: String,
    pub proficiency: String,
}

/// Full structured resume. Every key is always present when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResume {
    pub personal_info: PersonalInfo,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    /// Category name → skills, e.g. `programming_languages → [Rust, Go]`.
    pub technical_skills: BTreeMap<String, Vec<String>>,
    pub soft_skills: Vec<String>,
    pub certifications: Vec<Certification>,
    pub languages: Vec<Language>,
}

impl ParsedResume {
    /// Builds a resume from arbitrary oracle JSON. A non-object yields the empty resume.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let personal = obj.get("personal_info").and_then(Value::as_object);
        let personal_info = PersonalInfo {
            full_name: text_field(personal, "full_name"),
            email: text_field(personal, "email"),
            phone: text_field(personal, "phone"),
            location: text_field(personal, "location"),
            linkedin: text_field(personal, "linkedin"),
            github: text_field(personal, "github"),
            portfolio: text_field(personal, "portfolio"),
            summary: text_field(personal, "summary"),
        };

        let technical_skills = obj
            .get("technical_skills")
            .and_then(Value::as_object)
            .map(|categories| {
                categories
                    .iter()
                    .map(|(category, skills)| (category.clone(), text_list(Some(skills))))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            personal_info,
            education: records(obj.get("education"), "degree", |o| Education {
                degree: text_field(o, "degree"),
                institution: text_field(o, "institution"),
                year: text_field(o, "year"),
                gpa: text_field(o, "gpa"),
                location: text_field(o, "location"),
            }),
            experience: records(obj.get("experience"), "position", |o| Experience {
                position: text_field(o, "position"),
                company: text_field(o, "company"),
                duration: text_field(o, "duration"),
                location: text_field(o, "location"),
                responsibilities: text_list(o.and_then(|o| o.get("responsibilities"))),
                achievements: text_list(o.and_then(|o| o.get("achievements"))),
            }),
            projects: records(obj.get("projects"), "name", |o| Project {
                name: string_field(o, "name"),
                description: string_field(o, "description"),
                technologies: text_list(o.and_then(|o| o.get("technologies"))),
                duration: string_field(o, "duration"),
                key_features: text_list(o.and_then(|o| o.get("key_features"))),
            }),
            technical_skills,
            soft_skills: soft_skills(obj.get("soft_skills")),
            certifications: records(obj.get("certifications"), "name", |o| Certification {
                name: string_field(o, "name"),
                issuer: string_field(o, "issuer"),
                year: string_field(o, "year"),
            }),
            languages: records(obj.get("languages"), "language", |o| Language {
                language: text_field(o, "language"),
                proficiency: text_field(o, "proficiency"),
            }),
        }
    }
}

impl Project {
    /// The scalar text fields, in schema order.
    pub fn text_fields(&self) -> [&str; 3] {
        [self.name.as_str(), self.description.as_str(), self.duration.as_str()]
    }
}

impl Certification {
    /// The scalar text fields, in schema order.
    pub fn text_fields(&self) -> [&str; 3] {
        [self.name.as_str(), self.issuer.as_str(), self.year.as_str()]
    }
}

/// Scalar → string. Strings are trimmed; numbers and bools are rendered; anything else is empty.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Trimmed string; every other JSON type is skipped.
fn string_text(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_string())
}

fn text_field(obj: Option<&Map<String, Value>>, key: &str) -> String {
    obj.and_then(|o| o.get(key))
        .and_then(scalar_text)
        .unwrap_or_default()
}

fn string_field(obj: Option<&Map<String, Value>>, key: &str) -> String {
    obj.and_then(|o| o.get(key))
        .and_then(string_text)
        .unwrap_or_default()
}

/// A list of strings. A lone string becomes a one-element list.
fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(string_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(other) => string_text(other)
            .filter(|s| !s.is_empty())
            .into_iter()
            .collect(),
        None => Vec::new(),
    }
}

/// Soft skills are usually plain strings; object items contribute their string values.
fn soft_skills(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return text_list(value);
    };
    items
        .iter()
        .flat_map(|item| match item {
            Value::Object(o) => o.values().filter_map(string_text).collect::<Vec<_>>(),
            other => string_text(other).into_iter().collect::<Vec<_>>(),
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Maps each array item through `build`. A bare string item becomes a record with
/// only `name_key` set; other non-object items are skipped.
fn records<T>(
    value: Option<&Value>,
    name_key: &str,
    build: impl Fn(Option<&Map<String, Value>>) -> T,
) -> Vec<T> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(o) => Some(build(Some(o))),
            Value::String(s) if !s.trim().is_empty() => {
                let mut synthetic = Map::new();
                synthetic.insert(name_key.to_string(), Value::String(s.clone()));
                Some(build(Some(&synthetic)))
            }
            _ => None,
        })
        .collect()
}

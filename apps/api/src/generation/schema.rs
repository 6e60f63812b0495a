//! JSON schema for the forced résumé tool call.
//!
//! Mirrors `models::resume::ResumeDocument`. Forcing a named function call
//! with this schema eliminates prose wrapped around JSON — there is nothing
//! to scrape, only `arguments` to parse.

use serde_json::{json, Value};

use crate::llm_client::ToolSpec;

/// Name of the single function the model must call for structured output.
pub const RESUME_TOOL_NAME: &str = "submit_resume";

pub fn resume_tool() -> ToolSpec {
    ToolSpec::function(
        RESUME_TOOL_NAME,
        "Submit the structured CV document. Always call this function; never reply with plain text.",
        resume_schema(),
    )
}

fn period_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "start": { "type": "string", "description": "Opaque date text, e.g. '2021-03' or 'March 2021'" },
            "end": { "type": "string", "description": "Opaque date text or 'Present'" }
        }
    })
}

pub fn resume_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "title"],
        "properties": {
            "name": { "type": "string", "description": "Full name of the candidate" },
            "title": { "type": "string", "description": "Professional title or headline" },
            "contact": {
                "type": "object",
                "properties": {
                    "email": { "type": "string" },
                    "phone": { "type": "string" },
                    "location": { "type": "string" },
                    "website": { "type": "string" },
                    "linkedin": { "type": "string" }
                }
            },
            "summary": { "type": "string", "description": "Free-text professional summary" },
            "skills": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["category"],
                    "properties": {
                        "category": { "type": "string" },
                        "items": { "type": "array", "items": { "type": "string" } }
                    }
                }
            },
            "experience": {
                "type": "array",
                "description": "Ordered, most recent first",
                "items": {
                    "type": "object",
                    "required": ["company", "position"],
                    "properties": {
                        "company": { "type": "string" },
                        "position": { "type": "string" },
                        "period": period_schema(),
                        "summary": { "type": "string" },
                        "achievements": { "type": "array", "items": { "type": "string" } },
                        "stack": { "type": "array", "items": { "type": "string" } }
                    }
                }
            },
            "projects": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": { "type": "string" },
                        "description": { "type": "string" },
                        "url": { "type": "string" },
                        "stack": { "type": "array", "items": { "type": "string" } }
                    }
                }
            },
            "education": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["institution"],
                    "properties": {
                        "institution": { "type": "string" },
                        "degree": { "type": "string" },
                        "field": { "type": "string" },
                        "period": period_schema()
                    }
                }
            },
            "certifications": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": { "type": "string" },
                        "issuer": { "type": "string" },
                        "year": { "type": "string" }
                    }
                }
            },
            "languages": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["language"],
                    "properties": {
                        "language": { "type": "string" },
                        "level": { "type": "string" }
                    }
                }
            },
            "publications": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["title"],
                    "properties": {
                        "title": { "type": "string" },
                        "venue": { "type": "string" },
                        "year": { "type": "string" },
                        "url": { "type": "string" }
                    }
                }
            },
            "personality_traits": { "type": "array", "items": { "type": "string" } },
            "changes": {
                "type": "array",
                "description": "Tailoring only: what was altered and why",
                "items": {
                    "type": "object",
                    "required": ["section", "description"],
                    "properties": {
                        "section": { "type": "string" },
                        "description": { "type": "string" },
                        "reason": { "type": "string" }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_name_and_title() {
        let schema = resume_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, vec!["name", "title"]);
    }

    #[test]
    fn test_schema_covers_every_document_section() {
        let properties = resume_schema();
        let properties = properties["properties"].as_object().unwrap();
        for section in [
            "contact",
            "summary",
            "skills",
            "experience",
            "projects",
            "education",
            "certifications",
            "languages",
            "publications",
            "personality_traits",
            "changes",
        ] {
            assert!(properties.contains_key(section), "schema missing {section}");
        }
    }

    #[test]
    fn test_resume_tool_uses_the_forced_name() {
        let tool = resume_tool();
        assert_eq!(tool.function.name, RESUME_TOOL_NAME);
        assert_eq!(tool.forced_choice()["function"]["name"], RESUME_TOOL_NAME);
    }
}

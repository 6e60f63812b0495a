use serde::{Deserialize, Serialize};

/// Inputs that shape a cover letter. An application with neither a job
/// position nor a job description is a *spontaneous application* — the
/// company description then carries the whole context and becomes mandatory
/// (enforced in `generation::validation`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverLetterInputs {
    #[serde(default)]
    pub job_position: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub company_description: String,
}

impl CoverLetterInputs {
    pub fn is_spontaneous(&self) -> bool {
        self.job_position.trim().is_empty() && self.job_description.trim().is_empty()
    }
}

/// A generated cover letter, tied to the inputs that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetterResult {
    pub content: String,
    pub inputs: CoverLetterInputs,
}

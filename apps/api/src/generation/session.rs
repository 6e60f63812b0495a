#![allow(dead_code)]

//! Generation session — the caller-facing state machine.
//!
//! `input → generating → (display | error)`, with edit transitions back to
//! `input` from either terminal and regeneration from `display`. The
//! session never coalesces concurrent runs; the surface driving it is
//! expected to block re-submission while `Generating`.

use thiserror::Error;

use crate::generation::classify::ClassifiedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    Input,
    Generating,
    Display,
    Error,
}

#[derive(Debug, Error)]
#[error("invalid transition: {from:?} cannot {action}")]
pub struct InvalidTransition {
    pub from: GenerationPhase,
    pub action: &'static str,
}

/// Tracks one generation surface. Holds the last classified error while in
/// `Error` so the caller can render the message, suggestion, and retry
/// affordance.
#[derive(Debug)]
pub struct GenerationSession {
    phase: GenerationPhase,
    last_error: Option<ClassifiedError>,
}

impl GenerationSession {
    /// Fresh surface with nothing generated yet.
    pub fn new() -> Self {
        GenerationSession {
            phase: GenerationPhase::Input,
            last_error: None,
        }
    }

    /// Opening the surface with a previously produced result skips straight
    /// to `Display`.
    pub fn opened_with_result() -> Self {
        GenerationSession {
            phase: GenerationPhase::Display,
            last_error: None,
        }
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&ClassifiedError> {
        self.last_error.as_ref()
    }

    /// `input → generating`.
    pub fn begin(&mut self) -> Result<(), InvalidTransition> {
        match self.phase {
            GenerationPhase::Input => {
                self.phase = GenerationPhase::Generating;
                self.last_error = None;
                Ok(())
            }
            from => Err(InvalidTransition { from, action: "begin" }),
        }
    }

    /// `generating → display`.
    pub fn complete(&mut self) -> Result<(), InvalidTransition> {
        match self.phase {
            GenerationPhase::Generating => {
                self.phase = GenerationPhase::Display;
                self.last_error = None;
                Ok(())
            }
            from => Err(InvalidTransition { from, action: "complete" }),
        }
    }

    /// `generating → error`.
    pub fn fail(&mut self, error: ClassifiedError) -> Result<(), InvalidTransition> {
        match self.phase {
            GenerationPhase::Generating => {
                self.phase = GenerationPhase::Error;
                self.last_error = Some(error);
                Ok(())
            }
            from => Err(InvalidTransition { from, action: "fail" }),
        }
    }

    /// `display | error → input`. Re-entry resets the error (and with it
    /// the caller's attempt counter).
    pub fn edit(&mut self) -> Result<(), InvalidTransition> {
        match self.phase {
            GenerationPhase::Display | GenerationPhase::Error => {
                self.phase = GenerationPhase::Input;
                self.last_error = None;
                Ok(())
            }
            from => Err(InvalidTransition { from, action: "edit" }),
        }
    }

    /// `display → generating`, reusing the last accepted inputs.
    pub fn regenerate(&mut self) -> Result<(), InvalidTransition> {
        match self.phase {
            GenerationPhase::Display => {
                self.phase = GenerationPhase::Generating;
                Ok(())
            }
            from => Err(InvalidTransition { from, action: "regenerate" }),
        }
    }
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self::new()
    }
}

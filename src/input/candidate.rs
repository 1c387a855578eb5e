//! Candidates to be ranked

use crate::error::{MatcherError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub filename: String,
    pub content: String,
}

/// A manually entered candidate, as found in a candidates JSON file
#[derive(Debug, Clone, Deserialize)]
pub struct ManualCandidate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub resume: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManualInput {
    Wrapped {
        candidates: Vec<ManualCandidate>,
        #[serde(default)]
        job_description: Option<String>,
    },
    List(Vec<ManualCandidate>),
}

/// Parsed candidates JSON: the entries plus an optional embedded job description
#[derive(Debug)]
pub struct ManualBatch {
    pub candidates: Vec<Candidate>,
    pub job_description: Option<String>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// `position` is 1-based and only used for defaults
    pub fn from_manual(position: usize, entry: ManualCandidate) -> Self {
        let name = entry
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Candidate {}", position));

        Self::new(name, format!("manual_input_{}.txt", position), entry.resume)
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Accepts either a bare list of `{name?, resume}` or `{job_description?, candidates: [...]}`
pub fn parse_manual_candidates(json: &str) -> Result<ManualBatch> {
    let input: ManualInput = serde_json::from_str(json)
        .map_err(|e| MatcherError::InvalidInput(format!("Invalid candidates JSON: {}", e)))?;

    let (entries, job_description) = match input {
        ManualInput::Wrapped {
            candidates,
            job_description,
        } => (candidates, job_description),
        ManualInput::List(candidates) => (candidates, None),
    };

    let candidates = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| Candidate::from_manual(index + 1, entry))
        .collect();

    Ok(ManualBatch {
        candidates,
        job_description: job_description.filter(|job| !job.trim().is_empty()),
    })
}

//! Human-readable skill summaries and top-skill ranking

use crate::processing::skill_matcher::{total_matches, SkillMatches};
use serde::{Deserialize, Serialize};

pub const NO_MATCHES_SUMMARY: &str = "No specific skill matches found.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSummary {
    pub text: String,
    pub top_skills: Vec<String>,
}

pub fn summarize(matches: &SkillMatches, top_n: usize) -> SkillSummary {
    SkillSummary {
        text: skill_summary(matches),
        top_skills: top_skills(matches, top_n),
    }
}

pub fn skill_summary(matches: &SkillMatches) -> String {
    let segments: Vec<String> = matches
        .iter()
        .filter(|(_, skills)| !skills.is_empty())
        .map(|(category, skills)| format!("{}: {}", category.display_name(), join_with_and(skills)))
        .collect();

    if segments.is_empty() {
        return NO_MATCHES_SUMMARY.to_string();
    }

    let total = total_matches(matches);
    if total == 1 {
        format!("Found 1 matching skill: {}", segments[0])
    } else {
        format!(
            "Found {} matching skills across {} categories: {}",
            total,
            segments.len(),
            segments.join("; ")
        )
    }
}

/// Most frequent skills across categories; ties keep first-seen order
pub fn top_skills(matches: &SkillMatches, n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for skill in matches.values().flatten() {
        match counts.iter_mut().find(|(seen, _)| *seen == skill.as_str()) {
            Some((_, count)) => *count += 1,
            None => counts.push((skill.as_str(), 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(n)
        .map(|(skill, _)| skill.to_string())
        .collect()
}

fn join_with_and(skills: &[String]) -> String {
    match skills {
        [] => String::new(),
        [only] => only.clone(),
        [rest @ .., last] => format!("{} and {}", rest.join(", "), last),
    }
}

//! Prompt construction for candidate rationales

use crate::processing::skill_matcher::SkillMatches;
use crate::processing::summary::{skill_summary, top_skills};

pub const SYSTEM_PROMPT: &str = "You are a professional HR assistant helping to evaluate job candidates. \
Focus on specific skills and experience that match the job requirements.";

const SKILL_PROMPT_TEMPLATE: &str = r#"Job Description: {job}

Candidate Information: {candidate}

Similarity Score: {score}

Key Skill Matches Found:
{skill_summary}

Top Matching Skills: {top_skills}

Please provide a concise summary (max 150 words) explaining why this candidate is a good fit for the role.
Focus on the specific skills that match the job requirements and how their experience aligns with the position.
Be specific about the skill matches found and how they relate to the job responsibilities."#;

/// Number of skills highlighted in the prompt
const PROMPT_TOP_SKILLS: usize = 3;

pub fn build_skill_prompt(
    job_description: &str,
    candidate_info: &str,
    matches: &SkillMatches,
    similarity_score: f32,
) -> String {
    let top = top_skills(matches, PROMPT_TOP_SKILLS);
    let top_line = if top.is_empty() {
        "None identified".to_string()
    } else {
        top.join(", ")
    };

    // Documents go in last so braces in their text are not treated as placeholders
    SKILL_PROMPT_TEMPLATE
        .replace("{score}", &format!("{:.3}", similarity_score))
        .replace("{skill_summary}", &skill_summary(matches))
        .replace("{top_skills}", &top_line)
        .replace("{candidate}", candidate_info.trim())
        .replace("{job}", job_description.trim())
}

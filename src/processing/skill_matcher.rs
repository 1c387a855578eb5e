//! Per-category intersection of job and candidate skills

use crate::processing::skill_extractor::ExtractedSkills;
use crate::processing::vocabulary::SkillCategory;
use std::collections::{BTreeMap, BTreeSet};

/// Category -> alphabetically sorted matched skills. Only non-empty categories are present.
pub type SkillMatches = BTreeMap<SkillCategory, Vec<String>>;

/// Match candidate skills against job skills.
///
/// Exact matches are the per-category intersection. A partial match is any
/// pair where one skill contains the other; the candidate's variant is what
/// gets reported, so the result is not symmetric in general.
pub fn match_skills(job: &ExtractedSkills, candidate: &ExtractedSkills) -> SkillMatches {
    let empty = BTreeSet::new();
    let mut matches = SkillMatches::new();

    for category in SkillCategory::ALL {
        let job_skills = job.get(&category).unwrap_or(&empty);
        let candidate_skills = candidate.get(&category).unwrap_or(&empty);

        let mut found: BTreeSet<&String> = job_skills.intersection(candidate_skills).collect();

        for job_skill in job_skills {
            for candidate_skill in candidate_skills {
                if job_skill.contains(candidate_skill.as_str())
                    || candidate_skill.contains(job_skill.as_str())
                {
                    found.insert(candidate_skill);
                }
            }
        }

        if !found.is_empty() {
            matches.insert(category, found.into_iter().cloned().collect());
        }
    }

    matches
}

pub fn total_matches(matches: &SkillMatches) -> usize {
    matches.values().map(Vec::len).sum()
}

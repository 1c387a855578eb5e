//! Skill vocabulary: the closed set of categories and their canonical skills

use crate::error::{MatcherError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    ProgrammingLanguages,
    Frameworks,
    Databases,
    CloudDevops,
    DataScience,
    SoftSkills,
    BusinessDomain,
    ToolsPlatforms,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 8] = [
        SkillCategory::ProgrammingLanguages,
        SkillCategory::Frameworks,
        SkillCategory::Databases,
        SkillCategory::CloudDevops,
        SkillCategory::DataScience,
        SkillCategory::SoftSkills,
        SkillCategory::BusinessDomain,
        SkillCategory::ToolsPlatforms,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SkillCategory::ProgrammingLanguages => "programming_languages",
            SkillCategory::Frameworks => "frameworks",
            SkillCategory::Databases => "databases",
            SkillCategory::CloudDevops => "cloud_devops",
            SkillCategory::DataScience => "data_science",
            SkillCategory::SoftSkills => "soft_skills",
            SkillCategory::BusinessDomain => "business_domain",
            SkillCategory::ToolsPlatforms => "tools_platforms",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|category| category.key() == key)
    }

    /// Key with underscores turned into spaces and every word capitalized
    pub fn display_name(&self) -> String {
        self.key()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

const PROGRAMMING_LANGUAGES: &[&str] = &[
    "python", "javascript", "java", "c++", "c#", "php", "ruby", "go", "rust", "swift", "kotlin",
    "scala", "r", "matlab", "sql", "html", "css", "typescript", "dart", "perl", "bash",
    "powershell", "vba", "assembly", "cobol", "fortran",
];

const FRAMEWORKS: &[&str] = &[
    "react", "angular", "vue", "node.js", "express", "django", "flask", "spring", "laravel",
    "rails", "asp.net", "fastapi", "tensorflow", "pytorch", "scikit-learn", "pandas", "numpy",
    "matplotlib", "seaborn", "bootstrap", "jquery", "d3.js", "redux", "vuex", "mobx", "graphql",
    "rest api",
];

const DATABASES: &[&str] = &[
    "mysql", "postgresql", "mongodb", "redis", "elasticsearch", "cassandra", "oracle",
    "sql server", "sqlite", "dynamodb", "firebase", "neo4j", "influxdb", "couchdb", "mariadb",
];

const CLOUD_DEVOPS: &[&str] = &[
    "aws", "azure", "gcp", "heroku", "digitalocean", "docker", "kubernetes", "jenkins", "gitlab",
    "github actions", "travis ci", "circleci", "terraform", "ansible", "chef", "puppet",
    "vagrant", "virtualbox", "vmware",
];

const DATA_SCIENCE: &[&str] = &[
    "machine learning", "deep learning", "neural networks", "computer vision",
    "natural language processing", "nlp", "data analysis", "statistics", "regression",
    "classification", "clustering", "recommendation systems", "time series", "forecasting",
    "a/b testing", "experiment design",
];

const SOFT_SKILLS: &[&str] = &[
    "leadership", "communication", "teamwork", "problem solving", "critical thinking",
    "project management", "agile", "scrum", "kanban", "lean", "six sigma", "customer service",
    "presentation", "negotiation", "mentoring", "coaching",
];

const BUSINESS_DOMAIN: &[&str] = &[
    "finance", "healthcare", "e-commerce", "retail", "manufacturing", "logistics",
    "supply chain", "marketing", "sales", "hr", "legal", "education", "government",
    "non-profit", "startup", "enterprise",
];

const TOOLS_PLATFORMS: &[&str] = &[
    "git", "svn", "jira", "confluence", "slack", "teams", "zoom", "figma", "sketch", "adobe",
    "photoshop", "illustrator", "excel", "powerpoint", "tableau", "power bi", "looker",
    "snowflake", "databricks",
];

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("ml", "machine learning"),
    ("ai", "artificial intelligence"),
    ("nlp", "natural language processing"),
    ("cv", "computer vision"),
    ("ds", "data science"),
    ("pm", "project management"),
    ("ui", "user interface"),
    ("ux", "user experience"),
    ("api", "application programming interface"),
    ("sdk", "software development kit"),
    ("saas", "software as a service"),
    ("paas", "platform as a service"),
    ("iaas", "infrastructure as a service"),
];

/// Immutable category -> canonical skill table, built once and shared
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    categories: BTreeMap<SkillCategory, BTreeSet<String>>,
    abbreviations: Vec<(String, String)>,
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SkillVocabulary {
    pub fn builtin() -> Self {
        let tables: [(SkillCategory, &[&str]); 8] = [
            (SkillCategory::ProgrammingLanguages, PROGRAMMING_LANGUAGES),
            (SkillCategory::Frameworks, FRAMEWORKS),
            (SkillCategory::Databases, DATABASES),
            (SkillCategory::CloudDevops, CLOUD_DEVOPS),
            (SkillCategory::DataScience, DATA_SCIENCE),
            (SkillCategory::SoftSkills, SOFT_SKILLS),
            (SkillCategory::BusinessDomain, BUSINESS_DOMAIN),
            (SkillCategory::ToolsPlatforms, TOOLS_PLATFORMS),
        ];

        let categories = tables
            .iter()
            .map(|(category, skills)| {
                (*category, skills.iter().map(|s| s.to_string()).collect())
            })
            .collect();

        let abbreviations = ABBREVIATIONS
            .iter()
            .map(|(abbrev, full)| (abbrev.to_string(), full.to_string()))
            .collect();

        Self { categories, abbreviations }
    }

    /// Built-in table plus extra skills keyed by category key
    pub fn with_extra_skills(extra: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut vocabulary = Self::builtin();

        for (key, skills) in extra {
            let category = SkillCategory::from_key(key).ok_or_else(|| {
                MatcherError::Configuration(format!("Unknown skill category in extra_skills: {}", key))
            })?;

            let entry = vocabulary.categories.entry(category).or_default();
            for skill in skills {
                let canonical = skill.trim().to_lowercase();
                if !canonical.is_empty() {
                    entry.insert(canonical);
                }
            }
        }

        Ok(vocabulary)
    }

    pub fn skills(&self, category: SkillCategory) -> impl Iterator<Item = &str> {
        self.categories
            .get(&category)
            .into_iter()
            .flat_map(|skills| skills.iter().map(String::as_str))
    }

    pub fn contains(&self, category: SkillCategory, skill: &str) -> bool {
        self.categories
            .get(&category)
            .map_or(false, |skills| skills.contains(skill))
    }

    /// Every category listing `skill`, in category order
    pub fn categories_of(&self, skill: &str) -> Vec<SkillCategory> {
        self.categories
            .iter()
            .filter(|(_, skills)| skills.contains(skill))
            .map(|(category, _)| *category)
            .collect()
    }

    /// All distinct canonical skills across categories
    pub fn all_skills(&self) -> BTreeSet<&str> {
        self.categories
            .values()
            .flat_map(|skills| skills.iter().map(String::as_str))
            .collect()
    }

    pub fn abbreviations(&self) -> &[(String, String)] {
        &self.abbreviations
    }

    /// First category containing the abbreviation's full phrase
    pub fn resolve_abbreviation(&self, full_form: &str) -> Option<SkillCategory> {
        self.categories_of(full_form).into_iter().next()
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

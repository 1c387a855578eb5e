//! Output formatters for ranking reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{FitLevel, MatchReport};
use crate::processing::pipeline::CandidateResult;
use crate::processing::skill_extractor::ExtractedSkills;
use crate::processing::skill_matcher::SkillMatches;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_fit_badge(&self, score: f32) -> String {
        let level = FitLevel::from_score(score);
        let color = match level {
            FitLevel::Excellent => Color::Green,
            FitLevel::Good => Color::BrightGreen,
            FitLevel::Partial => Color::Yellow,
            FitLevel::Weak => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", level.label().color(color).bold())
        } else {
            format!("[{}]", level.label())
        }
    }

    /// One line per non-empty category
    pub fn format_extracted_skills(&self, skills: &ExtractedSkills) -> String {
        let mut output = String::new();
        for (category, found) in skills.iter().filter(|(_, found)| !found.is_empty()) {
            let list: Vec<&str> = found.iter().map(String::as_str).collect();
            output.push_str(&format!(
                "  {}: {}\n",
                self.colorize(&category.display_name(), Color::Cyan),
                list.join(", ")
            ));
        }

        if output.is_empty() {
            output.push_str("  (no known skills found)\n");
        }
        output
    }

    pub fn format_skill_matches(&self, matches: &SkillMatches) -> String {
        if matches.is_empty() {
            return "  (none)\n".to_string();
        }

        matches
            .iter()
            .map(|(category, skills)| {
                format!(
                    "  {}: {}\n",
                    self.colorize(&category.display_name(), Color::Cyan),
                    skills.join(", ")
                )
            })
            .collect()
    }

    fn format_candidate(&self, rank: usize, result: &CandidateResult) -> String {
        let mut output = format!(
            "{}. {} ({}) {:.3} {}\n",
            rank,
            self.colorize(&result.name, Color::White),
            result.filename,
            result.similarity_score,
            self.format_fit_badge(result.similarity_score)
        );

        output.push_str(&format!("   Skills: {}\n", result.skill_summary));
        if !result.top_skills.is_empty() {
            output.push_str(&format!(
                "   Top skills: {}\n",
                self.colorize(&result.top_skills.join(", "), Color::Green)
            ));
        }

        if self.detailed {
            output.push_str(&format!("   Summary: {}\n", result.ai_summary));
            output.push_str(&self.format_skill_matches(&result.skill_matches).replace("  ", "     "));
        } else {
            output.push_str(&format!("   Summary: {}\n", truncate(&result.ai_summary, 160)));
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("🎯 CANDIDATE RANKING", 1));
        output.push_str(&format!(
            "Generated: {} | Backend: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.backend,
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!(
            "Job: {} | Candidates: {} | Shown: {}\n",
            report.metadata.job_source,
            report.metadata.total_candidates,
            report.recommendations.len()
        ));

        output.push_str(&self.format_header(&format!("Job Skills ({})", report.job_skill_count()), 2));
        output.push_str(&self.format_extracted_skills(&report.job_skills));

        output.push_str(&self.format_header("Recommendations", 2));
        for (index, result) in report.recommendations.iter().enumerate() {
            output.push_str(&self.format_candidate(index + 1, result));
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn fit_badge(score: f32) -> &'static str {
        match FitLevel::from_score(score) {
            FitLevel::Excellent => "🟢 Excellent",
            FitLevel::Good => "🟡 Good",
            FitLevel::Partial => "🟠 Partial",
            FitLevel::Weak => "🔴 Weak",
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 🎯 Candidate Ranking\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Backend:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.backend,
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Job:** `{}` | **Candidates:** {}\n\n",
                report.metadata.job_source, report.metadata.total_candidates
            ));
        }

        output.push_str("## Job Skills\n\n");
        let mut any_skill = false;
        for (category, skills) in report.job_skills.iter().filter(|(_, s)| !s.is_empty()) {
            any_skill = true;
            let list: Vec<&str> = skills.iter().map(String::as_str).collect();
            output.push_str(&format!("- **{}:** {}\n", category.display_name(), list.join(", ")));
        }
        if !any_skill {
            output.push_str("_No known skills found._\n");
        }
        output.push('\n');

        output.push_str("## Recommendations\n\n");
        output.push_str("| Rank | Candidate | Score | Fit | Top Skills |\n");
        output.push_str("|------|-----------|-------|-----|------------|\n");
        for (index, result) in report.recommendations.iter().enumerate() {
            output.push_str(&format!(
                "| {} | {} | {:.3} | {} | {} |\n",
                index + 1,
                result.name.replace('|', "\\|"),
                result.similarity_score,
                Self::fit_badge(result.similarity_score),
                result.top_skills.join(", ")
            ));
        }
        output.push('\n');

        for (index, result) in report.recommendations.iter().enumerate() {
            output.push_str(&format!("### {}. {}\n\n", index + 1, result.name));
            output.push_str(&format!("**File:** `{}`\n\n", result.filename));
            output.push_str(&format!("**Skill matches:** {}\n\n", result.skill_summary));
            output.push_str(&format!("{}\n\n", result.ai_summary));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &MatchReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }

    pub fn console(&self) -> &ConsoleFormatter {
        &self.console_formatter
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

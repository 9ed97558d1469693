use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// A single business-plan question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier derived from the label via [`slugify`]
    pub id: String,
    /// Display text
    pub label: String,
    /// Guidance text for phrasing the question
    pub fill: String,
}

/// A named group of related questions with core and optional subsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub description: String,
    pub core_questions: Vec<Question>,
    pub optional_questions: Vec<Question>,
}

/// The loaded question bank, read-only after startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub sections: Vec<Section>,
}

impl QuestionBank {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Look up a question by id across all sections
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.sections.iter().find_map(|s| {
            s.core_questions
                .iter()
                .chain(s.optional_questions.iter())
                .find(|q| q.id == id)
        })
    }
}

/// Errors raised while loading the question bank
#[derive(Error, Debug)]
pub enum BankError {
    /// Two questions slugified to the same id; lookups would be ambiguous
    #[error("Duplicate question id '{id}' in question bank")]
    DuplicateId { id: String },

    /// The bank file could not be read
    #[error("Failed to read question bank: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

fn non_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").unwrap())
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Derive a stable identifier from a human-readable label: lowercase,
/// non-word characters stripped, whitespace runs collapsed to underscores.
/// The same rule is used everywhere an id is derived from a label so that
/// lookups always agree.
pub fn slugify(label: &str) -> String {
    let lowered = label.to_lowercase();
    let stripped = non_word_re().replace_all(&lowered, "");
    whitespace_re()
        .replace_all(stripped.trim(), "_")
        .into_owned()
}

/// Load and parse a question bank from a file
pub fn load_question_bank(path: &Path) -> Result<QuestionBank, BankError> {
    let content = std::fs::read_to_string(path)?;
    parse_question_bank(&content)
}

/// Parse the semi-structured question source into an ordered bank.
///
/// The format is a commented YAML-like document: `# ---` rules delimit
/// `# Section N: Title` headers followed by a description comment,
/// `# --- Core Questions ---` / `# --- Optional Deeper Dive ---` switch the
/// target list, and `"Label":` entries carry a `fill:` hint (single-line or
/// quoted multi-line). Questions without a fill text are dropped. Zero
/// sections is not an error; duplicate ids are.
pub fn parse_question_bank(content: &str) -> Result<QuestionBank, BankError> {
    let section_header_re = Regex::new(r"Section (\d+):\s*(.+)").unwrap();
    let question_re = Regex::new(r#"^"([^"]+)":"#).unwrap();

    let lines: Vec<&str> = content.lines().collect();

    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<Section> = None;
    // Which list of the current section new questions go to
    let mut optional_target = false;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        if line == "# ---" {
            i += 1;
            if i < lines.len() {
                let next_line = lines[i].trim();
                if next_line.starts_with("# Section") {
                    if let Some(section) = current.take() {
                        sections.push(section);
                    }

                    if let Some(caps) = section_header_re.captures(next_line) {
                        let number = &caps[1];
                        let title = caps[2].trim();

                        i += 1;
                        if i < lines.len() && lines[i].trim() == "# ---" {
                            i += 1;
                        }

                        let mut description = String::new();
                        if i < lines.len() {
                            let desc_line = lines[i].trim();
                            if desc_line.starts_with('#') && !desc_line.starts_with("# ---") {
                                description =
                                    desc_line.trim_start_matches('#').trim().to_string();
                            }
                        }

                        current = Some(Section {
                            id: format!("section_{}", number),
                            title: format!("Section {}: {}", number, title),
                            description,
                            core_questions: Vec::new(),
                            optional_questions: Vec::new(),
                        });
                        optional_target = false;
                    }
                }
            }
        } else if line == "# --- Core Questions ---" {
            optional_target = false;
        } else if line == "# --- Optional Deeper Dive ---" {
            optional_target = true;
        } else if !line.is_empty() && !line.starts_with('#') && line.contains(':') {
            if let Some(caps) = question_re.captures(line) {
                let label = caps[1].to_string();
                let id = slugify(&label);

                i += 1;
                let mut fill = String::new();
                while i < lines.len() {
                    let next_line = lines[i].trim();
                    if next_line.is_empty() || next_line.starts_with('#') {
                        if next_line.starts_with("# ---") {
                            // Let the outer loop re-see the delimiter
                            i -= 1;
                            break;
                        }
                        i += 1;
                        continue;
                    }

                    if let Some(rest) = next_line.strip_prefix("fill:") {
                        let mut text = rest.trim().to_string();
                        if text.starts_with('"') && text.len() > 1 && text.ends_with('"') {
                            text = text[1..text.len() - 1].to_string();
                        } else if let Some(open) = text.strip_prefix('"') {
                            // Quoted hint continues on following lines
                            text = open.to_string();
                            i += 1;
                            while i < lines.len() {
                                let cont = lines[i].trim();
                                if let Some(closing) = cont.strip_suffix('"') {
                                    text.push(' ');
                                    text.push_str(closing);
                                    break;
                                }
                                text.push(' ');
                                text.push_str(cont);
                                i += 1;
                            }
                        }
                        fill = text;
                    } else if next_line.starts_with("why:") || next_line.starts_with("answer:") {
                        break;
                    }
                    i += 1;
                }

                if let Some(section) = current.as_mut() {
                    if !fill.is_empty() {
                        let question = Question { id, label, fill };
                        if optional_target {
                            section.optional_questions.push(question);
                        } else {
                            section.core_questions.push(question);
                        }
                    }
                }
            }
        }

        i += 1;
    }

    if let Some(section) = current.take() {
        sections.push(section);
    }

    let bank = QuestionBank { sections };
    check_unique_ids(&bank)?;
    Ok(bank)
}

fn check_unique_ids(bank: &QuestionBank) -> Result<(), BankError> {
    let mut seen = HashSet::new();
    for section in &bank.sections {
        for question in section
            .core_questions
            .iter()
            .chain(section.optional_questions.iter())
        {
            if !seen.insert(question.id.clone()) {
                return Err(BankError::DuplicateId {
                    id: question.id.clone(),
                });
            }
        }
    }
    Ok(())
}

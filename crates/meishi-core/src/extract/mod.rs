//! Field extraction from one card's text.
//!
//! Each field is derived independently by an ordered list of pattern rules;
//! the first rule that matches wins and a field no rule matches is `None`.
//! Extraction never fails on odd input, it only finds less.

mod contact;
mod normalize;
mod vocabulary;

pub use normalize::{fold_digits, normalize_email_punctuation, normalize_numeric, strip_spaces};
pub use vocabulary::{Vocabulary, PREFECTURES};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MeishiError, MeishiResult};
use crate::types::ContactRecord;

/// Extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Leading lines searched for a person's name.
    pub name_scan_lines: usize,
    /// Leading lines searched for a company name.
    pub company_scan_lines: usize,
    /// Shortest accepted company line, in characters.
    pub company_min_chars: usize,
    /// Longest accepted company line, in characters.
    pub company_max_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            name_scan_lines: 8,
            company_scan_lines: 15,
            company_min_chars: 3,
            company_max_chars: 100,
        }
    }
}

const CJK: &str = r"[\x{4E00}-\x{9FFF}\x{3005}]";

/// "山田 太郎": family and given name separated by whitespace.
static NAME_CJK_SPACED: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{CJK}{{2,4}}\s+{CJK}{{1,4}}$")).unwrap());

/// "山田": a bare family name on its own line.
static NAME_CJK_BARE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"^{CJK}{{2,5}}$")).unwrap());

/// "太郎": a short given name following a bare family name.
static NAME_CJK_SHORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{CJK}{{1,4}}$")).unwrap());

static NAME_LATIN_CAPITALIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+\s+[A-Z][a-z]+$").unwrap());

static NAME_LATIN_UPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,}\s+[A-Z]{2,}$").unwrap());

static POSTAL_MARKED: Lazy<Regex> = Lazy::new(|| Regex::new(r"〒\s*[0-9]{3}-?[0-9]{4}").unwrap());

static POSTAL_BARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{3}-[0-9]{4}").unwrap());

/// Derives contact fields from card text.
///
/// Holds only immutable tables and compiled patterns, so one extractor can be
/// shared across concurrent scans.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    config: ExtractionConfig,
    vocabulary: Vocabulary,
    labeled_phone: Option<Regex>,
    mobile: Option<Regex>,
    website_bare: Option<Regex>,
}

/// Alternation of escaped words, longest first so longer labels win.
fn alternation(words: &[String]) -> Option<String> {
    let mut words: Vec<&String> = words.iter().filter(|w| !w.is_empty()).collect();
    if words.is_empty() {
        return None;
    }
    words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
    Some(
        words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|"),
    )
}

fn compile(pattern: &str) -> MeishiResult<Regex> {
    Regex::new(pattern).map_err(|e| MeishiError::Configuration(format!("Invalid pattern: {}", e)))
}

/// Whether `keyword` occurs in `line` as a standalone token.
///
/// Keywords starting or ending with an ASCII letter or digit must not be glued
/// to another ASCII letter or digit, so "GK" does not match "HONGKONG".
pub(crate) fn contains_keyword(line: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    let check_start = keyword.starts_with(|c: char| c.is_ascii_alphanumeric());
    let check_end = keyword.ends_with(|c: char| c.is_ascii_alphanumeric());

    line.match_indices(keyword).any(|(start, matched)| {
        let end = start + matched.len();
        let before_ok = !check_start
            || !line[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric());
        let after_ok = !check_end
            || !line[end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric());
        before_ok && after_ok
    })
}

impl FieldExtractor {
    /// Create an extractor, compiling the vocabulary-dependent patterns.
    pub fn new(config: ExtractionConfig, vocabulary: Vocabulary) -> MeishiResult<Self> {
        let labeled_phone = alternation(&vocabulary.phone_labels)
            .map(|labels| {
                compile(&format!(
                    r"(?i)(?:{labels})[:.]?({}|{}|{})",
                    contact::PHONE_DASHED,
                    contact::PHONE_PAREN,
                    contact::PHONE_PLAIN
                ))
            })
            .transpose()?;

        let mobile = alternation(&vocabulary.mobile_prefixes)
            .map(|prefixes| compile(&format!(r"(?:{prefixes})-?[0-9]{{4}}-?[0-9]{{4}}")))
            .transpose()?;

        let website_bare = alternation(&vocabulary.website_tlds)
            .map(|tlds| compile(&format!(r"(?i)[a-z0-9][a-z0-9.-]*\.(?:{tlds})")))
            .transpose()?;

        Ok(Self {
            config,
            vocabulary,
            labeled_phone,
            mobile,
            website_bare,
        })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Extract every field from one card's text.
    pub fn extract(&self, text: &str) -> ContactRecord {
        let record = ContactRecord {
            name: self.extract_name(text),
            company: self.extract_company(text),
            email: self.extract_email(text),
            phone: self.extract_phone(text),
            mobile: self.extract_mobile(text),
            address: self.extract_address(text),
            website: self.extract_website(text),
            full_text: text.to_string(),
        };

        debug!(
            fields = record.field_count(),
            has_name = record.name.is_some(),
            has_company = record.company.is_some(),
            has_email = record.email.is_some(),
            "Extracted card fields"
        );

        record
    }

    /// Title, department and company lines are never names.
    fn is_non_name_line(&self, line: &str) -> bool {
        let vocab = &self.vocabulary;
        if vocab
            .company_keywords
            .iter()
            .chain(vocab.title_keywords.iter())
            .any(|k| contains_keyword(line, k))
        {
            return true;
        }
        let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        compact.chars().count() >= 3
            && vocab
                .department_suffixes
                .iter()
                .any(|s| !s.is_empty() && compact.ends_with(s.as_str()))
    }

    fn is_name_line(&self, rule: &Regex, line: &str) -> bool {
        rule.is_match(line) && !self.is_non_name_line(line)
    }

    /// Person's name from the header lines of the card.
    ///
    /// Rules are tried in order over all scanned lines; a broader rule only
    /// runs once every narrower one has failed on every line.
    pub fn extract_name(&self, text: &str) -> Option<String> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let window = &lines[..lines.len().min(self.config.name_scan_lines)];

        if let Some(line) = window.iter().find(|l| self.is_name_line(&NAME_CJK_SPACED, l)) {
            return Some(line.to_string());
        }

        for (i, line) in window.iter().enumerate() {
            if !self.is_name_line(&NAME_CJK_BARE, line) {
                continue;
            }
            return Some(match lines.get(i + 1) {
                Some(given) if self.is_name_line(&NAME_CJK_SHORT, given) => {
                    format!("{} {}", line, given)
                }
                _ => line.to_string(),
            });
        }

        [&*NAME_LATIN_CAPITALIZED, &*NAME_LATIN_UPPER]
            .into_iter()
            .find_map(|rule| window.iter().find(|l| self.is_name_line(rule, l)))
            .map(|l| l.to_string())
    }

    /// Company line from the upper part of the card.
    pub fn extract_company(&self, text: &str) -> Option<String> {
        let min = self.config.company_min_chars;
        let max = self.config.company_max_chars;

        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(self.config.company_scan_lines)
            .find(|line| {
                let len = line.chars().count();
                (min..=max).contains(&len)
                    && self
                        .vocabulary
                        .company_keywords
                        .iter()
                        .any(|k| contains_keyword(line, k))
            })
            .map(str::to_string)
    }

    fn is_address_line(&self, line: &str) -> bool {
        let folded = fold_digits(line);
        if POSTAL_MARKED.is_match(&folded) {
            return true;
        }
        if self.vocabulary.regions.iter().any(|r| line.contains(r.as_str())) {
            return true;
        }
        if self.looks_like_contact_line(line) {
            return false;
        }
        POSTAL_BARE.find_iter(&folded).any(|m| {
            let before = folded[..m.start()].chars().next_back();
            let after = folded[m.end()..].chars().next();
            let free = |c: Option<char>| !c.is_some_and(|c| c.is_ascii_digit() || c == '-');
            free(before) && free(after)
        })
    }

    /// Postal address, joined with its continuation line.
    ///
    /// The line after the match is appended unless it is itself a phone, fax,
    /// email or website line.
    pub fn extract_address(&self, text: &str) -> Option<String> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let index = lines.iter().position(|l| self.is_address_line(l))?;
        let mut address = lines[index].to_string();
        if let Some(next) = lines.get(index + 1) {
            if !self.looks_like_contact_line(next) {
                address.push(' ');
                address.push_str(next);
            }
        }
        Some(address.trim().to_string())
    }
}

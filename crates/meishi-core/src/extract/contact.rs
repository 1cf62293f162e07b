//! Email, phone, mobile and website rules.

use once_cell::sync::Lazy;
use regex::{Match, Regex};

use super::normalize::{normalize_email_punctuation, normalize_numeric, strip_spaces};
use super::{contains_keyword, FieldExtractor};

/// "03-1234-5678"
pub(super) const PHONE_DASHED: &str = r"0[0-9]{1,4}-[0-9]{1,4}-[0-9]{4}";
/// "(03)1234-5678" or "03(1234)5678"
pub(super) const PHONE_PAREN: &str =
    r"\(0[0-9]{1,4}\)[0-9]{1,4}-?[0-9]{4}|0[0-9]{1,4}\([0-9]{1,4}\)[0-9]{4}";
/// "0312345678"
pub(super) const PHONE_PLAIN: &str = r"0[0-9]{9,10}";

static PHONE_SHAPES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [PHONE_DASHED, PHONE_PAREN, PHONE_PLAIN].map(|p| Regex::new(p).unwrap())
});

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

static URL_SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://[a-z0-9\-._~:/?#\[\]@!$&'()*+,;=%]+").unwrap()
});

static URL_WWW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)www\.[a-z0-9\-._~:/?#\[\]@!$&'()*+,;=%]+").unwrap());

const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', '\''];

/// Matches not glued to a digit on either side.
fn bounded<'a>(re: &'a Regex, haystack: &'a str) -> impl Iterator<Item = Match<'a>> + 'a {
    re.find_iter(haystack).filter(move |m| {
        let before = haystack[..m.start()].chars().next_back();
        !before.is_some_and(|c| c.is_ascii_digit()) && !followed_by_digit(haystack, m.end())
    })
}

fn followed_by_digit(haystack: &str, end: usize) -> bool {
    haystack[end..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
}

/// Whether the text right before a candidate ends with one of `labels`.
fn preceded_by_label(prefix: &str, labels: &[String]) -> bool {
    let trimmed = prefix
        .trim_end_matches(|c: char| c == ':' || c == '.' || c.is_whitespace())
        .to_lowercase();
    labels
        .iter()
        .any(|l| !l.is_empty() && trimmed.ends_with(&l.to_lowercase()))
}

/// Whether the label run right before a candidate names fax and nothing else.
///
/// Shared lines such as "TEL/FAX" or "TEL・FAX：" carry a phone label in the
/// same run and still count as a landline.
fn fax_only(prefix: &str, fax_labels: &[String], phone_labels: &[String]) -> bool {
    let trimmed = prefix.trim_end_matches(|c: char| c == ':' || c == '.' || c.is_whitespace());
    let run = trimmed
        .rsplit('\n')
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    let Some(rest) = fax_labels
        .iter()
        .filter(|l| !l.is_empty())
        .find_map(|l| run.strip_suffix(l.to_lowercase().as_str()))
    else {
        return false;
    };
    let rest = rest.trim_end_matches(|c: char| {
        matches!(c, '/' | '・' | '･' | '&' | ',' | '、') || c.is_whitespace()
    });
    !phone_labels
        .iter()
        .any(|l| !l.is_empty() && rest.ends_with(l.to_lowercase().as_str()))
}

/// Drop a leading "Email:" style label so stripping spaces does not glue it
/// onto the local part.
fn drop_leading_label<'a>(line: &'a str, labels: &[String]) -> &'a str {
    let trimmed = line.trim_start();
    for label in labels {
        if label.is_empty() || trimmed.len() < label.len() {
            continue;
        }
        let Some(head) = trimmed.get(..label.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(label) {
            continue;
        }
        let rest = &trimmed[label.len()..];
        if rest.starts_with(|c: char| c == ':' || c == '：' || c.is_whitespace()) {
            return rest.trim_start_matches(|c: char| c == ':' || c == '：' || c.is_whitespace());
        }
    }
    line
}

fn first_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

fn trim_url(url: &str) -> String {
    url.trim_end_matches(URL_TRAILING).to_string()
}

impl FieldExtractor {
    fn is_mobile_number(&self, number: &str) -> bool {
        let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
        self.vocabulary
            .mobile_prefixes
            .iter()
            .any(|p| !p.is_empty() && digits.starts_with(p.as_str()))
    }

    /// Email address, retried with full-width punctuation folded.
    pub fn extract_email(&self, text: &str) -> Option<String> {
        let unlabeled: Vec<&str> = text
            .lines()
            .map(|l| drop_leading_label(l, &self.vocabulary.email_labels))
            .collect();
        let stripped = strip_spaces(&unlabeled.join("\n"));

        first_email(&stripped).or_else(|| first_email(&normalize_email_punctuation(&stripped)))
    }

    /// Landline number: labeled numbers first, then bare grouped digits.
    ///
    /// Mobile-prefixed numbers belong to [`extract_mobile`](Self::extract_mobile)
    /// and numbers labeled as fax only are never returned.
    pub fn extract_phone(&self, text: &str) -> Option<String> {
        let normalized = normalize_numeric(text);

        if let Some(labeled) = &self.labeled_phone {
            for caps in labeled.captures_iter(&normalized) {
                let Some(number) = caps.get(1) else {
                    continue;
                };
                if followed_by_digit(&normalized, number.end())
                    || self.is_mobile_number(number.as_str())
                {
                    continue;
                }
                return Some(number.as_str().to_string());
            }
        }

        PHONE_SHAPES.iter().find_map(|shape| {
            bounded(shape, &normalized)
                .find(|m| {
                    !self.is_mobile_number(m.as_str())
                        && !fax_only(
                            &normalized[..m.start()],
                            &self.vocabulary.fax_labels,
                            &self.vocabulary.phone_labels,
                        )
                })
                .map(|m| m.as_str().to_string())
        })
    }

    /// Mobile number, skipping anything labeled as fax.
    pub fn extract_mobile(&self, text: &str) -> Option<String> {
        let mobile = self.mobile.as_ref()?;
        let normalized = normalize_numeric(text);

        let found = bounded(mobile, &normalized)
            .find(|m| !preceded_by_label(&normalized[..m.start()], &self.vocabulary.fax_labels))
            .map(|m| m.as_str().to_string());
        found
    }

    /// Website: explicit scheme, then "www.", then a bare domain with a
    /// known top-level domain. Email addresses are masked before the later
    /// rules so their domains are not mistaken for websites.
    pub fn extract_website(&self, text: &str) -> Option<String> {
        if let Some(m) = URL_SCHEME.find(text) {
            return Some(trim_url(m.as_str()));
        }

        let folded = normalize_email_punctuation(text);
        let masked = EMAIL.replace_all(&folded, " ");
        if let Some(m) = URL_WWW.find(&masked) {
            return Some(trim_url(m.as_str()));
        }

        let bare = self.website_bare.as_ref()?;
        bare.find_iter(&masked)
            .find(|m| {
                !masked[m.end()..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '-')
            })
            .map(|m| trim_url(m.as_str()))
    }

    /// Whether a line carries a phone, fax, email or website entry.
    pub(super) fn looks_like_contact_line(&self, line: &str) -> bool {
        let vocab = &self.vocabulary;
        let lower = line.to_lowercase();
        let labeled = vocab
            .phone_labels
            .iter()
            .chain(&vocab.fax_labels)
            .chain(&vocab.mobile_labels)
            .chain(&vocab.email_labels)
            .any(|label| contains_keyword(&lower, &label.to_lowercase()));
        if labeled {
            return true;
        }

        let normalized = normalize_numeric(line);
        EMAIL.is_match(&normalize_email_punctuation(&normalized))
            || URL_SCHEME.is_match(line)
            || URL_WWW.is_match(line)
            || self.website_bare.as_ref().is_some_and(|re| re.is_match(line))
            || PHONE_SHAPES
                .iter()
                .chain(self.mobile.iter())
                .any(|re| bounded(re, &normalized).next().is_some())
    }
}

//! Full-width to half-width normalisation for OCR text.
//!
//! Japanese cards frequently print digits and punctuation in their full-width
//! forms, and OCR output mixes both. Patterns are written against ASCII, so
//! text is folded first.

/// Remove horizontal whitespace (including the ideographic space) while
/// keeping line breaks.
pub fn strip_spaces(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\n' || !c.is_whitespace())
        .collect()
}

/// Fold a single character used in phone numbers to ASCII.
fn fold_numeric(c: char) -> char {
    match c {
        '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
        'Ａ'..='Ｚ' => char::from(b'A' + (c as u32 - 'Ａ' as u32) as u8),
        'ａ'..='ｚ' => char::from(b'a' + (c as u32 - 'ａ' as u32) as u8),
        '－' | '―' | '‐' | '‑' | '–' | '—' | '−' | 'ー' | 'ｰ' => '-',
        '：' => ':',
        '（' => '(',
        '）' => ')',
        '＋' => '+',
        '．' => '.',
        '／' => '/',
        _ => c,
    }
}

/// Normalise text for phone/postal matching: spaces removed, full-width
/// digits, letters, dashes and brackets folded to ASCII.
pub fn normalize_numeric(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\n' || !c.is_whitespace())
        .map(fold_numeric)
        .collect()
}

/// Fold only digits and postal-code punctuation, keeping spaces and the
/// long-vowel mark intact so non-numeric text is unchanged.
pub fn fold_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => fold_numeric(c),
            '－' | '‐' | '‑' | '−' => '-',
            _ => c,
        })
        .collect()
}

/// Fold the punctuation that OCR mis-reads inside email addresses.
pub fn normalize_email_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '＠' => '@',
            '。' | '．' | '｡' => '.',
            '＿' => '_',
            '－' => '-',
            'Ａ'..='Ｚ' | 'ａ'..='ｚ' | '０'..='９' => fold_numeric(c),
            _ => c,
        })
        .collect()
}

//! Case transforms and case predicates.
//!
//! Title casing follows the classic word-initial rule: a cased character is
//! upper-cased when the previous character is uncased and lower-cased
//! otherwise. Digits and punctuation are uncased, so "2nd" becomes "2Nd" and
//! "don't" becomes "Don'T". The validator compares against the same
//! transform, which keeps the two sides consistent.

fn is_cased(ch: char) -> bool {
    ch.is_uppercase() || ch.is_lowercase()
}

/// Stateful title caser.
///
/// Feeding the text of consecutive runs through one caser gives the same
/// result as title-casing their concatenation.
#[derive(Debug, Clone, Default)]
pub struct TitleCaser {
    previous_cased: bool,
}

impl TitleCaser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous character, as after a tab or break.
    pub fn reset(&mut self) {
        self.previous_cased = false;
    }

    /// Title-case a fragment, continuing from the previous fragment.
    pub fn apply(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            if is_cased(ch) {
                if self.previous_cased {
                    out.extend(ch.to_lowercase());
                } else {
                    out.extend(ch.to_uppercase());
                }
                self.previous_cased = true;
            } else {
                out.push(ch);
                self.previous_cased = false;
            }
        }
        out
    }
}

/// Title-case a string.
pub fn title_case(text: &str) -> String {
    TitleCaser::new().apply(text)
}

/// Check whether the text is title-cased: at least one cased character,
/// upper-case letters only at word starts and lower-case letters only inside
/// words.
pub fn is_title_case(text: &str) -> bool {
    let mut previous_cased = false;
    let mut any_cased = false;
    for ch in text.chars() {
        if ch.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            any_cased = true;
        } else if ch.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            any_cased = true;
        } else {
            previous_cased = false;
        }
    }
    any_cased
}

/// Check whether the text has cased characters and none of them is lower-case.
pub fn is_all_upper(text: &str) -> bool {
    text.chars().any(is_cased) && !text.chars().any(char::is_lowercase)
}

/// Upper-case the first alphabetic character and leave the rest unchanged.
///
/// "(expressed in thousands)" becomes "(Expressed in thousands)".
pub fn sentence_case(text: &str) -> String {
    match text.char_indices().find(|(_, ch)| ch.is_alphabetic()) {
        Some((index, ch)) => {
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..index]);
            out.extend(ch.to_uppercase());
            out.push_str(&text[index + ch.len_utf8()..]);
            out
        }
        None => text.to_string(),
    }
}

/// Check for a parenthetical in sentence case: an opening parenthesis, an
/// upper-case letter, a lower-case letter, and not title-cased overall.
pub fn is_parenthetical_sentence(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some('('), Some(second), Some(third)) if second.is_uppercase() && third.is_lowercase()
    ) && !is_title_case(text)
}

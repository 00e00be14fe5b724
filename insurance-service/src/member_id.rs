//! Member ID normalization for spoken input
//!
//! Speech-to-text hands us member IDs in many shapes: letters spelled one by
//! one ("A E T N A"), digits as words ("one two three"), runs such as
//! "double five", or already-typed fragments ("aetna-123"). Everything is
//! folded into one uppercase alphanumeric token, e.g. `AETNA12345`.

use crate::error::{InsuranceError, InsuranceResult};

#[allow(clippy::unwrap_used)]
mod patterns {
    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        pub static ref CANONICAL_MEMBER_ID: Regex = Regex::new(r"^[A-Z]+[0-9]+$").unwrap();
    }
}

fn digit_for_word(word: &str) -> Option<char> {
    let digit = match word {
        "zero" | "oh" => '0',
        "one" => '1',
        "two" => '2',
        "three" => '3',
        "four" => '4',
        "five" => '5',
        "six" => '6',
        "seven" => '7',
        "eight" => '8',
        "nine" => '9',
        _ => return None,
    };
    Some(digit)
}

fn repeat_count(word: &str) -> Option<usize> {
    match word {
        "double" => Some(2),
        "triple" => Some(3),
        _ => None,
    }
}

/// Already in output form: non-empty, uppercase ASCII letters and digits only
fn is_normalized(input: &str) -> bool {
    !input.is_empty()
        && input
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// `true` when `id` matches `[A-Z]+[0-9]+`
pub fn is_canonical_member_id(id: &str) -> bool {
    patterns::CANONICAL_MEMBER_ID.is_match(id)
}

/// Fold a spoken or typed member ID into its canonical form.
///
/// Number words become digits, other tokens lose non-alphanumeric characters
/// and are uppercased, and everything is concatenated in order. Input that is
/// already normalized is returned unchanged, so the function is idempotent.
///
/// # Errors
///
/// [`InsuranceError::Normalization`] when nothing alphanumeric is left.
pub fn normalize_member_id(input: &str) -> InsuranceResult<String> {
    if is_normalized(input) {
        return Ok(input.to_string());
    }

    let mut normalized = String::with_capacity(input.len());
    let mut pending_repeat: Option<usize> = None;

    for token in input
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let lower = token.to_ascii_lowercase();

        if let Some(count) = repeat_count(&lower) {
            // "double double" keeps the last multiplier
            pending_repeat = Some(count);
            continue;
        }

        let piece = match digit_for_word(&lower) {
            Some(digit) => digit.to_string(),
            None => token.to_ascii_uppercase(),
        };

        let times = pending_repeat.take().unwrap_or(1);
        for _ in 0..times {
            normalized.push_str(&piece);
        }
    }

    if normalized.is_empty() {
        return Err(InsuranceError::Normalization(
            "no letters or digits found in member ID".to_string(),
        ));
    }

    Ok(normalized)
}

/// Spell an ID back character by character for confirmation: "A E T N A 1 2"
pub fn spell_out(member_id: &str) -> String {
    member_id
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

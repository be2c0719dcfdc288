//! IntervalParser - タスク説明文から `!repeat` ディレクティブを取り出す
//!
//! ```text
//! Water the plants
//! !repeat every 1 week and 2 days
//! ```
//!
//! # 文法（1 行、最初のディレクティブが優先）
//!
//! ```text
//! directive := "!repeat" ["every"] clause (" and " clause)*
//! clause    := [count] unit
//! ```
//!
//! # 設計原則
//! - 単位は大文字小文字を区別せず、複数形に正規化する（`day` == `days`）
//! - 失敗はすべて `ParseOutcome::Malformed` で返す。panic しない
//! - count の上限は u32 だけ。日付が範囲外になるかは `IntervalSpec::add_to` が判定する

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{IntervalSpec, IntervalUnit, ParseFailure};

/// Largest count a unit can hold after duplicate clauses are summed.
pub const MAX_COUNT: u32 = u32::MAX;

// `[^\S\r\n]` is any whitespace except a line break, the same set
// `split_whitespace` uses inside the line.
static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)!repeat\b(?:[^\S\r\n]+every\b)?(?P<clauses>[^\r\n]*)")
        .expect("directive pattern is valid")
});

/// Result of looking for a directive in one description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// No `!repeat` token: the task is not recurring.
    NoDirective,

    /// The token is there but the interval could not be read.
    Malformed(ParseFailure),

    Parsed(IntervalSpec),
}

/// Parse `description` into an interval.
///
/// Never panics; every failure mode is a [`ParseOutcome::Malformed`].
pub fn parse(description: &str) -> ParseOutcome {
    let Some(caps) = DIRECTIVE.captures(description) else {
        return ParseOutcome::NoDirective;
    };
    let clauses = caps.name("clauses").map_or("", |m| m.as_str());

    match parse_clauses(clauses) {
        Ok(spec) => ParseOutcome::Parsed(spec),
        Err(failure) => ParseOutcome::Malformed(failure),
    }
}

fn parse_clauses(text: &str) -> Result<IntervalSpec, ParseFailure> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseFailure::EmptyInterval);
    }

    let mut parts = Vec::new();
    for clause in text.split(" and ") {
        parts.push(parse_clause(clause)?);
    }

    // checked after summing, two in-range clauses can still overflow
    let mut totals: Vec<(IntervalUnit, u64)> = Vec::new();
    for &(unit, count) in &parts {
        match totals.iter_mut().find(|(u, _)| *u == unit) {
            Some((_, total)) => *total += u64::from(count),
            None => totals.push((unit, u64::from(count))),
        }
    }
    if let Some(&(unit, count)) = totals.iter().find(|(_, c)| *c > u64::from(MAX_COUNT)) {
        return Err(ParseFailure::CountOutOfRange {
            unit,
            count,
            max: MAX_COUNT,
        });
    }

    // Only empty input or zero counts make this `None`, both handled above.
    IntervalSpec::from_parts(parts).ok_or(ParseFailure::EmptyInterval)
}

fn parse_clause(clause: &str) -> Result<(IntervalUnit, u32), ParseFailure> {
    let tokens: Vec<&str> = clause.split_whitespace().collect();
    let (count, unit) = match tokens.as_slice() {
        [] => return Err(ParseFailure::EmptyClause),
        [unit] => (1, *unit),
        [count, unit] => (parse_count(count, unit)?, *unit),
        _ => return Err(ParseFailure::UnrecognisedClause(clause.trim().to_string())),
    };

    if unit.chars().all(|c| c.is_ascii_digit()) {
        // "!repeat every 3" has a count but no unit
        return Err(ParseFailure::UnrecognisedClause(clause.trim().to_string()));
    }

    Ok((unit_named(unit)?, count))
}

/// Words are plural-normalized; anything else is reported as written.
fn unit_named(token: &str) -> Result<IntervalUnit, ParseFailure> {
    if !token.chars().all(char::is_alphabetic) {
        return Err(ParseFailure::UnknownUnit(token.to_string()));
    }
    let mut name = token.to_lowercase();
    if !name.ends_with('s') {
        name.push('s');
    }
    IntervalUnit::from_plural(&name).ok_or(ParseFailure::UnknownUnit(name))
}

fn parse_count(token: &str, unit: &str) -> Result<u32, ParseFailure> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseFailure::InvalidCount(token.to_string()));
    }
    let count: u64 = match token.parse() {
        Ok(n) => n,
        // more digits than u64 holds
        Err(_) => u64::MAX,
    };
    if count == 0 {
        return Err(ParseFailure::ZeroCount);
    }
    if count > u64::from(MAX_COUNT) {
        return Err(ParseFailure::CountOutOfRange {
            unit: unit_named(unit)?,
            count,
            max: MAX_COUNT,
        });
    }
    u32::try_from(count).map_err(|_| ParseFailure::InvalidCount(token.to_string()))
}

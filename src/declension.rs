//! Russian numeral agreement for "N years".
//!
//! Russian picks one of three noun forms depending on the count: `1 год`,
//! `2 года`, `5 лет`. The teens (11–14) always take the "many" form, which is
//! why the rule looks at both the last digit and the last two digits.
//!
//! [`resolve`] returns a grammatical class; turning it into display text is
//! a separate lookup ([`YearForm::year_word`]).

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("foundation year {foundation} is after the current year {current}")]
pub struct FoundationInFuture {
    pub foundation: i32,
    pub current: i32,
}

/// Grammatical number class for a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YearForm {
    /// 1, 21, 101, ... but not 11
    Singular,
    /// 2–4, 22–24, ... but not 12–14
    Few,
    Many,
}

impl YearForm {
    pub fn year_word(self) -> &'static str {
        match self {
            YearForm::Singular => "год",
            YearForm::Few => "года",
            YearForm::Many => "лет",
        }
    }
}

pub fn resolve(n: u64) -> YearForm {
    let last_digit = n % 10;
    let last_two = n % 100;
    if last_digit == 1 && last_two != 11 {
        YearForm::Singular
    } else if (2..=4).contains(&last_digit) && !(10..20).contains(&last_two) {
        YearForm::Few
    } else {
        YearForm::Many
    }
}

/// Whole years between the foundation year and `current_year`.
pub fn years_since(foundation: i32, current_year: i32) -> Result<u64, FoundationInFuture> {
    u64::try_from(i64::from(current_year) - i64::from(foundation)).map_err(|_| FoundationInFuture {
        foundation,
        current: current_year,
    })
}

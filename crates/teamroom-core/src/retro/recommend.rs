//! Weighted scoring of retrospective methods.
//!
//! ```text
//! score = 40 * feeling matches
//!       + 35 * purpose matches
//!       + 25 * method fits in the time budget
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::methods::{Feeling, Purpose, RetroMethod, METHODS};
use crate::error::ValidationError;

pub const FEELING_POINTS: u32 = 40;
pub const PURPOSE_POINTS: u32 = 35;
pub const TIME_POINTS: u32 = 25;

const DEFAULT_MAX_MINUTES: u32 = 30;
const OPEN_ENDED_MINUTES: u32 = 60;

/// How long the person is willing to spend, by its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBudget {
    pub max_minutes: u32,
}

impl TimeBudget {
    pub const SHORT: TimeBudget = TimeBudget { max_minutes: 10 };
    pub const MEDIUM: TimeBudget = TimeBudget { max_minutes: 30 };
    pub const LONG: TimeBudget = TimeBudget { max_minutes: 45 };

    pub fn fits(&self, method: &RetroMethod) -> bool {
        method.max_minutes <= self.max_minutes
    }
}

impl fmt::Display for TimeBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "up to {} min", self.max_minutes)
    }
}

impl FromStr for TimeBudget {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "time".into(),
                message: "time budget is empty".into(),
            });
        }
        Ok(TimeBudget {
            max_minutes: parse_max_minutes(s),
        })
    }
}

/// Upper bound in minutes of a free-form range such as `15-30`, `5-10分`
/// or `30+`.
///
/// Known ranges map directly; otherwise the largest number that ends a
/// range or precedes a unit wins. Unparseable input means 30 minutes.
pub fn parse_max_minutes(range: &str) -> u32 {
    let range = range.trim();
    if range.contains("5-15") {
        return 15;
    }
    if range.contains("15-30") {
        return 30;
    }
    if range.ends_with('+') || range.contains("分以上") {
        return OPEN_ENDED_MINUTES;
    }

    let mut best: Option<u32> = None;
    let mut chars = range.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if !c.is_ascii_digit() {
            continue;
        }
        let mut end = start + c.len_utf8();
        while let Some(&(i, d)) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            end = i + d.len_utf8();
            chars.next();
        }
        let terminated = match chars.peek() {
            None => true,
            Some(&(_, next)) => matches!(next, '-' | '分' | 'm' | ' '),
        };
        if terminated {
            if let Ok(n) = range[start..end].parse::<u32>() {
                best = Some(best.map_or(n, |b| b.max(n)));
            }
        }
    }
    best.unwrap_or(DEFAULT_MAX_MINUTES)
}

/// A scored method with the factors that contributed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub method: &'static RetroMethod,
    pub score: u32,
    pub feeling_match: bool,
    pub purpose_match: bool,
    pub fits_time: bool,
}

fn evaluate(
    method: &'static RetroMethod,
    feeling: Feeling,
    purpose: Purpose,
    budget: TimeBudget,
) -> Recommendation {
    let feeling_match = method.feeling == feeling;
    let purpose_match = method.purpose == purpose;
    let fits_time = budget.fits(method);
    let score = u32::from(feeling_match) * FEELING_POINTS
        + u32::from(purpose_match) * PURPOSE_POINTS
        + u32::from(fits_time) * TIME_POINTS;
    Recommendation {
        method,
        score,
        feeling_match,
        purpose_match,
        fits_time,
    }
}

/// Score a single method.
pub fn score(
    method: &'static RetroMethod,
    feeling: Feeling,
    purpose: Purpose,
    budget: TimeBudget,
) -> u32 {
    evaluate(method, feeling, purpose, budget).score
}

/// All methods, best first. Equal scores keep table order.
pub fn recommend(feeling: Feeling, purpose: Purpose, budget: TimeBudget) -> Vec<Recommendation> {
    let mut scored: Vec<Recommendation> = METHODS
        .iter()
        .map(|m| evaluate(m, feeling, purpose, budget))
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retro::methods::find_method;

    #[test]
    fn full_match_scores_one_hundred() {
        let kpt = find_method("kpt").unwrap();
        assert_eq!(
            score(kpt, Feeling::Frustrated, Purpose::SolveProblems, TimeBudget::MEDIUM),
            100
        );
        assert_eq!(
            score(kpt, Feeling::Frustrated, Purpose::SolveProblems, TimeBudget::SHORT),
            75
        );
        assert_eq!(score(kpt, Feeling::Tired, Purpose::KeepSimple, TimeBudget::SHORT), 0);
    }

    #[test]
    fn kpt_ranks_first_for_its_situation() {
        let recs = recommend(Feeling::Frustrated, Purpose::SolveProblems, TimeBudget::MEDIUM);
        assert_eq!(recs.len(), 7);
        assert_eq!(recs[0].method.key, "kpt");
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn ties_keep_table_order() {
        let recs = recommend(Feeling::Down, Purpose::ThinkDeeply, TimeBudget::SHORT);
        assert_eq!(recs[0].method.key, "gibbs");
        assert_eq!(recs[0].score, 75);
        assert_eq!(recs[1].method.key, "positive");
        let zero: Vec<&str> = recs.iter().filter(|r| r.score == 0).map(|r| r.method.key).collect();
        assert_eq!(zero, vec!["kpt", "ywt", "four-f", "four-ls", "simple"]);
    }

    #[test]
    fn mixed_factors() {
        let recs = recommend(Feeling::Tired, Purpose::ExtractLearnings, TimeBudget::MEDIUM);
        assert_eq!(recs[0].method.key, "positive");
        assert_eq!(recs[0].score, 65);
        assert_eq!(recs[1].method.key, "ywt");
        assert_eq!(recs[1].score, 60);
    }

    #[test]
    fn recommendation_json_is_camel_case() {
        let recs = recommend(Feeling::Frustrated, Purpose::SolveProblems, TimeBudget::MEDIUM);
        let json = serde_json::to_value(&recs[0]).unwrap();
        assert_eq!(json["feelingMatch"], true);
        assert_eq!(json["fitsTime"], true);
        assert_eq!(json["method"]["maxMinutes"], 30);
    }

    #[test]
    fn max_minutes_parsing() {
        assert_eq!(parse_max_minutes("5-15"), 15);
        assert_eq!(parse_max_minutes("15-30分"), 30);
        assert_eq!(parse_max_minutes("30分以上"), 60);
        assert_eq!(parse_max_minutes("30+"), 60);
        assert_eq!(parse_max_minutes("5-10分"), 10);
        assert_eq!(parse_max_minutes("30-45"), 45);
        assert_eq!(parse_max_minutes("20 min"), 20);
        assert_eq!(parse_max_minutes("whenever"), 30);
    }

    #[test]
    fn budget_from_str() {
        assert_eq!("5-10".parse::<TimeBudget>().unwrap(), TimeBudget::SHORT);
        assert_eq!("30-45".parse::<TimeBudget>().unwrap(), TimeBudget::LONG);
        assert!("  ".parse::<TimeBudget>().is_err());
    }
}

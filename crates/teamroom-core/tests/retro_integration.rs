//! Integration tests for the retrospective recommender.

use teamroom_core::retro::{find_method, recommend, render_sheet, METHODS};
use teamroom_core::{Feeling, Purpose, TimeBudget};

#[test]
fn test_each_method_wins_its_own_situation() {
    for method in &METHODS {
        let budget = TimeBudget {
            max_minutes: method.max_minutes,
        };
        let recs = recommend(method.feeling, method.purpose, budget);
        assert_eq!(recs[0].method.key, method.key);
        assert_eq!(recs[0].score, 100);
    }
}

#[test]
fn test_top_three_for_a_tired_quick_session() {
    let budget: TimeBudget = "5-10分".parse().unwrap();
    let recs = recommend(Feeling::Tired, Purpose::StayPositive, budget);
    let top: Vec<&str> = recs.iter().take(3).map(|r| r.method.key).collect();
    assert_eq!(top, vec!["positive", "kpt", "ywt"]);
    assert_eq!(recs[1].score, 0);
}

#[test]
fn test_sheet_for_recommended_method() {
    let recs = recommend(Feeling::Confused, Purpose::MultiAngle, TimeBudget::MEDIUM);
    let best = find_method(recs[0].method.key).unwrap();
    let sheet = render_sheet(best);
    assert!(sheet.starts_with("[4Ls Retrospective Sheet]"));
    for (i, q) in best.questions.iter().enumerate() {
        assert!(sheet.contains(&format!("{}. {q}", i + 1)));
    }
}

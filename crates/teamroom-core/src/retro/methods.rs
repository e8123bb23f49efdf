//! The retrospective methods the recommender chooses from.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValidationError;

/// How the person feels going into the retrospective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feeling {
    Frustrated,
    Fulfilled,
    Emotional,
    Confused,
    Down,
    WantClarity,
    Tired,
}

/// What the person wants out of the retrospective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Purpose {
    SolveProblems,
    ExtractLearnings,
    IncludeFeelings,
    MultiAngle,
    ThinkDeeply,
    KeepSimple,
    StayPositive,
}

impl Feeling {
    pub const ALL: [Feeling; 7] = [
        Feeling::Frustrated,
        Feeling::Fulfilled,
        Feeling::Emotional,
        Feeling::Confused,
        Feeling::Down,
        Feeling::WantClarity,
        Feeling::Tired,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Feeling::Frustrated => "frustrated",
            Feeling::Fulfilled => "fulfilled",
            Feeling::Emotional => "emotional",
            Feeling::Confused => "confused",
            Feeling::Down => "down",
            Feeling::WantClarity => "want-clarity",
            Feeling::Tired => "tired",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Feeling::Frustrated => "Feeling stuck or frustrated",
            Feeling::Fulfilled => "Feeling fulfilled",
            Feeling::Emotional => "Feeling emotional",
            Feeling::Confused => "Feeling confused",
            Feeling::Down => "Feeling down",
            Feeling::WantClarity => "Wanting a clean slate",
            Feeling::Tired => "Feeling tired",
        }
    }
}

impl Purpose {
    pub const ALL: [Purpose; 7] = [
        Purpose::SolveProblems,
        Purpose::ExtractLearnings,
        Purpose::IncludeFeelings,
        Purpose::MultiAngle,
        Purpose::ThinkDeeply,
        Purpose::KeepSimple,
        Purpose::StayPositive,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Purpose::SolveProblems => "solve-problems",
            Purpose::ExtractLearnings => "extract-learnings",
            Purpose::IncludeFeelings => "include-feelings",
            Purpose::MultiAngle => "multi-angle",
            Purpose::ThinkDeeply => "think-deeply",
            Purpose::KeepSimple => "keep-simple",
            Purpose::StayPositive => "stay-positive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Purpose::SolveProblems => "Solve problems",
            Purpose::ExtractLearnings => "Extract learnings",
            Purpose::IncludeFeelings => "Sort things out, feelings included",
            Purpose::MultiAngle => "Analyze from several angles",
            Purpose::ThinkDeeply => "Think things through systematically",
            Purpose::KeepSimple => "Keep it simple",
            Purpose::StayPositive => "Look back positively",
        }
    }
}

fn parse_key<T: Copy>(
    input: &str,
    all: &[T],
    key: impl Fn(&T) -> &'static str,
    field: &str,
) -> Result<T, ValidationError> {
    let wanted = input.trim().to_ascii_lowercase().replace('_', "-");
    all.iter()
        .copied()
        .find(|item| key(item) == wanted)
        .ok_or_else(|| ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!(
                "'{input}' is not one of: {}",
                all.iter().map(|i| key(i)).collect::<Vec<_>>().join(", ")
            ),
        })
}

impl FromStr for Feeling {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key(s, &Feeling::ALL, Feeling::key, "feeling")
    }
}

impl FromStr for Purpose {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key(s, &Purpose::ALL, Purpose::key, "purpose")
    }
}

impl fmt::Display for Feeling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One retrospective format with the situation it suits best.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetroMethod {
    pub key: &'static str,
    pub name: &'static str,
    pub min_minutes: u32,
    pub max_minutes: u32,
    pub feeling: Feeling,
    pub purpose: Purpose,
    pub questions: &'static [&'static str],
}

impl RetroMethod {
    /// e.g. `15-30 min`
    pub fn time_label(&self) -> String {
        format!("{}-{} min", self.min_minutes, self.max_minutes)
    }
}

pub static METHODS: [RetroMethod; 7] = [
    RetroMethod {
        key: "kpt",
        name: "KPT",
        min_minutes: 15,
        max_minutes: 30,
        feeling: Feeling::Frustrated,
        purpose: Purpose::SolveProblems,
        questions: &[
            "What went well and should continue?",
            "What problems or issues came up?",
            "What do you want to try next?",
        ],
    },
    RetroMethod {
        key: "ywt",
        name: "YWT",
        min_minutes: 10,
        max_minutes: 20,
        feeling: Feeling::Fulfilled,
        purpose: Purpose::ExtractLearnings,
        questions: &[
            "What did you do today?",
            "What did you learn from it?",
            "What do you want to do next?",
        ],
    },
    RetroMethod {
        key: "four-f",
        name: "4F",
        min_minutes: 20,
        max_minutes: 40,
        feeling: Feeling::Emotional,
        purpose: Purpose::IncludeFeelings,
        questions: &[
            "What actually happened?",
            "How did you feel at the time?",
            "What did you discover from it?",
            "What will you do going forward?",
        ],
    },
    RetroMethod {
        key: "four-ls",
        name: "4Ls",
        min_minutes: 20,
        max_minutes: 30,
        feeling: Feeling::Confused,
        purpose: Purpose::MultiAngle,
        questions: &[
            "What did you like or enjoy?",
            "What did you learn or discover?",
            "What was lacking or missing?",
            "What did you long for or wish you had?",
        ],
    },
    RetroMethod {
        key: "gibbs",
        name: "Gibbs Reflective Cycle",
        min_minutes: 30,
        max_minutes: 45,
        feeling: Feeling::Down,
        purpose: Purpose::ThinkDeeply,
        questions: &[
            "Describe in detail what happened.",
            "What were your feelings and reactions?",
            "What was good and what was bad?",
            "Why do you think it turned out that way?",
            "What did you learn from it?",
            "What will you do next time?",
        ],
    },
    RetroMethod {
        key: "simple",
        name: "What? So What? Now What?",
        min_minutes: 15,
        max_minutes: 25,
        feeling: Feeling::WantClarity,
        purpose: Purpose::KeepSimple,
        questions: &[
            "What happened? What did you notice?",
            "What does it mean?",
            "What will you do now?",
        ],
    },
    RetroMethod {
        key: "positive",
        name: "Four-Line Diary",
        min_minutes: 5,
        max_minutes: 10,
        feeling: Feeling::Tired,
        purpose: Purpose::StayPositive,
        questions: &[
            "What memorable thing happened today?",
            "What did you notice from it?",
            "What lesson did you take from that?",
            "What do you declare to become your ideal self?",
        ],
    },
];

/// Look a method up by key. `fourF` / `fourLs` spellings are accepted.
pub fn find_method(key: &str) -> Result<&'static RetroMethod, ValidationError> {
    let wanted = match key.trim() {
        "fourF" => "four-f",
        "fourLs" => "four-ls",
        other => other,
    }
    .to_ascii_lowercase();
    METHODS
        .iter()
        .find(|m| m.key == wanted)
        .ok_or_else(|| ValidationError::UnknownMethod(key.to_string()))
}

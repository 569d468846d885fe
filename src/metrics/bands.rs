use crate::store::StudentRecord;
use serde::Serialize;

/// Commentary category derived from a record's weakest subject score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Band {
    Failing,
    BalancedExcellent,
    Normal,
}

/// Ordered rules over the weakest score, first match wins.
/// Scores that match no rule fall through to [`Band::Normal`].
const BAND_RULES: &[(fn(u8) -> bool, Band)] = &[
    (below_pass_mark, Band::Failing),
    (above_excellent_mark, Band::BalancedExcellent),
];

fn below_pass_mark(weakest: u8) -> bool {
    weakest < 60
}

fn above_excellent_mark(weakest: u8) -> bool {
    weakest > 90
}

impl Band {
    /// Message shown under the student profile, if any
    pub fn commentary(self) -> Option<&'static str> {
        match self {
            Band::Failing => Some("Has a failing subject, needs close attention!"),
            Band::BalancedExcellent => Some("Very well-balanced and excellent across subjects!"),
            Band::Normal => None,
        }
    }
}

pub fn weakest_subject_band(record: &StudentRecord) -> Band {
    let weakest = record.weakest_score();
    BAND_RULES
        .iter()
        .find(|(matches, _)| matches(weakest))
        .map(|(_, band)| *band)
        .unwrap_or(Band::Normal)
}

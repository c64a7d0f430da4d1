//! Decision-quality rubric.
//!
//! A static table from (initiating action, responding action) to a quality
//! class. [`classify`] is total: any pair missing from the table is neutral.

use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Initiating action graded into the defensive-response bucket.
pub const DEFENSIVE_STARTER: &str = "Double Teamed";

/// Initiating actions graded into the offensive-decision bucket.
pub const OFFENSIVE_STARTERS: &[&str] = &["Isolation", "Pick and Roll", "Post Up", "Transition"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Excellent,
    Good,
    Neutral,
    Questionable,
    Risky,
}

impl Quality {
    pub fn score(self) -> f64 {
        match self {
            Quality::Excellent => 4.0,
            Quality::Good => 3.0,
            Quality::Neutral => 2.5,
            Quality::Questionable => 2.0,
            Quality::Risky => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Excellent => "excellent",
            Quality::Good => "good",
            Quality::Neutral => "neutral",
            Quality::Questionable => "questionable",
            Quality::Risky => "risky",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub quality: Quality,
    pub reason: Option<&'static str>,
}

impl Classification {
    const NEUTRAL: Classification = Classification { quality: Quality::Neutral, reason: None };
}

type RubricRow = (&'static str, &'static str, Quality, &'static str);

const RUBRIC: &[RubricRow] = &[
    // Against the double team
    ("Double Teamed", "Pass Out", Quality::Excellent, "Found the open man out of two defenders"),
    ("Double Teamed", "Split Double", Quality::Good, "Attacked the gap before the trap closed"),
    ("Double Teamed", "Pick Up Dribble", Quality::Questionable, "Killed the dribble inside the trap"),
    ("Double Teamed", "Forced Shot", Quality::Risky, "Shot over two defenders with a teammate open"),
    ("Double Teamed", "Turnover", Quality::Risky, "Gave the ball up against the trap"),
    // Isolation
    ("Isolation", "Pull Up Shot", Quality::Good, "Created separation for a rhythm jumper"),
    ("Isolation", "Drive to Basket", Quality::Good, "Beat the primary defender off the bounce"),
    ("Isolation", "Pass Out", Quality::Good, "Drew attention and moved the ball"),
    ("Isolation", "Step Back Three", Quality::Questionable, "Low-percentage look early in the clock"),
    ("Isolation", "Turnover", Quality::Risky, "Lost the ball one-on-one"),
    // Pick and roll
    ("Pick and Roll", "Pass to Roller", Quality::Excellent, "Hit the roller with the defense committed"),
    ("Pick and Roll", "Drive to Basket", Quality::Good, "Turned the corner off the screen"),
    ("Pick and Roll", "Pull Up Shot", Quality::Neutral, "Took what the drop coverage allowed"),
    ("Pick and Roll", "Pass Out", Quality::Good, "Kicked to the weak side after the help"),
    ("Pick and Roll", "Reject Screen", Quality::Questionable, "Went away from the designed action"),
    ("Pick and Roll", "Turnover", Quality::Risky, "Gave it away in the two-man game"),
    // Post
    ("Post Up", "Kick Out", Quality::Excellent, "Played inside-out to an open shooter"),
    ("Post Up", "Post Move", Quality::Good, "Went to work on the block"),
    ("Post Up", "Fadeaway", Quality::Questionable, "Settled for a contested fadeaway"),
    ("Post Up", "Turnover", Quality::Risky, "Lost the ball on the block"),
    // Transition
    ("Transition", "Fast Break Layup", Quality::Excellent, "Finished the break at the rim"),
    ("Transition", "Pass Ahead", Quality::Good, "Advanced the ball to the open runner"),
    ("Transition", "Pull Up Three", Quality::Questionable, "Early three with numbers available"),
    ("Transition", "Pull Back", Quality::Neutral, "No advantage, reset into the half court"),
    ("Transition", "Turnover", Quality::Risky, "Gave the ball back in the open floor"),
];

static RUBRIC_TABLE: Lazy<HashMap<&'static str, HashMap<&'static str, Classification>>> =
    Lazy::new(|| {
        let mut table: HashMap<&'static str, HashMap<&'static str, Classification>> = HashMap::new();
        for &(initiating, responding, quality, reason) in RUBRIC {
            table
                .entry(initiating)
                .or_default()
                .insert(responding, Classification { quality, reason: Some(reason) });
        }
        table
    });

/// Grade the response to an initiating action.
pub fn classify(initiating: &str, responding: &str) -> Classification {
    RUBRIC_TABLE
        .get(initiating)
        .and_then(|responses| responses.get(responding))
        .copied()
        .unwrap_or(Classification::NEUTRAL)
}

/// Whether the rubric defines any response for this initiating action.
pub fn has_responses(initiating: &str) -> bool {
    RUBRIC_TABLE.contains_key(initiating)
}

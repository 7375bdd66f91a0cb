//! The closed mood vocabulary shared by entries and analytics.
//!
//! Fifteen moods partitioned into three fixed bands of five. The band
//! mapping is total and stable; analytics roll-ups depend on it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary or secondary mood attached to a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    // Positive
    Happy,
    Excited,
    Relaxed,
    Grateful,
    Confident,
    // Neutral
    Calm,
    Thoughtful,
    Curious,
    Nostalgic,
    Bored,
    // Negative
    Sad,
    Angry,
    Stressed,
    Lonely,
    Anxious,
}

/// One of the three fixed bands partitioning the mood vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodCategory {
    Positive,
    Neutral,
    Negative,
}

impl Mood {
    /// Every mood, in band order.
    pub const ALL: [Mood; 15] = [
        Mood::Happy,
        Mood::Excited,
        Mood::Relaxed,
        Mood::Grateful,
        Mood::Confident,
        Mood::Calm,
        Mood::Thoughtful,
        Mood::Curious,
        Mood::Nostalgic,
        Mood::Bored,
        Mood::Sad,
        Mood::Angry,
        Mood::Stressed,
        Mood::Lonely,
        Mood::Anxious,
    ];

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Excited => "excited",
            Mood::Relaxed => "relaxed",
            Mood::Grateful => "grateful",
            Mood::Confident => "confident",
            Mood::Calm => "calm",
            Mood::Thoughtful => "thoughtful",
            Mood::Curious => "curious",
            Mood::Nostalgic => "nostalgic",
            Mood::Bored => "bored",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Stressed => "stressed",
            Mood::Lonely => "lonely",
            Mood::Anxious => "anxious",
        }
    }

    /// Parse from database string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "happy" => Some(Mood::Happy),
            "excited" => Some(Mood::Excited),
            "relaxed" => Some(Mood::Relaxed),
            "grateful" => Some(Mood::Grateful),
            "confident" => Some(Mood::Confident),
            "calm" => Some(Mood::Calm),
            "thoughtful" => Some(Mood::Thoughtful),
            "curious" => Some(Mood::Curious),
            "nostalgic" => Some(Mood::Nostalgic),
            "bored" => Some(Mood::Bored),
            "sad" => Some(Mood::Sad),
            "angry" => Some(Mood::Angry),
            "stressed" => Some(Mood::Stressed),
            "lonely" => Some(Mood::Lonely),
            "anxious" => Some(Mood::Anxious),
            _ => None,
        }
    }

    /// The band this mood belongs to.
    pub fn category(&self) -> MoodCategory {
        match self {
            Mood::Happy | Mood::Excited | Mood::Relaxed | Mood::Grateful | Mood::Confident => {
                MoodCategory::Positive
            }
            Mood::Calm | Mood::Thoughtful | Mood::Curious | Mood::Nostalgic | Mood::Bored => {
                MoodCategory::Neutral
            }
            Mood::Sad | Mood::Angry | Mood::Stressed | Mood::Lonely | Mood::Anxious => {
                MoodCategory::Negative
            }
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MoodCategory {
    /// Every band, in display order.
    pub const ALL: [MoodCategory; 3] = [
        MoodCategory::Positive,
        MoodCategory::Neutral,
        MoodCategory::Negative,
    ];

    /// Convert to display string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodCategory::Positive => "positive",
            MoodCategory::Neutral => "neutral",
            MoodCategory::Negative => "negative",
        }
    }
}

impl fmt::Display for MoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

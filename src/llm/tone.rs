//! Tone-of-voice presets for generated copy.

use serde::{Deserialize, Serialize};

/// Writing tone passed to the generator as an opaque instruction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Inspiring,
    Conversational,
    Persuasive,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Self::Professional,
        Self::Friendly,
        Self::Inspiring,
        Self::Conversational,
        Self::Persuasive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Friendly => "friendly",
            Self::Inspiring => "inspiring",
            Self::Conversational => "conversational",
            Self::Persuasive => "persuasive",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Professional => "Professional & Focused",
            Self::Friendly => "Friendly & Trustworthy",
            Self::Inspiring => "Inspiring & Motivational",
            Self::Conversational => "Conversational",
            Self::Persuasive => "Persuasive & Energetic",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Professional => {
                "Use a professional and informative tone. Be concise, accurate, and emphasize value."
            }
            Self::Friendly => {
                "Use a warm and approachable tone. Write like you're helping a friend make a good decision."
            }
            Self::Inspiring => {
                "Use a bold and inspiring tone. Spark curiosity and confidence in the reader."
            }
            Self::Conversational => {
                "Use a natural, casual tone like a real human talking. Make it relatable and easy to read."
            }
            Self::Persuasive => {
                "Use a persuasive and energetic tone. Create urgency and excitement to encourage clicks."
            }
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

//! Mood catalog for the honeypot persona.
//!
//! Every mood the honeypot reports maps to a human-readable description, a
//! visual effect category and a small set of face glyphs. Lookups are total:
//! identifiers outside the known set are kept verbatim and resolve to the
//! fallback entries below.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Description shown for moods outside the catalog
pub const UNKNOWN_MOOD_DESCRIPTION: &str = "Unknown mood";

/// Glyph shown for moods outside the catalog
pub const DEFAULT_GLYPH: &str = "[^_^]";

/// Mood reported by the honeypot
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MoodId {
    Excited,
    Happy,
    Laughing,
    Mischievous,
    Alert,
    Focused,
    Suspicious,
    #[default]
    Sleeping,
    Drowsy,
    Bored,
    Angry,
    Annoyed,
    Protective,
    Thinking,
    Confused,
    Smug,
    /// Identifier not in the catalog, kept as received
    Unknown(String),
}

/// Visual pulse category derived from a mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectCategory {
    Excited,
    Alert,
    Angry,
    None,
}

impl EffectCategory {
    /// Whether this category produces a visible pulse
    pub fn is_visible(self) -> bool {
        self != EffectCategory::None
    }
}

impl MoodId {
    /// All catalog moods, in display order
    pub const KNOWN: [MoodId; 16] = [
        MoodId::Excited,
        MoodId::Happy,
        MoodId::Laughing,
        MoodId::Mischievous,
        MoodId::Alert,
        MoodId::Focused,
        MoodId::Suspicious,
        MoodId::Sleeping,
        MoodId::Drowsy,
        MoodId::Bored,
        MoodId::Angry,
        MoodId::Annoyed,
        MoodId::Protective,
        MoodId::Thinking,
        MoodId::Confused,
        MoodId::Smug,
    ];

    /// Parse a wire identifier; never fails
    pub fn parse(id: &str) -> Self {
        match id {
            "excited" => MoodId::Excited,
            "happy" => MoodId::Happy,
            "laughing" => MoodId::Laughing,
            "mischievous" => MoodId::Mischievous,
            "alert" => MoodId::Alert,
            "focused" => MoodId::Focused,
            "suspicious" => MoodId::Suspicious,
            "sleeping" => MoodId::Sleeping,
            "drowsy" => MoodId::Drowsy,
            "bored" => MoodId::Bored,
            "angry" => MoodId::Angry,
            "annoyed" => MoodId::Annoyed,
            "protective" => MoodId::Protective,
            "thinking" => MoodId::Thinking,
            "confused" => MoodId::Confused,
            "smug" => MoodId::Smug,
            other => MoodId::Unknown(other.to_string()),
        }
    }

    /// Wire identifier
    pub fn as_str(&self) -> &str {
        match self {
            MoodId::Excited => "excited",
            MoodId::Happy => "happy",
            MoodId::Laughing => "laughing",
            MoodId::Mischievous => "mischievous",
            MoodId::Alert => "alert",
            MoodId::Focused => "focused",
            MoodId::Suspicious => "suspicious",
            MoodId::Sleeping => "sleeping",
            MoodId::Drowsy => "drowsy",
            MoodId::Bored => "bored",
            MoodId::Angry => "angry",
            MoodId::Annoyed => "annoyed",
            MoodId::Protective => "protective",
            MoodId::Thinking => "thinking",
            MoodId::Confused => "confused",
            MoodId::Smug => "smug",
            MoodId::Unknown(id) => id,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, MoodId::Unknown(_))
    }

    /// Operator-facing description
    pub fn description(&self) -> &'static str {
        match self {
            MoodId::Excited => "Excited - New visitor detected!",
            MoodId::Happy => "Happy - Someone's trying to log in!",
            MoodId::Laughing => "Laughing - This attacker is persistent!",
            MoodId::Mischievous => "Mischievous - Time to mess with them...",
            MoodId::Alert => "Alert - Monitoring for threats",
            MoodId::Focused => "Focused - Analyzing commands",
            MoodId::Suspicious => "Suspicious - Something's not right...",
            MoodId::Sleeping => "Sleeping - No activity for a while",
            MoodId::Drowsy => "Drowsy - Getting quiet around here",
            MoodId::Bored => "Bored - Waiting for some action",
            MoodId::Angry => "Angry - Under heavy attack!",
            MoodId::Annoyed => "Annoyed - These attacks are getting old",
            MoodId::Protective => "Protective - Blocking malicious activity",
            MoodId::Thinking => "Thinking - Processing information",
            MoodId::Confused => "Confused - Something unexpected happened",
            MoodId::Smug => "Smug - Successfully fooled an attacker!",
            MoodId::Unknown(_) => UNKNOWN_MOOD_DESCRIPTION,
        }
    }

    /// Effect pulse category for a tagged face update
    pub fn effect(&self) -> EffectCategory {
        match self {
            MoodId::Excited | MoodId::Happy | MoodId::Laughing => EffectCategory::Excited,
            MoodId::Alert | MoodId::Suspicious | MoodId::Protective => EffectCategory::Alert,
            MoodId::Angry | MoodId::Annoyed => EffectCategory::Angry,
            _ => EffectCategory::None,
        }
    }

    /// Face glyphs the honeypot draws for this mood
    pub fn glyphs(&self) -> &'static [&'static str] {
        match self {
            MoodId::Excited => &["[^_^]", "[^o^]", "[^▽^]", "[^◡^]"],
            MoodId::Happy => &["[^_^]", "[^.^]", "[^‿^]", "[^ω^]"],
            MoodId::Laughing => &["[^▾^]", "[>_<]", "[^∀^]", "[≧∇≦]"],
            MoodId::Mischievous => &["[^_~]", "[^_-]", "[^‾^]", "[^_°]"],
            MoodId::Alert => &["[o_o]", "[O_O]", "[◉_◉]", "[●_●]"],
            MoodId::Focused => &["[-_-]", "[=_=]", "[≡_≡]", "[━_━]"],
            MoodId::Suspicious => &["[¬_¬]", "[¬‿¬]", "[¬_-]", "[¬.¬]"],
            MoodId::Sleeping => &["[z_z]", "[zzz]", "[u_u]", "[~_~]"],
            MoodId::Drowsy => &["[¬_¬]", "[=_=]", "[-.-]", "[u.u]"],
            MoodId::Bored => &["[-_-]", "[=.=]", "[¬_¬]", "[._.]"],
            MoodId::Angry => &["[>_<]", "[x_x]", "[¬_¬]", "[>.<]"],
            MoodId::Annoyed => &["[¬_¬]", "[-_-]", "[=_=]", "[¬.¬]"],
            MoodId::Protective => &["[◉_◉]", "[O_O]", "[●_●]", "[⊙_⊙]"],
            MoodId::Thinking => &["[o.o]", "[°_°]", "[◔_◔]", "[⊙_⊙]"],
            MoodId::Confused => &["[?_?]", "[°_°]", "[◔_◔]", "[⊙.⊙]"],
            MoodId::Smug => &["[^_~]", "[^‾^]", "[^_-]", "[¬‿¬]"],
            MoodId::Unknown(_) => &[DEFAULT_GLYPH],
        }
    }

    /// Glyph used when an update names a mood but no face
    pub fn canonical_glyph(&self) -> &'static str {
        self.glyphs().first().copied().unwrap_or(DEFAULT_GLYPH)
    }
}

impl From<String> for MoodId {
    fn from(id: String) -> Self {
        MoodId::parse(&id)
    }
}

impl From<&str> for MoodId {
    fn from(id: &str) -> Self {
        MoodId::parse(id)
    }
}

impl From<MoodId> for String {
    fn from(mood: MoodId) -> Self {
        mood.as_str().to_string()
    }
}

impl fmt::Display for MoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_known_ids() {
        for mood in MoodId::KNOWN.iter() {
            assert_eq!(&MoodId::parse(mood.as_str()), mood);
        }
    }

    #[test]
    fn test_unknown_id_is_preserved() {
        let mood = MoodId::parse("melancholic");
        assert_eq!(mood, MoodId::Unknown("melancholic".to_string()));
        assert_eq!(mood.as_str(), "melancholic");
        assert!(!mood.is_known());
    }

    #[test]
    fn test_unknown_mood_has_default_glyph() {
        assert_eq!(MoodId::parse("").canonical_glyph(), DEFAULT_GLYPH);
    }

    #[test]
    fn test_serde_uses_wire_identifier() {
        let json = serde_json::to_string(&MoodId::Smug).unwrap();
        assert_eq!(json, "\"smug\"");
        let mood: MoodId = serde_json::from_str("\"grumpy\"").unwrap();
        assert_eq!(mood.description(), UNKNOWN_MOOD_DESCRIPTION);
    }

    #[test]
    fn test_default_mood_is_sleeping() {
        assert_eq!(MoodId::default(), MoodId::Sleeping);
    }
}

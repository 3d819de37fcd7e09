//! Tests for the mood catalog.
//!
//! Tests verify:
//! - Description lookup is total over the catalog
//! - Unknown identifiers resolve to the fixed fallback
//! - Effect partition matches the dashboard pulse rules

use rassh_shared::mood::{MoodId, DEFAULT_GLYPH, UNKNOWN_MOOD_DESCRIPTION};
use rassh_shared::EffectCategory;

#[test]
fn test_every_known_mood_has_description() {
    for mood in MoodId::KNOWN.iter() {
        let desc = mood.description();
        assert!(!desc.is_empty());
        assert_ne!(desc, UNKNOWN_MOOD_DESCRIPTION, "{} fell back", mood);
    }
}

#[test]
fn test_every_known_mood_has_glyphs() {
    for mood in MoodId::KNOWN.iter() {
        assert_eq!(mood.glyphs().len(), 4, "{} glyph set", mood);
    }
}

#[test]
fn test_unknown_mood_uses_fallback() {
    for id in ["", "ecstatic", "ANGRY", "angry "] {
        let mood = MoodId::parse(id);
        assert_eq!(mood.description(), UNKNOWN_MOOD_DESCRIPTION);
        assert_eq!(mood.canonical_glyph(), DEFAULT_GLYPH);
        assert_eq!(mood.effect(), EffectCategory::None);
    }
}

#[test]
fn test_mischievous_description() {
    assert_eq!(
        MoodId::Mischievous.description(),
        "Mischievous - Time to mess with them..."
    );
}

#[test]
fn test_effect_partition() {
    let excited = [MoodId::Excited, MoodId::Happy, MoodId::Laughing];
    let alert = [MoodId::Alert, MoodId::Suspicious, MoodId::Protective];
    let angry = [MoodId::Angry, MoodId::Annoyed];

    for mood in MoodId::KNOWN.iter() {
        let expected = if excited.contains(mood) {
            EffectCategory::Excited
        } else if alert.contains(mood) {
            EffectCategory::Alert
        } else if angry.contains(mood) {
            EffectCategory::Angry
        } else {
            EffectCategory::None
        };
        assert_eq!(mood.effect(), expected, "{}", mood);
    }
}

#[test]
fn test_only_partitioned_moods_are_visible() {
    assert!(MoodId::Angry.effect().is_visible());
    assert!(!MoodId::Mischievous.effect().is_visible());
    assert!(!MoodId::Sleeping.effect().is_visible());
}

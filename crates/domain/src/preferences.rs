//! Closed preference types for child accounts.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use storyteller_core::{AppError, AppResult};

/// Maximum number of favorite themes an account may store.
pub const MAX_FAVORITE_THEMES: usize = 5;

/// Story themes offered to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryTheme {
    /// Quests and journeys.
    Adventure,
    /// Friendship stories.
    Friendship,
    /// Family stories.
    Family,
    /// The outdoors.
    Nature,
    /// Science and discovery.
    Science,
    /// Magic and make-believe.
    Fantasy,
    /// Puzzles and mysteries.
    Mystery,
    /// Animal stories.
    Animals,
}

impl StoryTheme {
    /// Returns the storage value for this theme.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adventure => "adventure",
            Self::Friendship => "friendship",
            Self::Family => "family",
            Self::Nature => "nature",
            Self::Science => "science",
            Self::Fantasy => "fantasy",
            Self::Mystery => "mystery",
            Self::Animals => "animals",
        }
    }
}

impl FromStr for StoryTheme {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "adventure" => Ok(Self::Adventure),
            "friendship" => Ok(Self::Friendship),
            "family" => Ok(Self::Family),
            "nature" => Ok(Self::Nature),
            "science" => Ok(Self::Science),
            "fantasy" => Ok(Self::Fantasy),
            "mystery" => Ok(Self::Mystery),
            "animals" => Ok(Self::Animals),
            _ => Err(AppError::Validation(format!(
                "unknown story theme '{value}'"
            ))),
        }
    }
}

/// Reading level used to pick story complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingLevel {
    /// Ages 6-7.
    Beginner,
    /// Ages 8-9.
    Elementary,
    /// Ages 10-11.
    Intermediate,
    /// Age 12.
    Advanced,
}

impl ReadingLevel {
    /// Returns the storage value for this level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Elementary => "elementary",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl FromStr for ReadingLevel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "beginner" => Ok(Self::Beginner),
            "elementary" => Ok(Self::Elementary),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(AppError::Validation(format!(
                "unknown reading level '{value}'"
            ))),
        }
    }
}

/// Font size preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSize {
    /// Small text.
    Small,
    /// Medium text.
    #[default]
    Medium,
    /// Large text.
    Large,
    /// Extra large text.
    ExtraLarge,
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTheme {
    /// Bright palette.
    #[default]
    Bright,
    /// Pastel palette.
    Pastel,
    /// Dark palette.
    Dark,
    /// High contrast palette.
    HighContrast,
    /// Rainbow palette.
    Rainbow,
}

/// Reader preferences attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AccountPreferencesRecord")]
pub struct AccountPreferences {
    favorite_themes: Vec<StoryTheme>,
    reading_level: ReadingLevel,
    font_size: FontSize,
    color_theme: ColorTheme,
    voice_narration_enabled: bool,
    background_music_enabled: bool,
}

#[derive(Deserialize)]
struct AccountPreferencesRecord {
    #[serde(default)]
    favorite_themes: Vec<StoryTheme>,
    reading_level: ReadingLevel,
    #[serde(default)]
    font_size: FontSize,
    #[serde(default)]
    color_theme: ColorTheme,
    #[serde(default = "default_voice_narration")]
    voice_narration_enabled: bool,
    #[serde(default)]
    background_music_enabled: bool,
}

const DEFAULT_VOICE_NARRATION: bool = true;
const DEFAULT_BACKGROUND_MUSIC: bool = false;

fn default_voice_narration() -> bool {
    DEFAULT_VOICE_NARRATION
}

impl TryFrom<AccountPreferencesRecord> for AccountPreferences {
    type Error = AppError;

    fn try_from(record: AccountPreferencesRecord) -> Result<Self, Self::Error> {
        Ok(Self::new(record.favorite_themes, record.reading_level)?
            .with_display(record.font_size, record.color_theme)
            .with_audio(
                record.voice_narration_enabled,
                record.background_music_enabled,
            ))
    }
}

impl AccountPreferences {
    /// Creates preferences with default display and audio settings.
    pub fn new(favorite_themes: Vec<StoryTheme>, reading_level: ReadingLevel) -> AppResult<Self> {
        if favorite_themes.len() > MAX_FAVORITE_THEMES {
            return Err(AppError::Validation(format!(
                "at most {MAX_FAVORITE_THEMES} favorite themes are allowed"
            )));
        }

        let unique: BTreeSet<StoryTheme> = favorite_themes.iter().copied().collect();
        if unique.len() != favorite_themes.len() {
            return Err(AppError::Validation(
                "favorite themes must not contain duplicates".to_owned(),
            ));
        }

        Ok(Self {
            favorite_themes,
            reading_level,
            font_size: FontSize::default(),
            color_theme: ColorTheme::default(),
            voice_narration_enabled: DEFAULT_VOICE_NARRATION,
            background_music_enabled: DEFAULT_BACKGROUND_MUSIC,
        })
    }

    /// Sets display preferences.
    #[must_use]
    pub fn with_display(mut self, font_size: FontSize, color_theme: ColorTheme) -> Self {
        self.font_size = font_size;
        self.color_theme = color_theme;
        self
    }

    /// Sets audio preferences.
    #[must_use]
    pub fn with_audio(
        mut self,
        voice_narration_enabled: bool,
        background_music_enabled: bool,
    ) -> Self {
        self.voice_narration_enabled = voice_narration_enabled;
        self.background_music_enabled = background_music_enabled;
        self
    }

    /// Returns favorite themes in the order the reader picked them.
    #[must_use]
    pub fn favorite_themes(&self) -> &[StoryTheme] {
        &self.favorite_themes
    }

    /// Returns the reading level.
    #[must_use]
    pub fn reading_level(&self) -> ReadingLevel {
        self.reading_level
    }

    /// Returns the font size.
    #[must_use]
    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    /// Returns the color theme.
    #[must_use]
    pub fn color_theme(&self) -> ColorTheme {
        self.color_theme
    }

    /// Returns whether stories are narrated aloud.
    #[must_use]
    pub fn voice_narration_enabled(&self) -> bool {
        self.voice_narration_enabled
    }

    /// Returns whether background music plays.
    #[must_use]
    pub fn background_music_enabled(&self) -> bool {
        self.background_music_enabled
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn theme_storage_value_parses_back() {
        let parsed = StoryTheme::from_str(StoryTheme::Mystery.as_str());
        assert!(matches!(parsed, Ok(StoryTheme::Mystery)));
    }

    #[test]
    fn reading_level_storage_value_parses_back() {
        for level in [
            ReadingLevel::Beginner,
            ReadingLevel::Elementary,
            ReadingLevel::Intermediate,
            ReadingLevel::Advanced,
        ] {
            assert_eq!(ReadingLevel::from_str(level.as_str()).ok(), Some(level));
        }
        assert!(ReadingLevel::from_str("expert").is_err());
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(StoryTheme::from_str("horror").is_err());
    }

    #[test]
    fn too_many_favorite_themes_are_rejected() {
        let themes = vec![
            StoryTheme::Adventure,
            StoryTheme::Friendship,
            StoryTheme::Family,
            StoryTheme::Nature,
            StoryTheme::Science,
            StoryTheme::Fantasy,
        ];
        assert!(AccountPreferences::new(themes, ReadingLevel::Beginner).is_err());
    }

    #[test]
    fn duplicate_favorite_themes_are_rejected() {
        let themes = vec![StoryTheme::Animals, StoryTheme::Animals];
        assert!(AccountPreferences::new(themes, ReadingLevel::Advanced).is_err());
    }

    #[test]
    fn deserialization_applies_defaults_and_validation() {
        let parsed: Result<AccountPreferences, _> = serde_json::from_value(serde_json::json!({
            "favorite_themes": ["friendship", "adventure"],
            "reading_level": "elementary"
        }));
        let preferences = parsed.unwrap_or_else(|error| panic!("test: {error}"));
        assert_eq!(preferences.font_size(), FontSize::Medium);
        assert_eq!(preferences.reading_level(), ReadingLevel::Elementary);
        assert!(preferences.voice_narration_enabled());
        assert!(!preferences.background_music_enabled());

        let invalid: Result<AccountPreferences, _> = serde_json::from_value(serde_json::json!({
            "favorite_themes": ["nature", "nature"],
            "reading_level": "beginner"
        }));
        assert!(invalid.is_err());
    }

    #[test]
    fn parsed_preferences_match_constructed_defaults() {
        let constructed =
            AccountPreferences::new(vec![StoryTheme::Adventure], ReadingLevel::Beginner)
                .unwrap_or_else(|error| panic!("test: {error}"));
        let parsed: AccountPreferences = serde_json::from_value(serde_json::json!({
            "favorite_themes": ["adventure"],
            "reading_level": "beginner"
        }))
        .unwrap_or_else(|error| panic!("test: {error}"));

        assert_eq!(parsed, constructed);
    }
}

//! The reminder dialog: what it says and the four ways out of it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::events::APP_NAME;
use crate::storage::Config;

pub const PROMPT_TEXT: &str = "Time to review! Do you want to start now?";

/// User's answer to a nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptChoice {
    Start,
    Snooze,
    DisableToday,
    Cancel,
}

impl PromptChoice {
    pub const ALL: [PromptChoice; 4] = [
        PromptChoice::Start,
        PromptChoice::Snooze,
        PromptChoice::DisableToday,
        PromptChoice::Cancel,
    ];

    /// Button label.
    pub fn label(self, snooze_minutes: i64) -> String {
        match self {
            PromptChoice::Start => "Start Review".to_string(),
            PromptChoice::Snooze => format!("Snooze {snooze_minutes}m"),
            PromptChoice::DisableToday => "Disable for Today".to_string(),
            PromptChoice::Cancel => "Cancel".to_string(),
        }
    }
}

impl std::str::FromStr for PromptChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "start" | "s" => Ok(PromptChoice::Start),
            "2" | "snooze" | "z" => Ok(PromptChoice::Snooze),
            "3" | "disable" | "disable-today" | "d" => Ok(PromptChoice::DisableToday),
            "4" | "cancel" | "c" => Ok(PromptChoice::Cancel),
            other => Err(format!("unknown choice: {other}")),
        }
    }
}

/// Content handed to the presenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NudgePrompt {
    pub title: String,
    pub text: String,
    pub snooze_minutes: i64,
    /// When the nudge became due.
    pub due_at: NaiveDateTime,
}

impl NudgePrompt {
    pub fn new(config: &Config, due_at: NaiveDateTime) -> Self {
        Self {
            title: APP_NAME.to_string(),
            text: PROMPT_TEXT.to_string(),
            snooze_minutes: config.snooze_label_minutes(),
            due_at,
        }
    }

    /// Choices in button order, paired with their labels.
    pub fn choices(&self) -> Vec<(PromptChoice, String)> {
        PromptChoice::ALL
            .iter()
            .map(|choice| (*choice, choice.label(self.snooze_minutes)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_numbers_and_names() {
        assert_eq!("1".parse::<PromptChoice>(), Ok(PromptChoice::Start));
        assert_eq!("Snooze".parse::<PromptChoice>(), Ok(PromptChoice::Snooze));
        assert_eq!("disable".parse::<PromptChoice>(), Ok(PromptChoice::DisableToday));
        assert_eq!(" c ".parse::<PromptChoice>(), Ok(PromptChoice::Cancel));
        assert!("later".parse::<PromptChoice>().is_err());
    }

    #[test]
    fn prompt_labels_reflect_snooze_minutes() {
        let config = Config {
            snooze_minutes: 10.0,
            ..Config::default()
        };
        let due = NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let prompt = NudgePrompt::new(&config, due);

        let labels: Vec<String> = prompt.choices().into_iter().map(|(_, l)| l).collect();
        assert_eq!(
            labels,
            vec!["Start Review", "Snooze 10m", "Disable for Today", "Cancel"]
        );
        assert_eq!(prompt.text, PROMPT_TEXT);
    }
}

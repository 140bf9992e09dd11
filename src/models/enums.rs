use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(MessageSender {
    User => "user",
    Assistant => "assistant",
});

str_enum!(UrgencyLevel {
    Low => "low",
    Medium => "medium",
    High => "high",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sender_round_trips() {
        assert_eq!(MessageSender::User.as_str(), "user");
        assert_eq!(
            MessageSender::from_str("assistant").unwrap(),
            MessageSender::Assistant
        );
    }

    #[test]
    fn unknown_sender_rejected() {
        assert!(MessageSender::from_str("bot").is_err());
    }

    #[test]
    fn urgency_serializes_snake_case() {
        let json = serde_json::to_string(&UrgencyLevel::High).unwrap();
        assert_eq!(json, r#""high""#);
        let back: UrgencyLevel = serde_json::from_str(r#""medium""#).unwrap();
        assert_eq!(back, UrgencyLevel::Medium);
    }
}

use serde::{Deserialize, Serialize};

/// Returned when a string does not name a variant of one of the enums below.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field} value: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(PayorType {
    Medicare => "Medicare",
    Ppo => "PPO",
    Medicaid => "Medicaid",
    Hmo => "HMO",
    Other => "Other",
    Unknown => "Unknown",
});

str_enum!(RepeatPolicy {
    NoLimit => "NO_LIMIT",
    OnceOnly => "ONCE_ONLY",
    Cooldown => "COOLDOWN",
});

str_enum!(Priority {
    High => "high",
    Medium => "medium",
    Low => "low",
});

str_enum!(CooldownStatus {
    Eligible => "eligible",
    InCooldown => "in_cooldown",
    OnceOnlyCompleted => "once_only_completed",
    NoLimit => "no_limit",
});

impl Default for PayorType {
    fn default() -> Self {
        Self::Unknown
    }
}

impl Priority {
    /// Lenient parse for model output ("High", " medium ", ...).
    pub fn parse_lenient(s: &str) -> Option<Self> {
        s.trim().to_lowercase().parse().ok()
    }
}

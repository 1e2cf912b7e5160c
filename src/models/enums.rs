use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

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
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Forms and legacy rows disagree on casing ("Female" vs "female").
                let lowered = s.trim().to_ascii_lowercase();
                match lowered.as_str() {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
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

str_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
});

str_enum!(DiabetesType {
    Type1 => "type1",
    Type2 => "type2",
    Gestational => "gestational",
});

str_enum!(Mobility {
    Independent => "independent",
    Assisted => "assisted",
    Dependent => "dependent",
});

str_enum!(CognitiveStatus {
    Normal => "normal",
    MildImpairment => "mild-impairment",
    ModerateImpairment => "moderate-impairment",
    SevereImpairment => "severe-impairment",
});

impl Gender {
    pub fn is_female(self) -> bool {
        matches!(self, Gender::Female)
    }
}

use serde::{Deserialize, Serialize};

use super::schema::SchemaDescriptor;
use super::LookupError;

/// Glyph the completion service is asked to put in front of every serious
/// adverse effect.
pub const SERIOUS_GLYPH: &str = "\u{26A0}\u{FE0F}";

/// Enum with a fixed wire string per variant, `as_str` and a
/// case-insensitive `FromStr`.
macro_rules! option_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = LookupError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(if s.eq_ignore_ascii_case($s) {
                    return Ok(Self::$variant);
                })+
                Err(LookupError::InvalidOption(format!(
                    "{} must be one of {:?}, got {s:?}",
                    stringify!($name),
                    [$($s),+]
                )))
            }
        }
    };
}

option_enum!(
    /// Language of the generated free text.
    Language {
        En => "en",
        Ar => "ar",
    }
);

option_enum!(
    /// Region used to steer source prioritization.
    Region {
        Global => "global",
        Us => "US",
        Eu => "EU",
        Uk => "UK",
        Sa => "SA",
    }
);

option_enum!(
    /// Dispensing status. No third state exists.
    Availability {
        Rx => "Rx",
        Otc => "OTC",
    }
);

impl Language {
    /// Human-readable name used inside the prompt.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ar => "Arabic",
        }
    }

    /// Text direction for rendering.
    pub fn direction(&self) -> &'static str {
        match self {
            Language::En => "ltr",
            Language::Ar => "rtl",
        }
    }
}

impl Region {
    /// Regulatory sources the completion service should prioritize.
    pub fn source_hint(&self) -> &'static str {
        match self {
            Region::Global => "WHO/MedlinePlus",
            Region::Us => "FDA",
            Region::Eu => "EMA",
            Region::Uk => "NHS",
            Region::Sa => "SFDA",
        }
    }
}

/// Structured drug monograph returned by the completion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drug {
    pub id: String,
    /// Region tags as emitted by the service. Unknown tags are kept verbatim.
    #[serde(default)]
    pub region: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<DrugIdentifiers>,
    pub generic_name: String,
    pub brand_names: Vec<String>,
    #[serde(rename = "class")]
    pub classes: Vec<String>,
    pub mechanism_of_action: String,
    pub indications: Vec<String>,
    pub dosing_adult: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosing_pediatric: Option<Vec<String>>,
    pub contraindications: Vec<String>,
    pub warnings: Vec<String>,
    pub adverse_effects: AdverseEffects,
    pub interactions: Interactions,
    pub pregnancy_lactation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renal_hepatic_adjustment: Option<String>,
    pub alternatives: Alternatives,
    pub references: Vec<Reference>,
    pub quick_warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxed_warning: Option<String>,
    pub availability: Availability,
}

/// External registry cross-references. Never checked against the registries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrugIdentifiers {
    #[serde(rename = "rxCui", default, skip_serializing_if = "Option::is_none")]
    pub rx_cui: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atc: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cas: Option<Vec<String>>,
    #[serde(rename = "emaId", default, skip_serializing_if = "Option::is_none")]
    pub ema_id: Option<String>,
    #[serde(rename = "sfdaRegNo", default, skip_serializing_if = "Option::is_none")]
    pub sfda_reg_no: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdverseEffects {
    pub common: Vec<String>,
    /// Each item is expected to start with [`SERIOUS_GLYPH`].
    pub serious: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interactions {
    pub severe: Vec<String>,
    pub moderate: Vec<String>,
    pub minor: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alcohol: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternatives {
    pub generic_equivalents: Vec<String>,
    pub therapeutic_alternatives: Vec<TherapeuticAlternative>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapeuticAlternative {
    pub name: String,
    /// Key difference from the searched drug.
    pub difference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_accessed: Option<String>,
}

impl Drug {
    /// A boxed warning switches the detail view to alert styling.
    pub fn has_boxed_warning(&self) -> bool {
        self.boxed_warning
            .as_deref()
            .is_some_and(|w| !w.trim().is_empty())
    }

    /// Region tags that map to a known [`Region`].
    pub fn known_regions(&self) -> Vec<Region> {
        self.region
            .iter()
            .filter_map(|tag| tag.parse().ok())
            .collect()
    }
}

impl AdverseEffects {
    /// Serious effects with the warning glyph removed, for renderers that
    /// style severity themselves.
    pub fn serious_stripped(&self) -> impl Iterator<Item = &str> {
        self.serious.iter().map(|s| strip_serious_glyph(s))
    }
}

/// Remove a leading warning glyph (with or without the emoji selector).
pub fn strip_serious_glyph(text: &str) -> &str {
    text.trim_start()
        .trim_start_matches('\u{26A0}')
        .trim_start_matches('\u{FE0F}')
        .trim_start()
}

/// One structured extraction request: the instruction block plus the
/// output shape the service must follow.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub prompt: &'a str,
    pub schema: &'a SchemaDescriptor,
}

/// Text completion service abstraction (allows mocking).
///
/// One call to `complete` is exactly one outbound request. Implementations
/// collapse every failure into [`LookupError::FetchFailed`].
pub trait CompletionClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LookupError>;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;
}

use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
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

str_enum!(ExtractionStatus {
    Active => "activo",
    NeedsReview => "revision_requerida",
});

str_enum!(Structure {
    A => "A",
    B => "B",
    C => "C",
});

impl Structure {
    /// All structure codes, in counter order.
    pub fn all() -> &'static [Structure] {
        &[Self::A, Self::B, Self::C]
    }
}

str_enum!(RenderMode {
    Structural => "structural",
    Family => "family",
});

str_enum!(ForceStructure {
    Auto => "auto",
    A => "A",
    B => "B",
    C => "C",
});

impl ForceStructure {
    /// Resolve the final structure: a non-auto force overrides the classifier.
    pub fn resolve(&self, detected: Structure) -> Structure {
        match self {
            Self::Auto => detected,
            Self::A => Structure::A,
            Self::B => Structure::B,
            Self::C => Structure::C,
        }
    }
}

str_enum!(CopyNumber {
    Primera => "PRIMERA",
    Segunda => "SEGUNDA",
});

str_enum!(ActFamily {
    Poder => "poder",
    Compraventa => "compraventa",
    Hipoteca => "hipoteca",
    Autorizacion => "autorizacion",
    Reconocimiento => "reconocimiento",
    Generica => "generica",
});

impl ActFamily {
    pub fn all() -> &'static [ActFamily] {
        &[
            Self::Poder,
            Self::Compraventa,
            Self::Hipoteca,
            Self::Autorizacion,
            Self::Reconocimiento,
            Self::Generica,
        ]
    }
}

/// Natural person vs. company, as detected from the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonKind {
    Natural,
    Juridica,
}

/// Grammatical gender as used for Spanish agreement. `Unknown` falls
/// back to combined slash forms ("hijo/a").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
    Unknown,
}

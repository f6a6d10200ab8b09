//! Dog profile: a fixed-shape record built once at the request boundary.
//!
//! Free-text request fields (size, breed or behaviour) are parsed here into
//! enumerated classes.  Text that matches nothing is dropped, and the
//! estimator falls back to its documented defaults.  Profile parsing never
//! fails.

/// Body-size class.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    /// Parse English or Spanish size labels, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" | "s" | "pequeño" | "pequeno"  => Some(SizeClass::Small),
            "medium" | "m" | "mediano"             => Some(SizeClass::Medium),
            "large" | "l" | "grande"               => Some(SizeClass::Large),
            _                                      => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeClass::Small  => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large  => "large",
        }
    }
}

/// Behaviour class: how eagerly the dog walks.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Temperament {
    Calm,
    Curious,
    Energetic,
}

impl Temperament {
    /// Parse English or Spanish behaviour labels, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "calm" | "tranquil" | "relaxed" | "tranquilo"       => Some(Temperament::Calm),
            "curious" | "curioso"                               => Some(Temperament::Curious),
            "energetic" | "active" | "energético" | "energetico" => Some(Temperament::Energetic),
            _                                                   => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Temperament::Calm      => "calm",
            Temperament::Curious   => "curious",
            Temperament::Energetic => "energetic",
        }
    }
}

// ── Breed table ───────────────────────────────────────────────────────────────

/// Traits looked up from a known breed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BreedTraits {
    pub temperament: Temperament,
    pub size:        SizeClass,
}

use SizeClass::{Large, Medium, Small};
use Temperament::{Calm, Curious, Energetic};

/// Lower-case breed names (and common short forms).
const BREEDS: &[(&str, Temperament, SizeClass)] = &[
    ("labrador retriever",    Energetic, Large),
    ("labrador",              Energetic, Large),
    ("golden retriever",      Energetic, Large),
    ("german shepherd",       Energetic, Large),
    ("pastor alemán",         Energetic, Large),
    ("siberian husky",        Energetic, Large),
    ("husky",                 Energetic, Large),
    ("boxer",                 Energetic, Large),
    ("border collie",         Energetic, Medium),
    ("jack russell terrier",  Energetic, Small),
    ("beagle",                Curious,   Medium),
    ("cocker spaniel",        Curious,   Medium),
    ("poodle",                Curious,   Medium),
    ("caniche",               Curious,   Medium),
    ("dachshund",             Curious,   Small),
    ("teckel",                Curious,   Small),
    ("yorkshire terrier",     Curious,   Small),
    ("chihuahua",             Curious,   Small),
    ("pug",                   Calm,      Small),
    ("carlino",               Calm,      Small),
    ("shih tzu",              Calm,      Small),
    ("french bulldog",        Calm,      Small),
    ("bulldog",               Calm,      Medium),
    ("basset hound",          Calm,      Medium),
    ("greyhound",             Calm,      Large),
    ("galgo",                 Calm,      Large),
    ("great dane",            Calm,      Large),
    ("gran danés",            Calm,      Large),
];

/// Look up a breed by name, case-insensitively.
pub fn lookup_breed(name: &str) -> Option<BreedTraits> {
    let key = name.trim().to_lowercase();
    BREEDS
        .iter()
        .find(|(breed, _, _)| *breed == key)
        .map(|&(_, temperament, size)| BreedTraits { temperament, size })
}

// ── DogProfile ────────────────────────────────────────────────────────────────

/// Everything the planner knows about the dog.  Never mutated after
/// construction.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DogProfile {
    /// Breed name as given (may be absent from the breed table).
    pub breed:       Option<String>,
    /// Behaviour class given explicitly rather than derived from the breed.
    pub temperament: Option<Temperament>,
    /// Size class given explicitly rather than derived from the breed.
    pub size:        Option<SizeClass>,
    pub weight_kg:   Option<f64>,
    pub age_years:   Option<f64>,
}

impl DogProfile {
    /// Age assumed when none (or an unusable one) is given.
    pub const DEFAULT_AGE_YEARS: f64 = 5.0;

    /// Build a profile from loosely typed request fields.
    ///
    /// `breed_or_behavior` is read as a temperament when it names one
    /// ("calm", "curioso", …) and as a breed otherwise.
    pub fn from_fields(
        size:              Option<&str>,
        age_years:         Option<f64>,
        breed_or_behavior: Option<&str>,
        weight_kg:         Option<f64>,
    ) -> Self {
        let text = breed_or_behavior.map(str::trim).filter(|s| !s.is_empty());
        let temperament = text.and_then(Temperament::parse);
        let breed = match temperament {
            Some(_) => None,
            None => text.map(str::to_owned),
        };
        Self {
            breed,
            temperament,
            size: size.and_then(SizeClass::parse),
            weight_kg,
            age_years,
        }
    }

    /// Traits of the breed, when it is in the breed table.
    pub fn breed_traits(&self) -> Option<BreedTraits> {
        self.breed.as_deref().and_then(lookup_breed)
    }

    /// Explicit size, else the breed's size.
    pub fn effective_size(&self) -> Option<SizeClass> {
        self.size.or_else(|| self.breed_traits().map(|t| t.size))
    }

    /// Weight when it is a positive finite number.
    pub fn weight(&self) -> Option<f64> {
        self.weight_kg.filter(|w| w.is_finite() && *w > 0.0)
    }

    /// Age in years, falling back to [`DEFAULT_AGE_YEARS`](Self::DEFAULT_AGE_YEARS).
    pub fn age(&self) -> f64 {
        self.age_years
            .filter(|a| a.is_finite() && *a >= 0.0)
            .unwrap_or(Self::DEFAULT_AGE_YEARS)
    }
}

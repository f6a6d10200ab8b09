//! Walking speed and distance budget from a dog profile.
//!
//! Speeds are abstract classes (2 = slow, 3 = normal, 4 = brisk) rather than
//! literal metres per minute; the distance budget is `duration * class`.

use crate::profile::{DogProfile, SizeClass, Temperament};

/// Walking pace band.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpeedClass {
    Slow   = 2,
    Normal = 3,
    Brisk  = 4,
}

impl SpeedClass {
    /// Budget units per minute.
    #[inline]
    pub fn value(self) -> f64 {
        self as u8 as f64
    }
}

/// Speed class used when the profile says nothing useful.
pub const DEFAULT_SPEED: SpeedClass = SpeedClass::Normal;

fn temperament_speed(t: Temperament) -> SpeedClass {
    match t {
        Temperament::Calm      => SpeedClass::Slow,
        Temperament::Curious   => SpeedClass::Normal,
        Temperament::Energetic => SpeedClass::Brisk,
    }
}

/// Speed class for a profile.
///
/// Resolution order:
///
/// 1. breed in the breed table → the breed's temperament;
/// 2. weight known → `≤ 7 kg` or (`≤ 18 kg` and calm) → 2, `> 18 kg` → 4,
///    otherwise 3;
/// 3. temperament known → calm 2, curious 3, energetic 4;
/// 4. size known → small 2, medium 3, large 4;
/// 5. [`DEFAULT_SPEED`].
pub fn estimate_speed(profile: &DogProfile) -> SpeedClass {
    if let Some(traits) = profile.breed_traits() {
        return temperament_speed(traits.temperament);
    }
    if let Some(kg) = profile.weight() {
        let calm = profile.temperament == Some(Temperament::Calm);
        return if kg <= 7.0 || (kg <= 18.0 && calm) {
            SpeedClass::Slow
        } else if kg > 18.0 {
            SpeedClass::Brisk
        } else {
            SpeedClass::Normal
        };
    }
    if let Some(t) = profile.temperament {
        return temperament_speed(t);
    }
    match profile.size {
        Some(SizeClass::Small)  => SpeedClass::Slow,
        Some(SizeClass::Medium) => SpeedClass::Normal,
        Some(SizeClass::Large)  => SpeedClass::Brisk,
        None                    => DEFAULT_SPEED,
    }
}

/// Distance budget for a walk of `duration_minutes`.
///
/// Negative and non-finite (NaN, infinite) durations count as zero, so the
/// result is always a finite non-negative number and positive for any
/// positive finite duration.
pub fn estimate_budget(duration_minutes: f64, profile: &DogProfile) -> f64 {
    let minutes = if duration_minutes.is_finite() { duration_minutes.max(0.0) } else { 0.0 };
    minutes * estimate_speed(profile).value()
}

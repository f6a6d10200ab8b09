//! `walk-planner` — dog profiles, cycle search, scoring, and request handling.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`profile`]   | `DogProfile`, `SizeClass`, `Temperament`, breed table     |
//! | [`estimator`] | `SpeedClass`, `estimate_speed`, `estimate_budget`         |
//! | [`search`]    | `enumerate_cycles`, `RouteCandidate`, `SearchLimits`      |
//! | [`generator`] | `CandidateGenerator` trait, `CycleEnumerator`             |
//! | [`scoring`]   | `score`, `select`, `ScoredRoute`                          |
//! | [`config`]    | `PlannerConfig`                                           |
//! | [`session`]   | `WalkPlanner`, `PlanningSession`, request/response types  |
//! | [`error`]     | `PlanError`, `PlanResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Scores candidates on the rayon thread pool.              |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.       |

pub mod config;
pub mod error;
pub mod estimator;
pub mod generator;
pub mod profile;
pub mod scoring;
pub mod search;
pub mod session;


pub use config::PlannerConfig;
pub use error::{PlanError, PlanResult};
pub use estimator::{estimate_budget, estimate_speed, SpeedClass, DEFAULT_SPEED};
pub use generator::{CandidateGenerator, CycleEnumerator};
pub use profile::{lookup_breed, BreedTraits, DogProfile, SizeClass, Temperament};
pub use scoring::{age_factor, score, select, size_factor, ScoredRoute};
pub use search::{enumerate_cycles, CycleSearch, RouteCandidate, SearchLimits};
pub use session::{
    PlannedWalk, PlanningSession, SessionOutcome, WalkPlanner, WalkPoint, WalkRequest, WalkResponse,
};

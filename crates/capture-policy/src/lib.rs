//! Reflex policies for a two-unit capture-the-flag team.
//!
//! Each turn a unit scores every legal action and takes the best one. The crate implements
//! that decision in layers:
//!
//! 1. **Successor projection** ([`successor`]) - The state an action leads to, with half-step
//!    moves of slowed units completed to a whole cell.
//!
//! 2. **Feature extraction** ([`offense`], [`defense`]) - Hand-written reflex rules that
//!    describe a successor as a sparse [`FeatureVector`](feature::FeatureVector).
//!
//! 3. **Action evaluation** ([`evaluator`]) - A weighted sum of the extracted features.
//!
//! 4. **Action selection** ([`selector`]) - The highest-scoring legal action, ties broken
//!    uniformly at random.
//!
//! # Architecture
//!
//! ```text
//! Policy (one unit, one mode)
//!     ↓ uses
//! ActionSelector (best legal action)
//!     ↓ uses
//! LinearEvaluator (features · weights)
//!     ↓ uses
//! Offense/DefenseExtractor (features of a projected successor)
//! ```
//!
//! The engine is reached only through [`capture_engine::GameView`] and maze distances only
//! through [`capture_engine::DistanceOracle`], so policies can be run against any
//! implementation of either.
//!
//! # Design Principles
//!
//! ## Stateless Decisions
//!
//! A [`Policy`](policy::Policy) owns nothing that changes during a match. The previous
//! observation is handed in and handed back as an
//! [`ObservationMemory`](policy::ObservationMemory), and randomness comes from the caller's
//! generator. [`PolicyAgent`](team::PolicyAgent) bundles both for use in a
//! [`CaptureMatch`](capture_engine::CaptureMatch).
//!
//! ## Typed Feature Keys
//!
//! Offense and defense each have their own feature enum, shared by the extractor and its
//! [`WeightTable`](weights::WeightTable). Weight files name features by their camel-case
//! names and unknown names are rejected on load.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use capture_engine::{AgentIndex, CaptureState, GameView, Layout, MatchSeed, MazeDistancer};
//! use capture_policy::policy::{ObservationMemory, PolicyMode, create_policy};
//!
//! let layout = Layout::default_capture().unwrap();
//! let distancer = Arc::new(MazeDistancer::new(&layout));
//! let state = CaptureState::new(layout);
//!
//! let policy = create_policy(AgentIndex(0), PolicyMode::Offensive, distancer);
//! let mut rng = MatchSeed::from_u128(42).rng();
//! let (action, _memory) = policy.choose_action(&state, &ObservationMemory::new(), &mut rng);
//! assert!(state.legal_actions(AgentIndex(0)).contains(&action));
//! ```

pub mod context;
pub mod defense;
pub mod evaluator;
pub mod feature;
pub mod offense;
pub mod policy;
pub mod selector;
pub mod successor;
pub mod team;
pub mod weights;

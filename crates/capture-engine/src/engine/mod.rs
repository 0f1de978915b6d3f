//! Match state and rules.
//!
//! This module provides the reference engine that policies are developed against:
//!
//! - [`GameView`] - The capability a policy consumes (queries, legal actions, successors)
//! - [`CaptureState`] - Ground-truth match state and per-unit observations
//! - [`AgentState`] - Per-unit position, heading, role and scared timer
//! - [`CaptureMatch`] - Turn loop driving one [`Agent`] per unit
//! - [`MatchSeed`] - Seed for reproducible sensor noise
//!
//! # Match Flow
//!
//! 1. Parse a [`Layout`](crate::Layout) and build a [`CaptureState`]
//! 2. Units act in index order; each receives [`CaptureState::observe`] for itself
//! 3. The chosen action is applied with [`CaptureState::apply_action`]
//! 4. Repeat until [`CaptureState::is_over`]
//!
//! # Example
//!
//! ```
//! use capture_engine::{AgentIndex, CaptureState, Direction, GameView, Layout};
//!
//! let layout = Layout::default_capture().unwrap();
//! let mut state = CaptureState::new(layout);
//!
//! let red = AgentIndex(0);
//! let action = state.legal_actions(red)[0];
//! state.apply_action(red, action);
//!
//! assert!(!state.is_over());
//! ```

pub use self::{agent::*, capture_match::*, capture_state::*, game_view::*, match_seed::*};

mod agent;
mod capture_match;
mod capture_state;
mod game_view;
mod match_seed;

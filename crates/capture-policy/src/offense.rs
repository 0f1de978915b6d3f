//! Reflex rules of the offensive unit.
//!
//! The offensive unit raids the opponent's half for food. Its features depend on the role
//! it would have after the move:
//!
//! - **Defending** (still on its own half): head for the nearest food, but engage opponents
//!   that come close, chasing pacmen and keeping clear of defenders.
//! - **Attacking** (inside the opponent's half): eat, using capsules to turn the tables,
//!   and back off from defenders when they get within striking range. Moves into dead ends
//!   are punished while a defender is around.
//!
//! Rules are checked in a fixed order and several of them end extraction early, so an
//! action usually carries only a few features.

use capture_engine::{AgentState, Cell, Direction, GameView};
use serde::{Deserialize, Serialize};

use crate::{
    context::{DecisionContext, cell_of, visible_cell},
    evaluator::FeatureExtractor,
    feature::{FeatureKey, FeatureVector, signed_value, value},
};

/// Opponents closer than this are engaged by a defending unit that is not scared.
const ENGAGE_DISTANCE: u32 = 6;
/// Defenders closer than this threaten an attacking unit.
const THREAT_DISTANCE: u32 = 7;
/// A defender this close catches the attacker on its next move.
const CAUGHT_DISTANCE: u32 = 1;
/// Cells with fewer legal actions than this (`Stop` included) are dead ends.
const DEAD_END_ACTIONS: usize = 3;
const DEAD_END_PENALTY: f32 = -500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OffenseFeature {
    SuccessorScore,
    Stop,
    OnAttack,
    /// Danger marker: 2 when eliminated or caught, -2 after eating a capsule.
    NumInvaders,
    /// -2 when the move eliminates a visible opposing pacman.
    NumPacman,
    InvaderDistance,
    EatingPacman,
    DistanceToFood,
    DistanceToCapsule,
    GhostDistance,
    GoForFood,
    GoForCapsule,
    Loop,
    NoGhost,
}

impl FeatureKey for OffenseFeature {
    const ALL: &'static [Self] = &[
        Self::SuccessorScore,
        Self::Stop,
        Self::OnAttack,
        Self::NumInvaders,
        Self::NumPacman,
        Self::InvaderDistance,
        Self::EatingPacman,
        Self::DistanceToFood,
        Self::DistanceToCapsule,
        Self::GhostDistance,
        Self::GoForFood,
        Self::GoForCapsule,
        Self::Loop,
        Self::NoGhost,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::SuccessorScore => "successorScore",
            Self::Stop => "stop",
            Self::OnAttack => "onAttack",
            Self::NumInvaders => "numInvaders",
            Self::NumPacman => "numPacman",
            Self::InvaderDistance => "invaderDistance",
            Self::EatingPacman => "eatingPacman",
            Self::DistanceToFood => "distanceToFood",
            Self::DistanceToCapsule => "distanceToCapsule",
            Self::GhostDistance => "ghostDistance",
            Self::GoForFood => "goForFood",
            Self::GoForCapsule => "goForCapsule",
            Self::Loop => "loop",
            Self::NoGhost => "noGhost",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OffenseExtractor;

impl FeatureExtractor for OffenseExtractor {
    type Key = OffenseFeature;

    fn extract<S>(&self, ctx: &DecisionContext<'_, S>, action: Direction) -> FeatureVector<OffenseFeature>
    where
        S: GameView,
    {
        let successor = ctx.successor(action);
        let mut features = FeatureVector::new();
        if successor.agent_state(ctx.agent).is_pacman() {
            attacking(ctx, action, &successor, &mut features);
        } else {
            defending(ctx, action, &successor, &mut features);
        }
        features
    }
}

fn defending<S>(
    ctx: &DecisionContext<'_, S>,
    action: Direction,
    successor: &S,
    features: &mut FeatureVector<OffenseFeature>,
) where
    S: GameView,
{
    use OffenseFeature as F;

    let me = successor.agent_state(ctx.agent);
    let my_cell = cell_of(me);

    features.set(F::SuccessorScore, signed_value(successor.team_score(ctx.team())));
    if action.is_stop() {
        features.set(F::Stop, 1.0);
    }
    features.set(F::OnAttack, 0.0);
    // back at spawn means the move got us eliminated
    if me.position() == Some(ctx.state.initial_position(ctx.agent)) {
        features.set(F::NumInvaders, 2.0);
    }
    if visible_pacmen(ctx, successor) < visible_pacmen(ctx, ctx.state) {
        features.set(F::NumPacman, -2.0);
    }

    let nearest_opponent = ctx
        .opponents()
        .map(|opponent| successor.agent_state(opponent))
        .filter_map(|state| visible_cell(state).map(|cell| (state, ctx.distance(my_cell, cell))))
        .min_by_key(|(_, distance)| *distance);
    match nearest_opponent {
        Some((opponent, distance)) if distance < ENGAGE_DISTANCE && !me.is_scared() => {
            if opponent.is_pacman() {
                features.set(F::InvaderDistance, value(distance));
                features.set(F::EatingPacman, 1.0);
            } else {
                features.set(F::InvaderDistance, -value(distance));
            }
        }
        _ => {
            let foods = successor.food(ctx.team().opponent());
            if let Some((_, distance)) = ctx.nearest(my_cell, foods) {
                features.set(F::DistanceToFood, value(distance));
            }
        }
    }
}

fn attacking<S>(
    ctx: &DecisionContext<'_, S>,
    action: Direction,
    successor: &S,
    features: &mut FeatureVector<OffenseFeature>,
) where
    S: GameView,
{
    use OffenseFeature as F;

    if is_loop(ctx, action) {
        features.set(F::Loop, 1.0);
        return;
    }

    let team = ctx.team();
    features.set(F::SuccessorScore, signed_value(successor.team_score(team)));
    if action.is_stop() {
        features.set(F::Stop, 1.0);
    }
    features.set(F::OnAttack, 1.0);

    let my_cell = cell_of(successor.agent_state(ctx.agent));
    let current_cell = cell_of(ctx.state.agent_state(ctx.agent));

    let noisy = ctx
        .opponents()
        .filter(|opponent| !successor.agent_state(*opponent).is_pacman())
        .filter_map(|opponent| ctx.state.agent_distances().get(opponent.0).copied().flatten())
        .min()
        .unwrap_or(0);
    tracing::trace!(agent = %ctx.agent, %action, noisy, "noisy distance to defenders");

    let capsules = successor.capsules(team.opponent());
    let capsule_eaten = capsules.len() < ctx.state.capsules(team.opponent()).len();
    let nearest_capsule = ctx.nearest(my_cell, capsules);

    let foods = successor.food(team.opponent());
    let nearest_food = ctx.nearest(my_cell, foods.iter().copied());

    let ghosts: Vec<(&AgentState, Cell)> = ctx
        .opponents()
        .map(|opponent| successor.agent_state(opponent))
        .filter(|state| !state.is_pacman())
        .filter_map(|state| visible_cell(state).map(|cell| (state, cell)))
        .collect();
    let nearest_ghost = ctx.nearest(my_cell, ghosts.iter().map(|(_, cell)| *cell));

    if let Some((_, ghost_distance)) = nearest_ghost {
        let scared = ghosts
            .iter()
            .any(|(state, cell)| state.is_scared() && ctx.distance(my_cell, *cell) == ghost_distance);
        if scared {
            set_food_distance(features, nearest_food);
            if capsule_eaten {
                features.set(F::NumInvaders, -2.0);
            }
            return;
        }
    }

    let dead_end = successor.legal_actions(ctx.agent).len() < DEAD_END_ACTIONS;

    match nearest_ghost {
        Some((ghost_cell, ghost_distance)) if ghost_distance < THREAT_DISTANCE => {
            features.set(F::NoGhost, 0.0);
            if ghost_distance <= CAUGHT_DISTANCE {
                set_food_distance(features, nearest_food);
                features.set(F::NumInvaders, 2.0);
                return;
            }

            if capsule_eaten {
                features.set(F::NumInvaders, -2.0);
            } else if let Some((capsule, capsule_distance)) = nearest_capsule {
                if capsule_distance > ctx.distance(capsule, ghost_cell) {
                    features.set(F::GhostDistance, value(ghost_distance));
                } else {
                    // the capsule is reachable first: race for it
                    features.set(F::DistanceToCapsule, value(capsule_distance));
                    features.set(F::SuccessorScore, signed_value(ctx.state.team_score(team)));
                    if capsule_distance < ctx.distance(capsule, current_cell) {
                        features.set(F::GoForCapsule, 1.0);
                    }
                    return;
                }
            }

            if !dead_end {
                features.set(F::GhostDistance, value(ghost_distance));
                if let Some((food, food_distance)) = nearest_food {
                    if food_distance < ctx.distance(food, ghost_cell) {
                        features.set(F::DistanceToFood, value(food_distance));
                        if food_distance < ctx.distance(food, current_cell) {
                            features.set(F::GoForFood, 1.0);
                        }
                    } else if let Some(distance) = foods
                        .iter()
                        .map(|food| (ctx.distance(my_cell, *food), ctx.distance(*food, ghost_cell)))
                        .find_map(|(mine, theirs)| (mine < theirs).then_some(mine))
                    {
                        features.set(F::DistanceToFood, value(distance));
                        features.set(F::GoForFood, 1.0);
                    }
                }
            }
        }
        _ => {
            features.set(F::NoGhost, 1.0);
            set_food_distance(features, nearest_food);
        }
    }

    if dead_end {
        if ctx.state.has_food(my_cell) {
            if let Some((_, ghost_distance)) = nearest_ghost {
                features.set(F::GhostDistance, value(ghost_distance));
            }
        } else {
            features.set(F::GhostDistance, DEAD_END_PENALTY);
        }
    }
}

/// Whether `action` undoes the turn-around the unit made on its last move.
fn is_loop<S>(ctx: &DecisionContext<'_, S>, action: Direction) -> bool
where
    S: GameView,
{
    let Some(previous) = ctx.previous else {
        return false;
    };
    let before = previous.agent_state(ctx.agent).direction();
    let now = ctx.state.agent_state(ctx.agent).direction();
    !before.is_stop() && now == before.reverse() && action == before
}

fn visible_pacmen<S>(ctx: &DecisionContext<'_, S>, view: &S) -> usize
where
    S: GameView,
{
    ctx.opponents()
        .map(|opponent| view.agent_state(opponent))
        .filter(|state| state.position().is_some() && state.is_pacman())
        .count()
}

fn set_food_distance(features: &mut FeatureVector<OffenseFeature>, nearest_food: Option<(Cell, u32)>) {
    if let Some((_, distance)) = nearest_food {
        features.set(OffenseFeature::DistanceToFood, value(distance));
    }
}

#[cfg(test)]
mod tests {
    use capture_engine::{AgentIndex, CaptureState, Layout, MazeDistancer, Position};

    use crate::{
        evaluator::{ActionEvaluator, LinearEvaluator},
        weights::WeightTable,
    };

    use super::*;

    const RED: AgentIndex = AgentIndex(0);
    const BLUE: AgentIndex = AgentIndex(1);

    // red owns x < 6; the pocket at (7, 1) is a dead end
    const POCKET: &str = "
        %%%%%%%%%%%%
        %1    % %..%
        %          %
        %.        2%
        %%%%%%%%%%%%
    ";

    // food sits at the end of the pocket at (7, 1)
    const FED_POCKET: &str = "
        %%%%%%%%%%%%
        %1    %.%..%
        %          %
        %.        2%
        %%%%%%%%%%%%
    ";

    const SCATTERED: &str = "
        %%%%%%%%%%%%
        %1     .  2%
        %          %
        %.        .%
        %%%%%%%%%%%%
    ";

    const CAPSULE: &str = "
        %%%%%%%%%%%%
        %1      o .%
        %          %
        %.    .   2%
        %%%%%%%%%%%%
    ";

    fn setup(art: &str) -> (CaptureState, MazeDistancer) {
        let layout = Layout::from_ascii(art).unwrap();
        let distancer = MazeDistancer::new(&layout);
        (CaptureState::new(layout), distancer)
    }

    fn place(state: &mut CaptureState, agent: AgentIndex, x: usize, y: usize) {
        state.place_agent(agent, Position::from_cell(Cell::new(x, y)));
    }

    fn extract(
        state: &CaptureState,
        previous: Option<&CaptureState>,
        distancer: &MazeDistancer,
        action: Direction,
    ) -> FeatureVector<OffenseFeature> {
        let ctx = DecisionContext::new(RED, state, previous, distancer);
        OffenseExtractor.extract(&ctx, action)
    }

    fn score(state: &CaptureState, distancer: &MazeDistancer, action: Direction) -> f32 {
        let ctx = DecisionContext::new(RED, state, None, distancer);
        LinearEvaluator::new(OffenseExtractor, WeightTable::offense()).evaluate_action(&ctx, action)
    }

    #[test]
    fn test_feature_names_match_serde() {
        for key in OffenseFeature::ALL {
            let json = serde_json::to_string(key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.name()));
        }
    }

    #[test]
    fn test_dead_end_without_food_is_penalized() {
        let (mut state, distancer) = setup(POCKET);
        place(&mut state, RED, 7, 2);
        let features = extract(&state, None, &distancer, Direction::North);
        assert_eq!(features.get(OffenseFeature::GhostDistance), Some(-500.0));
        assert_eq!(features.get(OffenseFeature::NoGhost), Some(0.0));
        assert_eq!(features.get(OffenseFeature::OnAttack), Some(1.0));
    }

    #[test]
    fn test_stepping_next_to_a_defender_is_an_emergency() {
        let (mut state, distancer) = setup(POCKET);
        place(&mut state, RED, 9, 2);

        let toward = extract(&state, None, &distancer, Direction::East);
        assert_eq!(toward.get(OffenseFeature::NumInvaders), Some(2.0));
        assert_eq!(toward.get(OffenseFeature::DistanceToFood), Some(1.0));

        let away = extract(&state, None, &distancer, Direction::West);
        assert_eq!(away.get(OffenseFeature::NumInvaders), None);
        assert_eq!(away.get(OffenseFeature::GhostDistance), Some(3.0));
        assert_eq!(away.get(OffenseFeature::DistanceToFood), Some(2.0));
        assert_eq!(away.get(OffenseFeature::GoForFood), None);

        assert!(score(&state, &distancer, Direction::West) > score(&state, &distancer, Direction::East));
    }

    #[test]
    fn test_adjacent_defender_is_never_approached() {
        let (mut state, distancer) = setup(POCKET);
        place(&mut state, RED, 9, 2);
        place(&mut state, BLUE, 10, 2);

        // walking into the defender gets the attacker eliminated
        let toward = extract(&state, None, &distancer, Direction::East);
        assert_eq!(toward.get(OffenseFeature::NumInvaders), Some(2.0));
        assert_eq!(toward.get(OffenseFeature::OnAttack), Some(0.0));

        let toward = score(&state, &distancer, Direction::East);
        for exit in [Direction::North, Direction::South, Direction::West] {
            assert!(score(&state, &distancer, exit) > toward, "{exit}");
        }
    }

    #[test]
    fn test_moving_toward_food_scores_higher_without_defenders() {
        let (mut state, distancer) = setup(POCKET);
        place(&mut state, RED, 7, 2);
        state.agent_state_mut(BLUE).set_position(None);

        let east = extract(&state, None, &distancer, Direction::East);
        let west = extract(&state, None, &distancer, Direction::West);
        assert_eq!(east.get(OffenseFeature::NoGhost), Some(1.0));
        assert_eq!(east.get(OffenseFeature::DistanceToFood), Some(2.0));
        assert_eq!(west.get(OffenseFeature::DistanceToFood), Some(4.0));
        assert!(score(&state, &distancer, Direction::East) > score(&state, &distancer, Direction::West));
    }

    #[test]
    fn test_undoing_a_turn_around_is_a_loop() {
        let (mut state, distancer) = setup(POCKET);
        place(&mut state, RED, 8, 2);
        let mut previous = state.clone();
        previous.agent_state_mut(RED).set_direction(Direction::East);
        state.agent_state_mut(RED).set_direction(Direction::West);

        let features = extract(&state, Some(&previous), &distancer, Direction::East);
        assert_eq!(features.keys().collect::<Vec<_>>(), [OffenseFeature::Loop]);
        assert_eq!(features.get(OffenseFeature::Loop), Some(1.0));

        let features = extract(&state, Some(&previous), &distancer, Direction::West);
        assert!(!features.contains(OffenseFeature::Loop));
    }

    #[test]
    fn test_no_loop_without_previous_observation() {
        let (mut state, distancer) = setup(POCKET);
        place(&mut state, RED, 8, 2);
        state.agent_state_mut(RED).set_direction(Direction::West);
        let features = extract(&state, None, &distancer, Direction::East);
        assert!(!features.contains(OffenseFeature::Loop));
    }

    #[test]
    fn test_races_for_a_reachable_capsule() {
        let (mut state, distancer) = setup(CAPSULE);
        place(&mut state, RED, 6, 2);
        let features = extract(&state, None, &distancer, Direction::East);
        assert_eq!(features.get(OffenseFeature::DistanceToCapsule), Some(2.0));
        assert_eq!(features.get(OffenseFeature::GoForCapsule), Some(1.0));
        assert_eq!(features.get(OffenseFeature::GhostDistance), None);
    }

    #[test]
    fn test_eating_a_capsule_scares_the_defender() {
        let (mut state, distancer) = setup(CAPSULE);
        place(&mut state, RED, 7, 1);
        let features = extract(&state, None, &distancer, Direction::East);
        assert_eq!(features.get(OffenseFeature::NumInvaders), Some(-2.0));
        assert!(features.contains(OffenseFeature::DistanceToFood));
        assert!(!features.contains(OffenseFeature::NoGhost));
        assert!(!features.contains(OffenseFeature::GhostDistance));
    }

    #[test]
    fn test_defending_unit_chases_a_visible_pacman() {
        let (mut state, distancer) = setup(POCKET);
        place(&mut state, BLUE, 3, 2);
        assert!(state.agent_state(BLUE).is_pacman());

        let features = extract(&state, None, &distancer, Direction::East);
        assert_eq!(features.get(OffenseFeature::OnAttack), Some(0.0));
        assert_eq!(features.get(OffenseFeature::InvaderDistance), Some(2.0));
        assert_eq!(features.get(OffenseFeature::EatingPacman), Some(1.0));
        assert_eq!(features.get(OffenseFeature::NumInvaders), None);

        let features = extract(&state, None, &distancer, Direction::Stop);
        assert_eq!(features.get(OffenseFeature::Stop), Some(1.0));
        assert_eq!(features.get(OffenseFeature::NumInvaders), Some(2.0));
    }

    #[test]
    fn test_defending_unit_rewards_eliminating_a_pacman() {
        let (mut state, distancer) = setup(POCKET);
        place(&mut state, RED, 2, 2);
        place(&mut state, BLUE, 3, 2);
        let features = extract(&state, None, &distancer, Direction::East);
        assert_eq!(features.get(OffenseFeature::NumPacman), Some(-2.0));
        assert_eq!(features.get(OffenseFeature::DistanceToFood), Some(7.0));
    }

    #[test]
    fn test_dead_end_with_food_and_no_defender_is_not_penalized() {
        let (mut state, distancer) = setup(FED_POCKET);
        place(&mut state, RED, 7, 2);
        state.agent_state_mut(BLUE).set_position(None);

        let features = extract(&state, None, &distancer, Direction::North);
        assert_eq!(features.get(OffenseFeature::NoGhost), Some(1.0));
        assert_eq!(features.get(OffenseFeature::SuccessorScore), Some(1.0));
        assert!(!features.contains(OffenseFeature::GhostDistance));
    }

    #[test]
    fn test_falls_back_to_food_the_defender_cannot_reach_first() {
        let (mut state, distancer) = setup(SCATTERED);
        place(&mut state, RED, 9, 2);
        place(&mut state, BLUE, 6, 2);

        // (7, 1) is nearest but the defender is as close to it; (10, 3) is safe
        let features = extract(&state, None, &distancer, Direction::West);
        assert_eq!(features.get(OffenseFeature::NoGhost), Some(0.0));
        assert_eq!(features.get(OffenseFeature::GhostDistance), Some(2.0));
        assert_eq!(features.get(OffenseFeature::DistanceToFood), Some(3.0));
        assert_eq!(features.get(OffenseFeature::GoForFood), Some(1.0));
    }

    #[test]
    fn test_ignores_a_capsule_the_defender_reaches_first() {
        let (mut state, distancer) = setup(CAPSULE);
        place(&mut state, RED, 6, 2);
        place(&mut state, BLUE, 9, 1);

        let features = extract(&state, None, &distancer, Direction::East);
        assert_eq!(features.get(OffenseFeature::GhostDistance), Some(3.0));
        assert_eq!(features.get(OffenseFeature::DistanceToFood), Some(2.0));
        assert!(!features.contains(OffenseFeature::DistanceToCapsule));
        assert!(!features.contains(OffenseFeature::GoForCapsule));
        assert!(!features.contains(OffenseFeature::GoForFood));
    }

    #[test]
    fn test_defending_unit_keeps_away_from_a_nearby_ghost() {
        let (mut state, distancer) = setup(POCKET);
        place(&mut state, RED, 5, 2);
        place(&mut state, BLUE, 7, 2);
        assert!(!state.agent_state(BLUE).is_pacman());

        let features = extract(&state, None, &distancer, Direction::West);
        assert_eq!(features.get(OffenseFeature::OnAttack), Some(0.0));
        assert_eq!(features.get(OffenseFeature::InvaderDistance), Some(-3.0));
        assert!(!features.contains(OffenseFeature::EatingPacman));
        assert!(!features.contains(OffenseFeature::DistanceToFood));
    }
}

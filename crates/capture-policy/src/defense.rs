//! Reflex rules of the defensive unit.
//!
//! The defensive unit stays on its own half. With no opposing pacman around it guards the
//! food the opponents are likely to go for first, the one nearest their spawn. Once an
//! opponent crosses over it hunts visible pacmen directly and tracks hidden ones through
//! noisy distance readings and the food that disappears.

use capture_engine::{Cell, Direction, GameView};
use serde::{Deserialize, Serialize};

use crate::{
    context::{DecisionContext, cell_of, visible_cell},
    evaluator::FeatureExtractor,
    feature::{FeatureKey, FeatureVector, count, value},
};

/// Legal actions (`Stop` included) of a corridor cell with two exits.
const CORRIDOR_ACTIONS: usize = 3;
/// A pacman this close can be held off by standing still in a corridor.
const CONTAIN_DISTANCE: u32 = 2;
/// Noisy distance reported for moves into a dead end.
const DEAD_END_NOISY_DISTANCE: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefenseFeature {
    Stop,
    OnDefense,
    NumInvaders,
    InvaderDistance,
    NoisyInvaderDistance,
    ClosestFood,
    Reverse,
}

impl FeatureKey for DefenseFeature {
    const ALL: &'static [Self] = &[
        Self::Stop,
        Self::OnDefense,
        Self::NumInvaders,
        Self::InvaderDistance,
        Self::NoisyInvaderDistance,
        Self::ClosestFood,
        Self::Reverse,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::OnDefense => "onDefense",
            Self::NumInvaders => "numInvaders",
            Self::InvaderDistance => "invaderDistance",
            Self::NoisyInvaderDistance => "noisyInvaderDistance",
            Self::ClosestFood => "closestFood",
            Self::Reverse => "reverse",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefenseExtractor;

impl FeatureExtractor for DefenseExtractor {
    type Key = DefenseFeature;

    fn extract<S>(&self, ctx: &DecisionContext<'_, S>, action: Direction) -> FeatureVector<DefenseFeature>
    where
        S: GameView,
    {
        use DefenseFeature as F;

        let successor = ctx.successor(action);
        let me = successor.agent_state(ctx.agent);
        let my_cell = cell_of(me);
        let mut features = FeatureVector::new();

        if action.is_stop() {
            features.set(F::Stop, 1.0);
        }
        features.set(F::OnDefense, if me.is_pacman() { 0.0 } else { 1.0 });

        let foods = ctx.state.food(ctx.team());
        let invaders: Vec<_> = ctx
            .opponents()
            .filter(|opponent| successor.agent_state(*opponent).is_pacman())
            .collect();

        if invaders.is_empty() {
            let target = ctx.opponents().next().and_then(|first| {
                let spawn = ctx.state.initial_position(first).nearest_cell();
                ctx.nearest(spawn, foods.iter().copied())
            });
            if let Some((food, _)) = target {
                features.set(F::ClosestFood, value(ctx.distance(my_cell, food)));
            }
            return features;
        }

        let visible: Vec<Cell> = invaders
            .iter()
            .filter_map(|invader| visible_cell(successor.agent_state(*invader)))
            .collect();
        if let Some((invader_cell, distance)) = ctx.nearest(my_cell, visible.iter().copied()) {
            features.set(F::NumInvaders, count(visible.len()));
            features.set(F::InvaderDistance, value(distance));
            let contained = invaders.len() == 1
                && ctx.state.legal_actions(ctx.agent).len() == CORRIDOR_ACTIONS
                && action.is_stop()
                && distance <= CONTAIN_DISTANCE
                && foods
                    .iter()
                    .all(|food| ctx.distance(my_cell, *food) <= ctx.distance(invader_cell, *food));
            if contained {
                features.set(F::NumInvaders, -3.0);
            }
        } else {
            track_hidden(ctx, &successor, my_cell, &foods, &mut features);
        }

        let heading = ctx.state.agent_state(ctx.agent).direction();
        if !action.is_stop() && action == heading.reverse() {
            features.set(F::Reverse, 1.0);
        }
        features
    }
}

/// Estimates where unseen invaders are from sonar readings and from eaten food.
fn track_hidden<S>(
    ctx: &DecisionContext<'_, S>,
    successor: &S,
    my_cell: Cell,
    foods: &[Cell],
    features: &mut FeatureVector<DefenseFeature>,
) where
    S: GameView,
{
    use DefenseFeature as F;

    let now = successor.agent_distances();
    let before = ctx.previous.map(GameView::agent_distances);
    let estimate = ctx
        .opponents()
        .filter_map(|opponent| {
            let reading = value(now.get(opponent.0).copied().flatten()?);
            let smoothed = match before.and_then(|b| b.get(opponent.0).copied().flatten()) {
                Some(earlier) => (reading + value(earlier)) / 2.0,
                None => reading,
            };
            Some(smoothed)
        })
        .min_by(f32::total_cmp);
    if let Some(estimate) = estimate {
        features.set(F::NoisyInvaderDistance, estimate);
    }
    if successor.legal_actions(ctx.agent).len() < CORRIDOR_ACTIONS {
        features.set(F::NoisyInvaderDistance, DEAD_END_NOISY_DISTANCE);
    }

    let Some(previous) = ctx.previous else {
        return;
    };
    let earlier_foods = previous.food(ctx.team());
    if foods.len() >= earlier_foods.len() {
        return;
    }
    for eaten in earlier_foods.iter().filter(|food| !foods.contains(*food)) {
        // the invader is probably heading for the food next to the one it just ate
        let next = foods
            .iter()
            .map(|food| (*food, ctx.distance(*eaten, *food)))
            .filter(|(_, d)| *d != 0)
            .min_by_key(|(_, d)| *d);
        if let Some((next, _)) = next {
            tracing::trace!(agent = %ctx.agent, %eaten, %next, "invader target inferred");
            features.set(F::InvaderDistance, value(ctx.distance(my_cell, next)));
            features.set(F::NoisyInvaderDistance, 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use capture_engine::{AgentIndex, CaptureState, DistanceOracle, Layout, MazeDistancer, Position};

    use super::*;

    const RED: AgentIndex = AgentIndex(0);
    const BLUE: AgentIndex = AgentIndex(1);

    // red owns x < 6; blue spawns at (9, 9)
    const OPEN: &str = "
        %%%%%%%%%%%%
        %1         %
        % .        %
        %          %
        %          %
        %    .     %
        %          %
        %          %
        %          %
        %        2 %
        %%%%%%%%%%%%
    ";

    const CORRIDOR: &str = "
        %%%%%%%%%%%%
        %.1  %     %
        %%%% %     %
        %         2%
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

    fn hide_invader(state: &mut CaptureState) {
        let blue = state.agent_state_mut(BLUE);
        blue.set_pacman(true);
        blue.set_position(None);
    }

    fn extract(
        state: &CaptureState,
        previous: Option<&CaptureState>,
        distancer: &MazeDistancer,
        action: Direction,
    ) -> FeatureVector<DefenseFeature> {
        let ctx = DecisionContext::new(RED, state, previous, distancer);
        DefenseExtractor.extract(&ctx, action)
    }

    #[test]
    fn test_feature_names_match_serde() {
        for key in DefenseFeature::ALL {
            let json = serde_json::to_string(key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.name()));
        }
    }

    #[test]
    fn test_guards_food_nearest_the_opponent_spawn() {
        let (state, distancer) = setup(OPEN);
        let features = extract(&state, None, &distancer, Direction::East);
        // (5, 5) is nearer to (9, 9) than (2, 2) is
        let expected = distancer.maze_distance(Cell::new(2, 1), Cell::new(5, 5));
        assert_eq!(expected, 7);
        assert_eq!(features.get(DefenseFeature::ClosestFood), Some(7.0));
        assert_eq!(features.get(DefenseFeature::OnDefense), Some(1.0));
        assert_eq!(features.get(DefenseFeature::NumInvaders), None);
    }

    #[test]
    fn test_no_reverse_feature_without_invaders() {
        let (mut state, distancer) = setup(OPEN);
        place(&mut state, RED, 2, 1);
        state.agent_state_mut(RED).set_direction(Direction::East);
        let features = extract(&state, None, &distancer, Direction::West);
        assert!(!features.contains(DefenseFeature::Reverse));
    }

    #[test]
    fn test_hunts_visible_invader() {
        let (mut state, distancer) = setup(CORRIDOR);
        place(&mut state, BLUE, 4, 1);
        state.agent_state_mut(RED).set_direction(Direction::West);

        let features = extract(&state, None, &distancer, Direction::East);
        assert_eq!(features.get(DefenseFeature::NumInvaders), Some(1.0));
        assert_eq!(features.get(DefenseFeature::InvaderDistance), Some(1.0));
        assert_eq!(features.get(DefenseFeature::Reverse), Some(1.0));
    }

    #[test]
    fn test_holds_the_corridor_against_a_single_invader() {
        let (mut state, distancer) = setup(CORRIDOR);
        place(&mut state, BLUE, 4, 1);
        assert_eq!(state.legal_actions(RED).len(), 3);

        let features = extract(&state, None, &distancer, Direction::Stop);
        assert_eq!(features.get(DefenseFeature::NumInvaders), Some(-3.0));
        assert_eq!(features.get(DefenseFeature::InvaderDistance), Some(2.0));
        assert_eq!(features.get(DefenseFeature::Stop), Some(1.0));
    }

    #[test]
    fn test_smooths_noisy_distances() {
        let (mut state, distancer) = setup(OPEN);
        hide_invader(&mut state);
        let mut previous = state.clone();
        previous.set_agent_distances(vec![Some(0), Some(4)]);
        state.set_agent_distances(vec![Some(0), Some(8)]);

        let features = extract(&state, Some(&previous), &distancer, Direction::East);
        assert_eq!(features.get(DefenseFeature::NoisyInvaderDistance), Some(6.0));
        assert_eq!(features.get(DefenseFeature::NumInvaders), None);

        let features = extract(&state, None, &distancer, Direction::East);
        assert_eq!(features.get(DefenseFeature::NoisyInvaderDistance), Some(8.0));
    }

    #[test]
    fn test_dead_end_overrides_noisy_distance() {
        let (mut state, distancer) = setup(CORRIDOR);
        place(&mut state, RED, 1, 1);
        hide_invader(&mut state);
        state.set_agent_distances(vec![Some(0), Some(5)]);
        let features = extract(&state, None, &distancer, Direction::Stop);
        assert_eq!(features.get(DefenseFeature::NoisyInvaderDistance), Some(30.0));
    }

    #[test]
    fn test_infers_invader_target_from_eaten_food() {
        let (mut state, distancer) = setup(OPEN);
        hide_invader(&mut state);
        state.set_agent_distances(vec![Some(0), Some(9)]);
        let previous = state.clone();
        assert!(state.remove_food(Cell::new(2, 2)));

        let features = extract(&state, Some(&previous), &distancer, Direction::East);
        assert_eq!(features.get(DefenseFeature::InvaderDistance), Some(7.0));
        assert_eq!(features.get(DefenseFeature::NoisyInvaderDistance), Some(0.0));
    }
}

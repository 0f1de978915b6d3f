use std::{iter, path::PathBuf, sync::Arc};

use anyhow::bail;
use capture_engine::{
    Agent, AgentIndex, CaptureMatch, CaptureState, DEFAULT_MOVE_LIMIT, MatchSeed, Team,
};
use capture_policy::{
    policy::{Policy, PolicyMode},
    team::{PolicyAgent, create_team},
};
use rand::Rng as _;

use crate::{
    schema::{match_summary::MatchSummary, policy_model::PolicyModel},
    util::{self, Arena},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Layout file (ASCII); the built-in layout is used when omitted
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Seed for sensor noise and tie-breaking; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Total number of moves (all units combined) before the match ends
    #[arg(long, default_value_t = DEFAULT_MOVE_LIMIT)]
    move_limit: u32,
    /// Print the board to stderr every N moves
    #[arg(long)]
    render_every: Option<usize>,
    /// Policy model file (JSON) of the red team
    #[arg(long)]
    red_model: Option<PathBuf>,
    /// Policy model file (JSON) of the blue team
    #[arg(long)]
    blue_model: Option<PathBuf>,
    /// Output file for the match summary (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        layout,
        seed,
        move_limit,
        render_every,
        red_model,
        blue_model,
        output,
    } = arg;

    let arena = util::load_arena(layout.as_deref())?;
    let red = util::read_policy_model_file(red_model.as_deref())?;
    let blue = util::read_policy_model_file(blue_model.as_deref())?;
    let seed = util::match_seed(*seed);

    let mut game = new_match(&arena, &red, &blue, *move_limit, seed)?;
    eprintln!("Playing {} (red) vs {} (blue)...", red.name, blue.name);
    let mut moves = 0;
    while !game.is_over() {
        game.play_move();
        moves += 1;
        if render_every.is_some_and(|n| n > 0 && moves % n == 0) {
            eprintln!("{}", game.state());
        }
    }
    let outcome = game.outcome();
    eprintln!("{}", game.state());

    let summary = MatchSummary::new(seed, arena.name, red.name, blue.name, &outcome);
    util::save_json(&summary, output.as_deref())
}

/// Sets up a match in which every unit is driven by a reflex policy.
pub(crate) fn new_match(
    arena: &Arena,
    red: &PolicyModel,
    blue: &PolicyModel,
    move_limit: u32,
    seed: MatchSeed,
) -> anyhow::Result<CaptureMatch> {
    let state = CaptureState::with_move_limit(arena.layout.clone(), move_limit);
    let num_agents = arena.layout.num_agents();

    let mut rng = seed.rng();
    let mut agents: Vec<(AgentIndex, PolicyAgent)> = Vec::with_capacity(num_agents);
    for (team, model) in [(Team::Red, red), (Team::Blue, blue)] {
        let indices: Vec<AgentIndex> = AgentIndex::of_team(team, num_agents).collect();
        match indices[..] {
            [first, second] => {
                let team_agents =
                    create_team(first, second, &model.weights, &arena.distancer, rng.random());
                agents.extend(iter::zip([first, second], team_agents));
            }
            [only] => {
                let policy = Policy::new(
                    only,
                    PolicyMode::Offensive,
                    &model.weights,
                    Arc::clone(&arena.distancer),
                );
                agents.push((only, PolicyAgent::new(policy, rng.random())));
            }
            _ => bail!(
                "layout {} has {} units for team {team}; expected 1 or 2",
                arena.name,
                indices.len()
            ),
        }
    }
    agents.sort_by_key(|(index, _)| *index);
    let agents = agents
        .into_iter()
        .map(|(_, agent)| Box::new(agent) as Box<dyn Agent>)
        .collect();

    Ok(CaptureMatch::new(state, agents, rng.random()))
}

use std::{path::PathBuf, sync::Arc};

use anyhow::ensure;
use capture_engine::{AgentIndex, CaptureMatch, CaptureState, DEFAULT_MOVE_LIMIT, GameView as _};
use capture_policy::policy::{ObservationMemory, Policy, PolicyMode};
use rand::Rng;

use crate::{command::play::new_match, schema::explanation::ExplanationReport, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ExplainArg {
    /// Layout file (ASCII); the built-in layout is used when omitted
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Index of the unit to explain
    #[arg(long, default_value_t = 0)]
    agent: usize,
    /// Policy mode of the explained unit
    #[arg(long, default_value = "Offensive")]
    mode: PolicyMode,
    /// Number of moves to play with reflex teams before explaining
    #[arg(long, default_value_t = 0)]
    after: usize,
    /// Seed for sensor noise and tie-breaking; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Policy model file (JSON) used by every unit
    #[arg(long)]
    model: Option<PathBuf>,
    /// Output file for the report (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ExplainArg) -> anyhow::Result<()> {
    let ExplainArg {
        layout,
        agent,
        mode,
        after,
        seed,
        model,
        output,
    } = arg;

    let arena = util::load_arena(layout.as_deref())?;
    let num_agents = arena.layout.num_agents();
    ensure!(
        *agent < num_agents,
        "agent {agent} does not exist; layout {} has {num_agents} units",
        arena.name
    );
    let model = util::read_policy_model_file(model.as_deref())?;
    let seed = util::match_seed(*seed);

    let mut game = new_match(&arena, &model, &model, DEFAULT_MOVE_LIMIT, seed)?;
    let agent = AgentIndex(*agent);
    let mut rng = seed.rng();
    let (moves_played, memory) = replay(&mut game, agent, *after, &mut rng);
    eprintln!("{}", game.state());

    let observation = game.state().observe(agent, &mut rng);
    let policy = Policy::new(agent, *mode, &model.weights, Arc::clone(&arena.distancer));
    let report = ExplanationReport {
        agent,
        mode: *mode,
        moves_played,
        position: observation.agent_state(agent).position(),
        actions: policy.explain(&observation, &memory),
    };
    util::save_json(&report, output.as_deref())
}

/// Plays up to `moves` moves, remembering what `agent` observed before its last move.
///
/// The remembered observation carries its own sensor noise, not the reading the unit acted on.
fn replay<R>(
    game: &mut CaptureMatch,
    agent: AgentIndex,
    moves: usize,
    rng: &mut R,
) -> (usize, ObservationMemory<CaptureState>)
where
    R: Rng + ?Sized,
{
    let mut memory = ObservationMemory::new();
    let mut played = 0;
    while played < moves && !game.is_over() {
        if game.next_agent() == agent {
            memory = ObservationMemory::remember(&game.state().observe(agent, rng));
        }
        game.play_move();
        played += 1;
    }
    (played, memory)
}

use std::path::PathBuf;

use crate::{schema::policy_model::PolicyModel, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct WeightsArg {
    /// Name recorded in the model file
    #[arg(long, default_value = PolicyModel::BASELINE_NAME)]
    name: String,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &WeightsArg) -> anyhow::Result<()> {
    let WeightsArg { name, output } = arg;
    let model = PolicyModel {
        name: name.clone(),
        ..PolicyModel::baseline()
    };
    util::save_json(&model, output.as_deref())
}

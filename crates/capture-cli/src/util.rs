use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
    sync::Arc,
};

use anyhow::Context;
use capture_engine::{DistanceOracle, Layout, MatchSeed, MazeDistancer};
use rand::Rng as _;
use serde::{Serialize, de::DeserializeOwned};

use crate::schema::policy_model::PolicyModel;

/// Pretty-prints `value` as JSON to `path`, or to stdout when `path` is `None`.
pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json(&mut BufWriter::new(file), value)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => write_json(&mut io::stdout().lock(), value).context("Failed to write to stdout")?,
    }
    Ok(())
}

fn write_json<W, T>(writer: &mut W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn read_json<T>(kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to open {kind} file: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse {kind} file: {}", path.display()))
}

/// Read a policy model from a JSON file, or the built-in model when `path` is `None`.
pub fn read_policy_model_file(path: Option<&Path>) -> anyhow::Result<PolicyModel> {
    match path {
        Some(path) => read_json("policy model", path),
        None => Ok(PolicyModel::baseline()),
    }
}

/// A loaded layout together with its maze distances.
#[derive(Clone)]
pub struct Arena {
    pub name: String,
    pub layout: Layout,
    pub distancer: Arc<dyn DistanceOracle>,
}

/// Read an ASCII layout file, or the built-in layout when `path` is `None`.
pub fn load_arena(path: Option<&Path>) -> anyhow::Result<Arena> {
    let (name, layout) = match path {
        Some(path) => {
            let art = fs::read_to_string(path)
                .with_context(|| format!("Failed to open layout file: {}", path.display()))?;
            let layout = Layout::from_ascii(&art)
                .with_context(|| format!("Failed to parse layout file: {}", path.display()))?;
            (path.display().to_string(), layout)
        }
        None => {
            let layout = Layout::default_capture().context("Failed to parse built-in layout")?;
            ("built-in".to_owned(), layout)
        }
    };
    eprintln!(
        "Computing maze distances for {name} ({}x{})...",
        layout.width(),
        layout.height()
    );
    let distancer = Arc::new(MazeDistancer::new(&layout));
    Ok(Arena {
        name,
        layout,
        distancer,
    })
}

/// The seed given on the command line, or a random one.
pub fn match_seed(seed: Option<u64>) -> MatchSeed {
    match seed {
        Some(seed) => MatchSeed::from_u128(u128::from(seed)),
        None => rand::rng().random(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_model_reads_back() {
        let path = std::env::temp_dir().join(format!("capture-model-{}.json", std::process::id()));
        let model = PolicyModel::baseline();
        save_json(&model, Some(&path)).unwrap();
        let loaded = read_policy_model_file(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_missing_model_file_names_the_path() {
        let path = std::env::temp_dir().join("capture-no-such-model.json");
        let err = read_policy_model_file(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("policy model"));
        assert!(err.to_string().contains("capture-no-such-model.json"));
    }
}

//! Run storage API.
//!
//! One JSON document per run, addressed by run id. Exporters and the CLI
//! read runs back through this API; the solver only ever produces the
//! in-memory `SimulationOutputs`.

use crate::types::SimulationOutputs;
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    fn run_path(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(format!("{run_id}.json"))
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_path(run_id).exists()
    }

    pub fn save_run(&self, outputs: &SimulationOutputs) -> ResultsResult<PathBuf> {
        let path = self.run_path(&outputs.metadata.run_id);
        let content = serde_json::to_string_pretty(outputs)?;
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn load_run(&self, run_id: &str) -> ResultsResult<SimulationOutputs> {
        let path = self.run_path(run_id);
        let content = fs::read_to_string(path)?;
        let outputs = serde_json::from_str(&content)?;
        Ok(outputs)
    }

    pub fn list_runs(&self) -> ResultsResult<Vec<String>> {
        let mut runs = Vec::new();
        if !self.root_dir.exists() {
            return Ok(runs);
        }
        for entry in fs::read_dir(&self.root_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem()
            {
                runs.push(stem.to_string_lossy().to_string());
            }
        }
        runs.sort();
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let path = self.run_path(run_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Write one run's outputs to an explicit path.
pub fn save_outputs(path: &Path, outputs: &SimulationOutputs) -> ResultsResult<()> {
    let content = serde_json::to_string_pretty(outputs)?;
    fs::write(path, content)?;
    Ok(())
}

/// Read one run's outputs back from an explicit path.
pub fn load_outputs(path: &Path) -> ResultsResult<SimulationOutputs> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

//! Provenance records for everything the CLI writes.
//!
//! Each artifact `<name>` gets `<name>.provenance.json` next to it. The full file name is
//! kept, so `run.json` and `run.csv` get distinct sidecars.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Serialize)]
pub struct Callsite {
    pub file: &'static str,
    pub line: u32,
}

#[derive(Debug, Serialize)]
pub struct Provenance {
    pub code_rev: String,
    pub dirichlet_version: &'static str,
    pub tag: Option<String>,
    pub params: Value,
    pub outputs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callsite: Option<Callsite>,
}

impl Provenance {
    pub fn new(params: Value, tag: Option<String>, outputs: Vec<String>) -> Self {
        Self {
            code_rev: code_revision(),
            dirichlet_version: dirichlet::VERSION,
            tag,
            params,
            outputs,
            callsite: None,
        }
    }
}

/// Write the sidecar for `artifact`, recording the caller's source location.
#[track_caller]
pub fn write_sidecar(artifact: &Path, params: Value, tag: Option<String>) -> Result<PathBuf> {
    let caller = Location::caller();
    let path = sidecar_path(artifact);
    let mut record = Provenance::new(params, tag, vec![artifact.display().to_string()]);
    record.callsite = Some(Callsite {
        file: caller.file(),
        line: caller.line(),
    });
    fs::write(&path, serde_json::to_vec_pretty(&record)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "artifact".into());
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// `GIT_COMMIT` at build time, then at run time, then `git rev-parse HEAD`, else `"unknown"`.
pub fn code_revision() -> String {
    option_env!("GIT_COMMIT")
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .or_else(|| std::env::var("GIT_COMMIT").ok().filter(|s| !s.is_empty()))
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_owned())
}

fn git_head() -> Option<String> {
    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    Some(rev.trim().to_owned()).filter(|s| !s.is_empty())
}

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced a set of artifacts.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
    pub inputs: Vec<String>,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            params,
            inputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, path: &Path) -> Self {
        self.inputs.push(path.to_string_lossy().into_owned());
        self
    }
}

/// Write `<first output stem>.provenance.json` listing the git commit, library
/// version, callsite, command, params, inputs and every output.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(outputs: &[P], payload: Payload) -> Result<PathBuf> {
    let Some(primary) = outputs.first() else {
        bail!("provenance needs at least one output");
    };
    let provenance_path = provenance_path(primary.as_ref());
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let outputs: Vec<String> = outputs
        .iter()
        .map(|p| p.as_ref().to_string_lossy().into_owned())
        .collect();
    let doc = json!({
        "code_rev": current_git_rev(),
        "glyphmesh_version": glyphmesh::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "command": payload.command,
        "params": payload.params,
        "inputs": payload.inputs,
        "outputs": outputs
    });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    Ok(provenance_path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

pub fn current_git_rev() -> String {
    if let Some(from_env) = option_env!("GIT_COMMIT") {
        if !from_env.is_empty() {
            return from_env.to_string();
        }
    }
    if let Ok(env_override) = std::env::var("GIT_COMMIT") {
        if !env_override.is_empty() {
            return env_override;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_primary_output() {
        let base = Path::new("/tmp/meshes/glyphs.json");
        assert_eq!(
            provenance_path(base),
            Path::new("/tmp/meshes/glyphs.provenance.json")
        );
    }

    #[test]
    fn write_sidecar_lists_inputs_and_outputs() {
        let dir = tempdir().unwrap();
        let mesh = dir.path().join("mesh.json");
        let points = dir.path().join("points.csv");
        fs::write(&mesh, "{}").unwrap();
        let payload = Payload::new("run", json!({"kind": "polygon"}))
            .with_input(Path::new("font.json"));
        let prov_path = write_sidecar(&[&mesh, &points], payload).unwrap();
        assert_eq!(prov_path, dir.path().join("mesh.provenance.json"));
        let parsed: Value = serde_json::from_slice(&fs::read(prov_path).unwrap()).unwrap();
        assert_eq!(parsed["command"], "run");
        assert_eq!(parsed["inputs"][0], "font.json");
        assert_eq!(parsed["outputs"][1], points.to_string_lossy().as_ref());
        assert_eq!(parsed["glyphmesh_version"], glyphmesh::VERSION);
    }

    #[test]
    fn write_sidecar_rejects_empty_outputs() {
        let none: [&Path; 0] = [];
        assert!(write_sidecar(&none, Payload::new("demo", Value::Null)).is_err());
    }
}

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value;

use crate::model::{DependencyRef, Pipeline, Provenance};

/// The input manifest: named pipeline-definition YAML files, in the order
/// they should be considered for layout.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub pipelines: Vec<(String, String)>,
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading manifest {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&raw)
        .with_context(|| format!("parsing manifest {}", path.display()))?;
    Ok(manifest)
}

/// Load every manifest entry. A missing or unparseable definition file
/// never fails the run; it becomes an ordinary pipeline whose trigger text
/// reports the bad path, so the error shows up on the map itself.
pub fn load_pipelines(manifest: &Manifest) -> Vec<Pipeline> {
    manifest
        .pipelines
        .iter()
        .map(|(name, path)| load_pipeline(name, Path::new(path)))
        .collect()
}

pub fn load_pipeline(name: &str, path: &Path) -> Pipeline {
    let doc = fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_yaml::from_str::<Value>(&raw).ok());
    match doc {
        Some(doc) => pipeline_from_yaml(name, path, &doc),
        None => {
            let mut pipeline = Pipeline::new(name);
            pipeline.trigger = Some(format!(
                "File Error check config file path for: {}",
                path.display()
            ));
            pipeline
        }
    }
}

pub fn pipeline_from_yaml(manifest_name: &str, path: &Path, doc: &Value) -> Pipeline {
    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(manifest_name);
    let mut pipeline = Pipeline::new(name);
    pipeline.provenance = Provenance::Real {
        origin: Some(path.display().to_string()),
    };
    pipeline.os = parse_os(doc);
    pipeline.trigger = parse_trigger(doc);
    pipeline.dependencies = parse_dependencies(doc);
    pipeline.tasks = parse_tasks(doc);
    pipeline.artifacts = parse_artifacts(doc);
    pipeline
}

/// Walk the Azure structural nesting (stages > jobs > steps) for the first
/// occurrence of `key`, shallowest match first.
fn deep_find<'a>(doc: &'a Value, key: &str) -> Option<&'a Value> {
    if let Some(found) = doc.get(key) {
        return Some(found);
    }
    for branch in ["stages", "jobs", "steps"] {
        if let Some(Value::Sequence(items)) = doc.get(branch) {
            for item in items {
                if let Some(found) = deep_find(item, key) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn parse_os(doc: &Value) -> Option<String> {
    deep_find(doc, "pool")?
        .get("vmImage")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Trigger precedence: a schedule's raw cron expression, then the first
/// included branch, then "- not" the first excluded branch, then whatever
/// scalar the `trigger` key holds.
fn parse_trigger(doc: &Value) -> Option<String> {
    if let Some(schedules) = doc.get("schedules").and_then(Value::as_sequence) {
        if let Some(cron) = schedules
            .first()
            .and_then(|entry| entry.get("cron"))
            .and_then(Value::as_str)
        {
            return Some(cron.to_string());
        }
    }

    let trigger = doc.get("trigger")?;
    if let Some(branches) = trigger.get("branches") {
        if let Some(include) = branches.get("include").and_then(Value::as_sequence) {
            return include.first().and_then(scalar_string);
        }
        if let Some(exclude) = branches.get("exclude").and_then(Value::as_sequence) {
            return exclude
                .first()
                .and_then(scalar_string)
                .map(|branch| format!("- not {branch}"));
        }
        return None;
    }
    match trigger {
        Value::Sequence(branches) => branches.first().and_then(scalar_string),
        other => scalar_string(other),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_dependencies(doc: &Value) -> Vec<DependencyRef> {
    doc.get("resources")
        .and_then(|resources| resources.get("pipelines"))
        .and_then(Value::as_sequence)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.get("source").and_then(Value::as_str))
                .map(DependencyRef::new)
                .collect()
        })
        .unwrap_or_default()
}

static TASK_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)python|javascript|java|c\+\+|cpp|node|dotnet|powershell|npm").unwrap()
});

fn canonical_task(token: &str) -> &'static str {
    match token.to_ascii_lowercase().as_str() {
        "python" => "Python",
        "java" => "Java",
        "c++" | "cpp" => "C++",
        "javascript" => "JavaScript",
        "node" => "Node",
        "dotnet" => ".NET",
        "powershell" => "Powershell",
        "npm" => "npm",
        _ => "Default",
    }
}

/// Technology tokens, in document order, from every `task:` and `script:`
/// field. Repeats are kept; the renderer turns runs of the same icon into
/// a counter badge.
fn parse_tasks(doc: &Value) -> Vec<String> {
    let mut fields = Vec::new();
    collect_task_fields(doc, &mut fields);

    let mut tasks = Vec::new();
    for content in fields {
        for token in TASK_TOKEN_RE.find_iter(content) {
            tasks.push(canonical_task(token.as_str()).to_string());
        }
    }
    tasks
}

fn collect_task_fields<'a>(doc: &'a Value, out: &mut Vec<&'a str>) {
    for field in ["task", "script"] {
        if let Some(content) = doc.get(field).and_then(Value::as_str) {
            out.push(content);
        }
    }
    for branch in ["stages", "jobs", "steps"] {
        if let Some(Value::Sequence(items)) = doc.get(branch) {
            for item in items {
                collect_task_fields(item, out);
            }
        }
    }
}

fn parse_artifacts(doc: &Value) -> Vec<String> {
    let mut artifacts = Vec::new();
    collect_publish_fields(doc, &mut artifacts);
    artifacts
}

fn collect_publish_fields(doc: &Value, out: &mut Vec<String>) {
    if let Some(publish) = doc.get("publish").and_then(Value::as_str) {
        out.push(publish.to_string());
    }
    for branch in ["stages", "jobs", "steps"] {
        if let Some(Value::Sequence(items)) = doc.get(branch) {
            for item in items {
                collect_publish_fields(item, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Pipeline {
        let doc: Value = serde_yaml::from_str(yaml).unwrap();
        pipeline_from_yaml("Fallback", Path::new("azure-pipelines.yml"), &doc)
    }

    #[test]
    fn yaml_name_wins_over_manifest_name() {
        let pipeline = parse("name: Build\ntrigger: main\n");
        assert_eq!(pipeline.name, "Build");
        assert_eq!(pipeline.origin(), Some("azure-pipelines.yml"));
    }

    #[test]
    fn manifest_name_fills_in_when_yaml_has_none() {
        let pipeline = parse("trigger: main\n");
        assert_eq!(pipeline.name, "Fallback");
    }

    #[test]
    fn pool_image_is_found_under_a_job() {
        let pipeline = parse(
            "jobs:\n  - job: build\n    pool:\n      vmImage: ubuntu-latest\n",
        );
        assert_eq!(pipeline.os.as_deref(), Some("ubuntu-latest"));
    }

    #[test]
    fn schedule_cron_outranks_branch_triggers() {
        let pipeline = parse(
            "schedules:\n  - cron: '0 15 * * Fri'\ntrigger:\n  branches:\n    include: [main]\n",
        );
        assert_eq!(pipeline.trigger.as_deref(), Some("0 15 * * Fri"));
    }

    #[test]
    fn excluded_branch_renders_negated() {
        let pipeline = parse("trigger:\n  branches:\n    exclude: [main]\n");
        assert_eq!(pipeline.trigger.as_deref(), Some("- not main"));
    }

    #[test]
    fn bare_branch_list_uses_first_entry() {
        let pipeline = parse("trigger:\n  - develop\n  - main\n");
        assert_eq!(pipeline.trigger.as_deref(), Some("develop"));
    }

    #[test]
    fn resource_pipelines_become_dependencies() {
        let pipeline = parse(
            "resources:\n  pipelines:\n    - pipeline: upstream\n      source: Build\n",
        );
        assert_eq!(pipeline.dependencies.len(), 1);
        assert_eq!(pipeline.dependencies[0].name, "Build");
    }

    #[test]
    fn task_tokens_are_aliased_and_repeats_kept() {
        let pipeline = parse(
            "steps:\n  - task: UsePythonVersion@0\n  - script: python -m pytest\n  - task: DotNetCoreCLI@2\n",
        );
        assert_eq!(pipeline.tasks, ["Python", "Python", ".NET"]);
    }

    #[test]
    fn javascript_is_not_misread_as_java() {
        let pipeline = parse("steps:\n  - script: run javascript bundler\n");
        assert_eq!(pipeline.tasks, ["JavaScript"]);
    }

    #[test]
    fn publish_steps_become_artifacts() {
        let pipeline = parse(
            "jobs:\n  - job: build\n    steps:\n      - publish: dist/\n",
        );
        assert_eq!(pipeline.artifacts, ["dist/"]);
    }

    #[test]
    fn unreadable_file_becomes_a_file_error_node() {
        let pipeline = load_pipeline("Broken", Path::new("no/such/file.yml"));
        assert!(!pipeline.is_placeholder());
        assert!(pipeline.dependencies.is_empty());
        assert_eq!(
            pipeline.trigger.as_deref(),
            Some("File Error check config file path for: no/such/file.yml")
        );
    }
}

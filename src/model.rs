use serde::{Deserialize, Serialize};

/// Integer diagram coordinates. Element identifiers encode these verbatim,
/// so layout never works in floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_origin(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Where a pipeline record came from. A placeholder is a proper variant,
/// not a node with missing fields, so the distinction cannot be forgotten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Parsed from a pipeline definition. `origin` is the file path or URL
    /// the definition was read from, when known.
    Real { origin: Option<String> },
    /// Synthesized stand-in for a dependency that was never drawn.
    Placeholder { reason: String },
}

/// A by-name reference to another pipeline. This is a separate record, not
/// the referenced pipeline itself: `pos` is copied over by name match when
/// coordinates are synchronized, identity is never unified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRef {
    pub name: String,
    pub pos: Point,
}

impl DependencyRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pos: Point::default(),
        }
    }
}

/// A single CI/CD pipeline: identity, dependency edges, and the descriptive
/// attributes the renderer puts inside the node box.
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Join key for the whole system; matching is always case-insensitive.
    pub name: String,
    pub provenance: Provenance,
    pub pos: Point,
    pub dependencies: Vec<DependencyRef>,
    pub os: Option<String>,
    pub trigger: Option<String>,
    pub tasks: Vec<String>,
    pub artifacts: Vec<String>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provenance: Provenance::Real { origin: None },
            pos: Point::default(),
            dependencies: Vec::new(),
            os: None,
            trigger: None,
            tasks: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    pub fn placeholder(name: impl Into<String>, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            trigger: Some(reason.clone()),
            provenance: Provenance::Placeholder { reason },
            ..Self::new(name)
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.provenance, Provenance::Placeholder { .. })
    }

    pub fn origin(&self) -> Option<&str> {
        match &self.provenance {
            Provenance::Real { origin } => origin.as_deref(),
            Provenance::Placeholder { .. } => None,
        }
    }

    /// Case-insensitive name match against the system-wide join key rule.
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other)
    }
}

/// Copy drawn coordinates onto every dependency reference whose name
/// matches a pipeline in the list. Runs repeatedly during layout so the
/// references always describe what is actually on the canvas.
pub fn sync_dependency_coordinates(pipelines: &mut [Pipeline]) {
    let drawn: Vec<(String, Point)> = pipelines
        .iter()
        .map(|p| (p.name.to_ascii_lowercase(), p.pos))
        .collect();
    for pipeline in pipelines.iter_mut() {
        for dep in &mut pipeline.dependencies {
            let key = dep.name.to_ascii_lowercase();
            if let Some((_, pos)) = drawn.iter().find(|(name, _)| *name == key) {
                dep.pos = *pos;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_carries_reason_as_trigger() {
        let p = Pipeline::placeholder("Deploy", "Dependent pipeline Deploy not found");
        assert!(p.is_placeholder());
        assert_eq!(p.origin(), None);
        assert_eq!(
            p.trigger.as_deref(),
            Some("Dependent pipeline Deploy not found")
        );
    }

    #[test]
    fn sync_matches_names_case_insensitively() {
        let mut build = Pipeline::new("Build");
        build.pos = Point::new(50, 50);
        let mut deploy = Pipeline::new("Deploy");
        deploy.dependencies.push(DependencyRef::new("BUILD"));

        let mut pipelines = vec![build, deploy];
        sync_dependency_coordinates(&mut pipelines);
        assert_eq!(pipelines[1].dependencies[0].pos, Point::new(50, 50));
    }

    #[test]
    fn sync_leaves_unknown_references_at_origin() {
        let mut deploy = Pipeline::new("Deploy");
        deploy.dependencies.push(DependencyRef::new("Missing"));
        let mut pipelines = vec![deploy];
        sync_dependency_coordinates(&mut pipelines);
        assert_eq!(pipelines[0].dependencies[0].pos, Point::default());
    }
}

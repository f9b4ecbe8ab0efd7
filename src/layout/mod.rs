//! Value-stream-map layout: ordering, placement, edge routing, and canvas
//! sizing for a dependency graph of pipelines.

mod ordering;
mod placeholder;
mod placement;
mod routing;
pub mod types;

pub use ordering::sequence;
pub use placeholder::PlaceholderRegistry;
pub use placement::place;
pub use routing::route;
pub use types::{EdgeId, EdgeLayout, ElementId, IdParseError, NodeLayout, RectId, Segment, VsmLayout};

use crate::config::LayoutConfig;
use crate::model::{Pipeline, sync_dependency_coordinates};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("dependency cycle between pipelines: {}", members.join(", "))]
    DependencyCycle { members: Vec<String> },
}

/// Lay out the full map: sequence the pipelines, seat them on the canvas,
/// route every dependency edge, fold reconciled placeholders away, and
/// size the canvas around the result.
pub fn compute_layout(
    pipelines: Vec<Pipeline>,
    config: &LayoutConfig,
) -> Result<VsmLayout, LayoutError> {
    let ordered = sequence(pipelines)?;
    let (mut placed, registry) = place(ordered, config);

    nudge_apart(&mut placed);
    sync_dependency_coordinates(&mut placed);

    let nodes: Vec<NodeLayout> = placed.iter().map(NodeLayout::from_pipeline).collect();
    let mut edges = Vec::new();
    for pipeline in &placed {
        for dep in &pipeline.dependencies {
            edges.push(route(dep.pos, pipeline.pos, config));
        }
    }

    let mut layout = VsmLayout {
        nodes,
        edges,
        width: 0,
        height: 0,
    };
    registry.reconcile(&mut layout, config);

    let (width, height) = canvas_size(&layout, config);
    layout.width = width;
    layout.height = height;
    Ok(layout)
}

/// Coordinates double as identifiers, so two boxes must never share a
/// position. The box being finalized slides down one pixel at a time
/// until its position is unique.
fn nudge_apart(pipelines: &mut [Pipeline]) {
    for idx in 0..pipelines.len() {
        let mut pos = pipelines[idx].pos;
        while pipelines
            .iter()
            .enumerate()
            .any(|(other, p)| other != idx && p.pos == pos)
        {
            pos.y += 1;
        }
        pipelines[idx].pos = pos;
    }
}

/// Size the canvas around the laid-out content, never below the minimum
/// square. Arrowheads are the only geometry that can stick out past the
/// boxes that anchor them.
fn canvas_size(layout: &VsmLayout, config: &LayoutConfig) -> (i32, i32) {
    let mut max_x = config.min_canvas - config.pipeline_width;
    let mut max_y = config.min_canvas - config.pipeline_height;
    for node in &layout.nodes {
        max_x = max_x.max(node.pos.x);
        max_y = max_y.max(node.pos.y);
    }
    for edge in &layout.edges {
        max_x = max_x.max(edge.arrow_pos.x);
        max_y = max_y.max(edge.arrow_pos.y);
    }
    (
        max_x + config.pipeline_width,
        max_y + config.pipeline_height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DependencyRef, Point};

    fn pipeline(name: &str, deps: &[&str]) -> Pipeline {
        let mut p = Pipeline::new(name);
        p.dependencies = deps.iter().copied().map(DependencyRef::new).collect();
        p
    }

    #[test]
    fn linear_chain_produces_one_edge_with_two_segments() {
        let config = LayoutConfig::default();
        let layout = compute_layout(
            vec![pipeline("B", &["A"]), pipeline("A", &[])],
            &config,
        )
        .unwrap();

        assert_eq!(layout.nodes[0].pos, Point::new(50, 50));
        assert_eq!(layout.nodes[1].pos, Point::new(400, 50));
        assert_eq!(layout.edges.len(), 1);
        let edge = &layout.edges[0];
        assert_eq!(edge.id.to_string(), "post_rect_50_50_pre_rect_400_50");
        assert_ne!(edge.segment_a.1, edge.segment_b.1);
    }

    #[test]
    fn canvas_never_shrinks_below_the_minimum_square() {
        let config = LayoutConfig::default();
        let layout = compute_layout(vec![pipeline("A", &[])], &config).unwrap();
        assert_eq!(layout.width, 3000);
        assert_eq!(layout.height, 3000);
    }

    #[test]
    fn canvas_grows_with_distant_content() {
        let config = LayoutConfig::default();
        let deps: Vec<String> = (0..12).map(|i| format!("P{i}")).collect();
        let mut pipelines: Vec<Pipeline> =
            deps.iter().map(|name| pipeline(name, &[])).collect();
        // A long chain: each node one column past the previous one.
        for i in 1..deps.len() {
            pipelines[i].dependencies.push(DependencyRef::new(&deps[i - 1]));
        }
        let layout = compute_layout(pipelines, &config).unwrap();
        let right_most = layout.nodes.iter().map(|n| n.pos.x).max().unwrap_or(0);
        assert!(right_most > 3000 - config.pipeline_width);
        assert_eq!(layout.width, right_most + config.pipeline_width);
    }

    #[test]
    fn shared_positions_are_nudged_apart() {
        let mut a = pipeline("A", &[]);
        let mut b = pipeline("B", &[]);
        a.pos = Point::new(50, 50);
        b.pos = Point::new(50, 50);
        let mut pipelines = vec![a, b];
        nudge_apart(&mut pipelines);
        assert_ne!(pipelines[0].pos, pipelines[1].pos);
        // The first node visited is the one that moves off the clash.
        assert_eq!(pipelines[0].pos, Point::new(50, 51));
        assert_eq!(pipelines[1].pos, Point::new(50, 50));
    }

    #[test]
    fn missing_dependency_yields_a_visible_placeholder_node() {
        let config = LayoutConfig::default();
        let layout = compute_layout(vec![pipeline("B", &["Gone"]) ], &config).unwrap();
        let placeholder = layout
            .nodes
            .iter()
            .find(|n| n.placeholder)
            .expect("placeholder node");
        assert!(!placeholder.hidden);
        assert_eq!(
            placeholder.trigger.as_deref(),
            Some("Dependent pipeline Gone not found")
        );
        // The dependent's edge leaves from the placeholder box.
        assert_eq!(layout.edges[0].id.from, placeholder.pos);
    }

    #[test]
    fn cycle_surfaces_as_an_error() {
        let config = LayoutConfig::default();
        let err = compute_layout(
            vec![pipeline("x", &["y"]), pipeline("y", &["x"])],
            &config,
        )
        .unwrap_err();
        assert!(err.to_string().contains("dependency cycle"));
    }
}

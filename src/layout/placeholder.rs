use std::collections::BTreeSet;

use crate::config::LayoutConfig;
use crate::model::{Pipeline, Point};

use super::types::VsmLayout;

/// Names (lowercased) for which a placeholder box was synthesized during
/// placement. Owned by the layout pass that created it, so independent runs
/// cannot see each other's placeholders.
#[derive(Debug, Default)]
pub struct PlaceholderRegistry {
    names: BTreeSet<String>,
}

impl PlaceholderRegistry {
    /// Synthesize a stand-in pipeline for a dependency that has no drawn
    /// counterpart. The box starts at `anchor` and is pushed down one full
    /// row (height plus gutter) at a time until it overlaps nothing, then
    /// joins the working node list so later layout steps can match it.
    pub fn materialize(
        &mut self,
        name: &str,
        anchor: Point,
        pipelines: &mut Vec<Pipeline>,
        config: &LayoutConfig,
    ) -> Point {
        let mut pos = anchor;
        while collides(pos, pipelines, config) {
            pos.y += config.pipeline_height + config.gutter;
        }

        let mut placeholder =
            Pipeline::placeholder(name, format!("Dependent pipeline {name} not found"));
        placeholder.pos = pos;
        self.names.insert(name.to_ascii_lowercase());
        pipelines.push(placeholder);
        pos
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Fold placeholders into the real pipelines that turned up after them.
    ///
    /// For every visible real node whose name is registered: hide the
    /// matching placeholder box and re-anchor every edge that left from the
    /// placeholder's coordinates so it leaves from the real node instead,
    /// rewriting both the edge identifier's source half and the first
    /// segment's start point. A registered name with no drawn placeholder
    /// is a no-op.
    pub fn reconcile(&self, layout: &mut VsmLayout, config: &LayoutConfig) {
        if self.is_empty() {
            return;
        }

        let real_nodes: Vec<(String, Point)> = layout
            .nodes
            .iter()
            .filter(|node| !node.placeholder)
            .map(|node| (node.name.clone(), node.pos))
            .collect();

        for (name, real_pos) in real_nodes {
            if !self.contains(&name) {
                continue;
            }
            let Some(placeholder) = layout
                .nodes
                .iter_mut()
                .find(|node| node.placeholder && !node.hidden && node.name.eq_ignore_ascii_case(&name))
            else {
                continue;
            };
            placeholder.hidden = true;
            let old_pos = placeholder.pos;

            for edge in &mut layout.edges {
                if edge.id.from == old_pos {
                    edge.id.from = real_pos;
                    edge.segment_a.0 = Point::new(
                        real_pos.x + config.pipeline_width,
                        real_pos.y + config.pipeline_height / 2,
                    );
                }
            }
        }
    }
}

/// One-sided bounding-box overlap test used while seating placeholders.
/// Nodes still at the coordinate origin have not been placed yet and are
/// skipped.
pub(super) fn collides(candidate: Point, pipelines: &[Pipeline], config: &LayoutConfig) -> bool {
    pipelines.iter().any(|other| {
        !other.pos.is_origin()
            && candidate.x < other.pos.x + config.pipeline_width
            && candidate.y < other.pos.y + config.pipeline_height
    })
}

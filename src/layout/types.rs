use std::fmt;
use std::str::FromStr;

use crate::model::{Pipeline, Point};

/// Identifier of a drawn pipeline rectangle, encoding its coordinates.
/// Serialized as `rect_<x>_<y>`; an external position editor parses these
/// back, so the format is a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RectId(pub Point);

impl fmt::Display for RectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rect_{}_{}", self.0.x, self.0.y)
    }
}

/// Identifier of a dependency edge, encoding both endpoints' rectangle
/// coordinates: `post_rect_<x1>_<y1>_pre_rect_<x2>_<y2>`. The source is the
/// dependency ("post"), the target the dependent ("pre").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId {
    pub from: Point,
    pub to: Point,
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "post_rect_{}_{}_pre_rect_{}_{}",
            self.from.x, self.from.y, self.to.x, self.to.y
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    A,
    B,
}

impl Segment {
    pub fn suffix(self) -> &'static str {
        match self {
            Segment::A => "-SegmentA",
            Segment::B => "-SegmentB",
        }
    }
}

/// Any identifier the renderer hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementId {
    Rect(RectId),
    EdgeSegment(EdgeId, Segment),
    Arrow(EdgeId),
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Rect(id) => id.fmt(f),
            ElementId::EdgeSegment(id, segment) => write!(f, "{id}{}", segment.suffix()),
            ElementId::Arrow(id) => write!(f, "{id}-arrow"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("malformed element id: {0:?}")]
pub struct IdParseError(pub String);

fn parse_coords<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    raw: &str,
) -> Result<Point, IdParseError> {
    let x = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(|| IdParseError(raw.to_string()))?;
    let y = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(|| IdParseError(raw.to_string()))?;
    Ok(Point::new(x, y))
}

impl FromStr for RectId {
    type Err = IdParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let rest = raw
            .strip_prefix("rect_")
            .ok_or_else(|| IdParseError(raw.to_string()))?;
        let mut parts = rest.split('_');
        let pos = parse_coords(&mut parts, raw)?;
        if parts.next().is_some() {
            return Err(IdParseError(raw.to_string()));
        }
        Ok(RectId(pos))
    }
}

impl FromStr for EdgeId {
    type Err = IdParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let rest = raw
            .strip_prefix("post_rect_")
            .ok_or_else(|| IdParseError(raw.to_string()))?;
        let (from_part, to_part) = rest
            .split_once("_pre_rect_")
            .ok_or_else(|| IdParseError(raw.to_string()))?;
        let mut from_parts = from_part.split('_');
        let from = parse_coords(&mut from_parts, raw)?;
        if from_parts.next().is_some() {
            return Err(IdParseError(raw.to_string()));
        }
        let mut to_parts = to_part.split('_');
        let to = parse_coords(&mut to_parts, raw)?;
        if to_parts.next().is_some() {
            return Err(IdParseError(raw.to_string()));
        }
        Ok(EdgeId { from, to })
    }
}

impl FromStr for ElementId {
    type Err = IdParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if let Some(edge) = raw.strip_suffix("-SegmentA") {
            return Ok(ElementId::EdgeSegment(edge.parse()?, Segment::A));
        }
        if let Some(edge) = raw.strip_suffix("-SegmentB") {
            return Ok(ElementId::EdgeSegment(edge.parse()?, Segment::B));
        }
        if let Some(edge) = raw.strip_suffix("-arrow") {
            return Ok(ElementId::Arrow(edge.parse()?));
        }
        Ok(ElementId::Rect(raw.parse()?))
    }
}

/// A positioned pipeline box, ready to draw.
#[derive(Debug, Clone)]
pub struct NodeLayout {
    pub name: String,
    pub pos: Point,
    pub placeholder: bool,
    /// Set when a placeholder has been reconciled away; the box stays in
    /// the output but is not visible.
    pub hidden: bool,
    pub origin: Option<String>,
    pub os: Option<String>,
    pub trigger: Option<String>,
    pub tasks: Vec<String>,
    pub artifacts: Vec<String>,
}

impl NodeLayout {
    pub fn from_pipeline(pipeline: &Pipeline) -> Self {
        Self {
            name: pipeline.name.clone(),
            pos: pipeline.pos,
            placeholder: pipeline.is_placeholder(),
            hidden: false,
            origin: pipeline.origin().map(str::to_string),
            os: pipeline.os.clone(),
            trigger: pipeline.trigger.clone(),
            tasks: pipeline.tasks.clone(),
            artifacts: pipeline.artifacts.clone(),
        }
    }

    pub fn rect_id(&self) -> RectId {
        RectId(self.pos)
    }
}

/// One routed dependency edge: a long run (segment A), a short terminal
/// stub (segment B), and an arrowhead glyph pointing into the dependent.
#[derive(Debug, Clone)]
pub struct EdgeLayout {
    pub id: EdgeId,
    pub segment_a: (Point, Point),
    pub segment_b: (Point, Point),
    pub arrow_pos: Point,
    /// Clockwise degrees about the arrowhead's insertion point.
    pub arrow_rotation: i32,
}

/// The finished value-stream map.
#[derive(Debug, Clone)]
pub struct VsmLayout {
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub width: i32,
    pub height: i32,
}

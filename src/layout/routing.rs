use crate::config::LayoutConfig;
use crate::model::Point;

use super::types::{EdgeId, EdgeLayout};

/// Route one dependency edge from the dependency box at `dep_pos` into the
/// dependent box at `node_pos`.
///
/// The default shape runs from the dependency's right-middle to a stub
/// short of the dependent's left-middle, with the arrowhead pointing right.
/// When the dependent sits too far left for that run, the start moves to
/// the dependency's bottom or top middle; when the boxes overlap
/// horizontally the edge instead enters through the dependent's top or
/// bottom, rotating the arrowhead to match.
pub fn route(dep_pos: Point, node_pos: Point, config: &LayoutConfig) -> EdgeLayout {
    let w = config.pipeline_width;
    let h = config.pipeline_height;
    let stub = config.edge_stub;

    let mut start = Point::new(dep_pos.x + w, dep_pos.y + h / 2);
    let mut bend = Point::new(node_pos.x - stub, node_pos.y + h / 2);
    let mut end = Point::new(node_pos.x, node_pos.y + h / 2);
    let mut arrow_pos = Point::new(bend.x + config.arrow_offset_x, bend.y - config.arrow_offset_y);
    let mut rotation = 0;

    // Dependent starts left of the dependency's right edge: leave through
    // the dependency's bottom or top instead of its side.
    if node_pos.x - stub < dep_pos.x + w {
        start = if node_pos.y > dep_pos.y {
            Point::new(dep_pos.x + w / 2, dep_pos.y + h)
        } else {
            Point::new(dep_pos.x + w / 2, dep_pos.y)
        };
    }

    // Horizontal overlap: enter the dependent vertically.
    if node_pos.x + w / 2 < dep_pos.x + w {
        if node_pos.y > dep_pos.y {
            bend = Point::new(node_pos.x + w / 2, node_pos.y - stub);
            end = Point::new(node_pos.x + w / 2, node_pos.y);
            arrow_pos =
                Point::new(bend.x + config.arrow_offset_y, bend.y + config.arrow_offset_x);
            rotation = 90;
        } else {
            bend = Point::new(node_pos.x + w / 2, node_pos.y + h + stub);
            end = Point::new(node_pos.x + w / 2, node_pos.y + h);
            arrow_pos =
                Point::new(bend.x + config.arrow_offset_y, bend.y - config.arrow_offset_x);
            rotation = 270;
        }
    }

    EdgeLayout {
        id: EdgeId {
            from: dep_pos,
            to: node_pos,
        },
        segment_a: (start, bend),
        segment_b: (bend, end),
        arrow_pos,
        arrow_rotation: rotation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_run_enters_through_the_left_side() {
        let config = LayoutConfig::default();
        let edge = route(Point::new(50, 50), Point::new(400, 50), &config);
        assert_eq!(edge.segment_a, (Point::new(350, 100), Point::new(370, 100)));
        assert_eq!(edge.segment_b, (Point::new(370, 100), Point::new(400, 100)));
        assert_eq!(edge.arrow_pos, Point::new(379, 88));
        assert_eq!(edge.arrow_rotation, 0);
        assert_eq!(
            edge.id.to_string(),
            "post_rect_50_50_pre_rect_400_50"
        );
    }

    #[test]
    fn dependent_below_an_overlapping_dependency_enters_from_above() {
        let config = LayoutConfig::default();
        let edge = route(Point::new(50, 50), Point::new(50, 400), &config);
        // Leaves the dependency's bottom middle.
        assert_eq!(edge.segment_a.0, Point::new(200, 150));
        assert_eq!(edge.segment_a.1, Point::new(200, 370));
        assert_eq!(edge.segment_b, (Point::new(200, 370), Point::new(200, 400)));
        assert_eq!(edge.arrow_pos, Point::new(212, 379));
        assert_eq!(edge.arrow_rotation, 90);
    }

    #[test]
    fn dependent_above_an_overlapping_dependency_enters_from_below() {
        let config = LayoutConfig::default();
        let edge = route(Point::new(50, 400), Point::new(50, 50), &config);
        // Leaves the dependency's top middle.
        assert_eq!(edge.segment_a.0, Point::new(200, 400));
        assert_eq!(edge.segment_a.1, Point::new(200, 180));
        assert_eq!(edge.segment_b, (Point::new(200, 180), Point::new(200, 150)));
        assert_eq!(edge.arrow_pos, Point::new(212, 171));
        assert_eq!(edge.arrow_rotation, 270);
    }

    #[test]
    fn near_left_dependent_keeps_horizontal_entry() {
        let config = LayoutConfig::default();
        // Too close for the side exit, but far enough right for a side
        // entry: start swings to the bottom middle, entry stays level.
        let edge = route(Point::new(50, 50), Point::new(250, 400), &config);
        assert_eq!(edge.segment_a.0, Point::new(200, 150));
        assert_eq!(edge.segment_b.1, Point::new(250, 450));
        assert_eq!(edge.arrow_rotation, 0);
    }
}

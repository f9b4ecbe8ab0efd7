use crate::config::LayoutConfig;
use crate::model::{Pipeline, Point};

use super::placeholder::PlaceholderRegistry;

/// Assign canvas coordinates to an ordered pipeline list.
///
/// Rows grow downward, chains grow rightward. Each node starts at the
/// margin of the current row; every resolved dependency pulls it one full
/// column (box width plus gutter) right of that dependency. A dependency
/// with no drawn counterpart is materialized as a placeholder first and the
/// node seats right of it. Consecutive nodes landing on the same column
/// form a sibling group; when a row closes, rows holding a group of two or
/// more are spread vertically across the row's band.
///
/// Placeholders synthesized along the way are appended to the returned
/// list; the registry remembers their names for reconciliation.
pub fn place(
    ordered: Vec<Pipeline>,
    config: &LayoutConfig,
) -> (Vec<Pipeline>, PlaceholderRegistry) {
    let mut pipelines = ordered;
    let mut registry = PlaceholderRegistry::default();
    let input_len = pipelines.len();

    // Sibling groups of the current row, as indices into `pipelines`.
    let mut chain: Vec<Vec<usize>> = Vec::new();
    let mut max_siblings = 0usize;
    let mut y_offset = 0;

    for idx in 0..input_len {
        let mut pos = Point::new(config.margin, config.margin + y_offset);

        if pipelines[idx].dependencies.is_empty() {
            // A root closes the previous row and opens a new one.
            if !chain.is_empty() {
                let row_top = config.margin + y_offset;
                y_offset += close_row(&mut pipelines, &chain, max_siblings, row_top, config);
                chain.clear();
                max_siblings = 0;
                pos = Point::new(config.margin, config.margin + y_offset);
            }
            chain.push(vec![idx]);
        } else {
            for dep_idx in 0..pipelines[idx].dependencies.len() {
                let dep_name = pipelines[idx].dependencies[dep_idx].name.clone();
                match find_placed(&pipelines, idx, input_len, &dep_name) {
                    Some(found) => {
                        pos.x = found.x + config.pipeline_width + config.gutter;
                    }
                    None => {
                        let anchor = registry.materialize(&dep_name, pos, &mut pipelines, config);
                        pos = Point::new(
                            anchor.x + config.pipeline_width + config.gutter,
                            anchor.y,
                        );
                    }
                }
            }

            let same_column = idx > 0 && pipelines[idx - 1].pos.x == pos.x;
            match chain.last_mut() {
                Some(group) if same_column => {
                    group.push(idx);
                    max_siblings = max_siblings.max(group.len());
                }
                _ => chain.push(vec![idx]),
            }
        }

        pipelines[idx].pos = pos;
    }

    if !chain.is_empty() {
        let row_top = config.margin + y_offset;
        close_row(&mut pipelines, &chain, max_siblings, row_top, config);
    }

    (pipelines, registry)
}

/// Look up a dependency among everything already on the canvas: nodes
/// seated so far plus any placeholder appended past the input tail.
/// The rightmost duplicate wins, matching draw order.
fn find_placed(
    pipelines: &[Pipeline],
    idx: usize,
    input_len: usize,
    name: &str,
) -> Option<Point> {
    (0..idx)
        .chain(input_len..pipelines.len())
        .filter(|&i| pipelines[i].name_matches(name))
        .map(|i| pipelines[i].pos)
        .last()
}

/// Spread the closed row's sibling groups across its band and return the
/// band height the next row starts below.
fn close_row(
    pipelines: &mut [Pipeline],
    chain: &[Vec<usize>],
    max_siblings: usize,
    row_top: i32,
    config: &LayoutConfig,
) -> i32 {
    let band = if max_siblings > 0 {
        max_siblings as i32 * config.sibling_band + config.gutter
    } else {
        config.sibling_band
    };
    // A row whose widest group is a single node keeps its seated
    // coordinates; only real sibling fans get centered.
    if max_siblings >= 2 {
        for group in chain {
            let slots = group.len() as i32 + 1;
            for (i, &idx) in group.iter().enumerate() {
                let step = band * (i as i32 + 1) / slots;
                pipelines[idx].pos.y = row_top + step - config.margin;
            }
        }
    }
    band
}

use crate::layout::VsmLayout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// JSON form of a computed layout, for inspection and for tools that edit
/// positions outside the renderer. Ids are the same strings the SVG uses.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: i32,
    pub height: i32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub placeholder: bool,
    pub hidden: bool,
    pub origin: Option<String>,
    pub os: Option<String>,
    pub trigger: Option<String>,
    pub tasks: Vec<String>,
    pub artifacts: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub segment_a: [[i32; 2]; 2],
    pub segment_b: [[i32; 2]; 2],
    pub arrow: [i32; 2],
    pub arrow_rotation: i32,
}

impl LayoutDump {
    pub fn from_layout(layout: &VsmLayout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.rect_id().to_string(),
                name: node.name.clone(),
                x: node.pos.x,
                y: node.pos.y,
                placeholder: node.placeholder,
                hidden: node.hidden,
                origin: node.origin.clone(),
                os: node.os.clone(),
                trigger: node.trigger.clone(),
                tasks: node.tasks.clone(),
                artifacts: node.artifacts.clone(),
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.to_string(),
                segment_a: [
                    [edge.segment_a.0.x, edge.segment_a.0.y],
                    [edge.segment_a.1.x, edge.segment_a.1.y],
                ],
                segment_b: [
                    [edge.segment_b.0.x, edge.segment_b.0.y],
                    [edge.segment_b.1.x, edge.segment_b.1.y],
                ],
                arrow: [edge.arrow_pos.x, edge.arrow_pos.y],
                arrow_rotation: edge.arrow_rotation,
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &VsmLayout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &LayoutDump::from_layout(layout))?;
    Ok(())
}

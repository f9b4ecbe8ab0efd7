use crate::config::LayoutConfig;
#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::layout::{ElementId, NodeLayout, Segment, VsmLayout};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(layout: &VsmLayout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&gradient_def(
        "nodeGradient",
        &theme.node_gradient_top,
        &theme.node_gradient_bottom,
    ));
    svg.push_str(&gradient_def(
        "placeholderGradient",
        &theme.placeholder_gradient_top,
        &theme.placeholder_gradient_bottom,
    ));
    svg.push_str("</defs>");

    for node in &layout.nodes {
        svg.push_str(&node_svg(node, theme, config));
    }

    for edge in &layout.edges {
        for (segment, (from, to)) in [
            (Segment::A, edge.segment_a),
            (Segment::B, edge.segment_b),
        ] {
            svg.push_str(&format!(
                "<line id=\"{}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                ElementId::EdgeSegment(edge.id, segment),
                from.x,
                from.y,
                to.x,
                to.y,
                theme.line_color,
                theme.stroke_width
            ));
        }
        svg.push_str(&format!(
            "<image id=\"{}\" href=\"resources/arrowhead.png\" x=\"{}\" y=\"{}\" width=\"{size}\" height=\"{size}\" class=\"draggable\" transform=\"rotate({} {} {})\"/>",
            ElementId::Arrow(edge.id),
            edge.arrow_pos.x,
            edge.arrow_pos.y,
            edge.arrow_rotation,
            edge.arrow_pos.x,
            edge.arrow_pos.y,
            size = config.arrow_size
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn gradient_def(id: &str, top: &str, bottom: &str) -> String {
    format!(
        "<linearGradient id=\"{id}\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\"><stop offset=\"0\" stop-color=\"{top}\"/><stop offset=\"0.7\" stop-color=\"{bottom}\"/></linearGradient>",
    )
}

fn node_svg(node: &NodeLayout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut group = String::new();
    let x = node.pos.x;
    let y = node.pos.y;

    if node.placeholder {
        let visibility = if node.hidden { " visibility=\"hidden\"" } else { "" };
        group.push_str(&format!(
            "<g id=\"dummy_{}\"{visibility}>",
            escape_xml(&node.name)
        ));
    } else {
        group.push_str("<g>");
    }

    let gradient = if node.placeholder {
        "placeholderGradient"
    } else {
        "nodeGradient"
    };
    group.push_str(&format!(
        "<rect id=\"{}\" class=\"draggable\" x=\"{x}\" y=\"{y}\" width=\"{}\" height=\"{}\" rx=\"10\" ry=\"10\" fill=\"url(#{gradient})\" stroke-width=\"{}\"/>",
        node.rect_id(),
        config.pipeline_width,
        config.pipeline_height,
        theme.stroke_width
    ));

    let name_text = format!(
        "<text x=\"{}\" y=\"{}\" fill=\"{}\" class=\"draggable\" style=\"{}font-family:{};\">{}</text>",
        x + 10,
        y + 20,
        theme.text_color,
        if node.origin.is_some() {
            "text-decoration: underline;"
        } else {
            ""
        },
        theme.font_family,
        escape_xml(&node.name)
    );
    match &node.origin {
        Some(origin) => group.push_str(&format!(
            "<a href=\"{}\" class=\"draggable\">{name_text}</a>",
            escape_xml(origin)
        )),
        None => group.push_str(&name_text),
    }

    if let Some(os) = node.os.as_deref() {
        if let Some(icon) = os_icon(os) {
            group.push_str(&image_svg(
                icon,
                x + config.pipeline_width - config.icon_size - config.icon_margin,
                y + config.icon_margin,
                config.icon_size,
            ));
        }
    }

    if let Some(trigger) = node.trigger.as_deref() {
        push_trigger(&mut group, trigger, x, y, theme, config);
    }

    push_task_row(&mut group, node, theme, config);

    group.push_str("</g>");
    group
}

fn os_icon(os: &str) -> Option<&'static str> {
    match os {
        "windows-latest" => Some("resources/windows.png"),
        "ubuntu-latest" => Some("resources/ubuntu.png"),
        "macOS-latest" => Some("resources/macOS.png"),
        _ => None,
    }
}

fn image_svg(href: &str, x: i32, y: i32, size: i32) -> String {
    format!(
        "<image href=\"{href}\" x=\"{x}\" y=\"{y}\" width=\"{size}\" height=\"{size}\" class=\"draggable\"/>",
    )
}

/// Center the trigger line inside the box with the flat per-character
/// width estimate. Text wider than the box is only drawn for the two
/// synthetic messages, each split into three known lines.
fn push_trigger(
    group: &mut String,
    text: &str,
    x: i32,
    y: i32,
    theme: &Theme,
    config: &LayoutConfig,
) {
    let estimated = text.len() as i32 * config.char_width;
    if estimated <= config.pipeline_width {
        push_centered_text(group, text, x, y + 50, theme, config);
        return;
    }

    let lines: Vec<String> = if text.contains("not found") {
        let (head, rest) = text.split_once("pipeline").unwrap_or((text, ""));
        let middle = rest.split("not found").next().unwrap_or("");
        vec![
            format!("{head}pipeline"),
            middle.to_string(),
            "not found".to_string(),
        ]
    } else if text.contains("File Error") {
        let (head, rest) = text.split_once("File Error").unwrap_or((text, ""));
        let (label, bad_path) = rest.split_once("for:").unwrap_or((rest, ""));
        vec![
            format!("{head}File Error"),
            format!("{label}for:"),
            bad_path.to_string(),
        ]
    } else {
        return;
    };

    for (index, line) in lines.iter().enumerate() {
        push_centered_text(group, line, x, y + 35 + index as i32 * 20, theme, config);
    }
}

fn push_centered_text(
    group: &mut String,
    text: &str,
    x: i32,
    y: i32,
    theme: &Theme,
    config: &LayoutConfig,
) {
    let estimated = text.len() as i32 * config.char_width;
    let centered = x + (config.pipeline_width - estimated) / 2;
    group.push_str(&format!(
        "<text x=\"{centered}\" y=\"{y}\" fill=\"{}\" class=\"draggable\" style=\"font-family:{};\">{}</text>",
        theme.text_color,
        theme.font_family,
        escape_xml(text)
    ));
}

/// The technology icon row along the bottom of the box. A repeat of the
/// previous icon becomes a red counter on it instead of a new image; once
/// the row is full the remaining tasks collapse into a single `+n` badge.
/// Pipelines that publish artifacts get the artifact icon at the row's
/// right edge.
fn push_task_row(group: &mut String, node: &NodeLayout, theme: &Theme, config: &LayoutConfig) {
    let x = node.pos.x;
    let row_y = node.pos.y + config.task_row_offset;
    let mut draw_index: i32 = 0;
    let mut dupe_count = 2;
    let mut overflow = 0;

    for (index, task) in node.tasks.iter().enumerate() {
        let icon = icon_path(task);
        if index != 0 && icon_path(&node.tasks[index - 1]) == icon {
            group.push_str(&format!(
                "<circle cx=\"{}\" cy=\"{row_y}\" r=\"10\" fill=\"{}\" class=\"draggable\"/>",
                x + 10 + 30 + 50 * (draw_index - 1),
                theme.counter_fill
            ));
            group.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" fill=\"{}\" class=\"draggable\" style=\"font-family:{};\">{dupe_count}</text>",
                x + 10 + 26 + 50 * (draw_index - 1),
                row_y + 5,
                theme.counter_text_color,
                theme.font_family
            ));
            dupe_count += 1;
        } else if (draw_index as usize) < config.max_task_icons
            || (overflow == 0 && index == node.tasks.len() - 1)
        {
            dupe_count = 2;
            group.push_str(&image_svg(
                icon,
                x + 10 + 50 * draw_index,
                row_y,
                config.icon_size,
            ));
            draw_index += 1;
        } else {
            overflow += 1;
            group.push_str(&format!(
                "<circle cx=\"{}\" cy=\"{}\" r=\"15\" fill=\"{}\" class=\"draggable\"/>",
                x + 10 + 15 + 50 * draw_index,
                row_y + 15,
                theme.counter_fill
            ));
            group.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" fill=\"{}\" class=\"draggable\" style=\"font-family:{};\">+{overflow}</text>",
                x + 10 + 5 + 50 * draw_index,
                row_y + 15 + 5,
                theme.counter_text_color,
                theme.font_family
            ));
        }
    }

    if !node.artifacts.is_empty() {
        group.push_str(&image_svg(
            "resources/artifact.png",
            x + config.pipeline_width - config.icon_size - config.icon_margin,
            row_y,
            config.icon_size,
        ));
    }
}

fn icon_path(task: &str) -> &'static str {
    match task.to_ascii_lowercase().as_str() {
        "python" => "resources/python.png",
        "java" => "resources/java.png",
        "c++" => "resources/c++.png",
        "javascript" => "resources/javascript.png",
        ".net" | "dotnet" => "resources/dotnet.png",
        "node" => "resources/node.png",
        "powershell" => "resources/powershell.png",
        "npm" => "resources/npm.png",
        "artifact" => "resources/artifact.png",
        _ => "resources/defaulttech.png",
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(3000.0, 3000.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

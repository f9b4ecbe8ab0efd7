use std::io::Write;
use std::path::{Path, PathBuf};

use vsmgen::layout::types::ElementId;
use vsmgen::parser::{Manifest, load_manifest, load_pipelines};
use vsmgen::{LayoutConfig, Point, Theme, compute_layout, render_svg};

fn fixture_path(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .display()
        .to_string()
}

fn fixture_manifest() -> Manifest {
    Manifest {
        pipelines: vec![
            ("Build".to_string(), fixture_path("build.yml")),
            ("Test".to_string(), fixture_path("test.yml")),
            ("Package".to_string(), fixture_path("package.yml")),
            ("Deploy".to_string(), fixture_path("deploy.yml")),
        ],
    }
}

#[test]
fn manifest_round_trips_through_json() {
    let mut file = tempfile::NamedTempFile::new().expect("temp manifest");
    write!(
        file,
        r#"{{"pipelines": [["Build", "pipelines/build.yml"], ["Test", "pipelines/test.yml"]]}}"#
    )
    .expect("write manifest");

    let manifest = load_manifest(file.path()).expect("load manifest");
    assert_eq!(manifest.pipelines.len(), 2);
    assert_eq!(manifest.pipelines[0].0, "Build");
    assert_eq!(manifest.pipelines[1].1, "pipelines/test.yml");
}

#[test]
fn fixtures_parse_with_expected_attributes() {
    let pipelines = load_pipelines(&fixture_manifest());
    assert_eq!(pipelines.len(), 4);

    let build = &pipelines[0];
    assert_eq!(build.name, "Build");
    assert_eq!(build.os.as_deref(), Some("ubuntu-latest"));
    assert_eq!(build.trigger.as_deref(), Some("main"));
    assert_eq!(build.tasks, ["Python", "Python"]);
    assert_eq!(build.artifacts, ["dist/"]);

    let test = &pipelines[1];
    assert_eq!(test.dependencies.len(), 1);
    assert_eq!(test.dependencies[0].name, "Build");
    assert_eq!(test.tasks, [".NET", "Powershell"]);

    let package = &pipelines[2];
    assert_eq!(package.trigger.as_deref(), Some("0 15 * * Fri"));
    assert_eq!(package.tasks, ["npm"]);

    let deploy = &pipelines[3];
    assert_eq!(deploy.dependencies[0].name, "Release");
}

#[test]
fn fixture_set_lays_out_deterministically() {
    let config = LayoutConfig::default();
    let layout = compute_layout(load_pipelines(&fixture_manifest()), &config).unwrap();

    let pos = |name: &str| {
        layout
            .nodes
            .iter()
            .find(|n| n.name == name)
            .map(|n| n.pos)
            .unwrap_or_else(|| panic!("{name} missing from layout"))
    };

    // Build's dependents share the second column; the row band recenters
    // everything on it, including Deploy, which sits on the same column
    // behind the Release placeholder.
    assert_eq!(pos("Build"), Point::new(50, 250));
    assert_eq!(pos("Package"), Point::new(400, 125));
    assert_eq!(pos("Test"), Point::new(400, 250));
    assert_eq!(pos("Deploy"), Point::new(400, 375));
    assert_eq!(pos("Release"), Point::new(50, 200));

    let release = layout.nodes.iter().find(|n| n.name == "Release").unwrap();
    assert!(release.placeholder);
    assert!(!release.hidden);
    assert_eq!(
        release.trigger.as_deref(),
        Some("Dependent pipeline Release not found")
    );

    assert_eq!(layout.edges.len(), 3);
    assert_eq!(layout.width, 3000);
    assert_eq!(layout.height, 3000);
}

#[test]
fn all_final_positions_are_pairwise_distinct() {
    let config = LayoutConfig::default();
    let layout = compute_layout(load_pipelines(&fixture_manifest()), &config).unwrap();
    for (i, a) in layout.nodes.iter().enumerate() {
        for b in &layout.nodes[i + 1..] {
            assert_ne!(a.pos, b.pos, "{} and {} share a position", a.name, b.name);
        }
    }
}

#[test]
fn emitted_svg_ids_round_trip_through_the_id_grammar() {
    let config = LayoutConfig::default();
    let layout = compute_layout(load_pipelines(&fixture_manifest()), &config).unwrap();
    let svg = render_svg(&layout, &Theme::classic(), &config);

    let mut seen = 0;
    for chunk in svg.split("id=\"").skip(1) {
        let id = chunk.split('"').next().unwrap_or("");
        if !id.starts_with("rect_") && !id.starts_with("post_rect_") {
            continue;
        }
        let parsed: ElementId = id.parse().unwrap_or_else(|err| {
            panic!("id {id:?} does not parse: {err}");
        });
        assert_eq!(parsed.to_string(), id);
        seen += 1;
    }
    // 5 rects + 3 edges * (2 segments + 1 arrow).
    assert_eq!(seen, 14);
}

#[test]
fn missing_definition_file_renders_a_file_error_box() {
    let manifest = Manifest {
        pipelines: vec![(
            "Ghost".to_string(),
            "pipelines/does-not-exist.yml".to_string(),
        )],
    };
    let config = LayoutConfig::default();
    let pipelines = load_pipelines(&manifest);
    let layout = compute_layout(pipelines, &config).unwrap();
    let svg = render_svg(&layout, &Theme::classic(), &config);

    // The message is too wide for one line and wraps to the known three.
    assert!(svg.contains(">File Error</text>"));
    assert!(svg.contains("for:</text>"));
    assert!(svg.contains("pipelines/does-not-exist.yml"));
}

#[test]
fn layout_dump_matches_the_svg_ids() {
    let config = LayoutConfig::default();
    let layout = compute_layout(load_pipelines(&fixture_manifest()), &config).unwrap();

    let dir = tempfile::tempdir().expect("temp dir");
    let dump_path: PathBuf = dir.path().join("layout.json");
    vsmgen::layout_dump::write_layout_dump(&dump_path, &layout).expect("write dump");

    let raw = std::fs::read_to_string(&dump_path).expect("read dump");
    let dump: serde_json::Value = serde_json::from_str(&raw).expect("parse dump");
    assert_eq!(dump["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(dump["nodes"][0]["id"], "rect_50_250");
    assert_eq!(dump["width"], 3000);
}

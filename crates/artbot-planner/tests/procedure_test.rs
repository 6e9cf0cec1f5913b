use artbot_core::{ArtEncoding, Artpiece, ArtpieceId, BacterialColor, Pixel, SubmissionStatus};
use artbot_planner::{
    LabwareSelection, LabwareSpec, NotebookRenderer, PlanJsonRenderer, ProcedureAssembler,
    ProcedurePlan, ProcedureRenderer, PythonTemplateRenderer, TemplateToken,
};
use chrono::{TimeZone, Utc};

fn artpiece(id: i64, slug: &str, art: &str) -> Artpiece {
    Artpiece {
        id: ArtpieceId(id),
        title: format!("Title {}", id),
        slug: slug.to_string(),
        submit_date: Utc.with_ymd_and_hms(2023, 11, 2, 9, 30, 0).unwrap(),
        status: SubmissionStatus::Submitted,
        confirmed: true,
        art: ArtEncoding::from_json(art).unwrap(),
    }
}

fn plan(pipette: &str) -> ProcedurePlan {
    let labware = LabwareSpec::resolve(&LabwareSelection {
        palette: "corning_96_wellplate_360ul_flat".to_string(),
        pipette: pipette.to_string(),
    })
    .unwrap();
    let colors = vec![
        BacterialColor::new(1, "Sunset Orange"),
        BacterialColor::new(2, "Ocean Blue"),
    ];
    ProcedureAssembler::new(labware)
        .assemble(
            &[
                artpiece(1, "abc", r#"{"1": [[0, 0], [0, 1], [1, 0]]}"#),
                artpiece(2, "tree", r#"{"2": [3, 3], "1": [[2, 2]]}"#),
            ],
            &colors,
        )
        .unwrap()
}

#[test]
fn test_python_protocol_has_all_values() {
    let plan = plan("p10_single");
    let text = PythonTemplateRenderer::new().render(&plan).unwrap();

    for token in TemplateToken::ALL {
        assert!(!text.contains(token.marker()), "{} left in output", token.marker());
    }
    assert!(text.contains("load_labware('opentrons_96_tiprack_10ul', 10)"));
    assert!(text.contains("load_labware('corning_96_wellplate_360ul_flat', 11)"));
    assert!(text.contains("load_instrument('p10_single'"));
    assert!(text.contains("CANVAS_LOCATIONS = {'abc': '1', 'tree': '2'}"));
    assert!(text.contains("COLOR_MAP = {'1': 'Sunset Orange', '2': 'Ocean Blue'}"));
    assert!(text.contains("PIXELS_BY_COLOR_BY_ARTPIECE = {'1': {'abc': [(-1.5, 1.0), "));
    assert!(text.contains("'tree': [("));
}

#[test]
fn test_high_volume_pipette_gets_large_tips() {
    let text = PythonTemplateRenderer::new()
        .render(&plan("p300_single"))
        .unwrap();
    assert!(text.contains("opentrons_96_tiprack_200ul"));
}

#[test]
fn test_custom_template() {
    let template = TemplateToken::ALL
        .iter()
        .map(|t| format!("{} = {}", t.marker().trim_matches('%'), t.marker()))
        .collect::<Vec<_>>()
        .join("\n");
    let renderer = PythonTemplateRenderer::with_template(template).unwrap();
    let text = renderer.render(&plan("p10_single")).unwrap();
    assert!(text.starts_with("PALETTE GOES HERE = corning_96_wellplate_360ul_flat\n"));
    assert!(text.contains("COLORS GO HERE = {'1': 'Sunset Orange', '2': 'Ocean Blue'}"));
}

#[test]
fn test_notebook_is_valid_json_with_protocol_cell() {
    let renderer = NotebookRenderer::new();
    assert_eq!(renderer.extension(), "ipynb");

    let text = renderer.render(&plan("p10_single")).unwrap();
    let notebook: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(notebook["nbformat"], 4);

    let cells = notebook["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 3);
    assert_eq!(cells[0]["cell_type"], "markdown");

    let summary: String = cells[0]["source"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|l| l.as_str())
        .collect();
    assert!(summary.contains("| 2 | `tree` | Title 2 |"));
    assert!(summary.contains("- Sunset Orange -> A1"));

    let protocol: String = cells[1]["source"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|l| l.as_str())
        .collect();
    assert_eq!(
        protocol,
        PythonTemplateRenderer::new()
            .render(&plan("p10_single"))
            .unwrap()
    );
}

#[test]
fn test_json_plan_round_trips() {
    let plan = plan("p10_single");
    let text = PlanJsonRenderer.render(&plan).unwrap();
    let back: ProcedurePlan = serde_json::from_str(&text).unwrap();
    assert_eq!(back, plan);
    assert_eq!(back.palette_wells.len(), 2);
}

#[test]
fn test_single_pixel_color_renders_as_list() {
    let plan = plan("p10_single");
    let tree_blue = &plan.pixels_by_color[&artbot_core::ColorId::from("2")]["tree"];
    assert_eq!(tree_blue.len(), 1);
    assert_eq!(
        tree_blue[0],
        artbot_planner::CoordinateMapper::default().map(Pixel::new(3, 3))
    );
}

#[test]
fn test_color_buckets_follow_submission_order() {
    let labware = LabwareSpec::resolve(&LabwareSelection::default()).unwrap();
    let colors: Vec<BacterialColor> = [2, 9, 10]
        .iter()
        .map(|&id| BacterialColor::new(id, format!("c{}", id)))
        .collect();
    let plan = ProcedureAssembler::new(labware)
        .assemble(
            &[artpiece(
                1,
                "order",
                r#"{"9": [[1, 1]], "10": [[2, 2]], "2": [[3, 3]]}"#,
            )],
            &colors,
        )
        .unwrap();

    let buckets: Vec<&str> = plan.pixels_by_color.keys().map(|c| c.as_str()).collect();
    assert_eq!(buckets, vec!["9", "10", "2"]);
    assert_eq!(
        plan.palette_instructions(),
        vec!["c9 -> A1", "c10 -> B1", "c2 -> C1"]
    );
}

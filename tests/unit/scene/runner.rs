use super::*;

const SCRIPT: &str = r#"{
  "opts": { "width": 32, "height": 32 },
  "images": {
    "dot": { "source": { "kind": "solid", "width": 2, "height": 2, "color": [255, 0, 0, 255] } }
  },
  "textures": {
    "green": { "source": { "kind": "pixels", "width": 1, "height": 1, "data": [[0, 255, 0, 255]] } }
  },
  "frames": [
    { "commands": [
      { "op": "draw", "topology": "triangles", "vertices": [
        { "position": [-0.5, -0.5, 0.0], "color": [1.0, 1.0, 1.0, 1.0] },
        { "position": [0.5, -0.5, 0.0] },
        { "position": [0.0, 0.5, 0.0] }
      ] },
      { "op": "blit", "image": "dot", "transform": { "position": [1, 1] } }
    ], "repeat": 2 },
    { "commands": [
      { "op": "enable", "cap": "texture_2d" },
      { "op": "bind_texture", "texture": "green" },
      { "op": "draw", "topology": "triangles", "vertices": [
        { "position": [-0.5, -0.5, 0.0] },
        { "position": [0.5, -0.5, 0.0] },
        { "position": [0.0, 0.5, 0.0] }
      ] }
    ] }
  ]
}"#;

#[test]
fn script_frames_present_in_order() {
    let script = SceneScript::from_json_str(SCRIPT).unwrap();
    assert_eq!(script.frame_count(), 3);
    let mut runner = SceneRunner::new(script).unwrap();
    let mut centers = Vec::new();
    let stats = runner
        .run(|_, ctx| {
            centers.push(ctx.frame().pixel(16, 16));
            Ok(())
        })
        .unwrap();

    assert_eq!(stats.len(), 3);
    assert_eq!(stats[0].current_calls, 2);
    assert_eq!(stats[1].first_mismatch, None);
    assert_eq!(stats[1].pixel_writes, 0);
    assert_eq!(stats[2].first_mismatch, Some(0));
    assert_eq!(centers[0], [255, 255, 255, 255]);
    assert_eq!(centers[2], [0, 255, 0, 255]);
    assert_eq!(runner.context().frame().pixel(1, 1), [0, 0, 0, 255]);
}

#[test]
fn unknown_references_fail_validation() {
    let bad = r#"{ "frames": [ { "commands": [ { "op": "blit", "image": "nope" } ] } ] }"#;
    assert!(matches!(
        SceneScript::from_json_str(bad),
        Err(SoftGlError::Validation(_))
    ));
    let bad = r#"{ "frames": [ { "commands": [
        { "op": "draw", "topology": "triangles", "vertices": [ { "position": [0, 0, 0] } ] }
    ] } ] }"#;
    assert!(SceneScript::from_json_str(bad).is_err());
}

#[test]
fn unbalanced_pop_is_an_error_not_a_panic() {
    let script = SceneScript::from_json_str(
        r#"{ "opts": { "width": 4, "height": 4 }, "frames": [ { "commands": [ { "op": "pop_matrix" } ] } ] }"#,
    )
    .unwrap();
    let mut runner = SceneRunner::new(script).unwrap();
    assert!(runner.run(|_, _| Ok(())).is_err());
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        SceneScript::from_json_str("{"),
        Err(SoftGlError::Serde(_))
    ));
}

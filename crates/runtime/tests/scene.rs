use std::path::Path;

use runtime::SceneConfig;

#[test]
fn parse_octree_scene() {
    let scene = SceneConfig::from_path(Path::new("tests/data/octree.json")).unwrap();
    assert_eq!(scene.dims, 3);
    assert_eq!(scene.level, 3);
    let (min, max) = scene.domain::<3>().unwrap();
    assert_eq!(min, [-32.0; 3]);
    assert_eq!(max, [32.0, 32.0, 16.0]);
    // Omitted fields fall back to defaults.
    assert_eq!(scene.dt, SceneConfig::default().dt);
}

#[test]
fn run_quadtree_scene() {
    let scene = SceneConfig::from_path(Path::new("tests/data/quadtree.json")).unwrap();
    let summary = runtime::run(&scene).unwrap();
    assert_eq!(summary.dims, 2);
    assert_eq!(summary.steps, 30);
    assert!(summary.agents <= 150);
    assert!(summary.contacts <= summary.candidates);
    assert!(summary.allocated_cells > 0);
}

#[test]
fn run_octree_scene() {
    let scene = SceneConfig::from_path(Path::new("tests/data/octree.json")).unwrap();
    let summary = runtime::run(&scene).unwrap();
    assert_eq!(summary.dims, 3);
    assert!(summary.contacts <= summary.candidates);
}

#[test]
fn reject_unsupported_dims() {
    let err = SceneConfig::from_path(Path::new("tests/data/bad_dims.json")).unwrap_err();
    assert!(format!("{err:#}").contains("dims"));
}

#[test]
fn reject_unknown_field() {
    assert!(SceneConfig::from_path(Path::new("tests/data/typo.json")).is_err());
}

#[test]
fn missing_file_names_the_path() {
    let err = SceneConfig::from_path(Path::new("tests/data/nope.json")).unwrap_err();
    assert!(format!("{err:#}").contains("nope.json"));
}

use lintree::morton::{self, locate};
use lintree::{Aabb, SpaceConfig, TreeError};

fn quad(level: u32) -> SpaceConfig<2> {
    SpaceConfig::new(level, [0.0, 0.0], [100.0, 100.0]).unwrap()
}

#[test]
fn box_inside_one_finest_cell_resolves_to_finest_level() {
    let cfg = quad(3);
    let bounds = Aabb::new([26.0, 51.0], [36.0, 61.0]).unwrap();
    let loc = locate(&cfg, &bounds).unwrap();
    assert_eq!(loc.level, 3);
    // Grid cell (2, 4).
    assert_eq!(loc.morton, morton::encode_point([2, 4]));
    assert_eq!(loc.index, morton::level_offset::<2>(3) + loc.morton as usize);
}

#[test]
fn box_spanning_domain_resolves_to_root() {
    let cfg = quad(3);
    let whole = cfg.domain();
    let loc = locate(&cfg, &whole).unwrap();
    assert_eq!((loc.level, loc.morton, loc.index), (0, 0, 0));

    let oct = SpaceConfig::new(4, [-5.0; 3], [5.0; 3]).unwrap();
    let loc = locate(&oct, &Aabb::new([-4.0; 3], [4.0; 3]).unwrap()).unwrap();
    assert_eq!(loc.level, 0);
}

#[test]
fn box_on_divider_resolves_to_coarser_cell() {
    let cfg = quad(3);
    // Max corner sits exactly on the x = 50 divider of the root.
    let bounds = Aabb::new([40.0, 10.0], [50.0, 20.0]).unwrap();
    let first = locate(&cfg, &bounds).unwrap();
    assert_eq!(first.index, 0);
    for _ in 0..16 {
        assert_eq!(locate(&cfg, &bounds).unwrap(), first);
    }

    // A divider between two finest cells inside one quadrant lifts the box
    // one level, not into either neighbour.
    let on_fine = Aabb::new([5.0, 5.0], [12.5, 10.0]).unwrap();
    let loc = locate(&cfg, &on_fine).unwrap();
    assert_eq!(loc.level, 2);
    let left = locate(&cfg, &Aabb::new([5.0, 5.0], [12.4, 10.0]).unwrap()).unwrap();
    let right = locate(&cfg, &Aabb::new([12.5, 5.0], [20.0, 10.0]).unwrap()).unwrap();
    assert_eq!(left.level, 3);
    assert_eq!(right.level, 3);
    assert_ne!(loc.index, left.index);
    assert_ne!(loc.index, right.index);
    assert!(morton::is_ancestor_or_self::<2>(loc.index, left.index));
    assert!(morton::is_ancestor_or_self::<2>(loc.index, right.index));
}

#[test]
fn owning_cell_contains_the_box() {
    let cfg = SpaceConfig::new(4, [0.0; 3], [16.0; 3]).unwrap();
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..500 {
        let min = [rng.f32() * 15.0, rng.f32() * 15.0, rng.f32() * 15.0];
        let max = [
            min[0] + rng.f32() * (16.0 - min[0]),
            min[1] + rng.f32() * (16.0 - min[1]),
            min[2] + rng.f32() * (16.0 - min[2]),
        ];
        let bounds = Aabb::new(min, max).unwrap();
        let loc = locate(&cfg, &bounds).unwrap();
        let cell = morton::cell_bounds(&cfg, loc.index).unwrap();
        assert!(cell.contains(&bounds), "{bounds:?} not inside {cell:?}");
    }
}

#[test]
fn offset_origin_is_honoured() {
    let cfg = SpaceConfig::new(2, [-100.0, -100.0], [-60.0, -60.0]).unwrap();
    let loc = locate(&cfg, &Aabb::new([-99.0, -61.0], [-91.0, -60.0]).unwrap()).unwrap();
    assert_eq!(loc.level, 2);
    assert_eq!(loc.morton, morton::encode_point([0, 3]));
}

#[test]
fn boxes_outside_domain_are_rejected() {
    let cfg = quad(3);
    let cases = [
        ([-1.0, 0.0], [5.0, 5.0]),
        ([95.0, 95.0], [100.5, 99.0]),
        ([200.0, 200.0], [300.0, 300.0]),
    ];
    for (min, max) in cases {
        let bounds = Aabb::new(min, max).unwrap();
        assert_eq!(locate(&cfg, &bounds), Err(TreeError::OutOfDomain));
    }
}

#[test]
fn root_only_tree_puts_everything_in_the_root() {
    let cfg = quad(0);
    let loc = locate(&cfg, &Aabb::new([1.0, 1.0], [2.0, 2.0]).unwrap()).unwrap();
    assert_eq!(loc.index, 0);
    assert_eq!(cfg.cell_count(), 1);
}

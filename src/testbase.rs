//! Common utilities shared by unit tests.

use crate::aabb::{Aabb, Bounded};
use crate::bvh::{Bvh, BvhBuildConfig};
use crate::frustum::{Containment, Frustum};
use crate::object::{BvhHook, BvhObject};
use crate::ray::Ray;
use crate::stats;
use crate::{Matrix4, Point3, Real, Vector3};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// A vector represented as a tuple.
pub type TupleVec = (f32, f32, f32);

/// Generate a [`TupleVec`] for [`proptest::strategy::Strategy`] from -10e10
/// to 10e10. A small enough range to prevent most fp32 errors from breaking
/// certain tests.
pub fn tuplevec_small_strategy() -> impl Strategy<Value = TupleVec> {
    (
        -10e10_f32..10e10_f32,
        -10e10_f32..10e10_f32,
        -10e10_f32..10e10_f32,
    )
}

/// Convert a [`TupleVec`] to a [`Point3`].
pub fn tuple_to_point(tpl: &TupleVec) -> Point3 {
    Point3::new(tpl.0, tpl.1, tpl.2)
}

/// Convert a [`TupleVec`] to a [`Vector3`].
pub fn tuple_to_vector(tpl: &TupleVec) -> Vector3 {
    Vector3::new(tpl.0, tpl.1, tpl.2)
}

/// Shorthand [`Aabb`] constructor for fixtures.
pub fn aabb(min: TupleVec, max: TupleVec) -> Aabb {
    Aabb::with_bounds(tuple_to_point(&min), tuple_to_point(&max))
}

/// Scene object used by the tests.
#[derive(Debug)]
pub struct Prop {
    pub id: u32,
    pub bv: Aabb,
    pub hook: BvhHook,
}

impl Prop {
    pub fn new(id: u32, bv: Aabb) -> Prop {
        Prop {
            id,
            bv,
            hook: BvhHook::default(),
        }
    }
}

impl Bounded for Prop {
    fn aabb(&self) -> Aabb {
        self.bv
    }
}

impl BvhObject for Prop {
    fn id(&self) -> u32 {
        self.id
    }

    fn hook(&self) -> &BvhHook {
        &self.hook
    }

    fn hook_mut(&mut self) -> &mut BvhHook {
        &mut self.hook
    }
}

/// Wraps the given volumes in [`Prop`]s, ids assigned by position.
pub fn props_from_aabbs(bvs: &[Aabb]) -> Vec<Prop> {
    bvs.iter()
        .enumerate()
        .map(|(index, bv)| Prop::new(index as u32, *bv))
        .collect()
}

/// Returns `props` in a seed-determined order. Ids travel with the objects,
/// so this permutes insertion order without renaming anything.
pub fn shuffled(mut props: Vec<Prop>, seed: u64) -> Vec<Prop> {
    use rand::SeedableRng;
    let mut rng = StdRng::seed_from_u64(seed);
    props.shuffle(&mut rng);
    props
}

/// Config used by the top-down scene tests.
pub const TOP_DOWN_CONFIG: BvhBuildConfig = BvhBuildConfig {
    max_depth: u32::MAX,
    min_objects: 20,
    min_volume: 250.0,
};

/// Config used by the incremental scene tests.
pub const INSERT_CONFIG: BvhBuildConfig = BvhBuildConfig {
    max_depth: 100,
    min_objects: 1,
    min_volume: 10.0 * 10.0 * 10.0,
};

/// Config used by the grid fixture, keeping its unit boxes one per leaf.
pub const GRID_INSERT_CONFIG: BvhBuildConfig = BvhBuildConfig {
    max_depth: 100,
    min_objects: 1,
    min_volume: 1.0,
};

/// Ten unit-depth boxes in the z = [0, 1] slab, arranged as a small 2-D
/// scene for the picking tests.
pub fn grid_scene() -> Vec<Aabb> {
    vec![
        aabb((1.0, 3.0, 0.0), (3.0, 5.0, 1.0)),   // 0
        aabb((4.0, 1.0, 0.0), (6.0, 7.0, 1.0)),   // 1
        aabb((6.0, 6.0, 0.0), (7.0, 7.0, 1.0)),   // 2
        aabb((6.0, 5.0, 0.0), (7.0, 6.0, 1.0)),   // 3
        aabb((6.0, 4.0, 0.0), (7.0, 5.0, 1.0)),   // 4
        aabb((6.0, 3.0, 0.0), (7.0, 4.0, 1.0)),   // 5
        aabb((6.0, 2.0, 0.0), (7.0, 3.0, 1.0)),   // 6
        aabb((6.0, 1.0, 0.0), (7.0, 2.0, 1.0)),   // 7
        aabb((8.0, 3.0, 0.0), (9.0, 5.0, 1.0)),   // 8
        aabb((9.0, 3.0, 0.0), (10.0, 5.0, 1.0)),  // 9
    ]
}

/// Generates `count` randomly placed and sized boxes spread over roughly
/// [-100, 100] on every axis.
pub fn random_scene(count: usize, rng: &mut StdRng) -> Vec<Prop> {
    (0..count)
        .map(|index| {
            let center = Point3::new(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            );
            let half = Vector3::new(
                rng.gen_range(0.5..5.0),
                rng.gen_range(0.5..5.0),
                rng.gen_range(0.5..5.0),
            );
            Prop::new(index as u32, Aabb::with_bounds(center - half, center + half))
        })
        .collect()
}

/// A perspective camera frustum at `eye` looking towards `target`.
pub fn look_at_frustum(eye: Point3, target: Point3, near: Real, far: Real) -> Frustum {
    let view = Matrix4::look_at_rh(&eye, &target, &Vector3::new(0.0, 1.0, 0.0));
    let proj = Matrix4::new_perspective(1920.0 / 1080.0, 50.0_f32.to_radians(), near, far);
    Frustum::from_matrix(&(proj * view))
}

/// A ray between two points of the z = 0.5 plane, where it runs level with
/// the centers of the grid fixture's volumes.
pub fn flat_ray(from: (f32, f32), to: (f32, f32)) -> Ray {
    let origin = Point3::new(from.0, from.1, 0.5);
    let end = Point3::new(to.0, to.1, 0.5);
    Ray::new(origin, end - origin)
}

/// All object ids reachable from the root, in traversal order.
pub fn collect_ids(bvh: &Bvh, props: &[Prop]) -> Vec<u32> {
    let mut ids = Vec::new();
    bvh.traverse_level_order_objects(props, |prop: &Prop| ids.push(prop.id));
    ids
}

fn prop_with_id<'a>(props: &'a [Prop], id: u32) -> &'a Prop {
    props
        .iter()
        .find(|prop| prop.id == id)
        .expect("queried id should exist in the scene")
}

/// Asserts the tree's structural invariants and that every object of
/// `props` is reachable exactly once.
pub fn assert_proper_bvh(bvh: &Bvh, props: &[Prop]) {
    assert!(bvh.is_consistent(props), "bvh invariants violated");

    let ids = collect_ids(bvh, props);
    let mut seen = HashSet::new();
    for id in &ids {
        assert!(seen.insert(*id), "object {id} found twice in the tree");
    }
    for prop in props {
        assert!(seen.contains(&prop.id), "object {} not found in the tree", prop.id);
    }

    bvh.traverse_level_order(|id| {
        let count = bvh.leaf_object_count(id, props);
        if bvh.node(id).is_leaf() {
            assert!(count > 0, "leaf nodes should contain objects");
        } else {
            assert_eq!(count, 0, "internal nodes should not contain objects");
        }
    });
}

/// Places a camera at random positions and directions. The visible set must
/// match the brute-force set, and the classification counts must show the
/// tree actually pruning.
pub fn test_scene_random_frustums(bvh: &Bvh, props: &[Prop], positions: usize, rng: &mut StdRng) {
    let mut average_tests = 0.0_f32;
    for _ in 0..positions {
        let eye = Point3::new(
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
        );
        let target = Point3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        );
        let frustum = look_at_frustum(eye, target, 0.01, 1000.0);

        // Brute force: one classification per object.
        stats::reset();
        let visible_bf: HashSet<u32> = props
            .iter()
            .filter(|prop| frustum.classify(&prop.bv) != Containment::Outside)
            .map(|prop| prop.id)
            .collect();
        assert_eq!(stats::frustum_vs_aabb(), props.len());

        // Hierarchy query.
        stats::reset();
        let visible = bvh.query(&frustum, props);
        let tests = stats::frustum_vs_aabb();

        let visible_set: HashSet<u32> = visible.iter().copied().collect();
        assert_eq!(visible_set.len(), visible.len(), "duplicate ids emitted");
        assert_eq!(
            visible_set, visible_bf,
            "query disagrees with brute force for eye {eye}, target {target}"
        );

        assert!(tests > 0, "at least the root must be classified");
        assert!(
            tests < props.len(),
            "too many frustum tests ({tests}) for eye {eye}, target {target}"
        );
        average_tests += tests as f32;
    }

    average_tests /= positions as f32;
    assert!(
        average_tests < props.len() as f32 / 4.0,
        "frustum queries average too many tests: {average_tests}"
    );
}

/// Casts random rays from far outside towards the scene. Hit sets and
/// closest parameters must match brute force; with `check_performance` the
/// test counts must show the tree pruning, and the closest-only mode must
/// test meaningfully fewer volumes than the full mode.
pub fn test_scene_random_rays(
    bvh: &Bvh,
    props: &[Prop],
    tries: usize,
    check_performance: bool,
    rng: &mut StdRng,
) {
    let mut average_full = 0.0_f32;
    let mut average_closest = 0.0_f32;

    let mut all_hits = Vec::new();
    let mut tested_nodes = Vec::new();

    for _ in 0..tries {
        let towards = Vector3::new(
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
        );
        let start = Point3::from(towards.normalize() * 2000.0);
        let target = Point3::new(
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
        );
        let ray = Ray::new(start, target - start);

        // Brute force: test every object.
        let mut smallest_t = Real::MAX;
        let mut closest_bf = None;
        let mut hits_bf = HashSet::new();
        for prop in props {
            let t = ray.intersection_t(&prop.bv);
            if t >= 0.0 {
                hits_bf.insert(prop.id);
                if t < smallest_t {
                    smallest_t = t;
                    closest_bf = Some(prop.id);
                }
            }
        }

        // Hierarchy query, full mode.
        stats::reset();
        let hit = bvh.query_debug(&ray, false, props, &mut all_hits, &mut tested_nodes);
        let full_tests = stats::ray_vs_aabb();

        assert_eq!(hit.is_some(), closest_bf.is_some());
        let full_t = hit.map(|id| ray.intersection_t(&prop_with_id(props, id).bv));
        if let Some(t) = full_t {
            // Same intersection routine over the same box: exact equality.
            assert_eq!(t, smallest_t, "closest hit differs from brute force");
        }

        let hits_set: HashSet<u32> = all_hits.iter().copied().collect();
        assert_eq!(hits_set, hits_bf, "hit set differs from brute force");

        assert!(full_tests > 0, "at least the root must be tested");
        if check_performance {
            assert!(
                full_tests < props.len(),
                "too many ray tests in full mode: {full_tests}"
            );
        }
        average_full += full_tests as f32;

        // Hierarchy query, closest-only mode.
        stats::reset();
        let hit_single = bvh.query_debug(&ray, true, props, &mut all_hits, &mut tested_nodes);
        let closest_tests = stats::ray_vs_aabb();
        average_closest += closest_tests as f32;

        let single_t = hit_single.map(|id| ray.intersection_t(&prop_with_id(props, id).bv));
        assert_eq!(single_t, full_t, "closest-only result differs from full result");
        if let Some(id) = hit_single {
            assert_eq!(all_hits, vec![id]);
        } else {
            assert!(all_hits.is_empty());
        }
    }

    if check_performance {
        average_full /= tries as f32;
        average_closest /= tries as f32;
        assert!(
            average_full < props.len() as f32,
            "ray queries average too many tests: {average_full}"
        );
        assert!(
            average_closest < average_full * 0.75,
            "closest-only mode does not prune enough: {average_closest} vs {average_full}"
        );
    }
}

use std::sync::Arc;

use algebra::{CoModule, Grading, StructureLine};
use coext::{resolution, Config, Resolution};
use fp::prime::ValidPrime;
use rstest::rstest;
use serde_json::json;

mod common;

fn resolve_ground_field(p: u32, stages: u32) -> Resolution {
    let p = ValidPrime::new(p);
    let a = common::exterior(p);
    let config = Config {
        prime: p,
        filtration_max: stages,
        grade_limit: Grading::new(4, 0),
        verify: true,
        ..Config::default()
    };
    resolution(Arc::new(CoModule::fp_module(a)), &config)
}

#[test]
fn first_stage_is_the_coalgebra() {
    let res = resolve_ground_field(2, 1);
    let d1 = &res.morphisms()[1];
    let f0 = d1.codomain();

    assert_eq!(f0.generators().len(), 1);
    assert_eq!(f0.dimension_in(Grading::ZERO), 1);
    assert_eq!(f0.dimension_in(Grading::new(1, 0)), 1);
    assert_eq!(f0.dimension(), 2);
    assert_eq!(d1.matrix()[&Grading::ZERO].to_vec(), vec![vec![1]]);
    assert_eq!(
        f0.coaction_terms(),
        CoModule::free_module(Arc::clone(f0.coalgebra()), Grading::ZERO, 0, "a").coaction_terms()
    );
}

#[rstest]
fn one_generator_per_stage(#[values(2, 3, 5, 7)] p: u32) {
    let res = resolve_ground_field(p, 4);
    res.verify().unwrap();
    assert_eq!(res.grading(), vec![vec![Grading::ZERO]; 4]);
    assert_eq!(res.graded_dimension_string(), "· \n· \n· \n· \n");

    let gens: Vec<_> = res
        .stages()
        .map(|module| module.generators()[0].grading)
        .collect();
    assert_eq!(
        gens,
        (0..4).map(|s| Grading::new(s, 0)).collect::<Vec<_>>()
    );
}

#[test]
fn structure_lines() {
    let res = resolve_ground_field(2, 3);
    let lines = res.structure_lines();
    assert!(lines[0].is_empty());
    assert_eq!(
        lines[1],
        vec![StructureLine {
            source: (Grading::ZERO, 0),
            target: (Grading::new(1, 0), 0),
            primitive: 0,
        }]
    );
    assert_eq!(
        lines[2],
        vec![StructureLine {
            source: (Grading::new(1, 0), 0),
            target: (Grading::new(2, 0), 0),
            primitive: 0,
        }]
    );
}

#[test]
fn display() {
    let res = resolve_ground_field(2, 3);
    let expected = [
        "Resolution:",
        "d_0 : 0 Elements | 0 Generators --> 1 Elements | 0 Generators | ",
        "d_1 : 1 Elements | 0 Generators --> 2 Elements | 1 Generators | 0, ",
        "d_2 : 2 Elements | 1 Generators --> 2 Elements | 1 Generators | 0, ",
        "d_3 : 2 Elements | 1 Generators --> 2 Elements | 1 Generators | 0, ",
        "",
        "0 --> F_2 --> A --> A --> A",
    ]
    .join("\n");
    assert_eq!(res.to_string(), expected);
}

#[test]
fn chart_json() {
    let res = resolve_ground_field(2, 2);
    assert_eq!(
        res.to_json(),
        json!({
            "prime": 2,
            "stages": [
                {
                    "generators": [[0, 0]],
                    "structure_lines": []
                },
                {
                    "generators": [[0, 0]],
                    "structure_lines": [
                        { "source": [0, 0], "target": [0, 1], "primitive": 0 }
                    ]
                }
            ]
        })
    );
}

/// Consecutive maps compose to zero, and within the grade limit the kernel of each map is exactly
/// the image of the previous one.
#[rstest]
fn exact(#[values(2, 3)] p: u32) {
    let res = resolve_ground_field(p, 4);
    let morphisms = res.morphisms();
    for pair in morphisms.windows(2) {
        let composite = &pair[1] * &pair[0];
        assert!(composite.matrix().values().all(|m| m.is_zero()));

        let module = pair[0].codomain();
        for grade in module.basis().sorted_grades_within(Grading::new(4, 0)) {
            let rank = |d: &algebra::Morphism| d.matrix().get(&grade).map_or(0, |m| m.rank());
            assert_eq!(
                rank(&pair[0]) + rank(&pair[1]),
                module.dimension_in(grade),
                "not exact at {grade}"
            );
        }
    }
}

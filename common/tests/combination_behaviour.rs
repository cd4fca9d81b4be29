//! Behaviour-driven coverage for combination generation and capping.

use std::cell::{Cell, RefCell};

mod support;

use regex::Regex;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::{StepList, StepText};
use tzshift_common::{
    Cap, CombinationPlan, ConfigError, Dimension, ResolvedDimension, Truncation, ValueSource,
    generate,
};

#[derive(Default)]
struct MatrixWorld {
    timezones: RefCell<Vec<String>>,
    locales: RefCell<Vec<String>>,
    cap: Cell<Option<i64>>,
    outcome: RefCell<Option<Result<CombinationPlan, ConfigError>>>,
}

impl MatrixWorld {
    fn plan(&self) -> CombinationPlan {
        match self.outcome.borrow().as_ref() {
            Some(Ok(plan)) => plan.clone(),
            Some(Err(error)) => panic!("generation should succeed: {error}"),
            None => panic!("combinations should have been generated"),
        }
    }
}

#[fixture]
fn world() -> MatrixWorld {
    MatrixWorld::default()
}

#[given("the timezones {values}")]
fn given_timezones(world: &MatrixWorld, values: StepList) {
    world.timezones.replace(values.into_inner());
}

#[given("the locales {values}")]
fn given_locales(world: &MatrixWorld, values: StepList) {
    world.locales.replace(values.into_inner());
}

#[given("a cap of {cap}")]
fn given_cap(world: &MatrixWorld, cap: i64) {
    world.cap.set(Some(cap));
}

#[when("the combinations are generated")]
fn when_generated(world: &MatrixWorld) {
    let cap = world
        .cap
        .get()
        .map(Cap::try_from)
        .unwrap_or_else(|| panic!("a cap must be configured"))
        .unwrap_or_else(|error| panic!("cap should be valid: {error}"));
    let resolved = [
        ResolvedDimension::new(
            Dimension::new("timezone", world.timezones.borrow().clone()),
            ValueSource::Default,
        ),
        ResolvedDimension::new(
            Dimension::new("locale", world.locales.borrow().clone()),
            ValueSource::Default,
        ),
    ];
    world.outcome.replace(Some(generate(&resolved, cap)));
}

#[then("there are {count} combinations")]
fn then_count(world: &MatrixWorld, count: usize) {
    let plan = world.plan();
    assert_eq!(plan.len(), count);
    let indices: Vec<usize> = plan.combinations().iter().map(|c| c.index()).collect();
    assert_eq!(indices, (0..count).collect::<Vec<_>>());
}

#[then("the identifiers are {expected}")]
fn then_identifiers(world: &MatrixWorld, expected: StepList) {
    let shape = Regex::new(r"^\s*\d+(\|[^|]+){2}$")
        .unwrap_or_else(|error| panic!("identifier pattern should compile: {error}"));
    let plan = world.plan();
    let ids: Vec<&str> = plan.ids().collect();

    for id in &ids {
        assert!(shape.is_match(id), "identifier `{id}` has an unexpected shape");
    }
    assert_eq!(ids, expected.into_inner());
}

#[then("no truncation is reported")]
fn then_no_truncation(world: &MatrixWorld) {
    assert_eq!(world.plan().truncation(), None);
}

#[then("truncation keeps {kept} of {total}")]
fn then_truncation(world: &MatrixWorld, kept: usize, total: usize) {
    assert_eq!(world.plan().truncation(), Some(Truncation { kept, total }));
}

#[then("generation fails for dimension {dimension}")]
fn then_generation_fails(world: &MatrixWorld, dimension: StepText) {
    let borrow = world.outcome.borrow();
    match borrow.as_ref() {
        Some(Err(ConfigError::EmptyDimension { dimension: actual })) => {
            assert_eq!(actual, &dimension.into_inner());
        }
        Some(Err(other)) => panic!("expected an empty-dimension error, got {other}"),
        Some(Ok(plan)) => panic!("expected generation to fail, got {} combinations", plan.len()),
        None => panic!("combinations should have been generated"),
    }
}

#[scenario("tests/features/combination_matrix.feature", index = 0)]
fn scenario_uncapped_product(world: MatrixWorld) {
    let _ = world;
}

#[scenario("tests/features/combination_matrix.feature", index = 1)]
fn scenario_capped_product(world: MatrixWorld) {
    let _ = world;
}

#[scenario("tests/features/combination_matrix.feature", index = 2)]
fn scenario_sentinel_collapse(world: MatrixWorld) {
    let _ = world;
}

#[scenario("tests/features/combination_matrix.feature", index = 3)]
fn scenario_empty_dimension(world: MatrixWorld) {
    let _ = world;
}

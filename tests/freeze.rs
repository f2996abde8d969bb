//! End-to-end tests against the process-wide registry.
//!
//! Every test here touches `uuid.uuid4`/`uuid.uuid1` on the shared registry,
//! including calls to the live factories, so they run one at a time.

use std::sync::{Mutex, MutexGuard, PoisonError};

use frozen_uuids::{
    freeze_uuids, global, uuid1, uuid4, with_frozen_uuids, FreezeError, Identifier,
    ModuleRegistry, Overrides,
};

static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}

fn next() -> String {
    uuid4().unwrap().to_string()
}

fn assert_live_uuid4() {
    let binding = global().attribute("uuid", "uuid4").unwrap();
    assert_eq!(binding.factory().name(), "uuid4");
    assert_ne!(uuid4().unwrap(), uuid4().unwrap());
}

#[test]
fn default_marker_freezes_to_zero() {
    let _serial = serial();
    let _frozen = freeze_uuids!().unwrap();
    assert_eq!(next(), "00000000-0000-0000-0000-000000000000");
}

#[test]
fn different_obj_path_and_version() {
    let _serial = serial();
    let _frozen = freeze_uuids!(obj_path = "uuid.uuid1", version = 1).unwrap();
    assert_eq!(uuid1().unwrap().to_string(), "00000000-0000-0000-0000-000000000000");
    // uuid4 is a different target and stays live.
    assert_ne!(uuid4().unwrap(), uuid4().unwrap());
}

#[test]
fn different_start_value() {
    let _serial = serial();
    let _frozen = freeze_uuids!(values = ["11111111-0000-0000-0000-000000000000"]).unwrap();
    assert_eq!(next(), "11111111-0000-0000-0000-000000000000");
}

#[test]
fn auto_increment_side_effect() {
    let _serial = serial();
    let _frozen = freeze_uuids!(side_effect = "auto_increment").unwrap();
    assert_eq!(next(), "00000000-0000-0000-0000-000000000000");
    assert_eq!(next(), "00000000-0000-0000-0000-000000000001");
    assert_eq!(next(), "00000000-0000-0000-0000-000000000002");
}

#[test]
fn cycle_side_effect() {
    let _serial = serial();
    let _frozen = freeze_uuids!(
        side_effect = "cycle",
        values = ["11111111-0000-0000-0000-000000000000", "22222222-0000-0000-0000-000000000000"],
    )
    .unwrap();
    assert_eq!(next(), "11111111-0000-0000-0000-000000000000");
    assert_eq!(next(), "22222222-0000-0000-0000-000000000000");
    assert_eq!(next(), "11111111-0000-0000-0000-000000000000");
    assert_eq!(next(), "22222222-0000-0000-0000-000000000000");
}

#[test]
fn values_side_effect_exhausts() {
    let _serial = serial();
    let _frozen = freeze_uuids!(
        side_effect = "values",
        values = ["11111111-0000-0000-0000-000000000000", "22222222-0000-0000-0000-000000000000"],
    )
    .unwrap();
    assert_eq!(next(), "11111111-0000-0000-0000-000000000000");
    assert_eq!(next(), "22222222-0000-0000-0000-000000000000");
    assert_eq!(uuid4(), Err(FreezeError::SequenceExhausted { drawn: 2 }));
}

#[test]
fn random_side_effect_with_default_seed() {
    let _serial = serial();
    let _frozen = freeze_uuids!(side_effect = "random").unwrap();
    assert_eq!(next(), "bdd640fb-0667-4ad1-9c80-317fa3b1799d");
    assert_eq!(next(), "23b8c1e9-3924-46de-beb1-3b9046685257");
}

#[test]
fn random_side_effect_with_different_seed() {
    let _serial = serial();
    let _frozen = freeze_uuids!(side_effect = "random", seed = 1337).unwrap();
    assert_eq!(next(), "b5bab1cd-8884-47a5-acef-e37b9e250d03");
    assert_eq!(next(), "bb5d75b8-95f6-48f2-922b-adb05da83cff");
}

#[test]
fn unknown_strategy_fails_before_patching() {
    let _serial = serial();
    let err = freeze_uuids!(side_effect = "foobar").err().unwrap();
    assert_eq!(err, FreezeError::UnknownStrategy("foobar".into()));
    assert!(err.is_configuration_error());
    assert_live_uuid4();
}

#[test]
fn unknown_argument_is_a_configuration_error() {
    let _serial = serial();
    let err = freeze_uuids!(cycle = false).err().unwrap();
    assert!(matches!(err, FreezeError::InvalidOverrides(_)));
    assert_live_uuid4();
}

#[test]
fn aliases_advance_one_shared_sequence() {
    let _serial = serial();
    let registry = global();
    registry.load_unit("shared_seq.views");
    registry.import_attribute("shared_seq.models", "uuid", "uuid4").unwrap();

    let frozen = freeze_uuids!().unwrap();
    let units: Vec<&str> = frozen.references().iter().map(|r| r.unit.as_str()).collect();
    assert!(units.contains(&"uuid"));
    assert!(units.contains(&"shared_seq.models"));
    assert!(!units.contains(&"shared_seq.views"));

    assert_eq!(registry.call("shared_seq.models", "uuid4").unwrap().as_u128(), 0);
    assert_eq!(registry.call("uuid", "uuid4").unwrap().as_u128(), 1);
    assert_eq!(registry.call("shared_seq.models", "uuid4").unwrap().as_u128(), 2);
    drop(frozen);

    assert_eq!(registry.attribute("shared_seq.models", "uuid4").unwrap().factory().name(), "uuid4");
    assert_live_uuid4();
}

#[test]
fn namespace_matching_nothing_leaves_everything_live() {
    let _serial = serial();
    let frozen = freeze_uuids!(namespace = "no_such_namespace_anywhere").unwrap();
    assert_eq!(frozen.patched_count(), 0);
    assert_live_uuid4();
    assert_ne!(uuid4().unwrap(), Identifier::NIL);
}

#[test]
fn originals_restored_after_panicking_test_body() {
    let _serial = serial();
    let outcome = std::panic::catch_unwind(|| {
        let _frozen = freeze_uuids!().unwrap();
        assert_eq!(next(), "00000000-0000-0000-0000-000000000000");
        panic!("assertion in test body failed");
    });
    assert!(outcome.is_err());
    assert_live_uuid4();
}

#[test]
fn with_frozen_uuids_scopes_the_patch() {
    let _serial = serial();
    let drawn = with_frozen_uuids(
        Overrides { side_effect: Some("random".into()), ..Overrides::default() },
        |handle| {
            assert_eq!(handle.config().seed, 42);
            next()
        },
    )
    .unwrap();
    assert_eq!(drawn, "bdd640fb-0667-4ad1-9c80-317fa3b1799d");
    assert_live_uuid4();
}

#[test]
fn with_frozen_uuids_rejects_bad_config_without_running_body() {
    let _serial = serial();
    let mut ran = false;
    let result = with_frozen_uuids(
        Overrides { values: Some(vec!["not-a-uuid".into()]), ..Overrides::default() },
        |_| ran = true,
    );
    assert!(matches!(result, Err(FreezeError::Format { .. })));
    assert!(!ran);
}

#[test]
fn nested_marker_on_same_target_is_rejected() {
    let _serial = serial();
    let _outer = freeze_uuids!().unwrap();
    let inner = freeze_uuids!(side_effect = "random").err().unwrap();
    assert_eq!(inner, FreezeError::ScopeAlreadyActive { target: "uuid.uuid4".into() });
    assert_eq!(next(), "00000000-0000-0000-0000-000000000000");
}

#[test]
fn nested_with_frozen_uuids_is_rejected_without_running_body() {
    let _serial = serial();
    let _outer = freeze_uuids!().unwrap();
    let mut ran = false;
    let result = with_frozen_uuids(Overrides::default(), |_| ran = true);
    assert!(matches!(result, Err(FreezeError::ScopeAlreadyActive { .. })));
    assert!(!ran);
}

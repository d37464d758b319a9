use mosaic::{
    driver::{Operation, Response},
    err, schema,
    stmt::{Id, Type, Value},
    Aggregate, AggregateProvider, Collection, Model, Record, Registry, Result,
};
use pretty_assertions::assert_eq;
use tests::{
    fixtures::{self, Computer, Processor, Ram, PROCESSORS, RAM_MODULES},
    DbTest,
};

use std::sync::Arc;

fn seed(test: &DbTest) -> Id {
    let id = Id::from_int(1);
    test.memory().insert(
        PROCESSORS,
        id.clone(),
        [("Maker", Value::from("Intel")), ("Speed", Value::from(500))],
    );
    test.memory()
        .insert(RAM_MODULES, id.clone(), [("Size", Value::from(2000))]);
    id
}

#[test]
fn reads_fields_across_records() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    let mut computer = provider.get_as::<Computer>(&id).unwrap();
    assert!(test.log().is_empty());

    assert_eq!(computer.maker().unwrap(), "Intel");
    assert_eq!(computer.processor_speed().unwrap(), 500);
    assert_eq!(computer.ram_size().unwrap(), 2000);

    assert_eq!(test.log().count_in(PROCESSORS), 2);
    assert_eq!(test.log().count_in(RAM_MODULES), 1);
}

#[test]
fn preload_batches_one_call_per_model() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    let mut computer = provider.get("Computer", &id).unwrap();
    computer
        .preload(&["Maker", "ProcessorSpeed", "RAMSize"])
        .unwrap();

    for _ in 0..3 {
        assert_eq!(computer.get("Maker").unwrap(), Value::from("Intel"));
    }
    assert_eq!(computer.get("RAMSize").unwrap(), Value::from(2000));

    assert_eq!(test.log().count_in(PROCESSORS), 1);
    assert_eq!(test.log().count_in(RAM_MODULES), 1);
    assert_eq!(test.log().names(), ["get_fields", "get_fields"]);
}

#[test]
fn preload_without_fields_loads_every_field() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    let mut computer = provider.get("Computer", &id).unwrap();
    computer.preload(&[]).unwrap();
    assert_eq!(test.log().names(), ["get_fields", "get_fields"]);

    let processor = computer.record(Processor::NAME).unwrap();
    assert!(processor.is_loaded("Maker"));
    assert!(processor.is_loaded("Speed"));
    assert!(!processor.is_loaded("RamId"));

    assert_eq!(computer.get("ProcessorSpeed").unwrap(), Value::from(500));
    assert_eq!(test.log().len(), 2);
}

#[test]
fn preload_unknown_field() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    let mut computer = provider.get("Computer", &id).unwrap();
    let err = computer.preload(&["Maker", "Colour"]).unwrap_err();

    assert!(err.is_unknown_field());
    assert!(test.log().is_empty());
}

#[test]
fn commit_writes_only_the_touched_record() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    let mut computer = provider.get_as::<Computer>(&id).unwrap();
    computer.set_ram_size(1).unwrap();
    assert!(test.log().is_empty());

    provider.save_as(&mut computer).unwrap();

    assert_eq!(test.log().names(), ["update_fields"]);
    assert_eq!(test.log().count_in(RAM_MODULES), 1);
    assert_eq!(test.log().count_in(PROCESSORS), 0);

    assert_eq!(
        test.memory().field(RAM_MODULES, &id, "Size"),
        Value::from(1)
    );
    assert_eq!(
        test.memory().field(PROCESSORS, &id, "Speed"),
        Value::from(500)
    );
}

#[test]
fn one_to_one_and_automatic_fields_write_back() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    let mut computer = provider.get("Computer", &id).unwrap();
    computer.set("Maker", "AMD").unwrap();
    computer.set("ProcessorSpeed", 800).unwrap();

    assert_eq!(computer.get("Maker").unwrap(), Value::from("AMD"));
    computer.commit().unwrap();

    assert_eq!(test.log().names(), ["update_fields"]);
    assert_eq!(
        test.memory().field(PROCESSORS, &id, "Maker"),
        Value::from("AMD")
    );
    assert_eq!(
        test.memory().field(PROCESSORS, &id, "Speed"),
        Value::from(800)
    );
}

#[test]
fn unknown_field() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    let mut computer = provider.get("Computer", &id).unwrap();

    let err = computer.get("Colour").unwrap_err();
    assert!(err.is_unknown_field());
    assert_eq!(err.to_string(), "unknown field `Computer.Colour`");

    let err = computer.set("Colour", "red").unwrap_err();
    assert!(err.is_unknown_field());
}

#[test]
fn set_checks_the_record_field_type() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    let mut computer = provider.get("Computer", &id).unwrap();
    let err = computer.set("RAMSize", "plenty").unwrap_err();

    assert!(err.is_type_conversion());
    assert!(!computer.record(Ram::NAME).unwrap().has_pending_writes());
}

#[test]
fn records_must_share_the_identifier() {
    let mut test = DbTest::new();
    let provider = test.setup(&mut fixtures::registry());

    let mapping = provider.registry().mapping("Computer").unwrap().clone();
    let shared: Arc<dyn AggregateProvider> = Arc::new(provider.clone());
    let models = provider.models();

    let err = Aggregate::new(
        mapping.clone(),
        shared.clone(),
        [
            models.get("Processor", Id::from_int(1)).unwrap(),
            models.get("Ram", Id::from_int(2)).unwrap(),
        ],
    )
    .unwrap_err();

    assert!(err.is_identity_mismatch());
    assert_eq!(
        err.to_string(),
        "identity mismatch: expected records with id 1, found 2"
    );

    let err = Aggregate::new(mapping, shared, []).unwrap_err();
    assert!(err.is_identity_mismatch());
}

#[test]
fn records_must_belong_to_the_aggregate() {
    let mut test = DbTest::new();
    let provider = test.setup(&mut fixtures::registry());

    let mapping = provider.registry().mapping("Memory").unwrap().clone();

    let err = Aggregate::new(
        mapping.clone(),
        Arc::new(provider.clone()),
        [provider.models().get("Processor", Id::from_int(1)).unwrap()],
    )
    .unwrap_err();
    assert!(err.is_unknown_model());

    let err = Aggregate::new(
        mapping,
        Arc::new(provider.clone()),
        [
            provider.models().get("Ram", Id::from_int(1)).unwrap(),
            provider.models().get("Ram", Id::from_int(1)).unwrap(),
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("more than one `Ram` record"));
}

#[test]
fn set_checks_every_target_before_writing() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let mut builder = fixtures::registry();
    builder.aggregate(
        schema::Aggregate::new("Bundle")
            .using(Processor::NAME)
            .using(Ram::NAME)
            .field("Tier", Type::I64),
        |mapping| {
            mapping
                .field("Tier")
                .from(|cx| cx.get(Processor::NAME, "Speed"))
                .to(Processor::NAME, "Speed")
                .with(|tier: i64| tier * 100)
                .to(Ram::NAME, "Size")
                .with(|tier: i64| format!("{tier}GB"));
        },
    );
    let provider = test.setup(&mut builder);

    let mut bundle = provider.get("Bundle", &id).unwrap();
    let err = bundle.set("Tier", 2).unwrap_err();
    assert!(err.is_type_conversion());

    let processor = bundle.record(Processor::NAME).unwrap();
    assert!(!processor.has_pending_writes());
    assert!(!processor.is_loaded("Speed"));

    bundle.commit().unwrap();
    assert!(test.log().is_empty());
}

#[test]
fn preload_skips_models_without_used_fields() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let mut builder = fixtures::registry();
    builder.aggregate(
        schema::Aggregate::new("Module")
            .using(Ram::NAME)
            .field("Size", Type::I64)
            .field("Kind", Type::String),
        |mapping| {
            mapping
                .field("Kind")
                .from(|_| Ok("dimm"))
                .using(Ram::NAME, Vec::<String>::new());
        },
    );
    let provider = test.setup(&mut builder);

    let mut module = provider.get("Module", &id).unwrap();
    module.set("Size", 1).unwrap();
    module.preload(&["Kind"]).unwrap();
    assert!(test.log().is_empty());

    assert_eq!(module.get("Size").unwrap(), Value::from(1));
    assert_eq!(module.get("Kind").unwrap(), Value::from("dimm"));
    assert!(test.log().is_empty());

    module.commit().unwrap();
    assert_eq!(
        test.memory().field(RAM_MODULES, &id, "Size"),
        Value::from(1)
    );
}

/// Rejects every operation.
#[derive(Debug)]
struct Unreachable;

impl Collection for Unreachable {
    fn exec(&self, op: Operation) -> Result<Response> {
        Err(err!("store unreachable: {}", op.name()))
    }
}

#[test]
fn commit_is_not_atomic_across_records() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    let registry = provider.registry();
    let ram_schema = registry.model(Ram::NAME).unwrap().clone();
    let ram = Record::new(id.clone(), ram_schema, Arc::new(Unreachable));
    let processor = provider.models().get("Processor", id.clone()).unwrap();

    let mut computer = Aggregate::new(
        registry.mapping("Computer").unwrap().clone(),
        Arc::new(provider.clone()),
        [processor, ram],
    )
    .unwrap();

    computer.set("ProcessorSpeed", 800).unwrap();
    computer.set("RAMSize", 1).unwrap();

    let err = computer.commit().unwrap_err();
    assert_eq!(err.to_string(), "store unreachable: update_fields");

    // The processor update went through before the RAM module failed.
    assert_eq!(
        test.memory().field(PROCESSORS, &id, "Speed"),
        Value::from(800)
    );
    assert_eq!(
        test.memory().field(RAM_MODULES, &id, "Size"),
        Value::from(2000)
    );
    let processor = computer.record(Processor::NAME).unwrap();
    assert!(!processor.has_pending_writes());
    let ram = computer.record(Ram::NAME).unwrap();
    assert!(ram.has_pending_writes());
}

#[test]
fn missing_record_is_unknown_model() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    // Only the processor half of a computer.
    let mut computer = Aggregate::new(
        provider.registry().mapping("Computer").unwrap().clone(),
        Arc::new(provider.clone()),
        [provider.models().get("Processor", id).unwrap()],
    )
    .unwrap();

    assert_eq!(computer.get("Maker").unwrap(), Value::from("Intel"));

    let err = computer.get("RAMSize").unwrap_err();
    assert!(err.is_unknown_model());
    assert_eq!(
        err.to_string(),
        "aggregate `Computer` with id 1: unknown model `Ram`"
    );
}

fn shop_with_gauges() -> mosaic::registry::Builder {
    let mut builder = fixtures::registry();
    builder.aggregate(
        schema::Aggregate::new("Gauge")
            .using(Processor::NAME)
            .using(Ram::NAME)
            .field("Fast", Type::Bool)
            .field("Serial", Type::Id)
            .field("SizeGb", Type::I64),
        |mapping| {
            mapping
                .field("Fast")
                .from(|cx| Ok(cx.get_as::<i64>(Processor::NAME, "Speed")? > 400))
                .using(Processor::NAME, ["Speed"]);

            mapping.field("Serial").from(|cx| Ok(cx.id().clone()));

            mapping
                .field("SizeGb")
                .from(|cx| Ok(cx.get_as::<i64>(Ram::NAME, "Size")? / 1000))
                .to(Ram::NAME, "Size")
                .with(|gb: i64| gb * 1000)
                .using(Ram::NAME, ["Size"]);
        },
    );
    builder
}

#[test]
fn computed_fields_read_through_the_context() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let provider = test.setup(&mut shop_with_gauges());

    let mut gauge = provider.get("Gauge", &id).unwrap();

    assert!(gauge.get_as::<bool>("Fast").unwrap());
    assert_eq!(gauge.get_as::<Id>("Serial").unwrap(), id);
    assert_eq!(gauge.get_as::<i64>("SizeGb").unwrap(), 2);
}

#[test]
fn setters_transform_the_value() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let provider = test.setup(&mut shop_with_gauges());

    let mut gauge = provider.get("Gauge", &id).unwrap();
    gauge.set("SizeGb", 4).unwrap();
    gauge.commit().unwrap();

    assert_eq!(
        test.memory().field(RAM_MODULES, &id, "Size"),
        Value::from(4000)
    );
}

#[test]
fn writes_to_read_only_fields_are_ignored() {
    let mut test = DbTest::new();
    let id = seed(&test);
    let provider = test.setup(&mut shop_with_gauges());

    let mut gauge = provider.get("Gauge", &id).unwrap();
    assert!(gauge.mapping().is_read_only("Fast"));

    gauge.set("Fast", false).unwrap();
    gauge.commit().unwrap();

    assert!(test.log().is_empty());
    assert!(gauge.get_as::<bool>("Fast").unwrap());
}

#[test]
fn create_shares_a_fresh_identifier() {
    let mut test = DbTest::new();
    let provider = test.setup(&mut fixtures::registry());

    let mut computer = provider.create("Computer").unwrap();
    assert_eq!(test.log().names(), ["new_id"]);

    let id = computer.id().clone();
    assert!(id.to_int().is_err());
    for model in [Processor::NAME, Ram::NAME] {
        assert_eq!(computer.record(model).unwrap().id(), &id);
    }

    computer.set("Maker", "Cyrix").unwrap();
    computer.set("ProcessorSpeed", 75).unwrap();
    computer.set("RAMSize", 16).unwrap();
    computer.commit().unwrap();

    assert_eq!(test.memory().len(PROCESSORS), 1);
    assert_eq!(test.memory().len(RAM_MODULES), 1);
    assert_eq!(
        test.memory().field(PROCESSORS, &id, "Maker"),
        Value::from("Cyrix")
    );
    assert_eq!(
        test.memory().field(RAM_MODULES, &id, "Size"),
        Value::from(16)
    );
}

#[test]
fn save_all_commits_in_order() {
    let mut test = DbTest::new();
    let provider = test.setup(&mut fixtures::registry());

    let mut computers = (1..=3)
        .map(|n| {
            let mut computer = provider.get("Computer", &Id::from_int(n)).unwrap();
            computer.set("RAMSize", n * 1000).unwrap();
            computer
        })
        .collect::<Vec<_>>();

    provider.save_all(&mut computers).unwrap();

    assert_eq!(test.log().count_update_fields(), 3);
    for n in 1..=3 {
        assert_eq!(
            test.memory().field(RAM_MODULES, &Id::from_int(n), "Size"),
            Value::from(n * 1000)
        );
    }
}

#[test]
fn unregistered_aggregate() {
    let mut test = DbTest::new();
    let provider = test.setup_with(Registry::builder().build().unwrap());

    let err = provider.get("Computer", &Id::from_int(1)).unwrap_err();
    assert!(err.is_unknown_model());

    let err = provider.create("Computer").unwrap_err();
    assert!(err.is_unknown_model());
}

use mosaic::{
    stmt::{Filter, Id, Value},
    Model,
};
use pretty_assertions::assert_eq;
use tests::{
    fixtures::{self, Processor, PROCESSORS},
    DbTest,
};

use std::collections::HashSet;

fn seed(test: &DbTest) {
    for (id, maker, speed) in [(1, "Intel", 500), (2, "AMD", 800), (3, "Intel", 900)] {
        test.memory().insert(
            PROCESSORS,
            Id::from_int(id),
            [("Maker", Value::from(maker)), ("Speed", Value::from(speed))],
        );
    }
}

#[test]
fn get_does_not_touch_the_store() {
    let mut test = DbTest::new();
    let provider = test.setup(&mut fixtures::registry());

    let models = provider.models();
    let record = models.get("Processor", Id::from_int(42)).unwrap();

    assert_eq!(record.id(), &Id::from_int(42));
    assert_eq!(record.model_name(), "Processor");
    assert!(test.log().is_empty());
}

#[test]
fn unknown_model() {
    let mut test = DbTest::new();
    let provider = test.setup(&mut fixtures::registry());

    let err = provider.models().get("Gpu", Id::from_int(1)).unwrap_err();
    assert!(err.is_unknown_model());
    assert_eq!(err.to_string(), "unknown model `Gpu`");

    let err = provider.models().create("Gpu").unwrap_err();
    assert!(err.is_unknown_model());
    assert!(test.log().is_empty());
}

#[test]
fn create_allocates_an_identifier() {
    let mut test = DbTest::new();
    let provider = test.setup(&mut fixtures::registry());

    let mut processor = provider.models().create_model::<Processor>().unwrap();
    assert_eq!(test.log().names(), ["new_id"]);
    assert!(uuid::Uuid::parse_str(processor.id().as_str()).is_ok());

    // Nothing is stored until the first commit.
    assert_eq!(test.memory().len(PROCESSORS), 0);

    processor.set_maker("Cyrix").unwrap();
    processor.commit().unwrap();

    let id = processor.id().clone();
    assert_eq!(test.memory().len(PROCESSORS), 1);
    assert_eq!(
        test.memory().field(PROCESSORS, &id, "Maker"),
        Value::from("Cyrix")
    );
}

#[test]
fn create_many_allocates_distinct_identifiers() {
    let mut test = DbTest::new();
    let provider = test.setup(&mut fixtures::registry());

    let records = provider.models().create_many("Processor", 3).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(test.log().names(), ["new_id", "new_id", "new_id"]);

    let ids: HashSet<_> = records.iter().map(|record| record.id().clone()).collect();
    assert_eq!(ids.len(), 3);

    let none = provider.models().create_many("Processor", 0).unwrap();
    assert!(none.is_empty());
}

#[test]
fn query_seeds_the_requested_fields() {
    let mut test = DbTest::new();
    seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    let mut records = provider
        .models()
        .get_by_query("Processor", Filter::eq("Maker", "Intel"), &["Speed"])
        .unwrap();
    assert_eq!(test.log().names(), ["query_fields"]);

    let ids: Vec<_> = records.iter().map(|record| record.id().clone()).collect();
    assert_eq!(ids, [Id::from_int(1), Id::from_int(3)]);

    for record in &mut records {
        assert!(record.is_loaded("Speed"));
        assert!(!record.is_loaded("Maker"));
        assert!(!record.has_pending_writes());
        record.commit().unwrap();
    }

    assert_eq!(records[1].get("Speed").unwrap(), Value::from(900));
    assert_eq!(test.log().len(), 1);

    assert_eq!(records[1].get("Maker").unwrap(), Value::from("Intel"));
    assert_eq!(test.log().count_get_field(), 1);
}

#[test]
fn typed_queries() {
    let mut test = DbTest::new();
    seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    let mut fast = provider
        .models()
        .query::<Processor>(Filter::ne("Maker", "AMD"), &["Maker", "Speed"])
        .unwrap();

    let speeds = fast
        .iter_mut()
        .map(|processor| processor.speed().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(speeds, [500, 900]);

    let mut amd = provider
        .models()
        .query_one::<Processor>(Filter::eq("Maker", "AMD"), &["Speed"])
        .unwrap()
        .unwrap();
    assert_eq!(amd.id(), &Id::from_int(2));
    assert_eq!(amd.speed().unwrap(), 800);

    assert_eq!(test.log().names(), ["query_fields", "query_one"]);
}

#[test]
fn get_one_by_query_without_match() {
    let mut test = DbTest::new();
    seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    let record = provider
        .models()
        .get_one_by_query("Processor", Filter::eq("Maker", "VIA"), &[])
        .unwrap();

    assert!(record.is_none());
}

#[test]
fn count_and_exists() {
    let mut test = DbTest::new();
    seed(&test);
    let provider = test.setup(&mut fixtures::registry());
    let models = provider.models();

    assert_eq!(models.count("Processor", Filter::All).unwrap(), 3);

    let filter = Filter::eq("Maker", "Intel").and(Filter::eq("Speed", 900));
    assert_eq!(models.count("Processor", filter).unwrap(), 1);

    let filter = Filter::eq("Speed", 800);
    assert!(models.exists("Processor", filter).unwrap());

    let filter = Filter::eq("Maker", "Intel")
        .not()
        .and(Filter::eq("Speed", 500));
    assert!(!models.exists("Processor", filter).unwrap());
}

#[test]
fn delete_by_id_and_by_query() {
    let mut test = DbTest::new();
    seed(&test);
    let provider = test.setup(&mut fixtures::registry());
    let models = provider.models();

    models.delete("Processor", &Id::from_int(2)).unwrap();
    assert_eq!(test.memory().len(PROCESSORS), 2);

    let deleted = models
        .delete_by_query("Processor", Filter::eq("Maker", "Intel"))
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(test.memory().len(PROCESSORS), 0);

    let deleted = models.delete_by_query("Processor", Filter::All).unwrap();
    assert_eq!(deleted, 0);
    assert_eq!(
        test.log().names(),
        ["delete_by_id", "delete_by_query", "delete_by_query"]
    );
}

#[test]
fn queries_check_field_names() {
    let mut test = DbTest::new();
    seed(&test);
    let provider = test.setup(&mut fixtures::registry());
    let models = provider.models();

    let err = models
        .get_by_query("Processor", Filter::All, &["Clock"])
        .unwrap_err();
    assert!(err.is_unknown_field());
    assert_eq!(err.to_string(), "unknown field `Processor.Clock`");

    let err = models
        .count("Processor", Filter::eq("Socket", "AM4"))
        .unwrap_err();
    assert!(err.is_unknown_field());

    let filter = Filter::eq("Maker", "AMD").or(Filter::eq("Socket", 1));
    let err = models.delete_by_query("Processor", filter).unwrap_err();
    assert!(err.is_unknown_field());

    assert!(test.log().is_empty());
    assert_eq!(test.memory().len(PROCESSORS), 3);
}

#[test]
fn records_of_a_model_share_its_collection() {
    let mut test = DbTest::new();
    seed(&test);
    let provider = test.setup(&mut fixtures::registry());

    let models = provider.models();
    let mut first = models.get("Processor", Id::from_int(1)).unwrap();
    let mut second = models.get("Processor", Id::from_int(1)).unwrap();

    first.set("Speed", 1000).unwrap();
    first.commit().unwrap();

    assert_eq!(second.get("Speed").unwrap(), Value::from(1000));
    assert_eq!(Processor::NAME, first.model_name());
}

use mosaic::{Aggregate, LazyList, Provider, Record, Registry};
use tests::fixtures::{Computer, Processor};

fn assert_sync_send<T: Send + Sync>() {}

#[test]
fn types_are_sync_send() {
    assert_sync_send::<Registry>();
    assert_sync_send::<Provider>();
    assert_sync_send::<Record>();
    assert_sync_send::<LazyList<i64>>();
    assert_sync_send::<Aggregate>();
    assert_sync_send::<Processor>();
    assert_sync_send::<Computer>();
}

#[test]
fn aggregates_move_across_threads() {
    let registry = tests::fixtures::registry().build().unwrap();
    let provider = Provider::new(registry, tests::MemoryDb::new());

    let handle = std::thread::spawn(move || {
        let mut computer = provider.get_as::<Computer>(&mosaic::stmt::Id::from_int(1))?;
        computer.set_ram_size(8)?;
        provider.save_as(&mut computer)
    });

    handle.join().unwrap().unwrap();
}

//! A small computer shop: processors and RAM modules composed into computers.

use mosaic::{
    mapping, registry, schema,
    stmt::{Id, Type},
    Aggregate, Aggregator, LazyList, Model, Record, Registry, Result,
};

pub const PROCESSORS: &str = "processors";
pub const RAM_MODULES: &str = "ram_modules";

#[derive(Debug)]
pub struct Processor(Record);

impl Model for Processor {
    const NAME: &'static str = "Processor";

    fn schema() -> schema::Model {
        schema::Model::new(Self::NAME)
            .field("Maker", Type::String)
            .field("Speed", Type::I64)
            .nullable_field("RamId", Type::Id)
    }

    fn from_record(record: Record) -> Self {
        Processor(record)
    }

    fn into_record(self) -> Record {
        self.0
    }
}

impl Processor {
    pub fn id(&self) -> &Id {
        self.0.id()
    }

    pub fn maker(&mut self) -> Result<String> {
        self.0.get_as("Maker")
    }

    pub fn set_maker(&mut self, maker: &str) -> Result<()> {
        self.0.set("Maker", maker)
    }

    pub fn speed(&mut self) -> Result<i64> {
        self.0.get_as("Speed")
    }

    pub fn set_speed(&mut self, speed: i64) -> Result<()> {
        self.0.set("Speed", speed)
    }

    pub fn commit(&mut self) -> Result<()> {
        self.0.commit()
    }
}

#[derive(Debug)]
pub struct Ram(Record);

impl Model for Ram {
    const NAME: &'static str = "Ram";

    fn schema() -> schema::Model {
        schema::Model::new(Self::NAME)
            .collection(RAM_MODULES)
            .field("Size", Type::I64)
            .field("Timings", Type::list(Type::I64))
    }

    fn from_record(record: Record) -> Self {
        Ram(record)
    }

    fn into_record(self) -> Record {
        self.0
    }
}

impl Ram {
    pub fn size(&mut self) -> Result<i64> {
        self.0.get_as("Size")
    }

    pub fn timings(&self) -> Result<LazyList<i64>> {
        self.0.list("Timings")
    }
}

/// A processor and a RAM module stored under the same identifier.
#[derive(Debug)]
pub struct Computer(Aggregate);

impl Aggregator for Computer {
    const NAME: &'static str = "Computer";

    fn schema() -> schema::Aggregate {
        schema::Aggregate::new(Self::NAME)
            .using(Processor::NAME)
            .using(Ram::NAME)
            .field("Maker", Type::String)
            .field("ProcessorSpeed", Type::I64)
            .field("RAMSize", Type::I64)
    }

    fn configure(mapping: &mut mapping::Builder) {
        mapping
            .field("ProcessorSpeed")
            .one_to_one(Processor::NAME, "Speed");

        mapping
            .field("RAMSize")
            .from(|cx| cx.get(Ram::NAME, "Size"))
            .to(Ram::NAME, "Size")
            .identity()
            .using(Ram::NAME, ["Size"]);
    }

    fn from_aggregate(aggregate: Aggregate) -> Self {
        Computer(aggregate)
    }

    fn aggregate_mut(&mut self) -> &mut Aggregate {
        &mut self.0
    }

    fn into_aggregate(self) -> Aggregate {
        self.0
    }
}

impl Computer {
    pub fn maker(&mut self) -> Result<String> {
        self.0.get_as("Maker")
    }

    pub fn processor_speed(&mut self) -> Result<i64> {
        self.0.get_as("ProcessorSpeed")
    }

    pub fn ram_size(&mut self) -> Result<i64> {
        self.0.get_as("RAMSize")
    }

    pub fn set_ram_size(&mut self, size: i64) -> Result<()> {
        self.0.set("RAMSize", size)
    }
}

/// A RAM module on its own.
#[derive(Debug)]
pub struct Memory(Aggregate);

impl Aggregator for Memory {
    const NAME: &'static str = "Memory";

    fn schema() -> schema::Aggregate {
        schema::Aggregate::new(Self::NAME)
            .using(Ram::NAME)
            .field("Size", Type::I64)
    }

    fn from_aggregate(aggregate: Aggregate) -> Self {
        Memory(aggregate)
    }

    fn aggregate_mut(&mut self) -> &mut Aggregate {
        &mut self.0
    }

    fn into_aggregate(self) -> Aggregate {
        self.0
    }
}

impl Memory {
    pub fn size(&mut self) -> Result<i64> {
        self.0.get_as("Size")
    }
}

/// A processor referencing its RAM module through `Processor.RamId`.
#[derive(Debug)]
pub struct Workstation(Aggregate);

impl Aggregator for Workstation {
    const NAME: &'static str = "Workstation";

    fn schema() -> schema::Aggregate {
        schema::Aggregate::new(Self::NAME)
            .using(Processor::NAME)
            .field("Maker", Type::String)
            .field("Speed", Type::I64)
            .aggregate_field("Memory", Memory::NAME)
    }

    fn configure(mapping: &mut mapping::Builder) {
        mapping
            .foreign_aggregate("Memory")
            .id_from(Processor::NAME, "RamId");
    }

    fn from_aggregate(aggregate: Aggregate) -> Self {
        Workstation(aggregate)
    }

    fn aggregate_mut(&mut self) -> &mut Aggregate {
        &mut self.0
    }

    fn into_aggregate(self) -> Aggregate {
        self.0
    }
}

impl Workstation {
    pub fn memory_size(&mut self) -> Result<i64> {
        self.0.aggregate("Memory")?.get_as("Size")
    }
}

/// Every model and aggregate of the shop.
pub fn registry() -> registry::Builder {
    let mut builder = Registry::builder();
    builder
        .register::<Processor>()
        .register::<Ram>()
        .register_aggregate::<Computer>()
        .register_aggregate::<Memory>()
        .register_aggregate::<Workstation>();
    builder
}

use super::builder::{identity, read_field, Builder};
use crate::{schema, Error, Result};

use std::sync::Arc;

/// Map every simple field that has no getter to the single same-named field of the
/// aggregate's models, and check that every aggregate-typed field has foreign wiring.
pub(super) fn complete(builder: &mut Builder, used: &[Arc<schema::Model>]) -> Result<()> {
    let aggregate = builder.schema.name.clone();
    let fields = builder.schema.fields.clone();

    for field in &fields {
        if field.ty.is_aggregate() {
            if !builder.foreign.contains_key(&field.name) {
                return Err(Error::missing_foreign_aggregate(&aggregate, &field.name));
            }
            continue;
        }

        if builder.getters.contains_key(&field.name) {
            continue;
        }

        let model = infer(&aggregate, field, used)?;

        tracing::debug!(
            aggregate = %aggregate,
            field = %field.name,
            model = %model,
            "mapping field automatically"
        );

        let getter = read_field(model.clone(), field.name.clone());
        builder.getters.insert(field.name.clone(), getter);

        let has_setters = builder
            .setters
            .get(&field.name)
            .is_some_and(|targets| !targets.is_empty());

        if !has_setters {
            builder.setter(
                field.name.clone(),
                model.clone(),
                field.name.clone(),
                Arc::new(identity),
            );
        }

        builder.uses(field.name.clone(), model, [field.name.clone()]);
    }

    Ok(())
}

/// Find the one model declaring a field named like `field` and able to feed it.
fn infer(
    aggregate: &str,
    field: &schema::Field,
    used: &[Arc<schema::Model>],
) -> Result<String> {
    let candidates: Vec<(&str, &schema::Field)> = used
        .iter()
        .filter_map(|model| {
            model
                .field_by_name(&field.name)
                .map(|target| (model.name.as_str(), target))
        })
        .collect();

    match candidates[..] {
        [] => Err(Error::target_not_found(aggregate, &field.name)),
        [(model, target)] if field.accepts(target) => Ok(model.to_string()),
        [(model, target)] => Err(Error::incompatible_types(
            aggregate,
            &field.name,
            model,
            &target.name,
        )),
        _ => Err(Error::ambiguous_mapping(
            aggregate,
            &field.name,
            candidates.iter().map(|(model, _)| *model),
        )),
    }
}

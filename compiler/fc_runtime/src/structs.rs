//! Struct instances: one apartment per field, named from the instance.

use smallvec::SmallVec;

use crate::value::{StructField, StructInstance};
use crate::{ApartmentId, GarbageCollector, RuntimeError, RuntimeResult, Value};

impl GarbageCollector {
    /// Allocate an instance of `type_name` with every field set to null.
    pub fn new_struct(&mut self, type_name: &str, field_names: &[&str]) -> ApartmentId {
        let fields: SmallVec<[StructField; 4]> = field_names
            .iter()
            .map(|&name| StructField {
                name: name.to_string(),
                apartment: self.new_apartment(Value::Null),
            })
            .collect();
        self.new_apartment(Value::StructInstance(StructInstance {
            type_name: type_name.to_string(),
            fields,
        }))
    }

    fn struct_instance(&self, id: ApartmentId) -> RuntimeResult<&StructInstance> {
        match self.value(id)? {
            Value::StructInstance(instance) => Ok(instance),
            other => Err(RuntimeError::NotAStruct { got: other.kind() }),
        }
    }

    /// The apartment behind field `name`.
    pub fn struct_field(&self, id: ApartmentId, name: &str) -> RuntimeResult<ApartmentId> {
        self.struct_instance(id)?
            .field(name)
            .ok_or_else(|| RuntimeError::UndefinedField {
                field: name.to_string(),
            })
    }

    /// Overwrite the field's value in place; aliases of the field see it.
    pub fn set_struct_field(
        &mut self,
        id: ApartmentId,
        name: &str,
        value: Value,
    ) -> RuntimeResult<()> {
        let field = self.struct_field(id, name)?;
        self.replace_value(field, value)
    }

    /// Point field `name` at an existing apartment, sharing it.
    ///
    /// Fails with `CycleDetected` if `apartment` already contains `id`.
    pub fn bind_struct_field(
        &mut self,
        id: ApartmentId,
        name: &str,
        apartment: ApartmentId,
    ) -> RuntimeResult<()> {
        let mut instance = self.struct_instance(id)?.clone();
        let field = instance
            .field_mut(name)
            .ok_or_else(|| RuntimeError::UndefinedField {
                field: name.to_string(),
            })?;
        field.apartment = apartment;
        self.replace_value(id, Value::StructInstance(instance))
    }
}

//! Collections: a head apartment whose value names the first element, with
//! the remaining elements chained through `next`.

use fc_ir::Literal;

use crate::value::CollectionValue;
use crate::{ApartmentId, GarbageCollector, RuntimeError, RuntimeResult, Value, ValueKind};

impl GarbageCollector {
    /// Allocate a literal. String literals become collections of characters.
    pub fn new_literal(&mut self, literal: &Literal) -> ApartmentId {
        match literal {
            Literal::Null => self.new_apartment(Value::Null),
            Literal::Numerical(n) => self.new_apartment(Value::Numerical(*n)),
            Literal::Character(c) => self.new_apartment(Value::Character(*c)),
            Literal::String(text) => self.collection_from_str(text),
        }
    }

    /// Allocate an unreferenced collection holding `values` in order.
    pub fn new_collection(&mut self, values: impl IntoIterator<Item = Value>) -> ApartmentId {
        let values: Vec<Value> = values.into_iter().collect();
        let len = values.len();
        let mut first = None;
        for value in values.into_iter().rev() {
            first = Some(self.new_linked(value, first));
        }
        let head = self.new_apartment(Value::Collection(CollectionValue { first }));
        tracing::debug!(collection = ?head, len, "built collection");
        head
    }

    pub fn collection_from_str(&mut self, text: &str) -> ApartmentId {
        self.new_collection(text.chars().map(Value::Character))
    }

    fn collection_first(&self, id: ApartmentId) -> RuntimeResult<Option<ApartmentId>> {
        match self.value(id)? {
            Value::Collection(collection) => Ok(collection.first),
            other => Err(RuntimeError::NotACollection { got: other.kind() }),
        }
    }

    /// Element apartments in order.
    pub fn collection_elements(&self, id: ApartmentId) -> RuntimeResult<Vec<ApartmentId>> {
        self.chain(self.collection_first(id)?)
    }

    /// Follow `next` links from `first`.
    pub(crate) fn chain(&self, first: Option<ApartmentId>) -> RuntimeResult<Vec<ApartmentId>> {
        let mut elements = Vec::new();
        let mut cursor = first;
        while let Some(element) = cursor {
            elements.push(element);
            cursor = self.get(element)?.next();
        }
        Ok(elements)
    }

    pub fn collection_len(&self, id: ApartmentId) -> RuntimeResult<usize> {
        self.collection_elements(id).map(|elements| elements.len())
    }

    /// The apartment holding element `index`.
    pub fn collection_get(&self, id: ApartmentId, index: usize) -> RuntimeResult<ApartmentId> {
        let elements = self.collection_elements(id)?;
        elements
            .get(index)
            .copied()
            .ok_or(RuntimeError::IndexOutOfBounds {
                index,
                len: elements.len(),
            })
    }

    /// Overwrite element `index` in place. Every alias of the collection sees
    /// the new value.
    pub fn collection_set(
        &mut self,
        id: ApartmentId,
        index: usize,
        value: Value,
    ) -> RuntimeResult<()> {
        let element = self.collection_get(id, index)?;
        self.replace_value(element, value)
    }

    /// Append `value`, returning the new element's apartment.
    pub fn collection_push(&mut self, id: ApartmentId, value: Value) -> RuntimeResult<ApartmentId> {
        let elements = self.collection_elements(id)?;
        let element = self.new_apartment(value);
        match elements.last() {
            Some(&last) => self.set_next(last, Some(element))?,
            None => self.replace_value(
                id,
                Value::Collection(CollectionValue {
                    first: Some(element),
                }),
            )?,
        }
        Ok(element)
    }

    /// Render a collection of characters as text.
    pub fn collection_to_string(&self, id: ApartmentId) -> RuntimeResult<String> {
        self.collection_elements(id)?
            .into_iter()
            .map(|element| match self.value(element)? {
                Value::Character(c) => Ok(*c),
                other => Err(RuntimeError::TypeMismatch {
                    name: "collection_to_string",
                    expected: ValueKind::Character,
                    got: other.kind(),
                }),
            })
            .collect()
    }
}

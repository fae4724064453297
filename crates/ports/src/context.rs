//! Request-scoped context and field propagation helpers.
//!
//! A [`LogContext`] is an immutable bag of typed slots. Each slot is
//! addressed by a key *type* implementing [`ContextKey`]; adapters keep
//! their key types private, so their slots cannot be forged or read by
//! outside code.

use crate::fields::Fields;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Marker trait for typed context slots.
pub trait ContextKey: 'static {
    /// Value stored under this key.
    type Value: Send + Sync + 'static;
}

type Slot = Arc<dyn Any + Send + Sync>;

/// Immutable request-scoped context.
///
/// Cloning is cheap. Inserting returns a new context and leaves the
/// receiver untouched.
#[derive(Clone, Default)]
pub struct LogContext {
    slots: Arc<HashMap<TypeId, Slot>>,
}

impl LogContext {
    /// Empty root context.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context carrying `value` under `K`.
    #[must_use]
    pub fn with_value<K: ContextKey>(&self, value: K::Value) -> Self {
        let mut slots = HashMap::clone(&self.slots);
        slots.insert(TypeId::of::<K>(), Arc::new(value));
        Self {
            slots: Arc::new(slots),
        }
    }

    /// Read the value stored under `K`, if any.
    #[must_use]
    pub fn get<K: ContextKey>(&self) -> Option<&K::Value> {
        self.slots
            .get(&TypeId::of::<K>())
            .and_then(|slot| slot.downcast_ref::<K::Value>())
    }

    /// Returns true when a value is stored under `K`.
    #[must_use]
    pub fn contains<K: ContextKey>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<K>())
    }

    /// Number of populated slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true when no slot is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for LogContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LogContext")
            .field("slots", &self.slots.len())
            .finish()
    }
}

/// Read the field map stored under `K`.
///
/// Returns an empty map when the context is absent or carries nothing under
/// `K`; otherwise a copy of the stored map.
#[must_use]
pub fn fields_from_context<K>(ctx: Option<&LogContext>) -> Fields
where
    K: ContextKey<Value = Fields>,
{
    ctx.and_then(LogContext::get::<K>)
        .cloned()
        .unwrap_or_default()
}

/// Store `fields_from_context(ctx) ∪ fields` under `K` in a new context.
///
/// `fields` wins on collision. Neither input is modified.
#[must_use]
pub fn to_context<K>(ctx: &LogContext, fields: &Fields) -> LogContext
where
    K: ContextKey<Value = Fields>,
{
    let merged = fields_from_context::<K>(Some(ctx)).merge(fields);
    ctx.with_value::<K>(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct TestKey;

    impl ContextKey for TestKey {
        type Value = Fields;
    }

    struct OtherKey;

    impl ContextKey for OtherKey {
        type Value = Fields;
    }

    struct RequestId;

    impl ContextKey for RequestId {
        type Value = String;
    }

    #[test]
    fn missing_context_yields_empty_fields() {
        assert!(fields_from_context::<TestKey>(None).is_empty());
        let ctx = LogContext::background();
        assert!(fields_from_context::<TestKey>(Some(&ctx)).is_empty());
    }

    #[test]
    fn to_context_round_trips_through_merge() {
        let parent_fields = Fields::new().with("parent", "p").with("ID", "old");
        let parent = LogContext::background().with_value::<TestKey>(parent_fields.clone());
        let added = Fields::new().with("ID", "1");

        let child = to_context::<TestKey>(&parent, &added);

        assert_eq!(
            fields_from_context::<TestKey>(Some(&child)),
            parent_fields.merge(&added)
        );
        assert_eq!(fields_from_context::<TestKey>(Some(&parent)), parent_fields);
    }

    #[test]
    fn keys_are_isolated_by_type() {
        let ctx = to_context::<TestKey>(&LogContext::background(), &Fields::new().with("a", 1));
        assert!(fields_from_context::<OtherKey>(Some(&ctx)).is_empty());
        assert!(ctx.contains::<TestKey>());
        assert!(!ctx.contains::<OtherKey>());
    }

    #[test]
    fn typed_slots_hold_arbitrary_values() {
        let ctx = LogContext::background().with_value::<RequestId>("req-7".to_string());
        assert_eq!(ctx.get::<RequestId>().map(String::as_str), Some("req-7"));
        assert_eq!(ctx.len(), 1);
        assert!(LogContext::background().is_empty());
    }

    #[test]
    fn stored_map_is_copied_out() {
        let ctx = to_context::<TestKey>(&LogContext::background(), &Fields::new().with("k", "v"));
        let mut copy = fields_from_context::<TestKey>(Some(&ctx));
        copy.insert("extra", json!(true));

        assert_eq!(fields_from_context::<TestKey>(Some(&ctx)).len(), 1);
    }
}

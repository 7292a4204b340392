use std::{borrow::Cow, fmt, hash, marker::PhantomData};

use schemars::{
    gen::SchemaGenerator,
    schema::{InstanceType, Schema},
    JsonSchema,
};
use serde::{Deserialize, Serialize};

pub trait HasId {
    type IdType;
}

/// Identifier typed by the record it points to, so a field id can not be
/// handed to a function expecting a measurement id.
pub struct Id<T: HasId>(T::IdType, PhantomData<T>);

impl<T: HasId> Id<T> {
    pub fn new(inner: T::IdType) -> Self {
        Self(inner, PhantomData)
    }
}

impl<T: HasId> Id<T>
where
    T::IdType: Clone,
{
    pub fn raw(&self) -> T::IdType {
        self.0.clone()
    }

    pub fn raw_ref<'a, R>(&'a self) -> &'a R
    where
        T::IdType: AsRef<R>,
        R: ?Sized,
    {
        self.0.as_ref()
    }
}

impl<T: HasId<IdType = String>> Id<T> {
    /// Random string id of the form `<prefix>_<uuid>`.
    pub fn generate(prefix: &str) -> Self {
        Self::new(format!("{}_{}", prefix, uuid::Uuid::new_v4().simple()))
    }
}

impl<T: HasId<IdType = i64>> Id<T> {
    /// The id following the largest of `existing`, starting at 1.
    pub fn next_after<'a, I>(existing: I) -> Self
    where
        I: IntoIterator<Item = &'a Id<T>>,
        T: 'a,
    {
        let max = existing.into_iter().map(|id| id.0).max().unwrap_or(0);
        Self::new(max.max(0) + 1)
    }
}

impl<T: HasId> Default for Id<T>
where
    T::IdType: Default,
{
    fn default() -> Self {
        Self(Default::default(), PhantomData)
    }
}

impl<T: HasId> fmt::Debug for Id<T>
where
    T::IdType: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.0).finish()
    }
}

impl<T: HasId> fmt::Display for Id<T>
where
    T::IdType: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: HasId> Clone for Id<T>
where
    T::IdType: Clone,
{
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<T: HasId> Copy for Id<T> where T::IdType: Copy {}

impl<T: HasId> hash::Hash for Id<T>
where
    T::IdType: hash::Hash,
{
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<T: HasId> PartialEq for Id<T>
where
    T::IdType: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl<T: HasId> Eq for Id<T> where T::IdType: Eq {}

impl<'de, T: HasId> Deserialize<'de> for Id<T>
where
    T::IdType: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        T::IdType::deserialize(deserializer).map(Id::new)
    }
}

impl<T: HasId> Serialize for Id<T>
where
    T::IdType: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T: HasId + JsonSchema> JsonSchema for Id<T>
where
    T::IdType: JsonSchema,
{
    fn schema_name() -> String {
        // Exclude the module path to make the name in generated schemas clearer.
        format!("{}Id", T::schema_name())
    }

    fn schema_id() -> Cow<'static, str> {
        Cow::Owned(format!("{}::Id<{}>", module_path!(), T::schema_id()))
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        let mut schema = T::IdType::json_schema(gen).into_object();
        schema.format = Some("id".to_owned());
        if schema.instance_type.is_none() {
            schema.instance_type = Some(InstanceType::String.into());
        }
        Schema::Object(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pitch;
    impl HasId for Pitch {
        type IdType = String;
    }

    struct Chalk;
    impl HasId for Chalk {
        type IdType = i64;
    }

    #[test]
    fn generated_ids_carry_prefix_and_differ() {
        let a = Id::<Pitch>::generate("field");
        let b = Id::<Pitch>::generate("field");
        assert!(a.raw_ref::<str>().starts_with("field_"));
        assert_ne!(a, b);
    }

    #[test]
    fn next_after_picks_successor_of_max() {
        let ids = vec![Id::<Chalk>::new(3), Id::new(1), Id::new(7)];
        assert_eq!(Id::next_after(&ids), Id::new(8));
        assert_eq!(Id::<Chalk>::next_after(&[]), Id::new(1));
    }

    #[test]
    fn serializes_transparently() {
        let id = Id::<Chalk>::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: Id<Chalk> = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
    }
}

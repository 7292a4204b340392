use std::fmt::Debug;

use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
pub use serde_with;
use utility::id::{HasId, Id};

pub mod field;
pub mod marked_line;
pub mod measurement;
pub mod point;
pub mod template;

pub trait ExampleData {
    fn example_data() -> Self;
}

/// A record together with its id, serialized as one flat object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + DeserializeOwned + JsonSchema + Debug + Clone + PartialEq,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + DeserializeOwned + JsonSchema + Debug + Clone + PartialEq,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}

/// Looks up the record with `id` in a collection.
pub fn find_by_id<'a, V>(records: &'a [WithId<V>], id: &Id<V>) -> Option<&'a WithId<V>>
where
    V: HasId,
    V::IdType: Serialize + DeserializeOwned + JsonSchema + Debug + Clone + PartialEq,
{
    records.iter().find(|record| &record.id == id)
}

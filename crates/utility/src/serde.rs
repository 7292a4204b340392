//! Timestamps travel as epoch milliseconds, the unit location fixes and tap
//! events are reported in.

pub mod epoch_millis {
    use chrono::{DateTime, TimeZone as _, Utc};
    use schemars::gen::SchemaGenerator;
    use schemars::schema::{InstanceType, Schema, SchemaObject};
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(millis).single()
    }

    pub fn serialize<S>(date_time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(date_time.timestamp_millis())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        from_millis(millis).ok_or_else(|| {
            D::Error::custom(format!("timestamp out of range: {}", millis))
        })
    }

    pub fn serialize_option<S>(
        option_date_time: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match option_date_time {
            Some(d) => serialize(d, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<i64>::deserialize(deserializer)?;
        match millis {
            Some(millis) => from_millis(millis).map(Some).ok_or_else(|| {
                D::Error::custom(format!("timestamp out of range: {}", millis))
            }),
            None => Ok(None),
        }
    }

    pub fn schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::Integer.into()),
            format: Some("epoch-millis".to_owned()),
            ..Default::default()
        }
        .into()
    }

    pub fn schema_option(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(vec![InstanceType::Integer, InstanceType::Null].into()),
            format: Some("epoch-millis".to_owned()),
            ..Default::default()
        }
        .into()
    }
}

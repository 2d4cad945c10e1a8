//! Domain models and DTOs

pub mod category;
pub mod compilation;
pub mod event;
pub mod location;
pub mod request;
pub mod stats;
pub mod user;

/// Wire format for every timestamp in the API
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serde adapter for `NaiveDateTime` fields using [`DATE_TIME_FORMAT`]
pub mod date_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_TIME_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(DATE_TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional timestamps
pub mod date_time_opt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_TIME_FORMAT;

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(DATE_TIME_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        match s {
            None => Ok(None),
            Some(s) if s.is_empty() => Ok(None),
            Some(s) => NaiveDateTime::parse_from_str(&s, DATE_TIME_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Deserializer for comma-separated id lists in query strings
pub mod csv_ids {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<i64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        match s {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => s
                .split(',')
                .map(|part| part.trim().parse::<i64>())
                .collect::<Result<Vec<_>, _>>()
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Deserializer for comma-separated string lists in query strings
pub mod csv_strings {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        match s {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => Ok(Some(
                s.split(',').map(|part| part.trim().to_string()).collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct IdsQuery {
        #[serde(default, deserialize_with = "super::csv_ids::deserialize")]
        ids: Option<Vec<i64>>,
    }

    #[test]
    fn test_date_time_format() {
        let dt = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap();
        assert_eq!(dt.format(super::DATE_TIME_FORMAT).to_string(), "2025-03-14 09:26:53");
    }

    #[test]
    fn test_csv_ids() {
        let q: IdsQuery = serde_json::from_str(r#"{"ids": "1, 2,3"}"#).unwrap();
        assert_eq!(q.ids, Some(vec![1, 2, 3]));

        let q: IdsQuery = serde_json::from_str(r#"{"ids": ""}"#).unwrap();
        assert_eq!(q.ids, None);

        let q: IdsQuery = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(q.ids, None);

        assert!(serde_json::from_str::<IdsQuery>(r#"{"ids": "1,x"}"#).is_err());
    }
}

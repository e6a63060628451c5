use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{de::Visitor, Deserialize, Deserializer, Serialize};

/// prefix used for the scenario-added id namespace.
const USER_ID_PREFIX: &str = "user_";

/// identity of a point of interest. upstream elements carry integer ids;
/// scenario-added points get a synthesized id in a distinct namespace so the
/// two can never collide. upstream ids serialize as JSON numbers, synthesized
/// ids as `"user_<n>"` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PoiId {
    /// id assigned by the upstream POI source
    Osm(i64),
    /// request-scoped id synthesized for a scenario addition
    User(u64),
}

impl Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoiId::Osm(id) => write!(f, "{}", id),
            PoiId::User(n) => write!(f, "{}{}", USER_ID_PREFIX, n),
        }
    }
}

impl FromStr for PoiId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix(USER_ID_PREFIX) {
            Some(n) => n
                .parse::<u64>()
                .map(PoiId::User)
                .map_err(|_| format!("invalid scenario poi id '{}'", s)),
            None => s
                .parse::<i64>()
                .map(PoiId::Osm)
                .map_err(|_| format!("invalid poi id '{}'", s)),
        }
    }
}

impl Serialize for PoiId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            PoiId::Osm(id) => serializer.serialize_i64(*id),
            PoiId::User(_) => serializer.collect_str(self),
        }
    }
}

struct PoiIdVisitor;

impl Visitor<'_> for PoiIdVisitor {
    type Value = PoiId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer poi id or a 'user_<n>' string")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(PoiId::Osm(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(PoiId::Osm(v as i64))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        PoiId::from_str(v).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for PoiId {
    fn deserialize<D>(deserializer: D) -> Result<PoiId, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(PoiIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::PoiId;
    use std::str::FromStr;

    #[test]
    fn test_serialize_forms() {
        assert_eq!(serde_json::to_string(&PoiId::Osm(42)).unwrap(), "42");
        assert_eq!(
            serde_json::to_string(&PoiId::User(3)).unwrap(),
            "\"user_3\""
        );
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let osm: PoiId = serde_json::from_str("1234").unwrap();
        assert_eq!(osm, PoiId::Osm(1234));
        let user: PoiId = serde_json::from_str("\"user_0\"").unwrap();
        assert_eq!(user, PoiId::User(0));
        let numeric_string: PoiId = serde_json::from_str("\"77\"").unwrap();
        assert_eq!(numeric_string, PoiId::Osm(77));
    }

    #[test]
    fn test_namespaces_never_collide() {
        assert_ne!(PoiId::Osm(0), PoiId::User(0));
        assert_eq!(PoiId::from_str("user_5").unwrap(), PoiId::User(5));
        assert_eq!(PoiId::from_str("5").unwrap(), PoiId::Osm(5));
    }

    #[test]
    fn test_invalid_ids_rejected() {
        assert!(PoiId::from_str("user_x").is_err());
        assert!(PoiId::from_str("park").is_err());
    }
}

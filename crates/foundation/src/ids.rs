use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Entity kinds that own a detail view and can be deep-linked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Place,
    Person,
    Passage,
    Event,
    Journey,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Place,
        EntityKind::Person,
        EntityKind::Passage,
        EntityKind::Event,
        EntityKind::Journey,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Place => "place",
            EntityKind::Person => "person",
            EntityKind::Passage => "passage",
            EntityKind::Event => "event",
            EntityKind::Journey => "journey",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity kind: {0}")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownEntityKind(s.to_string()))
    }
}

/// Typed reference to a record by kind and string id.
///
/// Holding an `EntityRef` says nothing about whether the id resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn place(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Place, id)
    }

    pub fn journey(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Journey, id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::EntityKind;

    #[test]
    fn kind_names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>(), Ok(kind));
        }
        let err = "route".parse::<EntityKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown entity kind: route");
    }
}

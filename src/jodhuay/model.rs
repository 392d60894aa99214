use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Which of the two collections a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Underground,
    Government,
}

impl Kind {
    pub const ALL: [Kind; 2] = [Kind::Underground, Kind::Government];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Underground => "underground",
            Kind::Government => "government",
        }
    }

    /// Thai label used in summaries ("หวยใต้ดิน" / "หวยรัฐบาล").
    pub fn label(&self) -> &'static str {
        match self {
            Kind::Underground => "หวยใต้ดิน",
            Kind::Government => "หวยรัฐบาล",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "underground" | "ug" | "u" => Ok(Kind::Underground),
            "government" | "gov" | "g" => Ok(Kind::Government),
            other => Err(format!("Unknown collection: {}", other)),
        }
    }
}

/// Common surface of the two type catalogs.
pub trait Catalog: Copy + Eq + Sized + 'static {
    const ALL: &'static [Self];

    /// The code persisted in the `type` field.
    fn code(&self) -> &'static str;

    /// Exact length of the number for this type.
    fn digits(&self) -> usize;

    fn display_name(&self) -> &'static str;

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UndergroundType {
    #[serde(rename = "3bon")]
    ThreeTop,
    #[serde(rename = "2bon")]
    TwoTop,
    #[serde(rename = "2lang")]
    TwoBottom,
    #[serde(rename = "runBon")]
    RunTop,
    #[serde(rename = "runLang")]
    RunBottom,
}

impl Catalog for UndergroundType {
    const ALL: &'static [Self] = &[
        UndergroundType::ThreeTop,
        UndergroundType::TwoTop,
        UndergroundType::TwoBottom,
        UndergroundType::RunTop,
        UndergroundType::RunBottom,
    ];

    fn code(&self) -> &'static str {
        match self {
            UndergroundType::ThreeTop => "3bon",
            UndergroundType::TwoTop => "2bon",
            UndergroundType::TwoBottom => "2lang",
            UndergroundType::RunTop => "runBon",
            UndergroundType::RunBottom => "runLang",
        }
    }

    fn digits(&self) -> usize {
        match self {
            UndergroundType::ThreeTop => 3,
            UndergroundType::TwoTop | UndergroundType::TwoBottom => 2,
            UndergroundType::RunTop | UndergroundType::RunBottom => 1,
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            UndergroundType::ThreeTop => "3 ตัวบน",
            UndergroundType::TwoTop => "2 ตัวบน",
            UndergroundType::TwoBottom => "2 ตัวล่าง",
            UndergroundType::RunTop => "วิ่งบน",
            UndergroundType::RunBottom => "วิ่งล่าง",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GovernmentType {
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "front3")]
    Front3,
    #[serde(rename = "back3")]
    Back3,
    #[serde(rename = "back2")]
    Back2,
}

impl Catalog for GovernmentType {
    const ALL: &'static [Self] = &[
        GovernmentType::Six,
        GovernmentType::Front3,
        GovernmentType::Back3,
        GovernmentType::Back2,
    ];

    fn code(&self) -> &'static str {
        match self {
            GovernmentType::Six => "6",
            GovernmentType::Front3 => "front3",
            GovernmentType::Back3 => "back3",
            GovernmentType::Back2 => "back2",
        }
    }

    fn digits(&self) -> usize {
        match self {
            GovernmentType::Six => 6,
            GovernmentType::Front3 | GovernmentType::Back3 => 3,
            GovernmentType::Back2 => 2,
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            GovernmentType::Six => "6 ตัวตรง",
            GovernmentType::Front3 => "เลขหน้า 3 ตัว",
            GovernmentType::Back3 => "เลขท้าย 3 ตัว",
            GovernmentType::Back2 => "เลขท้าย 2 ตัว",
        }
    }
}

macro_rules! catalog_from_str {
    ($ty:ty, $kind:expr) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Catalog>::from_code(s).ok_or_else(|| {
                    let codes: Vec<&str> = <$ty as Catalog>::ALL.iter().map(|t| t.code()).collect();
                    format!("Unknown {} type '{}' (expected one of: {})", $kind, s, codes.join(", "))
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.display_name())
            }
        }
    };
}

catalog_from_str!(UndergroundType, Kind::Underground);
catalog_from_str!(GovernmentType, Kind::Government);

/// Identifier of a record within its collection.
///
/// New records get a v4 UUID. Data written by older versions carries numeric
/// ids (millisecond timestamps, sometimes with a fractional tie-breaker);
/// those are kept verbatim so a load/save cycle does not rewrite them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Uuid(Uuid),
    Legacy(serde_json::Number),
    Text(String),
}

impl RecordId {
    pub fn generate() -> Self {
        RecordId::Uuid(Uuid::new_v4())
    }

    /// Zero and empty-string ids count as missing.
    pub fn is_blank(&self) -> bool {
        match self {
            RecordId::Uuid(_) => false,
            RecordId::Legacy(n) => n.as_f64() == Some(0.0),
            RecordId::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Uuid(id) => write!(f, "{}", id),
            RecordId::Legacy(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = Uuid::parse_str(s) {
            return Ok(RecordId::Uuid(id));
        }
        if let Ok(n) = s.parse::<serde_json::Number>() {
            return Ok(RecordId::Legacy(n));
        }
        Ok(RecordId::Text(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndergroundRecord {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub bet_type: UndergroundType,
    pub number: String,
    pub price: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernmentRecord {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub bet_type: GovernmentType,
    pub number: String,
    pub qty: u32,
}

/// Accessors shared by both record shapes.
pub trait Record: Clone {
    type Type: Catalog;

    const KIND: Kind;

    fn id(&self) -> &RecordId;
    fn number(&self) -> &str;
    fn bet_type(&self) -> Self::Type;

    /// Extra text searched by `query` besides number and type name.
    fn search_text(&self) -> Option<&str> {
        None
    }

    /// The collection holding records of this shape.
    fn within(collections: &Collections) -> &Vec<Self>;
    fn within_mut(collections: &mut Collections) -> &mut Vec<Self>;
}

impl Record for UndergroundRecord {
    type Type = UndergroundType;
    const KIND: Kind = Kind::Underground;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn number(&self) -> &str {
        &self.number
    }

    fn bet_type(&self) -> UndergroundType {
        self.bet_type
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.price)
    }

    fn within(collections: &Collections) -> &Vec<Self> {
        &collections.underground
    }

    fn within_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.underground
    }
}

impl Record for GovernmentRecord {
    type Type = GovernmentType;
    const KIND: Kind = Kind::Government;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn number(&self) -> &str {
        &self.number
    }

    fn bet_type(&self) -> GovernmentType {
        self.bet_type
    }

    fn within(collections: &Collections) -> &Vec<Self> {
        &collections.government
    }

    fn within_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.government
    }
}

/// Both collections, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collections {
    pub underground: Vec<UndergroundRecord>,
    pub government: Vec<GovernmentRecord>,
}

impl Collections {
    pub fn len(&self, kind: Kind) -> usize {
        match kind {
            Kind::Underground => self.underground.len(),
            Kind::Government => self.government.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.underground.is_empty() && self.government.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_codes_round_trip() {
        for t in UndergroundType::ALL {
            assert_eq!(UndergroundType::from_code(t.code()), Some(*t));
        }
        for t in GovernmentType::ALL {
            assert_eq!(GovernmentType::from_code(t.code()), Some(*t));
        }
        assert_eq!(UndergroundType::from_code("4bon"), None);
    }

    #[test]
    fn digit_lengths_follow_type() {
        let ug: Vec<usize> = UndergroundType::ALL.iter().map(|t| t.digits()).collect();
        assert_eq!(ug, vec![3, 2, 2, 1, 1]);
        let gov: Vec<usize> = GovernmentType::ALL.iter().map(|t| t.digits()).collect();
        assert_eq!(gov, vec![6, 3, 3, 2]);
    }

    #[test]
    fn legacy_numeric_ids_survive_serialization() {
        let json = r#"{"id":1700000000000.5,"type":"2bon","number":"25","price":"100","amount":100}"#;
        let record: UndergroundRecord = serde_json::from_str(json).unwrap();
        assert!(matches!(record.id, RecordId::Legacy(_)));
        assert_eq!(serde_json::to_string(&record).unwrap(), json);
    }

    #[test]
    fn uuid_ids_parse_back_from_display() {
        let id = RecordId::generate();
        let parsed: RecordId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn blank_ids() {
        assert!(RecordId::Legacy(0.into()).is_blank());
        assert!(RecordId::Text(String::new()).is_blank());
        assert!(!RecordId::Legacy(17.into()).is_blank());
    }

    #[test]
    fn kind_parses_short_names() {
        assert_eq!("ug".parse::<Kind>().unwrap(), Kind::Underground);
        assert_eq!("Government".parse::<Kind>().unwrap(), Kind::Government);
        assert!("lotto".parse::<Kind>().is_err());
    }
}

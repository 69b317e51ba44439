use serde::{Deserialize, Serialize};

/// A single DNS resource record in a zone.
///
/// The API has no record ids: `(zone, name, type, content)` is the only
/// handle on a record for updates and deletes.
///
/// Listings carry the priority as `prio` and the create/update echoes carry
/// the content as `data`; both spellings decode into this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Owner name, relative to the zone
    pub name: String,

    /// Record type (A, AAAA, CNAME, MX, TXT, ...)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record data
    #[serde(alias = "data")]
    pub content: String,

    /// Time to live in seconds
    pub ttl: u32,

    /// Priority (MX, SRV); zero for other types
    #[serde(alias = "prio")]
    pub priority: u16,
}

impl Record {
    /// The `(name, type, content)` triple the API matches on
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey {
            name: self.name.clone(),
            record_type: self.record_type.clone(),
            value: self.content.clone(),
        }
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} (ttl {}, priority {})",
            self.name, self.record_type, self.content, self.ttl, self.priority
        )
    }
}

/// Body of `POST /records/{zone}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: String,

    pub value: String,

    pub ttl: u32,

    pub priority: u16,
}

impl From<NewRecord> for Record {
    fn from(new: NewRecord) -> Self {
        Self {
            name: new.name,
            record_type: new.record_type,
            content: new.value,
            ttl: new.ttl,
            priority: new.priority,
        }
    }
}

/// Body of `PUT /records/{zone}`.
///
/// The `old*`/`matchingType` fields select the record; absent `new*` fields
/// are left untouched by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    pub old_name: String,

    pub matching_type: String,

    pub old_value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_ttl: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_priority: Option<u16>,
}

impl RecordUpdate {
    /// An update selecting `record` that changes nothing yet
    #[must_use]
    pub fn for_record(record: &Record) -> Self {
        Self {
            old_name: record.name.clone(),
            matching_type: record.record_type.clone(),
            old_value: record.content.clone(),
            new_name: None,
            new_type: None,
            new_value: None,
            new_ttl: None,
            new_priority: None,
        }
    }

    /// Returns true if no `new*` field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.new_name.is_none()
            && self.new_type.is_none()
            && self.new_value.is_none()
            && self.new_ttl.is_none()
            && self.new_priority.is_none()
    }
}

/// Body of `DELETE /records/{zone}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordKey {
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: String,

    pub value: String,
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One of the eight kinds of content the engine ingests (§1, §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Decision,
    Progress,
    Issue,
    Handoff,
    Insight,
    Reference,
    GitCommit,
    Rule,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Decision => "decision",
            EntryType::Progress => "progress",
            EntryType::Issue => "issue",
            EntryType::Handoff => "handoff",
            EntryType::Insight => "insight",
            EntryType::Reference => "reference",
            EntryType::GitCommit => "git_commit",
            EntryType::Rule => "rule",
        }
    }
}

impl std::str::FromStr for EntryType {
    type Err = crate::errors::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decision" => Ok(EntryType::Decision),
            "progress" => Ok(EntryType::Progress),
            "issue" => Ok(EntryType::Issue),
            "handoff" => Ok(EntryType::Handoff),
            "insight" => Ok(EntryType::Insight),
            "reference" => Ok(EntryType::Reference),
            "git_commit" => Ok(EntryType::GitCommit),
            "rule" => Ok(EntryType::Rule),
            other => Err(crate::errors::ValidationError::UnknownType(other.to_string())),
        }
    }
}

/// Coarse lifetime class (§3.1, GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Ephemeral,
    Working,
    LongTerm,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Ephemeral => "ephemeral",
            Tier::Working => "working",
            Tier::LongTerm => "longterm",
        }
    }

    /// `assign_tier(type, explicit?)` (§4.1). Rules are always longterm
    /// regardless of what is requested explicitly.
    pub fn assign(entry_type: EntryType, explicit: Option<Tier>) -> Tier {
        if entry_type == EntryType::Rule {
            return Tier::LongTerm;
        }
        if let Some(t) = explicit {
            return t;
        }
        match entry_type {
            EntryType::Handoff | EntryType::Progress => Tier::Ephemeral,
            EntryType::Reference => Tier::LongTerm,
            _ => Tier::Working,
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = crate::errors::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ephemeral" => Ok(Tier::Ephemeral),
            "working" => Ok(Tier::Working),
            "longterm" => Ok(Tier::LongTerm),
            other => Err(crate::errors::ValidationError::UnknownTier(other.to_string())),
        }
    }
}

/// The universal record stored by the engine (§3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Opaque short string, globally unique across hosts.
    pub id: String,
    /// Calendar day, host-local.
    pub date: NaiveDate,
    /// `HH:MM`, host-local.
    pub time: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Set semantics, stored in insertion order for display.
    pub tags: Vec<String>,
    /// Free text, up to 100 000 UTF-8 bytes.
    pub content: String,
    /// Opaque provenance string.
    pub source_file: Option<String>,
    pub tier: Tier,
    pub access_count: u64,
    pub last_accessed: Option<NaiveDate>,
    /// Pinned entries are immune to demotion and archival.
    pub pinned: bool,
    /// Archived entries are excluded from retrieval and lifecycle by default.
    pub archived: bool,
    /// Unique within `type='rule'`.
    pub label: Option<String>,
    pub project: Option<String>,
    pub session_id: Option<String>,
    pub agent_id: Option<String>,
}

pub const MAX_CONTENT_BYTES: usize = 100_000;

impl Entry {
    /// Construct a new, unarchived, unpinned (unless a rule) entry with the
    /// tier assignment rule from §4.1 already applied.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        date: NaiveDate,
        time: String,
        entry_type: EntryType,
        tags: Vec<String>,
        content: String,
        explicit_tier: Option<Tier>,
    ) -> Self {
        let tier = Tier::assign(entry_type, explicit_tier);
        let pinned = entry_type == EntryType::Rule;
        Entry {
            id,
            date,
            time,
            entry_type,
            tags,
            content,
            source_file: None,
            tier,
            access_count: 0,
            last_accessed: None,
            pinned,
            archived: false,
            label: None,
            project: None,
            session_id: None,
            agent_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), crate::errors::ValidationError> {
        if self.content.len() > MAX_CONTENT_BYTES {
            return Err(crate::errors::ValidationError::ContentTooLarge {
                max: MAX_CONTENT_BYTES,
                actual: self.content.len(),
            });
        }
        if self.entry_type == EntryType::Rule && self.label.is_none() {
            return Err(crate::errors::ValidationError::RuleMissingLabel);
        }
        Ok(())
    }

    /// Age in whole days relative to `today`, clamped to 0 for future dates
    /// (§7 "Clock skew").
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.date).num_days().max(0)
    }

    /// Idle days per §4.4 step 2: `today - coalesce(last_accessed, date)`.
    pub fn idle_days(&self, today: NaiveDate) -> i64 {
        let reference = self.last_accessed.unwrap_or(self.date);
        (today - reference).num_days().max(0)
    }
}

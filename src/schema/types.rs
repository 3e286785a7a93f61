//! Document schema definitions
//!
//! Member kinds:
//! - string, integer, float, boolean, datetime
//! - list: homogeneous list with an optional item kind
//! - dict: free-form nested object
//! - reference: id of a document of another schema

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};

/// Member names every document carries
pub const IMPLICIT_MEMBERS: [&str; 2] = ["_id", "_version"];

/// Kind of a declared member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MemberKind {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
    List {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item: Option<Box<MemberKind>>,
    },
    Dict,
    Reference {
        /// Name of the referenced schema
        schema: String,
    },
}

impl MemberKind {
    /// Returns the kind name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            MemberKind::String => "string",
            MemberKind::Integer => "integer",
            MemberKind::Float => "float",
            MemberKind::Boolean => "boolean",
            MemberKind::DateTime => "datetime",
            MemberKind::List { .. } => "list",
            MemberKind::Dict => "dict",
            MemberKind::Reference { .. } => "reference",
        }
    }
}

/// A declared member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(flatten)]
    pub kind: MemberKind,
    #[serde(default)]
    pub required: bool,
}

impl Member {
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Referenced schema name, for reference members
    pub fn reference_schema(&self) -> Option<&str> {
        match &self.kind {
            MemberKind::Reference { schema } => Some(schema),
            _ => None,
        }
    }
}

/// A document schema: name, index and ordered members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema (document class) name
    pub name: String,
    /// Explicit index name; defaults to the lowercased schema name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// Declared members in declaration order
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
            members: Vec::new(),
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Shorthand for an optional member of the given kind
    pub fn member(self, name: impl Into<String>, kind: MemberKind) -> Self {
        self.with_member(Member::new(name, kind))
    }

    /// Index name without any configured prefix
    pub fn index_name(&self) -> String {
        match &self.index {
            Some(index) => index.clone(),
            None => self.name.to_lowercase(),
        }
    }

    /// Looks up a declared member by name
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Checks that the first segment of a dotted path is a member
    pub fn has_member(&self, path: &str) -> bool {
        let head = path.split('.').next().unwrap_or(path);
        IMPLICIT_MEMBERS.contains(&head) || self.get(head).is_some()
    }

    /// Reference members in declaration order
    pub fn references(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.reference_schema().is_some())
    }

    /// Validates the schema definition itself
    pub fn validate(&self) -> SchemaResult<()> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::InvalidSchema("schema name must not be empty".into()));
        }

        let mut seen = Vec::with_capacity(self.members.len());
        for member in &self.members {
            if member.name.is_empty() || member.name.contains('.') {
                return Err(SchemaError::InvalidMember {
                    schema: self.name.clone(),
                    member: member.name.clone(),
                    reason: "member names must be non-empty and contain no '.'".into(),
                });
            }
            if IMPLICIT_MEMBERS.contains(&member.name.as_str()) || seen.contains(&member.name.as_str()) {
                return Err(SchemaError::DuplicateMember {
                    schema: self.name.clone(),
                    member: member.name.clone(),
                });
            }
            if let Some(target) = member.reference_schema() {
                if target.trim().is_empty() {
                    return Err(SchemaError::InvalidMember {
                        schema: self.name.clone(),
                        member: member.name.clone(),
                        reason: "reference must name a schema".into(),
                    });
                }
            }
            seen.push(member.name.as_str());
        }

        Ok(())
    }
}

//! Schema catalog
//!
//! Holds every known schema by name. Reference members are resolved through
//! the catalog, so a schema referenced by another must be registered too.
//! Schemas can be registered in code or loaded from a directory of
//! `*.json` files, one schema per file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// Name-indexed schema registry
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json` file in `dir`.
    pub fn load_dir(dir: &Path) -> SchemaResult<Self> {
        let mut catalog = Self::new();

        let entries = fs::read_dir(dir).map_err(|e| {
            SchemaError::malformed(dir.display().to_string(), format!("Failed to read schema directory: {}", e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(dir.display().to_string(), format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        // directory order is platform dependent
        paths.sort();

        for path in paths {
            catalog.register(Self::load_file(&path)?)?;
        }

        Ok(catalog)
    }

    /// Loads and validates a single schema file
    pub fn load_file(path: &Path) -> SchemaResult<Schema> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let schema: Schema = serde_json::from_str(&content)
            .map_err(|e| SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e)))?;

        schema.validate()?;
        Ok(schema)
    }

    /// Registers a schema; names are unique within a catalog
    pub fn register(&mut self, schema: Schema) -> SchemaResult<()> {
        schema.validate()?;
        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::DuplicateSchema(schema.name));
        }
        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MemberKind;
    use tempfile::TempDir;

    #[test]
    fn test_register_and_get() {
        let mut catalog = SchemaCatalog::new();
        catalog.register(Schema::new("User").member("name", MemberKind::String)).unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("User").is_some());
        assert!(catalog.get("Post").is_none());
    }

    #[test]
    fn test_duplicate_schema_rejected() {
        let mut catalog = SchemaCatalog::new();
        catalog.register(Schema::new("User")).unwrap();
        let err = catalog.register(Schema::new("User")).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateSchema("User".into()));
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let mut catalog = SchemaCatalog::new();
        assert!(catalog.register(Schema::new("  ")).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("user.json"),
            r#"{"name": "User", "members": [{"name": "email", "type": "string"}]}"#,
        )
        .unwrap();
        fs::write(
            tmp.path().join("post.json"),
            r#"{"name": "Post", "members": [{"name": "author", "type": "reference", "schema": "User"}]}"#,
        )
        .unwrap();
        fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let catalog = SchemaCatalog::load_dir(tmp.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("Post").unwrap().has_member("author"));
    }

    #[test]
    fn test_load_malformed_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let err = SchemaCatalog::load_file(&path).unwrap_err();
        assert_eq!(err.code(), "DOCQUERY_SCHEMA_MALFORMED");
    }
}

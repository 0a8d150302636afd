use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AnnotateError;
use crate::utils::parse_color;

/// Fallback display color for labels without a parsable color entry.
pub const DEFAULT_COLOR: image::Rgb<u8> = image::Rgb([255, 255, 255]);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Ordered, immutable list of class labels and their display colors.
///
/// The order is significant: a stored annotation references its label by
/// index, and CSV files reference it by name. Both directions must resolve
/// against the same schema instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSchema {
    pub labels: Vec<LabelDefinition>,
}

impl Default for LabelSchema {
    fn default() -> Self {
        // HER2 membrane staining classes.
        Self {
            labels: vec![
                LabelDefinition {
                    name: "Completa 3+".to_string(),
                    color: Some("#ff0000".to_string()),
                },
                LabelDefinition {
                    name: "Completa 2+".to_string(),
                    color: Some("#ffa500".to_string()),
                },
                LabelDefinition {
                    name: "Completa 1+".to_string(),
                    color: Some("#ffff00".to_string()),
                },
                LabelDefinition {
                    name: "Incompleta 2+".to_string(),
                    color: Some("#008000".to_string()),
                },
                LabelDefinition {
                    name: "Incompleta 1+".to_string(),
                    color: Some("#0000ff".to_string()),
                },
                LabelDefinition {
                    name: "Ausente".to_string(),
                    color: Some("#808080".to_string()),
                },
            ],
        }
    }
}

impl LabelSchema {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label name for an index, if the index is in range.
    pub fn name(&self, id: usize) -> Option<&str> {
        self.labels.get(id).map(|l| l.name.as_str())
    }

    /// Resolve a label name back to its index.
    ///
    /// This is the validation step applied to every CSV row on rehydration;
    /// a name not present in the schema is a hard error, never a silent
    /// default index.
    pub fn index_of(&self, name: &str) -> Result<usize, AnnotateError> {
        self.labels
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| AnnotateError::UnknownLabel(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.name.as_str()).collect()
    }

    /// Display color for a label index, falling back to white.
    pub fn color(&self, id: usize) -> image::Rgb<u8> {
        self.labels
            .get(id)
            .and_then(|l| l.color.as_deref())
            .and_then(parse_color)
            .unwrap_or(DEFAULT_COLOR)
    }

    pub fn colors(&self) -> Vec<image::Rgb<u8>> {
        (0..self.labels.len()).map(|id| self.color(id)).collect()
    }
}

/// Load the label schema from YAML.
pub fn load_schema(path: Option<&str>) -> LabelSchema {
    // Preferred search order:
    //   1) explicit path (if provided)
    //   2) ./labels.yaml in the working directory
    //   3) ~/.config/pathoscore/labels.yaml
    let mut search_paths: Vec<String> = Vec::new();
    if let Some(p) = path {
        search_paths.push(p.to_string());
    }
    search_paths.push("./labels.yaml".to_string());
    search_paths.push("~/.config/pathoscore/labels.yaml".to_string());

    for candidate in search_paths {
        let expanded = shellexpand::tilde(&candidate);
        let path_obj = Path::new(expanded.as_ref());
        if !path_obj.exists() {
            continue;
        }

        match try_load_schema_file(path_obj) {
            Ok(schema) => return schema,
            Err(e) => tracing::warn!("failed to parse label schema '{}': {e}", path_obj.display()),
        }
    }

    // As a final fallback, use the bundled schema at compile time
    if let Ok(schema) = parse_schema_content(include_str!("../labels.yaml")) {
        return schema;
    }

    tracing::warn!("no label schema found; using built-in defaults");
    LabelSchema::default()
}

fn try_load_schema_file(path: &Path) -> Result<LabelSchema, AnnotateError> {
    let content = std::fs::read_to_string(path).map_err(|e| AnnotateError::io_at(path, e))?;
    parse_schema_content(&content)
}

/// Parse schema YAML, accepting either a bare label array or a full LabelSchema
fn parse_schema_content(content: &str) -> Result<LabelSchema, AnnotateError> {
    if let Ok(labels) = serde_yaml::from_str::<Vec<LabelDefinition>>(content) {
        return Ok(LabelSchema { labels });
    }

    match serde_yaml::from_str::<LabelSchema>(content) {
        Ok(schema) if !schema.labels.is_empty() => Ok(schema),
        Ok(_) => Err(AnnotateError::Schema("schema has no labels".to_string())),
        Err(e) => Err(AnnotateError::Schema(format!("yaml parse error: {e}"))),
    }
}

/// Save the label schema to a YAML file, creating parent directories.
pub fn save_schema(schema: &LabelSchema, path: &str) -> Result<(), AnnotateError> {
    let expanded = shellexpand::tilde(path);
    let path = Path::new(expanded.as_ref());

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AnnotateError::io_at(parent, e))?;
    }

    let yaml = serde_yaml::to_string(schema)
        .map_err(|e| AnnotateError::Schema(format!("serialize failed: {e}")))?;
    std::fs::write(path, yaml).map_err(|e| AnnotateError::io_at(path, e))?;

    Ok(())
}

/// Create a default labels.yaml in the user config directory.
pub fn create_default_schema_file() -> Result<String, AnnotateError> {
    let config_dir = directories::ProjectDirs::from("", "", "pathoscore")
        .ok_or_else(|| AnnotateError::Schema("cannot determine config directory".to_string()))?
        .config_dir()
        .to_path_buf();

    let schema_path = config_dir.join("labels.yaml");
    save_schema(
        &LabelSchema::default(),
        &schema_path.to_string_lossy(),
    )?;

    Ok(schema_path.to_string_lossy().to_string())
}

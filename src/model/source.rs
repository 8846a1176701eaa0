use crate::foundation::error::{CodegenError, CodegenResult};
use crate::foundation::ids::ObjectId;
use crate::model::object::ObjectDef;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An object table plus the root visual it describes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The root visual.
    pub root: ObjectId,
    /// Object table; an [`ObjectId`] indexes into it.
    pub objects: Vec<ObjectDef>,
}

impl Document {
    /// Looks an object up, failing with a precondition violation when the id is out of range.
    pub fn get(&self, id: ObjectId) -> CodegenResult<&ObjectDef> {
        self.objects.get(id.index()).ok_or_else(|| {
            CodegenError::precondition(format!(
                "object {id} is out of range (table has {} entries)",
                self.objects.len()
            ))
        })
    }
}

/// One output variant, usually one per minimum platform API version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDef {
    /// Minimum API version the variant targets.
    #[serde(default = "default_api_version")]
    pub api_version: u32,
    /// The graph of this variant.
    #[serde(flatten)]
    pub document: Document,
}

/// A complete generator input: one class with one or more variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDef {
    /// Name of the generated source class.
    pub class_name: String,
    /// Namespace the class lives in.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Variants, in ascending API version order.
    pub variants: Vec<VariantDef>,
}

fn default_api_version() -> u32 {
    7
}

fn default_namespace() -> String {
    "AnimatedVisuals".to_owned()
}

impl SourceDef {
    /// Parse a source from a JSON reader.
    pub fn from_reader(reader: impl std::io::Read) -> CodegenResult<Self> {
        serde_json::from_reader(reader).map_err(|e| CodegenError::serde(e.to_string()))
    }

    /// Parse a source from a JSON string.
    pub fn from_json_str(s: &str) -> CodegenResult<Self> {
        serde_json::from_str(s).map_err(|e| CodegenError::serde(e.to_string()))
    }

    /// Load a source from a JSON file.
    pub fn from_path(path: &Path) -> CodegenResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            CodegenError::Other(anyhow::Error::new(e).context(format!("open {}", path.display())))
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }
}

/// Target language of the emitted code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// C#.
    #[default]
    #[serde(rename = "csharp")]
    CSharp,
    /// C++/WinRT.
    Cppwinrt,
}

/// Generation switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenOpts {
    /// Target language.
    pub target: Target,
    /// Let objects carrying a comment take part in canonicalization.
    pub ignore_comments: bool,
    /// Always call factories and let each storing factory guard itself.
    pub disable_field_optimization: bool,
    /// Plan and emit variants in parallel.
    pub parallel: bool,
}

impl Default for CodegenOpts {
    fn default() -> Self {
        Self {
            target: Target::CSharp,
            ignore_comments: false,
            disable_field_optimization: false,
            parallel: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/source.rs"]
mod tests;

//! Describe types.
//!
//! Only the parts of the SObject describe payload that the facade reads are
//! typed. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// SObject describe result (`sobjects/{sobject}/describe`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DescribeSObjectResult {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub custom: bool,
    #[serde(default)]
    pub fields: Vec<FieldDescribe>,
}

impl DescribeSObjectResult {
    /// Look up a field by API name.
    pub fn field(&self, name: &str) -> Option<&FieldDescribe> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Field metadata from a describe result.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldDescribe {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default)]
    pub nillable: bool,
    #[serde(rename = "picklistValues", default)]
    pub picklist_values: Vec<PicklistValue>,
}

/// Picklist value for picklist fields.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PicklistValue {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(rename = "defaultValue", default)]
    pub default_value: bool,
    #[serde(rename = "validFor", default)]
    pub valid_for: Option<String>,
}

fn default_true() -> bool {
    true
}

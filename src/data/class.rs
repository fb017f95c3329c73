use crate::data::ResourceId;
use serde::Deserialize;

pub const UNKNOWN_CLASS_LABEL: &str = "Non spécifiée";

#[derive(Debug, Clone, Deserialize)]
pub struct ClassInfo {
    pub id: ResourceId,
    pub niveau: String,
}

/// The `niveau` of the class with `class_id`, or [`UNKNOWN_CLASS_LABEL`] if that class isn't
/// loaded.
pub fn class_name<'a>(classes: &'a [ClassInfo], class_id: Option<&ResourceId>) -> &'a str {
    class_id
        .and_then(|class_id| classes.iter().find(|class| &class.id == class_id))
        .map_or(UNKNOWN_CLASS_LABEL, |class| class.niveau.as_str())
}

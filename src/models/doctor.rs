use serde::{Deserialize, Serialize};

/// A doctor record as presented in the directory.
///
/// Read-only reference data: the session core never mutates these.
/// `available_slots` are free-form display labels, not structured times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub rating: f32,
    pub reviews: u32,
    pub location: String,
    pub available_slots: Vec<String>,
    pub experience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

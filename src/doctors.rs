//! Doctor directory — fixed catalog listing and the chat-keyed
//! recommendation contract.
//!
//! The recommendation policy is deliberately content-independent: the
//! first `RECOMMENDED_COUNT` catalog entries are returned for any chat
//! history. Real matching logic is out of scope; the interface exists so
//! a future backend can slot in behind the same trait. The input is the
//! lossy content-only history hand-off (no sender attribution).

use async_trait::async_trait;

use crate::gateway::{GatewayError, LatencyProfile};
use crate::models::Doctor;

/// How many catalog entries the stub recommendation returns.
pub const RECOMMENDED_COUNT: usize = 3;

/// Contract for listing and recommending doctors.
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    /// Full catalog in stable insertion order.
    async fn list_all(&self) -> Result<Vec<Doctor>, GatewayError>;

    /// Subset keyed by an ordered list of chat message contents.
    async fn recommend(&self, chat_history: &[String]) -> Result<Vec<Doctor>, GatewayError>;

    /// Look up a single doctor by id.
    async fn find(&self, id: &str) -> Result<Option<Doctor>, GatewayError>;
}

/// In-memory directory over the fixed demo catalog.
pub struct StaticDirectory {
    catalog: Vec<Doctor>,
    list_latency: LatencyProfile,
    recommend_latency: LatencyProfile,
}

impl StaticDirectory {
    /// Demo timing: 500 ms per listing, 800 ms per recommendation.
    pub fn new() -> Self {
        Self {
            catalog: seed_catalog(),
            list_latency: LatencyProfile::FixedMs(500),
            recommend_latency: LatencyProfile::FixedMs(800),
        }
    }

    /// Zero latency, for tests.
    pub fn instant() -> Self {
        Self {
            catalog: seed_catalog(),
            list_latency: LatencyProfile::None,
            recommend_latency: LatencyProfile::None,
        }
    }
}

impl Default for StaticDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DoctorDirectory for StaticDirectory {
    async fn list_all(&self) -> Result<Vec<Doctor>, GatewayError> {
        self.list_latency.wait().await;
        Ok(self.catalog.clone())
    }

    async fn recommend(&self, chat_history: &[String]) -> Result<Vec<Doctor>, GatewayError> {
        self.recommend_latency.wait().await;
        tracing::debug!(
            history_len = chat_history.len(),
            "Returning stub recommendations"
        );
        Ok(self
            .catalog
            .iter()
            .take(RECOMMENDED_COUNT)
            .cloned()
            .collect())
    }

    async fn find(&self, id: &str) -> Result<Option<Doctor>, GatewayError> {
        self.list_latency.wait().await;
        Ok(self.catalog.iter().find(|d| d.id == id).cloned())
    }
}

/// The fixed demo catalog. Order matters: recommendations are the first
/// three entries.
fn seed_catalog() -> Vec<Doctor> {
    vec![
        Doctor {
            id: "1".into(),
            name: "Dr. Sarah Johnson".into(),
            specialty: "Cardiologist".into(),
            rating: 4.9,
            reviews: 127,
            location: "Manhattan Medical Center".into(),
            available_slots: vec![
                "Today 2:00 PM".into(),
                "Today 4:30 PM".into(),
                "Tomorrow 10:00 AM".into(),
                "Tomorrow 2:00 PM".into(),
            ],
            experience: "15+ years".into(),
            image: None,
        },
        Doctor {
            id: "2".into(),
            name: "Dr. Michael Chen".into(),
            specialty: "Dermatologist".into(),
            rating: 4.8,
            reviews: 89,
            location: "Downtown Skin Clinic".into(),
            available_slots: vec![
                "Today 3:00 PM".into(),
                "Tomorrow 9:00 AM".into(),
                "Tomorrow 1:00 PM".into(),
                "Wed 11:00 AM".into(),
            ],
            experience: "12+ years".into(),
            image: None,
        },
        Doctor {
            id: "3".into(),
            name: "Dr. Emily Rodriguez".into(),
            specialty: "General Practitioner".into(),
            rating: 4.9,
            reviews: 156,
            location: "Central Health Clinic".into(),
            available_slots: vec![
                "Today 1:00 PM".into(),
                "Today 5:00 PM".into(),
                "Tomorrow 8:00 AM".into(),
                "Tomorrow 3:00 PM".into(),
            ],
            experience: "18+ years".into(),
            image: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_all_is_order_stable() {
        let dir = StaticDirectory::instant();
        let first = dir.list_all().await.unwrap();
        let second = dir.list_all().await.unwrap();

        let ids: Vec<&str> = first.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(
            second.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(),
            ids
        );
    }

    #[tokio::test]
    async fn recommend_returns_first_three_regardless_of_history() {
        let dir = StaticDirectory::instant();

        let for_headache = dir
            .recommend(&["I have a headache".to_string()])
            .await
            .unwrap();
        let for_rash = dir
            .recommend(&["rash on my arm".to_string(), "it itches".to_string()])
            .await
            .unwrap();

        assert_eq!(for_headache.len(), RECOMMENDED_COUNT);
        let ids: Vec<&str> = for_headache.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(
            for_rash.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(),
            ids
        );
    }

    #[tokio::test]
    async fn find_known_and_unknown() {
        let dir = StaticDirectory::instant();

        let found = dir.find("2").await.unwrap();
        assert_eq!(found.unwrap().name, "Dr. Michael Chen");

        assert!(dir.find("99").await.unwrap().is_none());
    }
}

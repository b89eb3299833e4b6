//! In-memory analysis repository implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::error::DomainError;
use crate::domain::identity::CallerIdentity;
use crate::domain::quiz::{AnalysisRepository, StoredAnalysis};

/// In-memory implementation of AnalysisRepository, keyed by (owner, quiz id)
#[derive(Debug, Default)]
pub struct InMemoryAnalysisRepository {
    analyses: Arc<RwLock<HashMap<(String, String), StoredAnalysis>>>,
}

impl InMemoryAnalysisRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn owned_by<'a>(
    analyses: &'a HashMap<(String, String), StoredAnalysis>,
    owner: &'a CallerIdentity,
) -> impl Iterator<Item = &'a StoredAnalysis> {
    analyses.values().filter(move |a| a.is_owned_by(owner))
}

#[async_trait]
impl AnalysisRepository for InMemoryAnalysisRepository {
    async fn save(&self, analysis: StoredAnalysis) -> Result<StoredAnalysis, DomainError> {
        let mut analyses = self.analyses.write().await;
        let key = (analysis.owner.clone(), analysis.result.quiz_id.clone());

        analyses.insert(key, analysis.clone());
        Ok(analysis)
    }

    async fn find(
        &self,
        owner: &CallerIdentity,
        quiz_id: &str,
    ) -> Result<Option<StoredAnalysis>, DomainError> {
        let analyses = self.analyses.read().await;
        let key = (owner.as_key_segment().to_string(), quiz_id.to_string());

        Ok(analyses.get(&key).cloned())
    }

    async fn list_by_owner(
        &self,
        owner: &CallerIdentity,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<StoredAnalysis>, DomainError> {
        let analyses = self.analyses.read().await;

        let mut owned: Vec<StoredAnalysis> = owned_by(&analyses, owner).cloned().collect();
        owned.sort_by(|a, b| {
            b.stored_at
                .cmp(&a.stored_at)
                .then_with(|| a.result.quiz_id.cmp(&b.result.quiz_id))
        });

        Ok(owned.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_by_owner(&self, owner: &CallerIdentity) -> Result<usize, DomainError> {
        let analyses = self.analyses.read().await;
        Ok(owned_by(&analyses, owner).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::domain::quiz::{QuizAnalysisResult, TopicPerformance};

    fn stored(owner: &CallerIdentity, quiz_id: &str, minutes_ago: i64) -> StoredAnalysis {
        let result = QuizAnalysisResult::build(
            quiz_id,
            vec![TopicPerformance::new("Algebra", 4, 1)],
            vec![],
        );
        let mut analysis = StoredAnalysis::new(owner, result);
        analysis.stored_at = Utc::now() - Duration::minutes(minutes_ago);
        analysis
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = InMemoryAnalysisRepository::new();
        let user = CallerIdentity::user("u-1");

        repo.save(stored(&user, "q-1", 0)).await.unwrap();

        let found = repo.find(&user, "q-1").await.unwrap().unwrap();
        assert_eq!(found.result.quiz_id, "q-1");
        assert!(repo.find(&user, "q-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_analyses_are_scoped_to_owner() {
        let repo = InMemoryAnalysisRepository::new();
        let alice = CallerIdentity::user("alice");
        let bob = CallerIdentity::user("bob");

        repo.save(stored(&alice, "q-1", 0)).await.unwrap();

        assert!(repo.find(&bob, "q-1").await.unwrap().is_none());
        assert!(repo.find(&CallerIdentity::Anonymous, "q-1").await.unwrap().is_none());
        assert_eq!(repo.count_by_owner(&bob).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_replaces_previous_analysis() {
        let repo = InMemoryAnalysisRepository::new();
        let user = CallerIdentity::user("u-1");

        repo.save(stored(&user, "q-1", 10)).await.unwrap();
        repo.save(stored(&user, "q-1", 0)).await.unwrap();

        assert_eq!(repo.count_by_owner(&user).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_pagination() {
        let repo = InMemoryAnalysisRepository::new();
        let user = CallerIdentity::user("u-1");

        repo.save(stored(&user, "oldest", 30)).await.unwrap();
        repo.save(stored(&user, "newest", 1)).await.unwrap();
        repo.save(stored(&user, "middle", 10)).await.unwrap();

        let page: Vec<String> = repo
            .list_by_owner(&user, 2, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.result.quiz_id)
            .collect();
        assert_eq!(page, vec!["newest", "middle"]);

        let rest = repo.list_by_owner(&user, 2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].result.quiz_id, "oldest");

        let latest = repo.latest(&user).await.unwrap().unwrap();
        assert_eq!(latest.result.quiz_id, "newest");
    }
}

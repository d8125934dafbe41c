use crate::error::{GitHubSearchError, Result};
use crate::models::Repository;
use std::collections::hash_map::{Entry, HashMap};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort, SpawnErr};
use tokio::task::JoinHandle;

/// The favorites set itself, keyed by repository id, in insertion order.
#[derive(Debug, Default, Clone)]
pub struct Favorites {
    by_id: HashMap<i64, Repository>,
    order: Vec<i64>,
}

impl Favorites {
    pub fn list(&self) -> Vec<Repository> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id).cloned())
            .collect()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn add(&mut self, repo: Repository) -> Result<()> {
        match self.by_id.entry(repo.id()) {
            Entry::Occupied(_) => Err(GitHubSearchError::DuplicateFavorite(repo.id())),
            Entry::Vacant(slot) => {
                self.order.push(repo.id());
                slot.insert(repo);
                Ok(())
            }
        }
    }

    /// Returns whether an entry was removed.
    pub fn remove(&mut self, id: i64) -> bool {
        if self.by_id.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|existing| *existing != id);
        true
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Single writer that owns the [`Favorites`] set
pub struct FavoritesActor;

/// Messages the favorites actor can handle
#[derive(Debug)]
pub enum FavoritesMessage {
    /// Insert a repository, failing on a duplicate id
    Add(Repository, RpcReplyPort<Result<()>>),
    /// Remove by id, replying whether anything was removed
    Remove(i64, RpcReplyPort<bool>),
    /// Snapshot of the current favorites
    List(RpcReplyPort<Vec<Repository>>),
    /// Number of favorites
    Count(RpcReplyPort<usize>),
}

#[ractor::async_trait]
impl Actor for FavoritesActor {
    type Msg = FavoritesMessage;
    type State = Favorites;
    type Arguments = ();

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        _args: Self::Arguments,
    ) -> std::result::Result<Self::State, ActorProcessingErr> {
        Ok(Favorites::default())
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> std::result::Result<(), ActorProcessingErr> {
        // A dropped reply port only means the caller gave up waiting.
        match message {
            FavoritesMessage::Add(repo, reply) => {
                let _ = reply.send(state.add(repo));
            }
            FavoritesMessage::Remove(id, reply) => {
                let _ = reply.send(state.remove(id));
            }
            FavoritesMessage::List(reply) => {
                let _ = reply.send(state.list());
            }
            FavoritesMessage::Count(reply) => {
                let _ = reply.send(state.len());
            }
        }
        Ok(())
    }
}

/// Cloneable handle to the favorites actor.
#[derive(Clone)]
pub struct FavoritesStore {
    actor: ActorRef<FavoritesMessage>,
}

impl FavoritesStore {
    /// Spawn a fresh, empty favorites actor.
    pub async fn spawn() -> std::result::Result<(Self, JoinHandle<()>), SpawnErr> {
        let (actor, handle) = Actor::spawn(None, FavoritesActor, ()).await?;
        Ok((FavoritesStore { actor }, handle))
    }

    pub async fn list(&self) -> Result<Vec<Repository>> {
        self.call(FavoritesMessage::List).await
    }

    pub async fn add(&self, repo: Repository) -> Result<()> {
        self.call(|reply| FavoritesMessage::Add(repo, reply)).await?
    }

    pub async fn remove(&self, id: i64) -> Result<bool> {
        self.call(|reply| FavoritesMessage::Remove(id, reply)).await
    }

    pub async fn len(&self) -> Result<usize> {
        self.call(FavoritesMessage::Count).await
    }

    /// Stop the actor. Pending and later calls fail with `StoreUnavailable`.
    pub fn stop(&self) {
        self.actor.stop(None);
    }

    async fn call<T, F>(&self, msg_builder: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(RpcReplyPort<T>) -> FavoritesMessage,
    {
        match self.actor.call(msg_builder, None).await {
            Ok(ractor::rpc::CallResult::Success(value)) => Ok(value),
            Ok(ractor::rpc::CallResult::Timeout) => Err(GitHubSearchError::StoreUnavailable(
                "Timed out waiting for favorites actor".to_string(),
            )),
            Ok(ractor::rpc::CallResult::SenderError) => Err(GitHubSearchError::StoreUnavailable(
                "Favorites actor dropped the reply".to_string(),
            )),
            Err(e) => Err(GitHubSearchError::StoreUnavailable(format!(
                "Failed to contact favorites actor: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn repo(id: i64) -> Repository {
        Repository::new(id, format!("repo-{}", id), "", format!("https://github.com/o/{}", id), 1, 1, 1)
            .unwrap()
    }

    fn ids(repos: &[Repository]) -> Vec<i64> {
        repos.iter().map(Repository::id).collect()
    }

    #[test]
    fn test_add_and_list() {
        let mut favorites = Favorites::default();
        favorites.add(repo(1)).unwrap();
        favorites.add(repo(2)).unwrap();
        assert_eq!(ids(&favorites.list()), vec![1, 2]);
        assert_eq!(favorites.len(), 2);
    }

    #[test]
    fn test_duplicate_add_leaves_set_unchanged() {
        let mut favorites = Favorites::default();
        favorites.add(repo(1)).unwrap();

        let mut changed = repo(1);
        changed.update_metrics("changed", 500, 500, 500);
        let result = favorites.add(changed);

        assert!(matches!(result, Err(GitHubSearchError::DuplicateFavorite(1))));
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites.list()[0].stars(), 1);
    }

    #[test]
    fn test_list_keeps_insertion_order_after_removal() {
        let mut favorites = Favorites::default();
        for id in [5, 1, 9, 3] {
            favorites.add(repo(id)).unwrap();
        }
        assert!(favorites.remove(1));
        favorites.add(repo(1)).unwrap();

        assert_eq!(ids(&favorites.list()), vec![5, 9, 3, 1]);
        assert!(favorites.contains(9));
        assert!(!favorites.contains(2));
        assert_eq!(favorites.len(), 4);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut favorites = Favorites::default();
        favorites.add(repo(1)).unwrap();
        assert!(!favorites.remove(999));
        assert_eq!(ids(&favorites.list()), vec![1]);
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let mut favorites = Favorites::default();
        favorites.add(repo(1)).unwrap();
        favorites.add(repo(2)).unwrap();
        let before = favorites.list();

        favorites.add(repo(3)).unwrap();
        assert!(favorites.remove(3));

        assert_eq!(ids(&favorites.list()), ids(&before));
    }

    #[tokio::test]
    async fn test_store_round_trip_through_actor() {
        let (store, handle) = FavoritesStore::spawn().await.unwrap();

        store.add(repo(10)).await.unwrap();
        let listed = store.list().await.unwrap();
        assert_eq!(ids(&listed), vec![10]);

        let duplicate = store.add(repo(10)).await;
        assert!(matches!(duplicate, Err(GitHubSearchError::DuplicateFavorite(10))));

        assert!(store.remove(10).await.unwrap());
        assert!(!store.remove(10).await.unwrap());
        assert_eq!(store.len().await.unwrap(), 0);

        store.stop();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_adds_admit_exactly_one() {
        let (store, handle) = FavoritesStore::spawn().await.unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..32 {
            let store = store.clone();
            tasks.spawn(async move { store.add(repo(42)).await });
        }

        let mut succeeded = 0;
        let mut duplicates = 0;
        while let Some(result) = tasks.join_next().await {
            match result.unwrap() {
                Ok(()) => succeeded += 1,
                Err(GitHubSearchError::DuplicateFavorite(42)) => duplicates += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(succeeded, 1);
        assert_eq!(duplicates, 31);
        assert_eq!(ids(&store.list().await.unwrap()), vec![42]);

        store.stop();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_calls_after_stop_report_unavailable() {
        let (store, handle) = FavoritesStore::spawn().await.unwrap();
        store.stop();
        handle.await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let result = store.list().await;
        assert!(matches!(result, Err(GitHubSearchError::StoreUnavailable(_))));
    }
}

use std::{marker::PhantomData, sync::Arc};

use models::{Document, new_id};

use crate::database::{DocumentStore, StoreError};

/// Typed view over one collection of the document store.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _document: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _document: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _document: PhantomData,
        }
    }

    pub async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        self.store
            .list(T::COLLECTION)
            .await?
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(StoreError::from))
            .collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>, StoreError> {
        self.store
            .get(T::COLLECTION, id)
            .await?
            .map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::from)
    }

    pub async fn find_where<F>(&self, predicate: F) -> Result<Vec<T>, StoreError>
    where
        F: Fn(&T) -> bool + Send,
    {
        let mut documents = self.find_all().await?;
        documents.retain(|document| predicate(document));

        Ok(documents)
    }

    pub async fn find_one_where<F>(&self, predicate: F) -> Result<Option<T>, StoreError>
    where
        F: Fn(&T) -> bool + Send,
    {
        Ok(self.find_all().await?.into_iter().find(|document| predicate(document)))
    }

    pub async fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        self.store.exists(T::COLLECTION, id).await
    }

    pub async fn exists_where<F>(&self, predicate: F) -> Result<bool, StoreError>
    where
        F: Fn(&T) -> bool + Send,
    {
        Ok(self.find_one_where(predicate).await?.is_some())
    }

    /// Inserts or replaces `document`, assigning an id on first save.
    pub async fn save(&self, mut document: T) -> Result<T, StoreError> {
        let existing = document
            .id()
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let id = match existing {
            Some(id) => id,
            None => {
                let id = new_id();
                document.set_id(id.clone());
                id
            }
        };

        self.store
            .put(T::COLLECTION, &id, serde_json::to_value(&document)?)
            .await?;

        Ok(document)
    }

    /// Stores `document` under a fresh id, ignoring any id it arrived with.
    pub async fn insert(&self, mut document: T) -> Result<T, StoreError> {
        document.set_id(new_id());
        self.save(document).await
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(T::COLLECTION, id).await
    }
}

#[cfg(test)]
mod tests {
    use models::{Bookmark, Post};

    use super::*;
    use crate::database::MemoryStore;

    fn posts() -> Collection<Post> {
        Collection::new(Arc::new(MemoryStore::default()))
    }

    fn post(user_id: &str, cuisine: &str) -> Post {
        serde_json::from_value(serde_json::json!({
            "userId": user_id,
            "cuisineType": cuisine,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn save_assigns_id_once() {
        let posts = posts();

        let saved = posts.save(post("u1", "Thai")).await.unwrap();
        let id = saved.id.clone().unwrap();
        let resaved = posts.save(saved).await.unwrap();

        assert_eq!(resaved.id.as_deref(), Some(id.as_str()));
        assert_eq!(posts.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insert_never_reuses_an_incoming_id() {
        let posts = posts();
        let first = posts.insert(post("u1", "Thai")).await.unwrap();

        let mut copy = post("u2", "Greek");
        copy.id = first.id.clone();
        let second = posts.insert(copy).await.unwrap();

        assert_ne!(second.id, first.id);
        assert_eq!(posts.find_all().await.unwrap().len(), 2);
        let original = posts
            .find_by_id(first.id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(original.user_id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn derived_queries_filter_in_creation_order() {
        let posts = posts();
        posts.save(post("u1", "Thai")).await.unwrap();
        posts.save(post("u2", "Thai")).await.unwrap();
        posts.save(post("u1", "Greek")).await.unwrap();

        let mine = posts
            .find_where(|p| p.user_id.as_deref() == Some("u1"))
            .await
            .unwrap();

        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].cuisine_type.as_deref(), Some("Thai"));
        assert_eq!(mine[1].cuisine_type.as_deref(), Some("Greek"));
        assert!(
            posts
                .exists_where(|p| p.cuisine_type.as_deref() == Some("Greek"))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn collections_do_not_share_documents() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::default());
        let posts: Collection<Post> = Collection::new(store.clone());
        let bookmarks: Collection<Bookmark> = Collection::new(store);

        let saved = posts.save(post("u1", "Thai")).await.unwrap();
        let id = saved.id.unwrap();

        assert!(bookmarks.find_by_id(&id).await.unwrap().is_none());
        assert!(posts.delete_by_id(&id).await.unwrap());
        assert!(!posts.exists_by_id(&id).await.unwrap());
    }
}

//! In-memory account store.

use crate::error::{AuthError, Result};
use crate::providers::AccountStore;
use crate::state::{IdentityLink, Platform, PlatformConnection, Profile, SsoProvider, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory account store.
///
/// Records are held in plain `HashMap`s behind a mutex. Intended for tests;
/// tokens are stored exactly as given (the service layer encrypts before
/// they get here, so this still exercises encryption at rest).
#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    inner: Arc<Mutex<Records>>,
}

#[derive(Default)]
struct Records {
    profiles: HashMap<UserId, Profile>,
    links: HashMap<(UserId, SsoProvider), IdentityLink>,
    subject_index: HashMap<(SsoProvider, String), UserId>,
    connections: HashMap<(UserId, Platform), PlatformConnection>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[allow(clippy::unwrap_used)] // Test mock: mutex poisoning is a test failure
impl AccountStore for MemoryAccountStore {
    async fn put_profile(&self, profile: &Profile) -> Result<()> {
        let mut records = self.inner.lock().unwrap();
        records
            .profiles
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>> {
        let records = self.inner.lock().unwrap();
        Ok(records.profiles.get(user_id).cloned())
    }

    async fn put_identity_link(&self, link: &IdentityLink) -> Result<()> {
        let mut records = self.inner.lock().unwrap();
        records
            .links
            .insert((link.user_id.clone(), link.provider), link.clone());
        records.subject_index.insert(
            (link.provider, link.subject_id.clone()),
            link.user_id.clone(),
        );
        Ok(())
    }

    async fn find_identity_by_subject(
        &self,
        provider: SsoProvider,
        subject_id: &str,
    ) -> Result<Option<IdentityLink>> {
        let records = self.inner.lock().unwrap();
        let user_id = records
            .subject_index
            .get(&(provider, subject_id.to_string()));

        Ok(user_id.and_then(|id| records.links.get(&(id.clone(), provider)).cloned()))
    }

    async fn list_identity_links(&self, user_id: &UserId) -> Result<Vec<IdentityLink>> {
        let records = self.inner.lock().unwrap();
        Ok(records
            .links
            .values()
            .filter(|link| &link.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn put_connection(&self, connection: &PlatformConnection) -> Result<()> {
        let mut records = self.inner.lock().unwrap();
        records.connections.insert(
            (connection.user_id.clone(), connection.platform),
            connection.clone(),
        );
        Ok(())
    }

    async fn get_connection(
        &self,
        user_id: &UserId,
        platform: Platform,
    ) -> Result<Option<PlatformConnection>> {
        let records = self.inner.lock().unwrap();
        Ok(records
            .connections
            .get(&(user_id.clone(), platform))
            .cloned())
    }

    async fn list_connections(&self, user_id: &UserId) -> Result<Vec<PlatformConnection>> {
        let records = self.inner.lock().unwrap();
        Ok(records
            .connections
            .values()
            .filter(|connection| &connection.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_connection_tokens(
        &self,
        user_id: &UserId,
        platform: Platform,
        access_token: String,
        refresh_token: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut records = self.inner.lock().unwrap();
        let connection = records
            .connections
            .get_mut(&(user_id.clone(), platform))
            .ok_or_else(|| AuthError::StorageError("connection not found".to_string()))?;

        connection.access_token = access_token;
        if let Some(rotated) = refresh_token {
            connection.refresh_token = Some(rotated);
        }
        connection.expires_at = expires_at;
        connection.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_connection(&self, user_id: &UserId, platform: Platform) -> Result<()> {
        let mut records = self.inner.lock().unwrap();
        records.connections.remove(&(user_id.clone(), platform));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn link(user_id: &UserId, subject_id: &str) -> IdentityLink {
        IdentityLink {
            user_id: user_id.clone(),
            provider: SsoProvider::Google,
            subject_id: subject_id.to_string(),
            email: "test@example.com".to_string(),
            linked_at: Utc::now(),
        }
    }

    fn connection(user_id: &UserId, platform: Platform) -> PlatformConnection {
        PlatformConnection {
            user_id: user_id.clone(),
            platform,
            platform_user_id: "platform_user".to_string(),
            display_name: None,
            access_token: "encrypted_access".to_string(),
            refresh_token: Some("encrypted_refresh".to_string()),
            expires_at: Utc::now() + chrono::Duration::hours(1),
            scope: "streaming".to_string(),
            connected_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_subject_index_resolves_account() {
        let store = MemoryAccountStore::new();
        let user_id = UserId::generate();

        store.put_identity_link(&link(&user_id, "sub_1")).await.unwrap();

        let found = store
            .find_identity_by_subject(SsoProvider::Google, "sub_1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.user_id, user_id);

        let missing = store
            .find_identity_by_subject(SsoProvider::Google, "sub_2")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_connection_lifecycle() {
        let store = MemoryAccountStore::new();
        let user_id = UserId::generate();

        store
            .put_connection(&connection(&user_id, Platform::Spotify))
            .await
            .unwrap();

        let stored = store
            .get_connection(&user_id, Platform::Spotify)
            .await
            .unwrap();
        assert!(stored.is_some());

        store
            .update_connection_tokens(
                &user_id,
                Platform::Spotify,
                "new_encrypted_access".to_string(),
                None,
                Utc::now() + chrono::Duration::hours(2),
            )
            .await
            .unwrap();

        let updated = store
            .get_connection(&user_id, Platform::Spotify)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.access_token, "new_encrypted_access");
        // Refresh token untouched when no rotation happened
        assert_eq!(
            updated.refresh_token,
            Some("encrypted_refresh".to_string())
        );

        store
            .delete_connection(&user_id, Platform::Spotify)
            .await
            .unwrap();
        assert!(
            store
                .get_connection(&user_id, Platform::Spotify)
                .await
                .unwrap()
                .is_none()
        );

        // Deleting again is a no-op
        store
            .delete_connection(&user_id, Platform::Spotify)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_connection_fails() {
        let store = MemoryAccountStore::new();
        let result = store
            .update_connection_tokens(
                &UserId::generate(),
                Platform::YouTube,
                "token".to_string(),
                None,
                Utc::now(),
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_connections_listed_per_account() {
        let store = MemoryAccountStore::new();
        let user_a = UserId::generate();
        let user_b = UserId::generate();

        store
            .put_connection(&connection(&user_a, Platform::Spotify))
            .await
            .unwrap();
        store
            .put_connection(&connection(&user_a, Platform::YouTube))
            .await
            .unwrap();
        store
            .put_connection(&connection(&user_b, Platform::Spotify))
            .await
            .unwrap();

        assert_eq!(store.list_connections(&user_a).await.unwrap().len(), 2);
        assert_eq!(store.list_connections(&user_b).await.unwrap().len(), 1);
    }
}

//! Redis-based account store.
//!
//! Record layout:
//! - `account:{user}:profile` → bincode-serialized [`Profile`]
//! - `account:{user}:auth:{provider}` → bincode-serialized [`IdentityLink`]
//! - `account:{user}:auth-providers` → set of linked provider names
//! - `account:{user}:platform:{platform}` → bincode-serialized
//!   [`PlatformConnection`]
//! - `account:{user}:platforms` → set of connected platform names
//! - `auth-subject:{provider}:{subject}` → account id (reverse index used
//!   for identity resolution)
//!
//! Token fields arrive already encrypted from the service layer; this store
//! never sees plaintext tokens. Writes are independent single-record
//! upserts: concurrent writers resolve last-writer-wins, and the token
//! update path is a plain read-modify-write with no locking.

use crate::error::{AuthError, Result};
use crate::providers::AccountStore;
use crate::state::{IdentityLink, Platform, PlatformConnection, Profile, SsoProvider, UserId};
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

/// Redis-based account store with connection pooling via
/// `ConnectionManager`.
#[derive(Clone)]
pub struct RedisAccountStore {
    conn_manager: ConnectionManager,
}

impl RedisAccountStore {
    /// Create a new Redis account store.
    ///
    /// # Arguments
    ///
    /// * `redis_url` - Redis connection URL (e.g. `redis://127.0.0.1:6379`)
    ///
    /// # Errors
    ///
    /// Returns error if the connection to Redis fails.
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| AuthError::StorageError(format!("failed to create Redis client: {e}")))?;

        let conn_manager = ConnectionManager::new(client).await.map_err(|e| {
            AuthError::StorageError(format!("failed to create Redis connection manager: {e}"))
        })?;

        Ok(Self { conn_manager })
    }

    fn profile_key(user_id: &UserId) -> String {
        format!("account:{user_id}:profile")
    }

    fn link_key(user_id: &UserId, provider: SsoProvider) -> String {
        format!("account:{user_id}:auth:{provider}")
    }

    fn link_set_key(user_id: &UserId) -> String {
        format!("account:{user_id}:auth-providers")
    }

    fn subject_key(provider: SsoProvider, subject_id: &str) -> String {
        format!("auth-subject:{provider}:{subject_id}")
    }

    fn connection_key(user_id: &UserId, platform: Platform) -> String {
        format!("account:{user_id}:platform:{platform}")
    }

    fn connection_set_key(user_id: &UserId) -> String {
        format!("account:{user_id}:platforms")
    }

    fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        bincode::serialize(value).map_err(|e| AuthError::SerializationError(e.to_string()))
    }

    fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        bincode::deserialize(bytes).map_err(|e| AuthError::SerializationError(e.to_string()))
    }

    async fn get_record<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.conn_manager.clone();

        let bytes: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| AuthError::StorageError(format!("failed to read {key}: {e}")))?;

        bytes.as_deref().map(Self::decode).transpose()
    }

    async fn put_record<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let bytes = Self::encode(value)?;

        let _: () = conn
            .set(key, bytes)
            .await
            .map_err(|e| AuthError::StorageError(format!("failed to write {key}: {e}")))?;

        Ok(())
    }
}

impl AccountStore for RedisAccountStore {
    async fn put_profile(&self, profile: &Profile) -> Result<()> {
        self.put_record(&Self::profile_key(&profile.user_id), profile)
            .await?;

        tracing::info!(user_id = %profile.user_id, "stored account profile");
        Ok(())
    }

    async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>> {
        self.get_record(&Self::profile_key(user_id)).await
    }

    async fn put_identity_link(&self, link: &IdentityLink) -> Result<()> {
        self.put_record(&Self::link_key(&link.user_id, link.provider), link)
            .await?;

        let mut conn = self.conn_manager.clone();
        let _: () = conn
            .set(
                Self::subject_key(link.provider, &link.subject_id),
                link.user_id.as_str(),
            )
            .await
            .map_err(|e| AuthError::StorageError(format!("failed to index subject: {e}")))?;
        let _: () = conn
            .sadd(Self::link_set_key(&link.user_id), link.provider.as_str())
            .await
            .map_err(|e| AuthError::StorageError(format!("failed to index link: {e}")))?;

        tracing::info!(
            user_id = %link.user_id,
            provider = %link.provider,
            "stored identity link"
        );
        Ok(())
    }

    async fn find_identity_by_subject(
        &self,
        provider: SsoProvider,
        subject_id: &str,
    ) -> Result<Option<IdentityLink>> {
        let mut conn = self.conn_manager.clone();

        let user_id: Option<String> = conn
            .get(Self::subject_key(provider, subject_id))
            .await
            .map_err(|e| AuthError::StorageError(format!("failed to resolve subject: {e}")))?;

        match user_id {
            Some(id) => {
                self.get_record(&Self::link_key(&UserId::new(id), provider))
                    .await
            }
            None => Ok(None),
        }
    }

    async fn list_identity_links(&self, user_id: &UserId) -> Result<Vec<IdentityLink>> {
        let mut conn = self.conn_manager.clone();

        let providers: Vec<String> = conn
            .smembers(Self::link_set_key(user_id))
            .await
            .map_err(|e| AuthError::StorageError(format!("failed to list links: {e}")))?;

        let mut links = Vec::with_capacity(providers.len());
        for name in providers {
            let provider = SsoProvider::parse(&name)?;
            if let Some(link) = self.get_record(&Self::link_key(user_id, provider)).await? {
                links.push(link);
            }
        }
        Ok(links)
    }

    async fn put_connection(&self, connection: &PlatformConnection) -> Result<()> {
        self.put_record(
            &Self::connection_key(&connection.user_id, connection.platform),
            connection,
        )
        .await?;

        let mut conn = self.conn_manager.clone();
        let _: () = conn
            .sadd(
                Self::connection_set_key(&connection.user_id),
                connection.platform.as_str(),
            )
            .await
            .map_err(|e| AuthError::StorageError(format!("failed to index connection: {e}")))?;

        tracing::info!(
            user_id = %connection.user_id,
            platform = %connection.platform,
            has_refresh_token = connection.refresh_token.is_some(),
            "stored platform connection (tokens encrypted)"
        );
        Ok(())
    }

    async fn get_connection(
        &self,
        user_id: &UserId,
        platform: Platform,
    ) -> Result<Option<PlatformConnection>> {
        self.get_record(&Self::connection_key(user_id, platform))
            .await
    }

    async fn list_connections(&self, user_id: &UserId) -> Result<Vec<PlatformConnection>> {
        let mut conn = self.conn_manager.clone();

        let platforms: Vec<String> = conn
            .smembers(Self::connection_set_key(user_id))
            .await
            .map_err(|e| AuthError::StorageError(format!("failed to list connections: {e}")))?;

        let mut connections = Vec::with_capacity(platforms.len());
        for name in platforms {
            let platform = Platform::parse(&name)?;
            if let Some(connection) = self
                .get_record(&Self::connection_key(user_id, platform))
                .await?
            {
                connections.push(connection);
            }
        }
        Ok(connections)
    }

    async fn update_connection_tokens(
        &self,
        user_id: &UserId,
        platform: Platform,
        access_token: String,
        refresh_token: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let key = Self::connection_key(user_id, platform);

        let mut connection: PlatformConnection = self
            .get_record(&key)
            .await?
            .ok_or_else(|| AuthError::StorageError("connection not found".to_string()))?;

        connection.access_token = access_token;
        if let Some(rotated) = refresh_token {
            connection.refresh_token = Some(rotated);
        }
        connection.expires_at = expires_at;
        connection.updated_at = Utc::now();

        self.put_record(&key, &connection).await?;

        tracing::info!(user_id = %user_id, platform = %platform, "updated connection tokens");
        Ok(())
    }

    async fn delete_connection(&self, user_id: &UserId, platform: Platform) -> Result<()> {
        let mut conn = self.conn_manager.clone();

        let _: () = conn
            .del(Self::connection_key(user_id, platform))
            .await
            .map_err(|e| AuthError::StorageError(format!("failed to delete connection: {e}")))?;
        let _: () = conn
            .srem(Self::connection_set_key(user_id), platform.as_str())
            .await
            .map_err(|e| AuthError::StorageError(format!("failed to unindex connection: {e}")))?;

        tracing::info!(user_id = %user_id, platform = %platform, "deleted platform connection");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_connection(user_id: &UserId) -> PlatformConnection {
        PlatformConnection {
            user_id: user_id.clone(),
            platform: Platform::Spotify,
            platform_user_id: "spotify_user_1".to_string(),
            display_name: Some("Listener".to_string()),
            access_token: "encrypted_access".to_string(),
            refresh_token: Some("encrypted_refresh".to_string()),
            expires_at: Utc::now() + Duration::hours(1),
            scope: "streaming".to_string(),
            connected_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_redis_connection_lifecycle() {
        let store = RedisAccountStore::new("redis://127.0.0.1:6379")
            .await
            .expect("Failed to create store");

        let user_id = UserId::generate();
        let connection = test_connection(&user_id);

        store
            .put_connection(&connection)
            .await
            .expect("Failed to store connection");

        let retrieved = store
            .get_connection(&user_id, Platform::Spotify)
            .await
            .expect("Failed to get connection")
            .expect("Connection not found");
        assert_eq!(retrieved.platform_user_id, "spotify_user_1");

        let listed = store
            .list_connections(&user_id)
            .await
            .expect("Failed to list connections");
        assert_eq!(listed.len(), 1);

        store
            .delete_connection(&user_id, Platform::Spotify)
            .await
            .expect("Failed to delete connection");

        assert!(
            store
                .get_connection(&user_id, Platform::Spotify)
                .await
                .expect("Failed to get connection")
                .is_none()
        );
        assert!(
            store
                .list_connections(&user_id)
                .await
                .expect("Failed to list connections")
                .is_empty()
        );
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_redis_subject_index() {
        let store = RedisAccountStore::new("redis://127.0.0.1:6379")
            .await
            .expect("Failed to create store");

        let user_id = UserId::generate();
        let subject = format!("sub_{user_id}");

        store
            .put_identity_link(&IdentityLink {
                user_id: user_id.clone(),
                provider: SsoProvider::Google,
                subject_id: subject.clone(),
                email: "test@example.com".to_string(),
                linked_at: Utc::now(),
            })
            .await
            .expect("Failed to store link");

        let found = store
            .find_identity_by_subject(SsoProvider::Google, &subject)
            .await
            .expect("Failed to resolve subject")
            .expect("Link not found");
        assert_eq!(found.user_id, user_id);
    }
}

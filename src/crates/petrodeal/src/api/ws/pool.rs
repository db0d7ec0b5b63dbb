//! WebSocket connection pool management
//!
//! Tracks active WebSocket clients, their activity and their port
//! subscription.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use super::error::WsError;

/// Connection pool entry
#[derive(Debug, Clone)]
pub struct PoolEntry {
    /// Unique client ID
    pub client_id: String,
    /// Connection creation timestamp
    pub connected_at: i64,
    /// Last activity timestamp
    pub last_activity: Arc<AtomicU64>,
    /// Message count sent to this client
    pub messages_sent: Arc<AtomicU64>,
    /// Port that proximity events are narrowed to
    pub port_filter: Option<String>,
}

/// WebSocket connection pool
pub struct ConnectionPool {
    /// Active connections indexed by client_id
    connections: Arc<DashMap<String, PoolEntry>>,
    max_connections: usize,
    /// Total connections ever created
    total_created: Arc<AtomicU64>,
}

impl ConnectionPool {
    /// Create a new connection pool
    pub fn new(max_connections: usize) -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
            max_connections,
            total_created: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Register a client, failing when the pool is full
    pub fn connect(&self) -> Result<String, WsError> {
        if self.connections.len() >= self.max_connections {
            return Err(WsError::ConnectionLimit {
                max: self.max_connections,
            });
        }

        let client_id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();

        let entry = PoolEntry {
            client_id: client_id.clone(),
            connected_at: now,
            last_activity: Arc::new(AtomicU64::new(now as u64)),
            messages_sent: Arc::new(AtomicU64::new(0)),
            port_filter: None,
        };

        self.connections.insert(client_id.clone(), entry);
        self.total_created.fetch_add(1, Ordering::Relaxed);

        Ok(client_id)
    }

    /// Remove a connection from the pool
    pub fn disconnect(&self, client_id: &str) -> Option<PoolEntry> {
        self.connections.remove(client_id).map(|(_, entry)| entry)
    }

    /// Record activity for a connection
    pub fn record_activity(&self, client_id: &str) {
        if let Some(entry) = self.connections.get(client_id) {
            let now = chrono::Utc::now().timestamp() as u64;
            entry.last_activity.store(now, Ordering::Relaxed);
        }
    }

    /// Increment message count for a connection
    pub fn increment_message_count(&self, client_id: &str) {
        if let Some(entry) = self.connections.get(client_id) {
            entry.messages_sent.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Narrow (or with `None`, widen) a client's proximity events
    pub fn set_port_filter(&self, client_id: &str, port_id: Option<String>) -> bool {
        match self.connections.get_mut(client_id) {
            Some(mut entry) => {
                entry.port_filter = port_id;
                true
            }
            None => false,
        }
    }

    pub fn port_filter(&self, client_id: &str) -> Option<String> {
        self.connections
            .get(client_id)
            .and_then(|entry| entry.port_filter.clone())
    }

    /// Check if a connection exists
    pub fn exists(&self, client_id: &str) -> bool {
        self.connections.contains_key(client_id)
    }

    /// Get active connection count
    pub fn active_connections(&self) -> usize {
        self.connections.len()
    }

    /// Get total connections ever created
    pub fn total_connections(&self) -> u64 {
        self.total_created.load(Ordering::Relaxed)
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            active_connections: self.connections.len(),
            max_connections: self.max_connections,
            total_created: self.total_created.load(Ordering::Relaxed),
            subscribed: self
                .connections
                .iter()
                .filter(|entry| entry.port_filter.is_some())
                .count(),
        }
    }
}

/// Connection pool statistics
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PoolStats {
    /// Currently active connections
    pub active_connections: usize,
    /// Maximum allowed connections
    pub max_connections: usize,
    /// Total connections created since startup
    pub total_created: u64,
    /// Clients narrowed to a single port
    pub subscribed: usize,
}

impl Default for ConnectionPool {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_and_disconnect() {
        let pool = ConnectionPool::new(10);
        let client_id = pool.connect().unwrap();
        assert!(pool.exists(&client_id));
        assert_eq!(pool.active_connections(), 1);

        pool.disconnect(&client_id);
        assert_eq!(pool.active_connections(), 0);
        assert_eq!(pool.total_connections(), 1);
    }

    #[test]
    fn test_max_connections() {
        let pool = ConnectionPool::new(2);
        let _c1 = pool.connect().unwrap();
        let _c2 = pool.connect().unwrap();

        assert!(matches!(pool.connect(), Err(WsError::ConnectionLimit { max: 2 })));
        assert_eq!(pool.active_connections(), 2);
    }

    #[test]
    fn test_port_filter() {
        let pool = ConnectionPool::new(10);
        let client_id = pool.connect().unwrap();
        assert_eq!(pool.port_filter(&client_id), None);

        assert!(pool.set_port_filter(&client_id, Some("p-1".to_string())));
        assert_eq!(pool.port_filter(&client_id).as_deref(), Some("p-1"));
        assert_eq!(pool.stats().subscribed, 1);

        pool.set_port_filter(&client_id, None);
        assert_eq!(pool.port_filter(&client_id), None);
        assert!(!pool.set_port_filter("ghost", None));
    }

    #[test]
    fn test_stats() {
        let pool = ConnectionPool::new(10);
        let c1 = pool.connect().unwrap();
        let _c2 = pool.connect().unwrap();
        pool.increment_message_count(&c1);

        let stats = pool.stats();
        assert_eq!(stats.active_connections, 2);
        assert_eq!(stats.max_connections, 10);
        assert_eq!(stats.total_created, 2);

        let entry = pool.disconnect(&c1).unwrap();
        assert_eq!(entry.messages_sent.load(Ordering::Relaxed), 1);
        assert_eq!(pool.stats().active_connections, 1);
    }
}

//! Live client sessions
//!
//! The session registry is owned by whatever hosts this crate (a browser
//! shell, an embedded web view, a proxy). It is only consulted once, at
//! activation, to learn which document started the page load.

use async_trait::async_trait;

/// Source of the live client sessions
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// URLs of the currently live clients, in registry order
    async fn client_urls(&self) -> Vec<String>;

    /// Main page URL, taken from the first live client
    async fn main_page_url(&self) -> Option<String> {
        self.client_urls().await.into_iter().next()
    }

    /// Ids of the sessions that are still live.
    ///
    /// `None` when the host does not track session lifetimes; bindings are
    /// then only dropped through `SessionCacheBinder::release`.
    async fn live_sessions(&self) -> Option<Vec<String>> {
        None
    }
}

/// Fixed list of client URLs
#[derive(Debug, Clone, Default)]
pub struct KnownClients {
    urls: Vec<String>,
    sessions: Option<Vec<String>>,
}

impl KnownClients {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            sessions: None,
        }
    }

    /// No live clients
    pub fn none() -> Self {
        Self::default()
    }

    /// Also report which session ids are live
    pub fn with_sessions(mut self, session_ids: Vec<String>) -> Self {
        self.sessions = Some(session_ids);
        self
    }
}

#[async_trait]
impl ClientRegistry for KnownClients {
    async fn client_urls(&self) -> Vec<String> {
        self.urls.clone()
    }

    async fn live_sessions(&self) -> Option<Vec<String>> {
        self.sessions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_client_is_main_page() {
        let clients = KnownClients::new(vec![
            "https://example.com/index.html".to_string(),
            "https://example.com/popup.html".to_string(),
        ]);
        assert_eq!(
            clients.main_page_url().await.as_deref(),
            Some("https://example.com/index.html")
        );
    }

    #[tokio::test]
    async fn no_clients_no_main_page() {
        assert!(KnownClients::none().main_page_url().await.is_none());
    }

    #[tokio::test]
    async fn sessions_are_untracked_unless_given() {
        assert!(KnownClients::none().live_sessions().await.is_none());

        let clients = KnownClients::none().with_sessions(vec!["tab-1".to_string()]);
        assert_eq!(clients.live_sessions().await, Some(vec!["tab-1".to_string()]));
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use teloxide::types::{ ChatId, MessageId };
use tokio::sync::{ Mutex, RwLock };

use crate::services::HoldingsSnapshot;

/// Progress through the token-range profit flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalProfitStep {
    #[default]
    AwaitingFirst,
    AwaitingSecond {
        first: usize,
    },
}

/// The single conversation mode a chat is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scene {
    #[default]
    Idle,
    ChangeWallet,
    TotalProfit(TotalProfitStep),
}

impl Scene {
    pub fn is_idle(&self) -> bool {
        matches!(self, Scene::Idle)
    }

    /// Index of the opening bound once the range flow has one.
    pub fn first_selected(&self) -> Option<usize> {
        match self {
            Scene::TotalProfit(TotalProfitStep::AwaitingSecond { first }) => Some(*first),
            _ => None,
        }
    }
}

/// Per-chat, process-local state. Nothing here survives a restart.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Set once the user record has been loaded or created.
    pub active: bool,
    pub wallet_address: Option<String>,
    pub holdings: Option<HoldingsSnapshot>,
    pub page: Option<u32>,
    pub scene: Scene,
    /// The menu message that gets edited in place.
    pub main_message: Option<MessageId>,
    /// Transient prompt of the current scene, deleted when it is replaced.
    pub prompt_message: Option<MessageId>,
}

impl Session {
    /// Drops cached holdings and every selection made while browsing them.
    pub fn reset_browsing(&mut self) {
        self.holdings = None;
        self.page = None;
        if let Scene::TotalProfit(_) = self.scene {
            self.scene = Scene::TotalProfit(TotalProfitStep::AwaitingFirst);
        }
    }

    /// Returns to `Idle`, handing back the prompt message to clean up.
    pub fn leave_scene(&mut self) -> Option<MessageId> {
        self.scene = Scene::Idle;
        self.prompt_message.take()
    }
}

/// Sessions keyed by chat. Each chat has its own lock so that one chat's
/// slow step never blocks another chat.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<ChatId, Arc<Mutex<Session>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, chat_id: ChatId) -> Arc<Mutex<Session>> {
        if let Some(session) = self.inner.read().await.get(&chat_id) {
            return session.clone();
        }

        let mut sessions = self.inner.write().await;
        sessions.entry(chat_id).or_default().clone()
    }
}

use std::sync::Arc;

use teloxide::types::{ ChatId, InlineKeyboardMarkup, MessageId, User };

use crate::chains::solana::validate_address;
use crate::config::Config;
use crate::error::{ AppError, Result };
use crate::services::{ HoldingsSnapshot, HoldingsSource, NewUser, UserStore };
use crate::services::profit_service::summarize_range;
use crate::services::user_service::load_or_register;
use crate::session::{ Scene, Session, SessionStore, TotalProfitStep };
use super::callbacks::CallbackAction;
use super::commands::Command;
use super::constants::{ messages as msg, notices };
use super::messenger::Messenger;
use super::{ keyboards, pagination, views };

/// Telegram identity of whoever produced an update.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl From<&User> for ChatUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0 as i64,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
        }
    }
}

impl From<&ChatUser> for NewUser {
    fn from(user: &ChatUser) -> Self {
        NewUser {
            telegram_id: user.id,
            first_name: Some(user.first_name.clone()),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Command {
        command: Command,
        message_id: MessageId,
    },
    /// Slash-prefixed text that is not a known command.
    UnknownCommand {
        text: String,
        message_id: MessageId,
    },
    /// Any other message; non-text messages arrive with empty `text`.
    Text {
        text: String,
        message_id: MessageId,
    },
    Callback {
        action: CallbackAction,
        /// Message carrying the pressed button.
        message_id: Option<MessageId>,
    },
}

/// Short notice for the user, delivered as a callback answer or a plain reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Silent,
    Toast(String),
}

#[derive(Debug, Clone, Copy)]
pub struct ControllerSettings {
    pub tokens_per_page: usize,
    pub lookup_max_pages: usize,
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            tokens_per_page: config.tokens_per_page,
            lookup_max_pages: config.lookup_max_pages,
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            tokens_per_page: 5,
            lookup_max_pages: 20,
        }
    }
}

/// Routes every update of a chat to its one active scene.
pub struct ConversationController {
    sessions: SessionStore,
    users: Arc<dyn UserStore>,
    holdings: Arc<dyn HoldingsSource>,
    messenger: Arc<dyn Messenger>,
    settings: ControllerSettings,
}

impl ConversationController {
    pub fn new(
        sessions: SessionStore,
        users: Arc<dyn UserStore>,
        holdings: Arc<dyn HoldingsSource>,
        messenger: Arc<dyn Messenger>,
        settings: ControllerSettings
    ) -> Self {
        Self {
            sessions,
            users,
            holdings,
            messenger,
            settings,
        }
    }

    pub async fn handle(&self, chat_id: ChatId, user: &ChatUser, event: Event) -> Result<Reply> {
        let session = self.sessions.get(chat_id).await;
        let mut session = session.lock().await;

        self.activate(chat_id, user, &mut session).await;

        tracing::debug!("chat {} in {:?} received {:?}", chat_id, session.scene, event);

        match event {
            Event::Command { command, message_id } => {
                self.leave_for_command(chat_id, &mut session, message_id).await;
                self.dispatch_command(chat_id, &mut session, command).await
            }
            Event::UnknownCommand { text, message_id } => {
                tracing::debug!("chat {} sent unknown command {}", chat_id, text);
                self.leave_for_command(chat_id, &mut session, message_id).await;
                Ok(Reply::Silent)
            }
            Event::Text { text, message_id } => {
                let scene = session.scene;
                match scene {
                    Scene::Idle => Ok(Reply::Silent),
                    Scene::ChangeWallet => {
                        self.change_wallet_input(chat_id, user, &mut session, &text, message_id).await
                    }
                    Scene::TotalProfit(step) => {
                        self.token_address_input(chat_id, &mut session, step, &text, message_id).await
                    }
                }
            }
            Event::Callback { action, message_id } => {
                if message_id.is_some() {
                    session.main_message = message_id;
                }
                self.dispatch_callback(chat_id, &mut session, action).await
            }
        }
    }

    /// Commands sent inside a scene are consumed by it: the message is
    /// removed along with the scene prompt.
    async fn leave_for_command(&self, chat_id: ChatId, session: &mut Session, message_id: MessageId) {
        if !session.scene.is_idle() {
            self.delete_quietly(chat_id, Some(message_id)).await;
        }
        self.exit_scene(chat_id, session).await;
    }

    /// Loads the linked wallet on first contact, registering unknown users.
    async fn activate(&self, chat_id: ChatId, user: &ChatUser, session: &mut Session) {
        if session.active {
            return;
        }

        match load_or_register(self.users.as_ref(), NewUser::from(user)).await {
            Ok(wallet_address) => {
                session.wallet_address = wallet_address;
                session.active = true;
            }
            Err(e) => {
                tracing::error!("Failed to load user {}: {}", user.id, e);
                let text = format!("{}{}", notices::REGISTRATION_FAILED, e.user_message());
                if let Err(e) = self.messenger.send(chat_id, text, None).await {
                    tracing::warn!("Failed to report registration error: {}", e);
                }
            }
        }
    }

    async fn dispatch_command(
        &self,
        chat_id: ChatId,
        session: &mut Session,
        command: Command
    ) -> Result<Reply> {
        match command {
            Command::Start => {
                session.reset_browsing();
                let (text, keyboard) = views::main_screen(session.wallet_address.as_deref());
                let id = self.messenger.send(chat_id, text, Some(keyboard)).await?;
                session.main_message = Some(id);
                Ok(Reply::Silent)
            }
            Command::Help => {
                self.messenger.send(chat_id, views::help_text(), None).await?;
                Ok(Reply::Silent)
            }
            Command::TotalProfit => {
                // A fresh list message, the old one may be far up the chat
                let previous = session.main_message.take();
                let reply = self.enter_total_profit(chat_id, session, 1).await;
                if session.scene.is_idle() {
                    session.main_message = previous;
                }
                reply
            }
        }
    }

    async fn dispatch_callback(
        &self,
        chat_id: ChatId,
        session: &mut Session,
        action: CallbackAction
    ) -> Result<Reply> {
        match action {
            CallbackAction::ChangeWallet => {
                self.exit_scene(chat_id, session).await;
                session.reset_browsing();
                session.scene = Scene::ChangeWallet;

                let keyboard = self.wallet_prompt_keyboard(session);
                self.replace_prompt(chat_id, session, msg::PROMPT_WALLET_ADDRESS, keyboard).await?;
                Ok(Reply::Silent)
            }
            CallbackAction::Cancel => {
                self.exit_scene(chat_id, session).await;
                session.reset_browsing();

                let (text, keyboard) = views::main_screen(session.wallet_address.as_deref());
                self.present(chat_id, session, text, Some(keyboard)).await?;
                Ok(Reply::Silent)
            }
            CallbackAction::TotalProfit => {
                self.exit_scene(chat_id, session).await;
                self.enter_total_profit(chat_id, session, 1).await
            }
            CallbackAction::Page(page) =>
                match session.scene {
                    scene @ Scene::TotalProfit(_) => {
                        self.show_token_page(chat_id, session, scene, page).await
                    }
                    _ => {
                        self.exit_scene(chat_id, session).await;
                        self.enter_total_profit(chat_id, session, page).await
                    }
                }
            CallbackAction::Select { index, second } => {
                let Scene::TotalProfit(step) = session.scene else {
                    return Ok(Reply::Toast(notices::BUTTON_EXPIRED.to_string()));
                };

                let known = session.holdings
                    .as_ref()
                    .map(|h| h.tokens.len())
                    .unwrap_or(0);
                if index >= known {
                    return Ok(Reply::Toast(notices::BUTTON_EXPIRED.to_string()));
                }

                match (step, second) {
                    (TotalProfitStep::AwaitingFirst, false) |
                    (TotalProfitStep::AwaitingSecond { .. }, true) => {
                        self.apply_selection(chat_id, session, step, index).await
                    }
                    _ => Ok(Reply::Toast(notices::BUTTON_EXPIRED.to_string())),
                }
            }
        }
    }

    async fn change_wallet_input(
        &self,
        chat_id: ChatId,
        user: &ChatUser,
        session: &mut Session,
        text: &str,
        message_id: MessageId
    ) -> Result<Reply> {
        self.delete_quietly(chat_id, Some(message_id)).await;

        let candidate = text.trim();
        let keyboard = self.wallet_prompt_keyboard(session);

        if session.wallet_address.as_deref() == Some(candidate) {
            self.replace_prompt(chat_id, session, msg::ERR_ALREADY_CONNECTED, keyboard).await?;
            return Ok(Reply::Silent);
        }

        if !validate_address(candidate) {
            self.replace_prompt(chat_id, session, msg::ERR_INVALID_WALLET, keyboard).await?;
            return Ok(Reply::Silent);
        }

        match self.users.update_wallet(user.id, candidate).await {
            Ok(updated) => {
                tracing::info!("User {} linked wallet {}", user.id, candidate);
                session.wallet_address = updated.wallet_address;
                session.reset_browsing();
                self.exit_scene(chat_id, session).await;

                let (text, keyboard) = views::main_screen(session.wallet_address.as_deref());
                self.present(chat_id, session, text, Some(keyboard)).await?;
            }
            Err(e) => {
                tracing::error!("Failed to update wallet of user {}: {}", user.id, e);
                self.exit_scene(chat_id, session).await;
                self.messenger.send(chat_id, views::error_report(&e.user_message()), None).await?;
            }
        }

        Ok(Reply::Silent)
    }

    async fn token_address_input(
        &self,
        chat_id: ChatId,
        session: &mut Session,
        step: TotalProfitStep,
        text: &str,
        message_id: MessageId
    ) -> Result<Reply> {
        self.delete_quietly(chat_id, Some(message_id)).await;

        let candidate = text.trim();
        if !validate_address(candidate) {
            self.replace_prompt(chat_id, session, msg::ERR_INVALID_TOKEN, Some(keyboards::cancel())).await?;
            return Ok(Reply::Silent);
        }

        let Some(wallet) = session.wallet_address.clone() else {
            self.exit_scene(chat_id, session).await;
            return Ok(Reply::Toast(notices::CONNECT_WALLET_FIRST.to_string()));
        };

        let lookup = match session.holdings.as_mut() {
            Some(snapshot) =>
                snapshot.locate(
                    self.holdings.as_ref(),
                    &wallet,
                    candidate,
                    self.settings.lookup_max_pages
                ).await,
            None => Ok(None),
        };

        match lookup {
            Ok(Some(index)) => {
                self.delete_quietly(chat_id, session.prompt_message.take()).await;
                self.apply_selection(chat_id, session, step, index).await
            }
            Ok(None) => {
                self.replace_prompt(chat_id, session, msg::ERR_TOKEN_NOT_FOUND, Some(keyboards::cancel())).await?;
                Ok(Reply::Silent)
            }
            Err(e) => {
                let text = format!("<b>{}</b>", e.user_message());
                self.replace_prompt(chat_id, session, &text, Some(keyboards::cancel())).await?;
                Ok(Reply::Silent)
            }
        }
    }

    /// Starts the range flow: needs a linked wallet and at least one holding.
    async fn enter_total_profit(&self, chat_id: ChatId, session: &mut Session, page: u32) -> Result<Reply> {
        let Some(wallet) = session.wallet_address.clone() else {
            return Ok(Reply::Toast(notices::CONNECT_WALLET_FIRST.to_string()));
        };

        if session.holdings.is_none() {
            match HoldingsSnapshot::load(self.holdings.as_ref(), &wallet).await {
                Ok(snapshot) if snapshot.tokens.is_empty() => {
                    return Ok(Reply::Toast(notices::NO_TOKENS.to_string()));
                }
                Ok(snapshot) => {
                    session.holdings = Some(snapshot);
                }
                Err(e) => {
                    return Ok(Reply::Toast(e.user_message()));
                }
            }
        }

        let scene = Scene::TotalProfit(TotalProfitStep::AwaitingFirst);
        let reply = self.show_token_page(chat_id, session, scene, page).await?;
        if session.scene.is_idle() {
            // The list never appeared, nothing to browse
            session.reset_browsing();
        }
        Ok(reply)
    }

    async fn apply_selection(
        &self,
        chat_id: ChatId,
        session: &mut Session,
        step: TotalProfitStep,
        index: usize
    ) -> Result<Reply> {
        match step {
            TotalProfitStep::AwaitingFirst => {
                let scene = Scene::TotalProfit(TotalProfitStep::AwaitingSecond { first: index });
                let page = pagination::page_of(index, self.settings.tokens_per_page);
                self.show_token_page(chat_id, session, scene, page).await
            }
            TotalProfitStep::AwaitingSecond { first } => {
                let summary = session.holdings
                    .as_ref()
                    .and_then(|h| summarize_range(&h.tokens, first, index));

                let Some(summary) = summary else {
                    return Ok(Reply::Toast(notices::BUTTON_EXPIRED.to_string()));
                };

                tracing::info!(
                    "chat {} summed tokens {}..={}: {:.2}",
                    chat_id,
                    summary.from,
                    summary.to,
                    summary.total_profit
                );

                session.reset_browsing();
                self.exit_scene(chat_id, session).await;
                self.present(
                    chat_id,
                    session,
                    views::range_summary_text(&summary),
                    Some(keyboards::main_menu())
                ).await?;
                Ok(Reply::Silent)
            }
        }
    }

    /// Renders a page of the token list and moves to `scene` once the page
    /// is ready. On failure the session keeps its current scene.
    async fn show_token_page(
        &self,
        chat_id: ChatId,
        session: &mut Session,
        scene: Scene,
        page: u32
    ) -> Result<Reply> {
        let page_size = self.settings.tokens_per_page;
        let first_selected = scene.first_selected();
        let wallet = session.wallet_address.clone().unwrap_or_default();

        let Some(snapshot) = session.holdings.as_mut() else {
            return Ok(Reply::Toast(notices::BUTTON_EXPIRED.to_string()));
        };

        // Look one token past the page so that "Next" reflects upstream data too
        let beyond = pagination::page_start(page, page_size) + page_size;
        if
            let Err(e) = snapshot.ensure_beyond(
                self.holdings.as_ref(),
                &wallet,
                beyond,
                self.settings.lookup_max_pages
            ).await
        {
            return Ok(Reply::Toast(e.user_message()));
        }

        let last_page = pagination::last_page(snapshot.tokens.len(), page_size).max(1);
        let page = page.clamp(1, last_page);
        let start = pagination::page_start(page, page_size);

        let heading = if first_selected.is_some() {
            msg::PROMPT_SECOND_TOKEN
        } else {
            msg::PROMPT_FIRST_TOKEN
        };
        let text = views::token_list_text(heading, &snapshot.tokens, start, page_size);
        let keyboard = pagination
            ::render_page(&snapshot.tokens, start, page, page_size, first_selected)
            .into_keyboard();

        session.scene = scene;
        session.page = Some(page);
        self.present(chat_id, session, text, Some(keyboard)).await?;
        Ok(Reply::Silent)
    }

    fn wallet_prompt_keyboard(&self, session: &Session) -> Option<InlineKeyboardMarkup> {
        session.wallet_address.as_ref().map(|_| keyboards::cancel())
    }

    /// Leaves the active scene, if any, and removes its prompt.
    async fn exit_scene(&self, chat_id: ChatId, session: &mut Session) {
        if !session.scene.is_idle() {
            tracing::debug!("chat {} leaving {:?}", chat_id, session.scene);
        }
        let prompt = session.leave_scene();
        self.delete_quietly(chat_id, prompt).await;
    }

    /// Swaps the scene prompt for a new one.
    async fn replace_prompt(
        &self,
        chat_id: ChatId,
        session: &mut Session,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>
    ) -> Result<()> {
        self.delete_quietly(chat_id, session.prompt_message.take()).await;
        let id = self.messenger.send(chat_id, text.to_string(), keyboard).await?;
        session.prompt_message = Some(id);
        Ok(())
    }

    /// Rewrites the main message in place, sending a new one when there is
    /// none or it can no longer be edited.
    async fn present(
        &self,
        chat_id: ChatId,
        session: &mut Session,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>
    ) -> Result<()> {
        if let Some(message_id) = session.main_message {
            match self.messenger.edit(chat_id, message_id, text.clone(), keyboard.clone()).await {
                Ok(()) => {
                    return Ok(());
                }
                Err(e) => tracing::warn!("Failed to edit message {}: {}", message_id.0, e),
            }
        }

        let id = self.messenger.send(chat_id, text, keyboard).await?;
        session.main_message = Some(id);
        Ok(())
    }

    async fn delete_quietly(&self, chat_id: ChatId, message_id: Option<MessageId>) {
        let Some(message_id) = message_id else {
            return;
        };
        if let Err(e) = self.messenger.delete(chat_id, message_id).await {
            tracing::warn!("Failed to delete message {}: {}", message_id.0, e);
        }
    }
}

impl From<AppError> for Reply {
    fn from(e: AppError) -> Self {
        Reply::Toast(e.user_message())
    }
}

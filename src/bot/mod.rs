//! Telegram transport: command vocabulary, conversation states, and the
//! dispatch tree routing updates into handlers.
//!
//! Dispatch precedence: the cancel signal is honored from every step of
//! every flow; an active flow's step handler consumes all other text ahead
//! of generic commands; commands and menu buttons only fire while idle.
//! Anything unmatched is silently ignored.

pub mod callback;
pub mod dreams;
pub mod format;
pub mod keyboards;
pub mod search;
pub mod start;

use crate::core::fields::{DreamDraft, DreamField};
use crate::core::traits::DreamService;
use crate::infrastructure::entities::User;
use crate::locales::{self, Lang};
use di::{Ref, ServiceProvider};
use teloxide::dispatching::UpdateHandler;
use teloxide::dispatching::dialogue::{self, Dialogue, InMemStorage};
use teloxide::dptree::case;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

pub type HandlerResult = anyhow::Result<()>;
pub type BotDialogue = Dialogue<State, InMemStorage<State>>;

/// What a flow remembers about who started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowCtx {
    pub user_id: i64,
    pub lang: Lang,
}

/// Per-chat conversation state. Lives in [`InMemStorage`], so in-flight
/// forms do not survive a restart.
#[derive(Debug, Clone, Default)]
pub enum State {
    #[default]
    Idle,
    DreamTitle {
        ctx: FlowCtx,
    },
    DreamDescription {
        ctx: FlowCtx,
        draft: DreamDraft,
    },
    DreamTags {
        ctx: FlowCtx,
        draft: DreamDraft,
    },
    DreamNotes {
        ctx: FlowCtx,
        draft: DreamDraft,
    },
    DreamDate {
        ctx: FlowCtx,
        draft: DreamDraft,
    },
    EditField {
        ctx: FlowCtx,
        dream_id: i64,
    },
    EditValue {
        ctx: FlowCtx,
        dream_id: i64,
        field: DreamField,
    },
    SearchQuery {
        ctx: FlowCtx,
    },
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    Start,
    Help,
    New,
    List,
    View(String),
    Edit(String),
    Delete(String),
    Search(String),
    Export,
    Language,
    Cancel,
    Skip,
    Today,
}

/// Localized menu-button labels resolved into a stable vocabulary before
/// dispatch; display text never routes anything by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    NewDream,
    MyDreams,
    Search,
    Export,
    Help,
}

impl MenuAction {
    const BUTTONS: [(MenuAction, &'static str); 5] = [
        (MenuAction::NewDream, "buttons.new_dream"),
        (MenuAction::MyDreams, "buttons.my_dreams"),
        (MenuAction::Search, "buttons.search"),
        (MenuAction::Export, "buttons.export"),
        (MenuAction::Help, "buttons.help"),
    ];

    pub fn from_text(text: &str) -> Option<MenuAction> {
        let text = text.trim();
        Lang::ALL.iter().find_map(|lang| {
            MenuAction::BUTTONS
                .iter()
                .find_map(|(action, key)| (locales::text(*lang, key) == text).then_some(*action))
        })
    }
}

fn matches_signal(text: &str, command: &str, button_key: &str) -> bool {
    let text = text.trim();
    text == command || Lang::ALL.iter().any(|lang| locales::text(*lang, button_key) == text)
}

pub fn is_cancel_signal(text: &str) -> bool {
    matches_signal(text, "/cancel", "buttons.cancel")
}

pub fn is_skip_signal(text: &str) -> bool {
    matches_signal(text, "/skip", "buttons.skip")
}

pub fn is_today_signal(text: &str) -> bool {
    matches_signal(text, "/today", "buttons.today")
}

/// One DI scope per update plays the role of the per-operation data session.
pub(crate) fn dream_service(provider: &ServiceProvider) -> Ref<dyn DreamService> {
    provider.create_scope().get_required::<dyn DreamService>()
}

/// Resolves the sender against the user table, replying with a
/// "register first" notice for unknown senders.
pub(crate) async fn require_user(
    bot: &Bot,
    services: &Ref<dyn DreamService>,
    msg: &Message,
) -> anyhow::Result<Option<(User, Lang)>> {
    let Some(from) = msg.from.as_ref() else {
        return Ok(None);
    };
    match services.identify(from.id.0 as i64).await? {
        Some(user) => {
            let lang = Lang::from_code(&user.language);
            Ok(Some((user, lang)))
        }
        None => {
            bot.send_message(msg.chat.id, locales::text(Lang::En, "not_registered"))
                .await?;
            Ok(None)
        }
    }
}

/// Language preference of a possibly unregistered sender.
pub(crate) async fn sender_language(
    services: &Ref<dyn DreamService>,
    telegram_id: i64,
) -> anyhow::Result<Lang> {
    Ok(services
        .identify(telegram_id)
        .await?
        .map(|user| Lang::from_code(&user.language))
        .unwrap_or(Lang::En))
}

pub fn schema() -> UpdateHandler<anyhow::Error> {
    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(start::start))
        .branch(case![Command::Help].endpoint(start::help))
        .branch(case![Command::Language].endpoint(start::choose_language))
        .branch(case![Command::New].endpoint(dreams::new_dream))
        .branch(case![Command::List].endpoint(dreams::list_dreams))
        .branch(case![Command::View(args)].endpoint(dreams::view_dream))
        .branch(case![Command::Edit(args)].endpoint(dreams::edit_dream))
        .branch(case![Command::Delete(args)].endpoint(dreams::delete_dream))
        .branch(case![Command::Search(args)].endpoint(search::search_command))
        .branch(case![Command::Export].endpoint(dreams::export_dreams));

    let menu_handler = dptree::filter_map(|msg: Message| {
        msg.text().and_then(MenuAction::from_text)
    })
    .branch(case![MenuAction::NewDream].endpoint(dreams::new_dream))
    .branch(case![MenuAction::MyDreams].endpoint(dreams::list_dreams))
    .branch(case![MenuAction::Search].endpoint(search::search_button))
    .branch(case![MenuAction::Export].endpoint(dreams::export_dreams))
    .branch(case![MenuAction::Help].endpoint(start::help));

    let skip = || dptree::filter(|msg: Message| msg.text().is_some_and(is_skip_signal));
    let today = || dptree::filter(|msg: Message| msg.text().is_some_and(is_today_signal));

    let new_dream_flow = dptree::entry()
        .branch(case![State::DreamTitle { ctx }].endpoint(dreams::receive_title))
        .branch(
            case![State::DreamDescription { ctx, draft }]
                .branch(skip().endpoint(dreams::skip_description))
                .endpoint(dreams::receive_description),
        )
        .branch(
            case![State::DreamTags { ctx, draft }]
                .branch(skip().endpoint(dreams::skip_tags))
                .endpoint(dreams::receive_tags),
        )
        .branch(
            case![State::DreamNotes { ctx, draft }]
                .branch(skip().endpoint(dreams::skip_notes))
                .endpoint(dreams::receive_notes),
        )
        .branch(
            case![State::DreamDate { ctx, draft }]
                .branch(today().endpoint(dreams::use_today))
                .endpoint(dreams::receive_date),
        );

    let message_handler = Update::filter_message()
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some_and(is_cancel_signal))
                .endpoint(start::cancel),
        )
        .branch(new_dream_flow)
        .branch(case![State::EditValue { ctx, dream_id, field }].endpoint(dreams::receive_edit_value))
        .branch(case![State::SearchQuery { ctx }].endpoint(search::receive_query))
        .branch(case![State::Idle].branch(command_handler).branch(menu_handler));

    let callback_handler = Update::filter_callback_query()
        .branch(
            case![State::EditField { ctx, dream_id }]
                .chain(dptree::filter(|q: CallbackQuery| callback::is_edit(&q)))
                .endpoint(dreams::edit_field_chosen),
        )
        .branch(dptree::endpoint(callback::dispatch));

    dialogue::enter::<Update, InMemStorage<State>, State, _>()
        .branch(message_handler)
        .branch(callback_handler)
}

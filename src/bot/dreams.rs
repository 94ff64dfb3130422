//! Dream CRUD: the guided new-dream form, listing with pagination, the
//! detail view, field-by-field editing, delete confirmation, and the text
//! export.

use crate::bot::callback::{self, CallbackAction};
use crate::bot::{
    BotDialogue, FlowCtx, HandlerResult, State, dream_service, format, keyboards, require_user,
    sender_language,
};
use crate::core::fields::{self, DreamDraft, DreamField};
use crate::core::traits::DreamService;
use crate::locales::{self, Lang};
use chrono::{NaiveDate, Utc};
use di::{Ref, ServiceProvider};
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ParseMode};
use teloxide::utils::html;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// --- NEW DREAM ---

pub async fn new_dream(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    provider: ServiceProvider,
) -> HandlerResult {
    let services = dream_service(&provider);
    let Some((user, lang)) = require_user(&bot, &services, &msg).await? else {
        return Ok(());
    };

    dialogue
        .update(State::DreamTitle {
            ctx: FlowCtx {
                user_id: user.id,
                lang,
            },
        })
        .await?;
    bot.send_message(msg.chat.id, locales::text(lang, "new_dream.creating"))
        .reply_markup(keyboards::cancel_only(lang))
        .await?;
    Ok(())
}

pub async fn receive_title(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    ctx: FlowCtx,
) -> HandlerResult {
    match fields::title(msg.text().unwrap_or_default()) {
        Ok(title) => {
            let draft = DreamDraft {
                title,
                ..DreamDraft::default()
            };
            dialogue.update(State::DreamDescription { ctx, draft }).await?;
            bot.send_message(msg.chat.id, locales::text(ctx.lang, "new_dream.step_2"))
                .reply_markup(keyboards::skip_cancel(ctx.lang))
                .await?;
        }
        Err(err) => {
            bot.send_message(
                msg.chat.id,
                locales::text(ctx.lang, err.prompt_key("new_dream.enter_title")),
            )
            .await?;
        }
    }
    Ok(())
}

pub async fn skip_description(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    (ctx, draft): (FlowCtx, DreamDraft),
) -> HandlerResult {
    dialogue.update(State::DreamTags { ctx, draft }).await?;
    bot.send_message(msg.chat.id, locales::text(ctx.lang, "new_dream.step_3"))
        .reply_markup(keyboards::skip_cancel(ctx.lang))
        .await?;
    Ok(())
}

pub async fn receive_description(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    (ctx, draft): (FlowCtx, DreamDraft),
) -> HandlerResult {
    match fields::free_text(msg.text().unwrap_or_default()) {
        Ok(description) => {
            let draft = DreamDraft { description, ..draft };
            dialogue.update(State::DreamTags { ctx, draft }).await?;
            bot.send_message(msg.chat.id, locales::text(ctx.lang, "new_dream.step_3"))
                .reply_markup(keyboards::skip_cancel(ctx.lang))
                .await?;
        }
        Err(err) => {
            bot.send_message(
                msg.chat.id,
                locales::text(ctx.lang, err.prompt_key("new_dream.enter_description")),
            )
            .await?;
        }
    }
    Ok(())
}

pub async fn skip_tags(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    (ctx, draft): (FlowCtx, DreamDraft),
) -> HandlerResult {
    dialogue.update(State::DreamNotes { ctx, draft }).await?;
    bot.send_message(msg.chat.id, locales::text(ctx.lang, "new_dream.step_4"))
        .reply_markup(keyboards::skip_cancel(ctx.lang))
        .await?;
    Ok(())
}

pub async fn receive_tags(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    (ctx, draft): (FlowCtx, DreamDraft),
) -> HandlerResult {
    match fields::tags(msg.text().unwrap_or_default()) {
        Ok(tags) => {
            let draft = DreamDraft { tags, ..draft };
            dialogue.update(State::DreamNotes { ctx, draft }).await?;
            bot.send_message(msg.chat.id, locales::text(ctx.lang, "new_dream.step_4"))
                .reply_markup(keyboards::skip_cancel(ctx.lang))
                .await?;
        }
        Err(err) => {
            bot.send_message(
                msg.chat.id,
                locales::text(ctx.lang, err.prompt_key("new_dream.enter_tags")),
            )
            .await?;
        }
    }
    Ok(())
}

pub async fn skip_notes(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    (ctx, draft): (FlowCtx, DreamDraft),
) -> HandlerResult {
    dialogue.update(State::DreamDate { ctx, draft }).await?;
    bot.send_message(msg.chat.id, date_prompt(ctx.lang, "new_dream.step_5"))
        .reply_markup(keyboards::today_cancel(ctx.lang))
        .await?;
    Ok(())
}

pub async fn receive_notes(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    (ctx, draft): (FlowCtx, DreamDraft),
) -> HandlerResult {
    match fields::free_text(msg.text().unwrap_or_default()) {
        Ok(notes) => {
            let draft = DreamDraft { notes, ..draft };
            dialogue.update(State::DreamDate { ctx, draft }).await?;
            bot.send_message(msg.chat.id, date_prompt(ctx.lang, "new_dream.step_5"))
                .reply_markup(keyboards::today_cancel(ctx.lang))
                .await?;
        }
        Err(err) => {
            bot.send_message(
                msg.chat.id,
                locales::text(ctx.lang, err.prompt_key("new_dream.enter_notes")),
            )
            .await?;
        }
    }
    Ok(())
}

pub async fn use_today(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    (ctx, draft): (FlowCtx, DreamDraft),
    provider: ServiceProvider,
) -> HandlerResult {
    save_dream(&bot, &dialogue, &msg, ctx, draft, today(), &provider).await
}

pub async fn receive_date(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    (ctx, draft): (FlowCtx, DreamDraft),
    provider: ServiceProvider,
) -> HandlerResult {
    match fields::dream_date(msg.text().unwrap_or_default()) {
        Ok(date) => save_dream(&bot, &dialogue, &msg, ctx, draft, date, &provider).await,
        Err(err) => {
            bot.send_message(
                msg.chat.id,
                date_prompt(ctx.lang, err.prompt_key("new_dream.enter_date")),
            )
            .await?;
            Ok(())
        }
    }
}

fn date_prompt(lang: Lang, key: &str) -> String {
    locales::text_with(lang, key, &[("today", today().to_string())])
}

async fn save_dream(
    bot: &Bot,
    dialogue: &BotDialogue,
    msg: &Message,
    ctx: FlowCtx,
    draft: DreamDraft,
    dream_date: NaiveDate,
    provider: &ServiceProvider,
) -> HandlerResult {
    let services = dream_service(provider);
    let dream = services.create_dream(ctx.user_id, draft, dream_date).await?;
    dialogue.exit().await?;

    bot.send_message(
        msg.chat.id,
        locales::text_with(
            ctx.lang,
            "new_dream.saved",
            &[
                ("id", dream.id.to_string()),
                ("title", html::escape(&dream.title)),
                ("date", dream.dream_date.to_string()),
            ],
        ),
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(keyboards::main_menu(ctx.lang))
    .await?;
    Ok(())
}

// --- LIST DREAMS ---

pub async fn list_dreams(bot: Bot, msg: Message, provider: ServiceProvider) -> HandlerResult {
    let services = dream_service(&provider);
    let Some((user, lang)) = require_user(&bot, &services, &msg).await? else {
        return Ok(());
    };
    show_page(&bot, &services, msg.chat.id, None, user.id, lang, 0).await
}

/// `page:<n>` callback; edits the message the keyboard hangs off.
pub(crate) async fn page_requested(
    bot: &Bot,
    q: &CallbackQuery,
    provider: &ServiceProvider,
    page: u32,
) -> HandlerResult {
    let services = dream_service(provider);
    let Some(user) = services.identify(q.from.id.0 as i64).await? else {
        bot.answer_callback_query(q.id.clone())
            .text(locales::text(Lang::En, "not_registered"))
            .await?;
        return Ok(());
    };
    let lang = Lang::from_code(&user.language);

    if let Some(message) = q.regular_message() {
        show_page(
            bot,
            &services,
            message.chat.id,
            Some(message.id),
            user.id,
            lang,
            page,
        )
        .await?;
    }
    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

async fn show_page(
    bot: &Bot,
    services: &Ref<dyn DreamService>,
    chat_id: ChatId,
    edit_message: Option<MessageId>,
    owner_id: i64,
    lang: Lang,
    page: u32,
) -> HandlerResult {
    let page_data = services.dream_page(owner_id, page).await?;

    if page_data.total == 0 {
        let text = locales::text(lang, "list.empty");
        match edit_message {
            Some(message_id) => {
                bot.edit_message_text(chat_id, message_id, text).await?;
            }
            None => {
                bot.send_message(chat_id, text).await?;
            }
        }
        return Ok(());
    }

    let mut lines = vec![
        locales::text_with(
            lang,
            "list.header",
            &[
                ("page", (page_data.page + 1).to_string()),
                ("total_pages", page_data.total_pages.to_string()),
            ],
        ),
        String::new(),
    ];
    lines.extend(page_data.dreams.iter().map(format::dream_line));
    lines.push(String::new());
    lines.push(locales::text_with(
        lang,
        "list.total",
        &[("count", page_data.total.to_string())],
    ));
    lines.push(locales::text(lang, "list.view_hint"));
    let text = lines.join("\n");

    let keyboard = keyboards::pagination(page_data.page, page_data.total_pages, lang);
    match (edit_message, keyboard) {
        (Some(message_id), Some(keyboard)) => {
            bot.edit_message_text(chat_id, message_id, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .await?;
        }
        (Some(message_id), None) => {
            bot.edit_message_text(chat_id, message_id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        (None, Some(keyboard)) => {
            bot.send_message(chat_id, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .await?;
        }
        (None, None) => {
            bot.send_message(chat_id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }
    }
    Ok(())
}

// --- VIEW DREAM ---

pub async fn view_dream(
    bot: Bot,
    msg: Message,
    args: String,
    provider: ServiceProvider,
) -> HandlerResult {
    let services = dream_service(&provider);
    let Some((user, lang)) = require_user(&bot, &services, &msg).await? else {
        return Ok(());
    };
    let Some(dream_id) = parse_dream_id(&bot, msg.chat.id, lang, &args, "view.usage").await? else {
        return Ok(());
    };

    match services.find_dream(dream_id, user.id).await? {
        Some(dream) => {
            bot.send_message(
                msg.chat.id,
                format!("<pre>{}</pre>", format::dream_full(&dream, lang)),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        }
        None => {
            bot.send_message(
                msg.chat.id,
                locales::text_with(lang, "view.not_found", &[("id", dream_id.to_string())]),
            )
            .await?;
        }
    }
    Ok(())
}

async fn parse_dream_id(
    bot: &Bot,
    chat_id: ChatId,
    lang: Lang,
    args: &str,
    usage_key: &str,
) -> anyhow::Result<Option<i64>> {
    let args = args.trim();
    if args.is_empty() {
        bot.send_message(chat_id, locales::text(lang, usage_key))
            .await?;
        return Ok(None);
    }
    match args.parse() {
        Ok(dream_id) => Ok(Some(dream_id)),
        Err(_) => {
            bot.send_message(chat_id, locales::text(lang, "view.invalid_id"))
                .await?;
            Ok(None)
        }
    }
}

// --- EDIT DREAM ---

pub async fn edit_dream(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    args: String,
    provider: ServiceProvider,
) -> HandlerResult {
    let services = dream_service(&provider);
    let Some((user, lang)) = require_user(&bot, &services, &msg).await? else {
        return Ok(());
    };
    let Some(dream_id) = parse_dream_id(&bot, msg.chat.id, lang, &args, "edit.usage").await? else {
        return Ok(());
    };

    let Some(dream) = services.find_dream(dream_id, user.id).await? else {
        bot.send_message(
            msg.chat.id,
            locales::text_with(lang, "view.not_found", &[("id", dream_id.to_string())]),
        )
        .await?;
        return Ok(());
    };

    dialogue
        .update(State::EditField {
            ctx: FlowCtx {
                user_id: user.id,
                lang,
            },
            dream_id,
        })
        .await?;
    bot.send_message(
        msg.chat.id,
        locales::text_with(
            lang,
            "edit.header",
            &[
                ("id", dream_id.to_string()),
                ("title", html::escape(&dream.title)),
            ],
        ),
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(keyboards::edit_menu(lang))
    .await?;
    Ok(())
}

/// `edit:<field|cancel>` callback while the field menu is open.
pub async fn edit_field_chosen(
    bot: Bot,
    dialogue: BotDialogue,
    q: CallbackQuery,
    (ctx, dream_id): (FlowCtx, i64),
) -> HandlerResult {
    if let (Some(message), Some(data)) = (q.regular_message(), q.data.as_deref()) {
        match callback::parse(data) {
            Some(CallbackAction::EditCancel) => {
                dialogue.exit().await?;
                bot.edit_message_text(
                    message.chat.id,
                    message.id,
                    locales::text(ctx.lang, "edit.cancelled"),
                )
                .await?;
            }
            Some(CallbackAction::EditField(field)) => {
                dialogue
                    .update(State::EditValue {
                        ctx,
                        dream_id,
                        field,
                    })
                    .await?;
                bot.edit_message_text(
                    message.chat.id,
                    message.id,
                    locales::text(ctx.lang, field.prompt_key()),
                )
                .await?;
            }
            _ => {}
        }
    }
    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

pub async fn receive_edit_value(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    (ctx, dream_id, field): (FlowCtx, i64, DreamField),
    provider: ServiceProvider,
) -> HandlerResult {
    match field.validate(msg.text().unwrap_or_default()) {
        Ok(value) => {
            let services = dream_service(&provider);
            let updated = services.edit_dream(dream_id, ctx.user_id, &value).await?;
            dialogue.exit().await?;

            let text = if updated {
                locales::text_with(ctx.lang, "edit.updated", &[("id", dream_id.to_string())])
            } else {
                // The dream vanished between selection and apply.
                locales::text(ctx.lang, "edit.not_found")
            };
            bot.send_message(msg.chat.id, text)
                .reply_markup(keyboards::main_menu(ctx.lang))
                .await?;
        }
        Err(err) => {
            bot.send_message(
                msg.chat.id,
                date_prompt(ctx.lang, err.prompt_key("edit.enter_value")),
            )
            .await?;
        }
    }
    Ok(())
}

// --- DELETE DREAM ---

pub async fn delete_dream(
    bot: Bot,
    msg: Message,
    args: String,
    provider: ServiceProvider,
) -> HandlerResult {
    let services = dream_service(&provider);
    let Some((user, lang)) = require_user(&bot, &services, &msg).await? else {
        return Ok(());
    };
    let Some(dream_id) = parse_dream_id(&bot, msg.chat.id, lang, &args, "delete.usage").await?
    else {
        return Ok(());
    };

    let Some(dream) = services.find_dream(dream_id, user.id).await? else {
        bot.send_message(
            msg.chat.id,
            locales::text_with(lang, "view.not_found", &[("id", dream_id.to_string())]),
        )
        .await?;
        return Ok(());
    };

    bot.send_message(
        msg.chat.id,
        locales::text_with(
            lang,
            "delete.confirm",
            &[
                ("id", dream_id.to_string()),
                ("title", html::escape(&dream.title)),
                ("date", dream.dream_date.to_string()),
            ],
        ),
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(keyboards::delete_confirm(dream_id, lang))
    .await?;
    Ok(())
}

pub(crate) async fn delete_confirmed(
    bot: &Bot,
    q: &CallbackQuery,
    provider: &ServiceProvider,
    dream_id: i64,
) -> HandlerResult {
    let services = dream_service(provider);
    let Some(user) = services.identify(q.from.id.0 as i64).await? else {
        bot.answer_callback_query(q.id.clone())
            .text(locales::text(Lang::En, "not_registered"))
            .await?;
        return Ok(());
    };
    let lang = Lang::from_code(&user.language);

    if let Some(message) = q.regular_message() {
        let deleted = services.delete_dream(dream_id, user.id).await?;
        let text = if deleted {
            locales::text_with(lang, "delete.deleted", &[("id", dream_id.to_string())])
        } else {
            locales::text(lang, "delete.not_found")
        };
        bot.edit_message_text(message.chat.id, message.id, text).await?;
    }
    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

pub(crate) async fn delete_cancelled(
    bot: &Bot,
    q: &CallbackQuery,
    provider: &ServiceProvider,
) -> HandlerResult {
    let services = dream_service(provider);
    let lang = sender_language(&services, q.from.id.0 as i64).await?;

    if let Some(message) = q.regular_message() {
        bot.edit_message_text(
            message.chat.id,
            message.id,
            locales::text(lang, "delete.cancelled"),
        )
        .await?;
    }
    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

// --- EXPORT DREAMS ---

pub async fn export_dreams(bot: Bot, msg: Message, provider: ServiceProvider) -> HandlerResult {
    let services = dream_service(&provider);
    let Some((user, lang)) = require_user(&bot, &services, &msg).await? else {
        return Ok(());
    };

    let dreams = services.all_dreams(user.id).await?;
    if dreams.is_empty() {
        bot.send_message(msg.chat.id, locales::text(lang, "export.empty"))
            .reply_markup(keyboards::main_menu(lang))
            .await?;
        return Ok(());
    }

    let today = today();
    let document = format::export_document(&dreams, lang, today);
    let file = InputFile::memory(document.into_bytes())
        .file_name(format!("dreams_export_{today}.txt"));

    bot.send_document(msg.chat.id, file)
        .caption(locales::text_with(
            lang,
            "export.caption",
            &[("count", dreams.len().to_string())],
        ))
        .reply_markup(keyboards::main_menu(lang))
        .await?;
    Ok(())
}

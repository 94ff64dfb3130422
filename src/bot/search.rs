//! Keyword search over the diary.
//!
//! Two entry points share one executor: `/search <query>` runs immediately,
//! the menu button opens a single-prompt flow first.

use crate::bot::{
    BotDialogue, FlowCtx, HandlerResult, State, dream_service, format, keyboards, require_user,
};
use crate::core::traits::DreamService;
use crate::locales::{self, Lang};
use di::{Ref, ServiceProvider};
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html;

pub async fn search_command(
    bot: Bot,
    msg: Message,
    args: String,
    provider: ServiceProvider,
) -> HandlerResult {
    let services = dream_service(&provider);
    let Some((user, lang)) = require_user(&bot, &services, &msg).await? else {
        return Ok(());
    };

    let query = args.trim();
    if query.is_empty() {
        bot.send_message(msg.chat.id, locales::text(lang, "search.usage"))
            .reply_markup(keyboards::main_menu(lang))
            .await?;
        return Ok(());
    }
    run_search(&bot, &services, msg.chat.id, user.id, lang, query).await
}

pub async fn search_button(
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
        .update(State::SearchQuery {
            ctx: FlowCtx {
                user_id: user.id,
                lang,
            },
        })
        .await?;
    bot.send_message(msg.chat.id, locales::text(lang, "search.prompt"))
        .reply_markup(keyboards::cancel_only(lang))
        .await?;
    Ok(())
}

pub async fn receive_query(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    ctx: FlowCtx,
    provider: ServiceProvider,
) -> HandlerResult {
    let query = msg.text().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        bot.send_message(msg.chat.id, locales::text(ctx.lang, "search.prompt"))
            .await?;
        return Ok(());
    }

    dialogue.exit().await?;
    let services = dream_service(&provider);
    run_search(&bot, &services, msg.chat.id, ctx.user_id, ctx.lang, query).await
}

async fn run_search(
    bot: &Bot,
    services: &Ref<dyn DreamService>,
    chat_id: ChatId,
    owner_id: i64,
    lang: Lang,
    query: &str,
) -> HandlerResult {
    let results = services.search_dreams(owner_id, query).await?;
    let escaped_query = html::escape(query);

    if results.dreams.is_empty() {
        bot.send_message(
            chat_id,
            locales::text_with(lang, "search.no_results", &[("query", escaped_query)]),
        )
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::main_menu(lang))
        .await?;
        return Ok(());
    }

    let mut lines = vec![
        locales::text_with(lang, "search.header", &[("query", escaped_query)]),
        String::new(),
    ];
    lines.extend(results.dreams.iter().map(format::dream_line));
    lines.push(String::new());
    lines.push(locales::text_with(
        lang,
        "search.found",
        &[("count", results.dreams.len().to_string())],
    ));
    if results.truncated {
        lines.push(locales::text_with(
            lang,
            "search.truncated",
            &[("count", results.dreams.len().to_string())],
        ));
    }
    lines.push(locales::text(lang, "list.view_hint"));

    bot.send_message(chat_id, lines.join("\n"))
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::main_menu(lang))
        .await?;
    Ok(())
}

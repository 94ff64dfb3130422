//! Registration, language selection, help, and the global cancel.

use crate::bot::{BotDialogue, HandlerResult, State, dream_service, keyboards, sender_language};
use crate::locales::{self, Lang};
use di::ServiceProvider;
use teloxide::prelude::*;

pub async fn start(bot: Bot, msg: Message, provider: ServiceProvider) -> HandlerResult {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let services = dream_service(&provider);

    match services.identify(from.id.0 as i64).await? {
        Some(user) => {
            let lang = Lang::from_code(&user.language);
            bot.send_message(msg.chat.id, locales::text(lang, "welcome"))
                .reply_markup(keyboards::main_menu(lang))
                .await?;
        }
        None => {
            // No language on record yet, so ask in both.
            bot.send_message(
                msg.chat.id,
                "Please choose your language:\nПожалуйста, выберите язык:",
            )
            .reply_markup(keyboards::language_menu())
            .await?;
        }
    }
    Ok(())
}

pub async fn help(bot: Bot, msg: Message, provider: ServiceProvider) -> HandlerResult {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let services = dream_service(&provider);
    let lang = sender_language(&services, from.id.0 as i64).await?;

    bot.send_message(msg.chat.id, locales::text(lang, "help"))
        .reply_markup(keyboards::main_menu(lang))
        .await?;
    Ok(())
}

pub async fn choose_language(bot: Bot, msg: Message, provider: ServiceProvider) -> HandlerResult {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let services = dream_service(&provider);
    let lang = sender_language(&services, from.id.0 as i64).await?;

    bot.send_message(msg.chat.id, locales::text(lang, "language.choose"))
        .reply_markup(keyboards::language_menu())
        .await?;
    Ok(())
}

/// `lang:<code>` callback: registers first-time senders, otherwise switches
/// the stored language.
pub(crate) async fn language_chosen(
    bot: &Bot,
    q: &CallbackQuery,
    provider: &ServiceProvider,
    lang: Lang,
) -> HandlerResult {
    let services = dream_service(provider);
    services.set_language(q.from.id.0 as i64, lang.code()).await?;

    if let Some(message) = q.regular_message() {
        bot.edit_message_text(
            message.chat.id,
            message.id,
            locales::text(lang, "language.changed"),
        )
        .await?;
        bot.send_message(message.chat.id, locales::text(lang, "welcome"))
            .reply_markup(keyboards::main_menu(lang))
            .await?;
    }
    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

/// Global cancel: discards whatever flow is in progress, no side effects.
pub async fn cancel(
    bot: Bot,
    dialogue: BotDialogue,
    msg: Message,
    provider: ServiceProvider,
) -> HandlerResult {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let services = dream_service(&provider);
    let lang = sender_language(&services, from.id.0 as i64).await?;

    let idle = matches!(dialogue.get().await?, None | Some(State::Idle));
    let key = if idle {
        "cancel.nothing"
    } else {
        dialogue.exit().await?;
        "cancel.cancelled"
    };

    bot.send_message(msg.chat.id, locales::text(lang, key))
        .reply_markup(keyboards::main_menu(lang))
        .await?;
    Ok(())
}

//! Prompt template for the channel post.

/// Signature closing every post.
pub const SIGNATURE: &str = "— auto via code";

/// Hashtags appended after the signature.
pub const HASHTAGS: &str = "#дизельгенератор #сервис";

/// Build the generation prompt for `topic` with the headlines as bulleted context.
pub fn build_prompt(topic: &str, headlines: &[String]) -> String {
    let news_block = headlines
        .iter()
        .map(|h| format!("- {}", h))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Ты автор Telegram-канала сервисной компании, которая ремонтирует и обслуживает дизельные генераторы.
Напиши короткий полезный пост на русском языке.

Тема: {topic}

Свежие новости по теме (используй как контекст, не пересказывай дословно):
{news_block}

Структура поста:
1. Заголовок не длиннее 70 символов.
2. Основной текст из 5–7 строк: простым языком, с практической пользой для владельца генератора.
3. Чек-лист ровно из 3 пунктов, каждый начинается с «✅».
4. Подпись отдельной строкой: {SIGNATURE}
5. Хэштеги последней строкой: {HASHTAGS}

Не используй markdown-разметку и не добавляй ничего, кроме самого поста."#
    )
}

use crate::prompt::{HASHTAGS, SIGNATURE};

/// Deterministic post served in place of a failed generation.
pub fn build_fallback(topic: &str, reason: &str) -> String {
    format!(
        "⚙️ Тема: {topic}\n\
         \n\
         Автоматическая генерация сейчас недоступна, поэтому делимся базовым чек-листом диагностики.\n\
         \n\
         Чек-лист:\n\
         ✅ Проверьте топливо, воздушный фильтр и заряд аккумулятора\n\
         ✅ Считайте коды ошибок контроллера и проверьте датчики\n\
         ✅ Проверьте стартер, соленоид и цепь зажигания\n\
         \n\
         Причина fallback: {reason}\n\
         \n\
         {SIGNATURE}\n\
         {HASHTAGS}"
    )
}

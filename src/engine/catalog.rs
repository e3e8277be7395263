//! Static table of known providers.

use super::EngineKind;

/// Known providers: (name, url_template, icon, kind)
///
/// Templates without `{query}` are landing pages; whether the query reaches
/// them is decided by the provider rule table.
pub const ENGINES: &[(&str, &str, &str, EngineKind)] = &[
    // AI assistants
    ("Kimi", "https://kimi.moonshot.cn", "ic_kimi", EngineKind::Ai),
    ("DeepSeek", "https://chat.deepseek.com", "ic_deepseek", EngineKind::Ai),
    ("豆包", "https://www.doubao.com", "ic_doubao", EngineKind::Ai),
    ("ChatGPT", "https://chat.openai.com", "ic_chatgpt", EngineKind::Ai),
    ("Claude", "https://claude.ai", "ic_claude", EngineKind::Ai),
    ("Gemini", "https://gemini.google.com", "ic_gemini", EngineKind::Ai),
    ("文心一言", "https://yiyan.baidu.com", "ic_wenxin", EngineKind::Ai),
    ("通义千问", "https://tongyi.aliyun.com", "ic_qianwen", EngineKind::Ai),
    ("智谱清言", "https://chatglm.cn", "ic_chatglm", EngineKind::Ai),
    ("Perplexity", "https://www.perplexity.ai/search?q={query}", "ic_perplexity", EngineKind::Ai),
    ("秘塔AI搜索", "https://metaso.cn/?q={query}", "ic_metaso", EngineKind::Ai),
    ("Poe", "https://poe.com", "ic_poe", EngineKind::Ai),
    // Web search
    ("Google", "https://www.google.com", "ic_google", EngineKind::Search),
    ("Bing", "https://www.bing.com", "ic_bing", EngineKind::Search),
    ("百度", "https://www.baidu.com", "ic_baidu", EngineKind::Search),
    ("必应", "https://cn.bing.com", "ic_bing", EngineKind::Search),
    ("知乎", "https://www.zhihu.com", "ic_zhihu", EngineKind::Search),
    ("微博", "https://s.weibo.com", "ic_weibo", EngineKind::Search),
    ("DuckDuckGo", "https://duckduckgo.com/?q={query}", "ic_duckduckgo", EngineKind::Search),
    ("搜狗", "https://www.sogou.com/web?query={query}", "ic_sogou", EngineKind::Search),
    ("Brave Search", "https://search.brave.com/search?q={query}", "ic_brave", EngineKind::Search),
];

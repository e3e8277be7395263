//! Built-in ad and tracker patterns, matched against lowercased URLs.

/// Ad and tracker hosts (substring match)
pub const AD_DOMAINS: &[&str] = &[
    "doubleclick.net",
    "googleadservices.com",
    "googlesyndication.com",
    "googletagmanager.com",
    "googletagservices.com",
    "google-analytics.com",
    "adsense.google.com",
    "2mdn.net",
    "facebook.com/tr",
    "facebook.com/plugins",
    "connect.facebook.net",
    "scorecardresearch.com",
    "quantserve.com",
    "outbrain.com",
    "taboola.com",
    "amazon-adsystem.com",
    "adsystem.amazon.",
    "media.net",
    "adnxs.com",
    "flurry.com",
    "analytics.twitter.com",
    "static.ads-twitter.com",
    "ads-api.twitter.com",
    "ads.yahoo.com",
    "analytics.yahoo.com",
    "ads.linkedin.com",
    "px.ads.linkedin.com",
    "ads.pinterest.com",
    "ads.reddit.com",
    "ads.tiktok.com",
    "analytics.tiktok.com",
    "ads.snapchat.com",
    "tr.snapchat.com",
    "ads.youtube.com",
    // Chinese ad networks
    "pos.baidu.com",
    "cbjs.baidu.com",
    "baidu.com/cpro",
    "union.360.cn",
    "tanx.com",
    "alimama.com",
    "mediav.com",
    "irs01.com",
    "irs03.com",
];

/// Ad path segments
pub const AD_PATHS: &[&str] = &[
    "/ads/",
    "/ad/",
    "/advertisement/",
    "/advertising/",
    "/adsense/",
    "/doubleclick/",
    "/googleads/",
    "/tracking/",
    "/tracker/",
    "/beacon/",
    "/pixel/",
    "/impression/",
    "/banner/",
    "/popup/",
    "/popunder/",
    "/interstitial/",
];

/// Ad script file suffixes
pub const AD_SUFFIXES: &[&str] = &[
    ".ads.js",
    ".analytics.js",
    ".tracking.js",
    ".tracker.js",
    ".metrics.js",
    ".beacon.js",
    ".pixel.js",
    ".advertisement.js",
];

/// Tracking query parameters
pub const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_content",
    "utm_term",
    "gclid",
    "fbclid",
    "msclkid",
    "twclid",
    "dclid",
    "_ga",
    "_gid",
];

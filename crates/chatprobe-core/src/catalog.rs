//! Authoring-time constants for the chat widget probes.
//!
//! Selector candidates are ordered from most to least specific; the
//! geometric fallback always comes last. These lists are fixed at build
//! time and never mutated at runtime.

use crate::cascade::{Cascade, Strategy};

/// Viewport the geometric heuristics assume.
pub const VIEWPORT_WIDTH: u32 = 1280;
pub const VIEWPORT_HEIGHT: u32 = 800;

/// Message typed into the chat input once it is found.
pub const TEST_MESSAGE: &str = "What's my net worth?";

/// Fixed settle delay after actions that trigger UI transitions.
pub const SETTLE_MS: u64 = 2000;

/// Bounded reply poll: fixed interval, fixed maximum iteration count.
pub const REPLY_POLL_INTERVAL_MS: u64 = 1000;
pub const REPLY_POLL_MAX: usize = 15;

/// Page navigation timeout.
pub const NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// The chat toggle button, usually floating in the bottom-right corner.
pub const TOGGLE: Cascade = Cascade {
    feature: "chat_button",
    strategies: &[
        Strategy::TextContains {
            tag: "button",
            needle: "\u{1f4ac}",
        },
        Strategy::Css("[class*='chat']"),
        Strategy::Css("button[class*='fixed'][class*='bottom']"),
        Strategy::Css(".chat-widget button"),
        Strategy::Css("#chat-button"),
        Strategy::Css("[data-testid='chat-button']"),
        Strategy::BottomRight {
            min_x: 1000.0,
            min_y: 600.0,
        },
    ],
};

/// The opened chat panel container.
pub const WINDOW: Cascade = Cascade {
    feature: "chat_window",
    strategies: &[
        Strategy::Css("[class*='chat-window']"),
        Strategy::Css("[class*='ChatWindow']"),
        Strategy::Css(".chat-container"),
        Strategy::Css("[class*='fixed'][class*='bottom'][class*='right']"),
        Strategy::TextContains {
            tag: "h3",
            needle: "FI Assistant",
        },
    ],
};

/// The message entry field inside the panel.
pub const INPUT: Cascade = Cascade {
    feature: "text_input",
    strategies: &[
        Strategy::Css("textarea[placeholder*='message']"),
        Strategy::Css("textarea[placeholder*='voice']"),
        Strategy::Css("textarea"),
        Strategy::Css("input[type='text']"),
        Strategy::Css("input[placeholder*='message']"),
        Strategy::Css("[contenteditable='true']"),
    ],
};

/// The submit control next to the input.
pub const SEND: Cascade = Cascade {
    feature: "send_button",
    strategies: &[
        Strategy::TextContains {
            tag: "button",
            needle: "Send",
        },
        Strategy::Css("button[type='submit']"),
        Strategy::Css("button.bg-emerald-600"),
        Strategy::Css("form button"),
    ],
};

/// Message bubbles; more than one means the assistant replied.
pub const REPLY_BUBBLES: Cascade = Cascade {
    feature: "reply_bubbles",
    strategies: &[
        Strategy::Css(".message"),
        Strategy::Css("[class*='message']"),
        Strategy::Css("[class*='bubble']"),
        Strategy::Css("[class*='rounded-2xl'][class*='px-4']"),
    ],
};

/// Optional voice affordance; absence is not a failure.
pub const VOICE: Cascade = Cascade {
    feature: "voice_button",
    strategies: &[
        Strategy::TextContains {
            tag: "button",
            needle: "\u{1f3a4}",
        },
        Strategy::Css("[class*='VoiceButton']"),
        Strategy::Css("[class*='voice']"),
        Strategy::Css("[class*='mic']"),
        Strategy::Css("button[title*='voice']"),
        Strategy::Css("button[title*='Start']"),
    ],
};

/// Optional quick-suggestion chips; absence is not a failure.
pub const SUGGESTIONS: Cascade = Cascade {
    feature: "quick_suggestions",
    strategies: &[
        Strategy::TextContains {
            tag: "button",
            needle: "Add expense",
        },
        Strategy::TextContains {
            tag: "button",
            needle: "My net worth",
        },
        Strategy::TextContains {
            tag: "button",
            needle: "FI progress",
        },
        Strategy::Css("button.rounded-full"),
        Strategy::Css("[class*='suggestion']"),
        Strategy::Css("[class*='quick']"),
    ],
};

//! Icon module
//!
//! Resolves icon resource keys to the glyphs shown in instance lists.

/// Icon used for newly created instances
pub const DEFAULT_INSTANCE_ICON: &str = "cosmic_logo_x32.png";

/// A resolved icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    pub key: &'static str,
    pub glyph: &'static str,
}

const FALLBACK: Icon = Icon {
    key: "unknown",
    glyph: "📦",
};

/// Built-in icons, keyed by resource file name
const ICONS: &[Icon] = &[
    Icon {
        key: DEFAULT_INSTANCE_ICON,
        glyph: "🌌",
    },
    Icon {
        key: "cosmic_logo_x64.png",
        glyph: "🌌",
    },
    Icon {
        key: "block_grass.png",
        glyph: "🟩",
    },
    Icon {
        key: "block_stone.png",
        glyph: "⬜",
    },
];

/// Icon lookup service
#[derive(Debug, Default)]
pub struct IconManager;

impl IconManager {
    pub fn new() -> Self {
        Self
    }

    /// Look up an icon by resource key. Unknown keys get a generic icon.
    pub fn get_icon(&self, key: &str) -> Icon {
        ICONS
            .iter()
            .find(|icon| icon.key == key)
            .copied()
            .unwrap_or_else(|| {
                tracing::debug!("Unknown icon '{}', using fallback", key);
                FALLBACK
            })
    }
}

use serenity::all::CreateEmbed;

/// MLC brand colors used across all bot embeds.
pub struct Colors;

impl Colors {
    pub const MLC: u32 = 0xFFCC00;
    pub const SUCCESS: u32 = 0x00FF88;
    pub const WARNING: u32 = 0xFFA500;
    pub const ERROR: u32 = 0xFF4444;
}

/// Create a standard MLC-themed embed with default color, footer, and timestamp.
pub fn mlc_embed() -> CreateEmbed {
    base_embed(Colors::MLC)
}

/// Create a success-themed embed (green).
pub fn success_embed() -> CreateEmbed {
    base_embed(Colors::SUCCESS)
}

/// Create a warning-themed embed (orange).
pub fn warning_embed() -> CreateEmbed {
    base_embed(Colors::WARNING)
}

/// Create an error-themed embed (red).
pub fn error_embed() -> CreateEmbed {
    base_embed(Colors::ERROR)
}

fn base_embed(color: u32) -> CreateEmbed {
    CreateEmbed::default()
        .color(color)
        .footer(serenity::all::CreateEmbedFooter::new("MLC • Sistema automático"))
        .timestamp(serenity::model::Timestamp::now())
}

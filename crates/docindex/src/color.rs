use clap::ValueEnum;

/// The `--color` switch.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, ValueEnum)]
pub enum Color {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    /// Plain text
    Never,
    /// Color even when piped
    Always,
}

impl Color {
    fn enabled(self) -> bool {
        match self {
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
            Self::Never => false,
            Self::Always => true,
        }
    }

    /// Make every `colored` string rendered from now on follow this setting.
    pub fn apply(self) {
        colored::control::set_override(self.enabled());
    }
}

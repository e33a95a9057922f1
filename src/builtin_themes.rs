//! Built-in themes for wavdeck
//!
//! Every theme keeps the transport colours (green play, red stop, yellow
//! pause) and only changes the surroundings.

use crate::tui::{GlobalTheme, Theme};
use ratatui::style::Color;

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(r, g, b)
}

/// Terminal colours with the classic transport buttons.
pub fn classic() -> Theme {
    Theme::default()
}

/// Catppuccin Mocha theme
///
/// Based on [Catppuccin](https://github.com/catppuccin/catppuccin)
pub fn catppuccin_mocha() -> Theme {
    let mut theme = Theme {
        global: GlobalTheme {
            background: rgb(30, 30, 46),         // #1e1e2e
            foreground: rgb(205, 214, 244),      // #cdd6f4
            highlight: Some(rgb(203, 166, 247)), // #cba6f7 (mauve)
        },
        start: rgb(166, 227, 161), // #a6e3a1
        stop: rgb(243, 139, 168),  // #f38ba8
        pause: rgb(249, 226, 175), // #f9e2af
        ..Default::default()
    };
    theme.apply_global_as_default();
    theme
}

/// Dracula theme
///
/// Based on [Dracula Theme](https://draculatheme.com/)
pub fn dracula() -> Theme {
    let mut theme = Theme {
        global: GlobalTheme {
            background: rgb(40, 42, 54),         // #282a36
            foreground: rgb(248, 248, 242),      // #f8f8f2
            highlight: Some(rgb(189, 147, 249)), // #bd93f9 (purple)
        },
        start: rgb(80, 250, 123),  // #50fa7b
        stop: rgb(255, 85, 85),    // #ff5555
        pause: rgb(241, 250, 140), // #f1fa8c
        ..Default::default()
    };
    theme.apply_global_as_default();
    theme
}

/// Gruvbox Dark theme
///
/// Based on [Gruvbox](https://github.com/morhetz/gruvbox)
pub fn gruvbox_dark() -> Theme {
    let mut theme = Theme {
        global: GlobalTheme {
            background: rgb(40, 40, 40),        // #282828
            foreground: rgb(235, 219, 178),     // #ebdbb2
            highlight: Some(rgb(254, 128, 25)), // #fe8019 (orange)
        },
        start: rgb(184, 187, 38), // #b8bb26
        stop: rgb(251, 73, 52),   // #fb4934
        pause: rgb(250, 189, 47), // #fabd2f
        ..Default::default()
    };
    theme.apply_global_as_default();
    theme
}

/// Nord theme
///
/// Based on [Nord](https://github.com/arcticicestudio/nord)
pub fn nord() -> Theme {
    let mut theme = Theme {
        global: GlobalTheme {
            background: rgb(46, 52, 64),         // #2E3440 (nord0)
            foreground: rgb(216, 222, 233),      // #D8DEE9 (nord4)
            highlight: Some(rgb(136, 192, 208)), // #88C0D0 (nord8)
        },
        start: rgb(163, 190, 140), // #A3BE8C (nord14)
        stop: rgb(191, 97, 106),   // #BF616A (nord11)
        pause: rgb(235, 203, 139), // #EBCB8B (nord13)
        ..Default::default()
    };
    theme.apply_global_as_default();
    theme
}

/// Solarized Dark theme
///
/// Based on [Solarized](https://ethanschoonover.com/solarized/)
pub fn solarized_dark() -> Theme {
    let mut theme = Theme {
        global: GlobalTheme {
            background: rgb(0, 43, 54),         // #002b36 (base03)
            foreground: rgb(131, 148, 150),     // #839496 (base0)
            highlight: Some(rgb(38, 139, 210)), // #268bd2 (blue)
        },
        start: rgb(133, 153, 0), // #859900
        stop: rgb(220, 50, 47),  // #dc322f
        pause: rgb(181, 137, 0), // #b58900
        ..Default::default()
    };
    theme.apply_global_as_default();
    theme
}

/// Tokyo Night theme
///
/// Based on [tokyonight.nvim](https://github.com/folke/tokyonight.nvim)
pub fn tokyo_night() -> Theme {
    let mut theme = Theme {
        global: GlobalTheme {
            background: rgb(26, 27, 38),         // #1a1b26
            foreground: rgb(192, 202, 245),      // #c0caf5
            highlight: Some(rgb(122, 162, 247)), // #7aa2f7 (blue)
        },
        start: rgb(158, 206, 106), // #9ece6a
        stop: rgb(247, 118, 142),  // #f7768e
        pause: rgb(224, 175, 104), // #e0af68
        ..Default::default()
    };
    theme.apply_global_as_default();
    theme
}

/// Get a theme by name
///
/// Returns `None` if the theme name is not recognized. Names are
/// case-sensitive and match [`list_themes`].
pub fn get_by_name(name: &str) -> Option<Theme> {
    match name {
        "Classic" => Some(classic()),
        "Catppuccin Mocha" => Some(catppuccin_mocha()),
        "Dracula" => Some(dracula()),
        "Gruvbox Dark" => Some(gruvbox_dark()),
        "Nord" => Some(nord()),
        "Solarized Dark" => Some(solarized_dark()),
        "Tokyo Night" => Some(tokyo_night()),
        _ => None,
    }
}

pub fn list_themes() -> &'static [&'static str] {
    &[
        "Classic",
        "Catppuccin Mocha",
        "Dracula",
        "Gruvbox Dark",
        "Nord",
        "Solarized Dark",
        "Tokyo Night",
    ]
}

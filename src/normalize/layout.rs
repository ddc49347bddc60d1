//! Indentation rendering shared by the layout normalizers.

use crate::infer::Dimension;
use crate::profile::StyleProfile;

/// Which character family renders indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentKind {
    Space,
    Tab,
}

/// Indentation settings resolved from a profile (or its defaults).
#[derive(Debug, Clone, Copy)]
pub struct IndentOptions {
    pub kind: IndentKind,
    /// One indent step, also the tab-equivalent width for column math.
    pub width: u32,
}

impl Default for IndentOptions {
    fn default() -> Self {
        Self {
            kind: IndentKind::Space,
            width: 2,
        }
    }
}

impl IndentOptions {
    /// Resolve from the profile's indent-style/indent-width rules, falling
    /// back to two-space indentation where undetermined.
    pub fn from_profile(profile: &StyleProfile) -> Self {
        let defaults = Self::default();
        let kind = match profile.enforced_keyword(Dimension::IndentStyle) {
            Some("tab") => IndentKind::Tab,
            Some(_) => IndentKind::Space,
            None => defaults.kind,
        };
        let width = profile
            .enforced_number(Dimension::IndentWidth)
            .unwrap_or(defaults.width)
            .max(1);
        Self { kind, width }
    }

    /// One indent step as text.
    pub fn step(&self) -> String {
        render_column(self.width, *self)
    }
}

/// Render target column `col`: spaces render as `col` literal spaces; tabs
/// render as `floor(col / width)` tab characters followed by `col % width`
/// spaces.
pub fn render_column(col: u32, opts: IndentOptions) -> String {
    match opts.kind {
        IndentKind::Space => " ".repeat(col as usize),
        IndentKind::Tab => {
            let width = opts.width.max(1);
            let mut out = "\t".repeat((col / width) as usize);
            out.push_str(&" ".repeat((col % width) as usize));
            out
        }
    }
}

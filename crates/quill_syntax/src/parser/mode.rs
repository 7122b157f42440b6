/// Parse modes.
///
/// A small bitset. `FULL_PARSE` is the empty set; the other flags combine with `|` and are queried with
/// [`ParseMode::is`]. Only `SKIP_DEFINITIONS` changes what the grammar does; the remaining flags are read by the
/// package driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParseMode(u8);

impl ParseMode {
    /// Parse everything, following imports.
    pub const FULL_PARSE: ParseMode = ParseMode(0);
    /// Parse only the named module; do not follow imports.
    pub const JUST_MODULE: ParseMode = ParseMode(1 << 0);
    /// Parse only the header, imports and fixity declarations.
    pub const SKIP_DEFINITIONS: ParseMode = ParseMode(1 << 1);
    /// Render diagnostics to stderr instead of collecting them into the returned error.
    pub const STDERR_DIAGNOSTICS: ParseMode = ParseMode(1 << 2);
    /// Drop warnings.
    pub const SKIP_WARNINGS: ParseMode = ParseMode(1 << 3);

    const SHAPE: u8 = Self::JUST_MODULE.0 | Self::SKIP_DEFINITIONS.0;

    /// Return `true` if `flag` is set. `is(FULL_PARSE)` means neither `JUST_MODULE` nor `SKIP_DEFINITIONS` is set.
    pub const fn is(self, flag: ParseMode) -> bool {
        if flag.0 == 0 {
            self.0 & Self::SHAPE == 0
        } else {
            self.0 & flag.0 == flag.0
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// The same mode with `flag` cleared.
    pub const fn without(self, flag: ParseMode) -> ParseMode {
        ParseMode(self.0 & !flag.0)
    }
}

impl std::ops::BitOr for ParseMode {
    type Output = ParseMode;

    fn bitor(self, rhs: ParseMode) -> ParseMode {
        ParseMode(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ParseMode {
    fn bitor_assign(&mut self, rhs: ParseMode) {
        self.0 |= rhs.0;
    }
}

//! Per-language spoken replacements for typographic symbols.
//!
//! Synthesizers tend to skip or mispronounce bullets and arrows, and read an
//! em-dash glued to its neighbours as part of a word.  Every [`Language`]
//! has a full table covering every [`SymbolClass`]; symbols outside the
//! table pass through unchanged.

use crate::language::Language;

/// Typographic symbols the normalizer rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    /// `•`
    Bullet,
    /// `→`
    Arrow,
    /// `—`
    EmDash,
}

impl SymbolClass {
    pub const ALL: [SymbolClass; 3] = [SymbolClass::Bullet, SymbolClass::Arrow, SymbolClass::EmDash];

    /// The literal character this class matches.
    pub fn symbol(&self) -> char {
        match self {
            SymbolClass::Bullet => '•',
            SymbolClass::Arrow => '→',
            SymbolClass::EmDash => '—',
        }
    }
}

/// Replacement words for one language.
#[derive(Debug, Clone, Copy)]
pub struct SymbolTable {
    pub bullet: &'static str,
    pub arrow: &'static str,
    pub em_dash: &'static str,
}

static ENGLISH: SymbolTable = SymbolTable {
    bullet: "bullet point",
    arrow: "arrow",
    em_dash: "-",
};

static RUSSIAN: SymbolTable = SymbolTable {
    bullet: "маркер",
    arrow: "стрелка",
    em_dash: "-",
};

impl SymbolTable {
    /// Table for `language`.  [`Language::Unknown`] reads symbols in English.
    pub fn for_language(language: Language) -> &'static SymbolTable {
        match language {
            Language::Russian => &RUSSIAN,
            Language::English | Language::Unknown => &ENGLISH,
        }
    }

    /// Spoken replacement for `class`.
    pub fn replacement(&self, class: SymbolClass) -> &'static str {
        match class {
            SymbolClass::Bullet => self.bullet,
            SymbolClass::Arrow => self.arrow,
            SymbolClass::EmDash => self.em_dash,
        }
    }

    /// Replace every known symbol in `text`, padding replacements with
    /// spaces so they never fuse with adjacent words.
    ///
    /// The result may contain repeated spaces; callers collapse them.
    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match SymbolClass::ALL.iter().find(|class| class.symbol() == c) {
                Some(class) => {
                    out.push(' ');
                    out.push_str(self.replacement(*class));
                    out.push(' ');
                }
                None => out.push(c),
            }
        }
        out
    }
}

//! Reading and writing the JavaScript files rustdoc emits.
//!
//! Implementor files come in two shapes:
//!
//! ```text
//! (function() {var implementors = {};
//! implementors["bytes"] = [{"text":"...","synthetic":false,"types":["bytes::buf::reader::Reader"]}];
//! if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()
//! ```
//!
//! or with the whole table as one object literal after `var implementors =`.
//! Sidebar files are either `initSidebarItems({...});` or
//! `window.SIDEBAR_ITEMS = {...};`.
//!
//! Only the JSON payload is interpreted. The HTML inside `text` is kept as is.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{DuplicateKey, ImplementorTable, SidebarItems};

const REGISTER_TAIL: &str = "if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()";

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("not a rustdoc implementors or sidebar-items script")]
    Unrecognized,
    #[error("expected `{expected}` at byte {offset}")]
    Expected {
        expected: &'static str,
        offset: usize,
    },
    #[error("invalid JSON at byte {offset}: {source}")]
    Json {
        offset: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} in implementors table")]
    DuplicateKey(#[from] DuplicateKey),
    #[error("unexpected trailing input at byte {offset}")]
    TrailingInput { offset: usize },
    #[error("failed to write script: {0}")]
    Write(#[source] serde_json::Error),
}

/// Which of the two data kinds a script carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    Implementors,
    Sidebar,
}

impl ScriptKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScriptKind::Implementors => "implementors",
            ScriptKind::Sidebar => "sidebar",
        }
    }
}

impl std::str::FromStr for ScriptKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "implementors" | "impls" => Ok(Self::Implementors),
            "sidebar" | "sidebar-items" => Ok(Self::Sidebar),
            _ => Err(format!("Invalid script kind: {}", s)),
        }
    }
}

/// The payload of one script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Script {
    Implementors(ImplementorTable),
    Sidebar(SidebarItems),
}

impl Script {
    pub fn kind(&self) -> ScriptKind {
        match self {
            Script::Implementors(_) => ScriptKind::Implementors,
            Script::Sidebar(_) => ScriptKind::Sidebar,
        }
    }

    pub fn to_script(&self) -> Result<String, ScriptError> {
        match self {
            Script::Implementors(table) => table.to_script(),
            Script::Sidebar(items) => items.to_script(),
        }
    }
}

/// Detect the kind of `src` and parse it.
pub fn parse_script(src: &str) -> Result<Script, ScriptError> {
    let trimmed = src.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with("(function()") {
        parse_implementors(src).map(Script::Implementors)
    } else if trimmed.starts_with("initSidebarItems") || trimmed.starts_with("window.SIDEBAR_ITEMS")
    {
        parse_sidebar(src).map(Script::Sidebar)
    } else {
        Err(ScriptError::Unrecognized)
    }
}

/// Parse an `implementors/**/trait.*.js` script.
pub fn parse_implementors(src: &str) -> Result<ImplementorTable, ScriptError> {
    let mut cursor = Cursor::new(src);
    cursor.skip_bom();
    for token in ["(", "function", "(", ")", "{", "var", "implementors", "="] {
        cursor.expect(token)?;
    }

    // Either `{}` followed by one statement per crate, or the full table inline.
    let mut table: ImplementorTable = cursor.json()?;
    cursor.expect(";")?;

    while cursor.eat("implementors") {
        cursor.expect("[")?;
        let key: String = cursor.json()?;
        cursor.expect("]")?;
        cursor.expect("=")?;
        let entries = cursor.json()?;
        cursor.expect(";")?;
        tracing::trace!(krate = %key, "implementors statement");
        table.try_insert(key, entries)?;
    }

    cursor.expect("if")?;
    cursor.skip_register_tail()?;
    cursor.eat(";");
    cursor.finish()?;

    tracing::debug!(crates = table.len(), entries = table.value_count(), "parsed implementors");
    Ok(table)
}

/// Parse a `sidebar-items.js` script.
pub fn parse_sidebar(src: &str) -> Result<SidebarItems, ScriptError> {
    let mut cursor = Cursor::new(src);
    cursor.skip_bom();
    let items: SidebarItems = if cursor.eat("initSidebarItems") {
        cursor.expect("(")?;
        let items = cursor.json()?;
        cursor.expect(")")?;
        items
    } else {
        for token in ["window", ".", "SIDEBAR_ITEMS", "="] {
            cursor.expect(token)?;
        }
        cursor.json()?
    };
    cursor.eat(";");
    cursor.finish()?;

    tracing::debug!(categories = items.len(), "parsed sidebar items");
    Ok(items)
}

impl ImplementorTable {
    /// Render as an implementors script, one statement per crate.
    pub fn to_script(&self) -> Result<String, ScriptError> {
        let mut out = String::from("(function() {var implementors = {};\n");
        for (krate, entries) in self.iter() {
            out.push_str("implementors[");
            out.push_str(&to_json(krate)?);
            out.push_str("] = ");
            out.push_str(&to_json(entries)?);
            out.push_str(";\n");
        }
        out.push_str(REGISTER_TAIL);
        Ok(out)
    }
}

impl SidebarItems {
    /// Render as an `initSidebarItems` call.
    pub fn to_script(&self) -> Result<String, ScriptError> {
        Ok(format!("initSidebarItems({});", to_json(self)?))
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ScriptError> {
    serde_json::to_string(value).map_err(ScriptError::Write)
}

struct Cursor<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn skip_bom(&mut self) {
        if self.rest().starts_with('\u{feff}') {
            self.pos += '\u{feff}'.len_utf8();
        }
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consume `token` (after whitespace) if it is next.
    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &'static str) -> Result<(), ScriptError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(ScriptError::Expected {
                expected: token,
                offset: self.pos,
            })
        }
    }

    /// Read one JSON value (object, array or string) starting at the cursor.
    fn json<T: DeserializeOwned>(&mut self) -> Result<T, ScriptError> {
        self.skip_ws();
        let offset = self.pos;
        let mut stream = serde_json::Deserializer::from_str(self.rest()).into_iter::<T>();
        match stream.next() {
            Some(Ok(value)) => {
                self.pos += stream.byte_offset();
                Ok(value)
            }
            Some(Err(source)) => Err(ScriptError::Json { offset, source }),
            None => Err(ScriptError::Expected {
                expected: "JSON value",
                offset,
            }),
        }
    }

    /// Skip the `if (window.register_implementors) ... })()` tail, whose
    /// exact spacing varies between rustdoc versions.
    fn skip_register_tail(&mut self) -> Result<(), ScriptError> {
        let offset = self.pos;
        let rest = self.rest();
        let end = rest
            .find("})()")
            .filter(|&end| rest[..end].contains("register_implementors"))
            .ok_or(ScriptError::Expected {
                expected: "registration call",
                offset,
            })?;
        self.pos += end + "})()".len();
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ScriptError> {
        self.skip_ws();
        if self.pos == self.src.len() {
            Ok(())
        } else {
            Err(ScriptError::TrailingInput { offset: self.pos })
        }
    }
}

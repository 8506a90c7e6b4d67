//! The table of symbols the CPU defines: operators, syscalls,
//! registers and so on, each with a fixed number.
//!
//! The symbols are declared in shell include files, as lines of the
//! form `export NAME=NUMBER`, which are shared with the rest of the
//! tool chain.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use tracing::{event, span, Level};

use super::rx::LazyRegex;
use super::types::{AssemblerFailure, IoAction, IoFailed, IoTarget};


/// The declaration files read from the include directory, in the
/// order in which they are loaded.
pub(crate) const DECLARATION_FILES: [&str; 3] = ["operations.sh", "syscalls.sh", "registers.sh"];

static EXPORT_LINE: LazyRegex = LazyRegex::new(r"^export\s+([A-Z0-9_]+)=(\d+)");

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    values: BTreeMap<String, u32>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.values.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Defines `name`.  The first definition of a name wins; a later
    /// definition with a different value is ignored (and logged), so
    /// that one namespace cannot quietly change the meaning of a
    /// symbol defined by another.  Returns whether the table now
    /// holds `value` for `name`.
    pub fn insert(&mut self, name: &str, value: u32) -> bool {
        match self.values.get(name) {
            None => {
                self.values.insert(name.to_string(), value);
                true
            }
            Some(existing) if *existing == value => true,
            Some(existing) => {
                event!(
                    Level::WARN,
                    "symbol {name} is already defined as {existing}; ignoring redefinition as {value}"
                );
                false
            }
        }
    }

    /// Reads `export NAME=NUMBER` declarations from `reader`.  Other
    /// lines are ignored.  Returns the number of declarations read.
    ///
    /// # Errors
    ///
    /// Fails if `reader` cannot be read.
    pub fn load_declarations<R: BufRead>(
        &mut self,
        reader: R,
        origin: &Path,
    ) -> Result<usize, AssemblerFailure> {
        let mut count = 0;
        for line in reader.lines() {
            let line = line.map_err(|e| {
                AssemblerFailure::Io(IoFailed {
                    action: IoAction::Read,
                    target: IoTarget::File(origin.to_path_buf()),
                    error: e,
                })
            })?;
            let Some(captures) = EXPORT_LINE.captures(line.trim()) else {
                continue;
            };
            let name = &captures[1];
            match captures[2].parse::<u32>() {
                Ok(value) => {
                    self.insert(name, value);
                    count += 1;
                }
                Err(e) => {
                    event!(
                        Level::WARN,
                        "{}: ignoring declaration of {name}: {e}",
                        origin.display()
                    );
                }
            }
        }
        Ok(count)
    }

    /// Builds the symbol table from the declaration files in
    /// `include_dir`.  Missing files are skipped.
    ///
    /// # Errors
    ///
    /// Fails if a declaration file exists but cannot be read.
    pub fn load_include_dir(include_dir: &Path) -> Result<SymbolTable, AssemblerFailure> {
        let span = span!(Level::INFO, "load symbols", dir=%include_dir.display());
        let _enter = span.enter();
        let mut symtab = SymbolTable::new();
        for name in DECLARATION_FILES {
            let path = include_dir.join(name);
            let file = match File::open(&path) {
                Ok(f) => f,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    event!(Level::DEBUG, "{} does not exist, skipping it", path.display());
                    continue;
                }
                Err(e) => {
                    return Err(AssemblerFailure::Io(IoFailed {
                        action: IoAction::Read,
                        target: IoTarget::File(path),
                        error: e,
                    }));
                }
            };
            let count = symtab.load_declarations(BufReader::new(file), &path)?;
            event!(Level::DEBUG, "read {count} declarations from {}", path.display());
        }
        event!(Level::INFO, "symbol table has {} entries", symtab.len());
        Ok(symtab)
    }
}

impl<'a> FromIterator<(&'a str, u32)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, u32)>>(iter: I) -> SymbolTable {
        let mut symtab = SymbolTable::new();
        for (name, value) in iter {
            symtab.insert(name, value);
        }
        symtab
    }
}

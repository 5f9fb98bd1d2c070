//! Option table builder.
//!
//! Translates a command's flag registry into the short-option spec string
//! and long-option table consumed by the [`Scanner`](crate::Scanner). The
//! table is rebuilt fresh for every dispatch call and dropped with it;
//! nothing here outlives one invocation.
//!
//! The short spec follows `getopt` convention: a leading `:` (report
//! missing arguments distinctly from unknown options), then each short
//! letter followed by `:` for a required argument or `::` for an optional
//! one. For example, flags `-v`, `-h`, `-f FILE`, `-l[LEVEL]` produce
//! `":vhf:l::"`.

use crate::flag::{Flag, FlagArity};

/// One entry in the long-option table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongOpt {
    /// The long name, without the leading `--`.
    pub name: String,
    /// Argument arity carried over from the flag.
    pub arity: FlagArity,
    /// Short alias, if the flag also has a short letter. The scanner
    /// reports such options as their short form; only long-only options
    /// are reported by table index.
    pub short: Option<char>,
}

/// The scanner's view of one command's flag registry.
#[derive(Debug, Clone, Default)]
pub struct OptTable {
    pub short_spec: String,
    pub long: Vec<LongOpt>,
}

impl OptTable {
    /// Builds the table by walking `flags` in registration order.
    pub fn build(flags: &[Flag]) -> Self {
        let mut short_spec = String::from(":");
        let mut long = Vec::new();

        for flag in flags {
            if let Some(c) = flag.short() {
                short_spec.push(c);
                match flag.arity() {
                    FlagArity::None => {}
                    FlagArity::Required => short_spec.push(':'),
                    FlagArity::Optional => short_spec.push_str("::"),
                }
            }
            if let Some(name) = flag.long() {
                long.push(LongOpt {
                    name: name.to_owned(),
                    arity: flag.arity(),
                    short: flag.short(),
                });
            }
        }

        Self { short_spec, long }
    }

    /// Looks up a long option by exact name.
    pub fn find_long(&self, name: &str) -> Option<usize> {
        self.long.iter().position(|opt| opt.name == name)
    }

    /// Argument arity for a short letter, or `None` if the letter is not
    /// part of the spec.
    pub fn short_arity(&self, letter: char) -> Option<FlagArity> {
        let spec: Vec<char> = self.short_spec.chars().collect();
        let mut i = usize::from(spec.first() == Some(&':'));
        while i < spec.len() {
            let c = spec[i];
            let mut colons = 0;
            while spec.get(i + 1 + colons) == Some(&':') {
                colons += 1;
            }
            if c == letter {
                return Some(match colons {
                    0 => FlagArity::None,
                    1 => FlagArity::Required,
                    _ => FlagArity::Optional,
                });
            }
            i += 1 + colons;
        }
        None
    }
}

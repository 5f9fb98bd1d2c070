//! POSIX-style option scanner.
//!
//! Consumes the short-option spec and long-option table built by
//! [`OptTable`] and walks one command's argv, reporting one result per
//! call: a matched short option, a long option resolved to its table
//! index, an unrecognized token, or a missing required argument.
//!
//! Behavior mirrors `getopt_long`:
//!
//! - `--name`, `--name=value`, and `--name value` (required arity) forms;
//! - clustered shorts (`-vq`), attached short arguments (`-fFILE`);
//! - optional arguments are recognized in attached form only;
//! - `--` ends option scanning, the rest of argv is operands;
//! - non-option tokens encountered mid-scan are set aside and come back
//!   in their original relative order from [`Scanner::finish`] (the
//!   equivalent of GNU argv permutation);
//! - a long option with a short alias is reported as its short letter, so
//!   only long-only options arrive as table indexes.
//!
//! Unrecognized options report the whole original token, the way
//! `getopt_long` leaves it in `argv[optind - 1]`. A token like `-vz`
//! where only `v` is registered first yields `v`, then the full `-vz` as
//! unrecognized.

use std::collections::VecDeque;

use crate::flag::FlagArity;
use crate::optable::OptTable;

/// One scanner step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult {
    /// A registered short option, with its argument if one was supplied.
    Short { letter: char, arg: Option<String> },
    /// A registered long-only option, by long-table index.
    Long { index: usize, arg: Option<String> },
    /// A token that looks like an option but matches nothing in the table.
    Unknown(String),
    /// An option with required arity reached the end of argv without an
    /// argument. Scanning cannot continue past this.
    MissingArg(String),
}

struct Cluster {
    token: String,
    letters: Vec<char>,
    pos: usize,
}

/// Scans one command's argv against a built option table.
pub struct Scanner<'t> {
    table: &'t OptTable,
    tokens: VecDeque<String>,
    cluster: Option<Cluster>,
    operands: Vec<String>,
}

impl<'t> Scanner<'t> {
    /// Creates a scanner over `args`. The caller has already stripped the
    /// command-name slot from the argv.
    pub fn new(table: &'t OptTable, args: Vec<String>) -> Self {
        Self {
            table,
            tokens: args.into(),
            cluster: None,
            operands: Vec::new(),
        }
    }

    /// Returns the next option, or `None` when options are exhausted.
    pub fn next_opt(&mut self) -> Option<ScanResult> {
        loop {
            if self.cluster.is_some() {
                return Some(self.step_cluster());
            }

            let token = self.tokens.pop_front()?;

            if token == "--" {
                self.operands.extend(self.tokens.drain(..));
                return None;
            }

            if let Some(body) = token.strip_prefix("--") {
                return Some(self.long_option(&token, body));
            }

            if token.len() > 1 && token.starts_with('-') {
                self.cluster = Some(Cluster {
                    letters: token.chars().skip(1).collect(),
                    token,
                    pos: 0,
                });
                continue;
            }

            // Non-option: set aside and keep scanning (argv permutation).
            self.operands.push(token);
        }
    }

    /// Consumes the scanner, returning the non-option tokens in their
    /// original relative order plus anything left unscanned.
    pub fn finish(mut self) -> Vec<String> {
        self.operands.extend(self.tokens.drain(..));
        self.operands
    }

    fn long_option(&mut self, token: &str, body: &str) -> ScanResult {
        let (name, attached) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        let Some(index) = self.table.find_long(name) else {
            return ScanResult::Unknown(token.to_owned());
        };

        let opt = &self.table.long[index];
        let arg = match opt.arity {
            FlagArity::None => {
                if attached.is_some() {
                    // `--name=value` on an option that takes no argument.
                    return ScanResult::Unknown(token.to_owned());
                }
                None
            }
            FlagArity::Required => match attached {
                Some(value) => Some(value.to_owned()),
                None => match self.tokens.pop_front() {
                    Some(value) => Some(value),
                    None => return ScanResult::MissingArg(token.to_owned()),
                },
            },
            FlagArity::Optional => attached.map(str::to_owned),
        };

        match opt.short {
            Some(letter) => ScanResult::Short { letter, arg },
            None => ScanResult::Long { index, arg },
        }
    }

    fn step_cluster(&mut self) -> ScanResult {
        let cluster = self.cluster.as_mut().expect("cluster in progress");
        let letter = cluster.letters[cluster.pos];
        let token = cluster.token.clone();

        let Some(arity) = self.table.short_arity(letter) else {
            self.cluster = None;
            return ScanResult::Unknown(token);
        };

        match arity {
            FlagArity::None => {
                cluster.pos += 1;
                if cluster.pos >= cluster.letters.len() {
                    self.cluster = None;
                }
                ScanResult::Short { letter, arg: None }
            }
            FlagArity::Required => {
                let attached: String = cluster.letters[cluster.pos + 1..].iter().collect();
                self.cluster = None;
                let arg = if !attached.is_empty() {
                    Some(attached)
                } else {
                    match self.tokens.pop_front() {
                        Some(value) => Some(value),
                        None => return ScanResult::MissingArg(token),
                    }
                };
                ScanResult::Short { letter, arg }
            }
            FlagArity::Optional => {
                let attached: String = cluster.letters[cluster.pos + 1..].iter().collect();
                self.cluster = None;
                let arg = (!attached.is_empty()).then_some(attached);
                ScanResult::Short { letter, arg }
            }
        }
    }
}

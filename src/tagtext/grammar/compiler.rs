//! Grammar compiler
//!
//! A grammar is a set of named [`Rule`] expressions. Compiling it turns every rule
//! into a [`Recognizer`] stored in a shared rule table; references between rules
//! are looked up in that table when they run, not when they are compiled, so rules
//! can be declared in any order and may be mutually recursive.
//!
//! Left recursion is handled by seed growing. While a rule is running at some
//! position, a nested call of the same rule at the same position returns the
//! current seed (initially a failure) instead of recursing. If that happened, the
//! rule body is run again with the previous result as the seed, for as long as the
//! match keeps getting longer.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

use crate::tagtext::error::GrammarError;
use crate::tagtext::grammar::combinators::{self, Match, Recognizer, Separator};
use crate::tagtext::grammar::result::ParseResult;
use crate::tagtext::token::TokenStream;

/// A rule expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Token(String),
    Literal(String),
    Word,
    Sequence(Vec<Rule>),
    Choice(Vec<Rule>),
    Repeat(Box<Rule>),
    Optional(Box<Rule>),
    ListOf {
        item: Box<Rule>,
        separator: Option<String>,
        visibility: Separator,
    },
    EndOfInput,
    /// Another rule of the same grammar, by name
    Ref(String),
}

impl Rule {
    pub fn token(kind: impl Into<String>) -> Self {
        Rule::Token(kind.into())
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Rule::Literal(text.into())
    }

    pub fn word() -> Self {
        Rule::Word
    }

    pub fn seq(parts: Vec<Rule>) -> Self {
        Rule::Sequence(parts)
    }

    pub fn choice(alternatives: Vec<Rule>) -> Self {
        Rule::Choice(alternatives)
    }

    pub fn repeat(item: Rule) -> Self {
        Rule::Repeat(Box::new(item))
    }

    pub fn optional(item: Rule) -> Self {
        Rule::Optional(Box::new(item))
    }

    pub fn list_of(item: Rule, separator: Option<&str>, visibility: Separator) -> Self {
        Rule::ListOf {
            item: Box::new(item),
            separator: separator.map(str::to_string),
            visibility,
        }
    }

    pub fn end() -> Self {
        Rule::EndOfInput
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Rule::Ref(name.into())
    }

    fn references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Rule::Ref(name) => out.push(name),
            Rule::Sequence(parts) | Rule::Choice(parts) => {
                parts.iter().for_each(|part| part.references(out))
            }
            Rule::Repeat(item) | Rule::Optional(item) | Rule::ListOf { item, .. } => {
                item.references(out)
            }
            Rule::Token(_) | Rule::Literal(_) | Rule::Word | Rule::EndOfInput => {}
        }
    }
}

#[derive(Default)]
struct RuleTable {
    rules: RefCell<HashMap<String, Recognizer>>,
}

/// Collects named rules for [`Grammar`]
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<(String, Rule)>,
}

impl GrammarBuilder {
    pub fn rule(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.rules.push((name.into(), rule));
        self
    }

    /// Validate the rule set and compile it with `start` as the start rule
    pub fn build(self, start: &str) -> Result<Grammar, GrammarError> {
        let mut names = HashSet::new();
        for (name, _) in &self.rules {
            if !names.insert(name.as_str()) {
                return Err(GrammarError::DuplicateRule(name.clone()));
            }
        }
        for (name, rule) in &self.rules {
            let mut refs = Vec::new();
            rule.references(&mut refs);
            if let Some(missing) = refs.into_iter().find(|r| !names.contains(r)) {
                return Err(GrammarError::UnknownRule {
                    rule: name.clone(),
                    missing: missing.to_string(),
                });
            }
        }
        if !names.contains(start) {
            return Err(GrammarError::MissingStart(start.to_string()));
        }

        let table = Rc::new(RuleTable::default());
        for (name, rule) in &self.rules {
            let body = compile(rule, &table);
            table
                .rules
                .borrow_mut()
                .insert(name.clone(), named(name.clone(), body));
        }
        tracing::trace!(rules = self.rules.len(), start, "grammar compiled");

        Ok(Grammar {
            table,
            start: start.to_string(),
        })
    }
}

/// A compiled grammar
pub struct Grammar {
    table: Rc<RuleTable>,
    start: String,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    /// Run the start rule; whatever it leaves unconsumed is discarded
    pub fn parse(&self, stream: &TokenStream) -> Option<ParseResult> {
        self.recognize(&self.start, stream).map(|(value, _)| value)
    }

    /// Run the named rule and return its match with the remainder
    pub fn recognize(&self, rule: &str, stream: &TokenStream) -> Option<Match> {
        let recognizer = self.recognizer(rule)?;
        recognizer(stream)
    }

    /// The compiled recognizer of a rule; it stays usable while the grammar lives
    pub fn recognizer(&self, rule: &str) -> Option<Recognizer> {
        self.table.rules.borrow().get(rule).cloned()
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rules: Vec<_> = self.table.rules.borrow().keys().cloned().collect();
        rules.sort();
        f.debug_struct("Grammar")
            .field("start", &self.start)
            .field("rules", &rules)
            .finish()
    }
}

fn compile(rule: &Rule, table: &Rc<RuleTable>) -> Recognizer {
    let all = |rules: &[Rule]| -> Vec<Recognizer> {
        rules.iter().map(|r| compile(r, table)).collect()
    };
    match rule {
        Rule::Token(kind) => combinators::token(kind.clone()),
        Rule::Literal(text) => combinators::literal(text.clone()),
        Rule::Word => combinators::word(),
        Rule::Sequence(parts) => combinators::sequence(all(parts)),
        Rule::Choice(alternatives) => combinators::choice(all(alternatives)),
        Rule::Repeat(item) => combinators::repeat(compile(item, table)),
        Rule::Optional(item) => combinators::optional(compile(item, table)),
        Rule::ListOf {
            item,
            separator,
            visibility,
        } => combinators::list_of(compile(item, table), separator.clone(), *visibility),
        Rule::EndOfInput => combinators::end_of_input(),
        Rule::Ref(name) => {
            let table: Weak<RuleTable> = Rc::downgrade(table);
            let name = name.clone();
            Rc::new(move |stream: &TokenStream| {
                let table = table.upgrade()?;
                let target = table.rules.borrow().get(&name).cloned()?;
                target(stream)
            })
        }
    }
}

struct Seed {
    result: Option<Match>,
    recursed: bool,
}

fn named(name: String, body: Recognizer) -> Recognizer {
    let seeds: RefCell<HashMap<(usize, usize), Seed>> = RefCell::new(HashMap::new());
    let wrap = move |(value, rest): Match| -> Match {
        if value.is_empty() {
            (ParseResult::Empty, rest)
        } else {
            (ParseResult::Rule(name.clone(), Box::new(value)), rest)
        }
    };

    Rc::new(move |stream: &TokenStream| {
        let key = (stream.source_id(), stream.position());
        if let Some(seed) = seeds.borrow_mut().get_mut(&key) {
            seed.recursed = true;
            return seed.result.clone();
        }
        seeds.borrow_mut().insert(
            key,
            Seed {
                result: None,
                recursed: false,
            },
        );

        let mut result = body(stream).map(&wrap);
        let recursed = seeds.borrow().get(&key).is_some_and(|seed| seed.recursed);
        if recursed {
            while let Some((_, rest)) = &result {
                let end = rest.position();
                seeds.borrow_mut().insert(
                    key,
                    Seed {
                        result: result.clone(),
                        recursed: true,
                    },
                );
                match body(stream) {
                    Some(grown) if grown.1.position() > end => result = Some(wrap(grown)),
                    _ => break,
                }
            }
        }

        seeds.borrow_mut().remove(&key);
        result
    })
}

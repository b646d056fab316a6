//! Rule set compiler
//!
//! Collects lexical rules in declaration order, assigns each a category in a
//! [`TypeRegistry`], and compiles the set into an [`Automaton`] via Thompson
//! and subset construction. Declaration order is rule priority.

use super::nfa::Nfa;
use super::subset::subset_construction;
use super::table::Automaton;
use crate::config::compile_time::automaton::{MAX_DFA_STATES, MAX_NFA_STATES, MAX_RULES};
use crate::config::runtime::AutomatonPreferences;
use crate::grammar::ast::{
    char_lit_from_string_lit, string_lit_to_tok_id, LexRule, LexSymbol, RegExp, StringLit,
};
use crate::grammar::literal::RuleError;
use crate::logging::codes::{self, Code};
use crate::tokens::{TokenType, TypeRegistry};
use crate::utils::{StringSet, StringSetError};
use crate::{log_debug, log_success, log_warning};

/// Names no rule may take
const RESERVED_NAMES: [&str; 2] = ["Error", "EOF"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Rule '{name}' is already defined")]
    DuplicateRule { name: String },

    #[error("String literal {literal} contains whitespace")]
    WhitespaceLiteral { literal: String },

    #[error("String literal {literal} is empty")]
    EmptyLiteral { literal: String },

    #[error("Rule set is empty")]
    EmptyRuleSet,

    #[error("{stage} exceeds the limit of {max} states")]
    TooManyStates { stage: &'static str, max: usize },

    #[error("Rule set exceeds the limit of {max} rules")]
    TooManyRules { max: usize },

    #[error(transparent)]
    Rule(#[from] RuleError),
}

impl BuildError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::DuplicateRule { .. } => codes::rules::DUPLICATE_RULE,
            Self::WhitespaceLiteral { .. } => codes::rules::WHITESPACE_LITERAL,
            Self::EmptyLiteral { .. } => codes::rules::EMPTY_LITERAL,
            Self::EmptyRuleSet => codes::rules::EMPTY_RULE_SET,
            Self::TooManyStates { .. } => codes::rules::TOO_MANY_STATES,
            Self::TooManyRules { .. } => codes::rules::TOO_MANY_RULES,
            Self::Rule(err) => err.error_code(),
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> codes::Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

impl From<StringSetError> for BuildError {
    fn from(err: StringSetError) -> Self {
        match err {
            StringSetError::AlreadyPresent { value } => Self::DuplicateRule { name: value },
        }
    }
}

/// Compiled rule set: the automaton plus the categories it reports
#[derive(Debug, Clone)]
pub struct Lexicon {
    automaton: Automaton,
    registry: TypeRegistry,
    rules: Vec<LexRule>,
}

impl Lexicon {
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Rules in declaration order
    pub fn rules(&self) -> &[LexRule] {
        &self.rules
    }

    pub fn lookup(&self, name: &str) -> Option<TokenType> {
        self.registry.lookup(name)
    }

    pub fn type_name(&self, typ: TokenType) -> String {
        self.registry.display_name(typ)
    }
}

pub struct AutomatonBuilder {
    rules: Vec<LexRule>,
    types: Vec<TokenType>,
    ids: StringSet,
    registry: TypeRegistry,
    preferences: AutomatonPreferences,
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        Self::with_preferences(AutomatonPreferences::default())
    }

    pub fn with_preferences(preferences: AutomatonPreferences) -> Self {
        Self {
            rules: Vec::new(),
            types: Vec::new(),
            ids: RESERVED_NAMES.into_iter().collect(),
            registry: TypeRegistry::new(),
            preferences,
        }
    }

    /// Append `rule` at the lowest priority so far and return its category
    pub fn add_rule(&mut self, rule: LexRule) -> Result<TokenType, BuildError> {
        if self.rules.len() >= MAX_RULES {
            return Err(BuildError::TooManyRules { max: MAX_RULES });
        }

        let name = rule.id();
        self.ids.add(&name)?;
        let typ = self.registry.register(&name, rule.suppress);

        if self.preferences.log_construction_details {
            log_debug!("Rule added",
                "rule" => &name,
                "category" => typ,
                "suppress" => rule.suppress,
                "pattern" => &rule.reg_exp
            );
        }

        self.rules.push(rule);
        self.types.push(typ);
        Ok(typ)
    }

    /// Add a rule matching exactly the text of `lit`, named by that text
    pub fn add_literal(&mut self, lit: &StringLit, suppress: bool) -> Result<TokenType, BuildError> {
        let literal: String = lit.literal().iter().collect();
        if lit.contains_white_space()? {
            return Err(BuildError::WhitespaceLiteral { literal });
        }
        if lit.value()?.is_empty() {
            return Err(BuildError::EmptyLiteral { literal });
        }

        let raw = lit.literal();
        let end = raw.len().saturating_sub(1);
        let mut symbols: Vec<LexSymbol> = Vec::with_capacity(end);
        let mut i = 1;
        while i < end {
            let escaped = raw[i] == '\\';
            symbols.push(char_lit_from_string_lit(lit, i, escaped)?.into());
            i += if escaped { 2 } else { 1 };
        }

        let rule = LexRule::new(string_lit_to_tok_id(lit), RegExp::new(symbols), suppress);
        self.add_rule(rule)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn build(self) -> Result<Lexicon, BuildError> {
        if self.rules.is_empty() {
            return Err(BuildError::EmptyRuleSet);
        }

        let mut nfa = Nfa::new(MAX_NFA_STATES);
        for (index, rule) in self.rules.iter().enumerate() {
            nfa.add_rule(index, &rule.reg_exp)
                .map_err(|e| BuildError::TooManyStates { stage: "NFA", max: e.max })?;
        }

        let automaton = subset_construction(&nfa, &self.types, MAX_DFA_STATES)
            .map_err(|e| BuildError::TooManyStates { stage: "DFA", max: e.max })?;

        let empty_match = automaton.accept(Automaton::START);
        if !empty_match.is_error() {
            log_warning!("Rule matches the empty string; the scanner never emits empty tokens",
                "rule" => self.registry.display_name(empty_match)
            );
        }

        log_success!(codes::success::AUTOMATON_CONSTRUCTED, "Automaton constructed",
            "rules" => self.rules.len(),
            "nfa_states" => nfa.state_count(),
            "dfa_states" => automaton.state_count(),
            "alphabet" => automaton.alphabet().len()
        );

        if self.preferences.log_construction_details {
            log_debug!("Automaton details",
                "edges" => automaton.edge_count(),
                "accepting_states" => automaton.accepting_state_count()
            );
        }

        Ok(Lexicon {
            automaton,
            registry: self.registry,
            rules: self.rules,
        })
    }
}

impl Default for AutomatonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::{
        BracketKind, CharLiteral, LexBracket, TokId, UnicodeClass, UnicodeClassKind,
    };
    use crate::logging::capture_events;
    use assert_matches::assert_matches;

    fn letters(name: &str) -> LexRule {
        let tail = LexBracket::synthetic(
            BracketKind::ZeroOrMore,
            vec![RegExp::new(vec![UnicodeClass::synthetic(UnicodeClassKind::Letter).into()])],
        )
        .unwrap();
        LexRule::new(
            TokId::synthetic(name),
            RegExp::new(vec![UnicodeClass::synthetic(UnicodeClassKind::Letter).into(), tail.into()]),
            false,
        )
    }

    fn walk(lexicon: &Lexicon, input: &str) -> TokenType {
        let dfa = lexicon.automaton();
        input
            .chars()
            .try_fold(Automaton::START, |s, c| dfa.next(s, c))
            .map(|s| dfa.accept(s))
            .unwrap_or(TokenType::ERROR)
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let mut builder = AutomatonBuilder::new();
        builder.add_rule(letters("word")).unwrap();

        let err = builder.add_rule(letters("word")).unwrap_err();
        assert_matches!(&err, BuildError::DuplicateRule { name } if name == "word");
        assert_eq!(err.error_code(), codes::rules::DUPLICATE_RULE);
        assert_eq!(builder.rule_count(), 1);
    }

    #[test]
    fn test_reserved_names_rejected() {
        let mut builder = AutomatonBuilder::new();
        for name in RESERVED_NAMES {
            assert_matches!(
                builder.add_rule(letters(name)),
                Err(BuildError::DuplicateRule { name: ref taken }) if taken == name
            );
        }
        assert_eq!(builder.rule_count(), 0);
        assert!(builder.add_rule(letters("word")).is_ok());
    }

    #[test]
    fn test_first_declared_rule_wins() {
        let mut builder = AutomatonBuilder::new();
        let kw = builder.add_literal(&StringLit::synthetic("let"), false).unwrap();
        let word = builder.add_rule(letters("word")).unwrap();
        let lexicon = builder.build().unwrap();

        assert_eq!(walk(&lexicon, "let"), kw);
        assert_eq!(walk(&lexicon, "lets"), word);

        let mut reversed = AutomatonBuilder::new();
        let word = reversed.add_rule(letters("word")).unwrap();
        reversed.add_literal(&StringLit::synthetic("let"), false).unwrap();
        let lexicon = reversed.build().unwrap();
        assert_eq!(walk(&lexicon, "let"), word);
    }

    #[test]
    fn test_literal_rules_named_by_text() {
        let mut builder = AutomatonBuilder::new();
        let ne = builder.add_literal(&StringLit::synthetic("!="), false).unwrap();
        let quote = builder.add_literal(&StringLit::synthetic("\""), false).unwrap();
        let lexicon = builder.build().unwrap();

        assert_eq!(lexicon.lookup("!="), Some(ne));
        assert_eq!(lexicon.lookup("\\\""), Some(quote));
        assert_eq!(walk(&lexicon, "!="), ne);
        assert_eq!(walk(&lexicon, "\""), quote);
        assert_eq!(walk(&lexicon, "!"), TokenType::ERROR);
    }

    #[test]
    fn test_bad_literals_rejected() {
        let mut builder = AutomatonBuilder::new();
        assert_matches!(
            builder.add_literal(&StringLit::synthetic("a b"), false),
            Err(BuildError::WhitespaceLiteral { .. })
        );
        assert_matches!(
            builder.add_literal(&StringLit::synthetic("\t"), false),
            Err(BuildError::WhitespaceLiteral { .. })
        );
        assert_matches!(
            builder.add_literal(&StringLit::synthetic(""), false),
            Err(BuildError::EmptyLiteral { .. })
        );
        assert_eq!(builder.rule_count(), 0);
    }

    #[test]
    fn test_empty_rule_set() {
        assert_matches!(AutomatonBuilder::new().build(), Err(BuildError::EmptyRuleSet));
    }

    #[test]
    fn test_suppress_flag_recorded() {
        let mut builder = AutomatonBuilder::new();
        let mut rule = letters("comment");
        rule.suppress = true;
        let typ = builder.add_rule(rule).unwrap();
        let lexicon = builder.build().unwrap();

        assert!(lexicon.registry().is_suppressed(typ));
        assert_eq!(lexicon.type_name(typ), "comment");
        assert_eq!(lexicon.rules().len(), 1);
    }

    #[test]
    fn test_build_logs_success_and_empty_match_warning() {
        let (result, events) = capture_events(|| {
            let mut builder = AutomatonBuilder::new();
            let maybe_x = LexBracket::synthetic(
                BracketKind::Optional,
                vec![RegExp::new(vec![CharLiteral::synthetic('x').into()])],
            )
            .unwrap();
            builder
                .add_rule(LexRule::new(
                    TokId::synthetic("maybe"),
                    RegExp::new(vec![maybe_x.into()]),
                    false,
                ))
                .unwrap();
            builder.build()
        });

        assert!(result.is_ok());
        assert!(events
            .iter()
            .any(|e| e.code == codes::success::AUTOMATON_CONSTRUCTED));
        assert!(events
            .iter()
            .any(|e| e.message.contains("empty string")));
    }
}

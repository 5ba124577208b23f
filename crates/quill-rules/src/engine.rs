//! Rule engine implementation
//!
//! [`RuleRegistry`] owns the rules and their fixers in a fixed order.
//! [`LintEngine`] resolves each rule's severity from configuration, runs the
//! rules against documents and drives the fixers.
//!
//! Syntax trees are not `Send`, so parallel runs hand each worker a path or a
//! source string; the worker parses its own document and only plain data
//! crosses back.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use quill_core::{
    BatchFixer, CancellationToken, Diagnostic, DiagnosticCollector, Document, FixConfig,
    FixOutcome, FixResult, LintRule, LinterConfiguration, QuillConfig, QuillError, Result,
    ResultExt, RuleContext, RuleSeverity, Severity, SourceText, write_fixed,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::builtin::{
    BracePlacement, BraceOptions, NO_REGIONS, NO_REGIONS_IN_ELEMENTS, NoRegions,
    NoRegionsInElements, TrailingWhitespace,
};
use crate::fixes::{DirectiveRemoval, TrailingWhitespaceFix};

/// A rule and the fixer for its diagnostics, if it has one
pub struct RegisteredRule {
    rule: Box<dyn LintRule>,
    fixer: Option<Box<dyn BatchFixer>>,
}

impl RegisteredRule {
    pub fn rule(&self) -> &dyn LintRule {
        self.rule.as_ref()
    }

    pub fn fixer(&self) -> Option<&dyn BatchFixer> {
        self.fixer.as_deref()
    }
}

/// Registry for the rules an engine runs, in registration order
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<RegisteredRule>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in rules, configured from `config`
    pub fn builtin(config: &QuillConfig) -> Self {
        let mut registry = Self::new();
        registry.register(TrailingWhitespace, Some(Box::new(TrailingWhitespaceFix)));
        registry.register(
            BracePlacement::new(BraceOptions::from(&config.brace_config())),
            None,
        );
        registry.register(NoRegions, Some(Box::new(DirectiveRemoval::new(NO_REGIONS))));
        registry.register(
            NoRegionsInElements,
            Some(Box::new(DirectiveRemoval::new(NO_REGIONS_IN_ELEMENTS))),
        );
        registry
    }

    /// Register a rule; a rule registered twice replaces the earlier entry
    pub fn register(&mut self, rule: impl LintRule + 'static, fixer: Option<Box<dyn BatchFixer>>) {
        let entry = RegisteredRule {
            rule: Box::new(rule),
            fixer,
        };
        match self.rules.iter().position(|r| r.rule.id() == entry.rule.id()) {
            Some(index) => self.rules[index] = entry,
            None => self.rules.push(entry),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredRule> + '_ {
        self.rules.iter()
    }

    pub fn get(&self, rule_id: &str) -> Option<&RegisteredRule> {
        self.rules.iter().find(|r| r.rule.id() == rule_id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Something to lint: a file on disk or in-memory source
#[derive(Debug, Clone)]
pub enum LintInput {
    File(PathBuf),
    Source { path: PathBuf, text: String },
}

impl LintInput {
    pub fn path(&self) -> &Path {
        match self {
            LintInput::File(path) => path,
            LintInput::Source { path, .. } => path,
        }
    }

    fn load(&self) -> Result<Document> {
        match self {
            LintInput::File(path) => Document::load(path),
            LintInput::Source { path, text } => Ok(Document::parse(path, text.as_str())),
        }
    }
}

/// Outcome for one input of a parallel run
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    /// Text the diagnostics refer to (the fixed text when fixes were applied)
    pub text: SourceText,
    pub diagnostics: Vec<Diagnostic>,
    /// Lexer and parser errors of the linted text
    pub syntax_errors: usize,
    pub fix: Option<FixResult>,
    /// Set when the input could not be read or fixed
    pub error: Option<QuillError>,
}

impl FileReport {
    fn failed(path: &Path, error: QuillError) -> Self {
        Self {
            path: path.to_path_buf(),
            text: SourceText::new(""),
            diagnostics: Vec::new(),
            syntax_errors: 0,
            fix: None,
            error: Some(error),
        }
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}

/// Reports of a parallel run, in input order
#[derive(Debug, Default)]
pub struct LintRun {
    pub reports: Vec<FileReport>,
    /// Cancellation was requested; inputs not yet started were skipped
    pub cancelled: bool,
}

impl LintRun {
    pub fn diagnostic_count(&self) -> usize {
        self.reports.iter().map(|r| r.diagnostics.len()).sum()
    }

    pub fn error_count(&self) -> usize {
        self.reports.iter().map(FileReport::error_count).sum()
    }

    pub fn count_with_severity(&self, severity: Severity) -> usize {
        self.reports
            .iter()
            .flat_map(|r| &r.diagnostics)
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn failed_inputs(&self) -> usize {
        self.reports.iter().filter(|r| r.error.is_some()).count()
    }

    pub fn fixed_count(&self) -> usize {
        self.reports
            .iter()
            .filter_map(|r| r.fix.as_ref())
            .map(|fix| fix.applied_count)
            .sum()
    }

    /// [`QuillError::Cancelled`] with the number of inputs that completed
    pub fn cancellation(&self) -> Option<QuillError> {
        self.cancelled.then(|| QuillError::Cancelled {
            completed: self.reports.len(),
        })
    }
}

/// Runs registered rules with configured severities
pub struct LintEngine {
    registry: RuleRegistry,
    linter: LinterConfiguration,
}

impl LintEngine {
    /// Engine with the built-in rules
    pub fn new(config: &QuillConfig) -> Self {
        Self::with_registry(RuleRegistry::builtin(config), config)
    }

    pub fn with_registry(registry: RuleRegistry, config: &QuillConfig) -> Self {
        let linter = config.linter_config();
        if let Some(rules) = &linter.rules {
            let known: HashSet<&str> = registry.iter().map(|r| r.rule.id()).collect();
            for id in rules.keys().filter(|id| !known.contains(id.as_str())) {
                warn!("Unknown rule '{}' in configuration", id);
            }
        }
        Self { registry, linter }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Severity a rule runs with, `None` when it is disabled
    pub fn severity_of(&self, rule: &dyn LintRule) -> Option<Severity> {
        if !self.linter.is_enabled() {
            return None;
        }
        let metadata = rule.metadata();
        match self.linter.rule_severity(metadata.id) {
            Some(RuleSeverity::Off) => None,
            Some(RuleSeverity::Info) => Some(Severity::Info),
            Some(RuleSeverity::Warn) => Some(Severity::Warning),
            Some(RuleSeverity::Error) => Some(Severity::Error),
            None if metadata.recommended && self.linter.use_recommended() => {
                Some(metadata.default_severity)
            }
            None => None,
        }
    }

    /// Run every enabled rule; diagnostics are grouped by rule in registry order
    pub fn lint(&self, document: &Document) -> Vec<Diagnostic> {
        let mut ctx = RuleContext::new(document, Severity::Warning);
        let mut diagnostics = Vec::new();
        for entry in self.registry.iter() {
            let Some(severity) = self.severity_of(entry.rule()) else {
                continue;
            };
            ctx.set_severity(severity);
            let mut collector = DiagnosticCollector::new();
            entry.rule().check(&ctx, &mut collector);
            debug!(
                "{} found {} issue(s) in {}",
                entry.rule().id(),
                collector.len(),
                document.path().display()
            );
            diagnostics.extend(collector.into_diagnostics());
        }
        diagnostics
    }

    /// Run a single rule regardless of whether it is enabled
    pub fn lint_rule(&self, document: &Document, rule_id: &str) -> Vec<Diagnostic> {
        let Some(entry) = self.registry.get(rule_id) else {
            return Vec::new();
        };
        let severity = self
            .severity_of(entry.rule())
            .unwrap_or(entry.rule().metadata().default_severity);
        let ctx = RuleContext::new(document, severity);
        let mut collector = DiagnosticCollector::new();
        entry.rule().check(&ctx, &mut collector);
        collector.into_diagnostics()
    }

    /// Apply the fixer of every enabled, fixable rule in registry order
    ///
    /// Each fixer sees the document produced by the previous one and the
    /// diagnostics its rule reports on that document.
    pub fn fix(&self, document: &Document) -> Result<FixOutcome> {
        let mut current = document.clone();
        let mut fixed = Vec::new();

        for entry in self.registry.iter() {
            let Some(fixer) = entry.fixer() else {
                continue;
            };
            if self.severity_of(entry.rule()).is_none() {
                continue;
            }
            let diagnostics = self.lint_rule(&current, entry.rule().id());
            if diagnostics.is_empty() {
                continue;
            }
            let outcome = fixer
                .fix(&current, &diagnostics)
                .map_err(|error| QuillError::rule_error(fixer.rule_id(), error.to_string()))?;
            if outcome.is_unchanged() {
                continue;
            }
            debug!(
                "{} fixed {} issue(s) in {}",
                fixer.rule_id(),
                outcome.fixed.len(),
                current.path().display()
            );
            fixed.extend(outcome.fixed);
            current = outcome.document;
        }

        Ok(FixOutcome {
            document: current,
            fixed,
        })
    }

    /// Lint inputs in parallel
    ///
    /// `cancel` is checked before each input is started; inputs already
    /// started always complete.
    pub fn lint_all(&self, inputs: &[LintInput], cancel: &CancellationToken) -> LintRun {
        self.run(inputs, None, cancel)
    }

    /// Fix inputs in parallel, then lint what remains
    pub fn fix_all(
        &self,
        inputs: &[LintInput],
        config: &FixConfig,
        cancel: &CancellationToken,
    ) -> LintRun {
        self.run(inputs, Some(config), cancel)
    }

    fn run(
        &self,
        inputs: &[LintInput],
        fix: Option<&FixConfig>,
        cancel: &CancellationToken,
    ) -> LintRun {
        let reports: Vec<FileReport> = inputs
            .par_iter()
            .filter_map(|input| {
                if cancel.is_cancelled() {
                    return None;
                }
                Some(self.process(input, fix))
            })
            .collect();

        let run = LintRun {
            reports,
            cancelled: cancel.is_cancelled(),
        };
        if let Some(error) = run.cancellation() {
            warn!("{}; {} file(s) skipped", error, inputs.len() - run.reports.len());
        }
        if fix.is_some() {
            info!(
                "Applied {} fix(es) across {} file(s)",
                run.fixed_count(),
                run.reports.len()
            );
        }

        run
    }

    fn process(&self, input: &LintInput, fix: Option<&FixConfig>) -> FileReport {
        let document = match input.load() {
            Ok(document) => document,
            Err(error) => {
                warn!("{}", error);
                return FileReport::failed(input.path(), error);
            }
        };
        if document.has_errors() {
            debug!(
                "{} has {} syntax error(s)",
                document.path().display(),
                document.errors().len()
            );
        }

        let Some(fix_config) = fix else {
            return self.report(&document, None);
        };

        // A fixer that fails leaves the file unfixed but still linted
        let outcome = match self.fix(&document).recoverable() {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return self.report(&document, None),
            Err(error) => return FileReport::failed(input.path(), error),
        };
        if outcome.is_unchanged() {
            return self.report(&document, None);
        }
        match write_fixed(&document, &outcome.document, outcome.fixed.len(), fix_config) {
            // A dry run leaves the file as it was, so report against the original.
            Ok(result) if fix_config.dry_run => self.report(&document, Some(result)),
            Ok(result) => self.report(&outcome.document, Some(result)),
            Err(error) => FileReport::failed(input.path(), error),
        }
    }

    fn report(&self, document: &Document, fix: Option<FixResult>) -> FileReport {
        FileReport {
            path: document.path().to_path_buf(),
            text: document.text().clone(),
            diagnostics: self.lint(document),
            syntax_errors: document.errors().len(),
            fix,
            error: None,
        }
    }
}

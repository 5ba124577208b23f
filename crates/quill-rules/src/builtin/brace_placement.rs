//! Brace placement rule
//!
//! Every `{ ... }` block is checked by its own small state machine. Blocks
//! with no members are always accepted, as is a block holding a single member
//! written on one line (`{ get; }`). Any other block must have both braces
//! alone on their lines.
//!
//! The machines live on an explicit stack indexed by nesting depth. Tokens are
//! fed to them in document order; a machine is pushed on `{` and popped on the
//! `}` whose parent is its block node. Machines whose closing brace is missing
//! are discarded when an enclosing block closes.

use quill_core::cst::{BlockKind, QuillSyntaxKind, QuillSyntaxNode, QuillSyntaxToken, is_missing};
use quill_core::{
    BraceConfiguration, CloseBraceAnchor, Diagnostic, DiagnosticSink, LintRule, RuleCategory,
    RuleContext, RuleMetadata, Severity, SourceText,
};
use rowan::TextRange;
use tracing::trace;

/// Rule ID for brace placement
pub const BRACE_PLACEMENT: &str = "layout/brace-placement";

static METADATA: RuleMetadata = RuleMetadata {
    id: BRACE_PLACEMENT,
    name: "brace-placement",
    description: "Require braces of multi-line or multi-element blocks to sit alone on their lines",
    category: RuleCategory::Layout,
    default_severity: Severity::Warning,
    fixable: false,
    recommended: true,
};

/// Layout policy for [`BracePlacement`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BraceOptions {
    pub close_anchor: CloseBraceAnchor,
    pub allow_single_line_single_element: bool,
    pub ignored: Vec<BlockKind>,
}

impl Default for BraceOptions {
    fn default() -> Self {
        Self::from(&BraceConfiguration::default())
    }
}

impl From<&BraceConfiguration> for BraceOptions {
    fn from(config: &BraceConfiguration) -> Self {
        let ignored = [
            BlockKind::Namespace,
            BlockKind::Type,
            BlockKind::Enum,
            BlockKind::Member,
            BlockKind::Statement,
            BlockKind::Initializer,
        ]
        .into_iter()
        .filter(|kind| config.ignores(*kind))
        .collect();

        Self {
            close_anchor: config.close_brace_anchor(),
            allow_single_line_single_element: config.allow_single_line_single_element(),
            ignored,
        }
    }
}

#[derive(Debug, Default)]
pub struct BracePlacement {
    options: BraceOptions,
}

impl BracePlacement {
    pub fn new(options: BraceOptions) -> Self {
        Self { options }
    }
}

impl LintRule for BracePlacement {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut dyn DiagnosticSink) {
        let document = ctx.document();
        let tokens = significant_tokens(document.root(), document.text());
        let mut walk = Walk {
            tokens: &tokens,
            options: &self.options,
            severity: ctx.severity(),
            stack: Vec::new(),
            last_reported: None,
        };
        walk.run(sink);
    }
}

/// A significant token with the index of the line it starts on
struct Placed {
    token: QuillSyntaxToken,
    line: usize,
}

fn significant_tokens(root: &QuillSyntaxNode, text: &SourceText) -> Vec<Placed> {
    root.descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| {
            !token.kind().is_trivia() && token.kind() != QuillSyntaxKind::Eof && !is_missing(token)
        })
        .map(|token| Placed {
            line: text.line_index(token.text_range().start()),
            token,
        })
        .collect()
}

/// What the opening brace looked like
#[derive(Debug, Clone, Copy)]
struct OpenFacts {
    index: usize,
    line: usize,
    preceded: bool,
    followed: bool,
}

#[derive(Debug, Clone, Copy)]
enum State {
    AwaitingOpen,
    OpenSeen(OpenFacts),
    AwaitingClose {
        open: OpenFacts,
        first_inside: Option<usize>,
    },
    Closed,
}

/// Per-block machine
struct BraceMachine {
    block: QuillSyntaxNode,
    state: State,
}

impl BraceMachine {
    fn new(block: QuillSyntaxNode) -> Self {
        Self {
            block,
            state: State::AwaitingOpen,
        }
    }

    fn open(&mut self, facts: OpenFacts) {
        if let State::AwaitingOpen = self.state {
            self.state = State::OpenSeen(facts);
        }
        if let State::OpenSeen(open) = self.state {
            self.state = State::AwaitingClose {
                open,
                first_inside: None,
            };
        }
    }

    /// Record a token seen between the braces, at this machine's own depth or deeper
    fn observe(&mut self, index: usize) {
        if let State::AwaitingClose { first_inside, .. } = &mut self.state
            && first_inside.is_none()
        {
            *first_inside = Some(index);
        }
    }

    /// Move to `Closed`, handing back what the open transition recorded
    fn close(&mut self) -> Option<(OpenFacts, Option<usize>)> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::AwaitingClose { open, first_inside } => Some((open, first_inside)),
            _ => None,
        }
    }
}

struct Walk<'a> {
    tokens: &'a [Placed],
    options: &'a BraceOptions,
    severity: Severity,
    stack: Vec<BraceMachine>,
    /// Range of the most recent report
    last_reported: Option<TextRange>,
}

impl Walk<'_> {
    fn run(&mut self, sink: &mut dyn DiagnosticSink) {
        let tokens = self.tokens;
        for (index, placed) in tokens.iter().enumerate() {
            let token = &placed.token;
            let block = token.parent().filter(|parent| parent.kind().is_block());

            match (token.kind(), block) {
                (QuillSyntaxKind::LBrace, Some(block)) => {
                    if let Some(top) = self.stack.last_mut() {
                        top.observe(index);
                    }
                    let mut machine = BraceMachine::new(block);
                    machine.open(self.open_facts(index));
                    self.stack.push(machine);
                }
                (QuillSyntaxKind::RBrace, Some(block)) => self.close(index, &block, sink),
                _ => {
                    if let Some(top) = self.stack.last_mut() {
                        top.observe(index);
                    }
                }
            }
        }
    }

    fn open_facts(&self, index: usize) -> OpenFacts {
        OpenFacts {
            index,
            line: self.tokens[index].line,
            preceded: self.previous_on_line(index).is_some(),
            followed: self.next_on_line(index).is_some(),
        }
    }

    fn close(&mut self, index: usize, block: &QuillSyntaxNode, sink: &mut dyn DiagnosticSink) {
        let Some(depth) = self.stack.iter().rposition(|machine| &machine.block == block) else {
            trace!("Skipping `}}` without an open block at {:?}", self.range(index));
            return;
        };
        for unclosed in self.stack.drain(depth + 1..) {
            trace!("Discarding block without a closing brace: {:?}", unclosed.block.text_range());
        }
        let Some(mut machine) = self.stack.pop() else {
            return;
        };
        let Some((open, first_inside)) = machine.close() else {
            return;
        };
        let Some(kind) = BlockKind::from_syntax(block.kind()) else {
            return;
        };
        if self.options.ignored.contains(&kind) {
            return;
        }
        self.classify(block, open, first_inside, index, sink);
    }

    fn classify(
        &mut self,
        block: &QuillSyntaxNode,
        open: OpenFacts,
        first_inside: Option<usize>,
        close_index: usize,
        sink: &mut dyn DiagnosticSink,
    ) {
        let members = block
            .children()
            .filter(|child| child.kind() == QuillSyntaxKind::Member)
            .count();
        let close_line = self.tokens[close_index].line;
        let same_line = open.line == close_line;

        if members == 0 {
            return;
        }
        if members == 1 && same_line && self.options.allow_single_line_single_element {
            return;
        }

        if open.preceded {
            self.report(sink, open.index, "Opening brace must not share its line with preceding content");
        } else if open.followed {
            self.report(sink, open.index, "Opening brace must be followed by a line break");
        }

        if self.previous_on_line(close_index).is_some() {
            let anchor = match self.options.close_anchor {
                CloseBraceAnchor::Delimiter => Some(close_index),
                CloseBraceAnchor::SharedContent if same_line => first_inside,
                CloseBraceAnchor::SharedContent => Some(self.first_on_line(close_index)),
            };
            self.report(
                sink,
                anchor.unwrap_or(close_index),
                "Closing brace must be on its own line",
            );
        } else if self.next_on_line(close_index).is_some_and(|next| {
            !matches!(
                self.tokens[next].token.kind(),
                QuillSyntaxKind::Semicolon
                    | QuillSyntaxKind::Comma
                    | QuillSyntaxKind::RParen
                    | QuillSyntaxKind::RBracket
            )
        }) {
            self.report(sink, close_index, "Closing brace must not share its line with following content");
        }
    }

    /// Adjacent closing braces anchor on the same token at most once
    fn report(&mut self, sink: &mut dyn DiagnosticSink, index: usize, message: &str) {
        let range = self.range(index);
        if self.last_reported.replace(range) == Some(range) {
            return;
        }
        sink.report(Diagnostic::new(BRACE_PLACEMENT, self.severity, message, range));
    }

    fn range(&self, index: usize) -> TextRange {
        self.tokens[index].token.text_range()
    }

    fn previous_on_line(&self, index: usize) -> Option<usize> {
        let previous = index.checked_sub(1)?;
        (self.tokens[previous].line == self.tokens[index].line).then_some(previous)
    }

    fn next_on_line(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        let placed = self.tokens.get(next)?;
        (placed.line == self.tokens[index].line).then_some(next)
    }

    fn first_on_line(&self, index: usize) -> usize {
        let line = self.tokens[index].line;
        self.tokens[..index]
            .iter()
            .rposition(|placed| placed.line != line)
            .map_or(0, |before| before + 1)
    }
}

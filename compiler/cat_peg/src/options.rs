//! Per-parse configuration.

/// Default limit on nested lazy-rule resolutions.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Default stack red zone: grow when less than this remains (100KB).
pub const DEFAULT_RED_ZONE: usize = 100 * 1024;

/// Default stack growth step (1MB).
pub const DEFAULT_STACK_GROWTH: usize = 1024 * 1024;

/// Limits applied to a single parse.
///
/// Nesting in the input (brackets inside brackets) turns into recursion in
/// the matcher. `max_depth` bounds that recursion and turns runaway input
/// into a [`ParseError`](crate::ParseError) instead of a stack overflow; the
/// stack settings control how the matcher grows its stack on the way there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of nested lazy-rule resolutions.
    pub max_depth: usize,
    /// Remaining stack below which more stack is allocated.
    pub stack_red_zone: usize,
    /// Size of each stack extension.
    pub stack_growth: usize,
}

impl ParseOptions {
    /// Set the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the stack red zone and growth step.
    #[must_use]
    pub fn with_stack(mut self, red_zone: usize, growth: usize) -> Self {
        self.stack_red_zone = red_zone;
        self.stack_growth = growth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            stack_red_zone: DEFAULT_RED_ZONE,
            stack_growth: DEFAULT_STACK_GROWTH,
        }
    }
}

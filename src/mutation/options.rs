//! Mutation options.

/// Options for `mutate`, `create`, `update` and `delete`.
///
/// Every flag defaults to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutateOptions {
    /// Commit the transaction together with the mutation.
    pub commit_now: bool,
    /// Skip uniqueness checks on `create`/`update`.
    pub disable_constraints: bool,
    /// Do not add `dgraph.type` to the serialized nodes.
    pub disable_type_inject: bool,
}

impl MutateOptions {
    /// Options with every flag off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set commit_now flag.
    pub fn commit_now(mut self, value: bool) -> Self {
        self.commit_now = value;
        self
    }

    /// Set disable_constraints flag.
    pub fn disable_constraints(mut self, value: bool) -> Self {
        self.disable_constraints = value;
        self
    }

    /// Set disable_type_inject flag.
    pub fn disable_type_inject(mut self, value: bool) -> Self {
        self.disable_type_inject = value;
        self
    }
}

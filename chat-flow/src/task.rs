/// Core trait that every route handler implements.
///
/// Tasks are pure: they read the routed input and produce an output without
/// touching shared state, so a router can be shared across sessions.
pub trait Task<I, O>: Send + Sync {
    /// Unique identifier for this task
    fn id(&self) -> &str;

    /// Produce the output for the given input
    fn run(&self, input: &I) -> O;
}

/// Adapter that turns a plain function or closure into a [`Task`].
pub struct FnTask<F> {
    id: String,
    func: F,
}

impl<F> FnTask<F> {
    pub fn new(id: impl Into<String>, func: F) -> Self {
        Self {
            id: id.into(),
            func,
        }
    }
}

impl<I, O, F> Task<I, O> for FnTask<F>
where
    F: Fn(&I) -> O + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn run(&self, input: &I) -> O {
        (self.func)(input)
    }
}
